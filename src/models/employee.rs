use serde::Serialize;

#[derive(sqlx::FromRow, Serialize, Debug, Clone, PartialEq)]
pub struct Employee {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_admin: bool,
    pub department_id: Option<i32>,
    pub role_id: Option<i32>,
}

/// Employee joined with the names of its department and role.
#[derive(sqlx::FromRow, Serialize, Debug, Clone, PartialEq)]
pub struct EmployeeListing {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub is_admin: bool,
    pub department_name: Option<String>,
    pub role_name: Option<String>,
}

/// Fields needed to insert a newly registered employee.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
}
