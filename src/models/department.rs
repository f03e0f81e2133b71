use serde::Serialize;

#[derive(sqlx::FromRow, Serialize, Debug, Clone, PartialEq)]
pub struct Department {
    pub id: i32,
    pub name: String,
    pub description: String,
}

/// A department row as shown on the listing page.
#[derive(sqlx::FromRow, Serialize, Debug, Clone, PartialEq)]
pub struct DepartmentSummary {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub employee_count: i64,
}
