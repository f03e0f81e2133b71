use serde::Serialize;

#[derive(sqlx::FromRow, Serialize, Debug, Clone, PartialEq)]
pub struct Role {
    pub id: i32,
    pub name: String,
    pub description: String,
}

#[derive(sqlx::FromRow, Serialize, Debug, Clone, PartialEq)]
pub struct RoleSummary {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub employee_count: i64,
}
