use async_trait::async_trait;
use log::LevelFilter;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;

use super::Repository;
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::models::department::{Department, DepartmentSummary};
use crate::models::employee::{Employee, EmployeeListing, NewEmployee};
use crate::models::role::{Role, RoleSummary};

pub async fn create_pool(config: &AppConfig) -> Result<PgPool, AppError> {
    let statement_level = if config.profile.echo_sql() {
        LevelFilter::Info
    } else {
        LevelFilter::Debug
    };

    let options = PgConnectOptions::from_str(&config.database_url)
        .map_err(|err| AppError::DatabaseError(err.to_string()))?
        .log_statements(statement_level);

    PgPoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(AppError::from)
}

const EMPLOYEE_COLUMNS: &str =
    "id, email, username, first_name, last_name, password_hash, is_admin, department_id, role_id";

pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PgRepository {
    async fn list_departments(&self) -> Result<Vec<DepartmentSummary>, AppError> {
        let rows = sqlx::query_as::<_, DepartmentSummary>(
            r#"
            SELECT d.id, d.name, d.description, COUNT(e.id) AS employee_count
            FROM departments d
            LEFT JOIN employees e ON e.department_id = d.id
            GROUP BY d.id, d.name, d.description
            ORDER BY d.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn all_departments(&self) -> Result<Vec<Department>, AppError> {
        let rows = sqlx::query_as::<_, Department>(
            "SELECT id, name, description FROM departments ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_department(&self, id: i32) -> Result<Option<Department>, AppError> {
        let row = sqlx::query_as::<_, Department>(
            "SELECT id, name, description FROM departments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create_department(&self, name: &str, description: &str) -> Result<Department, AppError> {
        let row = sqlx::query_as::<_, Department>(
            "INSERT INTO departments (name, description) VALUES ($1, $2) RETURNING id, name, description",
        )
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_department(
        &self,
        id: i32,
        name: &str,
        description: &str,
    ) -> Result<Option<Department>, AppError> {
        let row = sqlx::query_as::<_, Department>(
            "UPDATE departments SET name = $1, description = $2 WHERE id = $3 RETURNING id, name, description",
        )
        .bind(name)
        .bind(description)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_department(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM departments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_roles(&self) -> Result<Vec<RoleSummary>, AppError> {
        let rows = sqlx::query_as::<_, RoleSummary>(
            r#"
            SELECT r.id, r.name, r.description, COUNT(e.id) AS employee_count
            FROM roles r
            LEFT JOIN employees e ON e.role_id = r.id
            GROUP BY r.id, r.name, r.description
            ORDER BY r.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn all_roles(&self) -> Result<Vec<Role>, AppError> {
        let rows = sqlx::query_as::<_, Role>("SELECT id, name, description FROM roles ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_role(&self, id: i32) -> Result<Option<Role>, AppError> {
        let row = sqlx::query_as::<_, Role>("SELECT id, name, description FROM roles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create_role(&self, name: &str, description: &str) -> Result<Role, AppError> {
        let row = sqlx::query_as::<_, Role>(
            "INSERT INTO roles (name, description) VALUES ($1, $2) RETURNING id, name, description",
        )
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_role(
        &self,
        id: i32,
        name: &str,
        description: &str,
    ) -> Result<Option<Role>, AppError> {
        let row = sqlx::query_as::<_, Role>(
            "UPDATE roles SET name = $1, description = $2 WHERE id = $3 RETURNING id, name, description",
        )
        .bind(name)
        .bind(description)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_role(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_employees(&self) -> Result<Vec<EmployeeListing>, AppError> {
        let rows = sqlx::query_as::<_, EmployeeListing>(
            r#"
            SELECT e.id, e.first_name, e.last_name, e.is_admin,
                   d.name AS department_name, r.name AS role_name
            FROM employees e
            LEFT JOIN departments d ON d.id = e.department_id
            LEFT JOIN roles r ON r.id = e.role_id
            ORDER BY e.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_employee(&self, id: i32) -> Result<Option<Employee>, AppError> {
        let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = $1");
        let row = sqlx::query_as::<_, Employee>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_employee_by_email(&self, email: &str) -> Result<Option<Employee>, AppError> {
        let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE LOWER(email) = LOWER($1)");
        let row = sqlx::query_as::<_, Employee>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create_employee(&self, employee: NewEmployee) -> Result<Employee, AppError> {
        let sql = format!(
            "INSERT INTO employees (email, username, first_name, last_name, password_hash, is_admin) \
             VALUES ($1, $2, $3, $4, $5, FALSE) RETURNING {EMPLOYEE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, Employee>(&sql)
            .bind(&employee.email)
            .bind(&employee.username)
            .bind(&employee.first_name)
            .bind(&employee.last_name)
            .bind(&employee.password_hash)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn assign_employee(
        &self,
        id: i32,
        department_id: i32,
        role_id: i32,
    ) -> Result<Option<Employee>, AppError> {
        let sql = format!(
            "UPDATE employees SET department_id = $1, role_id = $2 \
             WHERE id = $3 AND is_admin = FALSE RETURNING {EMPLOYEE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, Employee>(&sql)
            .bind(department_id)
            .bind(role_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}
