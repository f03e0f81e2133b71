pub mod postgres;

use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::AppError;
use crate::models::department::{Department, DepartmentSummary};
use crate::models::employee::{Employee, EmployeeListing, NewEmployee};
use crate::models::role::{Role, RoleSummary};

pub use postgres::{create_pool, PgRepository};

/// Persistence operations used by the handlers.
///
/// Unique-constraint violations surface as `AppError::Conflict` and
/// foreign-key violations as `AppError::BadRequest`; implementations must
/// keep that mapping so handlers can react to duplicates without
/// inspecting driver errors.
#[async_trait]
pub trait Repository: Send + Sync {
    // Departments
    async fn list_departments(&self) -> Result<Vec<DepartmentSummary>, AppError>;
    async fn all_departments(&self) -> Result<Vec<Department>, AppError>;
    async fn get_department(&self, id: i32) -> Result<Option<Department>, AppError>;
    async fn create_department(&self, name: &str, description: &str) -> Result<Department, AppError>;
    /// Returns `None` when no department has this id.
    async fn update_department(
        &self,
        id: i32,
        name: &str,
        description: &str,
    ) -> Result<Option<Department>, AppError>;
    /// Returns whether a row was deleted. Employees of the department become unassigned.
    async fn delete_department(&self, id: i32) -> Result<bool, AppError>;

    // Roles
    async fn list_roles(&self) -> Result<Vec<RoleSummary>, AppError>;
    async fn all_roles(&self) -> Result<Vec<Role>, AppError>;
    async fn get_role(&self, id: i32) -> Result<Option<Role>, AppError>;
    async fn create_role(&self, name: &str, description: &str) -> Result<Role, AppError>;
    async fn update_role(
        &self,
        id: i32,
        name: &str,
        description: &str,
    ) -> Result<Option<Role>, AppError>;
    async fn delete_role(&self, id: i32) -> Result<bool, AppError>;

    // Employees
    async fn list_employees(&self) -> Result<Vec<EmployeeListing>, AppError>;
    async fn get_employee(&self, id: i32) -> Result<Option<Employee>, AppError>;
    async fn find_employee_by_email(&self, email: &str) -> Result<Option<Employee>, AppError>;
    async fn create_employee(&self, employee: NewEmployee) -> Result<Employee, AppError>;
    /// Sets department and role together. Admins are never updated: the
    /// result is `None` when the employee is missing or is an admin.
    async fn assign_employee(
        &self,
        id: i32,
        department_id: i32,
        role_id: i32,
    ) -> Result<Option<Employee>, AppError>;
}

pub type RepositoryState = Arc<dyn Repository>;
