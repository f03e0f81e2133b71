#![allow(dead_code)]

use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::header;
use actix_web::web;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use dreamteam_admin::config::{AppConfig, Profile};
use dreamteam_admin::db::Repository;
use dreamteam_admin::errors::AppError;
use dreamteam_admin::models::department::{Department, DepartmentSummary};
use dreamteam_admin::models::employee::{Employee, EmployeeListing, NewEmployee};
use dreamteam_admin::models::role::{Role, RoleSummary};
use dreamteam_admin::utils::{flash, jwt};
use dreamteam_admin::AppState;

pub const SECRET: &str = "integration-test-secret";

/// Builds the full application around a mock repository.
macro_rules! test_app {
    ($repo:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(common::state($repo))
                .wrap(dreamteam_admin::views::error_pages())
                .configure(dreamteam_admin::configure),
        )
        .await
    };
}

// --- Mock Repository ---

#[derive(Default)]
struct Tables {
    departments: Vec<Department>,
    roles: Vec<Role>,
    employees: Vec<Employee>,
    next_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory stand-in for Postgres that enforces the same unique constraints.
#[derive(Default)]
pub struct MockRepository {
    tables: Mutex<Tables>,
}

fn duplicate(what: &str) -> AppError {
    AppError::Conflict(format!("duplicate key value violates unique constraint on {what}"))
}

impl MockRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn seed_employee(&self, username: &str, is_admin: bool, password_hash: &str) -> Employee {
        let mut tables = self.tables.lock().unwrap();
        let employee = Employee {
            id: tables.next_id(),
            email: format!("{username}@dreamteam.io"),
            username: username.to_string(),
            first_name: username.to_string(),
            last_name: "Tester".to_string(),
            password_hash: password_hash.to_string(),
            is_admin,
            department_id: None,
            role_id: None,
        };
        tables.employees.push(employee.clone());
        employee
    }

    pub fn seed_department(&self, name: &str, description: &str) -> Department {
        let mut tables = self.tables.lock().unwrap();
        let department = Department {
            id: tables.next_id(),
            name: name.to_string(),
            description: description.to_string(),
        };
        tables.departments.push(department.clone());
        department
    }

    pub fn seed_role(&self, name: &str, description: &str) -> Role {
        let mut tables = self.tables.lock().unwrap();
        let role = Role {
            id: tables.next_id(),
            name: name.to_string(),
            description: description.to_string(),
        };
        tables.roles.push(role.clone());
        role
    }

    pub fn set_assignment(&self, employee_id: i32, department_id: Option<i32>, role_id: Option<i32>) {
        let mut tables = self.tables.lock().unwrap();
        if let Some(employee) = tables.employees.iter_mut().find(|e| e.id == employee_id) {
            employee.department_id = department_id;
            employee.role_id = role_id;
        }
    }

    pub fn remove_employee(&self, employee_id: i32) {
        self.tables.lock().unwrap().employees.retain(|e| e.id != employee_id);
    }

    pub fn departments(&self) -> Vec<Department> {
        self.tables.lock().unwrap().departments.clone()
    }

    pub fn roles(&self) -> Vec<Role> {
        self.tables.lock().unwrap().roles.clone()
    }

    pub fn employee(&self, id: i32) -> Option<Employee> {
        self.tables.lock().unwrap().employees.iter().find(|e| e.id == id).cloned()
    }

    pub fn employee_by_username(&self, username: &str) -> Option<Employee> {
        self.tables
            .lock()
            .unwrap()
            .employees
            .iter()
            .find(|e| e.username == username)
            .cloned()
    }
}

#[async_trait]
impl Repository for MockRepository {
    async fn list_departments(&self) -> Result<Vec<DepartmentSummary>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .departments
            .iter()
            .map(|d| DepartmentSummary {
                id: d.id,
                name: d.name.clone(),
                description: d.description.clone(),
                employee_count: tables
                    .employees
                    .iter()
                    .filter(|e| e.department_id == Some(d.id))
                    .count() as i64,
            })
            .collect())
    }

    async fn all_departments(&self) -> Result<Vec<Department>, AppError> {
        Ok(self.departments())
    }

    async fn get_department(&self, id: i32) -> Result<Option<Department>, AppError> {
        Ok(self.departments().into_iter().find(|d| d.id == id))
    }

    async fn create_department(&self, name: &str, description: &str) -> Result<Department, AppError> {
        if self.departments().iter().any(|d| d.name == name) {
            return Err(duplicate("departments.name"));
        }
        Ok(self.seed_department(name, description))
    }

    async fn update_department(
        &self,
        id: i32,
        name: &str,
        description: &str,
    ) -> Result<Option<Department>, AppError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.departments.iter().any(|d| d.name == name && d.id != id) {
            return Err(duplicate("departments.name"));
        }
        Ok(tables.departments.iter_mut().find(|d| d.id == id).map(|d| {
            d.name = name.to_string();
            d.description = description.to_string();
            d.clone()
        }))
    }

    async fn delete_department(&self, id: i32) -> Result<bool, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.departments.len();
        tables.departments.retain(|d| d.id != id);
        let deleted = tables.departments.len() < before;
        if deleted {
            for employee in tables.employees.iter_mut().filter(|e| e.department_id == Some(id)) {
                employee.department_id = None;
            }
        }
        Ok(deleted)
    }

    async fn list_roles(&self) -> Result<Vec<RoleSummary>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .roles
            .iter()
            .map(|r| RoleSummary {
                id: r.id,
                name: r.name.clone(),
                description: r.description.clone(),
                employee_count: tables.employees.iter().filter(|e| e.role_id == Some(r.id)).count()
                    as i64,
            })
            .collect())
    }

    async fn all_roles(&self) -> Result<Vec<Role>, AppError> {
        Ok(self.roles())
    }

    async fn get_role(&self, id: i32) -> Result<Option<Role>, AppError> {
        Ok(self.roles().into_iter().find(|r| r.id == id))
    }

    async fn create_role(&self, name: &str, description: &str) -> Result<Role, AppError> {
        if self.roles().iter().any(|r| r.name == name) {
            return Err(duplicate("roles.name"));
        }
        Ok(self.seed_role(name, description))
    }

    async fn update_role(
        &self,
        id: i32,
        name: &str,
        description: &str,
    ) -> Result<Option<Role>, AppError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.roles.iter().any(|r| r.name == name && r.id != id) {
            return Err(duplicate("roles.name"));
        }
        Ok(tables.roles.iter_mut().find(|r| r.id == id).map(|r| {
            r.name = name.to_string();
            r.description = description.to_string();
            r.clone()
        }))
    }

    async fn delete_role(&self, id: i32) -> Result<bool, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.roles.len();
        tables.roles.retain(|r| r.id != id);
        let deleted = tables.roles.len() < before;
        if deleted {
            for employee in tables.employees.iter_mut().filter(|e| e.role_id == Some(id)) {
                employee.role_id = None;
            }
        }
        Ok(deleted)
    }

    async fn list_employees(&self) -> Result<Vec<EmployeeListing>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .employees
            .iter()
            .map(|e| EmployeeListing {
                id: e.id,
                first_name: e.first_name.clone(),
                last_name: e.last_name.clone(),
                is_admin: e.is_admin,
                department_name: tables
                    .departments
                    .iter()
                    .find(|d| Some(d.id) == e.department_id)
                    .map(|d| d.name.clone()),
                role_name: tables
                    .roles
                    .iter()
                    .find(|r| Some(r.id) == e.role_id)
                    .map(|r| r.name.clone()),
            })
            .collect())
    }

    async fn get_employee(&self, id: i32) -> Result<Option<Employee>, AppError> {
        Ok(self.employee(id))
    }

    async fn find_employee_by_email(&self, email: &str) -> Result<Option<Employee>, AppError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .employees
            .iter()
            .find(|e| e.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn create_employee(&self, new: NewEmployee) -> Result<Employee, AppError> {
        let mut tables = self.tables.lock().unwrap();
        if tables
            .employees
            .iter()
            .any(|e| e.email.eq_ignore_ascii_case(&new.email) || e.username == new.username)
        {
            return Err(duplicate("employees"));
        }
        let employee = Employee {
            id: tables.next_id(),
            email: new.email,
            username: new.username,
            first_name: new.first_name,
            last_name: new.last_name,
            password_hash: new.password_hash,
            is_admin: false,
            department_id: None,
            role_id: None,
        };
        tables.employees.push(employee.clone());
        Ok(employee)
    }

    async fn assign_employee(
        &self,
        id: i32,
        department_id: i32,
        role_id: i32,
    ) -> Result<Option<Employee>, AppError> {
        let mut tables = self.tables.lock().unwrap();
        Ok(tables
            .employees
            .iter_mut()
            .find(|e| e.id == id && !e.is_admin)
            .map(|e| {
                e.department_id = Some(department_id);
                e.role_id = Some(role_id);
                e.clone()
            }))
    }
}

// --- App scaffolding ---

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://unused/dreamteam_test".to_string(),
        jwt_secret: SECRET.to_string(),
        bind_address: "127.0.0.1:0".to_string(),
        session_ttl_hours: 1,
        profile: Profile::Testing,
    }
}

pub fn state(repo: Arc<MockRepository>) -> web::Data<AppState> {
    web::Data::new(AppState {
        repo,
        config: test_config(),
        templates: dreamteam_admin::views::load_templates().unwrap(),
    })
}

pub fn session_for(employee: &Employee) -> Cookie<'static> {
    Cookie::new("session", jwt::generate_token(SECRET, employee.id, 1).unwrap())
}

pub fn location<B>(resp: &ServiceResponse<B>) -> String {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Flash messages set by a response.
pub fn flashes<B>(resp: &ServiceResponse<B>) -> Vec<String> {
    resp.response()
        .cookies()
        .find(|cookie| cookie.name() == flash::FLASH_COOKIE)
        .map(|cookie| flash::decode(cookie.value()))
        .unwrap_or_default()
}
