pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod utils;
pub mod views;

use actix_web::web;

use crate::config::AppConfig;
use crate::db::RepositoryState;

/// Shared by every worker; handlers receive it as `web::Data<AppState>`.
pub struct AppState {
    pub repo: RepositoryState,
    pub config: AppConfig,
    pub templates: tera::Tera,
}

/// Registers every route of the panel.
pub fn configure(cfg: &mut web::ServiceConfig) {
    use handlers::{auth, department, employee, home, role};

    cfg.service(web::resource("/").route(web::get().to(home::homepage)))
        .service(web::resource("/dashboard").route(web::get().to(home::dashboard)))
        .service(web::resource("/admin/dashboard").route(web::get().to(home::admin_dashboard)))
        .service(
            web::resource("/login")
                .route(web::get().to(auth::login_page))
                .route(web::post().to(auth::login)),
        )
        .service(
            web::resource("/register")
                .route(web::get().to(auth::register_page))
                .route(web::post().to(auth::register)),
        )
        .service(web::resource("/logout").route(web::get().to(auth::logout)))
        // Departments
        .service(web::resource("/departments").route(web::get().to(department::list_departments)))
        .service(
            web::resource("/departments/add")
                .route(web::get().to(department::add_department_form))
                .route(web::post().to(department::add_department)),
        )
        .service(
            web::resource("/department/edit/{id}")
                .route(web::get().to(department::edit_department_form))
                .route(web::post().to(department::edit_department)),
        )
        .service(
            web::resource("/departments/delete/{id}")
                .route(web::get().to(department::delete_department))
                .route(web::post().to(department::delete_department)),
        )
        // Roles
        .service(web::resource("/roles").route(web::get().to(role::list_roles)))
        .service(
            web::resource("/roles/add")
                .route(web::get().to(role::add_role_form))
                .route(web::post().to(role::add_role)),
        )
        .service(
            web::resource("/roles/edit/{id}")
                .route(web::get().to(role::edit_role_form))
                .route(web::post().to(role::edit_role)),
        )
        .service(
            web::resource("/roles/delete/{id}")
                .route(web::get().to(role::delete_role))
                .route(web::post().to(role::delete_role)),
        )
        // Employees; the misspelled path is the historical one and stays reachable.
        .service(web::resource("/employess").route(web::get().to(employee::list_employees)))
        .service(web::resource("/employees").route(web::get().to(employee::list_employees)))
        .service(
            web::resource("/employees/assign/{id}")
                .route(web::get().to(employee::assign_employee_form))
                .route(web::post().to(employee::assign_employee)),
        );
}
