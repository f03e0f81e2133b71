pub mod flash;
pub mod jwt;
pub mod password;
pub mod session;
pub mod validation;
