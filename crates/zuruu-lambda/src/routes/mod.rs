pub mod flows;
pub mod health;
pub mod session;
pub mod tools;
