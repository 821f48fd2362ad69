pub mod clock;
pub mod location;
pub mod log;
pub mod overtime;
pub mod registration;
pub mod schedule;
pub mod settings;
pub mod user;
pub mod validator;
