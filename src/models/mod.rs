pub mod coordinates;
pub mod location;
pub mod overtime;
pub mod registration;
pub mod role;
pub mod schedule;
pub mod settings;
pub mod status;
pub mod user;
