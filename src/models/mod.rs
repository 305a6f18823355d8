pub mod document;
pub mod profile;
pub mod role;
pub mod screen;
pub mod session;
pub mod status;
pub mod telemetry;
