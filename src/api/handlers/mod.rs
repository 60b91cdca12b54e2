pub mod actuator;
pub mod contracts;
pub mod error;
