pub mod command;
pub mod commands;
pub mod device;
pub mod field;
pub mod frame;
pub mod registry;
