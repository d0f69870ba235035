pub mod command_handler;
pub mod upload;
