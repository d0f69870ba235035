mod command_registry;
mod event_handler;
mod handler;

pub mod helpers;
pub mod init;

// Re-export Handler for convenience
pub use handler::Handler;
