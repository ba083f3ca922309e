pub mod config;
pub mod serial_console_thread;
pub mod threads;
pub mod user_console_thread;
pub mod utils;
