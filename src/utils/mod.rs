pub mod error;
pub mod line_printer;
pub mod logger;
pub mod sync_flag;
pub mod user_io;
