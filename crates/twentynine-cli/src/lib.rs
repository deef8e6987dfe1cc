pub mod config;
pub mod console;
pub mod logging;
pub mod session;
pub mod table;
