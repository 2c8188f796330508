pub mod log;

pub use log::{
    set_global_log_handler,
    set_global_log_level,
    ConsoleLogger,
    LogHandler,
    LogLevel,
    MemoryLogger,
};
