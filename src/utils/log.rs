use std::fmt;
use std::str::FromStr;
use std::sync::{
    atomic::{AtomicU8, Ordering},
    Arc, Mutex, OnceLock,
};

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

static GLOBAL_LOG_LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Warning as u8);
static GLOBAL_LOG_HANDLER: OnceLock<Mutex<Box<dyn LogHandler>>> = OnceLock::new();

impl LogLevel {
    fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    fn from_u8(val: u8) -> LogLevel {
        match val {
            0 => LogLevel::Debug,
            1 => LogLevel::Info,
            2 => LogLevel::Warning,
            _ => LogLevel::Error,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

pub fn global_log_level() -> LogLevel {
    LogLevel::from_u8(GLOBAL_LOG_LEVEL.load(Ordering::Relaxed))
}

pub fn set_global_log_level(level: LogLevel) {
    GLOBAL_LOG_LEVEL.store(level as u8, Ordering::Relaxed);
}

fn should_log(level: LogLevel) -> bool {
    level >= global_log_level()
}

pub trait LogHandler: Send + Sync {
    fn handle(&self, level: LogLevel, msg: &str);
}

/// Writes everything to stderr so stdout only carries command output.
pub struct ConsoleLogger;

impl LogHandler for ConsoleLogger {
    fn handle(&self, _level: LogLevel, msg: &str) {
        eprintln!("{}", msg);
    }
}

/// Keeps formatted lines in memory. Clones share the same buffer.
#[derive(Clone, Default)]
pub struct MemoryLogger {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl LogHandler for MemoryLogger {
    fn handle(&self, _level: LogLevel, msg: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(msg.to_string());
        }
    }
}

fn handler_slot() -> &'static Mutex<Box<dyn LogHandler>> {
    GLOBAL_LOG_HANDLER.get_or_init(|| Mutex::new(Box::new(ConsoleLogger)))
}

pub fn set_global_log_handler(handler: Box<dyn LogHandler>) {
    // A panicking handler must not disable logging for the rest of the process.
    let mut guard = handler_slot()
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = handler;
}

fn format_line(level: LogLevel, name: &str, msg: &str) -> String {
    format!("[{}] [{}] {}", level, name, msg)
}

pub fn log(level: LogLevel, name: &str, msg: &str) {
    if !should_log(level) {
        return;
    }

    let line = format_line(level, name, msg);
    let guard = handler_slot()
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.handle(level, &line);
}

pub fn debug(name: &str, msg: &str) {
    log(LogLevel::Debug, name, msg);
}

pub fn info(name: &str, msg: &str) {
    log(LogLevel::Info, name, msg);
}

pub fn warn(name: &str, msg: &str) {
    log(LogLevel::Warning, name, msg);
}

pub fn error(name: &str, msg: &str) {
    log(LogLevel::Error, name, msg);
}
