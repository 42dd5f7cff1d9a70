use std::sync::atomic::{AtomicBool, Ordering};

use once_cell::sync::OnceCell;

static LOGGER: OnceCell<Logger> = OnceCell::new();
static ENABLED: AtomicBool = AtomicBool::new(false);

pub struct Logger {
    prefix: String,
}

impl Logger {
    fn new(prefix: String) -> Self {
        Self { prefix }
    }

    fn format_line(&self, message: &str) -> String {
        format!("[{}] {}", self.prefix, message)
    }

    pub fn log(&self, message: &str) {
        write_line(&self.format_line(message));
    }
}

#[cfg(target_arch = "wasm32")]
fn write_line(line: &str) {
    web_sys::console::log_1(&line.into());
}

#[cfg(not(target_arch = "wasm32"))]
fn write_line(line: &str) {
    eprintln!("{line}");
}

/// 前缀只设置一次；返回本次调用是否完成了初始化。
pub fn init_logger(prefix: impl Into<String>) -> bool {
    LOGGER.set(Logger::new(prefix.into())).is_ok()
}

/// 开关是整个 wasm 实例共享的，最后一次调用生效。
pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed) && LOGGER.get().is_some()
}

pub fn log(message: &str) {
    if !is_enabled() {
        return;
    }
    if let Some(logger) = LOGGER.get() {
        logger.log(message);
    }
}

#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => {
        if $crate::logger::is_enabled() {
            $crate::logger::log(&format!($($arg)*))
        }
    };
}
