//! Category-aware logging for the halftone pipeline.
//!
//! # Architecture
//!
//! - **LogConfig**: thread-safe global configuration using atomic operations
//! - **LogLevel**: hierarchical levels (Off < Error < Warn < Info < Debug < Trace)
//! - **LogCategory**: Camera, Render, Params, Driver
//! - **log()**: the single entry point; messages are built lazily and handed
//!   to the `log` facade with target `halftone::<category>`, so whichever
//!   logger the frontend installs (env_logger) decides where they go.
//!
//! Each category is rate limited with a one second sliding window. The
//! render loop can fail every frame; without the limiter a broken camera
//! would emit sixty identical lines per second.
//!
//! # Usage
//!
//! ```rust
//! use halftone_core::logging::{log, LogCategory, LogLevel};
//!
//! log(LogCategory::Render, LogLevel::Debug, || {
//!     format!("surface resized to {}x{}", 1280, 720)
//! });
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Log level for controlling verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl LogLevel {
    /// Parse log level from string (case-insensitive)
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "off" | "0" => Some(LogLevel::Off),
            "error" | "err" | "1" => Some(LogLevel::Error),
            "warn" | "warning" | "2" => Some(LogLevel::Warn),
            "info" | "3" => Some(LogLevel::Info),
            "debug" | "4" => Some(LogLevel::Debug),
            "trace" | "5" => Some(LogLevel::Trace),
            _ => None,
        }
    }

    fn from_u8(val: u8) -> Self {
        match val {
            1 => LogLevel::Error,
            2 => LogLevel::Warn,
            3 => LogLevel::Info,
            4 => LogLevel::Debug,
            5 => LogLevel::Trace,
            _ => LogLevel::Off,
        }
    }

    /// Facade level, `None` for `Off`
    pub fn to_log_level(self) -> Option<log::Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(log::Level::Error),
            LogLevel::Warn => Some(log::Level::Warn),
            LogLevel::Info => Some(log::Level::Info),
            LogLevel::Debug => Some(log::Level::Debug),
            LogLevel::Trace => Some(log::Level::Trace),
        }
    }

    /// Filter for the facade, used when initialising env_logger
    pub fn to_level_filter(self) -> log::LevelFilter {
        self.to_log_level()
            .map(|l| l.to_level_filter())
            .unwrap_or(log::LevelFilter::Off)
    }
}

/// Pipeline component a message belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogCategory {
    /// Frame acquisition (device open, decode failures)
    Camera,
    /// Backend work (shader build, texture upload, draw)
    Render,
    /// Control changes and uniform sync
    Params,
    /// Frame loop state and timing
    Driver,
}

impl LogCategory {
    pub const ALL: [LogCategory; 4] = [
        LogCategory::Camera,
        LogCategory::Render,
        LogCategory::Params,
        LogCategory::Driver,
    ];

    fn index(self) -> usize {
        match self {
            LogCategory::Camera => 0,
            LogCategory::Render => 1,
            LogCategory::Params => 2,
            LogCategory::Driver => 3,
        }
    }

    /// `log` target for this category
    pub fn target(self) -> &'static str {
        match self {
            LogCategory::Camera => "halftone::camera",
            LogCategory::Render => "halftone::render",
            LogCategory::Params => "halftone::params",
            LogCategory::Driver => "halftone::driver",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "camera" => Some(LogCategory::Camera),
            "render" => Some(LogCategory::Render),
            "params" => Some(LogCategory::Params),
            "driver" => Some(LogCategory::Driver),
            _ => None,
        }
    }
}

const CATEGORY_COUNT: usize = LogCategory::ALL.len();

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Sliding window limiter, one window per category.
struct RateLimiter {
    max_logs_per_second: AtomicUsize,
    window_duration: Duration,
    timestamps: Mutex<[VecDeque<Instant>; CATEGORY_COUNT]>,
    dropped_counts: Mutex<[usize; CATEGORY_COUNT]>,
    last_drop_report: Mutex<[Option<Instant>; CATEGORY_COUNT]>,
}

impl RateLimiter {
    fn new(max_logs_per_second: usize) -> Self {
        Self {
            max_logs_per_second: AtomicUsize::new(max_logs_per_second),
            window_duration: Duration::from_secs(1),
            timestamps: Mutex::new(Default::default()),
            dropped_counts: Mutex::new([0; CATEGORY_COUNT]),
            last_drop_report: Mutex::new([None; CATEGORY_COUNT]),
        }
    }

    fn set_max_logs_per_second(&self, max: usize) {
        self.max_logs_per_second.store(max, Ordering::Relaxed);
    }

    fn get_max_logs_per_second(&self) -> usize {
        self.max_logs_per_second.load(Ordering::Relaxed)
    }

    /// Returns (allowed, dropped_count); dropped_count is `Some(n)` when
    /// the caller should report `n` suppressed messages.
    fn should_allow(&self, category: LogCategory) -> (bool, Option<usize>) {
        let now = Instant::now();
        let idx = category.index();

        let mut timestamps = lock(&self.timestamps);
        let mut dropped_counts = lock(&self.dropped_counts);
        let mut last_drop_report = lock(&self.last_drop_report);

        let window = &mut timestamps[idx];
        while let Some(&front) = window.front() {
            if now.duration_since(front) > self.window_duration {
                window.pop_front();
            } else {
                break;
            }
        }

        if window.len() < self.get_max_logs_per_second() {
            window.push_back(now);

            let dropped = dropped_counts[idx];
            if dropped > 0 {
                dropped_counts[idx] = 0;
                last_drop_report[idx] = Some(now);
                return (true, Some(dropped));
            }
            (true, None)
        } else {
            dropped_counts[idx] += 1;

            let should_report = match last_drop_report[idx] {
                None => true,
                Some(last) => now.duration_since(last) >= self.window_duration,
            };
            if should_report {
                let dropped = dropped_counts[idx];
                dropped_counts[idx] = 0;
                last_drop_report[idx] = Some(now);
                (false, Some(dropped))
            } else {
                (false, None)
            }
        }
    }
}

/// Global logging configuration
pub struct LogConfig {
    /// Applies to every category without an override
    global_level: AtomicU8,
    category_levels: [AtomicU8; CATEGORY_COUNT],
    rate_limiter: RateLimiter,
}

impl LogConfig {
    /// Everything Off, 60 messages per second per category
    fn new() -> Self {
        Self {
            global_level: AtomicU8::new(LogLevel::Off as u8),
            category_levels: Default::default(),
            rate_limiter: RateLimiter::new(60),
        }
    }

    pub fn global() -> &'static Self {
        use std::sync::OnceLock;
        static INSTANCE: OnceLock<LogConfig> = OnceLock::new();
        INSTANCE.get_or_init(LogConfig::new)
    }

    pub fn set_global_level(&self, level: LogLevel) {
        self.global_level.store(level as u8, Ordering::Relaxed);
    }

    pub fn get_global_level(&self) -> LogLevel {
        LogLevel::from_u8(self.global_level.load(Ordering::Relaxed))
    }

    pub fn set_level(&self, category: LogCategory, level: LogLevel) {
        self.category_levels[category.index()].store(level as u8, Ordering::Relaxed);
    }

    pub fn get_level(&self, category: LogCategory) -> LogLevel {
        LogLevel::from_u8(self.category_levels[category.index()].load(Ordering::Relaxed))
    }

    /// A category override wins when set; otherwise the global level applies.
    pub fn should_log(&self, category: LogCategory, level: LogLevel) -> bool {
        if level == LogLevel::Off {
            return false;
        }
        let category_level = self.get_level(category);
        if category_level != LogLevel::Off {
            level <= category_level
        } else {
            level <= self.get_global_level()
        }
    }

    /// Most verbose level any category can currently emit
    pub fn max_level(&self) -> LogLevel {
        LogCategory::ALL
            .into_iter()
            .map(|c| self.get_level(c))
            .fold(self.get_global_level(), LogLevel::max)
    }

    pub fn reset(&self) {
        self.set_global_level(LogLevel::Off);
        for category in LogCategory::ALL {
            self.set_level(category, LogLevel::Off);
        }
    }

    pub fn set_rate_limit(&self, max_logs_per_second: usize) {
        self.rate_limiter
            .set_max_logs_per_second(max_logs_per_second);
    }

    pub fn get_rate_limit(&self) -> usize {
        self.rate_limiter.get_max_logs_per_second()
    }
}

/// Log a message for `category` at `level`.
///
/// `message_fn` only runs when the category is enabled at that level and
/// the rate limiter lets the message through. Suppressed messages are
/// summarised by a warning once the window reopens.
pub fn log<F>(category: LogCategory, level: LogLevel, message_fn: F)
where
    F: FnOnce() -> String,
{
    let config = LogConfig::global();
    if !config.should_log(category, level) {
        return;
    }
    let Some(facade_level) = level.to_log_level() else {
        return;
    };

    let (allowed, dropped_count) = config.rate_limiter.should_allow(category);
    if let Some(count) = dropped_count.filter(|n| *n > 0) {
        log::warn!(
            target: category.target(),
            "rate limit exceeded, {} message(s) dropped in the last second",
            count
        );
    }
    if allowed {
        log::log!(target: category.target(), facade_level, "{}", message_fn());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("off"), Some(LogLevel::Off));
        assert_eq!(LogLevel::from_str("ERR"), Some(LogLevel::Error));
        assert_eq!(LogLevel::from_str("WARNING"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::from_str("3"), Some(LogLevel::Info));
        assert_eq!(LogLevel::from_str("Debug"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::from_str("trace"), Some(LogLevel::Trace));
        assert_eq!(LogLevel::from_str("verbose"), None);
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Off < LogLevel::Error);
        assert!(LogLevel::Error < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Trace);
    }

    #[test]
    fn test_facade_mapping() {
        assert_eq!(LogLevel::Off.to_log_level(), None);
        assert_eq!(LogLevel::Warn.to_log_level(), Some(log::Level::Warn));
        assert_eq!(LogLevel::Off.to_level_filter(), log::LevelFilter::Off);
        assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
    }

    #[test]
    fn test_category_targets_and_names() {
        for category in LogCategory::ALL {
            let name = category.target().trim_start_matches("halftone::");
            assert_eq!(LogCategory::from_str(name), Some(category));
        }
        assert_eq!(LogCategory::from_str("cpu"), None);
    }

    #[test]
    fn test_category_level_overrides_global() {
        let config = LogConfig::new();
        config.set_global_level(LogLevel::Error);
        config.set_level(LogCategory::Camera, LogLevel::Debug);

        assert!(config.should_log(LogCategory::Camera, LogLevel::Debug));
        assert!(!config.should_log(LogCategory::Camera, LogLevel::Trace));
        assert!(!config.should_log(LogCategory::Render, LogLevel::Warn));
        assert!(config.should_log(LogCategory::Render, LogLevel::Error));
        assert_eq!(config.max_level(), LogLevel::Debug);
    }

    #[test]
    fn test_off_is_never_logged() {
        let config = LogConfig::new();
        config.set_global_level(LogLevel::Trace);
        assert!(!config.should_log(LogCategory::Driver, LogLevel::Off));
    }

    #[test]
    fn test_reset() {
        let config = LogConfig::new();
        config.set_global_level(LogLevel::Trace);
        config.set_level(LogCategory::Params, LogLevel::Info);
        config.reset();
        assert_eq!(config.get_global_level(), LogLevel::Off);
        assert_eq!(config.get_level(LogCategory::Params), LogLevel::Off);
        assert_eq!(config.max_level(), LogLevel::Off);
    }

    #[test]
    fn test_rate_limiter_blocks_over_limit() {
        let limiter = RateLimiter::new(60);
        for _ in 0..60 {
            let (allowed, _) = limiter.should_allow(LogCategory::Render);
            assert!(allowed);
        }
        let (allowed, _) = limiter.should_allow(LogCategory::Render);
        assert!(!allowed, "61st message in one second should be dropped");
    }

    #[test]
    fn test_rate_limiter_per_category() {
        let limiter = RateLimiter::new(3);
        for _ in 0..3 {
            limiter.should_allow(LogCategory::Camera);
        }
        assert!(!limiter.should_allow(LogCategory::Camera).0);
        assert!(limiter.should_allow(LogCategory::Driver).0);
    }

    #[test]
    fn test_rate_limiter_reports_dropped_count() {
        let limiter = RateLimiter::new(5);
        for _ in 0..5 {
            limiter.should_allow(LogCategory::Driver);
        }
        // First drop reports immediately, the rest accumulate
        let (allowed, dropped) = limiter.should_allow(LogCategory::Driver);
        assert!(!allowed);
        assert_eq!(dropped, Some(1));
        for _ in 0..10 {
            limiter.should_allow(LogCategory::Driver);
        }

        std::thread::sleep(Duration::from_millis(1100));

        let (allowed, dropped) = limiter.should_allow(LogCategory::Driver);
        assert!(allowed);
        assert_eq!(dropped, Some(10));
    }
}
