//! Structured Logging & Tracing
//!
//! Provides structured logging via the `tracing` crate with:
//! - Level-based filtering (TRACE/DEBUG/INFO/WARN/ERROR)
//! - Per-module filters for the loot pipeline stages
//! - Spans for timing loot-set generation
//! - Idempotent subscriber initialization

use serde::{Deserialize, Serialize};
use std::sync::Once;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Configuration for tracing initialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracingConfig {
    pub default_level: LogLevel,
    pub module_filters: Vec<(String, LogLevel)>,
    pub show_thread_ids: bool,
    pub show_targets: bool,
    pub show_file_line: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_level: LogLevel::Info,
            module_filters: vec![
                ("treasure_core::loot".to_string(), LogLevel::Info),
                ("treasure_core::mutate".to_string(), LogLevel::Warn),
                ("treasure_core::tables".to_string(), LogLevel::Warn),
                ("treasure_core::balance".to_string(), LogLevel::Info),
            ],
            show_thread_ids: false,
            show_targets: true,
            show_file_line: false,
        }
    }
}

impl TracingConfig {
    pub fn to_env_filter_string(&self) -> String {
        let mut parts = vec![self.default_level.as_str().to_string()];
        for (module, level) in &self.module_filters {
            parts.push(format!("{}={}", module, level.as_str()));
        }
        parts.join(",")
    }
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing with default settings (idempotent)
pub fn init_tracing_default() {
    init_tracing(&TracingConfig::default());
}

/// Initialize tracing with custom config (idempotent, first call wins).
/// `RUST_LOG` overrides the configured filters when set.
pub fn init_tracing(config: &TracingConfig) {
    let filter_str = config.to_env_filter_string();
    let config = config.clone();
    TRACING_INIT.call_once(move || {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(config.show_targets)
            .with_thread_ids(config.show_thread_ids)
            .with_file(config.show_file_line)
            .with_line_number(config.show_file_line)
            .compact();

        // A host application may already have installed a subscriber
        let _ = subscriber.try_init();
    });
}

/// Guard that keeps an info span entered for the duration of an operation
pub struct TimingSpan {
    _span: tracing::span::EnteredSpan,
}

impl TimingSpan {
    /// Span for one loot-set generation
    pub fn loot_set(profile_id: u32, tier: u8) -> Self {
        let span = tracing::info_span!("loot_set", profile = profile_id, tier = tier);
        Self {
            _span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_string() {
        let config = TracingConfig::default();
        let filter = config.to_env_filter_string();
        assert!(filter.starts_with("info"));
        assert!(filter.contains("treasure_core::mutate=warn"));
        assert!(filter.contains("treasure_core::loot=info"));
    }

    #[test]
    fn test_init_is_idempotent() {
        init_tracing_default();
        init_tracing(&TracingConfig {
            default_level: LogLevel::Trace,
            ..Default::default()
        });
        let _span = TimingSpan::loot_set(1, 3);
        tracing::info!("still alive");
    }
}
