use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

pub const MIN_PERF_SUMMARY_INTERVAL: u64 = 1;
pub const MAX_PERF_SUMMARY_INTERVAL: u64 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Directive for `tracing_subscriber::EnvFilter`.
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub level: LogLevel,
    /// Log a query performance summary every this many queries.
    pub perf_summary_interval: u64,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            perf_summary_interval: 200,
        }
    }
}

impl LoggingSettings {
    pub(crate) fn apply_patch(
        &mut self,
        patch: LoggingSettingsPatch,
    ) {
        if let Some(v) = patch.level {
            self.level = v;
        }
        if let Some(v) = patch.perf_summary_interval {
            self.perf_summary_interval = v;
        }
    }

    pub(crate) fn normalize(&mut self) {
        self.perf_summary_interval =
            self.perf_summary_interval.clamp(MIN_PERF_SUMMARY_INTERVAL, MAX_PERF_SUMMARY_INTERVAL);
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct LoggingSettingsPatch {
    pub(crate) level: Option<LogLevel>,
    pub(crate) perf_summary_interval: Option<u64>,
    #[serde(flatten)]
    pub(crate) _extra: HashMap<String, Value>,
}
