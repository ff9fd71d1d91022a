use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the monitor loop.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// How long the event loop waits for an event before running the idle
    /// hooks. Default: 1s.
    pub idle_timeout: Duration,
    /// Granularity of the adapter's internal event poll while waiting.
    /// Default: 100ms.
    pub poll_interval: Duration,
    /// Directory handlers use for their data.
    /// Default: `$XDG_CONFIG_HOME/deskwatch`.
    pub config_dir: PathBuf,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(1),
            poll_interval: Duration::from_millis(100),
            config_dir: default_config_dir(),
        }
    }
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("deskwatch")
}

impl MonitorConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the idle timeout of the event loop
    ///
    /// # Panics
    /// Panics if the timeout is zero or too large (> 60 seconds)
    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.validate_idle_timeout(timeout);
        self.idle_timeout = timeout;
        self
    }

    /// Set the polling interval used while waiting for events
    ///
    /// # Panics
    /// Panics if the interval is zero or too large (> 10 seconds)
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.validate_poll_interval(interval);
        self.poll_interval = interval;
        self
    }

    /// Set the directory handlers keep their data under
    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = dir.into();
        self
    }

    fn validate_idle_timeout(&self, timeout: Duration) {
        if timeout.is_zero() {
            panic!("Idle timeout cannot be zero");
        }
        if timeout > Duration::from_secs(60) {
            panic!("Idle timeout cannot be greater than 60 seconds");
        }
    }

    fn validate_poll_interval(&self, interval: Duration) {
        if interval.is_zero() {
            panic!("Poll interval cannot be zero");
        }
        if interval > Duration::from_secs(10) {
            panic!("Poll interval cannot be greater than 10 seconds");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MonitorConfig::default();
        assert_eq!(config.idle_timeout, Duration::from_secs(1));
        assert_eq!(config.poll_interval, Duration::from_millis(100));
    }

    #[test]
    fn test_builder_pattern() {
        let config = MonitorConfig::new()
            .with_idle_timeout(Duration::from_millis(250))
            .with_poll_interval(Duration::from_millis(20))
            .with_config_dir("/tmp/deskwatch-test");
        assert_eq!(config.idle_timeout, Duration::from_millis(250));
        assert_eq!(config.poll_interval, Duration::from_millis(20));
        assert_eq!(config.config_dir, PathBuf::from("/tmp/deskwatch-test"));
    }

    #[test]
    #[should_panic(expected = "Idle timeout cannot be zero")]
    fn test_zero_idle_timeout_panics() {
        MonitorConfig::new().with_idle_timeout(Duration::ZERO);
    }

    #[test]
    #[should_panic(expected = "Idle timeout cannot be greater than 60 seconds")]
    fn test_large_idle_timeout_panics() {
        MonitorConfig::new().with_idle_timeout(Duration::from_secs(61));
    }

    #[test]
    #[should_panic(expected = "Poll interval cannot be zero")]
    fn test_zero_poll_interval_panics() {
        MonitorConfig::new().with_poll_interval(Duration::ZERO);
    }

    #[test]
    #[should_panic(expected = "Poll interval cannot be greater than 10 seconds")]
    fn test_large_poll_interval_panics() {
        MonitorConfig::new().with_poll_interval(Duration::from_secs(11));
    }
}
