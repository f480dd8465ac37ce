//! Structured configuration issues.
//!
//! Validation never fails fast: every problem found is returned as a
//! [`ConfigIssue`] so the caller can print all of them and decide whether
//! any is fatal.
//!
//! # Examples
//!
//! ```
//! use boardroom_domain::config::{ConfigIssue, ConfigIssueCode, Severity};
//!
//! let issue = ConfigIssue::warning(
//!     ConfigIssueCode::ZeroVetoRounds,
//!     "max_veto_rounds = 0 escalates every split",
//! );
//! assert!(!issue.is_fatal());
//! ```

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// `max_veto_rounds = 0`: every HEAD split escalates immediately.
    ZeroVetoRounds,
    /// A round deadline of zero hours lapses on the next sweep.
    ZeroRoundDeadline,
    /// The sweep interval is zero.
    ZeroSweepInterval,
    /// A string field holds a value outside its allowed set.
    InvalidEnumValue {
        field: String,
        value: String,
        valid_values: Vec<String>,
    },
    /// The webhook channel is enabled without a URL.
    MissingWebhookUrl,
    /// The server listen address does not parse.
    InvalidListenAddr,
    /// The channel bus capacity is zero.
    ZeroChannelCapacity,
}

/// A detected issue in the loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{level}: {}", self.message)
    }
}
