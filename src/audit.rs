//! JSONL audit logging for hook-guard
//!
//! Records each decision as one JSON line on stderr. Stdout belongs to the
//! hook response, and the guard never writes files.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::{self, Write};

use crate::input::Event;
use crate::output::Decision;

/// Log level for audit entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    Allowed,
    Blocked,
    NoOpinion,
    Disabled,
    Error,
}

/// An audit log entry
#[derive(Debug, Serialize)]
pub struct AuditEntry {
    /// Timestamp of the decision
    pub timestamp: DateTime<Utc>,

    /// Lifecycle event ("PreToolUse", "SessionStart", or "-" when unparsed)
    pub event: String,

    pub level: LogLevel,

    /// Tool that was invoked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,

    /// Rule ID that matched (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,

    /// Summary of the input
    pub input_summary: String,

    /// Reason or advisory text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Session ID (if provided)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl AuditEntry {
    /// Create a new audit entry from an event and its decision
    pub fn new(event: &Event, decision: &Decision, disabled: bool) -> Self {
        let (level, rule_id, reason) = if disabled {
            (LogLevel::Disabled, None, Some("HOOK_GUARD_DISABLED".to_string()))
        } else {
            match decision {
                Decision::Allow {
                    rule_id, reason, ..
                } => {
                    (LogLevel::Allowed, Some(rule_id.clone()), Some(reason.clone()))
                }
                Decision::Deny { rule_id, reason } => {
                    (LogLevel::Blocked, Some(rule_id.clone()), Some(reason.clone()))
                }
                Decision::NoOpinion { context } => (LogLevel::NoOpinion, None, context.clone()),
            }
        };

        Self {
            timestamp: Utc::now(),
            event: event.kind.as_str().to_string(),
            level,
            tool: event.tool_name.clone(),
            rule_id,
            input_summary: event.summary(),
            reason,
            session_id: event.session_id.clone(),
        }
    }

    /// Entry for input that never became an event
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            event: "-".to_string(),
            level: LogLevel::Error,
            tool: None,
            rule_id: None,
            input_summary: String::new(),
            reason: Some(message.into()),
            session_id: None,
        }
    }
}

/// Audit logger
pub struct AuditLogger {
    writer: Option<Box<dyn Write>>,
}

impl AuditLogger {
    /// Logger writing to stderr
    pub fn stderr() -> Self {
        Self {
            writer: Some(Box::new(io::stderr())),
        }
    }

    /// Logger writing to any sink
    pub fn to_writer(writer: impl Write + 'static) -> Self {
        Self {
            writer: Some(Box::new(writer)),
        }
    }

    /// Log an audit entry
    pub fn log(&mut self, entry: &AuditEntry) -> Result<(), io::Error> {
        if let Some(ref mut writer) = self.writer {
            let json = serde_json::to_string(entry)?;
            writeln!(writer, "{}", json)?;
            writer.flush()?;
        }
        Ok(())
    }

    /// Log a decision
    pub fn log_decision(
        &mut self,
        event: &Event,
        decision: &Decision,
        disabled: bool,
    ) -> Result<(), io::Error> {
        let entry = AuditEntry::new(event, decision, disabled);
        self.log(&entry)
    }

    /// Check if logging is enabled
    pub fn is_enabled(&self) -> bool {
        self.writer.is_some()
    }
}

/// Create a disabled logger (for when audit logging is off)
impl Default for AuditLogger {
    fn default() -> Self {
        Self { writer: None }
    }
}
