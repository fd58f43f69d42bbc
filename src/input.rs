//! Input parsing for Claude Code hook JSON format
//!
//! Parses the JSON input from stdin that Claude Code sends to hooks and
//! resolves it into an [`Event`].

use serde::Deserialize;
use std::io::Read;

use crate::config::Config;
use crate::error::GuardError;

/// Lifecycle point the hook was invoked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    SessionStart,
    PreToolUse,
}

impl EventKind {
    /// Parse a host event name or a CLI spelling
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "SessionStart" | "session-start" | "session_start" => Some(EventKind::SessionStart),
            "PreToolUse" | "pre-tool-use" | "pre_tool_use" => Some(EventKind::PreToolUse),
            _ => None,
        }
    }

    /// Name used in the `hookEventName` output field
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::SessionStart => "SessionStart",
            EventKind::PreToolUse => "PreToolUse",
        }
    }
}

/// Raw input structure from Claude Code hooks
#[derive(Debug, Default, Deserialize)]
pub struct HookInput {
    /// Hook event name (e.g., "PreToolUse", "SessionStart")
    #[serde(default)]
    pub hook_event_name: Option<String>,

    /// Name of the tool being invoked (e.g., "Bash", "WebSearch")
    #[serde(default)]
    pub tool_name: Option<String>,

    /// Tool-specific input parameters
    #[serde(default)]
    pub tool_input: Option<ToolInput>,

    /// Search query supplied outside `tool_input`
    #[serde(default)]
    pub query: Option<String>,

    #[serde(default)]
    pub session_id: Option<String>,

    #[serde(default)]
    pub cwd: Option<String>,

    /// Session start source (e.g., "startup", "resume")
    #[serde(default)]
    pub source: Option<String>,
}

/// Tool-specific input variants
#[derive(Debug, Clone, PartialEq)]
pub enum ToolInput {
    /// Shell command execution
    Shell { command: String },

    /// Search request
    Search { query: String },

    /// Anything else - ignored by the rules
    Other { raw: serde_json::Value },
}

impl<'de> Deserialize<'de> for ToolInput {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;

        if let Some(obj) = value.as_object() {
            if let Some(command) = obj.get("command").and_then(|v| v.as_str()) {
                return Ok(ToolInput::Shell {
                    command: command.to_string(),
                });
            }

            if let Some(query) = obj.get("query").and_then(|v| v.as_str()) {
                return Ok(ToolInput::Search {
                    query: query.to_string(),
                });
            }
        }

        Ok(ToolInput::Other { raw: value })
    }
}

impl HookInput {
    /// Parse input from JSON string
    pub fn from_json(json: &str) -> Result<Self, GuardError> {
        if json.trim().is_empty() {
            return Err(GuardError::EmptyInput);
        }
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse at most `max_bytes` from `reader`
    pub fn read_from<R: Read>(reader: R, max_bytes: usize) -> Result<Self, GuardError> {
        let mut buf = String::with_capacity(256);
        // One extra byte detects overflow
        reader.take(max_bytes as u64 + 1).read_to_string(&mut buf)?;
        if buf.len() > max_bytes {
            return Err(GuardError::InputTooLarge(max_bytes));
        }
        Self::from_json(&buf)
    }
}

/// One hook invocation, resolved from [`HookInput`]
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub kind: EventKind,
    pub tool_name: Option<String>,
    pub tool_input: Option<ToolInput>,
    pub session_id: Option<String>,
    pub cwd: Option<String>,
    pub source: Option<String>,
}

impl Event {
    /// Resolve the event kind and normalize the payload.
    ///
    /// `forced` comes from the command line and only applies when the payload
    /// does not name its own event.
    pub fn from_input(input: HookInput, forced: Option<EventKind>) -> Result<Self, GuardError> {
        let kind = match input.hook_event_name.as_deref() {
            Some(name) => EventKind::from_name(name)
                .ok_or_else(|| GuardError::UnknownEvent(Some(name.to_string())))?,
            None => match forced {
                Some(kind) => kind,
                None if input.tool_name.is_some() => EventKind::PreToolUse,
                None => return Err(GuardError::UnknownEvent(None)),
            },
        };

        let tool_input = match (input.tool_input, input.query) {
            (Some(ToolInput::Search { query }), _) => Some(ToolInput::Search { query }),
            (Some(ToolInput::Other { .. }), Some(query)) | (None, Some(query)) => {
                Some(ToolInput::Search { query })
            }
            (other, _) => other,
        };

        Ok(Event {
            kind,
            tool_name: input.tool_name,
            tool_input,
            session_id: input.session_id,
            cwd: input.cwd,
            source: input.source,
        })
    }

    /// Parse JSON straight into an event
    pub fn from_json(json: &str, forced: Option<EventKind>) -> Result<Self, GuardError> {
        Self::from_input(HookInput::from_json(json)?, forced)
    }

    /// A session-start event with no payload
    pub fn session_start() -> Self {
        Event {
            kind: EventKind::SessionStart,
            tool_name: None,
            tool_input: None,
            session_id: None,
            cwd: None,
            source: None,
        }
    }

    /// Shell command text, when the tool is a shell-execution tool
    pub fn command<'a>(&'a self, config: &Config) -> Option<&'a str> {
        let tool = self.tool_name.as_deref()?;
        match &self.tool_input {
            Some(ToolInput::Shell { command }) if config.is_shell_tool(tool) => Some(command),
            _ => None,
        }
    }

    /// Query text, when the tool is a search tool
    pub fn query<'a>(&'a self, config: &Config) -> Option<&'a str> {
        let tool = self.tool_name.as_deref()?;
        match &self.tool_input {
            Some(ToolInput::Search { query }) if config.is_search_tool(tool) => Some(query),
            _ => None,
        }
    }

    /// Get a summary of the input for logging
    pub fn summary(&self) -> String {
        let tool = self.tool_name.as_deref().unwrap_or("-");
        match &self.tool_input {
            Some(ToolInput::Shell { command }) => {
                let truncated: String = command.chars().take(100).collect();
                if truncated.len() < command.len() {
                    format!("{}: {}...", tool, truncated)
                } else {
                    format!("{}: {}", tool, command)
                }
            }
            Some(ToolInput::Search { query }) => format!("{}: {}", tool, query),
            Some(ToolInput::Other { .. }) => format!("{}: <opaque input>", tool),
            None => match self.kind {
                EventKind::SessionStart => format!(
                    "SessionStart: {}",
                    self.source.as_deref().unwrap_or("startup")
                ),
                EventKind::PreToolUse => format!("{}: <no input>", tool),
            },
        }
    }
}
