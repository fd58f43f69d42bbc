//! Output formatting for Claude Code hook responses
//!
//! Produces the JSON envelope expected by Claude Code hooks. Fields that do
//! not apply to an event are omitted, never emitted as null.

use serde::{Deserialize, Serialize};

use crate::input::EventKind;

/// Verdict carried by a [`Decision`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Deny,
    NoOpinion,
}

/// Decision result from the guard engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Explicitly allow the operation, with any advisories gathered on the way
    Allow {
        rule_id: String,
        reason: String,
        context: Option<String>,
    },

    /// Deny the operation
    Deny { rule_id: String, reason: String },

    /// Let the host decide; optionally inject advisory context
    NoOpinion { context: Option<String> },
}

impl Decision {
    /// Create an allow decision
    pub fn allow(rule_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Decision::Allow {
            rule_id: rule_id.into(),
            reason: reason.into(),
            context: None,
        }
    }

    /// Attach advisory text to an allow; empty text and other verdicts are unchanged
    pub fn with_context(self, text: impl Into<String>) -> Self {
        let text = text.into();
        match self {
            Decision::Allow {
                rule_id, reason, ..
            } if !text.trim().is_empty() => Decision::Allow {
                rule_id,
                reason,
                context: Some(text),
            },
            other => other,
        }
    }

    /// Create a deny decision
    pub fn deny(rule_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Decision::Deny {
            rule_id: rule_id.into(),
            reason: reason.into(),
        }
    }

    /// No opinion, nothing to add
    pub fn no_opinion() -> Self {
        Decision::NoOpinion { context: None }
    }

    /// No opinion with advisory text; empty text counts as none
    pub fn advise(context: impl Into<String>) -> Self {
        let context = context.into();
        Decision::NoOpinion {
            context: if context.trim().is_empty() {
                None
            } else {
                Some(context)
            },
        }
    }

    pub fn verdict(&self) -> Verdict {
        match self {
            Decision::Allow { .. } => Verdict::Allow,
            Decision::Deny { .. } => Verdict::Deny,
            Decision::NoOpinion { .. } => Verdict::NoOpinion,
        }
    }

    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow { .. })
    }

    pub fn is_deny(&self) -> bool {
        matches!(self, Decision::Deny { .. })
    }

    pub fn is_no_opinion(&self) -> bool {
        matches!(self, Decision::NoOpinion { .. })
    }

    /// Get the rule ID if applicable
    pub fn rule_id(&self) -> Option<&str> {
        match self {
            Decision::Allow { rule_id, .. } | Decision::Deny { rule_id, .. } => Some(rule_id),
            Decision::NoOpinion { .. } => None,
        }
    }

    /// Get the reason if applicable
    pub fn reason(&self) -> Option<&str> {
        match self {
            Decision::Allow { reason, .. } | Decision::Deny { reason, .. } => Some(reason),
            Decision::NoOpinion { .. } => None,
        }
    }

    /// Advisory context, if any
    pub fn context(&self) -> Option<&str> {
        match self {
            Decision::Allow { context, .. } | Decision::NoOpinion { context } => context.as_deref(),
            Decision::Deny { .. } => None,
        }
    }

    /// Whether the human-visible transcript should stay quiet
    pub fn suppress_terminal_output(&self) -> bool {
        !self.is_deny()
    }
}

/// Main output structure for Claude Code hooks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookOutput {
    #[serde(rename = "suppressOutput", default, skip_serializing_if = "Option::is_none")]
    pub suppress_output: Option<bool>,

    #[serde(rename = "hookSpecificOutput", default, skip_serializing_if = "Option::is_none")]
    pub hook_specific_output: Option<HookSpecificOutput>,
}

/// Hook-specific output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookSpecificOutput {
    #[serde(rename = "hookEventName")]
    pub hook_event_name: String,

    /// "allow" or "deny"; PreToolUse only
    #[serde(rename = "permissionDecision", default, skip_serializing_if = "Option::is_none")]
    pub permission_decision: Option<String>,

    #[serde(rename = "permissionDecisionReason", default, skip_serializing_if = "Option::is_none")]
    pub permission_decision_reason: Option<String>,

    #[serde(rename = "additionalContext", default, skip_serializing_if = "Option::is_none")]
    pub additional_context: Option<String>,
}

impl HookOutput {
    /// The bare no-opinion response
    pub fn suppressed() -> Self {
        HookOutput {
            suppress_output: Some(true),
            hook_specific_output: None,
        }
    }

    /// Format a decision for the given lifecycle event
    pub fn format(kind: EventKind, decision: &Decision) -> Self {
        let suppress_output = if decision.suppress_terminal_output() {
            Some(true)
        } else {
            None
        };

        let hook_specific_output = match (kind, decision) {
            // "allow" also skips the host's permission prompt
            (EventKind::PreToolUse, Decision::Allow { reason, context, .. }) => {
                Some(HookSpecificOutput {
                    hook_event_name: kind.as_str().to_string(),
                    permission_decision: Some("allow".to_string()),
                    permission_decision_reason: Some(reason.clone()),
                    additional_context: context.clone(),
                })
            }
            (EventKind::PreToolUse, Decision::Deny { reason, .. }) => Some(HookSpecificOutput {
                hook_event_name: kind.as_str().to_string(),
                permission_decision: Some("deny".to_string()),
                permission_decision_reason: Some(reason.clone()),
                additional_context: None,
            }),
            // SessionStart has no permission semantics; only context survives
            (_, decision) => decision.context().map(|context| HookSpecificOutput {
                hook_event_name: kind.as_str().to_string(),
                permission_decision: None,
                permission_decision_reason: None,
                additional_context: Some(context.to_string()),
            }),
        };

        HookOutput {
            suppress_output,
            hook_specific_output,
        }
    }

    /// Re-parse an emitted document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Verdict expressed by this document
    pub fn verdict(&self) -> Verdict {
        match self
            .hook_specific_output
            .as_ref()
            .and_then(|h| h.permission_decision.as_deref())
        {
            Some("allow") => Verdict::Allow,
            Some("deny") => Verdict::Deny,
            _ => Verdict::NoOpinion,
        }
    }

    /// Reason carried by this document
    pub fn reason(&self) -> Option<&str> {
        self.hook_specific_output
            .as_ref()
            .and_then(|h| h.permission_decision_reason.as_deref())
    }

    /// Injected context carried by this document
    pub fn additional_context(&self) -> Option<&str> {
        self.hook_specific_output
            .as_ref()
            .and_then(|h| h.additional_context.as_deref())
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"suppressOutput":true}"#.to_string())
    }
}
