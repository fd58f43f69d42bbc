//! One hook invocation, from raw stdin bytes to the response document
//!
//! Every failure on the way resolves to the suppressed no-opinion response.

use std::io::Read;

use crate::audit::{AuditEntry, AuditLogger};
use crate::engine::clock::Clock;
use crate::engine::GuardEngine;
use crate::input::{Event, EventKind, HookInput};
use crate::output::{Decision, HookOutput};
use crate::probe::env::Environment;

/// Per-invocation inputs that come from outside the payload
pub struct Invocation<'a> {
    pub engine: &'a GuardEngine,
    pub clock: &'a dyn Clock,
    pub env: &'a dyn Environment,
    /// Event kind named on the command line
    pub forced_kind: Option<EventKind>,
    /// Set when HOOK_GUARD_DISABLED is present
    pub disabled: bool,
}

impl Invocation<'_> {
    /// Read one payload from `reader` and produce the response
    pub fn process<R: Read>(&self, reader: R, logger: &mut AuditLogger) -> HookOutput {
        let max_bytes = self.engine.config().general.max_input_bytes;
        let parsed = HookInput::read_from(reader, max_bytes)
            .and_then(|input| Event::from_input(input, self.forced_kind));

        let event = match parsed {
            Ok(event) => event,
            // A session-start hook needs no payload to probe the workspace
            Err(_) if self.forced_kind == Some(EventKind::SessionStart) => Event::session_start(),
            Err(e) => {
                if let Err(log_err) = logger.log(&AuditEntry::error(e.to_string())) {
                    eprintln!("Warning: Failed to write audit log: {}", log_err);
                }
                return HookOutput::suppressed();
            }
        };

        let decision = if self.disabled {
            Decision::no_opinion()
        } else {
            self.engine.check(&event, self.clock, self.env)
        };

        if let Err(e) = logger.log_decision(&event, &decision, self.disabled) {
            eprintln!("Warning: Failed to write audit log: {}", e);
        }

        HookOutput::format(event.kind, &decision)
    }
}
