//! hook-guard - Tool-invocation guard and context injector for Claude Code
//!
//! This library decides Claude Code hook events: it blocks shell commands
//! that would corrupt version-control state or hang on an interactive
//! editor, rejects web searches pinned to a stale year, and injects a
//! workspace summary at session start.
//!
//! # Features
//!
//! - **VCS rules**: structured inspection of `jj` invocations (program configurable)
//! - **Recency guard**: denies search queries citing a past year
//! - **Context probe**: tools on PATH, workspace markers, language mix
//! - **Custom rules**: regex rules from TOML configuration
//! - **Fail open**: malformed input or internal errors never block the host
//!
//! # Example
//!
//! ```
//! use hook_guard::{Config, Event, FixedClock, FixedEnvironment, GuardEngine};
//!
//! let engine = GuardEngine::new(Config::default());
//! let clock = FixedClock::ymd(2026, 10, 18).unwrap();
//!
//! let input = r#"{"tool_name":"Bash","tool_input":{"command":"jj describe -m \"wip\""}}"#;
//! let event = Event::from_json(input, None).unwrap();
//!
//! let decision = engine.check(&event, &clock, &FixedEnvironment::default());
//! assert!(decision.is_deny());
//! ```

pub mod audit;
pub mod config;
pub mod engine;
pub mod error;
pub mod hook;
pub mod input;
pub mod output;
pub mod parser;
pub mod probe;
pub mod rules;

// Re-exports for convenience
pub use config::Config;
pub use engine::clock::{Clock, FixedClock, SystemClock};
pub use engine::GuardEngine;
pub use error::GuardError;
pub use input::{Event, EventKind, HookInput, ToolInput};
pub use output::{Decision, HookOutput, Verdict};
pub use probe::env::{Environment, FixedEnvironment, SystemEnvironment};
pub use probe::{ContextProbe, ContextProbeResult};
