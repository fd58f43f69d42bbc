//! Guard engine for hook-guard
//!
//! Owns the compiled rule table and the context probe, and dispatches each
//! event to the right one.

pub mod classifier;
pub mod clock;

use crate::config::Config;
use crate::input::{Event, EventKind};
use crate::output::Decision;
use crate::parser;
use crate::probe::env::Environment;
use crate::probe::ContextProbe;
use crate::rules::{self, custom, recency, vcs, CompiledRule, EvalContext};

use clock::Clock;

/// The main guard engine
pub struct GuardEngine {
    config: Config,
    rules: Vec<CompiledRule>,
    probe: ContextProbe,
}

impl GuardEngine {
    /// Compile the rule table for `config`
    pub fn new(config: Config) -> Self {
        let mut rules = custom::compile_all(&config.rules);

        if config.vcs.enabled {
            rules.extend(rules::compile_builtin(
                vcs::VCS_RULES,
                &config.vcs.program,
                &config.vcs.value_flags,
                &[],
            ));
        }

        if config.search.enabled {
            rules.extend(rules::compile_builtin(
                recency::SEARCH_RULES,
                &config.vcs.program,
                &[],
                &config.search.opt_out_keywords,
            ));
        }

        let probe = ContextProbe::new(config.session.clone());

        Self {
            config,
            rules,
            probe,
        }
    }

    /// Main entry point: decide one event
    pub fn check(&self, event: &Event, clock: &dyn Clock, env: &dyn Environment) -> Decision {
        if !self.config.general.enabled {
            return Decision::no_opinion();
        }

        match event.kind {
            EventKind::SessionStart => self.session_context(env),
            EventKind::PreToolUse => {
                let ctx = EvalContext {
                    today: clock.today(),
                };
                self.check_tool_use(event, &ctx)
            }
        }
    }

    /// Classify a pre-tool-use event
    pub fn check_tool_use(&self, event: &Event, ctx: &EvalContext) -> Decision {
        let decision = if let Some(command) = event.command(&self.config) {
            self.check_command(command)
        } else if let Some(query) = event.query(&self.config) {
            self.check_query(query, ctx)
        } else {
            Decision::no_opinion()
        };

        if self.config.general.warn_only {
            if let Decision::Deny { rule_id, reason } = decision {
                return Decision::advise(format!(
                    "[hook-guard:{}] would deny: {}",
                    rule_id, reason
                ));
            }
        }

        decision
    }

    /// Check a shell command
    pub fn check_command(&self, command: &str) -> Decision {
        if command.trim().is_empty() {
            return Decision::no_opinion();
        }
        classifier::classify_segments(&self.rules, &parser::segments(command))
    }

    /// Check a search query
    pub fn check_query(&self, query: &str, ctx: &EvalContext) -> Decision {
        if query.trim().is_empty() {
            return Decision::no_opinion();
        }
        classifier::classify_query(&self.rules, query, ctx)
    }

    /// Build the session-start advisory
    pub fn session_context(&self, env: &dyn Environment) -> Decision {
        if !self.config.session.enabled {
            return Decision::no_opinion();
        }
        Decision::advise(self.probe.advisory(env))
    }

    /// Compiled rules, in evaluation order
    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
