//! User-defined rules from `[[rules]]` configuration entries
//!
//! Custom rules are regex rules evaluated ahead of the built-in tables, so an
//! `allow` or `inert` entry can carve out exceptions to a built-in denial.

use regex::Regex;
use serde::Deserialize;

use crate::rules::{CompiledRule, Matcher, RuleDecision, Scope};

/// A `[[rules]]` entry
#[derive(Debug, Clone, Deserialize)]
pub struct RuleConfig {
    pub id: String,

    #[serde(default = "default_scope")]
    pub scope: Scope,

    /// `allow` is reported to the host as an explicit permission grant, which
    /// bypasses its permission prompt; `inert` only stops further checks
    pub decision: RuleDecision,

    /// Regex that must match
    pub pattern: String,

    /// Regex that cancels the match
    #[serde(default)]
    pub unless: Option<String>,

    /// Reason text; `$1` / `${name}` expand capture groups
    pub reason: String,
}

fn default_scope() -> Scope {
    Scope::Shell
}

impl RuleConfig {
    /// Compile this entry
    pub fn compile(&self) -> Result<CompiledRule, regex::Error> {
        let regex = Regex::new(&self.pattern)?;
        let unless = self.unless.as_deref().map(Regex::new).transpose()?;

        Ok(CompiledRule {
            id: self.id.clone(),
            scope: self.scope,
            decision: self.decision,
            matcher: Matcher::Pattern { regex, unless },
            reason: self.reason.clone(),
        })
    }
}

/// Compile all entries, skipping (with a warning) those that do not compile
pub fn compile_all(entries: &[RuleConfig]) -> Vec<CompiledRule> {
    entries
        .iter()
        .filter_map(|entry| match entry.compile() {
            Ok(rule) => Some(rule),
            Err(e) => {
                eprintln!("Warning: Skipping rule {}: {}", entry.id, e);
                None
            }
        })
        .collect()
}
