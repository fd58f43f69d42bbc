//! Invocation classifier
//!
//! Rules are evaluated strictly in declaration order. Within a segment the
//! first Deny, Allow or Inert match ends evaluation; Flag matches only add
//! advisory text. Across segments the first Deny wins, then the first Allow.

use crate::output::Decision;
use crate::parser::Segment;
use crate::rules::{CompiledRule, EvalContext, RuleDecision, Scope};

/// Running state while walking segments
#[derive(Default)]
struct Verdicts {
    allow: Option<Decision>,
    advisories: Vec<String>,
}

impl Verdicts {
    /// Apply one match; returns a decision when evaluation must stop entirely
    fn apply(&mut self, rule: &CompiledRule, reason: String) -> Step {
        match rule.decision {
            RuleDecision::Deny => Step::Return(Decision::deny(rule.id.as_str(), reason)),
            RuleDecision::Allow => {
                if self.allow.is_none() {
                    self.allow = Some(Decision::allow(rule.id.as_str(), reason));
                }
                Step::NextSegment
            }
            RuleDecision::Inert => Step::NextSegment,
            RuleDecision::Flag => {
                if !self.advisories.contains(&reason) {
                    self.advisories.push(reason);
                }
                Step::NextRule
            }
        }
    }

    fn finish(self) -> Decision {
        let advisories = self.advisories.join("\n\n");
        match self.allow {
            Some(allow) => allow.with_context(advisories),
            None => Decision::advise(advisories),
        }
    }
}

enum Step {
    Return(Decision),
    NextSegment,
    NextRule,
}

/// Classify shell segments against the shell-scoped rules
pub fn classify_segments(rules: &[CompiledRule], segments: &[Segment]) -> Decision {
    let mut verdicts = Verdicts::default();

    for segment in segments {
        for rule in rules.iter().filter(|r| r.scope == Scope::Shell) {
            let Some(reason) = rule.match_segment(segment) else {
                continue;
            };
            match verdicts.apply(rule, reason) {
                Step::Return(decision) => return decision,
                Step::NextSegment => break,
                Step::NextRule => {}
            }
        }
    }

    verdicts.finish()
}

/// Classify a search query against the search-scoped rules
pub fn classify_query(rules: &[CompiledRule], query: &str, ctx: &EvalContext) -> Decision {
    let mut verdicts = Verdicts::default();

    for rule in rules.iter().filter(|r| r.scope == Scope::Search) {
        let Some(reason) = rule.match_query(query, ctx) else {
            continue;
        };
        match verdicts.apply(rule, reason) {
            Step::Return(decision) => return decision,
            Step::NextSegment => break,
            Step::NextRule => {}
        }
    }

    verdicts.finish()
}
