//! Pattern rules for hook-guard
//!
//! Built-in rule tables are `const` data; [`CompiledRule`] is the form the
//! classifier evaluates, built once at startup from the tables and from
//! `[[rules]]` entries in the configuration.

pub mod custom;
pub mod recency;
pub mod vcs;

use chrono::NaiveDate;
use regex::Regex;
use serde::Deserialize;

use crate::parser::Segment;

/// What a matching rule asserts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleDecision {
    /// Block the tool call
    Deny,

    /// Explicitly permit the tool call
    Allow,

    /// Stop evaluating without an opinion
    Inert,

    /// Record the reason as advisory context and keep evaluating
    Flag,
}

/// Which tool input a rule inspects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Shell command text of a shell-execution tool
    Shell,

    /// Query text of a search tool
    Search,
}

/// Whether a positional argument must be present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Positional {
    Any,
    Absent,
    Present,
}

/// How a built-in rule matches
#[derive(Debug, Clone)]
pub enum MatchSpec {
    /// Regex over the raw segment text
    Pattern {
        pattern: &'static str,
        unless: Option<&'static str>,
    },

    /// Token-level inspection of `<program> <subcommand> ...`
    Invocation {
        /// Empty matches any subcommand
        subcommands: &'static [&'static str],
        /// At least one must be present (empty: no requirement)
        with_any: &'static [&'static str],
        /// None may be present
        without: &'static [&'static str],
        positional: Positional,
    },

    /// Four-digit year older than the current one
    StaleYear,
}

/// A built-in rule definition
#[derive(Debug, Clone)]
pub struct Rule {
    /// Unique identifier for this rule
    pub id: &'static str,

    pub scope: Scope,

    pub decision: RuleDecision,

    pub matcher: MatchSpec,

    /// Human-readable reason; `{program}` expands to the configured program
    pub reason: &'static str,
}

impl Rule {
    /// Create a new rule
    pub const fn new(
        id: &'static str,
        scope: Scope,
        decision: RuleDecision,
        matcher: MatchSpec,
        reason: &'static str,
    ) -> Self {
        Self {
            id,
            scope,
            decision,
            matcher,
            reason,
        }
    }
}

/// Inputs a rule may consult besides the command text
#[derive(Debug, Clone)]
pub struct EvalContext {
    /// Today's date from the injected clock
    pub today: NaiveDate,
}

/// Token-level invocation shape
#[derive(Debug, Clone)]
pub struct InvocationShape {
    pub program: String,
    pub subcommands: Vec<String>,
    pub with_any: Vec<String>,
    pub without: Vec<String>,
    pub positional: Positional,
    /// Flags that consume the following word
    pub value_flags: Vec<String>,
}

/// Parsed arguments of one invocation
#[derive(Debug, Default)]
struct Invocation<'a> {
    subcommand: Option<&'a str>,
    flags: Vec<&'a str>,
    positionals: Vec<&'a str>,
}

impl InvocationShape {
    fn takes_value(&self, flag: &str) -> bool {
        self.value_flags.iter().any(|f| f == flag)
    }

    /// Split words after the program into subcommand, flags and positionals
    fn parse<'a>(&self, args: &'a [String]) -> Invocation<'a> {
        let mut inv = Invocation::default();
        let mut idx = 0;
        let mut flags_done = false;

        while idx < args.len() {
            let word = args[idx].as_str();
            idx += 1;

            if !flags_done && word == "--" {
                flags_done = true;
                continue;
            }
            if !flags_done && word.starts_with('-') && word.len() > 1 {
                inv.flags.push(word);
                // `--flag=value` and `-mvalue` carry their own value
                if !word.contains('=') && self.takes_value(word) {
                    idx += 1;
                }
                continue;
            }
            if inv.subcommand.is_none() {
                inv.subcommand = Some(word);
            } else {
                inv.positionals.push(word);
            }
        }

        inv
    }

    /// Whether `flag` appears among the parsed flags in any spelling
    fn has_flag(inv: &Invocation<'_>, flag: &str) -> bool {
        inv.flags.iter().any(|f| {
            if *f == flag {
                return true;
            }
            if flag.starts_with("--") {
                f.strip_prefix(flag).is_some_and(|rest| rest.starts_with('='))
            } else {
                // Short flags may carry an attached value: -mmsg, -r@-
                flag.len() == 2 && !f.starts_with("--") && f.starts_with(flag)
            }
        })
    }

    fn matches(&self, segment: &Segment) -> bool {
        let Some(program) = segment.program() else {
            return false;
        };
        if program != self.program {
            return false;
        }

        let inv = self.parse(&segment.words[1..]);
        let Some(subcommand) = inv.subcommand else {
            return false;
        };
        if !self.subcommands.is_empty() && !self.subcommands.iter().any(|s| s == subcommand) {
            return false;
        }
        if !self.with_any.is_empty() && !self.with_any.iter().any(|f| Self::has_flag(&inv, f)) {
            return false;
        }
        if self.without.iter().any(|f| Self::has_flag(&inv, f)) {
            return false;
        }

        match self.positional {
            Positional::Any => true,
            Positional::Absent => inv.positionals.is_empty(),
            Positional::Present => !inv.positionals.is_empty(),
        }
    }
}

/// Compiled matcher
#[derive(Debug, Clone)]
pub enum Matcher {
    Pattern { regex: Regex, unless: Option<Regex> },
    Invocation(InvocationShape),
    StaleYear(recency::StaleYearGuard),
}

/// A rule ready for evaluation
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub id: String,
    pub scope: Scope,
    pub decision: RuleDecision,
    pub matcher: Matcher,
    pub reason: String,
}

impl CompiledRule {
    /// Evaluate against one shell segment; returns the rendered reason on match
    pub fn match_segment(&self, segment: &Segment) -> Option<String> {
        match &self.matcher {
            Matcher::Pattern { regex, unless } => {
                if unless.as_ref().is_some_and(|u| u.is_match(&segment.text)) {
                    return None;
                }
                let caps = regex.captures(&segment.text)?;
                let mut reason = String::new();
                caps.expand(&self.reason, &mut reason);
                Some(reason)
            }
            Matcher::Invocation(shape) => shape.matches(segment).then(|| self.reason.clone()),
            Matcher::StaleYear(_) => None,
        }
    }

    /// Evaluate against a search query; returns the rendered reason on match
    pub fn match_query(&self, query: &str, ctx: &EvalContext) -> Option<String> {
        match &self.matcher {
            Matcher::Pattern { regex, unless } => {
                if unless.as_ref().is_some_and(|u| u.is_match(query)) {
                    return None;
                }
                let caps = regex.captures(query)?;
                let mut reason = String::new();
                caps.expand(&self.reason, &mut reason);
                Some(reason)
            }
            Matcher::StaleYear(guard) => guard.check(query, ctx.today),
            Matcher::Invocation(_) => None,
        }
    }
}

/// Compile the built-in rules for `program`.
///
/// A pattern that fails to compile leaves its rule out; it can never match.
pub fn compile_builtin(
    rules: &[Rule],
    program: &str,
    value_flags: &[String],
    opt_out_keywords: &[String],
) -> Vec<CompiledRule> {
    rules
        .iter()
        .filter_map(|rule| {
            let matcher = match &rule.matcher {
                MatchSpec::Pattern { pattern, unless } => {
                    let pattern = pattern.replace("{program}", &regex::escape(program));
                    let regex = Regex::new(&pattern).ok()?;
                    let unless = match unless {
                        Some(u) => Some(Regex::new(&u.replace("{program}", &regex::escape(program))).ok()?),
                        None => None,
                    };
                    Matcher::Pattern { regex, unless }
                }
                MatchSpec::Invocation {
                    subcommands,
                    with_any,
                    without,
                    positional,
                } => Matcher::Invocation(InvocationShape {
                    program: program.to_string(),
                    subcommands: subcommands.iter().map(|s| s.to_string()).collect(),
                    with_any: with_any.iter().map(|s| s.to_string()).collect(),
                    without: without.iter().map(|s| s.to_string()).collect(),
                    positional: *positional,
                    value_flags: value_flags.to_vec(),
                }),
                MatchSpec::StaleYear => {
                    Matcher::StaleYear(recency::StaleYearGuard::new(opt_out_keywords))
                }
            };

            Some(CompiledRule {
                id: rule.id.to_string(),
                scope: rule.scope,
                decision: rule.decision,
                matcher,
                reason: rule.reason.replace("{program}", program),
            })
        })
        .collect()
}
