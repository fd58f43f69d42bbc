//! Search recency guard
//!
//! Agents tend to append the year their training data ends in to search
//! queries. Any year token 2000-2029 older than the current year is treated
//! as stale unless the query opts out with a keyword such as "historical".

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::rules::{MatchSpec, Rule, RuleDecision, Scope};

/// Built-in search rules
pub const SEARCH_RULES: &[Rule] = &[Rule::new(
    "stale-search-year",
    Scope::Search,
    RuleDecision::Deny,
    MatchSpec::StaleYear,
    "",
)];

static YEAR_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(20[0-2][0-9])\b").unwrap());

/// Compiled stale-year check
#[derive(Debug, Clone)]
pub struct StaleYearGuard {
    /// Lowercased opt-out keywords
    opt_out: Vec<String>,
}

impl StaleYearGuard {
    pub fn new(opt_out_keywords: &[String]) -> Self {
        Self {
            opt_out: opt_out_keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// Year tokens in the query, in order of appearance, without duplicates
    pub fn years(query: &str) -> Vec<i32> {
        let mut years = Vec::new();
        for caps in YEAR_TOKEN.captures_iter(query) {
            if let Ok(year) = caps[1].parse::<i32>() {
                if !years.contains(&year) {
                    years.push(year);
                }
            }
        }
        years
    }

    fn opted_out(&self, query: &str) -> bool {
        let lowered = query.to_lowercase();
        self.opt_out.iter().any(|k| lowered.contains(k.as_str()))
    }

    /// Deny reason when `query` cites a year before `today`'s year
    pub fn check(&self, query: &str, today: NaiveDate) -> Option<String> {
        if query.trim().is_empty() || self.opted_out(query) {
            return None;
        }

        let current = today.year();
        let stale: Vec<String> = Self::years(query)
            .into_iter()
            .filter(|y| *y < current)
            .map(|y| y.to_string())
            .collect();
        if stale.is_empty() {
            return None;
        }

        let hint = match self.opt_out.first() {
            Some(keyword) => format!(
                " or add \"{}\" to the query if older material is really wanted",
                keyword
            ),
            None => String::new(),
        };

        Some(format!(
            "Search query cites {} but the current date is {} ({}). \
             Retry with {} instead of the stale year{}.",
            stale.join(", "),
            today.format("%B %Y"),
            today.format("%Y-%m"),
            current,
            hint
        ))
    }
}
