//! Shell parsing utilities for hook-guard
//!
//! Provides compound-command splitting, tokenization and wrapper unwrapping.

pub mod shell;
pub mod wrapper;

/// One simple command from a compound command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Raw segment text, as written
    pub text: String,

    /// Words of the wrapped command; empty if the text could not be tokenized
    pub words: Vec<String>,
}

impl Segment {
    /// Program basename, if the segment has one
    pub fn program(&self) -> Option<&str> {
        self.words.first().map(|w| shell::program_name(w))
    }
}

/// Split a command line into segments ready for rule matching
pub fn segments(command: &str) -> Vec<Segment> {
    shell::split_compound_command(command)
        .into_iter()
        .map(|text| {
            let words = shell::tokenize(&text)
                .map(|tokens| {
                    let tokens = shell::strip_redirections(tokens);
                    wrapper::unwrap_tokens(&tokens).to_vec()
                })
                .unwrap_or_default();
            Segment { text, words }
        })
        .collect()
}
