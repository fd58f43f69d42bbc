//! Shell tokenization
//!
//! This is not a shell parser. Compound commands are split on control
//! operators outside quotes and each piece is tokenized with shlex; heredocs
//! and substitutions are left as plain words. Redirections are dropped from
//! the word list so they never read as arguments.

use once_cell::sync::Lazy;
use regex::Regex;

/// Redirection word: optional fd or `&`, operator, optional attached target
static REDIRECTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[0-9]*|&)(?:>>|>&|>\||<<<|<<|<&|<>|>|<)(\S*)$").unwrap()
});

/// Split a command at shell operators (`;`, `&&`, `||`, `|`, `|&`, `&`,
/// newline), respecting single/double quotes and backslash escapes.
///
/// An `&` that belongs to a redirection (`2>&1`, `&>file`) does not split.
pub fn split_compound_command(command: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut buf = String::new();

    let chars: Vec<char> = command.chars().collect();
    let len = chars.len();
    let mut i = 0;
    let (mut sq, mut dq, mut esc) = (false, false, false);

    while i < len {
        let c = chars[i];

        if esc {
            buf.push(c);
            esc = false;
            i += 1;
            continue;
        }
        if c == '\\' && !sq {
            esc = true;
            buf.push(c);
            i += 1;
            continue;
        }
        if c == '\'' && !dq {
            sq = !sq;
        } else if c == '"' && !sq {
            dq = !dq;
        }
        if sq || dq || c == '\'' || c == '"' {
            buf.push(c);
            i += 1;
            continue;
        }

        let two = if i + 1 < len {
            Some((c, chars[i + 1]))
        } else {
            None
        };
        if matches!(two, Some(('&', '&')) | Some(('|', '|')) | Some(('|', '&'))) {
            parts.push(std::mem::take(&mut buf));
            i += 2;
            continue;
        }
        if c == '&' {
            let prev = if i > 0 { Some(chars[i - 1]) } else { None };
            let next = two.map(|(_, n)| n);
            if !matches!(prev, Some('>') | Some('<')) && next != Some('>') {
                parts.push(std::mem::take(&mut buf));
                i += 1;
                continue;
            }
        }
        if c == '|' || c == ';' || c == '\n' {
            parts.push(std::mem::take(&mut buf));
            i += 1;
            continue;
        }

        buf.push(c);
        i += 1;
    }
    parts.push(buf);

    parts
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

/// Tokenize a shell command into words
/// Uses shlex for proper shell quoting handling
pub fn tokenize(command: &str) -> Option<Vec<String>> {
    shlex::split(command)
}

/// Remove redirections (`2>&1`, `>out`, `> out`, `<in`, `&>log`) and a
/// trailing background `&` from a word list
pub fn strip_redirections(words: Vec<String>) -> Vec<String> {
    let mut kept = Vec::with_capacity(words.len());
    let mut words = words.into_iter();

    while let Some(word) = words.next() {
        if word == "&" {
            continue;
        }
        match REDIRECTION.captures(&word) {
            Some(caps) => {
                // Bare operator: the target is the next word
                if caps.get(1).is_some_and(|t| t.as_str().is_empty()) {
                    words.next();
                }
            }
            None => kept.push(word),
        }
    }

    kept
}

/// Whether a word is a `NAME=value` environment assignment
pub fn is_env_assignment(word: &str) -> bool {
    match word.split_once('=') {
        Some((name, _)) => {
            !name.is_empty()
                && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
                && name
                    .chars()
                    .next()
                    .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        }
        None => false,
    }
}

/// Basename of a program word: `/usr/local/bin/jj` -> `jj`
pub fn program_name(word: &str) -> &str {
    match word.rsplit_once('/') {
        Some((_, name)) if !name.is_empty() => name,
        _ => word,
    }
}
