//! Wrapper command detection and unwrapping
//!
//! Handles prefixes like `env`, `timeout` or `NAME=value` that run another
//! command, so rules see the real program.

use super::shell::is_env_assignment;

/// Wrapper commands recognised in front of the real command
pub const DEFAULT_WRAPPERS: &[&str] = &["env", "timeout", "nice", "nohup", "time", "command"];

/// Strip assignments and wrappers, returning the tokens of the wrapped command
///
/// Example: `["env", "A=1", "timeout", "30", "jj", "split"]` -> `["jj", "split"]`
pub fn unwrap_tokens(tokens: &[String]) -> &[String] {
    let mut rest = tokens;

    loop {
        let Some(first) = rest.first() else {
            return rest;
        };

        if is_env_assignment(first) {
            rest = &rest[1..];
            continue;
        }

        rest = match first.as_str() {
            "env" => skip_env(&rest[1..]),
            "timeout" => skip_timeout(&rest[1..]),
            "nice" => skip_options(&rest[1..], &["-n", "--adjustment"]),
            "nohup" | "time" | "command" => skip_options(&rest[1..], &[]),
            _ => return rest,
        };
    }
}

/// env [-i] [-u NAME] [NAME=value]... command
fn skip_env(tokens: &[String]) -> &[String] {
    let mut idx = 0;
    while idx < tokens.len() {
        let token = tokens[idx].as_str();
        if matches!(token, "-u" | "--unset" | "-C" | "--chdir" | "-S" | "--split-string") {
            idx += 2;
        } else if token.starts_with('-') || is_env_assignment(token) {
            idx += 1;
        } else {
            break;
        }
    }
    &tokens[idx.min(tokens.len())..]
}

/// timeout [options] duration command
fn skip_timeout(tokens: &[String]) -> &[String] {
    let mut idx = 0;
    while idx < tokens.len() {
        let token = tokens[idx].as_str();
        if matches!(token, "-s" | "--signal" | "-k" | "--kill-after") {
            idx += 2;
        } else if token.starts_with('-') {
            idx += 1;
        } else {
            // duration
            idx += 1;
            break;
        }
    }
    &tokens[idx.min(tokens.len())..]
}

/// Skip leading options, treating `with_value` flags as taking an argument
fn skip_options<'a>(tokens: &'a [String], with_value: &[&str]) -> &'a [String] {
    let mut idx = 0;
    while idx < tokens.len() {
        let token = tokens[idx].as_str();
        if with_value.contains(&token) {
            idx += 2;
        } else if token.starts_with('-') {
            idx += 1;
        } else {
            break;
        }
    }
    &tokens[idx.min(tokens.len())..]
}
