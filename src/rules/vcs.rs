//! Version-control rules for shell commands
//!
//! The working copy is itself a change that the VCS snapshots on every
//! command, and several subcommands fall back to an interactive editor when
//! their arguments are incomplete. Agents run without a terminal, so those
//! invocations either corrupt history or hang.

use crate::rules::{MatchSpec, Positional, Rule, RuleDecision, Scope};

/// Built-in rules, in evaluation order
pub const VCS_RULES: &[Rule] = &[
    Rule::new(
        "vcs-help",
        Scope::Shell,
        RuleDecision::Inert,
        MatchSpec::Invocation {
            subcommands: &[],
            with_any: &["-h", "--help"],
            without: &[],
            positional: Positional::Any,
        },
        "Help output never modifies the repository",
    ),
    Rule::new(
        "describe-working-copy",
        Scope::Shell,
        RuleDecision::Deny,
        MatchSpec::Invocation {
            subcommands: &["describe", "desc"],
            with_any: &["-m", "--message", "--stdin"],
            without: &["-r", "--revision", "--revisions"],
            positional: Positional::Absent,
        },
        "`{program} describe -m` without a revision sets the description of the \
         working-copy change (@), a transient snapshot that keeps absorbing edits. \
         To record finished work as a commit run `{program} commit -m \"message\"`. \
         To describe an existing change name it explicitly: \
         `{program} describe -r <rev> -m \"message\"`.",
    ),
    Rule::new(
        "describe-opens-editor",
        Scope::Shell,
        RuleDecision::Deny,
        MatchSpec::Invocation {
            subcommands: &["describe", "desc"],
            with_any: &[],
            without: &["-m", "--message", "--stdin", "--no-edit"],
            positional: Positional::Any,
        },
        "`{program} describe` without -m opens an interactive editor, which cannot run \
         in this non-interactive session. Pass the description inline: \
         `{program} describe -r <rev> -m \"message\"`.",
    ),
    Rule::new(
        "commit-opens-editor",
        Scope::Shell,
        RuleDecision::Deny,
        MatchSpec::Invocation {
            subcommands: &["commit", "ci"],
            with_any: &[],
            without: &["-m", "--message"],
            positional: Positional::Any,
        },
        "`{program} commit` without -m opens an interactive editor, which cannot run \
         in this non-interactive session. Pass the message inline: \
         `{program} commit -m \"message\"`.",
    ),
    Rule::new(
        "split-without-fileset",
        Scope::Shell,
        RuleDecision::Deny,
        MatchSpec::Invocation {
            subcommands: &["split"],
            with_any: &[],
            without: &[],
            positional: Positional::Absent,
        },
        "`{program} split` without a fileset opens the interactive diff editor, which \
         cannot run in this non-interactive session. Name the paths that go into the \
         first change: `{program} split <fileset> -m \"message\"` \
         (for example `{program} split src/lib.rs -m \"message\"`).",
    ),
    Rule::new(
        "abandon-advisory",
        Scope::Shell,
        RuleDecision::Flag,
        MatchSpec::Invocation {
            subcommands: &["abandon"],
            with_any: &[],
            without: &[],
            positional: Positional::Any,
        },
        "`{program} abandon` discards the change and rebases its descendants. If this \
         was a mistake, `{program} op undo` restores the previous state.",
    ),
    Rule::new(
        "git-mutation-advisory",
        Scope::Shell,
        RuleDecision::Flag,
        MatchSpec::Pattern {
            pattern: r"(?:^|\s)(?:\S*/)?git\s+(commit|checkout|switch|rebase|stash|reset)\b",
            unless: None,
        },
        "`git $1` mutates the repository behind {program}'s back. In a {program} \
         workspace prefer the {program} equivalent so the operation log stays complete.",
    ),
];
