//! Integration tests for PreToolUse shell command checks

use hook_guard::{
    Config, Event, FixedClock, FixedEnvironment, GuardEngine, HookOutput, Verdict,
};

fn engine_with(config: Config) -> GuardEngine {
    GuardEngine::new(config)
}

fn respond(engine: &GuardEngine, command: &str) -> HookOutput {
    let json = serde_json::json!({
        "tool_name": "Bash",
        "tool_input": { "command": command }
    })
    .to_string();
    let event = Event::from_json(&json, None).unwrap();
    let clock = FixedClock::ymd(2026, 10, 18).unwrap();
    let decision = engine.check(&event, &clock, &FixedEnvironment::default());
    HookOutput::format(event.kind, &decision)
}

fn verdict(command: &str) -> Verdict {
    respond(&engine_with(Config::default()), command).verdict()
}

// ============================================================================
// Disallowed invocation shape: describing the working copy
// ============================================================================

#[test]
fn test_describe_without_revision_denied() {
    let output = respond(&engine_with(Config::default()), r#"jj describe -m "message""#);
    assert_eq!(output.verdict(), Verdict::Deny);
    let reason = output.reason().unwrap();
    assert!(reason.contains(r#"jj commit -m "message""#));
    assert!(reason.contains("jj describe -r <rev>"));
}

#[test]
fn test_corrective_flag_flips_verdict() {
    let messages = ["wip", "feat: add parser", "fix(x): y; z", "multi word message"];
    let corrections = ["-r abc123", "-r @-", "--revision=xyz", "-r@"];

    for message in messages {
        let message = shlex::try_quote(message).unwrap();
        let bad = format!("jj describe -m {}", message);
        assert_eq!(verdict(&bad), Verdict::Deny, "{}", bad);

        for fix in corrections {
            let good = format!("jj describe {} -m {}", fix, message);
            assert_eq!(verdict(&good), Verdict::NoOpinion, "{}", good);
            let good = format!("jj describe -m {} {}", message, fix);
            assert_eq!(verdict(&good), Verdict::NoOpinion, "{}", good);
        }
    }
}

#[test]
fn test_configured_program_name() {
    let mut config = Config::default();
    config.vcs.program = "vcs".to_string();
    let engine = engine_with(config);

    let output = respond(&engine, r#"vcs describe -m "message""#);
    assert_eq!(output.verdict(), Verdict::Deny);
    assert!(output.reason().unwrap().contains("vcs commit -m"));

    let output = respond(&engine, r#"vcs describe -r abc123 -m "message""#);
    assert_eq!(output.to_json(), r#"{"suppressOutput":true}"#);
}

// ============================================================================
// Interactive editor traps
// ============================================================================

#[test]
fn test_split_requires_fileset() {
    assert_eq!(verdict("jj split"), Verdict::Deny);
    assert_eq!(verdict("jj split -r @-"), Verdict::Deny);
    assert_eq!(verdict(r#"jj split -m "first part""#), Verdict::Deny);

    for fileset in ["src/", "Cargo.toml", "'glob:**/*.rs'", "a.rs b.rs"] {
        assert_eq!(verdict(&format!("jj split {}", fileset)), Verdict::NoOpinion);
        assert_eq!(
            verdict(&format!("jj split -r @- -m msg {}", fileset)),
            Verdict::NoOpinion
        );
    }
}

#[test]
fn test_split_reason_shows_required_argument() {
    let output = respond(&engine_with(Config::default()), "jj split");
    assert!(output.reason().unwrap().contains("jj split <fileset>"));
}

#[test]
fn test_editor_opening_subcommands_denied() {
    assert_eq!(verdict("jj describe"), Verdict::Deny);
    assert_eq!(verdict("jj commit"), Verdict::Deny);
    assert_eq!(verdict("jj commit -m 'done'"), Verdict::NoOpinion);
}

#[test]
fn test_help_never_denied() {
    assert_eq!(verdict("jj split --help"), Verdict::NoOpinion);
    assert_eq!(verdict("jj commit -h"), Verdict::NoOpinion);
}

// ============================================================================
// Compound commands and wrappers
// ============================================================================

#[test]
fn test_compound_command_checks_each_segment() {
    assert_eq!(verdict("jj st && jj split"), Verdict::Deny);
    assert_eq!(verdict("cd repo; jj describe -m x"), Verdict::Deny);
    assert_eq!(
        verdict(r#"jj describe -r @- -m "a && b" && jj new"#),
        Verdict::NoOpinion
    );
}

#[test]
fn test_redirections_and_background_do_not_hide_invocations() {
    for suffix in ["2>&1", "> /tmp/out", ">/tmp/out", "2>/dev/null", "&>log", "&", "2> err.log &"] {
        let command = format!(r#"jj describe -m "msg" {}"#, suffix);
        assert_eq!(verdict(&command), Verdict::Deny, "{}", command);
        let command = format!("jj split {}", suffix);
        assert_eq!(verdict(&command), Verdict::Deny, "{}", command);
        let command = format!("jj commit {}", suffix);
        assert_eq!(verdict(&command), Verdict::Deny, "{}", command);
    }

    assert_eq!(verdict("jj log & jj split"), Verdict::Deny);
    assert_eq!(verdict("jj split src/ 2>&1"), Verdict::NoOpinion);
    assert_eq!(verdict(r#"jj describe -r @- -m "msg" > /dev/null &"#), Verdict::NoOpinion);
}

#[test]
fn test_wrapped_invocations_are_seen() {
    assert_eq!(verdict("JJ_CONFIG=/tmp/x jj split"), Verdict::Deny);
    assert_eq!(verdict("timeout 30 jj describe -m x"), Verdict::Deny);
    assert_eq!(verdict("/opt/bin/jj split"), Verdict::Deny);
}

#[test]
fn test_unrelated_commands_pass() {
    for command in ["ls -la", "cargo test", "git status", "jj log -r ::@", "echo 'jj split'"] {
        let output = respond(&engine_with(Config::default()), command);
        assert_eq!(output.to_json(), r#"{"suppressOutput":true}"#, "{}", command);
    }
}

// ============================================================================
// Advisories and custom rules
// ============================================================================

#[test]
fn test_abandon_gets_advisory_context() {
    let output = respond(&engine_with(Config::default()), "jj abandon xyz");
    assert_eq!(output.verdict(), Verdict::NoOpinion);
    assert!(output.additional_context().unwrap().contains("jj op undo"));
    assert_eq!(output.suppress_output, Some(true));
}

#[test]
fn test_custom_rules_from_toml() {
    let config: Config = toml::from_str(
        r#"
        [[rules]]
        id = "allow-split-scripted"
        decision = "allow"
        pattern = "^jj split --tool scripted"
        reason = "scripted diff tool is non-interactive"

        [[rules]]
        id = "no-git-push"
        decision = "deny"
        pattern = "\\bgit push (\\S+)"
        reason = "Use `jj git push --remote $1`"
        "#,
    )
    .unwrap();
    let engine = engine_with(config);

    let output = respond(&engine, "jj split --tool scripted");
    assert_eq!(output.verdict(), Verdict::Allow);
    assert_eq!(output.reason(), Some("scripted diff tool is non-interactive"));

    let output = respond(&engine, "git push origin");
    assert_eq!(output.reason(), Some("Use `jj git push --remote origin`"));

    // Advisories from earlier segments ride along with an allow
    let output = respond(&engine, "jj abandon xyz && jj split --tool scripted");
    assert_eq!(output.verdict(), Verdict::Allow);
    assert!(output.additional_context().unwrap().contains("jj op undo"));
}

#[test]
fn test_non_shell_tool_ignored() {
    let engine = engine_with(Config::default());
    let json = r#"{"tool_name":"Read","tool_input":{"file_path":"/tmp/x"}}"#;
    let event = Event::from_json(json, None).unwrap();
    let clock = FixedClock::ymd(2026, 10, 18).unwrap();
    let decision = engine.check(&event, &clock, &FixedEnvironment::default());
    assert!(decision.is_no_opinion());
}
