//! Integration tests for the SessionStart context probe

use std::fs;

use hook_guard::config::{MarkerProbeConfig, ToolProbeConfig};
use hook_guard::probe::{Availability, MarkerState};
use hook_guard::{
    Config, ContextProbe, Event, EventKind, FixedClock, FixedEnvironment, GuardEngine,
    HookOutput, SystemEnvironment, Verdict,
};
use tempfile::TempDir;

fn session_output(config: Config, env: &FixedEnvironment) -> HookOutput {
    let engine = GuardEngine::new(config);
    let event = Event::from_json(r#"{"hook_event_name":"SessionStart","source":"startup"}"#, None)
        .unwrap();
    assert_eq!(event.kind, EventKind::SessionStart);
    let clock = FixedClock::ymd(2026, 10, 18).unwrap();
    let decision = engine.check(&event, &clock, env);
    HookOutput::format(event.kind, &decision)
}

#[test]
fn test_session_output_shape() {
    let env = FixedEnvironment::default()
        .with_tool("jj")
        .with_marker(".jj")
        .with_file("src/main.rs")
        .with_file("src/lib.rs")
        .with_file("README.md");
    let output = session_output(Config::default(), &env);

    assert_eq!(output.verdict(), Verdict::NoOpinion);
    assert_eq!(output.suppress_output, Some(true));

    let value: serde_json::Value = serde_json::from_str(&output.to_json()).unwrap();
    let specific = &value["hookSpecificOutput"];
    assert_eq!(specific["hookEventName"], "SessionStart");
    assert!(specific.get("permissionDecision").is_none());

    let context = specific["additionalContext"].as_str().unwrap();
    assert!(context.contains("- jj: installed"));
    assert!(context.contains("- bd: missing (install: `"));
    assert!(context.contains("- jj workspace (.jj): initialized"));
    assert!(context.contains("- issue tracker (.beads): not initialized (run `bd init`)"));
    assert!(context.contains("- languages: Rust 2, Markdown 1"));
}

#[test]
fn test_failed_check_degrades_alone() {
    let env = FixedEnvironment::default()
        .with_tool("bd")
        .with_unreadable(".jj")
        .with_marker(".beads");
    let output = session_output(Config::default(), &env);
    let context = output.additional_context().unwrap();

    assert!(context.contains("- jj workspace (.jj): unknown (check failed)"));
    assert!(context.contains("- issue tracker (.beads): initialized"));
    assert!(context.contains("- bd: installed"));
}

#[test]
fn test_preamble_and_custom_checks() {
    let config: Config = toml::from_str(
        r#"
        [session]
        preamble = "Workspace status:"

        [[session.tools]]
        name = "rg"
        install = "cargo install ripgrep"

        [[session.markers]]
        name = "pre-commit"
        path = ".pre-commit-config.yaml"
        init = "pre-commit install"

        [session.languages]
        enabled = false
        "#,
    )
    .unwrap();
    let env = FixedEnvironment::default().with_file("main.rs");
    let output = session_output(config, &env);

    assert_eq!(
        output.additional_context(),
        Some(
            "Workspace status:\n\
             - rg: missing (install: `cargo install ripgrep`)\n\
             - pre-commit (.pre-commit-config.yaml): not initialized (run `pre-commit install`)"
        )
    );
}

#[test]
fn test_session_disabled() {
    let mut config = Config::default();
    config.session.enabled = false;
    let output = session_output(config, &FixedEnvironment::default());
    assert_eq!(output.to_json(), r#"{"suppressOutput":true}"#);
}

#[test]
fn test_probe_against_real_workspace() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join(".jj")).unwrap();
    fs::create_dir_all(dir.path().join("src/nested")).unwrap();
    fs::create_dir_all(dir.path().join("target/debug")).unwrap();
    fs::write(dir.path().join("src/lib.rs"), "").unwrap();
    fs::write(dir.path().join("src/nested/mod.rs"), "").unwrap();
    fs::write(dir.path().join("script.py"), "").unwrap();
    fs::write(dir.path().join("target/debug/build.rs"), "").unwrap();

    let mut config = Config::default().session;
    config.tools = vec![ToolProbeConfig {
        name: "hook-guard-test-no-such-tool".to_string(),
        install: None,
    }];
    config.markers = vec![
        MarkerProbeConfig {
            name: "jj workspace".to_string(),
            path: ".jj".to_string(),
            init: None,
        },
        MarkerProbeConfig {
            name: "environment".to_string(),
            path: ".envrc".to_string(),
            init: None,
        },
    ];

    let probe = ContextProbe::new(config);
    let env = SystemEnvironment::new(dir.path());
    let result = probe.inspect(&env);

    assert_eq!(
        result.tool_availability.get("hook-guard-test-no-such-tool"),
        Some(&Availability::Missing)
    );
    assert_eq!(result.repository_markers.get("jj workspace"), Some(&MarkerState::Present));
    assert_eq!(result.repository_markers.get("environment"), Some(&MarkerState::Absent));
    // target/ is excluded
    assert_eq!(result.language_counts.get("Rust"), Some(&2));
    assert_eq!(result.language_counts.get("Python"), Some(&1));
    assert!(!result.languages_truncated);

    let text = probe.render(&result);
    assert!(text.contains("- hook-guard-test-no-such-tool: missing"));
    assert!(text.contains("- environment (.envrc): not initialized"));
}

#[test]
fn test_language_scan_limit() {
    let dir = TempDir::new().unwrap();
    for i in 0..10 {
        fs::write(dir.path().join(format!("f{}.rs", i)), "").unwrap();
    }

    let mut config = Config::default().session;
    config.tools.clear();
    config.markers.clear();
    config.languages.max_files = 4;

    let probe = ContextProbe::new(config);
    let result = probe.inspect(&SystemEnvironment::new(dir.path()));
    assert!(result.languages_truncated);
    assert_eq!(result.language_counts.get("Rust"), Some(&4));
    assert!(probe
        .render(&result)
        .ends_with("- languages: Rust 4 (scan limit reached)"));
}
