//! Integration tests for the search-query recency guard

use hook_guard::{Config, Event, FixedClock, FixedEnvironment, GuardEngine, HookOutput, Verdict};

fn search(config: Config, query: &str, today: (i32, u32, u32)) -> HookOutput {
    let engine = GuardEngine::new(config);
    let json = serde_json::json!({
        "hook_event_name": "PreToolUse",
        "tool_name": "WebSearch",
        "tool_input": { "query": query }
    })
    .to_string();
    let event = Event::from_json(&json, None).unwrap();
    let clock = FixedClock::ymd(today.0, today.1, today.2).unwrap();
    let decision = engine.check(&event, &clock, &FixedEnvironment::default());
    HookOutput::format(event.kind, &decision)
}

fn verdict(query: &str) -> Verdict {
    search(Config::default(), query, (2026, 10, 18)).verdict()
}

#[test]
fn test_stale_year_denied_with_current_date() {
    let output = search(Config::default(), "framework patterns 2023", (2026, 10, 18));
    assert_eq!(output.verdict(), Verdict::Deny);
    assert_eq!(output.suppress_output, None);

    let reason = output.reason().unwrap();
    assert!(reason.contains("2023"));
    assert!(reason.contains("October 2026"));
    assert!(reason.contains("2026-10"));
    assert!(reason.contains("historical"));
}

#[test]
fn test_opt_out_keyword_passes() {
    let output = search(
        Config::default(),
        "historical framework evolution 2023",
        (2026, 10, 18),
    );
    assert_eq!(output.to_json(), r#"{"suppressOutput":true}"#);
    assert_eq!(verdict("Framework evolution 2023 (Historical)"), Verdict::NoOpinion);
}

#[test]
fn test_current_and_future_years_pass() {
    assert_eq!(verdict("rust release notes 2026"), Verdict::NoOpinion);
    assert_eq!(verdict("roadmap 2027"), Verdict::NoOpinion);
    assert_eq!(verdict("rust async book"), Verdict::NoOpinion);
}

#[test]
fn test_any_stale_year_denies() {
    let output = search(Config::default(), "compare 2024 and 2026 releases", (2026, 10, 18));
    assert_eq!(output.verdict(), Verdict::Deny);
    let reason = output.reason().unwrap();
    assert!(reason.contains("2024"));
}

#[test]
fn test_year_boundary_follows_clock() {
    let config = Config::default;
    assert_eq!(
        search(config(), "changelog 2025", (2025, 12, 31)).verdict(),
        Verdict::NoOpinion
    );
    assert_eq!(
        search(config(), "changelog 2025", (2026, 1, 1)).verdict(),
        Verdict::Deny
    );
}

#[test]
fn test_numbers_that_are_not_years_pass() {
    assert_eq!(verdict("error code 20231"), Verdict::NoOpinion);
    assert_eq!(verdict("port 8080 vs 3000"), Verdict::NoOpinion);
}

#[test]
fn test_empty_or_absent_query() {
    assert_eq!(verdict(""), Verdict::NoOpinion);
    assert_eq!(verdict("   "), Verdict::NoOpinion);

    let engine = GuardEngine::new(Config::default());
    let event = Event::from_json(r#"{"tool_name":"WebSearch","tool_input":{}}"#, None).unwrap();
    let clock = FixedClock::ymd(2026, 10, 18).unwrap();
    assert!(engine
        .check(&event, &clock, &FixedEnvironment::default())
        .is_no_opinion());
}

#[test]
fn test_custom_opt_out_keywords() {
    let config: Config = toml::from_str(
        r#"
        [search]
        opt_out_keywords = ["archive", "retrospective"]
        "#,
    )
    .unwrap();

    let output = search(config.clone(), "framework archive 2023", (2026, 10, 18));
    assert_eq!(output.verdict(), Verdict::NoOpinion);

    let output = search(config, "historical framework 2023", (2026, 10, 18));
    assert_eq!(output.verdict(), Verdict::Deny);
    assert!(output.reason().unwrap().contains("archive"));
}

#[test]
fn test_search_guard_disabled() {
    let mut config = Config::default();
    config.search.enabled = false;
    let output = search(config, "framework patterns 2023", (2026, 10, 18));
    assert_eq!(output.verdict(), Verdict::NoOpinion);
}

#[test]
fn test_warn_only_turns_denial_into_context() {
    let mut config = Config::default();
    config.general.warn_only = true;
    let output = search(config, "framework patterns 2023", (2026, 10, 18));
    assert_eq!(output.verdict(), Verdict::NoOpinion);
    let context = output.additional_context().unwrap();
    assert!(context.starts_with("[hook-guard:stale-search-year] would deny:"));
}
