//! The `--headless` binary against the demo and fixture databases.

use super::common::{run_demo, run_demo_json, run_fixture, run_headless};

const CHART_QUERY: &str = r"key:tab,key:ctrl+u,type:SELECT name\, score FROM PerformanceStats LIMIT 5,key:enter";

#[test]
fn test_text_report() {
    let (code, stdout, _) = run_demo("key:esc", &[]);

    assert_eq!(code, 0, "{stdout}");
    assert!(stdout.contains("PGA Tour Analytics"));
    assert!(stdout.contains("Data from Players"));
    assert!(stdout.trim_end().ends_with("Steps: 1 run | Assertions: 0 passed, 0 failed"));
}

#[test]
fn test_initial_state() {
    let (code, json) = run_demo_json("key:esc");
    let state = &json["state"];

    assert_eq!(code, 0);
    assert_eq!(state["selected_table"], "Players");
    assert_eq!(state["input_text"], "SELECT * FROM Players LIMIT 10");
    assert_eq!(state["has_chart"], false);
    assert!(state["preview_rows"].as_u64().is_some_and(|n| n > 0));
}

#[test]
fn test_selecting_a_table_rewrites_the_query() {
    let (code, json) = run_demo_json("key:down,key:down,key:down,key:enter");

    assert_eq!(code, 0);
    assert_eq!(json["state"]["selected_table"], "PerformanceStats");
    assert_eq!(json["state"]["input_text"], "SELECT * FROM PerformanceStats LIMIT 10");
}

#[test]
fn test_query_builds_chart() {
    let events = format!(
        r"{CHART_QUERY},assert:state:has_chart=true,assert:state:result_columns=name\,score,assert:contains:Visualization of Query Results"
    );
    let (code, json) = run_demo_json(&events);
    let state = &json["state"];

    assert_eq!(code, 0, "{json}");
    assert_eq!(json["assertions"]["passed"], 3);
    assert_eq!(state["result_rows"], 5);
    assert_eq!(state["x_axis"], "name");
    assert_eq!(state["y_axis"][0], "score");
    assert_eq!(state["chart_kind"], "Scatter");
}

#[test]
fn test_bad_query_shows_banner() {
    let events = "key:tab,key:ctrl+u,type:SELEC * FROM X,key:enter,\
                  assert:contains:Error executing query,assert:state:has_chart=false";
    let (code, stdout, _) = run_demo(events, &[]);

    assert_eq!(code, 0, "{stdout}");
}

#[test]
fn test_failed_assertion_exits_nonzero() {
    let (code, json) = run_demo_json("assert:contains:goodbye");

    assert_eq!(code, 1);
    assert_eq!(json["assertions"]["passed"], 0);
    assert_eq!(json["assertions"]["failed"], 1);
}

#[test]
fn test_screen_size() {
    let (code, stdout, _) = run_demo("key:esc", &["--size", "90x30", "--output", "json"]);
    assert_eq!(code, 0);

    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let lines = json["screen"].as_array().unwrap();
    assert!(lines.len() <= 30);
    assert!(lines
        .iter()
        .filter_map(|l| l.as_str())
        .all(|l| l.chars().count() <= 90));
}

#[test]
fn test_events_are_required() {
    let (code, _, stderr) = run_headless(&["--headless", "--mock-db"]);

    assert_eq!(code, 1);
    assert!(stderr.contains("--headless requires --events"), "{stderr}");
}

#[test]
fn test_unknown_step_is_rejected() {
    let (code, _, stderr) = run_demo("click:here", &[]);

    assert_eq!(code, 1);
    assert!(stderr.contains("Invalid step 'click:here'"), "{stderr}");
}

#[test]
fn test_seed_file() {
    let (code, stdout, _) = run_fixture("seed.sql", "assert:contains:Fixture Player");
    assert_eq!(code, 0, "{stdout}");
}

#[test]
fn test_preview_error_clears_on_next_table() {
    // Only Players exists, so the second table fails to preview
    let events = "assert:contains:Lone Player,key:down,assert:contains:Error executing query,\
                  key:up,assert:state:error=";
    let (code, stdout, _) = run_fixture("players_only.sql", events);
    assert_eq!(code, 0, "{stdout}");
}
