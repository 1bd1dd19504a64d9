//! End-to-end generation tests against the data fixtures

use contribgraph_core::tooltip::TooltipBody;
use contribgraph_core::{
    generate_page, load_data, render_tooltip, run, write_page, CalendarGrid, GraphConfig,
    GraphError, RawConfig, WeekStart,
};
use std::fs;
use std::path::{Path, PathBuf};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn config_for(fixture: &str, output: &Path) -> GraphConfig {
    RawConfig {
        title: Some("Study Year".to_string()),
        data_path: Some(fixture_path(fixture).display().to_string()),
        year: Some("2024".to_string()),
        output_path: Some(output.display().to_string()),
        ..RawConfig::default()
    }
    .resolve()
    .unwrap()
}

#[test]
fn test_run_writes_page() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("site").join("index.html");
    let summary = run(&config_for("study-2024.json", &output)).unwrap();

    assert_eq!(summary.output_path, output);
    assert_eq!(summary.days, 366);
    assert_eq!(summary.active_days, 7);
    assert_eq!(summary.total_occurrences, 19);
    assert_eq!(summary.events, 5);

    let html = fs::read_to_string(&output).unwrap();
    assert!(html.contains("<title>Study Year</title>"));
    assert_eq!(dir_entries(&dir.path().join("site")), ["index.html"]);
}

fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_write_page_leaves_neighbouring_files_alone() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("index.html");
    let neighbour = dir.path().join("index.html.tmp");
    fs::write(&neighbour, "keep me").unwrap();

    write_page(&output, "<html></html>").unwrap();
    write_page(&output, "<html>again</html>").unwrap();

    assert_eq!(fs::read_to_string(&output).unwrap(), "<html>again</html>");
    assert_eq!(fs::read_to_string(&neighbour).unwrap(), "keep me");
    assert_eq!(dir_entries(dir.path()), ["index.html", "index.html.tmp"]);
}

#[test]
fn test_page_encodes_fixture_days() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for("study-2024.json", &dir.path().join("index.html"));
    let data = load_data(&config.data_path, config.year).unwrap();
    let html = generate_page(&config, &data).unwrap();

    // Single code, five times: saturated, not striped
    assert!(html.contains(
        r#"data-date="2024-01-04" data-events="[[&quot;Sport&quot;,5]]" style="background-color: rgba(251, 140, 0, 1);""#
    ));
    // 3×Physics + 1×Programming: 0.75 / 0.25
    assert!(html.contains(
        "data-date=\"2024-01-05\" data-events=\"[[&quot;Physics&quot;,3],[&quot;Programming&quot;,1]]\" \
         style=\"background: repeating-linear-gradient(45deg, #e53935 0px, #e53935 7.5px, #43a047 7.5px, #43a047 10px);\""
    ));
    // Explicitly empty entry
    assert!(html.contains(
        r#"data-date="2024-03-05" data-events="[]" style="background-color: #ebedf0;""#
    ));
    // Repeated date entries merged before encoding
    assert!(html.contains(
        r#"data-date="2024-07-14" data-events="[[&quot;Programming&quot;,2],[&quot;Math&quot;,1]]""#
    ));
}

#[test]
fn test_sunday_start_shifts_padding() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_for("study-2024.json", &dir.path().join("index.html"));
    config.week_start = WeekStart::Sunday;
    let data = load_data(&config.data_path, config.year).unwrap();
    let html = generate_page(&config, &data).unwrap();
    let first_cell = html
        .split("<div class=\"graph\">")
        .nth(1)
        .and_then(|rest| rest.trim_start().lines().next())
        .unwrap();
    assert_eq!(first_cell.trim(), r#"<div class="day day-empty"></div>"#);
}

#[test]
fn test_tooltip_reads_back_generated_payload() {
    let config = config_for("study-2024.json", Path::new("unused.html"));
    let data = load_data(&config.data_path, config.year).unwrap();
    let grid = CalendarGrid::build(config.year, config.week_start, &data).unwrap();
    let day = grid
        .days()
        .find(|d| d.date_key() == "2024-01-02")
        .unwrap();

    let tooltip = render_tooltip(&day.date_key(), &day.events_json);
    assert_eq!(tooltip.date_label, "2 January 2024");
    assert_eq!(
        tooltip.body,
        TooltipBody::Events(vec!["Math × 2".to_string(), "Programming".to_string()])
    );
}

fn assert_fails_without_output(fixture: &str, expected: &str) {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("index.html");
    let err = run(&config_for(fixture, &output)).unwrap_err();
    assert!(
        matches!(err, GraphError::DataFormat { .. }),
        "expected data format error, got {:?}",
        err
    );
    assert!(err.to_string().contains(expected), "{}", err);
    assert!(!output.exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_unknown_code_aborts_run() {
    assert_fails_without_output("unknown-code.json", "unknown event code 'x' on 2024-01-02");
}

#[test]
fn test_date_outside_year_aborts_run() {
    assert_fails_without_output("wrong-year.json", "outside the configured year 2024");
}

#[test]
fn test_malformed_json_aborts_run() {
    assert_fails_without_output("malformed.json", "invalid JSON");
}

#[test]
fn test_failed_run_keeps_previous_output() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("index.html");
    fs::write(&output, "previous").unwrap();
    assert!(run(&config_for("unknown-code.json", &output)).is_err());
    assert_eq!(fs::read_to_string(&output).unwrap(), "previous");
}

#[test]
fn test_missing_data_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = run(&config_for("does-not-exist.json", &dir.path().join("index.html"))).unwrap_err();
    assert!(matches!(err, GraphError::Io { .. }));
}
