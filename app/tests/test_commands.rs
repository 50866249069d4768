//! FILENAME: tests/test_commands.rs
//! Integration tests for command parsing and the session loop.

mod common;

use app_lib::{parse_command, Command, CommandError};
use common::TestHarness;
use persistence::ExportFormat;
use std::io::Cursor;
use std::path::PathBuf;
use view_engine::FilterSpec;

// ============================================================================
// PARSING
// ============================================================================

#[test]
fn test_parse_filter_variants() {
    assert_eq!(
        parse_command("filter symbol include SOLUSDT,BTCUSD").unwrap(),
        Some(Command::Filter(FilterSpec::include("symbol", ["SOLUSDT", "BTCUSD"])))
    );
    assert_eq!(
        parse_command("filter symbol exclude BTCUSD").unwrap(),
        Some(Command::Filter(FilterSpec::exclude("symbol", ["BTCUSD"])))
    );
    assert_eq!(
        parse_command("filter symbol contains usd").unwrap(),
        Some(Command::Filter(FilterSpec::contains("symbol", "usd")))
    );
    assert!(matches!(
        parse_command("filter symbol between 1,2"),
        Err(CommandError::Usage(_))
    ));
    assert!(matches!(parse_command("filter symbol"), Err(CommandError::Usage(_))));
}

#[test]
fn test_parse_pivot_and_move() {
    assert_eq!(
        parse_command("pivot symbol,date volume").unwrap(),
        Some(Command::Pivot {
            group_by: vec!["symbol".into(), "date".into()],
            aggregate_columns: vec!["volume".into()],
        })
    );
    assert_eq!(
        parse_command("move close 1").unwrap(),
        Some(Command::Move {
            column: "close".into(),
            position: 1
        })
    );
    assert_eq!(
        parse_command("move close first"),
        Err(CommandError::NotANumber("first".into()))
    );
}

#[test]
fn test_parse_misc() {
    assert_eq!(parse_command("").unwrap(), None);
    assert_eq!(parse_command("# comment").unwrap(), None);
    assert_eq!(parse_command("SHOW 5").unwrap(), Some(Command::Show(Some(5))));
    assert_eq!(parse_command("q").unwrap(), Some(Command::Quit));
    assert_eq!(
        parse_command("export xlsx \"my view.xlsx\"").unwrap(),
        Some(Command::Export {
            format: ExportFormat::Xlsx,
            path: PathBuf::from("my view.xlsx"),
        })
    );
    assert_eq!(
        parse_command("export ods out.ods"),
        Err(CommandError::Format("ods".into()))
    );
    assert_eq!(
        parse_command("export view.csv").unwrap(),
        Some(Command::Export {
            format: ExportFormat::Csv,
            path: PathBuf::from("view.csv"),
        })
    );
    assert_eq!(
        parse_command("export xlsx report").unwrap(),
        Some(Command::Export {
            format: ExportFormat::Xlsx,
            path: PathBuf::from("report.xlsx"),
        })
    );
    assert_eq!(
        parse_command("export notes"),
        Err(CommandError::Format("notes".into()))
    );
    assert_eq!(
        parse_command("frobnicate"),
        Err(CommandError::Unknown("frobnicate".into()))
    );
}

// ============================================================================
// SESSION
// ============================================================================

#[test]
fn test_show_prints_table() {
    let mut harness = TestHarness::new();
    let out = harness.run("show");
    let lines: Vec<&str> = out.lines().collect();
    assert!(lines[0].starts_with("symbol"));
    assert_eq!(lines.len(), 6);
    assert!(lines[2].starts_with("SOLUSDT"));
    assert_eq!(lines[5], "(3 of 3 rows)");

    let out = harness.run("show 1");
    assert!(out.ends_with("(1 of 3 rows)\n"));
}

#[test]
fn test_filter_and_clear_report_counts() {
    let mut harness = TestHarness::new();
    assert_eq!(
        harness.run("filter symbol include BTCUSD"),
        "1 of 3 rows (loaded, filtered)\n"
    );
    assert_eq!(harness.run("clear"), "3 of 3 rows (loaded)\n");
}

#[test]
fn test_sort_toggles() {
    let mut harness = TestHarness::new();
    assert_eq!(harness.run("sort close"), "sorted by close (ascending)\n");
    assert_eq!(harness.run("sort close"), "sorted by close (descending)\n");
    let out = harness.run("show 1");
    assert!(out.lines().nth(2).unwrap().starts_with("BTCUSD"));
}

#[test]
fn test_pivot_then_unpivot() {
    let mut harness = TestHarness::new();
    assert_eq!(harness.run("pivot symbol volume"), "2 of 2 rows (pivoted)\n");

    let out = harness.run("show");
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "symbol   volume");
    assert_eq!(lines[2], "BTCUSD        5");
    assert_eq!(lines[3], "SOLUSDT      30");

    assert_eq!(harness.run("unpivot"), "3 of 3 rows (loaded)\n");
    assert_eq!(harness.session.engine().column_order().len(), 4);
}

#[test]
fn test_columns_and_values() {
    let mut harness = TestHarness::new();
    harness.run("move volume 1");
    let out = harness.run("columns");
    assert!(out.lines().next().unwrap().contains("volume"));
    assert!(out.contains("numeric"));

    let out = harness.run("values symbol");
    assert_eq!(out, "SOLUSDT\nBTCUSD\n(2 distinct)\n");
}

#[test]
fn test_errors_leave_view_unchanged() {
    let mut harness = TestHarness::new();
    harness.run("filter symbol include SOLUSDT");

    assert!(harness.run_err("move close 9").contains("invalid position"));
    assert!(harness.run_err("pivot exchange volume").contains("exchange"));
    assert!(harness.run_err("filter nope include x").contains("invalid filter"));
    assert!(harness.run_err("sort nope").contains("nope"));

    assert_eq!(harness.session.engine().displayed_len(), 2);
    assert!(!harness.session.engine().is_pivoted());
}

#[test]
fn test_chart_prints_series() {
    let mut harness = TestHarness::new();
    harness.run("filter symbol include SOLUSDT");
    let out = harness.run("chart date close volume");
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("date"));
    assert_eq!(lines[4], "2 points, close range 100 .. 110");
}

#[test]
fn test_report_lists_failures_and_warnings() {
    let mut harness = TestHarness::new();
    let out = harness.run("report");
    assert!(out.starts_with("2 loaded, 1 failed, 1 warnings\n"));
    assert!(out.contains("loaded: SOLUSDT, BTCUSD"));
    assert!(out.contains("failed: JUPUSD"));
    assert!(out.contains("warning: BTCUSD"));
}

#[test]
fn test_export_csv_uses_displayed_view() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("view.csv");
    let mut harness = TestHarness::new();
    harness.run("filter symbol include SOLUSDT");
    harness.run("move close 1");
    harness.run("sort volume");
    harness.run("sort volume");

    let out = harness.run(&format!("export csv \"{}\"", path.display()));
    assert!(out.starts_with("wrote 2 rows"));

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        content,
        "close,symbol,date,volume\n110,SOLUSDT,2024-01-02,20\n100,SOLUSDT,2024-01-01,10\n"
    );
}

#[test]
fn test_export_xlsx_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("view.xlsx");
    let mut harness = TestHarness::new();
    harness.run("pivot symbol close,volume");
    harness.run(&format!("export xlsx \"{}\"", path.display()));
    assert!(path.exists());
}

#[test]
fn test_failed_export_is_reported_and_session_continues() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("view.csv");
    let mut harness = TestHarness::new();
    let script = format!("export \"{}\"\nsort close\n", path.display());
    harness
        .session
        .run(Cursor::new(script), false)
        .unwrap();

    let out = String::from_utf8_lossy(harness.session.output()).into_owned();
    assert!(out.contains("error: export failed"));
    assert!(out.contains("sorted by close (ascending)"));
    assert!(!path.exists());
}

#[test]
fn test_script_run_continues_after_errors() {
    let mut harness = TestHarness::new();
    let script = "sort close\nmove close 0\nbogus\nfilter symbol include BTCUSD\nquit\nclear\n";
    harness
        .session
        .run(Cursor::new(script), false)
        .unwrap();

    let out = String::from_utf8_lossy(harness.session.output()).into_owned();
    assert!(out.contains("error: invalid position 0"));
    assert!(out.contains("error: unknown command 'bogus'"));
    // quit stops before the final clear
    assert_eq!(harness.session.engine().displayed_len(), 1);
}
