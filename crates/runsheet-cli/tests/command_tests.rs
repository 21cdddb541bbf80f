use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../fixtures")
        .join(name)
}

/// Copy a fixture into a scratch directory so commands can rewrite it.
fn scratch_schedule(name: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join(name);
    fs::copy(fixture(name), &path).expect("Failed to copy fixture");
    (dir, path)
}

fn runsheet(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_runsheet"))
        .args(args)
        .output()
        .expect("Failed to execute runsheet")
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "runsheet failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

fn stderr_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stderr).expect("stderr is not JSON")
}

fn stored_blocks(path: &Path) -> Vec<Value> {
    let raw = fs::read_to_string(path).unwrap();
    let schedule: Value = serde_json::from_str(&raw).unwrap();
    schedule["blocks"].as_array().unwrap().clone()
}

fn block_by_id<'a>(blocks: &'a [Value], id: &str) -> Option<&'a Value> {
    blocks.iter().find(|b| b["id"] == id)
}

#[test]
fn round_snaps_to_precision() {
    let output = runsheet(&["round", "2024-06-01T09:10"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "2024-06-01T09:00:00.000Z\n"
    );

    let output = runsheet(&["round", "2024-06-01T09:20", "-p", "15min"]);
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "2024-06-01T09:15:00.000Z\n"
    );
}

#[test]
fn round_pair_keeps_one_unit() {
    let output = runsheet(&[
        "round",
        "2024-06-01T09:10",
        "--end",
        "2024-06-01T09:14",
        "--output-format",
        "json",
    ]);
    let json = stdout_json(&output);
    assert_eq!(json["start"], "2024-06-01T09:00:00.000Z");
    assert_eq!(json["end"], "2024-06-01T09:30:00.000Z");
}

#[test]
fn convert_keeps_wall_clock_digits() {
    let output = runsheet(&["convert", "2024-06-01T23:30:00.000Z", "--to", "form"]);
    assert_eq!(String::from_utf8_lossy(&output.stdout), "2024-06-01T23:30\n");

    let output = runsheet(&["convert", "2024-06-01T23:30"]);
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "2024-06-01T23:30:00.000Z\n"
    );
}

#[test]
fn invalid_output_format_is_input_error() {
    let output = runsheet(&["round", "2024-06-01T09:00", "--output-format", "yaml"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn add_appends_block_with_new_id() {
    let (_dir, path) = scratch_schedule("gala.json");
    let schedule = path.to_str().unwrap();

    let output = runsheet(&[
        "add",
        "-s",
        schedule,
        "--title",
        "Speeches",
        "--start",
        "2024-06-01T19:00",
        "--end",
        "2024-06-01T19:30",
        "--location",
        "  Stage  ",
        "--output-format",
        "json",
    ]);
    let block = stdout_json(&output);
    assert_eq!(block["title"], "Speeches");
    assert_eq!(block["start_time"], "2024-06-01T19:00:00.000Z");
    assert_eq!(block["location"], "Stage");
    assert_eq!(block["status"], "pending");

    let id = block["id"].as_str().unwrap();
    let blocks = stored_blocks(&path);
    assert_eq!(blocks.len(), 8);
    assert!(block_by_id(&blocks, id).is_some());
}

#[test]
fn add_rejects_misaligned_time_without_writing() {
    let (_dir, path) = scratch_schedule("gala.json");
    let before = fs::read_to_string(&path).unwrap();

    let output = runsheet(&[
        "add",
        "-s",
        path.to_str().unwrap(),
        "--title",
        "Speeches",
        "--start",
        "2024-06-01T19:10",
        "--end",
        "2024-06-01T19:30",
        "--output-format",
        "json",
    ]);
    assert_eq!(output.status.code(), Some(2));

    let err = stderr_json(&output);
    assert_eq!(err["status"], "validation");
    let fields = err["fields"].as_array().unwrap();
    assert_eq!(fields[0]["field"], "start_time");

    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn validate_reports_every_field() {
    let output = runsheet(&[
        "validate",
        "-s",
        fixture("gala.json").to_str().unwrap(),
        "--start",
        "2024-06-01T10:00",
        "--end",
        "2024-06-01T09:00",
        "--output-format",
        "json",
    ]);
    assert_eq!(output.status.code(), Some(2));

    let err = stderr_json(&output);
    let fields: Vec<&str> = err["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["title", "end_time"]);
}

#[test]
fn edit_keeps_unspecified_fields() {
    let (_dir, path) = scratch_schedule("gala.json");

    let output = runsheet(&[
        "edit",
        "-s",
        path.to_str().unwrap(),
        "--id",
        "b1",
        "--title",
        "Setup crew",
        "--output-format",
        "json",
    ]);
    let block = stdout_json(&output);
    assert_eq!(block["id"], "b1");
    assert_eq!(block["title"], "Setup crew");
    assert_eq!(block["start_time"], "2024-06-01T09:00:00.000Z");
    assert_eq!(block["location"], "Main hall");
    assert_eq!(block["status"], "complete");

    let blocks = stored_blocks(&path);
    assert_eq!(blocks.len(), 7);
    assert_eq!(block_by_id(&blocks, "b1").unwrap()["title"], "Setup crew");
}

#[test]
fn edit_title_of_quarter_hour_block() {
    let (_dir, path) = scratch_schedule("gala.json");

    let output = runsheet(&[
        "edit",
        "-s",
        path.to_str().unwrap(),
        "--id",
        "b2",
        "--title",
        "Doors",
        "--output-format",
        "json",
    ]);
    let block = stdout_json(&output);
    assert_eq!(block["title"], "Doors");
    assert_eq!(block["start_time"], "2024-06-01T18:00:00.000Z");
    assert_eq!(block["end_time"], "2024-06-01T18:15:00.000Z");
}

#[test]
fn edit_with_explicit_precision_still_checks_alignment() {
    let (_dir, path) = scratch_schedule("gala.json");

    let output = runsheet(&[
        "edit",
        "-s",
        path.to_str().unwrap(),
        "--id",
        "b2",
        "--title",
        "Doors",
        "-p",
        "30min",
        "--output-format",
        "json",
    ]);
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stderr_json(&output)["status"], "validation");
}

#[test]
fn status_changes_only_status() {
    let (_dir, path) = scratch_schedule("gala.json");

    let output = runsheet(&[
        "status",
        "-s",
        path.to_str().unwrap(),
        "--id",
        "b2",
        "--status",
        "complete",
    ]);
    assert!(output.status.success());

    let blocks = stored_blocks(&path);
    let b2 = block_by_id(&blocks, "b2").unwrap();
    assert_eq!(b2["status"], "complete");
    assert_eq!(b2["personnel"], "Front of house");
}

#[test]
fn delete_unknown_block_is_not_found() {
    let (_dir, path) = scratch_schedule("gala.json");

    let output = runsheet(&[
        "delete",
        "-s",
        path.to_str().unwrap(),
        "--id",
        "missing",
        "--output-format",
        "json",
    ]);
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stderr_json(&output)["status"], "not_found");
}

#[test]
fn purge_ghosts_removes_ghost_and_out_of_range_blocks() {
    let (_dir, path) = scratch_schedule("gala.json");

    let output = runsheet(&[
        "purge-ghosts",
        "-s",
        path.to_str().unwrap(),
        "--output-format",
        "json",
    ]);
    let json = stdout_json(&output);
    assert_eq!(json["removed"], 3);
    assert_eq!(json["ids"], serde_json::json!(["g1", "g2", "o1"]));

    let blocks = stored_blocks(&path);
    let mut ids: Vec<&str> = blocks.iter().map(|b| b["id"].as_str().unwrap()).collect();
    ids.sort();
    assert_eq!(ids, vec!["b1", "b2", "b3", "b4"]);
}

#[test]
fn horizontal_layout_for_one_day() {
    let output = runsheet(&[
        "layout",
        "-s",
        fixture("gala.json").to_str().unwrap(),
        "--view",
        "horizontal",
        "--date",
        "2024-06-01",
        "--output-format",
        "json",
    ]);
    let json = stdout_json(&output);
    let days = json.as_array().unwrap();
    assert_eq!(days.len(), 1);

    let layout = &days[0]["layout"];
    assert_eq!(layout["window"]["start_hour"], 6);
    assert_eq!(layout["window"]["end_hour"], 22);
    // 09:00 is three hours into a sixteen-hour window.
    assert_eq!(layout["items"][0]["left_pct"], 18.75);
}

#[test]
fn layout_date_outside_event_is_input_error() {
    let output = runsheet(&[
        "layout",
        "-s",
        fixture("gala.json").to_str().unwrap(),
        "--date",
        "2024-07-01",
    ]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn config_changes_vertical_scale() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("runsheet.toml");
    fs::write(&config, "[vertical]\nhour_height = 60.0\n").unwrap();

    let output = runsheet(&[
        "--config",
        config.to_str().unwrap(),
        "layout",
        "-s",
        fixture("gala.json").to_str().unwrap(),
        "--date",
        "2024-06-01",
        "--output-format",
        "json",
    ]);
    let json = stdout_json(&output);
    let layout = &json[0]["layout"];
    // 8 AM to 8 PM at 60px per hour.
    assert_eq!(layout["total_height"], 720.0);
    assert_eq!(layout["items"][0]["geometry"]["top"], 60.0);
    assert_eq!(layout["items"][0]["geometry"]["height"], 30.0);
}

#[test]
fn pdf_export_writes_document() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("gala.pdf");

    let output = runsheet(&[
        "export",
        "-s",
        fixture("gala.json").to_str().unwrap(),
        "-f",
        "pdf",
        "-o",
        out.to_str().unwrap(),
    ]);
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );

    let bytes = fs::read(&out).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn pdf_export_requires_output_path() {
    let output = runsheet(&[
        "export",
        "-s",
        fixture("gala.json").to_str().unwrap(),
        "-f",
        "pdf",
    ]);
    assert_eq!(output.status.code(), Some(2));
}
