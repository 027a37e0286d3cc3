use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::Value;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("irshark"))
}

fn irda_record(packet_type: u16, frame: &[u8]) -> Vec<u8> {
    let mut data = vec![0u8; 16];
    data[0..2].copy_from_slice(&packet_type.to_be_bytes());
    data[14..16].copy_from_slice(&0x0017u16.to_be_bytes());
    data.extend_from_slice(frame);
    data
}

fn pcapng_block(block_type: u32, body: &[u8]) -> Vec<u8> {
    let total_len = (8 + body.len() + 4) as u32;
    let mut block = Vec::new();
    block.extend_from_slice(&block_type.to_be_bytes());
    block.extend_from_slice(&total_len.to_be_bytes());
    block.extend_from_slice(body);
    block.extend_from_slice(&total_len.to_be_bytes());
    block
}

/// Small IrDA capture: a UA, an IAS query, and one frame cut short.
fn write_capture(dir: &Path) -> PathBuf {
    let mut query = vec![0x03, 0x10, 0x00, 0x10, 0x84, 0x06];
    query.extend_from_slice(b"Device");
    query.push(0x0a);
    query.extend_from_slice(b"DeviceName");
    let frames = [
        irda_record(0, &[0x02, 0x73]),
        irda_record(4, &query),
        irda_record(4, &[0x03, 0x10, 0x85]),
    ];

    let mut shb = Vec::new();
    shb.extend_from_slice(&0x1A2B3C4Du32.to_be_bytes());
    shb.extend_from_slice(&1u16.to_be_bytes());
    shb.extend_from_slice(&0u16.to_be_bytes());
    shb.extend_from_slice(&(-1i64).to_be_bytes());
    let mut idb = Vec::new();
    idb.extend_from_slice(&144u16.to_be_bytes());
    idb.extend_from_slice(&0u16.to_be_bytes());
    idb.extend_from_slice(&65535u32.to_be_bytes());

    let mut output = pcapng_block(0x0A0D0D0A, &shb);
    output.extend_from_slice(&pcapng_block(1, &idb));
    for (idx, data) in frames.iter().enumerate() {
        let ts_us = 1_000_000 + idx as u64 * 1_000;
        let mut epb = Vec::new();
        epb.extend_from_slice(&0u32.to_be_bytes());
        epb.extend_from_slice(&((ts_us >> 32) as u32).to_be_bytes());
        epb.extend_from_slice(&(ts_us as u32).to_be_bytes());
        epb.extend_from_slice(&(data.len() as u32).to_be_bytes());
        epb.extend_from_slice(&(data.len() as u32).to_be_bytes());
        epb.extend_from_slice(data);
        epb.resize(epb.len() + (4 - data.len() % 4) % 4, 0);
        output.extend_from_slice(&pcapng_block(6, &epb));
    }

    let path = dir.join("irda.pcapng");
    std::fs::write(&path, output).expect("write capture");
    path
}

fn stdout_json(args: &[&str], input: &Path) -> Value {
    let assert = cmd()
        .arg("pcap")
        .arg("analyze")
        .arg(input)
        .arg("--stdout")
        .args(args)
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    serde_json::from_str(&stdout).expect("valid json")
}

#[test]
fn help_supports_analyse_and_analyze() {
    cmd()
        .arg("pcap")
        .arg("analyse")
        .arg("--help")
        .assert()
        .success();
    cmd()
        .arg("pcap")
        .arg("analyze")
        .arg("--help")
        .assert()
        .success();
}

#[test]
fn missing_input_shows_error_and_hint() {
    let temp = TempDir::new().expect("tempdir");
    let missing = temp.path().join("missing.pcapng");
    let report = temp.path().join("report.json");

    cmd()
        .arg("pcap")
        .arg("analyze")
        .arg(missing)
        .arg("-o")
        .arg(report)
        .assert()
        .failure()
        .stderr(contains("error:").and(contains("hint:")));
}

#[test]
fn stdout_outputs_decoded_frames() {
    let temp = TempDir::new().expect("tempdir");
    let input = write_capture(temp.path());
    let json = stdout_json(&[], &input);

    assert_eq!(json["tool"]["name"], "irshark");
    assert_eq!(json["capture_summary"]["irda_frames"], 3);
    assert_eq!(json["frames"][0]["info"], "UA, F");
    assert_eq!(json["frames"][0]["direction"], "incoming");
    assert_eq!(json["frames"][1]["protocol"], "IAP");
    assert_eq!(json["iap_queries"][0]["decoder"], "device_name");
    assert!(json["frames"][1]["fields"].is_array());
}

#[test]
fn summary_only_and_frame_filter() {
    let temp = TempDir::new().expect("tempdir");
    let input = write_capture(temp.path());
    let json = stdout_json(&["--summary-only", "--frame", "2"], &input);

    let frames = json["frames"].as_array().expect("frames");
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0]["number"], 2);
    assert!(frames[0].get("fields").is_none());
}

#[test]
fn unknown_frame_number_is_an_error() {
    let temp = TempDir::new().expect("tempdir");
    let input = write_capture(temp.path());

    cmd()
        .arg("pcap")
        .arg("analyze")
        .arg(input)
        .arg("--stdout")
        .arg("--frame")
        .arg("42")
        .assert()
        .failure()
        .stderr(contains("no IrLAP frame numbered 42"));
}

#[test]
fn stdout_and_report_conflict() {
    let temp = TempDir::new().expect("tempdir");
    let input = write_capture(temp.path());
    let report = temp.path().join("report.json");

    cmd()
        .arg("pcap")
        .arg("analyze")
        .arg(input)
        .arg("--stdout")
        .arg("-o")
        .arg(report)
        .assert()
        .failure()
        .stderr(contains("error:"));
}

#[test]
fn pretty_and_compact_conflict() {
    let temp = TempDir::new().expect("tempdir");
    let input = write_capture(temp.path());
    let report = temp.path().join("report.json");

    cmd()
        .arg("pcap")
        .arg("analyze")
        .arg(input)
        .arg("-o")
        .arg(report)
        .arg("--pretty")
        .arg("--compact")
        .assert()
        .failure()
        .stderr(contains("error:"));
}

#[test]
fn report_file_is_written() {
    let temp = TempDir::new().expect("tempdir");
    let input = write_capture(temp.path());
    let report = temp.path().join("out").join("report.json");

    cmd()
        .arg("pcap")
        .arg("analyse")
        .arg(&input)
        .arg("-o")
        .arg(&report)
        .assert()
        .success()
        .stderr(contains("OK: report written"));
    let written: Value =
        serde_json::from_str(&std::fs::read_to_string(&report).expect("report")).expect("json");
    assert_eq!(written["report_version"], 1);
}

#[test]
fn quiet_suppresses_ok_message() {
    let temp = TempDir::new().expect("tempdir");
    let input = write_capture(temp.path());
    let report = temp.path().join("report.json");

    cmd()
        .arg("pcap")
        .arg("analyze")
        .arg(input)
        .arg("-o")
        .arg(report)
        .arg("--quiet")
        .assert()
        .success()
        .stderr(predicates::str::contains("OK:").not());
}

#[test]
fn list_malformed_outputs_frames() {
    let temp = TempDir::new().expect("tempdir");
    let input = write_capture(temp.path());
    let report = temp.path().join("report.json");

    cmd()
        .arg("pcap")
        .arg("analyze")
        .arg(input)
        .arg("-o")
        .arg(report)
        .arg("--list-malformed")
        .assert()
        .success()
        .stderr(contains("Malformed frames:").and(contains("#3 IrLMP")));
}

#[test]
fn strict_fails_when_malformed_frames_present() {
    let temp = TempDir::new().expect("tempdir");
    let input = write_capture(temp.path());
    let report = temp.path().join("report.json");

    cmd()
        .arg("pcap")
        .arg("analyze")
        .arg(input)
        .arg("-o")
        .arg(report)
        .arg("--strict")
        .assert()
        .failure()
        .stderr(contains("1 malformed frame(s) detected"));
}
