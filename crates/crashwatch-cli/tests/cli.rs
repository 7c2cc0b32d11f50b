use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../crashwatch-core/tests/fixtures")
        .join(name)
}

fn crashwatch() -> Command {
    let mut cmd = Command::cargo_bin("crashwatch").unwrap();
    cmd.env_remove("CRASHWATCH_BUNDLE").arg("--no-color");
    cmd
}

fn write_valid_bundle(dir: &Path, key: &str) -> PathBuf {
    let path = dir.join("credentials.toml");
    let doc = format!(
        r#"thing_name = "car-001"
wifi_ssid = "garage"
wifi_password = "correct horse battery"
endpoint = "a1b2c3d4-ats.iot.eu-west-1.amazonaws.com"

[certificates]
root_ca = {{ file = {:?} }}
device_certificate = {{ file = {:?} }}
private_key = {{ file = {:?} }}
"#,
        fixture("root_ca.pem"),
        fixture("device_rsa.crt"),
        fixture(key),
    );
    std::fs::write(&path, doc).unwrap();
    path
}

#[test]
fn init_writes_template_once() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("credentials.toml");

    crashwatch()
        .args(["--bundle", path.to_str().unwrap(), "init"])
        .assert()
        .success();
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("THINGNAME"));

    crashwatch()
        .args(["--bundle", path.to_str().unwrap(), "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    crashwatch()
        .args(["--bundle", path.to_str().unwrap(), "init", "--force"])
        .assert()
        .success();
}

#[test]
fn template_fails_check() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("credentials.toml");
    crashwatch()
        .args(["--bundle", path.to_str().unwrap(), "init"])
        .assert()
        .success();

    crashwatch()
        .args(["--bundle", path.to_str().unwrap(), "check"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("4 problem(s)"))
        .stdout(predicate::str::contains("empty PEM body"));
}

#[test]
fn valid_bundle_passes_check() {
    let dir = TempDir::new().unwrap();
    let path = write_valid_bundle(dir.path(), "device_rsa.key");

    crashwatch()
        .args(["--bundle", path.to_str().unwrap(), "check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bundle is usable"))
        .stdout(predicate::str::contains("eu-west-1 (ATS)"));
}

#[test]
fn mismatched_key_fails_check_as_json() {
    let dir = TempDir::new().unwrap();
    let path = write_valid_bundle(dir.path(), "other_rsa.key");

    let output = crashwatch()
        .args(["--bundle", path.to_str().unwrap(), "-o", "json", "check"])
        .assert()
        .failure()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["ok"], false);
    assert_eq!(json["problems"][0]["field"], "private_key");
}

#[test]
fn show_masks_secrets() {
    let dir = TempDir::new().unwrap();
    let path = write_valid_bundle(dir.path(), "device_rsa.key");

    crashwatch()
        .args(["--bundle", path.to_str().unwrap(), "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("car-001"))
        .stdout(predicate::str::contains("****"))
        .stdout(predicate::str::contains("correct horse").not())
        .stdout(predicate::str::contains("co...").not())
        .stdout(predicate::str::contains("RSA PRIVATE KEY (").and(
            predicate::str::contains("MII").not(),
        ));
}

#[test]
fn header_renders_firmware_secrets() {
    let dir = TempDir::new().unwrap();
    let path = write_valid_bundle(dir.path(), "device_rsa.key");

    crashwatch()
        .args(["--bundle", path.to_str().unwrap(), "header"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#define THINGNAME \"car-001\""))
        .stdout(predicate::str::contains("AWS_CERT_PRIVATE[] PROGMEM = R\"KEY("));
}

#[test]
fn check_from_environment() {
    crashwatch()
        .args(["--from-env", "check"])
        .env("CRASHWATCH_THING_NAME", "car-001")
        .env("CRASHWATCH_WIFI_SSID", "garage")
        .env("CRASHWATCH_WIFI_PASSWORD", "hunter22")
        .env("CRASHWATCH_ENDPOINT", "a1b2c3d4.iot.us-east-1.amazonaws.com")
        .env("CRASHWATCH_ROOT_CA", format!("@{}", fixture("root_ca.pem").display()))
        .env(
            "CRASHWATCH_DEVICE_CERTIFICATE",
            format!("@{}", fixture("device_ec.crt").display()),
        )
        .env(
            "CRASHWATCH_PRIVATE_KEY",
            format!("@{}", fixture("device_ec.key").display()),
        )
        .assert()
        .success()
        .stdout(predicate::str::contains("ECDSA P-256"));
}

#[test]
fn path_prints_bundle_location() {
    crashwatch()
        .args(["--bundle", "/srv/car-001/credentials.toml", "path"])
        .assert()
        .success()
        .stdout("/srv/car-001/credentials.toml\n");
}

#[test]
fn replay_reports_incidents() {
    let dir = TempDir::new().unwrap();
    let readings = dir.path().join("readings.jsonl");
    std::fs::write(
        &readings,
        concat!(
            r#"{"acceleration_x":0,"acceleration_y":0.1,"acceleration_z":9.8,"temperature":21,"latitude":53.35,"longitude":-6.26,"timestamp":"2024/03/01 12:00:00.000000"}"#,
            "\n",
            r#"{"acceleration_x":0,"acceleration_y":7.2,"acceleration_z":9.8,"temperature":21,"latitude":53.35,"longitude":-6.26,"timestamp":"2024/03/01 12:00:01.000000"}"#,
            "\n",
            "not json\n",
        ),
    )
    .unwrap();

    let output = crashwatch()
        .args(["-o", "json", "replay", readings.to_str().unwrap()])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["readings"], 2);
    assert_eq!(json["records"], 8);
    assert_eq!(json["incidents"], 1);
    assert_eq!(json["errors"], 1);
    assert_eq!(json["target"]["database"], "Car_Database");
    assert_eq!(json["lines"][1]["evaluation"]["incident"]["kind"], "accident");
}

#[test]
fn replay_reads_stdin() {
    let output = crashwatch()
        .args(["-o", "json", "replay", "-"])
        .write_stdin(concat!(
            r#"{"acceleration_x":0,"acceleration_y":7.2,"acceleration_z":9.8,"temperature":31.0,"latitude":53.35,"longitude":-6.26,"timestamp":"2024/03/01 12:00:01.5"}"#,
            "\n",
            r#"{"acceleration_x":0,"acceleration_y":0.1,"acceleration_z":9.8,"temperature":21,"latitude":53.35,"longitude":-6.26,"timestamp":"2024/03/01 12:00:02"}"#,
            "\n",
        ))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["readings"], 1);
    assert_eq!(json["incidents"], 1);
    assert_eq!(json["errors"], 1);
}
