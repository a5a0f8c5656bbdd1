//! Integration tests for the geomarketing CLI

use std::path::PathBuf;
use std::process::{Command, Output};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path to a config file that does not exist, so only defaults and env apply
fn absent_config() -> PathBuf {
    std::env::temp_dir().join("geomarketing-cli-tests-absent.toml")
}

fn geomarketing(args: &[&str]) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_geomarketing"));
    command
        .arg("--config")
        .arg(absent_config())
        .args(args)
        .env_remove("GEOMARKETING_WEATHER__API_KEY")
        .env_remove("GEOMARKETING_WEATHER__BASE_URL");
    command
}

fn run(args: &[&str]) -> Output {
    geomarketing(args)
        .output()
        .expect("Failed to execute geomarketing")
}

#[test]
fn test_cli_help() {
    let output = run(&["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("geomarketing"));
    assert!(stdout.contains("Country autocomplete"));
    assert!(stdout.contains("locate"));
    assert!(stdout.contains("weather"));
}

#[test]
fn test_weather_rejects_coordinates_and_city() {
    let output = run(&["weather", "--lat", "1", "--lon", "2", "--city", "x"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("You need to set either the latitude and longitude or a city, not both"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn test_locate_without_input() {
    let output = run(&["locate"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("You need to set the longitude and latitude or the clientIP"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn test_locate_rejects_invalid_ip() {
    let output = run(&["locate", "--ip", "999.1.1.1"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("You need to give a valid IP address"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_weather_accepts_negative_coordinates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("lat", "-33.86"))
        .and(query_param("lon", "-151.2"))
        .and(query_param("appid", "cli_key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "weather": [{"main": "Clear", "description": "clear sky"}],
            "main": {"temp": 293.15, "pressure": 1020, "humidity": 40,
                     "temp_min": 290.15, "temp_max": 295.15},
            "wind": {"speed": 2.5}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut command = geomarketing(&["weather", "--lat", "-33.86", "--lon", "-151.2"]);
    command
        .env("GEOMARKETING_WEATHER__BASE_URL", format!("{}/weather", server.uri()))
        .env("GEOMARKETING_WEATHER__API_KEY", "cli_key");
    let output = tokio::task::spawn_blocking(move || command.output())
        .await
        .expect("blocking task panicked")
        .expect("Failed to execute geomarketing");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "unexpected stderr: {stderr}");
    let weather: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(weather["weather"], "Clear");
    assert_eq!(weather["humidity"], 40);
    assert_eq!(weather["tempActual"], 20.0);
}
