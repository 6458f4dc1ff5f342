//! Integration tests for CLI output behavior
//!
//! The default behavior is quiet (no logs). Use -v/--verbose to enable logs.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::process::{Command, Output};
use std::thread;

const ROSTER_BODY: &str = r#"{"servers":[
    {"serverNumber":"1","maps":[{"number":201,"author":"a","finished":true},{"number":202,"author":"b","finished":false}],"serverDifficulty":"white","serverJoin":"kacky1","timeLimit":10,"timeLeft":342},
    {"serverNumber":2,"maps":[{"number":250,"author":"c","finished":false}],"serverDifficulty":"hard","serverJoin":"kacky2","timeLimit":10,"timeLeft":-5}
]}"#;

/// Serve one canned HTTP response on a background thread.
fn serve_once(status_line: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to read local addr");

    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while let Ok(n) = stream.read(&mut buf) {
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });

    format!("http://{}", addr)
}

/// A URL nothing listens on.
fn closed_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to read local addr");
    drop(listener);
    format!("http://{}", addr)
}

/// Run kacky isolated from the user's config and environment.
fn run_kacky(args: &[&str]) -> Output {
    let home = tempfile::tempdir().expect("Failed to create temp dir");
    Command::new(env!("CARGO_BIN_EXE_kacky"))
        .current_dir(home.path())
        .env("HOME", home.path())
        .env_remove("KACKY_API_URL")
        .env_remove("KACKY_TOKEN")
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute kacky")
}

#[test]
fn test_help_lists_subcommands() {
    let output = run_kacky(&["--help"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("list"));
    assert!(stdout.contains("watch"));
    assert!(stdout.contains("completions"));
}

#[test]
fn test_list_prints_table() {
    let url = serve_once("HTTP/1.1 200 OK", ROSTER_BODY);
    let output = run_kacky(&["list", "--api-url", &url]);

    assert!(
        output.status.success(),
        "kacky list failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[live]"));
    assert!(stdout.contains("#201 ✓"));
    assert!(stdout.contains("5:42"));
    assert!(stdout.contains("0:00"));
    assert!(stdout.contains("kacky2"));
}

#[test]
fn test_list_stdout_is_clean() {
    let url = serve_once("HTTP/1.1 200 OK", ROSTER_BODY);
    let output = run_kacky(&["list", "--api-url", &url]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(
        !stdout.contains(r#""event":"#),
        "stdout should not contain JSON logs, got: {}",
        stdout
    );
    assert!(
        !stderr.contains(r#""level":"INFO""#),
        "Default mode should not emit INFO logs, got: {}",
        stderr
    );
}

#[test]
fn test_verbose_logs_go_to_stderr() {
    let url = serve_once("HTTP/1.1 200 OK", ROSTER_BODY);
    let output = run_kacky(&["-v", "list", "--api-url", &url]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(
        stderr.contains("cli.list_completed"),
        "Verbose mode should log to stderr, got: {}",
        stderr
    );
    for line in stdout.lines() {
        assert!(
            !line.trim_start().starts_with('{'),
            "stdout line looks like a JSON log: {}",
            line
        );
    }
}

#[test]
fn test_unreachable_backend_fails_cleanly() {
    let url = closed_url();
    let output = run_kacky(&["list", "--api-url", &url]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Failed to fetch roster"),
        "Expected fetch failure message, got: {}",
        stderr
    );
    assert!(String::from_utf8_lossy(&output.stdout).is_empty());
}

#[test]
fn test_unauthorized_suggests_token() {
    let url = serve_once("HTTP/1.1 401 Unauthorized", "{}");
    let output = run_kacky(&["list", "--api-url", &url, "--token", "expired"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("HTTP 401"));
    assert!(stderr.contains("KACKY_TOKEN"));
}

#[test]
fn test_invalid_api_url_is_rejected() {
    let output = run_kacky(&["list", "--api-url", "ftp://example.invalid"]);
    assert!(!output.status.success());
}

#[test]
fn test_completions_generate_script() {
    let output = run_kacky(&["completions", "bash"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("kacky"));
    assert!(stdout.contains("watch"));
}
