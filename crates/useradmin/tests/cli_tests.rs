use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

// Helper function to get an available port with atomic counter to avoid conflicts
static PORT_COUNTER: AtomicU16 = AtomicU16::new(52000);

fn get_available_port() -> u16 {
    PORT_COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Read one request: the request line plus body
fn read_request(stream: &mut TcpStream) -> String {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    let _ = reader.read_line(&mut request_line);

    let mut content_length = 0;
    loop {
        let mut header = String::new();
        if reader.read_line(&mut header).unwrap_or(0) == 0 || header == "\r\n" {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap_or(0);
            }
        }
    }

    let mut body = vec![0; content_length];
    let _ = reader.read_exact(&mut body);
    format!(
        "{}\n{}",
        request_line.trim_end(),
        String::from_utf8_lossy(&body)
    )
}

// Serves one canned (status, body) pair per connection, in order, and
// reports each received request
fn start_mock_server(port: u16, responses: Vec<(u16, String)>) -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    let listener = TcpListener::bind(("127.0.0.1", port)).unwrap();

    thread::spawn(move || {
        for (status, body) in responses {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let request = read_request(&mut stream);
            let _ = tx.send(request);

            let response = format!(
                "HTTP/1.1 {} OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });

    rx
}

fn create_temp_dir() -> std::path::PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    dir.push(format!("useradmin-test-{}-{}", std::process::id(), nanos));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn useradmin() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("useradmin");
    cmd.env_remove("USERADMIN_URL")
        .env_remove("USERADMIN_TOKEN")
        .env_remove("USERADMIN_CONFIG")
        .env_remove("USERADMIN_PAGE_SIZE")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .timeout(Duration::from_secs(10));
    cmd
}

fn list_body() -> String {
    json!({
        "data": [
            { "id": 1, "username": "alice", "status": "active" },
            { "_id": "65a1f0c2", "name": "bob", "active": false }
        ],
        "total": 2
    })
    .to_string()
}

#[test]
fn test_missing_config() {
    let temp_dir = create_temp_dir();
    useradmin()
        .current_dir(&temp_dir)
        .env("XDG_CONFIG_HOME", &temp_dir)
        .args(["list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("URL not configured"));
    let _ = std::fs::remove_dir_all(&temp_dir);
}

#[test]
fn test_help_command() {
    useradmin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Manage user accounts"));
}

#[test]
fn test_version() {
    useradmin()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_completions() {
    useradmin()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("useradmin"));
}

#[test]
fn test_config_file_is_used_for_defaults() {
    let temp_dir = create_temp_dir();
    let config_path = temp_dir.join("config.toml");

    let port = get_available_port();
    let url = format!("http://127.0.0.1:{}", port);
    std::fs::write(
        &config_path,
        format!("url = \"{}\"\ntoken = \"test-token\"\npage_size = 20\n", url),
    )
    .unwrap();

    let requests = start_mock_server(port, vec![(200, list_body())]);

    let output = useradmin()
        .args([
            "--config",
            config_path.to_str().unwrap(),
            "--format",
            "json",
            "list",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["total"], 2);
    assert_eq!(json["page"], 1);
    assert_eq!(json["page_size"], 20);
    assert_eq!(json["users"][0]["username"], "alice");
    assert_eq!(json["users"][1]["id"], "65a1f0c2");
    assert_eq!(json["users"][1]["username"], "bob");
    assert_eq!(json["users"][1]["status"], "inactive");

    let request = requests.recv_timeout(Duration::from_secs(1)).unwrap();
    assert!(request.starts_with("GET /users?page=1&limit=20&search="));

    let _ = std::fs::remove_dir_all(&temp_dir);
}

#[test]
fn test_list_sends_filters_and_sort() {
    let port = get_available_port();
    let requests = start_mock_server(port, vec![(200, list_body())]);

    useradmin()
        .args([
            "--url",
            &format!("http://127.0.0.1:{}", port),
            "list",
            "--search",
            "ali",
            "--status",
            "active",
            "--page",
            "2",
            "--page-size",
            "5",
            "--sort",
            "username",
            "--desc",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Username ▼"));

    let request = requests.recv_timeout(Duration::from_secs(1)).unwrap();
    let request_line = request.lines().next().unwrap();
    assert!(request_line.contains("page=2&limit=5&search=ali"));
    assert!(request_line.contains("status=active&active=true"));
    assert!(request_line.contains("orderBy=username&orderDir=desc"));
}

#[test]
fn test_list_reports_backend_error() {
    let port = get_available_port();
    let _requests = start_mock_server(
        port,
        vec![(500, json!({ "message": "database offline" }).to_string())],
    );

    useradmin()
        .args(["--url", &format!("http://127.0.0.1:{}", port), "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("database offline"));
}

#[test]
fn test_create_with_short_username_sends_nothing() {
    let port = get_available_port();
    let requests = start_mock_server(port, vec![(201, "{}".to_string())]);

    useradmin()
        .args([
            "--url",
            &format!("http://127.0.0.1:{}", port),
            "create",
            "--username",
            "ab",
            "--password",
            "secret1",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation failed"))
        .stderr(predicate::str::contains("username"));

    assert!(requests.recv_timeout(Duration::from_millis(300)).is_err());
}

#[test]
fn test_create_password_mismatch_is_reported_on_confirmation() {
    let port = get_available_port();
    let requests = start_mock_server(port, vec![(201, "{}".to_string())]);

    useradmin()
        .args([
            "--url",
            &format!("http://127.0.0.1:{}", port),
            "create",
            "--username",
            "alice",
            "--password",
            "secret1",
            "--confirm-password",
            "secret2",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("confirmPassword"));

    assert!(requests.recv_timeout(Duration::from_millis(300)).is_err());
}

#[test]
fn test_create_posts_user_then_reloads() {
    let port = get_available_port();
    let requests = start_mock_server(
        port,
        vec![
            (201, json!({ "id": 3, "username": "carol" }).to_string()),
            (200, list_body()),
        ],
    );

    useradmin()
        .args([
            "--url",
            &format!("http://127.0.0.1:{}", port),
            "create",
            "--username",
            "carol",
            "--password",
            "secret1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("User created"));

    let create = requests.recv_timeout(Duration::from_secs(1)).unwrap();
    assert!(create.starts_with("POST /users "));
    let body: serde_json::Value =
        serde_json::from_str(create.split_once('\n').unwrap().1).unwrap();
    assert_eq!(body, json!({ "username": "carol", "password": "secret1" }));

    let reload = requests.recv_timeout(Duration::from_secs(1)).unwrap();
    assert!(reload.starts_with("GET /users?"));
}

#[test]
fn test_toggle_flips_given_status() {
    let port = get_available_port();
    let requests = start_mock_server(port, vec![(200, "{}".to_string()), (200, list_body())]);

    useradmin()
        .args([
            "--url",
            &format!("http://127.0.0.1:{}", port),
            "toggle",
            "1",
            "--current",
            "active",
            "--yes",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("User updated"));

    let toggle = requests.recv_timeout(Duration::from_secs(1)).unwrap();
    assert!(toggle.starts_with("PATCH /users/1 "));
    assert!(toggle.contains(r#""status":"inactive""#));
}

#[test]
fn test_delete_with_yes_skips_prompt() {
    let port = get_available_port();
    let requests = start_mock_server(port, vec![(204, String::new()), (200, list_body())]);

    useradmin()
        .args([
            "--url",
            &format!("http://127.0.0.1:{}", port),
            "delete",
            "65a1f0c2",
            "--yes",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("User deleted"));

    let delete = requests.recv_timeout(Duration::from_secs(1)).unwrap();
    assert!(delete.starts_with("DELETE /users/65a1f0c2 "));
}

#[test]
fn test_init_then_config_show() {
    let temp_dir = create_temp_dir();

    useradmin()
        .current_dir(&temp_dir)
        .env("XDG_CONFIG_HOME", &temp_dir)
        .args(["init", "--url", "http://localhost:3000/api", "--token", "s3cret"])
        .assert()
        .success();

    let written = std::fs::read_to_string(temp_dir.join(".useradmin.toml")).unwrap();
    assert!(written.contains("url = \"http://localhost:3000/api\""));

    useradmin()
        .current_dir(&temp_dir)
        .env("XDG_CONFIG_HOME", &temp_dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://localhost:3000/api"))
        .stdout(predicate::str::contains("s3cret").not());

    let _ = std::fs::remove_dir_all(&temp_dir);
}
