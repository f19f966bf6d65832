//! Shared fixtures for CLI integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Decoded value of the CSRF cookie mounted by [`mount_csrf`].
pub const CSRF_DECODED: &str = "test-csrf-token=1";

/// Creates a temp LEADCTL_HOME directory for test isolation.
pub fn temp_home() -> TempDir {
    TempDir::new().expect("create temp leadctl home")
}

pub fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

/// Path of the session file inside a temp home.
pub fn session_file(home: &TempDir) -> PathBuf {
    home.path().join("session.json")
}

/// Writes a session file with the given token into the temp home.
pub fn seed_session(home: &TempDir, token: &str) {
    let body = json!({ "token": token }).to_string();
    std::fs::write(session_file(home), body).expect("seed session file");
}

pub fn user_json() -> serde_json::Value {
    json!({ "id": 1, "name": "Ada Lovelace", "email": "ada@example.com" })
}

pub fn lead_json(id: u64, name: &str, email: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "email": email,
        "phone": null,
        "lead_status_id": null,
        "status": null,
    })
}

pub fn lead_page_json(data: Vec<serde_json::Value>, last_page: u32) -> serde_json::Value {
    json!({ "data": data, "last_page": last_page })
}

/// JSON body wrapped in a ResponseTemplate.
pub fn json_response(status: u16, body: &serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(body)
}

/// Error body in the backend's shape.
pub fn error_response(status: u16, message: &str) -> ResponseTemplate {
    json_response(status, &json!({ "message": message }))
}

/// Mounts the CSRF cookie endpoint. The cookie value is URL-encoded the way
/// the backend sends it; clients must echo it back percent-decoded.
pub async fn mount_csrf(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/sanctum/csrf-cookie"))
        .respond_with(
            ResponseTemplate::new(204)
                .insert_header("set-cookie", "XSRF-TOKEN=test-csrf-token%3D1; Path=/"),
        )
        .mount(server)
        .await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lead_page_json_shape() {
        let page = lead_page_json(vec![lead_json(7, "Jane Doe", "jane@example.com")], 3);
        assert_eq!(page["data"][0]["id"], 7);
        assert_eq!(page["data"][0]["name"], "Jane Doe");
        assert_eq!(page["last_page"], 3);
    }

    #[test]
    fn test_seed_session_writes_token() {
        let home = temp_home();
        seed_session(&home, "9|seeded");

        let contents = std::fs::read_to_string(session_file(&home)).unwrap();
        assert!(contents.contains("9|seeded"));
    }
}
