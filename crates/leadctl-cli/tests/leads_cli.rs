//! Integration tests for the leads commands.

mod fixtures;

use assert_cmd::cargo::cargo_bin_cmd;
use fixtures::{
    can_bind_localhost, json_response, lead_json, lead_page_json, seed_session, temp_home,
};
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{
    body_partial_json, header, method, path, query_param, query_param_is_missing,
};
use wiremock::{Mock, MockServer};

#[tokio::test]
async fn test_leads_list_renders_table() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    seed_session(&home, "7|valid");
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/leads"))
        .and(header("Authorization", "Bearer 7|valid"))
        .and(query_param("page", "1"))
        .and(query_param("perPage", "10"))
        .and(query_param("sortBy", "name"))
        .and(query_param("sortOrder", "asc"))
        .and(query_param_is_missing("search"))
        .respond_with(json_response(
            200,
            &lead_page_json(
                vec![
                    lead_json(1, "Jane Doe", "jane@example.com"),
                    lead_json(2, "John Roe", "john@example.com"),
                ],
                3,
            ),
        ))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("leadctl")
        .env("LEADCTL_HOME", home.path())
        .env("LEADCTL_BASE_URL", server.uri())
        .args(["leads", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Jane Doe"))
        .stdout(predicate::str::contains("john@example.com"))
        .stdout(predicate::str::contains("page 1/3"));
}

#[tokio::test]
async fn test_leads_list_passes_filters() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    seed_session(&home, "7|valid");
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/leads"))
        .and(query_param("page", "2"))
        .and(query_param("perPage", "50"))
        .and(query_param("search", "acme"))
        .and(query_param("status", "7"))
        .and(query_param("sortBy", "email"))
        .and(query_param("sortOrder", "desc"))
        .respond_with(json_response(200, &lead_page_json(vec![], 1)))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("leadctl")
        .env("LEADCTL_HOME", home.path())
        .env("LEADCTL_BASE_URL", server.uri())
        .args([
            "leads",
            "list",
            "--page",
            "2",
            "--per-page",
            "50",
            "--search",
            "acme",
            "--status",
            "7",
            "--sort-by",
            "email",
            "--sort-order",
            "desc",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "No leads match the current filters.",
        ));
}

#[test]
fn test_leads_list_requires_session() {
    let home = temp_home();

    cargo_bin_cmd!("leadctl")
        .env("LEADCTL_HOME", home.path())
        .args(["leads", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Not logged in. Run `leadctl login` first.",
        ));
}

#[tokio::test]
async fn test_leads_create_posts_draft() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    seed_session(&home, "7|valid");
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/leads"))
        .and(body_partial_json(json!({
            "name": "Jane Doe",
            "email": "jane@example.com",
        })))
        .respond_with(json_response(
            201,
            &lead_json(10, "Jane Doe", "jane@example.com"),
        ))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("leadctl")
        .env("LEADCTL_HOME", home.path())
        .env("LEADCTL_BASE_URL", server.uri())
        .args([
            "leads",
            "create",
            "--name",
            "Jane Doe",
            "--email",
            "jane@example.com",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created lead #10 Jane Doe."));
}

#[tokio::test]
async fn test_leads_update_puts_draft() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    seed_session(&home, "7|valid");
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/leads/7"))
        .and(body_partial_json(json!({
            "name": "Jane Doe",
            "email": "jane@corp.example.com",
            "lead_status_id": 2,
        })))
        .respond_with(json_response(
            200,
            &lead_json(7, "Jane Doe", "jane@corp.example.com"),
        ))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("leadctl")
        .env("LEADCTL_HOME", home.path())
        .env("LEADCTL_BASE_URL", server.uri())
        .args([
            "leads",
            "update",
            "7",
            "--name",
            "Jane Doe",
            "--email",
            "jane@corp.example.com",
            "--status",
            "2",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated lead #7."));
}

#[tokio::test]
async fn test_leads_statuses_lists_names() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    seed_session(&home, "7|valid");
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/lead-statuses"))
        .respond_with(json_response(
            200,
            &json!([
                { "id": 1, "name": "New" },
                { "id": 2, "name": "Contacted" },
            ]),
        ))
        .mount(&server)
        .await;

    cargo_bin_cmd!("leadctl")
        .env("LEADCTL_HOME", home.path())
        .env("LEADCTL_BASE_URL", server.uri())
        .args(["leads", "statuses"])
        .assert()
        .success()
        .stdout(predicate::str::contains("New"))
        .stdout(predicate::str::contains("Contacted"));
}
