mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{create_test_app, register_org, request};

macro_rules! require_database {
    () => {
        match create_test_app().await {
            Some(app) => app,
            None => {
                eprintln!("skipping: DATABASE_URL not set");
                return;
            }
        }
    };
}

#[tokio::test]
async fn health_endpoints_respond() {
    let app = require_database!();

    let (status, body) = request(&app, "GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");

    let (status, _) = request(&app, "GET", "/api/health/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn register_then_login_round_trip() {
    let app = require_database!();

    let email = format!("owner+{}@example.com", uuid::Uuid::new_v4().simple());

    let (status, body) = request(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "orgName": "Acme", "email": email, "password": "secret1" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["token"].as_str().is_some());
    assert_eq!(body["user"]["email"], email.as_str());
    assert_eq!(body["organisation"]["name"], "Acme");
    let org_id = body["organisation"]["id"].as_i64().unwrap();

    // Same credentials log in and land in the same organisation.
    let (status, body) = request(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": "secret1" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].as_str().is_some());
    assert_eq!(body["organisation"]["id"].as_i64(), Some(org_id));
}

#[tokio::test]
async fn register_rejects_missing_and_invalid_fields() {
    let app = require_database!();

    let (status, body) = request(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "email": "no-org@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation error");

    let (status, _) = request(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "orgName": "Acme", "email": "short@example.com", "password": "12345" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_email_registration_is_rejected() {
    let app = require_database!();

    let email = format!("dup+{}@example.com", uuid::Uuid::new_v4().simple());
    let body = json!({ "orgName": "First Org", "email": email, "password": "secret1" });

    let (status, _) = request(&app, "POST", "/api/auth/register", None, Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, response) =
        request(&app, "POST", "/api/auth/register", None, Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "Duplicate entry");
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let app = require_database!();

    let email = format!("login+{}@example.com", uuid::Uuid::new_v4().simple());
    let (_, _) = request(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "orgName": "Login Org", "email": email, "password": "secret1" })),
    )
    .await;

    // Wrong password for a known account.
    let (status, wrong_password) = request(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Unknown account entirely.
    let (status, unknown_email) = request(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "nobody@example.com", "password": "whatever" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(wrong_password["message"], unknown_email["message"]);
}

#[tokio::test]
async fn protected_routes_require_bearer_token() {
    let app = require_database!();

    let (status, body) = request(&app, "GET", "/api/employees", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authentication required");

    let (status, body) = request(
        &app,
        "GET",
        "/api/employees",
        Some("not-a-real-token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid token");
}

#[tokio::test]
async fn employee_crud_lifecycle() {
    let app = require_database!();
    let (token, _) = register_org(&app, "Employee Org").await;

    // Create
    let (status, body) = request(
        &app,
        "POST",
        "/api/employees",
        Some(&token),
        Some(json!({
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada@example.com",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let employee_id = body["employee"]["id"].as_i64().unwrap();

    // Missing required fields
    let (status, body) = request(
        &app,
        "POST",
        "/api/employees",
        Some(&token),
        Some(json!({ "first_name": "Only" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "First name, last name, and email are required"
    );

    // Read back with team details
    let (status, body) = request(
        &app,
        "GET",
        &format!("/api/employees/{employee_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["first_name"], "Ada");
    assert_eq!(body["teams"].as_array().unwrap().len(), 0);

    // Partial update; empty string means "not supplied" and is ignored.
    let (status, body) = request(
        &app,
        "PUT",
        &format!("/api/employees/{employee_id}"),
        Some(&token),
        Some(json!({ "first_name": "Augusta", "last_name": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["employee"]["first_name"], "Augusta");
    assert_eq!(body["employee"]["last_name"], "Lovelace");

    // List includes the employee with its team memberships
    let (status, body) = request(&app, "GET", "/api/employees", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"].as_i64(), Some(1));

    // Delete, then reads fail with 404
    let (status, _) = request(
        &app,
        "DELETE",
        &format!("/api/employees/{employee_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = request(
        &app,
        "GET",
        &format!("/api/employees/{employee_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn tenant_isolation_hides_other_organisations_rows() {
    let app = require_database!();
    let (token_a, _) = register_org(&app, "Org A").await;
    let (token_b, _) = register_org(&app, "Org B").await;

    let (_, body) = request(
        &app,
        "POST",
        "/api/employees",
        Some(&token_a),
        Some(json!({
            "first_name": "Grace",
            "last_name": "Hopper",
            "email": "grace@org-a.com",
        })),
    )
    .await;
    let employee_id = body["employee"]["id"].as_i64().unwrap();

    // Org B cannot see, update, or delete Org A's employee.
    let uri = format!("/api/employees/{employee_id}");
    let (status, body) = request(&app, "GET", &uri, Some(&token_b), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not found");

    let (status, _) = request(
        &app,
        "PUT",
        &uri,
        Some(&token_b),
        Some(json!({ "first_name": "Intruder" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = request(&app, "DELETE", &uri, Some(&token_b), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Org B's employee list stays empty.
    let (_, body) = request(&app, "GET", "/api/employees", Some(&token_b), None).await;
    assert_eq!(body["count"].as_i64(), Some(0));
}

#[tokio::test]
async fn team_crud_and_description_clear() {
    let app = require_database!();
    let (token, _) = register_org(&app, "Team Org").await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/teams",
        Some(&token),
        Some(json!({ "name": "Platform", "description": "Owns the pipeline" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let team_id = body["team"]["id"].as_i64().unwrap();

    // Name is required
    let (status, body) = request(
        &app,
        "POST",
        "/api/teams",
        Some(&token),
        Some(json!({ "description": "No name" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Team name is required");

    // Explicit null clears the description; absent leaves it alone.
    let (status, body) = request(
        &app,
        "PUT",
        &format!("/api/teams/{team_id}"),
        Some(&token),
        Some(json!({ "description": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["team"]["description"].is_null());

    let (status, body) = request(
        &app,
        "GET",
        &format!("/api/teams/{team_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["employee_count"].as_i64(), Some(0));

    let (status, _) = request(
        &app,
        "DELETE",
        &format!("/api/teams/{team_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = request(
        &app,
        "GET",
        &format!("/api/teams/{team_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn assignment_is_idempotent() {
    let app = require_database!();
    let (token, _) = register_org(&app, "Assign Org").await;

    let (_, body) = request(
        &app,
        "POST",
        "/api/employees",
        Some(&token),
        Some(json!({
            "first_name": "Alan",
            "last_name": "Turing",
            "email": "alan@example.com",
        })),
    )
    .await;
    let employee_id = body["employee"]["id"].as_i64().unwrap();

    let (_, body) = request(
        &app,
        "POST",
        "/api/teams",
        Some(&token),
        Some(json!({ "name": "Research" })),
    )
    .await;
    let team_id = body["team"]["id"].as_i64().unwrap();

    let assign_uri = format!("/api/teams/{team_id}/assign");

    // First assignment creates the membership.
    let (status, body) = request(
        &app,
        "POST",
        &assign_uri,
        Some(&token),
        Some(json!({ "employeeId": employee_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["assigned_count"].as_i64(), Some(1));

    // Repeating the call succeeds but assigns nothing new.
    let (status, body) = request(
        &app,
        "POST",
        &assign_uri,
        Some(&token),
        Some(json!({ "employeeIds": [employee_id] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["assigned_count"].as_i64(), Some(0));

    // Both calls together produced exactly one audit row.
    let (_, body) = request(
        &app,
        "GET",
        "/api/logs?action=employee_assigned_to_team",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["total"].as_i64(), Some(1));

    // Exactly one membership shows up on the team.
    let (_, body) = request(
        &app,
        "GET",
        &format!("/api/teams/{team_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["employee_count"].as_i64(), Some(1));
    assert_eq!(body["employees"][0]["id"].as_i64(), Some(employee_id));

    // Unknown employee in the batch rejects the whole request.
    let (status, body) = request(
        &app,
        "POST",
        &assign_uri,
        Some(&token),
        Some(json!({ "employeeIds": [employee_id, 999_999] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "One or more employees not found or do not belong to your organisation"
    );

    // Unassign removes the membership; a second attempt is a 404.
    let unassign_uri = format!("/api/teams/{team_id}/unassign");
    let (status, _) = request(
        &app,
        "DELETE",
        &unassign_uri,
        Some(&token),
        Some(json!({ "employeeId": employee_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = request(
        &app,
        "DELETE",
        &unassign_uri,
        Some(&token),
        Some(json!({ "employeeId": employee_id })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Employee is not assigned to this team");
}

#[tokio::test]
async fn audit_log_records_mutations_with_diffs() {
    let app = require_database!();
    let (token, org_id) = register_org(&app, "Audit Org").await;

    let (_, body) = request(
        &app,
        "POST",
        "/api/employees",
        Some(&token),
        Some(json!({
            "first_name": "Katherine",
            "last_name": "Johnson",
            "email": "katherine@example.com",
        })),
    )
    .await;
    let employee_id = body["employee"]["id"].as_i64().unwrap();

    // Only the changed field lands in the diff.
    let (_, _) = request(
        &app,
        "PUT",
        &format!("/api/employees/{employee_id}"),
        Some(&token),
        Some(json!({ "first_name": "Kat", "last_name": "Johnson" })),
    )
    .await;

    let (status, body) = request(
        &app,
        "GET",
        "/api/logs?action=employee_updated",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"].as_i64(), Some(1));

    let entry = &body["logs"][0];
    assert_eq!(entry["organisation_id"].as_i64(), Some(org_id));
    assert!(entry["user"]["email"].as_str().is_some());

    let changes = &entry["meta"]["changes"];
    assert_eq!(changes["first_name"]["from"], "Katherine");
    assert_eq!(changes["first_name"]["to"], "Kat");
    assert!(changes.get("last_name").is_none());

    // Registration and creation are audited too; newest first.
    let (_, body) = request(&app, "GET", "/api/logs", Some(&token), None).await;
    let actions: Vec<&str> = body["logs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|log| log["action"].as_str().unwrap())
        .collect();
    assert_eq!(
        actions,
        vec![
            "employee_updated",
            "employee_created",
            "organisation_registered"
        ]
    );
}

#[tokio::test]
async fn audit_log_pagination_and_filters() {
    let app = require_database!();
    let (token, _) = register_org(&app, "Pagination Org").await;

    for i in 0..3 {
        let (_, _) = request(
            &app,
            "POST",
            "/api/employees",
            Some(&token),
            Some(json!({
                "first_name": format!("Emp{i}"),
                "last_name": "Test",
                "email": format!("emp{i}@example.com"),
            })),
        )
        .await;
    }

    // 1 registration + 3 creations in this organisation.
    let (_, body) = request(&app, "GET", "/api/logs", Some(&token), None).await;
    assert_eq!(body["total"].as_i64(), Some(4));

    let (_, body) = request(&app, "GET", "/api/logs?limit=2&offset=1", Some(&token), None).await;
    assert_eq!(body["total"].as_i64(), Some(4));
    assert_eq!(body["count"].as_i64(), Some(2));
    assert_eq!(body["limit"].as_i64(), Some(2));
    assert_eq!(body["offset"].as_i64(), Some(1));

    let (_, body) = request(
        &app,
        "GET",
        "/api/logs?action=employee_created",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["total"].as_i64(), Some(3));
    for log in body["logs"].as_array().unwrap() {
        assert_eq!(log["action"], "employee_created");
    }

    // Logs from other organisations never leak in.
    let (other_token, _) = register_org(&app, "Other Org").await;
    let (_, body) = request(&app, "GET", "/api/logs", Some(&other_token), None).await;
    assert_eq!(body["total"].as_i64(), Some(1));
}

#[tokio::test]
async fn logout_is_audited_and_token_survives() {
    let app = require_database!();
    let (token, _) = register_org(&app, "Logout Org").await;

    let (status, body) = request(&app, "POST", "/api/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Logout successful");

    // Stateless tokens: the same token still works after logout.
    let (_, body) = request(
        &app,
        "GET",
        "/api/logs?action=user_logout",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["total"].as_i64(), Some(1));
}

#[tokio::test]
async fn malformed_body_and_query_keep_the_error_envelope() {
    let app = require_database!();
    let (token, _) = register_org(&app, "Envelope Org").await;

    let builder = axum::http::Request::builder()
        .method("POST")
        .uri("/api/auth/register")
        .header("content-type", "application/json");
    let response = tower::ServiceExt::oneshot(
        app.clone(),
        builder.body(axum::body::Body::from("{not json")).unwrap(),
    )
    .await
    .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = http_body_util::BodyExt::collect(response.into_body())
        .await
        .unwrap()
        .to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "Validation error");

    let (status, body) = request(
        &app,
        "GET",
        "/api/logs?limit=not-a-number",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation error");
}

#[tokio::test]
async fn unknown_routes_return_json_envelope() {
    let app = require_database!();

    let (status, body) = request(&app, "GET", "/api/nope", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not found");
}
