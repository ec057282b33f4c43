use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use http_body_util::BodyExt;
use jobboard::config::Config;
use serde_json::{Value, json};
use tower::ServiceExt;

fn test_config() -> Config {
    let path = std::env::temp_dir().join(format!("jobboard-api-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", path.display());
    config.server.secure_cookies = false;
    config.scheduler.enabled = false;
    config.observability.metrics_enabled = false;
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;
    config
}

async fn spawn_app() -> Router {
    let state = jobboard::api::create_app_state_from_config(test_config(), None)
        .await
        .expect("Failed to create app state");
    jobboard::api::router(state).await
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    app.clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn register_seeker(app: &Router, username: &str) -> Response {
    send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "role": "job_seeker",
            "username": username,
            "email": format!("{username}@example.com"),
            "full_name": "Test Seeker",
            "password": "secret123",
            "confirm_password": "secret123",
        })),
    )
    .await
}

async fn register_recruiter(app: &Router, company: &str) -> Response {
    send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "role": "recruiter",
            "company_name": company,
            "company_email": format!("hr@{}.example.com", company.to_lowercase()),
            "company_phone": "+1 555 0100",
            "password": "secret123",
        })),
    )
    .await
}

/// Logs in and returns the session cookie pair.
async fn login(app: &Router, username: &str) -> String {
    let response = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": username, "password": "secret123" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login should set a session cookie")
        .to_str()
        .unwrap();
    cookie.split(';').next().unwrap().to_string()
}

async fn post_job(app: &Router, cookie: &str, title: &str) -> i64 {
    let response = send(
        app,
        "POST",
        "/api/jobs",
        Some(cookie),
        Some(json!({
            "job_title": title,
            "description": "Build and run services",
            "location": "Berlin",
            "job_type": "full-time",
            "salary_min": 50000.0,
            "salary_max": 70000.0,
            "experience_level": "mid",
            "expiry_date": "2099-12-31",
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    json_body(response).await["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_health_live() {
    let app = spawn_app().await;

    let response = send(&app, "GET", "/api/health/live", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let body = json_body(response).await;
    assert_eq!(body["data"]["status"], "alive");
}

#[tokio::test]
async fn test_health_ready() {
    let app = spawn_app().await;

    let response = send(&app, "GET", "/api/health/ready", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["data"]["checks"]["database"], true);
}

#[tokio::test]
async fn test_register_duplicate_is_conflict() {
    let app = spawn_app().await;

    let response = register_seeker(&app, "alice").await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["data"]["role"], "job_seeker");
    assert_eq!(body["data"]["email"], "alice@example.com");

    let response = register_seeker(&app, "alice").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_rejects_mismatched_passwords() {
    let app = spawn_app().await;

    let response = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "role": "job_seeker",
            "username": "bob",
            "email": "bob@example.com",
            "password": "secret123",
            "confirm_password": "secret124",
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_and_session() {
    let app = spawn_app().await;
    register_seeker(&app, "carol").await;

    let response = send(&app, "GET", "/api/auth/me", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "carol", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let cookie = login(&app, "carol").await;

    let response = send(&app, "GET", "/api/auth/me", Some(&cookie), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["data"]["username"], "carol");

    let response = send(&app, "POST", "/api/auth/logout", Some(&cookie), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, "GET", "/api/auth/me", Some(&cookie), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_role_checks() {
    let app = spawn_app().await;
    register_seeker(&app, "dave").await;
    let seeker = login(&app, "dave").await;

    let job = json!({
        "job_title": "Engineer",
        "description": "x",
        "location": "Remote",
        "job_type": "remote",
        "expiry_date": "2099-01-01",
    });

    let response = send(&app, "POST", "/api/jobs", None, Some(job.clone())).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app, "POST", "/api/jobs", Some(&seeker), Some(job)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(&app, "GET", "/api/dashboard/recruiter", Some(&seeker), None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(&app, "GET", "/api/dashboard/seeker", Some(&seeker), None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_json_body() {
    let app = spawn_app().await;
    register_seeker(&app, "erin").await;

    let response = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "erin" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid JSON data")
    );

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["success"], false);
}

#[tokio::test]
async fn test_null_salary_clears_bound() {
    let app = spawn_app().await;
    register_recruiter(&app, "Vandelay").await;
    let recruiter = login(&app, "Vandelay").await;
    let job_id = post_job(&app, &recruiter, "Importer").await;

    let uri = format!("/api/jobs/{job_id}");
    let response = send(
        &app,
        "PUT",
        &uri,
        Some(&recruiter),
        Some(json!({ "salary_min": 80000.0 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        "PUT",
        &uri,
        Some(&recruiter),
        Some(json!({ "salary_min": 80000.0, "salary_max": null })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["salary_min"], 80000.0);
    assert!(body["data"]["salary_max"].is_null());
}

#[tokio::test]
async fn test_unsupported_method() {
    let app = spawn_app().await;

    let response = send(&app, "PATCH", "/api/jobs", None, None).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_create_job_validation() {
    let app = spawn_app().await;
    register_recruiter(&app, "Initech").await;
    let recruiter = login(&app, "Initech").await;

    let response = send(
        &app,
        "POST",
        "/api/jobs",
        Some(&recruiter),
        Some(json!({
            "job_title": "Analyst",
            "description": "Reports",
            "location": "Austin",
            "job_type": "full-time",
            "expiry_date": "2000-01-01",
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        "POST",
        "/api/jobs",
        Some(&recruiter),
        Some(json!({
            "job_title": "Analyst",
            "description": "Reports",
            "location": "Austin",
            "job_type": "full-time",
            "salary_min": 90000.0,
            "salary_max": 10000.0,
            "expiry_date": "2099-01-01",
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        "POST",
        "/api/jobs",
        Some(&recruiter),
        Some(json!({ "job_title": "Analyst" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_job_and_application_flow() {
    let app = spawn_app().await;

    assert_eq!(
        register_recruiter(&app, "Acme").await.status(),
        StatusCode::CREATED
    );
    assert_eq!(
        register_recruiter(&app, "Globex").await.status(),
        StatusCode::CREATED
    );
    assert_eq!(
        register_seeker(&app, "erin").await.status(),
        StatusCode::CREATED
    );

    let acme = login(&app, "Acme").await;
    let globex = login(&app, "Globex").await;
    let seeker = login(&app, "erin").await;

    let job_id = post_job(&app, &acme, "Backend Engineer").await;

    let response = send(&app, "GET", "/api/jobs?search=Backend", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let jobs = body["data"].as_array().unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0]["company_name"], "Acme");
    assert_eq!(jobs[0]["is_active"], true);

    let response = send(&app, "GET", &format!("/api/jobs/{job_id}"), None, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Another recruiter cannot touch the posting.
    let response = send(
        &app,
        "DELETE",
        &format!("/api/jobs/{job_id}"),
        Some(&globex),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let apply_uri = format!("/api/jobs/{job_id}/apply");
    let response = send(
        &app,
        "POST",
        &apply_uri,
        Some(&seeker),
        Some(json!({ "cover_letter": "I would love to join." })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let application = json_body(response).await;
    assert_eq!(application["data"]["status"], "pending");
    let application_id = application["data"]["id"].as_i64().unwrap();

    let response = send(&app, "POST", &apply_uri, Some(&seeker), Some(json!({}))).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = send(&app, "GET", "/api/applications", Some(&seeker), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["job_title"], "Backend Engineer");

    let response = send(
        &app,
        "GET",
        "/api/recruiter/applications",
        Some(&acme),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let before = json_body(response).await;
    assert_eq!(before["data"].as_array().unwrap().len(), 1);

    let response = send(
        &app,
        "GET",
        "/api/recruiter/applications",
        Some(&globex),
        None,
    )
    .await;
    assert_eq!(json_body(response).await["data"].as_array().unwrap().len(), 0);

    let status_uri = format!("/api/applications/{application_id}/status");

    let response = send(
        &app,
        "PUT",
        &status_uri,
        Some(&globex),
        Some(json!({ "status": "accepted" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The rejected update must not have touched the row.
    let response = send(
        &app,
        "GET",
        "/api/recruiter/applications",
        Some(&acme),
        None,
    )
    .await;
    let after = json_body(response).await;
    assert_eq!(after["data"][0]["status"], "pending");
    assert_eq!(after["data"][0]["updated_at"], before["data"][0]["updated_at"]);

    let response = send(
        &app,
        "PUT",
        &status_uri,
        Some(&acme),
        Some(json!({ "status": "hired" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        "PUT",
        &status_uri,
        Some(&acme),
        Some(json!({ "status": "shortlisted" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["data"]["status"], "shortlisted");

    let response = send(&app, "GET", "/api/recruiter/jobs", Some(&acme), None).await;
    let body = json_body(response).await;
    assert_eq!(body["data"][0]["application_count"], 1);

    let response = send(&app, "GET", "/api/dashboard/recruiter", Some(&acme), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["total_jobs"], 1);
    assert_eq!(body["data"]["total_applications"], 1);
    assert_eq!(body["data"]["applications_by_status"]["shortlisted"], 1);
}

#[tokio::test]
async fn test_deactivated_job_is_hidden_from_public() {
    let app = spawn_app().await;
    register_recruiter(&app, "Hooli").await;
    let recruiter = login(&app, "Hooli").await;

    let job_id = post_job(&app, &recruiter, "Data Engineer").await;

    let response = send(
        &app,
        "PUT",
        &format!("/api/jobs/{job_id}"),
        Some(&recruiter),
        Some(json!({ "is_active": false })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, "GET", "/api/jobs", None, None).await;
    assert_eq!(json_body(response).await["data"].as_array().unwrap().len(), 0);

    let uri = format!("/api/jobs/{job_id}");
    let response = send(&app, "GET", &uri, None, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, "GET", &uri, Some(&recruiter), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["data"]["is_active"], false);
}

#[tokio::test]
async fn test_profile_update() {
    let app = spawn_app().await;
    register_seeker(&app, "frank").await;
    let seeker = login(&app, "frank").await;

    let response = send(
        &app,
        "PUT",
        "/api/profile/seeker",
        Some(&seeker),
        Some(json!({ "full_name": "Frank Doe", "experience_years": 5, "skills": "Rust, SQL" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, "GET", "/api/profile", Some(&seeker), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["job_seeker"]["full_name"], "Frank Doe");
    assert_eq!(body["data"]["job_seeker"]["experience_years"], 5);

    let response = send(
        &app,
        "PUT",
        "/api/profile/seeker",
        Some(&seeker),
        Some(json!({ "experience_years": 500 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        "PUT",
        "/api/profile/recruiter",
        Some(&seeker),
        Some(json!({ "company_name": "Nope" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_change_password() {
    let app = spawn_app().await;
    register_seeker(&app, "grace").await;
    let cookie = login(&app, "grace").await;

    let response = send(
        &app,
        "PUT",
        "/api/auth/password",
        Some(&cookie),
        Some(json!({ "current_password": "nope-nope", "new_password": "newsecret1" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        "PUT",
        "/api/auth/password",
        Some(&cookie),
        Some(json!({ "current_password": "secret123", "new_password": "newsecret1" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "grace", "password": "newsecret1" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}
