use actix_web::http::{header, StatusCode};
use actix_web::middleware::Logger;
use actix_web::{test, App};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use taskmgr::auth::{TokenKeys, TokenResponse};
use taskmgr::AppState;

const SECRET: &[u8] = b"integration-auth-secret";

#[test_log::test(actix_rt::test)]
async fn test_register_and_login_flow() {
    let state = AppState::in_memory(SECRET);
    let app = test::init_service(
        App::new()
            .wrap(Logger::default())
            .configure(|cfg| state.configure(cfg)),
    )
    .await;

    let credentials = json!({ "username": "alice", "password": "pw123" });

    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(&credentials)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let user: Value = test::read_body_json(resp).await;
    assert_eq!(user["username"], "alice");
    assert!(user["id"].is_i64());
    assert!(user.get("password").is_none(), "hash must never be returned");

    // Same username again is rejected
    let req_conflict = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(&credentials)
        .to_request();
    let resp_conflict = test::call_service(&app, req_conflict).await;
    assert_eq!(resp_conflict.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp_conflict).await;
    assert_eq!(body["error"], "Username already exists");

    let req_login = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(&credentials)
        .to_request();
    let resp_login = test::call_service(&app, req_login).await;
    assert_eq!(resp_login.status(), StatusCode::OK);
    let login: TokenResponse = test::read_body_json(resp_login).await;

    let claims = TokenKeys::from_secret(SECRET)
        .verify_token(&login.token)
        .expect("login token should verify with the server secret");
    assert_eq!(claims.username, "alice");
    assert_eq!(Value::from(claims.id), user["id"]);

    // The token opens the task routes
    let req_tasks = test::TestRequest::get()
        .uri("/tasks")
        .append_header((header::AUTHORIZATION, format!("Bearer {}", login.token)))
        .to_request();
    let resp_tasks = test::call_service(&app, req_tasks).await;
    assert_eq!(resp_tasks.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_wrong_password_and_unknown_user_look_the_same() {
    let state = AppState::in_memory(SECRET);
    let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;

    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({ "username": "alice", "password": "pw123" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let mut bodies = Vec::new();
    for payload in [
        json!({ "username": "alice", "password": "wrongpw" }),
        json!({ "username": "nobody", "password": "pw123" }),
        json!({ "username": "user name!", "password": "pw" }),
        json!({ "username": "alice", "password": "" }),
        json!({ "username": "", "password": "x" }),
    ] {
        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{}", payload);
        let body: Value = test::read_body_json(resp).await;
        bodies.push(body);
    }

    for body in &bodies {
        assert_eq!(body, &json!({ "error": "Invalid credentials" }));
    }
}

#[actix_rt::test]
async fn test_invalid_registration_inputs() {
    let state = AppState::in_memory(SECRET);
    let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;

    let test_cases = vec![
        // Deserialization errors (400 with a JSON body)
        (
            json!({ "password": "pw123" }),
            StatusCode::BAD_REQUEST,
            "missing username",
        ),
        (
            json!({ "username": "alice" }),
            StatusCode::BAD_REQUEST,
            "missing password",
        ),
        // Validation errors (422)
        (
            json!({ "username": "", "password": "pw123" }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "empty username",
        ),
        (
            json!({ "username": "a".repeat(33), "password": "pw123" }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "username too long",
        ),
        (
            json!({ "username": "user name!", "password": "pw123" }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "username with invalid chars",
        ),
        (
            json!({ "username": "alice", "password": "" }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "empty password",
        ),
    ];

    for (payload, expected_status, description) in test_cases {
        let req = test::TestRequest::post()
            .uri("/auth/register")
            .set_json(&payload)
            .to_request();

        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;

        assert_eq!(
            status, expected_status,
            "Test case failed: {}. Body: {}",
            description, body
        );
        assert!(body["error"].is_string(), "{}: no error message", description);
    }
}

#[actix_rt::test]
async fn test_rejected_password_is_not_echoed() {
    let state = AppState::in_memory(SECRET);
    let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;

    let password = "correct-horse-battery-staple!".repeat(3);
    assert_eq!(password.len(), 87);
    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({ "username": "alice", "password": password }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = test::read_body(resp).await;
    let text = String::from_utf8_lossy(&body);
    assert!(!text.contains("correct-horse"), "password echoed: {}", text);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "password: Password must be between 1 and 72 bytes");
}
