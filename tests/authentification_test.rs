use reqwest::Client;
use serde_json::json;
use uuid::Uuid;

mod common;
use common::utils::{create_test_user_and_login, spawn_app};

#[tokio::test]
async fn register_user_working() {
    let app = spawn_app().await;
    let client = Client::new();

    let email = format!("user{}@example.com", Uuid::new_v4());
    let response = client
        .post(format!("{}/api/auth/register", app.address))
        .json(&json!({ "email": email, "password": "password123" }))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(201, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["user"]["email"], email);
    assert_eq!(body["user"]["role"], "user");
}

#[tokio::test]
async fn register_rejects_duplicate_email() {
    let app = spawn_app().await;
    let client = Client::new();
    let (_, _, email) = create_test_user_and_login(&app).await;

    let response = client
        .post(format!("{}/api/auth/register", app.address))
        .json(&json!({ "email": email, "password": "password123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn register_rejects_short_passwords_and_bad_emails() {
    let app = spawn_app().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/auth/register", app.address))
        .json(&json!({ "email": "valid@example.com", "password": "short" }))
        .send()
        .await
        .unwrap();
    assert_eq!(400, response.status().as_u16());

    let response = client
        .post(format!("{}/api/auth/register", app.address))
        .json(&json!({ "email": "not-an-email", "password": "password123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let app = spawn_app().await;
    let client = Client::new();
    let (_, _, email) = create_test_user_and_login(&app).await;

    let response = client
        .post(format!("{}/api/auth/login", app.address))
        .json(&json!({ "email": email, "password": "wrong-password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(401, response.status().as_u16());

    let response = client
        .post(format!("{}/api/auth/login", app.address))
        .json(&json!({ "email": "nobody@example.com", "password": "password123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(401, response.status().as_u16());
}

#[tokio::test]
async fn access_token_opens_protected_routes() {
    let app = spawn_app().await;
    let client = Client::new();
    let (token, _, email) = create_test_user_and_login(&app).await;

    let response = client
        .get(format!("{}/api/users/profile", app.address))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["email"], email);
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let app = spawn_app().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/api/users/profile", app.address))
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .unwrap();
    assert_eq!(401, response.status().as_u16());
}

#[tokio::test]
async fn refresh_token_issues_a_new_pair() {
    let app = spawn_app().await;
    let client = Client::new();
    let (_, _, email) = create_test_user_and_login(&app).await;

    let login: serde_json::Value = client
        .post(format!("{}/api/auth/login", app.address))
        .json(&json!({ "email": email, "password": "password123" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let refresh_token = login["refresh_token"].as_str().unwrap();

    let response = client
        .post(format!("{}/api/auth/refresh", app.address))
        .json(&json!({ "refresh_token": refresh_token }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.unwrap();
    let new_access = body["access_token"].as_str().unwrap();

    // The refreshed access token works on protected routes
    let response = client
        .get(format!("{}/api/users/profile", app.address))
        .bearer_auth(new_access)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
}

#[tokio::test]
async fn refresh_rejects_access_tokens_and_garbage() {
    let app = spawn_app().await;
    let client = Client::new();
    let (access_token, _, _) = create_test_user_and_login(&app).await;

    // An access token is signed with a different secret, so it cannot be
    // redeemed as a refresh token
    let response = client
        .post(format!("{}/api/auth/refresh", app.address))
        .json(&json!({ "refresh_token": access_token }))
        .send()
        .await
        .unwrap();
    assert_eq!(401, response.status().as_u16());

    let response = client
        .post(format!("{}/api/auth/refresh", app.address))
        .json(&json!({ "refresh_token": "garbage" }))
        .send()
        .await
        .unwrap();
    assert_eq!(401, response.status().as_u16());
}
