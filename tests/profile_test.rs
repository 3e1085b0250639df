use reqwest::Client;
use serde_json::json;

mod common;
use common::utils::{create_test_user_and_login, login, spawn_app};

#[tokio::test]
async fn profile_returns_the_authenticated_user() {
    let app = spawn_app().await;
    let client = Client::new();
    let (token, user_id, email) = create_test_user_and_login(&app).await;

    let body: serde_json::Value = client
        .get(format!("{}/api/users/profile", app.address))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["id"], user_id.to_string());
    assert_eq!(body["email"], email);
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn profile_update_changes_email() {
    let app = spawn_app().await;
    let client = Client::new();
    let (token, _, _) = create_test_user_and_login(&app).await;

    let new_email = format!("renamed{}@example.com", uuid::Uuid::new_v4());
    let response = client
        .put(format!("{}/api/users/profile", app.address))
        .bearer_auth(&token)
        .json(&json!({ "email": new_email }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    // The new email is a valid login
    login(&app, &new_email, "password123").await;
}

#[tokio::test]
async fn profile_update_rejects_taken_email() {
    let app = spawn_app().await;
    let client = Client::new();
    let (_, _, taken_email) = create_test_user_and_login(&app).await;
    let (token, _, _) = create_test_user_and_login(&app).await;

    let response = client
        .put(format!("{}/api/users/profile", app.address))
        .bearer_auth(&token)
        .json(&json!({ "email": taken_email }))
        .send()
        .await
        .unwrap();
    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn password_change_requires_the_current_password() {
    let app = spawn_app().await;
    let client = Client::new();
    let (token, _, email) = create_test_user_and_login(&app).await;

    // Missing current password
    let response = client
        .put(format!("{}/api/users/profile", app.address))
        .bearer_auth(&token)
        .json(&json!({ "new_password": "newpassword456" }))
        .send()
        .await
        .unwrap();
    assert_eq!(400, response.status().as_u16());

    // Wrong current password
    let response = client
        .put(format!("{}/api/users/profile", app.address))
        .bearer_auth(&token)
        .json(&json!({
            "current_password": "wrong-password",
            "new_password": "newpassword456"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(400, response.status().as_u16());

    // Correct current password
    let response = client
        .put(format!("{}/api/users/profile", app.address))
        .bearer_auth(&token)
        .json(&json!({
            "current_password": "password123",
            "new_password": "newpassword456"
        }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    login(&app, &email, "newpassword456").await;
}

#[tokio::test]
async fn empty_profile_update_is_rejected() {
    let app = spawn_app().await;
    let client = Client::new();
    let (token, _, _) = create_test_user_and_login(&app).await;

    let response = client
        .put(format!("{}/api/users/profile", app.address))
        .bearer_auth(&token)
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(400, response.status().as_u16());
}
