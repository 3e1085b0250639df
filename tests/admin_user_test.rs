use reqwest::Client;
use uuid::Uuid;

mod common;
use common::utils::{create_admin_and_login, create_test_user_and_login, spawn_app};

#[tokio::test]
async fn user_listing_requires_admin_role() {
    let app = spawn_app().await;
    let client = Client::new();
    let (user_token, _, _) = create_test_user_and_login(&app).await;

    let response = client
        .get(format!("{}/api/users", app.address))
        .bearer_auth(&user_token)
        .send()
        .await
        .unwrap();
    assert_eq!(403, response.status().as_u16());

    let response = client
        .get(format!("{}/api/users", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(401, response.status().as_u16());
}

#[tokio::test]
async fn admin_lists_users_with_pagination() {
    let app = spawn_app().await;
    let client = Client::new();
    let (admin_token, _, _) = create_admin_and_login(&app).await;
    for _ in 0..3 {
        create_test_user_and_login(&app).await;
    }

    let body: serde_json::Value = client
        .get(format!("{}/api/users?page=1&limit=2", app.address))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    // Admin plus three regular users
    assert_eq!(body["pagination"]["total"], 4);
    assert_eq!(body["pagination"]["total_pages"], 2);
}

#[tokio::test]
async fn admin_search_filters_by_email() {
    let app = spawn_app().await;
    let client = Client::new();
    let (admin_token, _, _) = create_admin_and_login(&app).await;
    let (_, _, email) = create_test_user_and_login(&app).await;
    create_test_user_and_login(&app).await;

    // The generated addresses embed a UUID, so a prefix of it is unique
    let needle = email.split('@').next().unwrap();
    let body: serde_json::Value = client
        .get(format!("{}/api/users?search={}", app.address, needle))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["email"], email);
}

#[tokio::test]
async fn admin_deletes_a_user() {
    let app = spawn_app().await;
    let client = Client::new();
    let (admin_token, _, _) = create_admin_and_login(&app).await;
    let (user_token, user_id, _) = create_test_user_and_login(&app).await;

    let response = client
        .delete(format!("{}/api/users/{}", app.address, user_id))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    // The deleted account no longer resolves
    let response = client
        .get(format!("{}/api/users/profile", app.address))
        .bearer_auth(&user_token)
        .send()
        .await
        .unwrap();
    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn admin_cannot_delete_their_own_account() {
    let app = spawn_app().await;
    let client = Client::new();
    let (admin_token, admin_id, _) = create_admin_and_login(&app).await;

    let response = client
        .delete(format!("{}/api/users/{}", app.address, admin_id))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn deleting_an_unknown_user_returns_404() {
    let app = spawn_app().await;
    let client = Client::new();
    let (admin_token, _, _) = create_admin_and_login(&app).await;

    let response = client
        .delete(format!("{}/api/users/{}", app.address, Uuid::new_v4()))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn regular_user_cannot_delete_accounts() {
    let app = spawn_app().await;
    let client = Client::new();
    let (user_token, _, _) = create_test_user_and_login(&app).await;
    let (_, victim_id, _) = create_test_user_and_login(&app).await;

    let response = client
        .delete(format!("{}/api/users/{}", app.address, victim_id))
        .bearer_auth(&user_token)
        .send()
        .await
        .unwrap();
    assert_eq!(403, response.status().as_u16());
}
