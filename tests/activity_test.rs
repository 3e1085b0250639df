use chrono::{Duration, Utc};
use reqwest::Client;
use serde_json::json;

mod common;
use common::utils::{create_test_user_and_login, post_activity, post_goal, spawn_app};

#[tokio::test]
async fn create_activity_working() {
    let app = spawn_app().await;
    let client = Client::new();
    let (token, _, _) = create_test_user_and_login(&app).await;

    let response = client
        .post(format!("{}/api/activities", app.address))
        .bearer_auth(&token)
        .json(&json!({
            "type": "running",
            "duration": 30,
            "calories": 250,
            "distance": 5.2,
            "notes": "Morning run"
        }))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(201, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["type"], "running");
    assert_eq!(body["duration"], 30.0);
    assert_eq!(body["notes"], "Morning run");
}

#[tokio::test]
async fn create_activity_rejects_invalid_payloads() {
    let app = spawn_app().await;
    let client = Client::new();
    let (token, _, _) = create_test_user_and_login(&app).await;

    // Unknown activity type fails deserialization
    let response = client
        .post(format!("{}/api/activities", app.address))
        .bearer_auth(&token)
        .json(&json!({ "type": "yodeling", "duration": 30 }))
        .send()
        .await
        .unwrap();
    assert_eq!(400, response.status().as_u16());

    // Sub-minute durations are rejected
    let response = client
        .post(format!("{}/api/activities", app.address))
        .bearer_auth(&token)
        .json(&json!({ "type": "running", "duration": 0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(400, response.status().as_u16());

    // Negative distance is rejected
    let response = client
        .post(format!("{}/api/activities", app.address))
        .bearer_auth(&token)
        .json(&json!({ "type": "running", "duration": 30, "distance": -1.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn activities_require_authentication() {
    let app = spawn_app().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/api/activities", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(401, response.status().as_u16());
}

#[tokio::test]
async fn activities_are_scoped_to_their_owner() {
    let app = spawn_app().await;
    let client = Client::new();
    let (owner_token, _, _) = create_test_user_and_login(&app).await;
    let (intruder_token, _, _) = create_test_user_and_login(&app).await;

    let activity_id = post_activity(
        &app,
        &owner_token,
        json!({ "type": "cycling", "duration": 60 }),
    )
    .await;

    let response = client
        .get(format!("{}/api/activities/{}", app.address, activity_id))
        .bearer_auth(&intruder_token)
        .send()
        .await
        .unwrap();
    assert_eq!(403, response.status().as_u16());

    // The owner's listing contains it, the intruder's does not
    let owned: serde_json::Value = client
        .get(format!("{}/api/activities", app.address))
        .bearer_auth(&owner_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(owned.as_array().unwrap().len(), 1);

    let foreign: serde_json::Value = client
        .get(format!("{}/api/activities", app.address))
        .bearer_auth(&intruder_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(foreign.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn updating_an_activity_refreshes_goal_progress() {
    let app = spawn_app().await;
    let client = Client::new();
    let (token, _, _) = create_test_user_and_login(&app).await;

    let goal_id = post_goal(
        &app,
        &token,
        json!({
            "title": "Monthly minutes",
            "type": "duration",
            "target_value": 100.0,
            "start_date": (Utc::now() - Duration::days(7)).date_naive().to_string(),
            "end_date": (Utc::now() + Duration::days(7)).date_naive().to_string(),
        }),
    )
    .await;
    let activity_id = post_activity(&app, &token, json!({ "type": "gym", "duration": 40 })).await;

    let response = client
        .put(format!("{}/api/activities/{}", app.address, activity_id))
        .bearer_auth(&token)
        .json(&json!({ "type": "gym", "duration": 120 }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let goal: serde_json::Value = client
        .get(format!("{}/api/goals/{}", app.address, goal_id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(goal["current_value"], 120.0);
    assert_eq!(goal["status"], "completed");
}

#[tokio::test]
async fn deleting_an_activity_refreshes_goal_progress() {
    let app = spawn_app().await;
    let client = Client::new();
    let (token, _, _) = create_test_user_and_login(&app).await;

    let goal_id = post_goal(
        &app,
        &token,
        json!({
            "title": "Count goal",
            "type": "activities_count",
            "target_value": 5.0,
            "start_date": (Utc::now() - Duration::days(7)).date_naive().to_string(),
            "end_date": (Utc::now() + Duration::days(7)).date_naive().to_string(),
        }),
    )
    .await;
    let first = post_activity(&app, &token, json!({ "type": "walking", "duration": 20 })).await;
    post_activity(&app, &token, json!({ "type": "walking", "duration": 25 })).await;

    let response = client
        .delete(format!("{}/api/activities/{}", app.address, first))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let goal: serde_json::Value = client
        .get(format!("{}/api/goals/{}", app.address, goal_id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(goal["current_value"], 1.0);
}

#[tokio::test]
async fn stats_summarise_activity_history() {
    let app = spawn_app().await;
    let client = Client::new();
    let (token, _, _) = create_test_user_and_login(&app).await;

    post_activity(
        &app,
        &token,
        json!({ "type": "running", "duration": 30, "calories": 300, "distance": 5.0 }),
    )
    .await;
    post_activity(
        &app,
        &token,
        json!({ "type": "running", "duration": 50, "calories": 500, "distance": 9.0 }),
    )
    .await;
    post_activity(&app, &token, json!({ "type": "gym", "duration": 40 })).await;

    let stats: serde_json::Value = client
        .get(format!("{}/api/activities/stats", app.address))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(stats["period"], "all");
    assert_eq!(stats["total_activities"], 3);
    assert_eq!(stats["total_duration"], 120.0);
    assert_eq!(stats["total_calories"], 800.0);
    assert_eq!(stats["total_distance"], 14.0);
    assert_eq!(stats["avg_duration"], 40.0);
    assert_eq!(stats["by_type"]["running"]["count"], 2);
    assert_eq!(stats["by_type"]["gym"]["count"], 1);
}
