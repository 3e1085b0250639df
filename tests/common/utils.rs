use std::net::TcpListener;
use std::sync::Arc;

use chrono::Utc;
use once_cell::sync::Lazy;
use reqwest::Client;
use serde_json::json;
use uuid::Uuid;

use fittrack_backend::config::jwt::JwtSettings;
use fittrack_backend::models::user::{User, UserRole};
use fittrack_backend::run;
use fittrack_backend::store::{AppStores, MemoryStore, UserStore};
use fittrack_backend::telemetry::{get_subscriber, init_subscriber};
use fittrack_backend::utils::password::hash_password;

// Ensure that the `tracing` stack is only initialised once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub address: String,
    pub store: Arc<MemoryStore>,
}

pub async fn spawn_app() -> TestApp {
    // The first time `initialize` is invoked the code in `TRACING` is executed.
    // All other invocations will instead skip execution.
    Lazy::force(&TRACING);

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    // Get port assigned by the OS
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let store = Arc::new(MemoryStore::new());
    let stores = AppStores::from_memory(store.clone());
    let jwt_settings = JwtSettings::new(
        "test-secret".to_string(),
        "test-refresh-secret".to_string(),
        15,
        7,
    );

    let server = run(listener, stores, jwt_settings).expect("Failed to bind address");
    // Launch the server as a background task
    let _ = tokio::spawn(server);

    TestApp { address, store }
}

/// Register a fresh user through the API and log them in.
/// Returns (access_token, user_id, email).
pub async fn create_test_user_and_login(app: &TestApp) -> (String, Uuid, String) {
    let client = Client::new();
    let email = format!("user{}@example.com", Uuid::new_v4());
    let password = "password123";

    let register_response = client
        .post(format!("{}/api/auth/register", app.address))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to register user.");
    assert!(register_response.status().is_success());

    let (token, user_id) = login(app, &email, password).await;
    (token, user_id, email)
}

/// Seed an admin account directly through the store and log them in.
/// Returns (access_token, user_id, email).
pub async fn create_admin_and_login(app: &TestApp) -> (String, Uuid, String) {
    let email = format!("admin{}@example.com", Uuid::new_v4());
    let password = "password123";
    let now = Utc::now();
    let admin = User {
        id: Uuid::new_v4(),
        email: email.clone(),
        password_hash: hash_password(password),
        role: UserRole::Admin,
        created_at: now,
        updated_at: now,
    };
    UserStore::insert(app.store.as_ref(), &admin)
        .await
        .expect("Failed to seed admin user.");

    let (token, user_id) = login(app, &email, password).await;
    (token, user_id, email)
}

pub async fn login(app: &TestApp, email: &str, password: &str) -> (String, Uuid) {
    let client = Client::new();
    let response = client
        .post(format!("{}/api/auth/login", app.address))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to log in.");
    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse login body.");
    let token = body["access_token"]
        .as_str()
        .expect("Missing access token")
        .to_string();
    let user_id = Uuid::parse_str(body["user"]["id"].as_str().expect("Missing user id"))
        .expect("Invalid user id");
    (token, user_id)
}

/// Log an activity through the API, returning the created activity's id.
pub async fn post_activity(app: &TestApp, token: &str, payload: serde_json::Value) -> Uuid {
    let client = Client::new();
    let response = client
        .post(format!("{}/api/activities", app.address))
        .bearer_auth(token)
        .json(&payload)
        .send()
        .await
        .expect("Failed to create activity.");
    assert_eq!(201, response.status().as_u16());

    let body: serde_json::Value = response.json().await.expect("Failed to parse activity.");
    Uuid::parse_str(body["id"].as_str().expect("Missing activity id")).expect("Invalid activity id")
}

/// Create a goal through the API, returning the created goal's id.
pub async fn post_goal(app: &TestApp, token: &str, payload: serde_json::Value) -> Uuid {
    let client = Client::new();
    let response = client
        .post(format!("{}/api/goals", app.address))
        .bearer_auth(token)
        .json(&payload)
        .send()
        .await
        .expect("Failed to create goal.");
    assert_eq!(201, response.status().as_u16());

    let body: serde_json::Value = response.json().await.expect("Failed to parse goal.");
    Uuid::parse_str(body["id"].as_str().expect("Missing goal id")).expect("Invalid goal id")
}
