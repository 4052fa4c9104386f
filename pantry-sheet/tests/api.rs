//! Drive the sheet router over real HTTP.

use pantry_sheet::{config::AuthConfig, database::Database, router, AppState};
use reqwest::StatusCode;
use serde_json::{json, Value};

struct TestServer {
    base_url: String,
    _dir: tempfile::TempDir,
    handle: tokio::task::JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn start(token: Option<&str>) -> TestServer {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::connect(dir.path().join("sheet.db").to_str().unwrap()).unwrap();
    let app = router(AppState {
        db,
        auth: AuthConfig {
            token: token.map(Into::into),
        },
    });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    TestServer {
        base_url,
        _dir: dir,
        handle,
    }
}

#[tokio::test]
async fn recipe_lifecycle() {
    let server = start(None).await;
    let client = reqwest::Client::new();
    let url = |path: &str| format!("{}{}", server.base_url, path);

    let created: Value = client
        .post(url("/recipes"))
        .json(&json!({
            "recipe": {"title": "Gazpacho", "image": "https://img/g.jpg", "category": "Starters"}
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = created["recipe"]["id"].as_i64().unwrap();
    assert_eq!(created["recipe"]["likes"], 0);
    assert_eq!(created["recipe"]["prep_time"], "");

    let updated: Value = client
        .put(url(&format!("/recipes/{id}")))
        .json(&json!({"recipe": {"likes": 3}}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated["recipe"]["likes"], 3);
    assert_eq!(updated["recipe"]["title"], "Gazpacho");

    let listed: Value = client
        .get(url("/recipes"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed["recipes"].as_array().unwrap().len(), 1);

    let deleted = client
        .delete(url(&format!("/recipes/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let missing = client
        .get(url(&format!("/recipes/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn categories_are_listed() {
    let server = start(None).await;
    let listed: Value = reqwest::get(format!("{}/categories", server.base_url))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let names: Vec<&str> = listed["categories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Starters", "Main Courses", "Desserts", "Drinks"]);

    let one: Value = reqwest::get(format!("{}/categories/3", server.base_url))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(one["category"]["name"], "Desserts");
}

#[tokio::test]
async fn bearer_token_is_enforced_when_configured() {
    let server = start(Some("s3cret")).await;
    let client = reqwest::Client::new();
    let url = format!("{}/recipes", server.base_url);

    let anonymous = client.get(&url).send().await.unwrap();
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let wrong = client.get(&url).bearer_auth("nope").send().await.unwrap();
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

    let right = client.get(&url).bearer_auth("s3cret").send().await.unwrap();
    assert_eq!(right.status(), StatusCode::OK);

    // Health checks stay open
    let health = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(health.status(), StatusCode::OK);
}
