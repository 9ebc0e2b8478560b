use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use notebook_server::{AppState, NotebookServer, ServerConfig};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    NotebookServer::new(ServerConfig::default(), AppState::in_memory().unwrap()).router()
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn math_payload() -> Value {
    json!({
        "name": "Math",
        "topics": [{
            "title": "Algebra",
            "categories": [{
                "name": "Linear",
                "details": [{ "text": "vectors", "createdAt": 1000, "updatedAt": 1000 }],
                "subCategories": [{
                    "name": "Matrices",
                    "details": [{ "text": "rank" }]
                }]
            }]
        }]
    })
}

#[tokio::test]
async fn list_starts_empty() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/api/subjects", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn create_returns_201_with_assigned_id_and_lists_it() {
    let app = app();

    let (status, created) = send(&app, Method::POST, "/api/subjects", Some(math_payload())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created["id"].as_str().is_some());
    assert_eq!(created["name"], "Math");
    let stamped = &created["topics"][0]["categories"][0]["subCategories"][0]["details"][0];
    assert!(stamped["createdAt"].is_i64());
    assert_eq!(
        created["topics"][0]["categories"][0]["details"][0]["createdAt"],
        1000
    );

    let (status, listed) = send(&app, Method::GET, "/api/subjects", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([created]));
}

#[tokio::test]
async fn create_rejects_missing_or_blank_name() {
    let app = app();

    let (status, body) = send(&app, Method::POST, "/api/subjects", Some(json!({ "topics": [] }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid data");

    let (status, _) = send(&app, Method::POST, "/api/subjects", Some(json!({ "name": "  " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, listed) = send(&app, Method::GET, "/api/subjects", None).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn create_rejects_unparseable_body() {
    let app = app();
    let request = Request::post("/api/subjects")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn put_replaces_whole_document() {
    let app = app();
    let (_, created) = send(&app, Method::POST, "/api/subjects", Some(math_payload())).await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, replaced) = send(
        &app,
        Method::PUT,
        &format!("/api/subjects/{id}"),
        Some(json!({ "name": "Mathematics", "topics": [{ "title": "Calculus" }] })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["id"], id.as_str());
    assert_eq!(replaced["name"], "Mathematics");
    assert_eq!(replaced["topics"][0]["title"], "Calculus");
    assert_eq!(replaced["topics"][0]["categories"], json!([]));
    assert_eq!(replaced["topics"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn put_path_id_wins_over_body_id() {
    let app = app();
    let (_, created) = send(&app, Method::POST, "/api/subjects", Some(math_payload())).await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, replaced) = send(
        &app,
        Method::PUT,
        &format!("/api/subjects/{id}"),
        Some(json!({ "_id": "67e55044-10b1-426f-9247-bb680e5fe0c8", "name": "Renamed" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["id"], id.as_str());
}

#[tokio::test]
async fn put_unknown_or_malformed_id_is_404() {
    let app = app();
    let body = json!({ "name": "Ghost" });

    let (status, message) = send(
        &app,
        Method::PUT,
        "/api/subjects/67e55044-10b1-426f-9247-bb680e5fe0c8",
        Some(body.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(message, json!({ "message": "Subject not found" }));

    let (status, _) = send(&app, Method::PUT, "/api/subjects/not-an-id", Some(body)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn put_with_inverted_timestamps_is_400_and_keeps_document() {
    let app = app();
    let (_, created) = send(&app, Method::POST, "/api/subjects", Some(math_payload())).await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/subjects/{id}"),
        Some(json!({
            "name": "Math",
            "topics": [{ "title": "T", "categories": [{
                "name": "C",
                "details": [{ "text": "d", "createdAt": 5000, "updatedAt": 10 }]
            }]}]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, listed) = send(&app, Method::GET, "/api/subjects", None).await;
    assert_eq!(listed[0], created);
}

#[tokio::test]
async fn delete_then_delete_again_is_404() {
    let app = app();
    let (_, created) = send(&app, Method::POST, "/api/subjects", Some(math_payload())).await;
    let uri = format!("/api/subjects/{}", created["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Deleted" }));

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, listed) = send(&app, Method::GET, "/api/subjects", None).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn list_keeps_creation_order() {
    let app = app();
    for name in ["First", "Second", "Third"] {
        send(&app, Method::POST, "/api/subjects", Some(json!({ "name": name }))).await;
    }

    let (_, listed) = send(&app, Method::GET, "/api/subjects", None).await;
    let names: Vec<_> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|subject| subject["name"].as_str().unwrap().to_string())
        .collect();

    assert_eq!(names, ["First", "Second", "Third"]);
}

#[tokio::test]
async fn put_rejects_unparseable_or_wrong_shaped_body() {
    let app = app();
    let (_, created) = send(&app, Method::POST, "/api/subjects", Some(math_payload())).await;
    let uri = format!("/api/subjects/{}", created["id"].as_str().unwrap());

    let request = Request::put(uri.as_str())
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ \"name\": "))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "name": "Math", "topics": "Algebra" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid data");

    let (_, listed) = send(&app, Method::GET, "/api/subjects", None).await;
    assert_eq!(listed[0], created);
}

#[tokio::test]
async fn detail_with_only_updated_at_is_accepted() {
    let app = app();

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/subjects",
        Some(json!({
            "name": "Math",
            "topics": [{ "title": "Algebra", "categories": [{
                "name": "Linear",
                "details": [{ "text": "vectors", "updatedAt": 5 }]
            }]}]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let detail = &created["topics"][0]["categories"][0]["details"][0];
    assert_eq!(detail["createdAt"], 5);
    assert_eq!(detail["updatedAt"], 5);
}
