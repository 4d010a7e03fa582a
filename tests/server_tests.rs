//! # Server Tests
//!
//! Exercise the HTTP routes through the router, plus one end-to-end run of a
//! calibration session against a live server.

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use image::{Rgba, RgbaImage};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use stampcal::backend::{Backend, HttpBackend};
use stampcal::editor::{Editor, Field, Message, SaveState};
use stampcal::render::font::FontBook;
use stampcal::server::{router, AppState, ServerConfig};
use stampcal::session::Session;

struct Fixture {
    dir: TempDir,
    app: Router,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let stamp_dir = dir.path().join("stamp");
        std::fs::create_dir(&stamp_dir).unwrap();

        let app = router(Arc::new(AppState::new(Self::config(dir.path()))));
        Self { dir, app }
    }

    fn config(root: &Path) -> ServerConfig {
        ServerConfig {
            listen_addr: "127.0.0.1:0".to_string(),
            stamp_dir: root.join("stamp"),
            config_file: root.join("stamp_config.json"),
            font_dir: None,
        }
    }

    fn add_stamp(&self, name: &str, width: u32, height: u32) {
        let image = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
        image.save(self.dir.path().join("stamp").join(name)).unwrap();
    }

    fn write_config(&self, value: &Value) {
        std::fs::write(
            self.dir.path().join("stamp_config.json"),
            serde_json::to_vec(value).unwrap(),
        )
        .unwrap();
    }

    async fn get(&self, uri: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::get(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    async fn post_json(&self, uri: &str, body: &Value) -> (StatusCode, Vec<u8>) {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }
}

fn json_body(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap()
}

// ============================================================================
// Editor API
// ============================================================================

#[tokio::test]
async fn test_list_stamps_sorted_images_only() {
    let fixture = Fixture::new();
    fixture.add_stamp("b.png", 4, 4);
    fixture.add_stamp("a.png", 4, 4);
    std::fs::write(fixture.dir.path().join("stamp/notes.txt"), "x").unwrap();

    let (status, body) = fixture.get("/api/stamps").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body), json!(["a.png", "b.png"]));
}

#[tokio::test]
async fn test_config_missing_file_is_empty_object() {
    let fixture = Fixture::new();
    let (status, body) = fixture.get("/api/config").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body), json!({}));
}

#[tokio::test]
async fn test_config_save_then_load() {
    let fixture = Fixture::new();
    let config = json!({"a.png": {"x": 10, "y": 20, "font": "Arial", "size": 24, "color": "#000000"}});

    let (status, body) = fixture.post_json("/api/config", &config).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body), json!({"status": "success"}));

    let (_, body) = fixture.get("/api/config").await;
    assert_eq!(json_body(&body), config);
}

#[tokio::test]
async fn test_config_save_rejects_non_object() {
    let fixture = Fixture::new();
    let (status, body) = fixture.post_json("/api/config", &json!([1, 2])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json_body(&body)["status"], json!("error"));
}

#[tokio::test]
async fn test_image_served_with_content_type() {
    let fixture = Fixture::new();
    fixture.add_stamp("a.png", 3, 2);

    let request = Request::get("/images/a.png").body(Body::empty()).unwrap();
    let response = fixture.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let image = image::load_from_memory(&bytes).unwrap();
    assert_eq!((image.width(), image.height()), (3, 2));
}

#[tokio::test]
async fn test_image_missing_or_escaping_is_not_found() {
    let fixture = Fixture::new();
    std::fs::write(fixture.dir.path().join("stamp_config.json"), "{}").unwrap();

    let (status, _) = fixture.get("/images/nope.png").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = fixture.get("/images/..%2Fstamp_config.json").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Generation API
// ============================================================================

#[tokio::test]
async fn test_generate_scaled_png() {
    let fixture = Fixture::new();
    fixture.add_stamp("a.png", 200, 100);
    fixture.write_config(&json!({"a.png": {"x": 100, "y": 50, "font": "Arial", "size": 24, "color": "#ff0000"}}));

    let (status, body) = fixture
        .post_json("/generate", &json!({"stamp": "a.png", "number": 117, "width": 100}))
        .await;
    assert_eq!(status, StatusCode::OK);

    let image = image::load_from_memory(&body).unwrap().to_rgba8();
    assert_eq!(image.dimensions(), (100, 50));
    // Red text centered on the scaled point (50, 25)
    let red = (38..62)
        .flat_map(|x| (15..36).map(move |y| (x, y)))
        .filter(|(x, y)| {
            let p = image.get_pixel(*x, *y);
            p[0] > 200 && p[1] < 80
        })
        .count();
    assert!(red > 0);
}

#[tokio::test]
async fn test_generate_errors() {
    let fixture = Fixture::new();
    fixture.add_stamp("a.png", 10, 10);
    fixture.write_config(&json!({"gone.png": {"x": 1, "y": 1}}));

    let (status, body) = fixture.post_json("/generate", &json!({"stamp": "a.png"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json_body(&body), json!({"error": "Missing data"}));

    let (status, body) = fixture
        .post_json("/generate", &json!({"stamp": "a.png", "number": "1"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json_body(&body), json!({"error": "Stamp not configured"}));

    let (status, body) = fixture
        .post_json("/generate", &json!({"stamp": "gone.png", "number": "1"}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json_body(&body), json!({"error": "Image not found"}));
}

#[tokio::test]
async fn test_generate_rejects_oversized_width() {
    let fixture = Fixture::new();
    fixture.add_stamp("a.png", 100, 100);
    fixture.write_config(&json!({"a.png": {"x": 50, "y": 50}}));

    let (status, body) = fixture
        .post_json("/generate", &json!({"stamp": "a.png", "number": "1", "width": 1_000_000}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json_body(&body), json!({"error": "Requested width is too large"}));
}

#[tokio::test]
async fn test_generate_with_malformed_neighbor_record() {
    let fixture = Fixture::new();
    fixture.add_stamp("a.png", 40, 20);
    fixture.add_stamp("b.png", 40, 20);

    let config = json!({"a.png": {"x": 20, "y": 10, "font": "Arial", "size": 12, "color": "#000000"}, "b.png": 5});
    let (status, _) = fixture.post_json("/api/config", &config).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = fixture
        .post_json("/generate", &json!({"stamp": "a.png", "number": "1"}))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = fixture
        .post_json("/generate", &json!({"stamp": "b.png", "number": "1"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json_body(&body), json!({"error": "Stamp not configured"}));
}

// ============================================================================
// End to end
// ============================================================================

#[tokio::test]
async fn test_session_against_live_server() {
    let fixture = Fixture::new();
    fixture.add_stamp("a.png", 120, 60);
    fixture.add_stamp("b.png", 40, 40);
    fixture.write_config(&json!({"a.png": {"x": 5, "y": 6, "font": "Impact", "size": 30, "color": "#123456", "note": "keep"}}));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = fixture.app.clone();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let backend = HttpBackend::new(&format!("http://{}", addr)).unwrap();
    let mut session = Session::new(Editor::new(FontBook::bitmap_only()), backend);
    session.initialize().await;

    assert_eq!(session.editor().selected(), Some("a.png"));
    assert_eq!(session.editor().form().font, "Impact");
    assert_eq!(session.editor().surface().width(), 120);

    session.dispatch(Message::SelectStamp("b.png".to_string()));
    session.settle().await;
    session.dispatch(Message::EditField(Field::Y, "7".to_string()));
    session.dispatch(Message::Save);
    session.settle().await;
    assert_eq!(session.editor().save_state(), SaveState::Succeeded);

    let stored: Value =
        serde_json::from_slice(&std::fs::read(fixture.dir.path().join("stamp_config.json")).unwrap())
            .unwrap();
    assert_eq!(
        stored,
        json!({
            "a.png": {"x": 5, "y": 6, "font": "Impact", "size": 30, "color": "#123456", "note": "keep"},
            "b.png": {"x": 20, "y": 7, "font": "Arial", "size": 24, "color": "#000000"}
        })
    );

    // A fresh client sees the same store
    let reloaded = HttpBackend::new(&format!("http://{}", addr))
        .unwrap()
        .load_config()
        .await
        .unwrap();
    assert_eq!(reloaded.get("b.png").unwrap().y(), Some(7));
}

#[tokio::test]
async fn test_session_survives_malformed_record() {
    let fixture = Fixture::new();
    fixture.add_stamp("a.png", 120, 60);
    fixture.add_stamp("b.png", 40, 40);
    let stored = json!({
        "a.png": {"x": 5, "y": 6, "font": "Impact", "size": 30, "color": "#123456"},
        "b.png": 5,
        "c.png": {"color": [1], "font": 5, "size": null, "x": "12", "y": 7.9}
    });
    fixture.write_config(&stored);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = fixture.app.clone();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let backend = HttpBackend::new(&format!("http://{}", addr)).unwrap();
    let mut session = Session::new(Editor::new(FontBook::bitmap_only()), backend);
    session.initialize().await;

    assert_eq!(session.editor().stamps().len(), 2);
    assert_eq!(session.editor().form().x, "5");
    assert_eq!(session.editor().form().y, "6");

    session.dispatch(Message::Save);
    session.settle().await;
    assert_eq!(session.editor().save_state(), SaveState::Succeeded);

    // Records the editor never touched are written back unchanged
    let saved: Value =
        serde_json::from_slice(&std::fs::read(fixture.dir.path().join("stamp_config.json")).unwrap())
            .unwrap();
    assert_eq!(saved, stored);
}
