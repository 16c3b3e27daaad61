//! HTTP API integration tests
//!
//! Drives the router directly with `tower::ServiceExt::oneshot` against a
//! temp-dir database: health, status polling, upload boundary rejections,
//! and the color endpoints.

mod helpers;

use axum::http::StatusCode;
use tower::ServiceExt;

use corde_server::db::codes::{insert_code, NewCode};
use corde_server::models::{PaletteItem, RgbTriple, SwatchRole};

use helpers::{
    body_json, get, multipart_styleonly_request, multipart_upload_request, post_json,
    sample_outfit_png, spawn_test_app,
};

fn palette_item(hex: &str, role: SwatchRole, rgb: (u8, u8, u8)) -> PaletteItem {
    PaletteItem {
        hex: hex.to_string(),
        ratio: 0.25,
        role,
        rgb: Some(RgbTriple { r: rgb.0, g: rgb.1, b: rgb.2 }),
    }
}

fn navy_outfit(id: &str) -> NewCode {
    NewCode {
        id: id.to_string(),
        illustration_url: format!("/processed/{}_illustration.png", id),
        original_url: format!("/uploads/{}_original.jpg", id),
        palette: vec![
            palette_item("#2C3E50", SwatchRole::Primary, (44, 62, 80)),
            palette_item("#F5F5DC", SwatchRole::Neutral, (245, 245, 220)),
        ],
        style: "standard".to_string(),
        season_tags: vec!["autumn".to_string()],
        scene_tags: vec!["office".to_string()],
        processing_time_ms: 900,
        source: "user_upload".to_string(),
    }
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let test_app = spawn_test_app().await;

    let response = test_app.app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "corde-server");
}

#[tokio::test]
async fn status_of_unknown_job_is_404() {
    let test_app = spawn_test_app().await;

    let response = test_app
        .app
        .oneshot(get("/upload/status/unknown-id"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn upload_without_image_field_is_400() {
    let test_app = spawn_test_app().await;

    let response = test_app
        .app
        .oneshot(multipart_styleonly_request("standard"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_with_wrong_media_type_is_415() {
    let test_app = spawn_test_app().await;

    let response = test_app
        .app
        .oneshot(multipart_upload_request(b"%PDF-1.4 pretend", "application/pdf", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "UNSUPPORTED_MEDIA_TYPE");
}

#[tokio::test]
async fn oversized_upload_is_rejected_before_a_job_exists() {
    let test_app = spawn_test_app().await;

    // Just over the 10MB limit; the content never has to decode because
    // the boundary check fires first.
    let oversized = vec![0u8; 10 * 1024 * 1024 + 1];
    let response = test_app
        .app
        .clone()
        .oneshot(multipart_upload_request(&oversized, "image/png", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "FILE_TOO_LARGE");

    // No job record was created for the rejected upload.
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM processing_jobs")
        .fetch_one(&test_app.state.db)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn upload_with_unknown_style_is_400() {
    let test_app = spawn_test_app().await;

    let response = test_app
        .app
        .oneshot(multipart_upload_request(
            &sample_outfit_png(),
            "image/png",
            Some("watercolor"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn color_search_requires_a_hex_parameter() {
    let test_app = spawn_test_app().await;

    let response = test_app.app.oneshot(get("/colors/search")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn color_search_rejects_malformed_hex() {
    let test_app = spawn_test_app().await;

    let response = test_app
        .app
        .oneshot(get("/colors/search?hex=nothex"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "INVALID_COLOR_FORMAT");
}

#[tokio::test]
async fn color_search_normalizes_and_excludes_the_query() {
    let test_app = spawn_test_app().await;
    insert_code(&test_app.state.db, &navy_outfit("navy-1")).await.unwrap();

    let response = test_app
        .app
        .oneshot(get("/colors/search?hex=2C3E50"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["searchColor"], "#2C3E50");

    let near: Vec<String> = body["nearColors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    assert!(!near.contains(&"#2C3E50".to_string()));
    assert!(!near.is_empty());

    // The stored outfit contains the query color, so it is related.
    let related = body["relatedCodes"].as_array().unwrap();
    assert_eq!(related[0]["id"], "navy-1");
}

#[tokio::test]
async fn color_search_returns_curated_matches() {
    let test_app = spawn_test_app().await;

    let response = test_app
        .app
        .oneshot(get("/colors/search?hex=000000"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let matches: Vec<String> = body["matchColors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    // The seeded graph pairs black with white most strongly.
    assert_eq!(matches[0], "#FFFFFF");
}

#[tokio::test]
async fn explain_classifies_opposite_hues_as_complementary() {
    let test_app = spawn_test_app().await;

    let response = test_app
        .app
        .oneshot(get("/colors/explain?base=FF0000&match=00FFFF"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["baseHex"], "#FF0000");
    assert_eq!(body["matchHex"], "#00FFFF");
    assert_eq!(body["harmonyType"], "complementary");
    assert!(!body["explanation"].as_str().unwrap().is_empty());
    assert!(!body["tips"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn explain_classifies_same_hue_as_monochromatic() {
    let test_app = spawn_test_app().await;

    let response = test_app
        .app
        .oneshot(get("/colors/explain?base=FF0000&match=FF6666"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["harmonyType"], "monochromatic");
}

#[tokio::test]
async fn explain_requires_both_parameters() {
    let test_app = spawn_test_app().await;

    let response = test_app
        .app
        .oneshot(get("/colors/explain?base=FF0000"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn simulate_replace_previews_without_persisting() {
    let test_app = spawn_test_app().await;
    insert_code(&test_app.state.db, &navy_outfit("navy-1")).await.unwrap();

    let response = test_app
        .app
        .clone()
        .oneshot(post_json(
            "/colors/simulate-replace",
            serde_json::json!({
                "codeId": "navy-1",
                "originalColor": "#2C3E50",
                "newColor": "#722F37",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let new_palette = body["newPalette"].as_array().unwrap();
    assert_eq!(new_palette[0]["hex"], "#722F37");
    // Untouched swatches survive as-is.
    assert_eq!(new_palette[1]["hex"], "#F5F5DC");
    let original_palette = body["originalPalette"].as_array().unwrap();
    assert_eq!(original_palette[0]["hex"], "#2C3E50");

    // Preview only: the stored record keeps its palette.
    let stored = corde_server::db::codes::get_code(&test_app.state.db, "navy-1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.palette[0].hex, "#2C3E50");
}

#[tokio::test]
async fn simulate_replace_unknown_outfit_is_404() {
    let test_app = spawn_test_app().await;

    let response = test_app
        .app
        .oneshot(post_json(
            "/colors/simulate-replace",
            serde_json::json!({
                "codeId": "ghost",
                "originalColor": "#000000",
                "newColor": "#FFFFFF",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reprocess_unknown_outfit_is_404() {
    let test_app = spawn_test_app().await;

    let response = test_app
        .app
        .oneshot(post_json(
            "/upload/reprocess/ghost",
            serde_json::json!({ "style": "sketch" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reprocess_with_invalid_style_is_400() {
    let test_app = spawn_test_app().await;
    insert_code(&test_app.state.db, &navy_outfit("navy-1")).await.unwrap();

    let response = test_app
        .app
        .oneshot(post_json(
            "/upload/reprocess/navy-1",
            serde_json::json!({ "style": "oilpaint" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
