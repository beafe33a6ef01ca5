// Integration tests for the assessment API client
//
// These tests run the client against a mocked server and verify the
// upload-then-persist save flow, identity headers, and error surfacing.

use anyhow::Result;
use httpmock::prelude::*;
use serde_json::json;
use speakcheck::session::{
    AssessmentSession, AssessmentSetup, FeedbackAnalysis, FeedbackEntry,
};
use speakcheck::AssessmentApi;
use tempfile::TempDir;

fn answered_entry(text: &str, video_url: Option<String>) -> FeedbackEntry {
    FeedbackEntry {
        text: text.to_string(),
        video_url,
        analysis: FeedbackAnalysis::default(),
    }
}

fn session_with_videos(temp_dir: &TempDir) -> AssessmentSession {
    let video_path = temp_dir.path().join("question_0.webm");
    std::fs::write(&video_path, b"recorded answer bytes").unwrap();

    AssessmentSession {
        questions: vec![
            "Tell me about your hobbies.".to_string(),
            "Describe your hometown.".to_string(),
        ],
        feedback: vec![
            Some(answered_entry(
                "I enjoy reading and hiking",
                Some(video_path.display().to_string()),
            )),
            None,
        ],
        setup: AssessmentSetup::default(),
    }
}

#[tokio::test]
async fn test_save_uploads_videos_then_persists_once() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let session = session_with_videos(&temp_dir);

    let server = MockServer::start_async().await;
    let upload_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/upload");
            then.status(200).json_body(json!({
                "success": true,
                "url": "http://cdn.example.com/assessments/video/123_question_0_question_0.webm",
                "key": "assessments/video/123_question_0_question_0.webm",
                "questionIndex": 0
            }));
        })
        .await;
    let save_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/assessments/save")
                .header("x-user-email", "user@example.com");
            then.status(201).json_body(json!({
                "message": "Assessment saved successfully."
            }));
        })
        .await;

    let api = AssessmentApi::new(server.base_url(), "user@example.com");

    let mut progress = Vec::new();
    let saved = api.save(session, |pct| progress.push(pct)).await?;

    assert_eq!(upload_mock.hits_async().await, 1);
    assert_eq!(save_mock.hits_async().await, 1);
    assert_eq!(progress, vec![100.0]);

    // The local path was replaced with the uploaded URL before persisting
    let remote = saved.session.feedback[0]
        .as_ref()
        .and_then(|e| e.video_url.clone())
        .unwrap();
    assert!(remote.starts_with("http://cdn.example.com/"));
    assert_eq!(saved.video_urls, vec![remote]);

    Ok(())
}

#[tokio::test]
async fn test_save_without_videos_fails_before_any_request() {
    let session = AssessmentSession {
        questions: vec!["A question".to_string()],
        feedback: vec![Some(answered_entry("an answer without video", None))],
        setup: AssessmentSetup::default(),
    };

    let server = MockServer::start_async().await;
    let upload_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/upload");
            then.status(200).json_body(json!({ "url": "unused" }));
        })
        .await;

    let api = AssessmentApi::new(server.base_url(), "user@example.com");
    let err = api.save(session, |_| {}).await.unwrap_err();

    assert!(err.to_string().contains("No videos found to upload"));
    assert_eq!(upload_mock.hits_async().await, 0);
}

#[tokio::test]
async fn test_upload_failure_aborts_save() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let session = session_with_videos(&temp_dir);

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/upload");
            then.status(415)
                .json_body(json!({ "error": "Only video files are allowed!" }));
        })
        .await;
    let save_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/assessments/save");
            then.status(201).json_body(json!({ "message": "unused" }));
        })
        .await;

    let api = AssessmentApi::new(server.base_url(), "user@example.com");
    let err = api.save(session, |_| {}).await.unwrap_err();

    assert_eq!(err.to_string(), "Only video files are allowed!");
    assert_eq!(save_mock.hits_async().await, 0);

    Ok(())
}

#[tokio::test]
async fn test_fetch_parses_stored_session_payload() -> Result<()> {
    let stored = AssessmentSession {
        questions: vec!["Describe your hometown.".to_string()],
        feedback: vec![Some(answered_entry(
            "It is a small coastal town",
            Some("http://cdn.example.com/q0.webm".to_string()),
        ))],
        setup: AssessmentSetup::default(),
    };
    let data = serde_json::to_string(&stored)?;

    let server = MockServer::start_async().await;
    server
        .mock_async(move |when, then| {
            when.method(GET)
                .path("/assessments/66b1c2d3e4f5a6b7c8d9e0f1")
                .header("x-user-email", "user@example.com");
            then.status(200).json_body(json!({
                "assessment": {
                    "id": "66b1c2d3e4f5a6b7c8d9e0f1",
                    "data": data,
                    "dateAndTime": "2026-08-06T10:00:00Z",
                    "createdAt": "2026-08-06T10:00:00Z",
                    "updatedAt": "2026-08-06T10:00:00Z"
                }
            }));
        })
        .await;

    let api = AssessmentApi::new(server.base_url(), "user@example.com");
    let fetched = api.fetch("66b1c2d3e4f5a6b7c8d9e0f1").await?;

    assert_eq!(fetched.id, "66b1c2d3e4f5a6b7c8d9e0f1");
    assert_eq!(fetched.session.questions.len(), 1);
    assert_eq!(
        fetched.session.feedback[0].as_ref().unwrap().text,
        "It is a small coastal town"
    );

    Ok(())
}

#[tokio::test]
async fn test_fetch_all_returns_opaque_records() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/assessments/all")
                .header("x-user-email", "user@example.com");
            then.status(200).json_body(json!({
                "assessments": [
                    {
                        "id": "66b1c2d3e4f5a6b7c8d9e0f1",
                        "data": "{\"not\": \"parsed here\"}",
                        "dateAndTime": "2026-08-06T10:00:00Z",
                        "createdAt": "2026-08-06T10:00:00Z",
                        "updatedAt": "2026-08-06T10:00:00Z"
                    }
                ]
            }));
        })
        .await;

    let api = AssessmentApi::new(server.base_url(), "user@example.com");
    let records = api.fetch_all().await?;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "66b1c2d3e4f5a6b7c8d9e0f1");

    Ok(())
}

#[tokio::test]
async fn test_server_error_message_is_surfaced_verbatim() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(DELETE).path("/assessments/unknown");
            then.status(404)
                .json_body(json!({ "error": "Assessment not associated with the user." }));
        })
        .await;

    let api = AssessmentApi::new(server.base_url(), "user@example.com");
    let err = api.delete("unknown").await.unwrap_err();

    assert_eq!(err.to_string(), "Assessment not associated with the user.");
}

#[tokio::test]
async fn test_non_json_error_body_reports_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/assessments/all");
            then.status(500).body("boom");
        })
        .await;

    let api = AssessmentApi::new(server.base_url(), "user@example.com");
    let err = api.fetch_all().await.unwrap_err();

    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_register_user_round_trip() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/users/save").json_body(json!({
                "username": "pat",
                "email": "user@example.com",
                "token": null
            }));
            then.status(201).json_body(json!({
                "id": "66b1c2d3e4f5a6b7c8d9e0f2",
                "username": "pat",
                "email": "user@example.com",
                "assessments": [],
                "createdAt": "2026-08-06T10:00:00Z",
                "updatedAt": "2026-08-06T10:00:00Z"
            }));
        })
        .await;

    let api = AssessmentApi::new(server.base_url(), "user@example.com");
    let user = api.register_user("pat", None).await?;

    assert_eq!(user.username, "pat");
    assert_eq!(user.email, "user@example.com");
    assert!(user.assessments.is_empty());

    Ok(())
}
