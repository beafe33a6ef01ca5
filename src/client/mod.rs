//! Client for the CRUD API, used by batch tooling and tests to drive a
//! running server the same way the browser frontend does.

use crate::db::{AssessmentRecord, UserResponse};
use crate::session::AssessmentSession;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

#[derive(Debug, Deserialize)]
struct UploadReply {
    url: String,
}

#[derive(Debug, Deserialize)]
struct AssessmentEnvelope {
    assessment: AssessmentRecord,
}

#[derive(Debug, Deserialize)]
struct ListEnvelope {
    assessments: Vec<AssessmentRecord>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// A saved assessment: the session with remote video URLs, plus upload
/// bookkeeping.
#[derive(Debug)]
pub struct SavedAssessment {
    pub session: AssessmentSession,
    pub video_urls: Vec<String>,
    pub saved_at: DateTime<Utc>,
}

/// A fetched assessment with its payload parsed back into a session.
#[derive(Debug)]
pub struct FetchedAssessment {
    pub id: String,
    pub session: AssessmentSession,
    pub date_and_time: String,
    pub created_at: String,
    pub updated_at: String,
}

/// API client bound to one user identity.
pub struct AssessmentApi {
    base_url: String,
    email: String,
    http: reqwest::Client,
}

impl AssessmentApi {
    pub fn new(base_url: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            email: email.into(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Surface the server's error message verbatim when a request fails.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        match response.json::<ErrorBody>().await {
            Ok(body) => anyhow::bail!("{}", body.error),
            Err(_) => anyhow::bail!("Request failed with status {}", status),
        }
    }

    /// Create-or-get the user this client acts as.
    pub async fn register_user(&self, username: &str, token: Option<&str>) -> Result<UserResponse> {
        let response = self
            .http
            .post(self.url("/users/save"))
            .json(&json!({
                "username": username,
                "email": self.email,
                "token": token,
            }))
            .send()
            .await
            .context("Failed to register user")?;

        Self::check(response)
            .await?
            .json()
            .await
            .context("Failed to parse user response")
    }

    /// Upload every answer video, then persist the session.
    ///
    /// Uploads run sequentially; `on_progress` receives the percentage
    /// complete after each one. Fails before any network traffic when
    /// the session has no videos at all.
    pub async fn save(
        &self,
        mut session: AssessmentSession,
        mut on_progress: impl FnMut(f64),
    ) -> Result<SavedAssessment> {
        let pending: Vec<(usize, String)> = session
            .feedback
            .iter()
            .enumerate()
            .filter_map(|(i, entry)| {
                entry
                    .as_ref()
                    .and_then(|e| e.video_url.clone())
                    .map(|url| (i, url))
            })
            .collect();

        if pending.is_empty() {
            anyhow::bail!("No videos found to upload");
        }

        let total = pending.len();
        let mut video_urls = Vec::with_capacity(total);

        for (done, (index, local_path)) in pending.into_iter().enumerate() {
            let remote_url = self.upload_video(index, &local_path).await?;

            if let Some(entry) = session.feedback[index].as_mut() {
                entry.video_url = Some(remote_url.clone());
            }
            video_urls.push(remote_url);

            on_progress(((done + 1) as f64 / total as f64) * 100.0);
        }

        let data = serde_json::to_string(&session).context("Failed to serialize assessment")?;

        let response = self
            .http
            .post(self.url("/assessments/save"))
            .header("x-user-email", &self.email)
            .json(&json!({ "assessmentData": data }))
            .send()
            .await
            .context("Failed to save assessment")?;

        Self::check(response).await?;

        info!("Saved assessment with {} videos", total);

        Ok(SavedAssessment {
            session,
            video_urls,
            saved_at: Utc::now(),
        })
    }

    async fn upload_video(&self, index: usize, local_path: &str) -> Result<String> {
        let bytes = tokio::fs::read(local_path)
            .await
            .with_context(|| format!("Failed to read video file {}", local_path))?;

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(format!("question_{}.webm", index))
            .mime_str("video/webm")
            .context("Failed to build upload part")?;

        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("questionIndex", index.to_string());

        let response = self
            .http
            .post(self.url("/upload"))
            .multipart(form)
            .send()
            .await
            .with_context(|| format!("Failed to upload video {}", index + 1))?;

        let reply: UploadReply = Self::check(response)
            .await?
            .json()
            .await
            .context("Failed to parse upload response")?;

        Ok(reply.url)
    }

    /// Fetch one assessment and parse its payload back into a session.
    pub async fn fetch(&self, id: &str) -> Result<FetchedAssessment> {
        let response = self
            .http
            .get(self.url(&format!("/assessments/{}", id)))
            .header("x-user-email", &self.email)
            .send()
            .await
            .context("Failed to fetch assessment")?;

        let envelope: AssessmentEnvelope = Self::check(response)
            .await?
            .json()
            .await
            .context("Failed to parse assessment response")?;

        let record = envelope.assessment;
        let session: AssessmentSession = serde_json::from_str(&record.data)
            .context("Failed to parse assessment data")?;

        Ok(FetchedAssessment {
            id: record.id,
            session,
            date_and_time: record.date_and_time,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }

    /// List all of the user's assessments. Payloads stay opaque here;
    /// use `fetch` for a parsed session.
    pub async fn fetch_all(&self) -> Result<Vec<AssessmentRecord>> {
        let response = self
            .http
            .get(self.url("/assessments/all"))
            .header("x-user-email", &self.email)
            .send()
            .await
            .context("Failed to list assessments")?;

        let envelope: ListEnvelope = Self::check(response)
            .await?
            .json()
            .await
            .context("Failed to parse assessment list")?;

        Ok(envelope.assessments)
    }

    /// Delete one assessment.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let response = self
            .http
            .delete(self.url(&format!("/assessments/{}", id)))
            .header("x-user-email", &self.email)
            .send()
            .await
            .context("Failed to delete assessment")?;

        Self::check(response).await?;

        Ok(())
    }
}
