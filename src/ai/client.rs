use super::messages::{
    AnalyzeTextRequest, IdealAnswer, IdealAnswerEnvelope, QuestionAnswerRequest, QuestionsReply,
    TranscriptionResponse,
};
use crate::session::{AssessmentSetup, CorrectnessFeedback, FeedbackAnalysis};
use anyhow::{Context, Result};
use tracing::{info, warn};

/// Client for the external analysis service that transcribes recordings,
/// scores answers and generates questions.
pub struct AiClient {
    base_url: String,
    http: reqwest::Client,
}

impl AiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Transcribe recorded media bytes.
    ///
    /// Rejects empty recordings locally so a zero-byte upload never
    /// reaches the service.
    pub async fn transcribe(
        &self,
        media: &[u8],
        question_index: usize,
        language: &str,
    ) -> Result<String> {
        if media.is_empty() {
            anyhow::bail!("No recording data available");
        }

        info!(
            "Transcribing {} bytes for question {}",
            media.len(),
            question_index
        );

        let file_part = reqwest::multipart::Part::bytes(media.to_vec())
            .file_name(format!("question_{}.mp4", question_index))
            .mime_str("video/mp4")
            .context("Failed to build multipart file part")?;

        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("questionIndex", question_index.to_string())
            .text("language", language.to_string());

        let response = self
            .http
            .post(self.url("/process-audio"))
            .multipart(form)
            .send()
            .await
            .context("Failed to send media for transcription")?;

        let reply: TranscriptionResponse = response
            .json()
            .await
            .context("Failed to parse transcription response")?;

        if reply.status == "error" {
            anyhow::bail!(
                "Transcription failed: {}",
                reply.message.unwrap_or_else(|| "unknown error".to_string())
            );
        }

        match reply.text {
            Some(text) if !text.is_empty() => Ok(text),
            _ => anyhow::bail!("Transcription returned no text"),
        }
    }

    /// Run the full feedback analysis over a transcript.
    pub async fn analyze(
        &self,
        text: &str,
        question: &str,
        language: &str,
    ) -> Result<FeedbackAnalysis> {
        info!("Requesting analysis for question: {}", question);

        let response = self
            .http
            .post(self.url("/analyze-text"))
            .json(&AnalyzeTextRequest {
                text,
                question,
                language,
            })
            .send()
            .await
            .context("Failed to request text analysis")?;

        let value: serde_json::Value = response
            .json()
            .await
            .context("Failed to parse analysis response")?;

        // The service reports failures inside a 200 body
        if let Some(error) = value.get("error").and_then(|e| e.as_str()) {
            anyhow::bail!("Analysis failed: {}", error);
        }
        if value.get("status").and_then(|s| s.as_str()) == Some("error") {
            let message = value
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown error");
            anyhow::bail!("Analysis failed: {}", message);
        }

        serde_json::from_value(value).context("Failed to decode analysis payload")
    }

    /// Generate the question list for an assessment setup.
    pub async fn generate_questions(&self, setup: &AssessmentSetup) -> Result<Vec<String>> {
        info!(
            "Generating {} {} questions on {}",
            setup.number_of_questions, setup.difficulty, setup.topic
        );

        let response = self
            .http
            .post(self.url("/generate-questions"))
            .json(setup)
            .send()
            .await
            .context("Failed to request question generation")?;

        let reply: QuestionsReply = response
            .json()
            .await
            .context("Failed to parse question list")?;

        let questions = reply.into_questions();
        if questions.is_empty() {
            anyhow::bail!("No questions received from the analysis service");
        }

        info!("Received {} questions", questions.len());

        Ok(questions)
    }

    /// Check how well an answer addresses its question.
    pub async fn check_answer(
        &self,
        question: &str,
        answer: &str,
    ) -> Result<CorrectnessFeedback> {
        let response = self
            .http
            .post(self.url("/check-answer"))
            .json(&QuestionAnswerRequest { question, answer })
            .send()
            .await
            .context("Failed to request answer check")?;

        response
            .json()
            .await
            .context("Failed to parse answer check response")
    }

    /// Fetch a model answer with strengths/improvements analysis.
    ///
    /// The payload arrives as a JSON string inside the envelope; when
    /// that inner document does not parse, a placeholder is returned
    /// instead of failing the whole report.
    pub async fn ideal_answer(&self, question: &str, answer: &str) -> Result<IdealAnswer> {
        let response = self
            .http
            .post(self.url("/get-ideal-answer"))
            .json(&QuestionAnswerRequest { question, answer })
            .send()
            .await
            .context("Failed to request ideal answer")?;

        let envelope: IdealAnswerEnvelope = response
            .json()
            .await
            .context("Failed to parse ideal answer envelope")?;

        if envelope.status != "success" {
            anyhow::bail!("Ideal answer generation failed: {}", envelope.status);
        }

        match serde_json::from_str::<IdealAnswer>(&envelope.data) {
            Ok(ideal) => Ok(ideal),
            Err(e) => {
                warn!("Ideal answer payload did not parse, using placeholder: {}", e);
                Ok(IdealAnswer::unavailable())
            }
        }
    }
}
