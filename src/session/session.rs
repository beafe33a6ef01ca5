use super::feedback::{AssessmentSession, FeedbackEntry};
use super::setup::AssessmentSetup;
use crate::ai::AiClient;
use crate::capture::{MediaBackend, MediaBackendConfig, MediaBackendFactory, MediaSource};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Where a session is in the per-question flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Ready to record the current question
    Preview,
    /// Capture in progress
    Recording,
    /// Answer captured and analyzed, awaiting review
    Review,
}

/// Recording limits applied to every question
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Hard cap on recording length; capture auto-stops past this
    pub max_recording_secs: u64,

    /// Minimum transcript length required to advance
    pub min_word_count: usize,

    /// Directory where per-question recordings are written
    pub recordings_dir: PathBuf,

    /// Capture backend configuration
    pub capture: MediaBackendConfig,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            max_recording_secs: 120,
            min_word_count: 2,
            recordings_dir: PathBuf::from("recordings"),
            capture: MediaBackendConfig::default(),
        }
    }
}

/// Drives one assessment from question generation through per-question
/// capture, analysis and review, accumulating feedback as it goes.
pub struct RecordingSession {
    /// Session identifier, also used as the recordings subdirectory
    session_id: String,

    setup: AssessmentSetup,
    options: SessionOptions,
    ai: Arc<AiClient>,

    /// Generated questions, immutable once loaded
    questions: Vec<String>,

    /// One slot per question; filled as answers complete
    feedback: Vec<Option<FeedbackEntry>>,

    /// Index of the question currently being worked on
    current: usize,

    stage: Stage,

    /// Active capture backend while recording
    backend: Option<Box<dyn MediaBackend>>,
    chunk_rx: Option<mpsc::Receiver<crate::capture::MediaChunk>>,
}

impl RecordingSession {
    pub fn new(setup: AssessmentSetup, ai: Arc<AiClient>, options: SessionOptions) -> Self {
        let session_id = format!("assessment-{}", uuid::Uuid::new_v4());

        info!("Creating assessment session: {}", session_id);

        Self {
            session_id,
            setup,
            options,
            ai,
            questions: Vec::new(),
            feedback: Vec::new(),
            current: 0,
            stage: Stage::Preview,
            backend: None,
            chunk_rx: None,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn current_question(&self) -> Option<&str> {
        self.questions.get(self.current).map(String::as_str)
    }

    pub fn is_last_question(&self) -> bool {
        !self.questions.is_empty() && self.current + 1 == self.questions.len()
    }

    /// Fetch the question list from the analysis service.
    ///
    /// Questions are fetched once; calling again is a no-op.
    pub async fn load_questions(&mut self) -> Result<&[String]> {
        if self.questions.is_empty() {
            let questions = self
                .ai
                .generate_questions(&self.setup)
                .await
                .context("Failed to load assessment questions")?;

            self.feedback = vec![None; questions.len()];
            self.questions = questions;

            info!(
                "Session {} loaded {} questions",
                self.session_id,
                self.questions.len()
            );
        }

        Ok(&self.questions)
    }

    /// Start capturing the current question's answer.
    ///
    /// A backend failure (e.g. a denied capture device) leaves the
    /// session in Preview so the caller can retry with another source.
    pub async fn begin_question(&mut self, source: MediaSource) -> Result<()> {
        if self.questions.is_empty() {
            anyhow::bail!("Questions are not loaded yet");
        }
        if self.stage != Stage::Preview {
            anyhow::bail!("Cannot start recording while in {:?}", self.stage);
        }

        info!(
            "Session {} recording question {} of {}",
            self.session_id,
            self.current + 1,
            self.questions.len()
        );

        let mut backend = MediaBackendFactory::create(source, self.options.capture.clone())
            .context("Failed to create capture backend")?;

        let rx = match backend.start().await {
            Ok(rx) => rx,
            Err(e) => {
                error!("Capture failed to start: {}", e);
                return Err(e.context("Failed to start capture"));
            }
        };

        self.backend = Some(backend);
        self.chunk_rx = Some(rx);
        self.stage = Stage::Recording;

        Ok(())
    }

    /// Stop capture, persist the recording and run the answer through
    /// transcription and analysis.
    ///
    /// On an analysis failure the session drops back to Preview with
    /// previously completed answers untouched, so the question can be
    /// re-recorded.
    pub async fn finish_question(&mut self) -> Result<()> {
        if self.stage != Stage::Recording {
            anyhow::bail!("Cannot finish recording while in {:?}", self.stage);
        }

        let media = self.drain_capture().await;

        match self.analyze_answer(&media).await {
            Ok(entry) => {
                self.feedback[self.current] = Some(entry);
                self.stage = Stage::Review;
                Ok(())
            }
            Err(e) => {
                error!(
                    "Session {} question {} analysis failed: {}",
                    self.session_id, self.current, e
                );
                self.stage = Stage::Preview;
                Err(e)
            }
        }
    }

    /// Advance from review to the next question's preview.
    pub fn next_question(&mut self) -> Result<()> {
        if self.stage != Stage::Review {
            anyhow::bail!("Cannot advance while in {:?}", self.stage);
        }

        let words = self.feedback[self.current]
            .as_ref()
            .map(FeedbackEntry::word_count)
            .unwrap_or(0);

        if words < self.options.min_word_count {
            anyhow::bail!(
                "Answer too short: {} words recorded, at least {} required",
                words,
                self.options.min_word_count
            );
        }

        if self.is_last_question() {
            anyhow::bail!("Already at the final question");
        }

        self.current += 1;
        self.stage = Stage::Preview;

        Ok(())
    }

    /// Throw everything away and start over from the first question.
    pub async fn restart(&mut self) -> Result<()> {
        warn!("Session {} restarting", self.session_id);

        if let Some(mut backend) = self.backend.take() {
            backend.stop().await.ok();
        }
        self.chunk_rx = None;

        self.current = 0;
        self.feedback = vec![None; self.questions.len()];
        self.stage = Stage::Preview;

        Ok(())
    }

    /// Finalize into a persistable assessment.
    ///
    /// The final answer has to meet the same word-count bar as every
    /// intermediate one.
    pub fn into_session(self) -> Result<AssessmentSession> {
        if self.stage == Stage::Recording {
            anyhow::bail!("Cannot finalize while recording");
        }

        if let Some(entry) = self.feedback.get(self.current).and_then(Option::as_ref) {
            if entry.word_count() < self.options.min_word_count {
                anyhow::bail!(
                    "Answer too short: {} words recorded, at least {} required",
                    entry.word_count(),
                    self.options.min_word_count
                );
            }
        }

        Ok(AssessmentSession {
            questions: self.questions,
            feedback: self.feedback,
            setup: self.setup,
        })
    }

    /// Collect chunks until the source ends or the duration cap is hit.
    async fn drain_capture(&mut self) -> Vec<u8> {
        let cap_ms = self.options.max_recording_secs * 1000;
        let mut media = Vec::new();

        if let Some(mut rx) = self.chunk_rx.take() {
            while let Some(chunk) = rx.recv().await {
                media.extend_from_slice(&chunk.data);

                if chunk.timestamp_ms >= cap_ms {
                    warn!(
                        "Session {} hit the {}s recording cap, stopping capture",
                        self.session_id, self.options.max_recording_secs
                    );
                    break;
                }
            }
        }

        if let Some(mut backend) = self.backend.take() {
            if let Err(e) = backend.stop().await {
                error!("Failed to stop capture backend: {}", e);
            }
        }

        media
    }

    async fn analyze_answer(&self, media: &[u8]) -> Result<FeedbackEntry> {
        let question = self
            .current_question()
            .map(str::to_string)
            .unwrap_or_default();

        let video_path = self.persist_recording(media).await?;

        let text = self
            .ai
            .transcribe(media, self.current, &self.setup.language)
            .await?;

        let analysis = self
            .ai
            .analyze(&text, &question, &self.setup.language)
            .await?;

        Ok(FeedbackEntry {
            text,
            video_url: Some(video_path),
            analysis,
        })
    }

    async fn persist_recording(&self, media: &[u8]) -> Result<String> {
        let dir = self.options.recordings_dir.join(&self.session_id);
        tokio::fs::create_dir_all(&dir)
            .await
            .context("Failed to create recordings directory")?;

        let path = dir.join(format!("question_{}.mp4", self.current));
        tokio::fs::write(&path, media)
            .await
            .with_context(|| format!("Failed to write recording to {}", path.display()))?;

        Ok(path.display().to_string())
    }
}
