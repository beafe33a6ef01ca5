//! Assessment session management
//!
//! This module provides the `RecordingSession` abstraction that manages:
//! - Question loading from the analysis service
//! - Per-question media capture and duration limits
//! - Transcription and feedback analysis of each answer
//! - Review/advance/restart flow and final session assembly

mod feedback;
mod session;
mod setup;

pub use feedback::{
    AssessmentSession, CorrectnessFeedback, FeedbackAnalysis, FeedbackEntry, FillerWord,
    FluencyFeedback, GrammarError, GrammarFeedback, PauseDetail, PauseFeedback,
    PronunciationError, PronunciationFeedback, VocabularyFeedback,
};
pub use session::{RecordingSession, SessionOptions, Stage};
pub use setup::AssessmentSetup;
