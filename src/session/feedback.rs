use serde::{Deserialize, Serialize};

/// Grammar analysis for one answer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GrammarFeedback {
    #[serde(default)]
    pub error_count: u32,
    #[serde(default)]
    pub errors: Vec<GrammarError>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GrammarError {
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub suggestion: String,
    #[serde(default)]
    pub explanation: String,
}

/// Pronunciation analysis for one answer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PronunciationFeedback {
    #[serde(default)]
    pub error_count: u32,
    #[serde(default)]
    pub errors: Vec<PronunciationError>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PronunciationError {
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub phonetic: String,
    #[serde(default)]
    pub explanation: String,
}

/// Fluency analysis (filler word density)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FluencyFeedback {
    #[serde(default)]
    pub fluency_score: f64,
    #[serde(default)]
    pub filler_word_count: u32,
    #[serde(default)]
    pub filler_words: Vec<FillerWord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FillerWord {
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub position: u32,
}

/// Vocabulary analysis (advanced word usage)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VocabularyFeedback {
    #[serde(default)]
    pub unique_advanced_words: Vec<String>,
    #[serde(default)]
    pub total_advanced_words: u32,
}

/// Answer correctness scores from the analysis service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorrectnessFeedback {
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub relevance_score: f64,
    #[serde(default)]
    pub quality_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

/// Pause analysis extracted from the recording
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PauseFeedback {
    #[serde(default)]
    pub total_pauses: u32,
    #[serde(default)]
    pub total_pause_duration: f64,
    #[serde(default)]
    pub pause_details: Vec<PauseDetail>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PauseDetail {
    #[serde(default)]
    pub start: f64,
    #[serde(default)]
    pub end: f64,
    #[serde(default)]
    pub duration: f64,
}

/// Full analysis of one answer, as returned by the analysis service.
///
/// Every area is optional: older records and degraded analysis responses
/// may omit any of them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedbackAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grammar: Option<GrammarFeedback>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<PronunciationFeedback>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fluency: Option<FluencyFeedback>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vocabulary: Option<VocabularyFeedback>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correctness: Option<CorrectnessFeedback>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pauses: Option<PauseFeedback>,
}

/// Per-question feedback record stored in an assessment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedbackEntry {
    /// Transcript of the spoken answer
    #[serde(default)]
    pub text: String,

    /// Where the answer video ended up (local path before upload,
    /// public URL after)
    #[serde(default, rename = "videoUrl", skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,

    #[serde(flatten)]
    pub analysis: FeedbackAnalysis,
}

impl FeedbackEntry {
    /// Number of whitespace-separated words in the transcript
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// A completed (or partially completed) assessment: the generated
/// questions, one optional feedback entry per question, and the setup
/// that produced it.
///
/// `feedback[i]` is `Some` exactly when question `i` was answered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentSession {
    pub questions: Vec<String>,
    pub feedback: Vec<Option<FeedbackEntry>>,
    pub setup: super::setup::AssessmentSetup,
}

impl AssessmentSession {
    /// Number of answered questions
    pub fn answered_count(&self) -> usize {
        self.feedback.iter().filter(|f| f.is_some()).count()
    }
}
