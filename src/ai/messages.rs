use serde::{Deserialize, Serialize};

/// Response from the media transcription endpoint
#[derive(Debug, Deserialize)]
pub struct TranscriptionResponse {
    pub status: String,
    pub text: Option<String>,
    pub message: Option<String>,
}

/// Request body for text analysis
#[derive(Debug, Serialize)]
pub struct AnalyzeTextRequest<'a> {
    pub text: &'a str,
    pub question: &'a str,
    pub language: &'a str,
}

/// Request body shared by answer checking and ideal-answer generation
#[derive(Debug, Serialize)]
pub struct QuestionAnswerRequest<'a> {
    pub question: &'a str,
    pub answer: &'a str,
}

/// One generated question, either a bare string or an object with a
/// `text` field. Both shapes occur in the wild.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum QuestionItem {
    Text(String),
    Object { text: String },
}

impl QuestionItem {
    pub fn into_text(self) -> String {
        match self {
            QuestionItem::Text(text) => text,
            QuestionItem::Object { text } => text,
        }
    }
}

/// Question list reply, with or without the `questions` wrapper object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum QuestionsReply {
    Wrapped { questions: Vec<QuestionItem> },
    Bare(Vec<QuestionItem>),
}

impl QuestionsReply {
    pub fn into_questions(self) -> Vec<String> {
        let items = match self {
            QuestionsReply::Wrapped { questions } => questions,
            QuestionsReply::Bare(items) => items,
        };
        items.into_iter().map(QuestionItem::into_text).collect()
    }
}

/// Envelope around the ideal-answer payload. The payload itself arrives
/// as a JSON string inside `data`.
#[derive(Debug, Deserialize)]
pub struct IdealAnswerEnvelope {
    pub status: String,
    pub data: String,
}

/// Model answer with analysis of the user's attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdealAnswer {
    #[serde(default)]
    pub ideal_answer: String,
    #[serde(default)]
    pub user_strengths: String,
    #[serde(default)]
    pub areas_for_improvement: String,
}

impl IdealAnswer {
    /// Placeholder used when the service reply cannot be parsed, so a
    /// report can still be rendered.
    pub fn unavailable() -> Self {
        Self {
            ideal_answer: "Unable to generate an ideal answer for this question.".to_string(),
            user_strengths: "Analysis unavailable.".to_string(),
            areas_for_improvement: "Analysis unavailable.".to_string(),
        }
    }
}
