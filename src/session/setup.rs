use serde::{Deserialize, Serialize};

/// Parameters chosen before an assessment starts.
///
/// Serialized with camelCase keys to stay compatible with previously
/// persisted assessment records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentSetup {
    /// Spoken language under assessment (e.g. "English")
    pub language: String,

    /// Topic the questions should cover
    pub topic: String,

    /// Difficulty label (e.g. "beginner", "intermediate", "advanced")
    pub difficulty: String,

    /// How many questions to generate
    pub number_of_questions: u32,

    /// Question style (e.g. "open-ended")
    pub question_type: String,
}

impl Default for AssessmentSetup {
    fn default() -> Self {
        Self {
            language: "English".to_string(),
            topic: "General".to_string(),
            difficulty: "intermediate".to_string(),
            number_of_questions: 3,
            question_type: "open-ended".to_string(),
        }
    }
}
