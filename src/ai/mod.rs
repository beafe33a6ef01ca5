pub mod client;
pub mod messages;

pub use client::AiClient;
pub use messages::{IdealAnswer, QuestionsReply, TranscriptionResponse};
