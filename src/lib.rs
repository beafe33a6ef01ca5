pub mod ai;
pub mod capture;
pub mod client;
pub mod config;
pub mod db;
pub mod http;
pub mod report;
pub mod scoring;
pub mod session;
pub mod storage;

pub use ai::{AiClient, IdealAnswer};
pub use capture::{MediaBackend, MediaBackendConfig, MediaBackendFactory, MediaChunk, MediaSource};
pub use client::AssessmentApi;
pub use config::Config;
pub use db::Store;
pub use http::{create_router, ApiError, AppState};
pub use report::{render_markdown, Report};
pub use scoring::{overall_score, OverallScoreFormula, OverallStats, PerformanceScores};
pub use session::{
    AssessmentSession, AssessmentSetup, FeedbackEntry, RecordingSession, SessionOptions, Stage,
};
pub use storage::StorageClient;
