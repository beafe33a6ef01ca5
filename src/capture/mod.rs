pub mod backend;
pub mod file;

pub use backend::{MediaBackend, MediaBackendConfig, MediaBackendFactory, MediaChunk, MediaSource};
pub use file::FileBackend;
