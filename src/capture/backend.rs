use anyhow::Result;
use tokio::sync::mpsc;

/// A chunk of recorded media bytes
#[derive(Debug, Clone)]
pub struct MediaChunk {
    /// Encoded media bytes (container format is opaque to this service)
    pub data: Vec<u8>,
    /// Timestamp in milliseconds since recording started
    pub timestamp_ms: u64,
}

/// Configuration for media capture backends
#[derive(Debug, Clone)]
pub struct MediaBackendConfig {
    /// Maximum bytes per emitted chunk
    pub chunk_bytes: usize,
    /// Nominal duration covered by one chunk, used to synthesize
    /// timestamps for non-realtime sources
    pub chunk_duration_ms: u64,
}

impl Default for MediaBackendConfig {
    fn default() -> Self {
        Self {
            chunk_bytes: 64 * 1024,
            chunk_duration_ms: 1000,
        }
    }
}

/// Media capture backend trait
///
/// Implementations:
/// - File: stream a previously recorded file (tests/batch processing)
/// - Camera/Screen: live device capture, handled by the browser client
///   in production and therefore rejected here
#[async_trait::async_trait]
pub trait MediaBackend: Send + Sync {
    /// Start capturing media
    ///
    /// Returns a channel receiver that will receive media chunks
    async fn start(&mut self) -> Result<mpsc::Receiver<MediaChunk>>;

    /// Stop capturing media
    async fn stop(&mut self) -> Result<()>;

    /// Check if backend is currently capturing
    fn is_capturing(&self) -> bool;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

/// Media source type
#[derive(Debug, Clone)]
pub enum MediaSource {
    /// Live camera + microphone capture
    Camera,
    /// File input (for testing/batch processing)
    File(String),
}

/// Media backend factory
pub struct MediaBackendFactory;

impl MediaBackendFactory {
    /// Create a media backend for the given source
    pub fn create(source: MediaSource, config: MediaBackendConfig) -> Result<Box<dyn MediaBackend>> {
        match source {
            MediaSource::File(path) => {
                let backend = super::file::FileBackend::new(path, config);
                Ok(Box::new(backend))
            }

            MediaSource::Camera => {
                anyhow::bail!(
                    "Camera access denied or unavailable: device capture runs in the browser client"
                )
            }
        }
    }
}
