use super::backend::{MediaBackend, MediaBackendConfig, MediaChunk};
use anyhow::{Context, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

/// Media backend that replays a recorded file as a chunk stream.
///
/// Chunks carry synthetic timestamps spaced `chunk_duration_ms` apart,
/// so duration-based limits behave the same as with a live source.
pub struct FileBackend {
    path: String,
    config: MediaBackendConfig,
    is_capturing: Arc<AtomicBool>,
}

impl FileBackend {
    pub fn new(path: String, config: MediaBackendConfig) -> Self {
        Self {
            path,
            config,
            is_capturing: Arc::new(AtomicBool::new(false)),
        }
    }
}

#[async_trait::async_trait]
impl MediaBackend for FileBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<MediaChunk>> {
        info!("Starting file capture from {}", self.path);

        let data = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("Failed to read media file {}", self.path))?;

        info!("Loaded {} bytes from {}", data.len(), self.path);

        let (tx, rx) = mpsc::channel(16);
        let chunk_bytes = self.config.chunk_bytes;
        let chunk_duration_ms = self.config.chunk_duration_ms;
        let is_capturing = Arc::clone(&self.is_capturing);

        is_capturing.store(true, Ordering::SeqCst);

        tokio::spawn(async move {
            let mut timestamp_ms: u64 = 0;

            for chunk in data.chunks(chunk_bytes.max(1)) {
                if !is_capturing.load(Ordering::SeqCst) {
                    break;
                }

                let media_chunk = MediaChunk {
                    data: chunk.to_vec(),
                    timestamp_ms,
                };

                if tx.send(media_chunk).await.is_err() {
                    break;
                }

                timestamp_ms += chunk_duration_ms;
            }

            is_capturing.store(false, Ordering::SeqCst);
        });

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        info!("Stopping file capture from {}", self.path);
        self.is_capturing.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.is_capturing.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "file"
    }
}
