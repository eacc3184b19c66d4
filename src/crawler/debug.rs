//! Optional sink for raw fetched documents
//!
//! The fetcher hands every decoded body to a [`DebugSink`]. Writing is
//! best-effort: a sink failure is logged and never fails the fetch.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::crawler::url::SearchRequest;
use crate::utils::slugify;

/// Capability for persisting a raw document for later inspection
#[async_trait]
pub trait DebugSink: Send + Sync {
    /// Record the body fetched for `request`
    async fn record(&self, request: &SearchRequest, body: &str);
}

/// Sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDebugSink;

#[async_trait]
impl DebugSink for NoopDebugSink {
    async fn record(&self, _request: &SearchRequest, _body: &str) {}
}

/// Sink writing one uniquely named file per call into a directory
///
/// File names carry a fresh UUID so concurrent calls never share a file.
#[derive(Debug, Clone)]
pub struct FileDebugSink {
    dir: PathBuf,
}

impl FileDebugSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, request: &SearchRequest) -> PathBuf {
        let slug = slugify(request.query().as_str(), 40);
        self.dir.join(format!("ebay-{slug}-{}.html", Uuid::new_v4()))
    }
}

#[async_trait]
impl DebugSink for FileDebugSink {
    async fn record(&self, request: &SearchRequest, body: &str) {
        if let Err(e) = tokio::fs::create_dir_all(&self.dir).await {
            tracing::warn!(dir = %self.dir.display(), error = %e, "Failed to create debug dump directory");
            return;
        }

        let path = self.path_for(request);
        match tokio::fs::write(&path, body).await {
            Ok(()) => tracing::debug!(path = %path.display(), bytes = body.len(), "Saved debug document"),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "Failed to save debug document"),
        }
    }
}
