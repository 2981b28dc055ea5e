//! One-shot cancellable data load.
//!
//! The load runs as a spawned task. Cancelling does not abort the request
//! in flight; it clears a liveness flag so the result is discarded when it
//! arrives.

use crate::client::{read_rows_from_file, FetchError, GraduatesClient};
use crate::models::{DataOrigin, GraduateRecord, RawGraduate};
use crate::normalize::normalize_rows;
use crate::sample::generate_sample;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Where to read graduate rows from.
#[derive(Debug, Clone)]
pub enum Source {
    Http(GraduatesClient),
    File(PathBuf),
}

impl Source {
    async fn rows(&self) -> Result<Vec<RawGraduate>, FetchError> {
        match self {
            Source::Http(client) => client.fetch_rows().await,
            Source::File(path) => read_rows_from_file(path).await,
        }
    }

    fn origin(&self) -> DataOrigin {
        match self {
            Source::Http(client) => DataOrigin::Backend {
                url: client.url().to_string(),
            },
            Source::File(path) => DataOrigin::File {
                path: path.display().to_string(),
            },
        }
    }
}

/// Sample dataset substituted after a failed load.
#[derive(Debug, Clone, Copy)]
pub struct Fallback {
    pub size: usize,
    pub seed: Option<u64>,
}

/// Records ready to display plus their provenance.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub records: Vec<GraduateRecord>,
    pub origin: DataOrigin,
}

/// Result of a finished load task.
#[derive(Debug)]
pub enum LoadOutcome {
    Ready(Loaded),
    /// The load failed and no fallback was configured.
    Failed(FetchError),
    /// The task was cancelled; whatever it produced was dropped.
    Cancelled,
}

/// Read rows from `source`, normalize them, and fall back to sample data on error.
pub async fn load(source: &Source, fallback: Option<Fallback>) -> Result<Loaded, FetchError> {
    match source.rows().await {
        Ok(rows) => {
            let records = normalize_rows(&rows);
            info!("Loaded {} graduate records", records.len());
            Ok(Loaded {
                records,
                origin: source.origin(),
            })
        }
        Err(e) => match fallback {
            Some(fallback) => {
                warn!("Load failed ({}); using {} sample records", e, fallback.size);
                Ok(Loaded {
                    records: generate_sample(fallback.size, fallback.seed),
                    origin: DataOrigin::Sample {
                        error: e.to_string(),
                    },
                })
            }
            None => Err(e),
        },
    }
}

/// Clonable handle that invalidates a [`LoadTask`].
#[derive(Debug, Clone)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        debug!("Cancelling data load");
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        !self.0.load(Ordering::SeqCst)
    }
}

/// Handle to an in-flight load.
pub struct LoadTask {
    active: Arc<AtomicBool>,
    handle: JoinHandle<Result<Loaded, FetchError>>,
}

impl LoadTask {
    /// Spawn the load on the current runtime.
    pub fn spawn(source: Source, fallback: Option<Fallback>) -> Self {
        let active = Arc::new(AtomicBool::new(true));
        let handle = tokio::spawn(async move { load(&source, fallback).await });
        Self { active, handle }
    }

    /// A handle that invalidates this task; its result will be discarded.
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle(Arc::clone(&self.active))
    }

    /// Wait for the task and commit its result only if still active.
    pub async fn finish(self) -> LoadOutcome {
        let liveness = self.cancel_handle();
        let result = match self.handle.await {
            Ok(result) => result,
            Err(e) => {
                warn!("Load task did not complete: {}", e);
                return LoadOutcome::Cancelled;
            }
        };

        if liveness.is_cancelled() {
            debug!("Discarding result of cancelled load");
            return LoadOutcome::Cancelled;
        }

        match result {
            Ok(loaded) => LoadOutcome::Ready(loaded),
            Err(e) => LoadOutcome::Failed(e),
        }
    }
}
