//! Bounded render pool
//!
//! Renders are CPU bound and each canvas can take tens of megabytes, so the
//! pool caps how many run at once and moves them off the async executor.
//! A permit is released only when its render actually stops, including a
//! render that outlived its time budget.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;

use crate::config::Settings;
use crate::engine::{CancelToken, PatternArtifact, PatternRequest, RenderedPattern, StitchEngine};
use crate::error::{EngineError, Result};

/// Runs engine requests on a bounded set of blocking workers
#[derive(Debug, Clone)]
pub struct RenderPool {
    engine: Arc<StitchEngine>,
    permits: Arc<Semaphore>,
    workers: usize,
    budget: Option<Duration>,
}

impl RenderPool {
    pub fn new(engine: Arc<StitchEngine>, workers: usize) -> Self {
        let workers = workers.max(1);
        Self {
            engine,
            permits: Arc::new(Semaphore::new(workers)),
            workers,
            budget: None,
        }
    }

    /// Pool sized and budgeted from `[pool]`
    pub fn from_settings(engine: Arc<StitchEngine>, settings: &Settings) -> Self {
        let pool = Self::new(engine, settings.pool.workers);
        match settings.pool.budget() {
            Some(budget) => pool.with_budget(budget),
            None => pool,
        }
    }

    /// Cancel any request that runs longer than `budget`
    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = Some(budget);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Workers not currently rendering
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    pub fn engine(&self) -> &StitchEngine {
        &self.engine
    }

    /// Generate artifact bytes in memory
    pub async fn generate(&self, request: PatternRequest) -> Result<RenderedPattern> {
        self.run(CancelToken::new(), move |engine, cancel| {
            engine.generate_with(&request, cancel)
        })
        .await
    }

    /// Generate artifacts into `dir`; `cancel` lets the caller abort early
    pub async fn generate_to_dir(
        &self,
        request: PatternRequest,
        dir: PathBuf,
        cancel: CancelToken,
    ) -> Result<PatternArtifact> {
        self.run(cancel, move |engine, cancel| {
            engine.generate_to_dir(&request, &dir, cancel)
        })
        .await
    }

    async fn run<T, F>(&self, cancel: CancelToken, job: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&StitchEngine, &CancelToken) -> Result<T> + Send + 'static,
    {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|e| EngineError::Worker(e.to_string()))?;

        let engine = Arc::clone(&self.engine);
        let worker_cancel = cancel.clone();
        let handle = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            job(&engine, &worker_cancel)
        });

        let joined = match self.budget {
            Some(budget) => match tokio::time::timeout(budget, handle).await {
                Ok(joined) => joined,
                Err(_) => {
                    log::warn!("Render exceeded {:?}, cancelling", budget);
                    cancel.cancel();
                    return Err(EngineError::TimedOut(budget));
                }
            },
            None => handle.await,
        };

        joined.map_err(|e| EngineError::Worker(e.to_string()))?
    }
}
