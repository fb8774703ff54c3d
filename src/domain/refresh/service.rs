use super::state::{FetchFailure, RefreshOutcome, RefreshState, RefreshTrigger, Snapshot};
use crate::domain::annotation::{AnnotationService, AnnotationServiceApi};
use crate::infrastructure::repositories::NewsRepository;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

/// Owns the refresh state machine (Idle / Fetching) and the last snapshot.
///
/// Single-flight: holding `pipeline` is the Fetching state, a trigger that
/// cannot take it is discarded. The run itself is a spawned task owning the
/// guard, so it completes and stores its snapshot even if the caller goes away.
pub struct RefreshService {
    news_repo: Arc<dyn NewsRepository>,
    annotation_service: Arc<AnnotationService>,
    country: String,
    interval: Duration,
    state: RwLock<RefreshState>,
    snapshot: Arc<RwLock<Arc<Snapshot>>>,
    pipeline: Arc<Mutex<()>>,
    fetching: Arc<AtomicBool>,
}

/// Lowers the fetching flag when the run ends, also if it panics
struct FetchingFlag(Arc<AtomicBool>);

impl FetchingFlag {
    fn raise(flag: Arc<AtomicBool>) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for FetchingFlag {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Everything one fetch-annotate-store run needs, owned by its task
struct PipelineRun {
    news_repo: Arc<dyn NewsRepository>,
    annotation_service: Arc<AnnotationService>,
    country: String,
    snapshot: Arc<RwLock<Arc<Snapshot>>>,
}

impl PipelineRun {
    async fn execute(self, confidence_threshold: f64, now: DateTime<Utc>) -> RefreshOutcome {
        let (snapshot, outcome) = match self.news_repo.fetch_headlines(&self.country).await {
            Ok(articles) => {
                let annotated = self
                    .annotation_service
                    .annotate_batch(articles, confidence_threshold)
                    .await;
                (Snapshot::succeeded(annotated, now), RefreshOutcome::Refreshed)
            }
            Err(e) => {
                tracing::error!(error = %e, country = %self.country, "Fetch cycle failed");
                (
                    Snapshot::failed(FetchFailure::from(&e), now),
                    RefreshOutcome::Failed,
                )
            }
        };

        *self.snapshot.write().await = Arc::new(snapshot);
        outcome
    }
}

impl RefreshService {
    pub fn new(
        news_repo: Arc<dyn NewsRepository>,
        annotation_service: Arc<AnnotationService>,
        country: String,
        interval: Duration,
    ) -> Self {
        Self::starting_at(news_repo, annotation_service, country, interval, Utc::now())
    }

    /// Same as `new` with an explicit session start time
    pub fn starting_at(
        news_repo: Arc<dyn NewsRepository>,
        annotation_service: Arc<AnnotationService>,
        country: String,
        interval: Duration,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            news_repo,
            annotation_service,
            country,
            interval,
            state: RwLock::new(RefreshState::new(started_at)),
            snapshot: Arc::new(RwLock::new(Arc::new(Snapshot::default()))),
            pipeline: Arc::new(Mutex::new(())),
            fetching: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn trigger(&self, trigger: RefreshTrigger, confidence_threshold: f64) -> RefreshOutcome {
        self.trigger_at(trigger, confidence_threshold, Utc::now()).await
    }

    /// Evaluate a trigger at `now`, running the pipeline when due
    pub async fn trigger_at(
        &self,
        trigger: RefreshTrigger,
        confidence_threshold: f64,
        now: DateTime<Utc>,
    ) -> RefreshOutcome {
        if trigger == RefreshTrigger::Auto && !self.is_due_at(now).await {
            return RefreshOutcome::NotDue;
        }

        let Ok(guard) = self.pipeline.clone().try_lock_owned() else {
            tracing::info!(?trigger, "Refresh already in flight, trigger discarded");
            return RefreshOutcome::AlreadyInFlight;
        };

        // A run may have finished between the check above and taking the guard
        if !self.state.read().await.should_refresh(trigger, now, self.interval) {
            return RefreshOutcome::NotDue;
        }

        let flag = FetchingFlag::raise(self.fetching.clone());

        // Reset the timer before fetching, so a failed fetch is not retried at once
        self.state.write().await.last_refresh = now;

        tracing::info!(
            ?trigger,
            country = %self.country,
            confidence_threshold = confidence_threshold,
            "Refresh started"
        );

        let run = PipelineRun {
            news_repo: self.news_repo.clone(),
            annotation_service: self.annotation_service.clone(),
            country: self.country.clone(),
            snapshot: self.snapshot.clone(),
        };
        let handle = tokio::spawn(async move {
            // Guard released before the flag is lowered
            let _flag = flag;
            let _guard = guard;
            run.execute(confidence_threshold, now).await
        });

        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, "Refresh task ended abnormally");
                RefreshOutcome::Failed
            }
        };

        tracing::info!(?outcome, "Refresh finished");
        outcome
    }

    async fn is_due_at(&self, now: DateTime<Utc>) -> bool {
        self.state.read().await.is_due(now, self.interval)
    }

    pub async fn last_refresh(&self) -> DateTime<Utc> {
        self.state.read().await.last_refresh
    }

    pub async fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot.read().await.clone()
    }

    /// True while a pipeline run is in progress
    pub fn is_fetching(&self) -> bool {
        self.fetching.load(Ordering::SeqCst)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn annotation_service(&self) -> &AnnotationService {
        &self.annotation_service
    }
}
