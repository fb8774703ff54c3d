use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    domain::{
        dashboard::DashboardView,
        filter::{HeadlineFilter, SentimentFilter},
        refresh::{RefreshOutcome, RefreshService, RefreshTrigger},
    },
    error::{AppError, AppResult},
};

/// Query of GET /api/dashboard, JSON body of POST /api/dashboard/refresh
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub sentiment: Option<String>,
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub auto_refresh: Option<bool>,
}

/// Validated dashboard settings
struct DashboardSettings {
    filter: HeadlineFilter,
    threshold: f64,
    auto_refresh: bool,
}

pub struct DashboardController {
    refresh_service: Arc<RefreshService>,
    default_threshold: f64,
}

impl DashboardController {
    pub fn new(refresh_service: Arc<RefreshService>, default_threshold: f64) -> Self {
        Self {
            refresh_service,
            default_threshold,
        }
    }

    /// GET /api/dashboard - Current headlines, refreshing first when the
    /// auto-refresh interval has elapsed
    pub async fn get_dashboard(
        State(controller): State<Arc<DashboardController>>,
        query: Result<Query<DashboardQuery>, QueryRejection>,
    ) -> AppResult<Json<DashboardView>> {
        let Query(query) = query?;
        let settings = controller.settings(&query)?;

        let outcome = if settings.auto_refresh {
            controller
                .refresh_service
                .trigger(RefreshTrigger::Auto, settings.threshold)
                .await
        } else {
            RefreshOutcome::Skipped
        };

        Ok(Json(controller.render(&settings.filter, outcome).await))
    }

    /// POST /api/dashboard/refresh - Manual refresh, then the dashboard.
    /// An empty body uses the defaults.
    pub async fn refresh(
        State(controller): State<Arc<DashboardController>>,
        body: Bytes,
    ) -> AppResult<Json<DashboardView>> {
        let query = if body.iter().all(u8::is_ascii_whitespace) {
            DashboardQuery::default()
        } else {
            let Json(query) = Json::<DashboardQuery>::from_bytes(&body)?;
            query
        };
        let settings = controller.settings(&query)?;

        let outcome = controller
            .refresh_service
            .trigger(RefreshTrigger::Manual, settings.threshold)
            .await;

        Ok(Json(controller.render(&settings.filter, outcome).await))
    }

    fn settings(&self, query: &DashboardQuery) -> AppResult<DashboardSettings> {
        let sentiment = match query.sentiment.as_deref() {
            Some(value) if !value.trim().is_empty() => value
                .parse::<SentimentFilter>()
                .map_err(AppError::BadRequest)?,
            _ => SentimentFilter::All,
        };

        let threshold = query.threshold.unwrap_or(self.default_threshold);
        if !(0.0..=1.0).contains(&threshold) {
            return Err(AppError::BadRequest(format!(
                "threshold must be between 0 and 1, got {}",
                threshold
            )));
        }

        Ok(DashboardSettings {
            filter: HeadlineFilter::new(sentiment, query.keyword.as_deref()),
            threshold,
            auto_refresh: query.auto_refresh.unwrap_or(true),
        })
    }

    async fn render(&self, filter: &HeadlineFilter, outcome: RefreshOutcome) -> DashboardView {
        let snapshot = self.refresh_service.snapshot().await;
        let last_refresh = self.refresh_service.last_refresh().await;

        let view = DashboardView::build(&snapshot, filter, outcome, last_refresh);
        tracing::debug!(
            refresh = ?outcome,
            sentiment = %filter.sentiment,
            keyword = filter.keyword().unwrap_or(""),
            shown = view.total,
            fetched = snapshot.articles.len(),
            "Dashboard rendered"
        );
        view
    }
}
