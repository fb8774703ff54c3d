use chrono::Utc;
use newsie_backend::controllers::dashboard::DashboardController;
use newsie_backend::domain::annotation::AnnotationService;
use newsie_backend::domain::refresh::RefreshService;
use newsie_backend::infrastructure::http::create_router;
use newsie_backend::infrastructure::repositories::NewsApiRepository;
use std::sync::Arc;
use std::time::Duration;
use test_context::AsyncTestContext;
use tokio::net::TcpListener;


use api_client::TestClient;
use mock_news_api::MockNewsApi;
use stubs::{HedgingClassifier, LexiconScorer, WordExtractor};

pub const TEST_API_KEY: &str = "test-news-api-key";
pub const DEFAULT_THRESHOLD: f64 = 0.7;
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(300);

pub struct TestContext {
    pub client: TestClient,
    pub news_api: MockNewsApi,
    pub refresh_service: Arc<RefreshService>,
}

impl AsyncTestContext for TestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        async {
            let news_api = MockNewsApi::start().await;

            let news_repo = Arc::new(
                NewsApiRepository::new(
                    news_api.endpoint.clone(),
                    TEST_API_KEY.to_string(),
                    2,
                    Some(Duration::from_secs(60)),
                )
                .with_retry_base_delay(Duration::from_millis(1)),
            );

            let annotation_service = Arc::new(AnnotationService::new(
                Arc::new(LexiconScorer),
                Some(Arc::new(HedgingClassifier)),
                Arc::new(WordExtractor),
                4,
                Duration::from_secs(5),
            ));

            // The session started long enough ago that the first dashboard
            // view is due for an automatic refresh
            let refresh_service = Arc::new(RefreshService::starting_at(
                news_repo,
                annotation_service,
                "us".to_string(),
                REFRESH_INTERVAL,
                Utc::now() - chrono::Duration::hours(1),
            ));

            let dashboard_controller = Arc::new(DashboardController::new(
                refresh_service.clone(),
                DEFAULT_THRESHOLD,
            ));
            let app = create_router(dashboard_controller, refresh_service.clone());

            // Start server
            let listener = TcpListener::bind("127.0.0.1:0")
                .await
                .expect("Failed to bind listener");
            let addr = listener.local_addr().expect("Failed to get local addr");
            let base_url = format!("http://{}", addr);

            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });

            // Wait for server to be ready
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

            Self {
                client: TestClient::new(&base_url),
                news_api,
                refresh_service,
            }
        }
    }

    fn teardown(self) -> impl std::future::Future<Output = ()> + Send {
        async {}
    }
}
