use std::sync::Arc;

use crate::{
    config::Config,
    errors::{AppError, AppResult},
    repositories::{OpenTdbRepository, TriviaRepository},
    services::{session_service::SessionService, trivia_service::TriviaService},
};

#[derive(Clone)]
pub struct AppState {
    pub trivia_service: Arc<TriviaService>,
    pub session_service: Arc<SessionService>,
    /// Client used by the proxy rewrite.
    pub http_client: reqwest::Client,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.http_timeout())
            .build()
            .map_err(|e| AppError::InternalError(format!("HTTP client setup failed: {}", e)))?;

        let repository = Arc::new(OpenTdbRepository::new(
            http_client.clone(),
            config.trivia_api_base.clone(),
        ));

        Ok(Self::with_repository(config, repository, http_client))
    }

    pub fn with_repository(
        config: Config,
        repository: Arc<dyn TriviaRepository>,
        http_client: reqwest::Client,
    ) -> Self {
        let trivia_service = Arc::new(TriviaService::new(repository));
        let session_service = Arc::new(
            SessionService::new(Arc::clone(&trivia_service), config.advance_delay())
                .with_idle_timeout(config.session_idle_timeout()),
        );

        Self {
            trivia_service,
            session_service,
            http_client,
            config: Arc::new(config),
        }
    }
}
