use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{CategoryData, Question, QuestionParams},
};

pub const CATEGORIES_PATH: &str = "api_category.php";
pub const QUESTIONS_PATH: &str = "api.php";

/// Remote source of categories and question batches. Implementations return
/// text exactly as the source sends it; decoding happens in the fetch layer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TriviaRepository: Send + Sync {
    async fn fetch_categories(&self) -> AppResult<CategoryData>;
    async fn fetch_questions(&self, params: &QuestionParams) -> AppResult<Vec<Question>>;
}

/// Body of the questions endpoint.
#[derive(Debug, Deserialize)]
pub struct QuestionsEnvelope {
    pub response_code: i64,
    #[serde(default)]
    pub results: Vec<Question>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    Success,
    NoResults,
    InvalidParameter,
    TokenNotFound,
    TokenEmpty,
    RateLimit,
    Unknown(i64),
}

impl ResponseCode {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => ResponseCode::Success,
            1 => ResponseCode::NoResults,
            2 => ResponseCode::InvalidParameter,
            3 => ResponseCode::TokenNotFound,
            4 => ResponseCode::TokenEmpty,
            5 => ResponseCode::RateLimit,
            other => ResponseCode::Unknown(other),
        }
    }
}

impl QuestionsEnvelope {
    pub fn into_questions(self) -> AppResult<Vec<Question>> {
        match ResponseCode::from_code(self.response_code) {
            ResponseCode::Success => Ok(self.results),
            ResponseCode::NoResults => Err(AppError::EmptyResult),
            ResponseCode::InvalidParameter => {
                Err(AppError::Fetch("Upstream rejected the query parameters".into()))
            }
            ResponseCode::TokenNotFound => {
                Err(AppError::Fetch("Upstream session token not found".into()))
            }
            ResponseCode::TokenEmpty => Err(AppError::Fetch(
                "Upstream session token has no questions left".into(),
            )),
            ResponseCode::RateLimit => {
                Err(AppError::Fetch("Upstream rate limit exceeded".into()))
            }
            ResponseCode::Unknown(code) => Err(AppError::Fetch(format!(
                "Unexpected upstream response code {}",
                code
            ))),
        }
    }
}

pub struct OpenTdbRepository {
    client: reqwest::Client,
    api_base: String,
}

impl OpenTdbRepository {
    pub fn new(client: reqwest::Client, api_base: impl Into<String>) -> Self {
        Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path)
    }

    async fn get(&self, url: &str, query: &[(&'static str, String)]) -> AppResult<reqwest::Response> {
        log::debug!("GET {} {:?}", url, query);
        let response = self
            .client
            .get(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("GET {} answered {}", url, status);
            return Err(AppError::Fetch(format!(
                "API request failed with status {}",
                status.as_u16()
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl TriviaRepository for OpenTdbRepository {
    async fn fetch_categories(&self) -> AppResult<CategoryData> {
        let url = self.endpoint(CATEGORIES_PATH);
        let body = self.get(&url, &[]).await?.text().await?;
        let data: CategoryData = serde_json::from_str(&body)?;
        log::info!("Fetched {} categories", data.trivia_categories.len());
        Ok(data)
    }

    async fn fetch_questions(&self, params: &QuestionParams) -> AppResult<Vec<Question>> {
        let url = self.endpoint(QUESTIONS_PATH);
        let body = self.get(&url, &params.query_pairs()).await?.text().await?;
        let envelope: QuestionsEnvelope = serde_json::from_str(&body)?;
        let questions = envelope.into_questions()?;
        log::info!("Fetched {} questions for {:?}", questions.len(), params);
        Ok(questions)
    }
}
