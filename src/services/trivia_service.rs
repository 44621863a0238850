use std::sync::Arc;

use crate::{
    errors::AppResult,
    models::domain::{Category, CategoryData, Question, QuestionParams},
    repositories::TriviaRepository,
    services::{
        entity_decoder::decode_html_entities,
        query_cache::{QueryCache, QueryStatus},
    },
};

/// Categories are cached under one fixed key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CategoriesKey;

pub struct TriviaService {
    repository: Arc<dyn TriviaRepository>,
    categories: QueryCache<CategoriesKey, CategoryData>,
    questions: QueryCache<QuestionParams, Vec<Question>>,
}

impl TriviaService {
    pub fn new(repository: Arc<dyn TriviaRepository>) -> Self {
        Self {
            repository,
            categories: QueryCache::new("get-categories"),
            questions: QueryCache::new("get-questions"),
        }
    }

    pub async fn fetch_categories(&self) -> AppResult<CategoryData> {
        let repository = Arc::clone(&self.repository);
        self.categories
            .fetch(CategoriesKey, move || async move {
                let data = repository.fetch_categories().await?;
                Ok(decode_categories(data))
            })
            .await
    }

    /// Question batch for `params`, with every text field entity-decoded.
    pub async fn fetch_questions(&self, params: &QuestionParams) -> AppResult<Vec<Question>> {
        let repository = Arc::clone(&self.repository);
        let request = params.clone();
        self.questions
            .fetch(params.clone(), move || async move {
                let questions = repository.fetch_questions(&request).await?;
                Ok(questions.into_iter().map(decode_question).collect())
            })
            .await
    }

    pub async fn invalidate_questions(&self, params: &QuestionParams) -> bool {
        self.questions.invalidate(params).await
    }

    pub async fn questions_status(&self, params: &QuestionParams) -> QueryStatus {
        self.questions.status(params).await
    }

    pub async fn categories_status(&self) -> QueryStatus {
        self.categories.status(&CategoriesKey).await
    }

    /// Number of categories currently cached, without triggering a fetch.
    pub async fn cached_category_count(&self) -> usize {
        self.categories
            .cached(&CategoriesKey)
            .await
            .map_or(0, |data| data.trivia_categories.len())
    }
}

fn decode_categories(data: CategoryData) -> CategoryData {
    CategoryData {
        trivia_categories: data
            .trivia_categories
            .into_iter()
            .map(|category| Category {
                id: category.id,
                name: decode_html_entities(&category.name),
            })
            .collect(),
    }
}

fn decode_question(question: Question) -> Question {
    Question {
        category: decode_html_entities(&question.category),
        question: decode_html_entities(&question.question),
        correct_answer: decode_html_entities(&question.correct_answer),
        incorrect_answers: question
            .incorrect_answers
            .iter()
            .map(|answer| decode_html_entities(answer))
            .collect(),
        ..question
    }
}
