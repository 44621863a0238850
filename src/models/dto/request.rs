use std::borrow::Cow;

use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::domain::{CategoryData, Difficulty, QuestionParams};

pub const CATEGORY_REQUIRED: &str = "Please select a category";
pub const DIFFICULTY_REQUIRED: &str = "Please select a difficulty level";

/// Setup form submitted before a session starts. Both fields arrive as the
/// raw select values, so they stay strings until validated.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct GameSetupRequest {
    #[validate(
        required(message = "Please select a category"),
        length(min = 1, message = "Please select a category")
    )]
    pub category: Option<String>,

    #[validate(required(message = "Please select a difficulty level"))]
    pub difficulty: Option<String>,
}

impl GameSetupRequest {
    pub fn new(category: impl Into<String>, difficulty: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            difficulty: Some(difficulty.into()),
        }
    }

    /// Validates the form and builds the session parameters. When `known` is
    /// given, the category id must be one of its entries.
    pub fn to_question_params(
        &self,
        amount: u32,
        known: Option<&CategoryData>,
    ) -> Result<QuestionParams, ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        let category = match self.category.as_deref().filter(|c| !c.is_empty()) {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(id) if known.map_or(true, |data| data.contains(id)) => Some(id),
                Ok(_) => {
                    errors.add("category", field_error("unknown_category", "Unknown category"));
                    None
                }
                Err(_) => {
                    errors.add("category", field_error("invalid_category", CATEGORY_REQUIRED));
                    None
                }
            },
            None => None,
        };

        let difficulty = match self.difficulty.as_deref() {
            Some(raw) => match raw.parse::<Difficulty>() {
                Ok(difficulty) => Some(difficulty),
                Err(_) => {
                    errors.add(
                        "difficulty",
                        field_error("invalid_difficulty", DIFFICULTY_REQUIRED),
                    );
                    None
                }
            },
            None => None,
        };

        match (category, difficulty) {
            (Some(category), Some(difficulty)) if errors.is_empty() => {
                Ok(QuestionParams::new(amount, category, difficulty))
            }
            _ => Err(errors),
        }
    }
}

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SelectAnswerRequest {
    #[validate(length(min = 1, message = "Answer must not be empty"))]
    pub answer: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::{Category, QuestionType};

    fn known() -> CategoryData {
        CategoryData {
            trivia_categories: vec![
                Category { id: 9, name: "General Knowledge".into() },
                Category { id: 22, name: "Geography".into() },
            ],
        }
    }

    fn messages(errors: &ValidationErrors) -> Vec<String> {
        errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .collect()
    }

    #[test]
    fn valid_setup_builds_multiple_choice_params() {
        let params = GameSetupRequest::new("22", "hard")
            .to_question_params(10, Some(&known()))
            .expect("setup is valid");

        assert_eq!(params.amount, 10);
        assert_eq!(params.category, Some(22));
        assert_eq!(params.difficulty, Some(Difficulty::Hard));
        assert_eq!(params.question_type, QuestionType::Multiple);
    }

    #[test]
    fn missing_fields_report_both_messages() {
        let errors = GameSetupRequest::default()
            .to_question_params(10, None)
            .unwrap_err();

        let messages = messages(&errors);
        assert!(messages.contains(&CATEGORY_REQUIRED.to_string()));
        assert!(messages.contains(&DIFFICULTY_REQUIRED.to_string()));
    }

    #[test]
    fn empty_category_is_rejected() {
        let errors = GameSetupRequest::new("", "easy")
            .to_question_params(10, None)
            .unwrap_err();
        assert_eq!(messages(&errors), vec![CATEGORY_REQUIRED.to_string()]);
    }

    #[test]
    fn unknown_difficulty_is_rejected() {
        let errors = GameSetupRequest::new("9", "impossible")
            .to_question_params(10, None)
            .unwrap_err();
        assert_eq!(messages(&errors), vec![DIFFICULTY_REQUIRED.to_string()]);
    }

    #[test]
    fn category_must_be_a_known_id() {
        assert!(GameSetupRequest::new("77", "easy")
            .to_question_params(10, Some(&known()))
            .is_err());
        assert!(GameSetupRequest::new("sports", "easy")
            .to_question_params(10, Some(&known()))
            .is_err());
        // Without a category list the id only has to parse.
        assert!(GameSetupRequest::new("77", "easy")
            .to_question_params(10, None)
            .is_ok());
    }

    #[test]
    fn select_answer_request_rejects_empty_answer() {
        let request = SelectAnswerRequest { answer: String::new() };
        assert!(request.validate().is_err());
    }
}
