use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    models::domain::{Category, Difficulty, QuestionParams},
    services::session::{QuizResults, QuizSession, SessionPhase},
};

pub const STATUS_SELECT: &str = "Select an answer";
pub const STATUS_ADVANCING: &str = "Moving to next question...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerStatus {
    Idle,
    Selected,
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerView {
    pub label: String,
    pub text: String,
    pub status: AnswerStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionView {
    pub category: String,
    pub difficulty: String,
    pub question: String,
}

/// Everything the presentation layer needs to draw the current screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub state: SessionPhase,
    pub params: QuestionParams,
    pub question_number: usize,
    pub total_questions: usize,
    pub score: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_fraction: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_question: Option<QuestionView>,
    pub answers: Vec<AnswerView>,
    pub selected_answer: Option<String>,
    pub revealed_correct_answer: Option<String>,
    pub status_line: &'static str,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<QuizResults>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
}

impl SessionView {
    pub fn build(
        id: Uuid,
        params: &QuestionParams,
        session: &QuizSession,
        started_at: DateTime<Utc>,
    ) -> Self {
        let selected = session.selected_answer();
        let correct = session.revealed_correct_answer();

        let answers = match session.phase() {
            SessionPhase::Active => session
                .answer_order()
                .iter()
                .enumerate()
                .map(|(index, text)| AnswerView {
                    label: answer_label(index),
                    text: text.clone(),
                    status: answer_status(text, selected, correct),
                })
                .collect(),
            _ => Vec::new(),
        };

        let current_question = match session.phase() {
            SessionPhase::Active => session.current_question().map(|q| QuestionView {
                category: q.category.clone(),
                difficulty: q.difficulty_label(),
                question: q.question.clone(),
            }),
            _ => None,
        };

        Self {
            id,
            state: session.phase(),
            params: params.clone(),
            question_number: if session.total_questions() == 0 {
                0
            } else {
                session.current_index() + 1
            },
            total_questions: session.total_questions(),
            score: session.score(),
            progress_fraction: session.progress_fraction(),
            current_question,
            answers,
            selected_answer: selected.map(str::to_string),
            revealed_correct_answer: correct.map(str::to_string),
            status_line: if session.is_revealed() {
                STATUS_ADVANCING
            } else {
                STATUS_SELECT
            },
            completed: session.is_completed(),
            results: session.results(),
            error: session.error().map(str::to_string),
            started_at,
        }
    }
}

/// `A`, `B`, `C`, ...
fn answer_label(index: usize) -> String {
    char::from_u32('A' as u32 + index as u32)
        .map(String::from)
        .unwrap_or_else(|| (index + 1).to_string())
}

fn answer_status(answer: &str, selected: Option<&str>, correct: Option<&str>) -> AnswerStatus {
    let is_selected = selected == Some(answer);
    match correct {
        Some(correct) if correct == answer => AnswerStatus::Correct,
        Some(_) if is_selected => AnswerStatus::Incorrect,
        None if is_selected => AnswerStatus::Selected,
        _ => AnswerStatus::Idle,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DifficultyOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// Options for the setup form. An unavailable category list is sent as empty.
#[derive(Debug, Clone, Serialize)]
pub struct SetupOptions {
    pub categories: Vec<Category>,
    pub difficulties: Vec<DifficultyOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories_error: Option<String>,
}

impl SetupOptions {
    pub fn new(categories: Vec<Category>, categories_error: Option<String>) -> Self {
        Self {
            categories,
            difficulties: Difficulty::ALL
                .iter()
                .map(|d| DifficultyOption {
                    value: d.as_str(),
                    label: match d {
                        Difficulty::Easy => "Easy",
                        Difficulty::Medium => "Medium",
                        Difficulty::Hard => "Hard",
                    },
                })
                .collect(),
            categories_error,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures;

    fn view(session: &QuizSession) -> SessionView {
        SessionView::build(Uuid::new_v4(), &fixtures::params(), session, Utc::now())
    }

    #[test]
    fn labels_run_alphabetically() {
        assert_eq!(answer_label(0), "A");
        assert_eq!(answer_label(3), "D");
    }

    #[test]
    fn answer_status_highlights_pick_and_correct_answer() {
        assert_eq!(answer_status("Paris", None, None), AnswerStatus::Idle);
        assert_eq!(answer_status("Paris", Some("Paris"), None), AnswerStatus::Selected);
        assert_eq!(answer_status("Paris", Some("Paris"), Some("Paris")), AnswerStatus::Correct);
        assert_eq!(answer_status("Lyon", Some("Lyon"), Some("Paris")), AnswerStatus::Incorrect);
        assert_eq!(answer_status("Nice", Some("Lyon"), Some("Paris")), AnswerStatus::Idle);
    }

    #[test]
    fn loading_view_has_no_question_or_progress() {
        let v = view(&QuizSession::new());
        assert_eq!(v.state, SessionPhase::Loading);
        assert_eq!(v.question_number, 0);
        assert!(v.progress_fraction.is_none());
        assert!(v.current_question.is_none());
        assert!(v.answers.is_empty());
    }

    #[test]
    fn revealed_wrong_pick_marks_both_answers() {
        let mut session = QuizSession::new();
        session.load(fixtures::two_questions()).unwrap();
        session.select_answer("Lyon");

        let v = view(&session);
        let status_of = |text: &str| v.answers.iter().find(|a| a.text == text).unwrap().status;

        assert_eq!(status_of("Lyon"), AnswerStatus::Incorrect);
        assert_eq!(status_of("Paris"), AnswerStatus::Correct);
        assert_eq!(v.status_line, STATUS_ADVANCING);
        assert_eq!(v.revealed_correct_answer.as_deref(), Some("Paris"));
        assert_eq!(v.question_number, 1);
        assert_eq!(v.current_question.as_ref().unwrap().difficulty, "Easy");
    }

    #[test]
    fn setup_options_list_all_difficulties() {
        let options = SetupOptions::new(vec![], Some("Fetch error: down".into()));
        let values: Vec<_> = options.difficulties.iter().map(|d| d.value).collect();
        assert_eq!(values, vec!["easy", "medium", "hard"]);
        assert!(options.categories.is_empty());
    }
}
