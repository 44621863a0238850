use rand::{seq::SliceRandom, Rng};
use serde::Serialize;

use crate::{
    errors::{AppError, AppResult},
    models::domain::Question,
    services::session::results::QuizResults,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Loading,
    Error,
    Active,
    Completed,
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionPhase::Loading => write!(f, "loading"),
            SessionPhase::Error => write!(f, "error"),
            SessionPhase::Active => write!(f, "active"),
            SessionPhase::Completed => write!(f, "completed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredReason {
    AlreadyRevealed,
    NoQuestion,
    /// The pick is not one of the answers shown for the current question.
    NotOffered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Accepted { correct: bool },
    Ignored(IgnoredReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    NextQuestion(usize),
    Completed,
    Ignored,
}

/// Uniform Fisher-Yates permutation of every candidate answer.
pub fn shuffle_answers<R: Rng + ?Sized>(question: &Question, rng: &mut R) -> Vec<String> {
    let mut answers = question.candidate_answers();
    answers.shuffle(rng);
    answers
}

/// One play-through. Pure state and transitions: no I/O and no timers.
#[derive(Debug, Clone)]
pub struct QuizSession {
    phase: SessionPhase,
    questions: Vec<Question>,
    current_index: usize,
    score: usize,
    answer_order: Vec<String>,
    selected_answer: Option<String>,
    revealed: bool,
    error: Option<String>,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Loading,
            questions: Vec::new(),
            current_index: 0,
            score: 0,
            answer_order: Vec::new(),
            selected_answer: None,
            revealed: false,
            error: None,
        }
    }

    /// `loading -> active`. An empty batch is rejected and moves to `error`.
    pub fn load(&mut self, questions: Vec<Question>) -> AppResult<()> {
        if self.phase != SessionPhase::Loading {
            return Err(AppError::BadRequest(format!(
                "cannot load questions while {}",
                self.phase
            )));
        }
        if questions.is_empty() {
            self.fail(&AppError::EmptyResult);
            return Err(AppError::EmptyResult);
        }

        self.answer_order = shuffle_answers(&questions[0], &mut rand::thread_rng());
        self.questions = questions;
        self.current_index = 0;
        self.score = 0;
        self.selected_answer = None;
        self.revealed = false;
        self.error = None;
        self.phase = SessionPhase::Active;
        Ok(())
    }

    /// `loading -> error`.
    pub fn fail(&mut self, err: &AppError) {
        if self.phase == SessionPhase::Loading {
            self.error = Some(match err {
                AppError::EmptyResult => "No questions were returned for this selection".into(),
                other => other.to_string(),
            });
            self.phase = SessionPhase::Error;
        }
    }

    /// Locks in `answer` for the current question and reveals the correct one.
    /// Only the first selection per question counts, and it must be one of
    /// `answer_order`.
    pub fn select_answer(&mut self, answer: &str) -> SelectOutcome {
        if self.revealed {
            return SelectOutcome::Ignored(IgnoredReason::AlreadyRevealed);
        }
        let correct = match self.current_question() {
            Some(question) if self.phase == SessionPhase::Active => question.is_correct(answer),
            _ => return SelectOutcome::Ignored(IgnoredReason::NoQuestion),
        };
        if !self.answer_order.iter().any(|offered| offered == answer) {
            return SelectOutcome::Ignored(IgnoredReason::NotOffered);
        }

        self.selected_answer = Some(answer.to_string());
        self.revealed = true;
        if correct {
            self.score += 1;
        }
        SelectOutcome::Accepted { correct }
    }

    /// Moves past a revealed question: to the next one, or to `completed`.
    pub fn advance(&mut self) -> AdvanceOutcome {
        if self.phase != SessionPhase::Active || !self.revealed {
            return AdvanceOutcome::Ignored;
        }

        if self.current_index + 1 >= self.questions.len() {
            self.phase = SessionPhase::Completed;
            return AdvanceOutcome::Completed;
        }

        self.current_index += 1;
        self.answer_order =
            shuffle_answers(&self.questions[self.current_index], &mut rand::thread_rng());
        self.selected_answer = None;
        self.revealed = false;
        AdvanceOutcome::NextQuestion(self.current_index)
    }

    /// Back to `loading` with every score and answer field cleared.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    pub fn answer_order(&self) -> &[String] {
        &self.answer_order
    }

    pub fn selected_answer(&self) -> Option<&str> {
        self.selected_answer.as_deref()
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// The correct answer, once the current question has been revealed.
    pub fn revealed_correct_answer(&self) -> Option<&str> {
        if !self.revealed {
            return None;
        }
        self.current_question().map(|q| q.correct_answer.as_str())
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn is_completed(&self) -> bool {
        self.phase == SessionPhase::Completed
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// `(index + 1) / total`, only while questions are loaded.
    pub fn progress_fraction(&self) -> Option<f64> {
        if self.questions.is_empty() {
            return None;
        }
        Some((self.current_index + 1) as f64 / self.questions.len() as f64)
    }

    pub fn results(&self) -> Option<QuizResults> {
        self.is_completed()
            .then(|| QuizResults::new(self.score, self.questions.len()))
    }
}
