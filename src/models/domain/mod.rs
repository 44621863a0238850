pub mod category;
pub mod question;

pub use category::{Category, CategoryData};
pub use question::{Difficulty, Question, QuestionParams, QuestionType};
