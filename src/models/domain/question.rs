use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub category: String,
    #[serde(rename = "type")]
    pub question_type: String,
    pub difficulty: String,
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
}

impl Question {
    /// Every candidate answer, correct one first.
    pub fn candidate_answers(&self) -> Vec<String> {
        std::iter::once(self.correct_answer.clone())
            .chain(self.incorrect_answers.iter().cloned())
            .collect()
    }

    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_answer == answer
    }

    /// Difficulty with its first letter capitalized, e.g. `Medium`.
    pub fn difficulty_label(&self) -> String {
        let mut chars = self.difficulty.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty '{}'", other)),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    #[default]
    Multiple,
    Boolean,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Multiple => "multiple",
            QuestionType::Boolean => "boolean",
        }
    }
}

/// Parameters of one question batch. Also the cache key for that batch.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct QuestionParams {
    pub amount: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// Upstream session token, used to avoid repeated questions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Default for QuestionParams {
    fn default() -> Self {
        Self {
            amount: 10,
            category: None,
            difficulty: None,
            question_type: QuestionType::Multiple,
            token: None,
        }
    }
}

impl QuestionParams {
    pub fn new(amount: u32, category: i64, difficulty: Difficulty) -> Self {
        Self {
            amount,
            category: Some(category),
            difficulty: Some(difficulty),
            ..Self::default()
        }
    }

    /// Query string pairs in upstream order. Unset fields are left out entirely.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("amount", self.amount.to_string())];
        if let Some(category) = self.category {
            pairs.push(("category", category.to_string()));
        }
        if let Some(difficulty) = self.difficulty {
            pairs.push(("difficulty", difficulty.as_str().to_string()));
        }
        pairs.push(("type", self.question_type.as_str().to_string()));
        if let Some(token) = &self.token {
            pairs.push(("token", token.clone()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_parses_upstream_result() {
        let json = r#"{
            "category": "Science &amp; Nature",
            "type": "multiple",
            "difficulty": "medium",
            "question": "What is &quot;H2O&quot;?",
            "correct_answer": "Water",
            "incorrect_answers": ["Salt", "Air", "Fire"]
        }"#;
        let question: Question = serde_json::from_str(json).expect("question should parse");

        assert_eq!(question.question_type, "multiple");
        assert_eq!(question.candidate_answers().len(), 4);
        assert_eq!(question.candidate_answers()[0], "Water");
        assert!(question.is_correct("Water"));
        assert!(!question.is_correct("Salt"));
    }

    #[test]
    fn difficulty_label_is_capitalized() {
        let question = Question {
            category: "General".into(),
            question_type: "boolean".into(),
            difficulty: "hard".into(),
            question: "?".into(),
            correct_answer: "True".into(),
            incorrect_answers: vec!["False".into()],
        };
        assert_eq!(question.difficulty_label(), "Hard");
    }

    #[test]
    fn query_pairs_omit_unset_fields() {
        let params = QuestionParams {
            amount: 5,
            category: None,
            difficulty: None,
            question_type: QuestionType::Boolean,
            token: None,
        };

        let pairs = params.query_pairs();
        assert_eq!(
            pairs,
            vec![("amount", "5".to_string()), ("type", "boolean".to_string())]
        );
        assert!(pairs.iter().all(|(_, v)| v != "undefined"));
    }

    #[test]
    fn query_pairs_include_every_set_field() {
        let mut params = QuestionParams::new(10, 9, Difficulty::Easy);
        params.token = Some("abc".into());

        let keys: Vec<&str> = params.query_pairs().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["amount", "category", "difficulty", "type", "token"]);
    }

    #[test]
    fn params_are_structurally_equal_cache_keys() {
        use std::collections::HashSet;

        let a = QuestionParams::new(10, 9, Difficulty::Hard);
        let b = QuestionParams::new(10, 9, Difficulty::Hard);
        let c = QuestionParams::new(10, 9, Difficulty::Easy);

        let keys: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn difficulty_parses_only_known_levels() {
        assert_eq!("medium".parse::<Difficulty>(), Ok(Difficulty::Medium));
        assert!("extreme".parse::<Difficulty>().is_err());
        assert!("".parse::<Difficulty>().is_err());
    }
}
