use crate::models::domain::{Category, CategoryData, Difficulty, Question, QuestionParams};

#[cfg(test)]
pub mod fixtures {
    use super::*;

    /// Multiple-choice question with the given answers, difficulty `easy`.
    pub fn question(correct: &str, incorrect: &[&str]) -> Question {
        Question {
            category: "Geography".to_string(),
            question_type: if incorrect.len() == 1 {
                "boolean".to_string()
            } else {
                "multiple".to_string()
            },
            difficulty: "easy".to_string(),
            question: format!("Which answer is {}?", correct),
            correct_answer: correct.to_string(),
            incorrect_answers: incorrect.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Q1 answer "Paris", Q2 answer "42".
    pub fn two_questions() -> Vec<Question> {
        vec![
            Question {
                question: "What is the capital of France?".to_string(),
                ..question("Paris", &["Lyon", "Nice", "Lille"])
            },
            Question {
                category: "Science: Mathematics".to_string(),
                question: "What is six times seven?".to_string(),
                ..question("42", &["41", "43", "24"])
            },
        ]
    }

    pub fn numbered_questions(count: usize) -> Vec<Question> {
        (0..count)
            .map(|i| Question {
                question: format!("Question {}", i + 1),
                correct_answer: format!("answer {}", i),
                incorrect_answers: vec![
                    format!("wrong {} a", i),
                    format!("wrong {} b", i),
                    format!("wrong {} c", i),
                ],
                ..question("placeholder", &["x", "y", "z"])
            })
            .collect()
    }

    /// Questions as the upstream sends them, entity-encoded.
    pub fn encoded_questions() -> Vec<Question> {
        vec![
            Question {
                category: "Entertainment: Books &amp; Plays".to_string(),
                question_type: "multiple".to_string(),
                difficulty: "medium".to_string(),
                question: "Who wrote &quot;Hamlet&quot;?".to_string(),
                correct_answer: "William Shakespeare".to_string(),
                incorrect_answers: vec![
                    "Christopher Marlowe".to_string(),
                    "Ben Jonson".to_string(),
                    "Moli&egrave;re".to_string(),
                ],
            },
            Question {
                category: "Entertainment: Books".to_string(),
                question_type: "multiple".to_string(),
                difficulty: "easy".to_string(),
                question: "What is written on the cover of the Hitchhiker&#039;s Guide?".to_string(),
                correct_answer: "Don&#039;t Panic".to_string(),
                incorrect_answers: vec![
                    "Mostly Harmless".to_string(),
                    "So Long &amp; Thanks".to_string(),
                    "&ldquo;42&rdquo;".to_string(),
                ],
            },
            Question {
                category: "Science: Mathematics".to_string(),
                question_type: "multiple".to_string(),
                difficulty: "hard".to_string(),
                question: "Which sign is written &not; in logic, next to &forall; and &exist;?"
                    .to_string(),
                correct_answer: "Negation &#x2013; &not;A".to_string(),
                incorrect_answers: vec![
                    "&Sigma;&sigmaf;".to_string(),
                    "&spades;&diams;".to_string(),
                    "&curren;&emsp;&zeta;".to_string(),
                ],
            },
        ]
    }

    pub fn categories() -> CategoryData {
        CategoryData {
            trivia_categories: vec![
                Category {
                    id: 9,
                    name: "General Knowledge".to_string(),
                },
                Category {
                    id: 10,
                    name: "Entertainment: Books &amp; Plays".to_string(),
                },
                Category {
                    id: 22,
                    name: "Geography".to_string(),
                },
            ],
        }
    }

    pub fn params() -> QuestionParams {
        QuestionParams::new(10, 22, Difficulty::Easy)
    }
}

#[cfg(test)]
pub mod test_helpers {
    use std::time::Duration;

    use actix_web::http::StatusCode;
    use regex::Regex;

    /// Gives spawned tasks a chance to run. Under paused time this also
    /// advances the clock by a few milliseconds.
    pub async fn settle() {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Fails on any `&name;`, `&#NN;` or `&#xHH;` sequence left in `text`,
    /// whether or not the decoder knows the name.
    pub fn assert_no_entity_escapes(text: &str) {
        let escape = Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[A-Za-z][A-Za-z0-9]*);")
            .expect("valid escape pattern");
        assert!(!escape.is_match(text), "undecoded escape in: {}", text);
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_fixtures_two_questions() {
        let questions = two_questions();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].correct_answer, "Paris");
        assert_eq!(questions[1].correct_answer, "42");
    }

    #[test]
    fn test_fixtures_numbered_questions_are_distinct() {
        let questions = numbered_questions(3);
        assert_eq!(questions[2].correct_answer, "answer 2");
        assert!(!questions[2].incorrect_answers.contains(&questions[2].correct_answer));
    }

    #[test]
    #[should_panic(expected = "undecoded escape")]
    fn test_helpers_flag_escapes_the_decoder_does_not_know() {
        super::test_helpers::assert_no_entity_escapes("plain &madeup; text");
    }

    #[test]
    fn test_fixtures_boolean_question() {
        assert_eq!(question("True", &["False"]).question_type, "boolean");
    }
}
