use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultTier {
    Excellent,
    Good,
    NotBad,
    KeepPracticing,
}

impl ResultTier {
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            p if p >= 80 => ResultTier::Excellent,
            p if p >= 60 => ResultTier::Good,
            p if p >= 40 => ResultTier::NotBad,
            _ => ResultTier::KeepPracticing,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ResultTier::Excellent => "Excellent! You're a trivia master!",
            ResultTier::Good => "Good job! You know your stuff!",
            ResultTier::NotBad => "Not bad! Keep learning!",
            ResultTier::KeepPracticing => "Keep practicing! You'll get better!",
        }
    }

    /// Presentation hint for how the message should be styled.
    pub fn tone(&self) -> &'static str {
        match self {
            ResultTier::Excellent => "success",
            ResultTier::Good => "info",
            ResultTier::NotBad => "warning",
            ResultTier::KeepPracticing => "danger",
        }
    }
}

/// Rounded share of correct answers. A zero-question total reads as 0%.
pub fn percentage(score: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((score as f64 / total as f64) * 100.0).round() as u32
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizResults {
    pub score: usize,
    pub total: usize,
    pub percentage: u32,
    pub tier: ResultTier,
    pub message: &'static str,
    pub tone: &'static str,
}

impl QuizResults {
    pub fn new(score: usize, total: usize) -> Self {
        let percentage = percentage(score, total);
        let tier = ResultTier::from_percentage(percentage);
        Self {
            score,
            total,
            percentage,
            tier,
            message: tier.message(),
            tone: tier.tone(),
        }
    }
}
