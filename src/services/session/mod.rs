pub mod results;
pub mod state;

pub use results::{percentage, QuizResults, ResultTier};
pub use state::{AdvanceOutcome, IgnoredReason, QuizSession, SelectOutcome, SessionPhase};
