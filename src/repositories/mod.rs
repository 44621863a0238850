pub mod trivia_repository;

pub use trivia_repository::{OpenTdbRepository, TriviaRepository};
