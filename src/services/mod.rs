pub mod entity_decoder;
pub mod query_cache;
pub mod session;
pub mod session_service;
pub mod trivia_service;
