pub mod game_results;

pub use game_results::Entity as GameResults;
pub use game_results::Model as GameResult;
