pub mod directory;
pub mod game_flow;
pub mod match_recorder;
