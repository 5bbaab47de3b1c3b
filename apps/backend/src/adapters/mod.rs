//! Adapters for external dependencies.

pub mod game_results_sea;
