//! Backend test support utilities
//!
//! Shared by the backend's unit and integration tests: unified logging
//! initialization and Problem Details assertions.

pub mod logging;
pub mod problem_details;
