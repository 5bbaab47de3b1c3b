pub mod hub;
pub mod protocol;
pub mod server;
pub mod session;
