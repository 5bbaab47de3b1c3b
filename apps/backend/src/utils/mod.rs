pub mod room_code;
pub mod time;
