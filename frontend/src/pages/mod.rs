pub mod board;
pub mod daily;
pub mod staged;
