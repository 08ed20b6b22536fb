pub mod logs;
pub mod number;
