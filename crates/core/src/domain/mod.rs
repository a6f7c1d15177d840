pub mod advisory;
pub mod quote;
