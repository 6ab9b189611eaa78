pub mod decoder;
pub mod engine;
pub mod error;
pub mod position;
pub mod timing;
pub mod types;
