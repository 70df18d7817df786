//! Aptos transaction building, signing and node access

pub mod client;
pub mod payload;
pub mod reader;
pub mod sender;
pub mod types;
