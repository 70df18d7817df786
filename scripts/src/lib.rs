//! Scripts for compiling and publishing a Move package on Aptos mainnet.

#![deny(clippy::missing_docs_in_private_items)]

pub mod account;
pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod errors;
pub mod utils;

/// Our build utils
pub mod build;

/// Our deploy utils
pub mod deploy;

// Our output utils
pub mod output_writer;

pub mod tx;
