pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod logging;
pub mod store;
