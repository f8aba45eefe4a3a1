//! Placement portal library

pub mod auth;
pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod knowledge;
pub mod llm;
pub mod output;
pub mod store;

pub use config::Config;
pub use error::{PortalError, Result};
