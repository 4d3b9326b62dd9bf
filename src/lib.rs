pub mod commands;
pub mod config;
pub mod credentials;
pub mod error;
pub mod http;
pub mod llm;
pub mod prompt;
pub mod search;
