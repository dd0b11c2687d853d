pub mod catalog;
pub mod config;
pub mod core;
pub mod handler;
pub mod prompt;
pub mod providers;
pub mod server;
pub mod transport;

pub use config::TranslatorConfig;
pub use crate::core::types::*;
pub use handler::TranslationHandler;
