// Public API for integration tests and potential library usage

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod llm;
pub mod packs;
pub mod protocol;
pub mod state;
pub mod store;
pub mod types;
pub mod ws;
