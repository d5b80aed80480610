//! innersense-rs: mood-to-meditation web service.
//!
//! Pipeline: mood → meditation script (chat completion) → synthesized
//! speech → session record. The HTTP surface is three routes: index,
//! meditate, history.

pub mod api;
pub mod config;
pub mod error;
pub mod scriptwriter;
pub mod service;
pub mod store;
pub mod synthesizer;

pub use config::Config;
pub use service::MeditationService;
pub use store::SessionStore;
