//! Core module - server configuration, state and startup
//!
//! # Module structure
//!
//! - [`Config`] - Server configuration
//! - [`ServerState`] - Shared server state
//! - [`Server`] - HTTP server

pub mod config;
pub mod server;
pub mod state;

pub use config::Config;
pub use server::Server;
pub use state::ServerState;
