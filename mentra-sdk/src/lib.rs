//! MentraOS session runtime surface for Rust apps
//!
//! This SDK provides a small API for apps to:
//! - Receive session start/stop webhooks from the MentraOS cloud
//! - Subscribe to per-session transcription and glasses battery events
//! - Show text walls on the user's glasses
//! - Add their own HTTP routes next to the runtime's endpoints

pub mod errors;
pub mod models;
pub mod server;
pub mod session;
pub mod traits;

pub use errors::*;
pub use models::*;
pub use server::AppServer;
pub use session::LocalSession;
pub use traits::*;
