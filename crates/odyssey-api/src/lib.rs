// odyssey-api: Async Rust client for the CodeOdyssey learning platform API

pub mod auth;
pub mod client;
pub mod courses;
pub mod error;
pub mod token;
pub mod transport;
pub mod types;
pub mod users;

pub use client::ApiClient;
pub use error::Error;
pub use token::{FileTokenStore, MemoryTokenStore, TOKEN_KEY, TokenStore};
pub use transport::{TlsMode, TransportConfig};
