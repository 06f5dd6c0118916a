pub mod api;
pub mod client;
pub mod protocol;

pub use api::{ApiClient, ApiError};
pub use client::ChatClient;
