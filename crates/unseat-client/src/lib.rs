#![deny(clippy::unwrap_used)]

pub mod api;
pub mod devices;
pub mod error;
mod pipeline;
pub mod token_store;

pub use crate::api::{ApiRequest, Device};
pub use crate::devices::{DeviceClient, LogSink};
pub use crate::error::Error;
pub use crate::token_store::{FileTokenStore, MemoryTokenStore, TokenStore};

/// Production API root; tests point the client at a local mock server instead.
pub const DEFAULT_ADDR: &str = "https://user-api.setapp.com/v1";
