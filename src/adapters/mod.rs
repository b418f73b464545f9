// Adapters layer: concrete implementations of the domain ports and the local file server.

pub mod http;
#[cfg(feature = "cli")]
pub mod server;
pub mod storage;
