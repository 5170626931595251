// hcdash-api: Async Rust client for the Home Connect bridge dashboard backend

pub mod appliances;
pub mod client;
pub mod csv;
pub mod error;
pub mod requests;
pub mod transport;

pub use client::BridgeClient;
pub use csv::{CsvDocument, CsvRow};
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
