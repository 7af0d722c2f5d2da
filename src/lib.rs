//! Client for the DNSimple REST API.
//!
//! Operations are `async`. Code without a runtime of its own can block on
//! one with `tokio::runtime::Runtime::block_on`.
//!
//! ```no_run
//! # async fn demo() -> dnsimple_client::Result<()> {
//! let client = dnsimple_client::DnsimpleClient::new("me@example.com", "password")?;
//! for entry in client.list_domains().await? {
//!     println!("{}", entry.domain.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod types;

pub use client::DnsimpleClient;
pub use config::{ClientConfig, Credentials, DEFAULT_API_URL, DEFAULT_TIMEOUT};
pub use error::{Error, Result};
pub use types::{Domain, DomainWrapper};
