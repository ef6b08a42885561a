//! # arraywire-client
//!
//! Rust client SDK for the Arraywire array-engine protocol.
//!
//! This crate is the marshalling layer between local values and arrays
//! living on a remote computation engine: it packs payloads, formats
//! creation commands, and decodes descriptor replies into typed handles.
//! Element data never flows back through it.
//!
//! ## Architecture
//!
//! - **Text plane**: whitespace-tokenized command headers and descriptor
//!   replies, one command per reply
//! - **Binary plane**: big-endian packed element payloads riding behind an
//!   `array` header, bounded by a process-wide transfer limit
//!
//! ## Example
//!
//! ```ignore
//! use arraywire_client::{ArrayClient, Dtype};
//! use arraywire_client::transport::TcpTransport;
//!
//! #[tokio::main]
//! async fn main() {
//!     let transport = TcpTransport::connect("127.0.0.1:5555").await.unwrap();
//!     let mut client = ArrayClient::new(transport);
//!
//!     let evens = client.arange(0, 10, 2).await.unwrap();
//!     let noise = client.standard_normal(1_000, None).await.unwrap();
//!     println!("{} and {}", evens.name(), noise.name());
//! }
//! ```

pub mod codec;
pub mod dtype;
pub mod error;
pub mod handle;
pub mod protocol;
pub mod transfer;
pub mod transport;

mod client;

pub use client::{ArrayClient, Charset};
pub use dtype::{Dtype, Scalar, WireElement};
pub use error::ArraywireError;
pub use handle::{ArrayHandle, SegmentedString, SuffixArray};
