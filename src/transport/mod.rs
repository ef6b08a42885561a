//! Transport module - the seam between marshalling and the engine link.
//!
//! The creation layer builds commands and parses replies; actually moving
//! bytes is a collaborator's job behind [`Transport`]. One call is one round
//! trip: the transport sends the encoded command and resolves to the
//! engine's reply text.

use std::future::Future;
use std::pin::Pin;

use crate::error::Result;
use crate::protocol::Command;

mod tcp;

pub use tcp::{TcpTransport, MAX_REPLY_BYTES};

/// Boxed future returned by transport calls.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A command channel to the engine.
///
/// `execute` consumes the command - each one is sent exactly once - and
/// resolves once the complete reply text is in. Callers hold the transport
/// exclusively for the duration of a call, so a transport never sees more
/// than one command in flight.
pub trait Transport: Send {
    /// Send one command and return the engine's reply text.
    fn execute(&mut self, request: Command) -> BoxFuture<'_, Result<String>>;
}
