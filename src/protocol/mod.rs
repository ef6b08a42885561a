//! Protocol module - command assembly and reply parsing.
//!
//! This module implements both directions of the creation protocol's text
//! plane:
//! - [`Command`] - verb + ordered argument tokens + optional binary body
//! - [`Descriptor`] with [`parse_single`] / [`parse_pair`] - reply text into
//!   typed records, pair replies split on [`PAIR_DELIMITER`]

mod command;
mod reply;

pub use command::{Command, TOKEN_SEPARATOR};
pub use reply::{parse_pair, parse_single, Descriptor, PAIR_DELIMITER};
