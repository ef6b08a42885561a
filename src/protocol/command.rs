//! Command assembly - verb, argument tokens, optional binary body.
//!
//! A command is built as a structured value and serialized to wire text only
//! at the transport boundary, so argument construction never worries about
//! separators or escaping. Token order is positional and significant.
//!
//! # Example
//!
//! ```
//! use arraywire_client::protocol::Command;
//! use arraywire_client::Dtype;
//!
//! let cmd = Command::new("create").arg_dtype(Dtype::Int64).arg_int(10);
//! assert_eq!(cmd.header(), "create int64 10");
//! assert_eq!(&cmd.encode()[..], b"create int64 10");
//! ```

use bytes::{BufMut, Bytes, BytesMut};

use crate::codec::NumericText;
use crate::dtype::Dtype;

/// Separator between text tokens, and between the text header and a body.
pub const TOKEN_SEPARATOR: u8 = b' ';

/// One engine command: verb, ordered argument tokens, optional binary body.
///
/// Immutable once built; the transport consumes it, so every command is sent
/// exactly once. Arguments take their canonical token form as they are
/// added; [`Command::encode`] only joins what is already final.
#[derive(Debug, PartialEq)]
pub struct Command {
    verb: &'static str,
    args: Vec<String>,
    body: Option<Bytes>,
}

impl Command {
    /// Start a command for the given verb.
    pub fn new(verb: &'static str) -> Self {
        Self {
            verb,
            args: Vec::new(),
            body: None,
        }
    }

    /// Append an integer token.
    pub fn arg_int(mut self, value: i64) -> Self {
        self.args.push(NumericText::int_token(value));
        self
    }

    /// Append a float token.
    pub fn arg_float(mut self, value: f64) -> Self {
        self.args.push(NumericText::float_token(value));
        self
    }

    /// Append a dtype tag token.
    pub fn arg_dtype(mut self, dtype: Dtype) -> Self {
        self.args.push(dtype.tag().to_string());
        self
    }

    /// Append a pre-formed token (identifier, handle name, filename).
    ///
    /// The engine tokenizes on whitespace, so a token containing the
    /// separator is not representable and goes out as-is.
    pub fn arg_token(mut self, token: impl Into<String>) -> Self {
        self.args.push(token.into());
        self
    }

    /// Append the seed slot: the seed's decimal token, or the empty token
    /// when no seed was supplied.
    pub fn arg_seed(mut self, seed: Option<u64>) -> Self {
        self.args.push(match seed {
            Some(seed) => seed.to_string(),
            None => String::new(),
        });
        self
    }

    /// Attach the binary body.
    pub fn with_body(mut self, body: Bytes) -> Self {
        self.body = Some(body);
        self
    }

    /// The command verb.
    #[inline]
    pub fn verb(&self) -> &str {
        self.verb
    }

    /// The argument tokens, in transmission order.
    #[inline]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The binary body, if one is attached.
    #[inline]
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Body length in bytes; zero when there is no body.
    #[inline]
    pub fn body_len(&self) -> usize {
        self.body.as_ref().map_or(0, Bytes::len)
    }

    /// The text header: verb and tokens joined by the separator.
    pub fn header(&self) -> String {
        let mut header = String::from(self.verb);
        for arg in &self.args {
            header.push(TOKEN_SEPARATOR as char);
            header.push_str(arg);
        }
        header
    }

    /// Serialize to the wire: the text header, then - when a body is
    /// attached - one separator byte and the body. A bodied command always
    /// carries that separator, even when the body itself is empty.
    pub fn encode(&self) -> Bytes {
        let header = self.header();
        let mut buf = BytesMut::with_capacity(header.len() + 1 + self.body_len());
        buf.put_slice(header.as_bytes());
        if let Some(body) = &self.body {
            buf.put_u8(TOKEN_SEPARATOR);
            buf.put_slice(body);
        }
        buf.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_only_command() {
        let cmd = Command::new("arange").arg_int(0).arg_int(10).arg_int(2);
        assert_eq!(cmd.verb(), "arange");
        assert_eq!(cmd.args(), ["0", "10", "2"]);
        assert_eq!(cmd.header(), "arange 0 10 2");
        assert_eq!(&cmd.encode()[..], b"arange 0 10 2");
        assert!(cmd.body().is_none());
    }

    #[test]
    fn test_body_follows_separator() {
        let body = Bytes::from_static(&[0, 0, 0, 0, 0, 0, 0, 1]);
        let cmd = Command::new("array")
            .arg_dtype(Dtype::Int64)
            .arg_int(1)
            .with_body(body.clone());
        let encoded = cmd.encode();
        assert_eq!(&encoded[..14], b"array int64 1 ");
        assert_eq!(&encoded[14..], &body[..]);
        assert_eq!(cmd.body_len(), 8);
    }

    #[test]
    fn test_empty_body_still_separated() {
        let cmd = Command::new("array")
            .arg_dtype(Dtype::Float64)
            .arg_int(0)
            .with_body(Bytes::new());
        assert_eq!(&cmd.encode()[..], b"array float64 0 ");
    }

    #[test]
    fn test_seed_tokens() {
        let cmd = Command::new("randomNormal").arg_int(5).arg_seed(Some(241));
        assert_eq!(cmd.header(), "randomNormal 5 241");

        let cmd = Command::new("randomNormal").arg_int(5).arg_seed(None);
        assert_eq!(cmd.args(), ["5", ""]);
        // The empty seed token leaves a trailing separator on the wire.
        assert_eq!(&cmd.encode()[..], b"randomNormal 5 ");
    }

    #[test]
    fn test_token_order_is_positional() {
        let cmd = Command::new("randint")
            .arg_int(3)
            .arg_dtype(Dtype::Int64)
            .arg_token("0")
            .arg_token("10")
            .arg_seed(None);
        assert_eq!(cmd.header(), "randint 3 int64 0 10 ");
    }

    #[test]
    fn test_float_args_round_trip_form() {
        let cmd = Command::new("linspace")
            .arg_float(-0.5)
            .arg_float(12.75)
            .arg_int(7);
        assert_eq!(cmd.header(), "linspace -0.5 12.75 7");
    }
}
