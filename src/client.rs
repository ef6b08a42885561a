//! Array creation client.
//!
//! [`ArrayClient`] owns a [`Transport`] and turns local values into arrays
//! living on the engine: it validates arguments, packs payloads, issues the
//! creation command, and decodes the descriptor reply into a handle. Every
//! operation is one command and one awaited reply (string transfers are two,
//! one per buffer), so commands never interleave on a connection.
//!
//! No element data ever comes back through this client; results are identity
//! handles only.
//!
//! # Example
//!
//! ```ignore
//! use arraywire_client::{ArrayClient, Dtype};
//! use arraywire_client::transport::TcpTransport;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = TcpTransport::connect("127.0.0.1:5555").await?;
//!     let mut client = ArrayClient::new(transport);
//!
//!     let values = client.array(&[1i64, 2, 3]).await?;
//!     let names = client.strings(&["alpha", "beta"]).await?;
//!     println!("created {} and {} strings", values.name(), names.len());
//!     Ok(())
//! }
//! ```

use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::codec::{BinaryCodec, NumericText, SegmentedCodec};
use crate::dtype::{Dtype, Scalar, WireElement, BYTES_TAG};
use crate::error::{ArraywireError, Result};
use crate::handle::{ArrayHandle, SegmentedString, SuffixArray};
use crate::protocol::{parse_pair, parse_single, Command};
use crate::transfer;
use crate::transport::Transport;

/// Alphabets the engine's random-string generators draw from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Charset {
    /// A-Z.
    #[default]
    Uppercase,
    /// a-z.
    Lowercase,
    /// 0-9.
    Numeric,
    /// Printable ASCII.
    Printable,
    /// Arbitrary bytes.
    Binary,
}

impl Charset {
    /// Wire token naming the alphabet.
    pub const fn token(&self) -> &'static str {
        match self {
            Charset::Uppercase => "uppercase",
            Charset::Lowercase => "lowercase",
            Charset::Numeric => "numeric",
            Charset::Printable => "printable",
            Charset::Binary => "binary",
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Client for creating and populating arrays on the engine.
pub struct ArrayClient<T: Transport> {
    transport: T,
}

impl<T: Transport> ArrayClient<T> {
    /// Wrap a connected transport.
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Give the transport back, consuming the client.
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Transfer a local element sequence to the engine.
    ///
    /// The payload is checked against the transfer limit, packed big-endian,
    /// and sent as `array <dtype> <count>` with the elements as the binary
    /// body.
    ///
    /// # Errors
    ///
    /// `TransferLimitExceeded` when the payload is over the limit, plus any
    /// transport or reply failure.
    pub async fn array<E: WireElement>(&mut self, values: &[E]) -> Result<ArrayHandle> {
        transfer::check_array_transfer(values.len(), E::DTYPE.width())?;
        let body = BinaryCodec::pack(values);
        let command = Command::new("array")
            .arg_dtype(E::DTYPE)
            .arg_int(values.len() as i64)
            .with_body(body);
        self.send_single(command).await
    }

    /// Transfer a string sequence as a segmented array.
    ///
    /// The sequence is laid out as an offsets array plus one terminated byte
    /// buffer, then each buffer goes through the element-transfer path in
    /// turn: offsets as `int64`, bytes under the engine's byte tag. An empty
    /// sequence still issues both commands.
    pub async fn strings<S: AsRef<str>>(&mut self, values: &[S]) -> Result<SegmentedString> {
        let buffer = SegmentedCodec::encode(values)?;
        tracing::debug!(
            count = buffer.len(),
            total_bytes = buffer.total_bytes(),
            "transferring string array"
        );
        let offsets = self.array(&buffer.offsets).await?;
        let bytes = self.byte_array(buffer.bytes).await?;
        Ok(SegmentedString::new(offsets, bytes))
    }

    /// Create a zero-filled array of the given size and dtype.
    pub async fn zeros(&mut self, size: i64, dtype: Dtype) -> Result<ArrayHandle> {
        validate_size(size)?;
        let command = Command::new("create").arg_dtype(dtype).arg_int(size);
        self.send_single(command).await
    }

    /// Create a zero-filled array with another array's size and dtype.
    ///
    /// # Errors
    ///
    /// `UnsupportedDtype` when the handle's tag is not a creation dtype
    /// (a strings byte buffer, say).
    pub async fn zeros_like(&mut self, other: &ArrayHandle) -> Result<ArrayHandle> {
        let dtype = other
            .dtype()
            .ok_or_else(|| ArraywireError::UnsupportedDtype(other.dtype_tag().to_string()))?;
        let size = i64::try_from(other.size()).map_err(|_| {
            ArraywireError::Range(format!(
                "array size {} exceeds the command integer range",
                other.size()
            ))
        })?;
        self.zeros(size, dtype).await
    }

    /// Create the integer range `[start, stop)` with the given stride.
    ///
    /// # Errors
    ///
    /// `DivisionByZero` for a zero stride, checked before anything else.
    pub async fn arange(&mut self, start: i64, stop: i64, stride: i64) -> Result<ArrayHandle> {
        if stride == 0 {
            return Err(ArraywireError::DivisionByZero);
        }
        // The engine's descending generator runs two past the stop, so a
        // negative stride sends an adjusted stop to keep the caller's
        // half-open interval intact.
        let stop = if stride < 0 {
            stop.checked_add(2).ok_or_else(|| {
                ArraywireError::Range(format!(
                    "stop {stop} is too close to the integer ceiling for a descending range"
                ))
            })?
        } else {
            stop
        };
        let command = Command::new("arange")
            .arg_int(start)
            .arg_int(stop)
            .arg_int(stride);
        self.send_single(command).await
    }

    /// Create `length` evenly spaced floats from `start` to `stop`
    /// inclusive. Degenerate lengths are the engine's call.
    pub async fn linspace(&mut self, start: f64, stop: f64, length: i64) -> Result<ArrayHandle> {
        let command = Command::new("linspace")
            .arg_float(start)
            .arg_float(stop)
            .arg_int(length);
        self.send_single(command).await
    }

    /// Create `size` random values drawn from `[low, high)` in the given
    /// dtype.
    ///
    /// The bounds are rendered in the target dtype's canonical text form;
    /// `low == high` is a valid (single-value) range.
    ///
    /// # Errors
    ///
    /// `Range` for a negative size or `high < low`; `Format` when a bound
    /// cannot be rendered exactly in the target dtype.
    pub async fn randint(
        &mut self,
        low: impl Into<Scalar>,
        high: impl Into<Scalar>,
        size: i64,
        dtype: Dtype,
        seed: Option<u64>,
    ) -> Result<ArrayHandle> {
        let (low, high) = (low.into(), high.into());
        if size < 0 || bounds_inverted(low, high, dtype) {
            return Err(ArraywireError::Range(format!(
                "randint requires size >= 0 and high >= low, got size {size}, low {low}, high {high}"
            )));
        }
        let low_token = NumericText::scalar_token(low, dtype)?;
        let high_token = NumericText::scalar_token(high, dtype)?;
        let command = Command::new("randint")
            .arg_int(size)
            .arg_dtype(dtype)
            .arg_token(low_token)
            .arg_token(high_token)
            .arg_seed(seed);
        self.send_single(command).await
    }

    /// Create `size` floats uniformly distributed over `[low, high)`.
    pub async fn uniform(
        &mut self,
        size: i64,
        low: f64,
        high: f64,
        seed: Option<u64>,
    ) -> Result<ArrayHandle> {
        self.randint(low, high, size, Dtype::Float64, seed).await
    }

    /// Create `size` floats drawn from the standard normal distribution.
    pub async fn standard_normal(&mut self, size: i64, seed: Option<u64>) -> Result<ArrayHandle> {
        validate_size(size)?;
        let command = Command::new("randomNormal").arg_int(size).arg_seed(seed);
        self.send_single(command).await
    }

    /// Create `size` random strings with lengths uniform over
    /// `[minlen, maxlen]`, drawn from `charset`.
    ///
    /// # Errors
    ///
    /// `Range` unless `0 <= minlen <= maxlen` and `size >= 0`.
    pub async fn random_strings_uniform(
        &mut self,
        minlen: i64,
        maxlen: i64,
        size: i64,
        charset: Charset,
        seed: Option<u64>,
    ) -> Result<SegmentedString> {
        if minlen < 0 || maxlen < minlen || size < 0 {
            return Err(ArraywireError::Range(format!(
                "random_strings_uniform requires 0 <= minlen <= maxlen and size >= 0, \
                 got minlen {minlen}, maxlen {maxlen}, size {size}"
            )));
        }
        let command = Command::new("randomStrings")
            .arg_int(size)
            .arg_token("uniform")
            .arg_token(charset.token())
            .arg_int(minlen)
            .arg_int(maxlen)
            .arg_seed(seed);
        let (offsets, bytes) = self.send_pair(command).await?;
        Ok(SegmentedString::new(offsets, bytes))
    }

    /// Create `size` random strings with log-normally distributed lengths.
    ///
    /// # Errors
    ///
    /// `Range` unless `logstd > 0` and `size >= 0`.
    pub async fn random_strings_lognormal(
        &mut self,
        logmean: f64,
        logstd: f64,
        size: i64,
        charset: Charset,
        seed: Option<u64>,
    ) -> Result<SegmentedString> {
        if logstd <= 0.0 || logstd.is_nan() || size < 0 {
            return Err(ArraywireError::Range(format!(
                "random_strings_lognormal requires logstd > 0 and size >= 0, \
                 got logstd {logstd}, size {size}"
            )));
        }
        let command = Command::new("randomStrings")
            .arg_int(size)
            .arg_token("lognormal")
            .arg_token(charset.token())
            .arg_float(logmean)
            .arg_float(logstd)
            .arg_seed(seed);
        let (offsets, bytes) = self.send_pair(command).await?;
        Ok(SegmentedString::new(offsets, bytes))
    }

    /// Build the suffix array of every string in a string array.
    pub async fn suffix_array(&mut self, strings: &SegmentedString) -> Result<SuffixArray> {
        let command = Command::new("segmentedSuffixAry")
            .arg_token(SegmentedString::OBJTYPE)
            .arg_token(strings.offsets().name())
            .arg_token(strings.bytes().name());
        let (offsets, values) = self.send_pair(command).await?;
        Ok(SuffixArray::new(offsets, values))
    }

    /// Build a suffix array from a file the engine reads itself.
    ///
    /// The engine tokenizes commands on whitespace, so paths containing
    /// spaces are not representable.
    pub async fn suffix_array_file(&mut self, filename: &str) -> Result<SuffixArray> {
        let command = Command::new("segmentedSAFile").arg_token(filename);
        let (offsets, values) = self.send_pair(command).await?;
        Ok(SuffixArray::new(offsets, values))
    }

    /// Byte-buffer half of a string transfer: same `array` verb, the byte
    /// tag instead of a creation dtype, the buffer as the body.
    async fn byte_array(&mut self, bytes: Vec<u8>) -> Result<ArrayHandle> {
        transfer::check_array_transfer(bytes.len(), 1)?;
        let command = Command::new("array")
            .arg_token(BYTES_TAG)
            .arg_int(bytes.len() as i64)
            .with_body(Bytes::from(bytes));
        self.send_single(command).await
    }

    async fn send_single(&mut self, command: Command) -> Result<ArrayHandle> {
        tracing::debug!(
            command = %command.header(),
            body_bytes = command.body_len(),
            "sending creation command"
        );
        let reply = self.transport.execute(command).await?;
        let descriptor = parse_single(&reply)?;
        Ok(ArrayHandle::from(descriptor))
    }

    async fn send_pair(&mut self, command: Command) -> Result<(ArrayHandle, ArrayHandle)> {
        tracing::debug!(command = %command.header(), "sending paired creation command");
        let reply = self.transport.execute(command).await?;
        let (first, second) = parse_pair(&reply)?;
        Ok((ArrayHandle::from(first), ArrayHandle::from(second)))
    }
}

fn validate_size(size: i64) -> Result<()> {
    if size < 0 {
        return Err(ArraywireError::Range(format!(
            "size must be non-negative, got {size}"
        )));
    }
    Ok(())
}

/// Bounds ordering in the target dtype's domain. Combinations the formatter
/// will reject compare on their truncated values here; the formatter's error
/// wins right after.
fn bounds_inverted(low: Scalar, high: Scalar, dtype: Dtype) -> bool {
    match dtype {
        Dtype::Float64 => as_f64(high) < as_f64(low),
        Dtype::Int64 | Dtype::Bool => as_i64(high) < as_i64(low),
    }
}

fn as_f64(value: Scalar) -> f64 {
    match value {
        Scalar::Bool(v) => v as u8 as f64,
        Scalar::Int(v) => v as f64,
        Scalar::Float(v) => v,
    }
}

fn as_i64(value: Scalar) -> i64 {
    match value {
        Scalar::Bool(v) => v as i64,
        Scalar::Int(v) => v,
        Scalar::Float(v) => v as i64,
    }
}
