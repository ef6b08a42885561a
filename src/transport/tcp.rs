//! TCP transport with length-prefixed framing.
//!
//! Each message - the encoded command going out, the reply text coming
//! back - travels behind a `u32` big-endian length prefix. The framing
//! helpers are generic over the stream so they can run against in-memory
//! duplex pipes in tests.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpStream, ToSocketAddrs};

use super::{BoxFuture, Transport};
use crate::error::{ArraywireError, Result};
use crate::protocol::Command;

/// Ceiling on a framed reply. Replies are one or two descriptor lines, so
/// anything near this is a corrupt or hostile length prefix.
pub const MAX_REPLY_BYTES: u32 = 1024 * 1024;

/// Reference transport: one TCP connection to the engine.
#[derive(Debug)]
pub struct TcpTransport {
    stream: TcpStream,
}

impl TcpTransport {
    /// Connect to an engine endpoint.
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        Ok(Self { stream })
    }

    /// Wrap an already-connected stream.
    pub fn from_stream(stream: TcpStream) -> Self {
        Self { stream }
    }
}

impl Transport for TcpTransport {
    fn execute(&mut self, request: Command) -> BoxFuture<'_, Result<String>> {
        Box::pin(async move {
            write_message(&mut self.stream, &request.encode()).await?;
            read_reply(&mut self.stream).await
        })
    }
}

/// Write one length-prefixed message and flush it.
pub(crate) async fn write_message<W>(writer: &mut W, message: &[u8]) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let len = u32::try_from(message.len())
        .map_err(|_| ArraywireError::Transport("message does not fit u32 framing".to_string()))?;
    writer.write_all(&len.to_be_bytes()).await?;
    writer.write_all(message).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one length-prefixed reply and decode it as UTF-8 text.
pub(crate) async fn read_reply<R>(reader: &mut R) -> Result<String>
where
    R: AsyncRead + Unpin,
{
    let mut len_bytes = [0u8; 4];
    read_exact_or_closed(reader, &mut len_bytes).await?;
    let len = u32::from_be_bytes(len_bytes);
    if len > MAX_REPLY_BYTES {
        return Err(ArraywireError::MalformedReply(format!(
            "reply length {len} exceeds the {MAX_REPLY_BYTES}-byte frame ceiling"
        )));
    }
    let mut payload = vec![0u8; len as usize];
    read_exact_or_closed(reader, &mut payload).await?;
    String::from_utf8(payload)
        .map_err(|_| ArraywireError::MalformedReply("reply is not valid UTF-8".to_string()))
}

async fn read_exact_or_closed<R>(reader: &mut R, buf: &mut [u8]) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    match reader.read_exact(buf).await {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            Err(ArraywireError::ConnectionClosed)
        }
        Err(e) => Err(e.into()),
    }
}
