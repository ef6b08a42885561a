//! Integration tests for arraywire-client.
//!
//! These tests run a real [`ArrayClient`] over a real [`TcpTransport`]
//! against a scripted in-process engine, verifying the bytes that hit the
//! wire and the handles that come back.

use arraywire_client::transport::{TcpTransport, MAX_REPLY_BYTES};
use arraywire_client::{ArrayClient, ArraywireError, Charset, Dtype};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// Accept one connection and serve the scripted replies in order, returning
/// every command frame received. Frames and replies are both length-prefixed
/// with a big-endian u32.
async fn serve_script(listener: TcpListener, replies: Vec<String>) -> Vec<Vec<u8>> {
    let (mut stream, _) = listener.accept().await.unwrap();
    let mut received = Vec::new();
    for reply in replies {
        received.push(read_frame(&mut stream).await);
        write_frame(&mut stream, reply.as_bytes()).await;
    }
    received
}

async fn read_frame(stream: &mut TcpStream) -> Vec<u8> {
    let len = stream.read_u32().await.unwrap() as usize;
    let mut frame = vec![0u8; len];
    stream.read_exact(&mut frame).await.unwrap();
    frame
}

async fn write_frame(stream: &mut TcpStream, payload: &[u8]) {
    stream.write_u32(payload.len() as u32).await.unwrap();
    stream.write_all(payload).await.unwrap();
    stream.flush().await.unwrap();
}

/// Bind a scripted engine and connect a client to it.
async fn scripted_engine(
    replies: &[&str],
) -> (ArrayClient<TcpTransport>, JoinHandle<Vec<Vec<u8>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let replies = replies.iter().map(|r| r.to_string()).collect();
    let engine = tokio::spawn(serve_script(listener, replies));
    let transport = TcpTransport::connect(addr).await.unwrap();
    (ArrayClient::new(transport), engine)
}

/// Transfer an int64 array and verify the exact frame: text header, one
/// separator, then the big-endian packed elements.
#[tokio::test]
async fn test_array_transfer_over_tcp() {
    let (mut client, engine) = scripted_engine(&["created id_0 int64 4"]).await;

    let handle = client.array(&[1i64, -2, 3, i64::MAX]).await.unwrap();
    assert_eq!(handle.name(), "id_0");
    assert_eq!(handle.dtype(), Some(Dtype::Int64));
    assert_eq!(handle.size(), 4);
    assert_eq!(handle.size_bytes(), Some(32));

    let frames = engine.await.unwrap();
    assert_eq!(frames.len(), 1);
    let frame = &frames[0];
    assert_eq!(&frame[..14], b"array int64 4 ");
    assert_eq!(frame.len(), 14 + 32);
    assert_eq!(&frame[14..22], &1i64.to_be_bytes());
    assert_eq!(&frame[22..30], &(-2i64).to_be_bytes());
    assert_eq!(&frame[38..], &i64::MAX.to_be_bytes());
}

/// A float transfer preserves exact bit patterns through the frame.
#[tokio::test]
async fn test_float_array_bits_survive_transfer() {
    let (mut client, engine) = scripted_engine(&["created id_1 float64 3"]).await;

    let values = [f64::NEG_INFINITY, -0.0, 2.5];
    let handle = client.array(&values).await.unwrap();
    assert_eq!(handle.dtype(), Some(Dtype::Float64));

    let frames = engine.await.unwrap();
    let frame = &frames[0];
    assert_eq!(&frame[..16], b"array float64 3 ");
    for (i, value) in values.iter().enumerate() {
        let start = 16 + i * 8;
        assert_eq!(&frame[start..start + 8], &value.to_be_bytes());
    }
}

/// A string transfer issues two frames: int64 offsets, then the terminated
/// byte buffer under the engine's byte tag.
#[tokio::test]
async fn test_strings_transfer_issues_two_frames() {
    let (mut client, engine) =
        scripted_engine(&["created id_0 int64 2", "created id_1 uint8 12"]).await;

    let strings = client.strings(&["hello", "world"]).await.unwrap();
    assert_eq!(strings.len(), 2);
    assert_eq!(strings.total_bytes(), 12);
    assert_eq!(strings.offsets().name(), "id_0");
    assert_eq!(strings.bytes().name(), "id_1");

    let frames = engine.await.unwrap();
    assert_eq!(frames.len(), 2);
    assert_eq!(&frames[0][..14], b"array int64 2 ");
    assert_eq!(&frames[0][14..22], &0i64.to_be_bytes());
    assert_eq!(&frames[0][22..], &6i64.to_be_bytes());
    assert_eq!(&frames[1][..], b"array uint8 12 hello\0world\0");
}

/// Creation commands are pure text and run one at a time on the connection.
#[tokio::test]
async fn test_creation_pipeline() {
    let (mut client, engine) = scripted_engine(&[
        "created id_0 int64 5",
        "created id_1 float64 11",
        "created id_2 int64 100",
        "created id_3 bool 8",
    ])
    .await;

    let evens = client.arange(0, 10, 2).await.unwrap();
    let grid = client.linspace(-1.0, 1.0, 11).await.unwrap();
    let rolls = client
        .randint(1i64, 7i64, 100, Dtype::Int64, Some(42))
        .await
        .unwrap();
    let flags = client.zeros(8, Dtype::Bool).await.unwrap();

    assert_eq!(evens.size(), 5);
    assert_eq!(grid.dtype(), Some(Dtype::Float64));
    assert_eq!(rolls.name(), "id_2");
    assert_eq!(flags.dtype(), Some(Dtype::Bool));

    let frames = engine.await.unwrap();
    assert_eq!(frames[0], b"arange 0 10 2");
    assert_eq!(frames[1], b"linspace -1 1 11");
    assert_eq!(frames[2], b"randint 100 int64 1 7 42");
    assert_eq!(frames[3], b"create bool 8");
}

/// Random string generation parses the paired descriptor reply.
#[tokio::test]
async fn test_random_strings_pair_reply() {
    let (mut client, engine) =
        scripted_engine(&["created id_4 int64 3+created id_5 uint8 10"]).await;

    let strings = client
        .random_strings_uniform(2, 4, 3, Charset::Numeric, Some(99))
        .await
        .unwrap();
    assert_eq!(strings.len(), 3);
    assert_eq!(strings.total_bytes(), 10);

    let frames = engine.await.unwrap();
    assert_eq!(frames[0], b"randomStrings 3 uniform numeric 2 4 99");
}

/// Suffix arrays chain off a transferred string array by handle name.
#[tokio::test]
async fn test_suffix_array_pipeline() {
    let (mut client, engine) = scripted_engine(&[
        "created id_0 int64 2",
        "created id_1 uint8 9",
        "created id_2 int64 2+created id_3 int64 9",
    ])
    .await;

    let strings = client.strings(&["abc", "defg"]).await.unwrap();
    let sa = client.suffix_array(&strings).await.unwrap();
    assert_eq!(sa.len(), 2);
    assert_eq!(sa.offsets().name(), "id_2");
    assert_eq!(sa.values().name(), "id_3");

    let frames = engine.await.unwrap();
    assert_eq!(frames[2], b"segmentedSuffixAry str id_0 id_1");
}

/// Reply shape mismatches surface as `MalformedReply`.
#[tokio::test]
async fn test_reply_shape_mismatches() {
    // Paired reply where a single descriptor was expected.
    let (mut client, engine) =
        scripted_engine(&["created id_0 int64 1+created id_1 uint8 2"]).await;
    let err = client.array(&[1i64]).await.unwrap_err();
    assert!(matches!(err, ArraywireError::MalformedReply(_)));
    engine.await.unwrap();

    // Single reply where a pair was expected.
    let (mut client, engine) = scripted_engine(&["created id_0 int64 3"]).await;
    let err = client
        .random_strings_uniform(1, 2, 3, Charset::default(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ArraywireError::MalformedReply(_)));
    engine.await.unwrap();

    // Descriptor with an unparseable size.
    let (mut client, engine) = scripted_engine(&["created id_0 int64 many"]).await;
    let err = client.zeros(3, Dtype::Int64).await.unwrap_err();
    assert!(matches!(err, ArraywireError::MalformedReply(_)));
    engine.await.unwrap();
}

/// A reply claiming more than the reply size cap is rejected without
/// reading the body.
#[tokio::test]
async fn test_oversized_reply_rejected() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let engine = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        read_frame(&mut stream).await;
        // Length prefix only; the body never comes.
        stream.write_u32(MAX_REPLY_BYTES + 1).await.unwrap();
        stream.flush().await.unwrap();
    });

    let transport = TcpTransport::connect(addr).await.unwrap();
    let mut client = ArrayClient::new(transport);
    let err = client.zeros(1, Dtype::Int64).await.unwrap_err();
    assert!(matches!(err, ArraywireError::MalformedReply(_)));
    engine.await.unwrap();
}

/// A reply that is not UTF-8 is rejected.
#[tokio::test]
async fn test_invalid_utf8_reply_rejected() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let engine = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        read_frame(&mut stream).await;
        write_frame(&mut stream, &[0xff, 0xfe, 0xfd]).await;
    });

    let transport = TcpTransport::connect(addr).await.unwrap();
    let mut client = ArrayClient::new(transport);
    let err = client.zeros(1, Dtype::Int64).await.unwrap_err();
    assert!(matches!(err, ArraywireError::MalformedReply(_)));
    engine.await.unwrap();
}

/// An engine that hangs up mid-reply surfaces as `ConnectionClosed`.
#[tokio::test]
async fn test_closed_connection_surfaces() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let engine = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        read_frame(&mut stream).await;
        // Drop without replying.
    });

    let transport = TcpTransport::connect(addr).await.unwrap();
    let mut client = ArrayClient::new(transport);
    let err = client.zeros(1, Dtype::Int64).await.unwrap_err();
    assert!(matches!(err, ArraywireError::ConnectionClosed));
    engine.await.unwrap();
}

/// Validation failures never reach the wire; the connection stays clean for
/// the next command.
#[tokio::test]
async fn test_validation_failures_send_nothing() {
    let (mut client, engine) = scripted_engine(&["created id_0 int64 5"]).await;

    let err = client.arange(0, 10, 0).await.unwrap_err();
    assert!(matches!(err, ArraywireError::DivisionByZero));
    let err = client
        .randint(7i64, 3i64, 5, Dtype::Int64, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ArraywireError::Range(_)));

    // The connection is still usable afterwards.
    let handle = client.arange(5, 0, -1).await.unwrap();
    assert_eq!(handle.size(), 5);

    let frames = engine.await.unwrap();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0], b"arange 5 2 -1");
}
