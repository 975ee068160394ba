//! Per-socket connection: reassembles framed messages from the byte
//! stream and writes framed responses back.
//!
//! The read side is a small state machine: await a header, accumulate
//! body chunks until the declared length is reached, decode, yield one
//! request. Malformed input gets a Bad Request frame and the state is
//! reset; only end-of-stream or a transport failure terminates the
//! sequence.

use crate::domain::GameError;
use crate::presentation::protocol::{
    self, ProtocolRequest, ProtocolResponse, CHUNK_SIZE, HEADER_SIZE, HEADER_TOTAL_SIZE,
};
use serde::Serialize;
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// One live client connection. Generic over the stream so tests can
/// drive it with an in-memory duplex instead of a TCP socket.
pub struct Connection<S> {
    stream: S,
    closed: bool,
}

impl<S: AsyncRead + AsyncWrite + Unpin> Connection<S> {
    pub fn new(stream: S) -> Self {
        Connection {
            stream,
            closed: false,
        }
    }

    /// Produce the next complete request, or `None` once the stream has
    /// ended. Strictly FIFO: the caller sends its response before asking
    /// for the next request.
    pub async fn next_request(&mut self) -> Option<ProtocolRequest> {
        let mut chunk = [0u8; CHUNK_SIZE];
        loop {
            let n = self.stream.read(&mut chunk).await.ok()?;
            if n == 0 {
                return None;
            }

            if n < HEADER_TOTAL_SIZE {
                self.send_bad_request().await.ok()?;
                continue;
            }
            let Some(body_len) = parse_header(&chunk[..HEADER_SIZE]) else {
                self.send_bad_request().await.ok()?;
                continue;
            };

            let mut body = Vec::with_capacity(body_len);
            body.extend_from_slice(&chunk[HEADER_TOTAL_SIZE..n]);
            while body.len() < body_len {
                let n = self.stream.read(&mut chunk).await.ok()?;
                if n == 0 {
                    return None;
                }
                body.extend_from_slice(&chunk[..n]);
            }
            body.truncate(body_len);

            match protocol::parse::<ProtocolRequest>(&body) {
                Ok(request) => return Some(request),
                Err(err) => {
                    tracing::debug!(error = %err, "discarding undecodable frame");
                    self.send_bad_request().await.ok()?;
                }
            }
        }
    }

    /// Frame and send a payload.
    pub async fn send<T: Serialize>(&mut self, payload: &T) -> io::Result<()> {
        let frame = protocol::construct(payload)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.stream.write_all(&frame).await?;
        self.stream.flush().await
    }

    async fn send_bad_request(&mut self) -> io::Result<()> {
        self.send(&ProtocolResponse::error(&GameError::BadRequest))
            .await
    }

    /// Signal end-of-output to the peer, flush, and release the socket.
    /// Safe to call more than once.
    pub async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        let _ = self.stream.flush().await;
        let _ = self.stream.shutdown().await;
    }
}

/// Parse the fixed-width length field: ASCII digits, space-padded right.
fn parse_header(digits: &[u8]) -> Option<usize> {
    std::str::from_utf8(digits)
        .ok()?
        .trim_end()
        .parse::<usize>()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::protocol::{
        ActionType, ErrorResponse, LoginRequest, RequestData, ResponseData,
    };
    use tokio::io::DuplexStream;

    /// Read one full frame from the client end and decode its payload.
    async fn read_response(client: &mut DuplexStream) -> ProtocolResponse {
        let mut header = [0u8; HEADER_TOTAL_SIZE];
        client.read_exact(&mut header).await.unwrap();
        let body_len = parse_header(&header[..HEADER_SIZE]).unwrap();
        let mut body = vec![0u8; body_len];
        client.read_exact(&mut body).await.unwrap();
        protocol::parse(&body).unwrap()
    }

    fn login_frame(nickname: &str) -> Vec<u8> {
        let request = ProtocolRequest {
            action_type: ActionType::Login,
            session_uuid: None,
            data: Some(RequestData::Login(LoginRequest {
                nickname: crate::domain::Nickname::new(nickname).unwrap(),
            })),
        };
        protocol::construct(&request).unwrap()
    }

    #[tokio::test]
    async fn yields_a_complete_request() {
        let (mut client, server) = tokio::io::duplex(1024);
        let mut conn = Connection::new(server);

        client.write_all(&login_frame("nick")).await.unwrap();

        let request = conn.next_request().await.unwrap();
        assert_eq!(request.action_type, ActionType::Login);
    }

    #[tokio::test]
    async fn eof_ends_the_sequence_without_error() {
        let (client, server) = tokio::io::duplex(1024);
        let mut conn = Connection::new(server);

        drop(client);
        assert!(conn.next_request().await.is_none());
    }

    #[tokio::test]
    async fn short_chunk_gets_bad_request_and_does_not_desync() {
        let (mut client, server) = tokio::io::duplex(1024);
        let mut conn = Connection::new(server);

        let reader = tokio::spawn(async move {
            let request = conn.next_request().await;
            (conn, request)
        });

        // Too short to hold a header.
        client.write_all(b"oops").await.unwrap();
        let response = read_response(&mut client).await;
        match response.data {
            ResponseData::Error(ErrorResponse { error_code, .. }) => {
                assert_eq!(error_code, 1000)
            }
            other => panic!("expected bad request, got {other:?}"),
        }

        // The same connection must still parse a valid frame.
        client.write_all(&login_frame("nick")).await.unwrap();
        let (_conn, request) = reader.await.unwrap();
        assert_eq!(request.unwrap().action_type, ActionType::Login);
    }

    #[tokio::test]
    async fn non_numeric_header_gets_bad_request() {
        let (mut client, server) = tokio::io::duplex(1024);
        let mut conn = Connection::new(server);

        let reader = tokio::spawn(async move {
            let request = conn.next_request().await;
            (conn, request)
        });

        client.write_all(b"abcdefghijHEADERxxxx").await.unwrap();
        let response = read_response(&mut client).await;
        assert!(matches!(
            response.data,
            ResponseData::Error(ErrorResponse {
                error_code: 1000,
                ..
            })
        ));

        client.write_all(&login_frame("nick")).await.unwrap();
        let (_conn, request) = reader.await.unwrap();
        assert!(request.is_some());
    }

    #[tokio::test]
    async fn undecodable_payload_gets_bad_request() {
        let (mut client, server) = tokio::io::duplex(1024);
        let mut conn = Connection::new(server);

        let reader = tokio::spawn(async move {
            let request = conn.next_request().await;
            (conn, request)
        });

        // Well-framed but the payload is not valid base64 JSON.
        let mut frame = format!("{:<width$}HEADER", 8, width = HEADER_SIZE).into_bytes();
        frame.extend_from_slice(b"%%%%%%%%");
        client.write_all(&frame).await.unwrap();

        let response = read_response(&mut client).await;
        assert!(matches!(
            response.data,
            ResponseData::Error(ErrorResponse {
                error_code: 1000,
                ..
            })
        ));

        client.write_all(&login_frame("nick")).await.unwrap();
        let (_conn, request) = reader.await.unwrap();
        assert!(request.is_some());
    }

    #[tokio::test]
    async fn body_larger_than_one_chunk_is_reassembled() {
        let (mut client, server) = tokio::io::duplex(4096);
        let mut conn = Connection::new(server);

        // Long nickname-adjacent payload: a request with max-size fields
        // comfortably exceeds one 64-byte chunk once base64-encoded.
        let frame = login_frame("exactly12chr");
        assert!(frame.len() > CHUNK_SIZE);

        client.write_all(&frame).await.unwrap();
        let request = conn.next_request().await.unwrap();
        assert_eq!(request.action_type, ActionType::Login);
    }

    #[tokio::test]
    async fn close_is_idempotent_and_signals_eof() {
        let (mut client, server) = tokio::io::duplex(1024);
        let mut conn = Connection::new(server);

        conn.close().await;
        conn.close().await;

        let mut buf = [0u8; 8];
        let n = client.read(&mut buf).await.unwrap();
        assert_eq!(n, 0);
    }
}
