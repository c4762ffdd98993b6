//! Dual-framing JSON-RPC 2.0 transport
//!
//! Reads requests from a byte stream in either of two framings, re-detected
//! on every message:
//!
//! 1. Raw JSON: the message starts with `{`; a complete object is consumed
//!    by tracking brace depth (string literals and escapes excluded), so no
//!    trailing newline is required.
//! 2. LSP-style: header lines terminated by CRLF or LF up to an empty line,
//!    with a mandatory case-insensitive `Content-Length` giving the exact
//!    body size.
//!
//! Responses are always written as newline-delimited JSON regardless of the
//! framing the request arrived in.

use thiserror::Error;
use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout,
};

use super::protocol::{JsonRpcRequest, JsonRpcResponse, INVALID_REQUEST, PARSE_ERROR};

/// Failure mode of a transport read
///
/// End-of-stream is distinct from protocol failures: the server loop treats
/// `Eof` as a clean shutdown and answers `Rpc` errors with a null-id error
/// response.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Clean end of stream at a message boundary
    #[error("end of stream")]
    Eof,

    /// Protocol-level failure carrying a JSON-RPC error code
    #[error("JSON-RPC error {code}: {message}")]
    Rpc { code: i32, message: String },

    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    fn parse(message: impl Into<String>) -> Self {
        Self::Rpc {
            code: PARSE_ERROR,
            message: message.into(),
        }
    }

    fn invalid_request(message: impl Into<String>) -> Self {
        Self::Rpc {
            code: INVALID_REQUEST,
            message: message.into(),
        }
    }
}

/// JSON-RPC 2.0 transport over a read/write byte stream pair
pub struct Transport<R, W> {
    reader: BufReader<R>,
    writer: W,
}

impl Transport<Stdin, Stdout> {
    /// Create a transport over the process stdio streams
    pub fn stdio() -> Self {
        Transport::new(tokio::io::stdin(), tokio::io::stdout())
    }
}

impl<R, W> Transport<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Create a transport over arbitrary byte streams
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer,
        }
    }

    /// Read and validate the next JSON-RPC request
    ///
    /// Blocks until a complete message is available. The framing mode is
    /// decided per message by peeking the first non-whitespace byte.
    pub async fn read_request(&mut self) -> Result<JsonRpcRequest, TransportError> {
        self.skip_whitespace().await?;

        let raw = if self.peek_byte().await? == b'{' {
            self.read_json_object().await?
        } else {
            let content_length = self.read_headers().await?;
            let mut body = vec![0u8; content_length];
            self.reader.read_exact(&mut body).await.map_err(|e| {
                if e.kind() == std::io::ErrorKind::UnexpectedEof {
                    TransportError::parse(format!("Failed to read message body: {e}"))
                } else {
                    TransportError::Io(e)
                }
            })?;
            body
        };

        let request: JsonRpcRequest = serde_json::from_slice(&raw)
            .map_err(|e| TransportError::parse(format!("Parse error: {e}")))?;

        validate_request(&request)?;
        Ok(request)
    }

    /// Write a JSON-RPC response as newline-delimited JSON
    pub async fn write_response(
        &mut self,
        response: &JsonRpcResponse,
    ) -> Result<(), TransportError> {
        // Serialization of our own response types cannot realistically fail,
        // but degrade to an I/O-style error rather than panic if it does.
        let data = serde_json::to_vec(response)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        self.writer.write_all(&data).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Write an error response with the given code and message
    pub async fn write_error(
        &mut self,
        id: Option<serde_json::Value>,
        code: i32,
        message: impl Into<String>,
    ) -> Result<(), TransportError> {
        let response = JsonRpcResponse::error(
            id,
            super::protocol::JsonRpcError {
                code,
                message: message.into(),
                data: None,
            },
        );
        self.write_response(&response).await
    }

    /// Peek the next byte without consuming it; `Eof` if the stream ended.
    async fn peek_byte(&mut self) -> Result<u8, TransportError> {
        let buf = self.reader.fill_buf().await?;
        match buf.first() {
            Some(&b) => Ok(b),
            None => Err(TransportError::Eof),
        }
    }

    /// Consume one byte; `None` at end of stream.
    async fn read_byte(&mut self) -> Result<Option<u8>, TransportError> {
        let buf = self.reader.fill_buf().await?;
        match buf.first() {
            Some(&b) => {
                self.reader.consume(1);
                Ok(Some(b))
            }
            None => Ok(None),
        }
    }

    /// Discard whitespace between messages
    ///
    /// Tolerates interleaved newline-delimited and un-delimited producers:
    /// any run of spaces, tabs, CRs, or LFs before the next message is eaten.
    async fn skip_whitespace(&mut self) -> Result<(), TransportError> {
        loop {
            match self.peek_byte().await? {
                b' ' | b'\t' | b'\r' | b'\n' => self.reader.consume(1),
                _ => return Ok(()),
            }
        }
    }

    /// Read one complete JSON object by tracking brace depth
    ///
    /// Consumption stops the moment depth returns to zero, so an object at
    /// end-of-stream with no trailing newline still parses.
    async fn read_json_object(&mut self) -> Result<Vec<u8>, TransportError> {
        let mut buf = Vec::new();
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;

        loop {
            let byte = match self.read_byte().await? {
                Some(b) => b,
                None if buf.is_empty() => return Err(TransportError::Eof),
                None => {
                    return Err(TransportError::parse("Unexpected EOF in JSON object"));
                }
            };

            buf.push(byte);

            if escaped {
                escaped = false;
                continue;
            }
            if byte == b'\\' && in_string {
                escaped = true;
                continue;
            }
            if byte == b'"' {
                in_string = !in_string;
                continue;
            }
            if in_string {
                continue;
            }

            match byte {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(buf);
                    }
                }
                _ => {}
            }
        }
    }

    /// Read LSP-style headers up to the empty line; returns Content-Length.
    ///
    /// Header names are matched case-insensitively; headers other than
    /// Content-Length are parsed and ignored.
    async fn read_headers(&mut self) -> Result<usize, TransportError> {
        let mut content_length: Option<usize> = None;

        loop {
            let mut line = Vec::new();
            let read = self.reader.read_until(b'\n', &mut line).await?;
            if read == 0 {
                return Err(TransportError::parse(
                    "Failed to read header: unexpected end of stream",
                ));
            }

            let line = String::from_utf8_lossy(&line);
            let line = line.trim_end_matches(['\r', '\n']);

            // Empty line signals end of headers
            if line.is_empty() {
                break;
            }

            if let Some((key, value)) = line.split_once(':') {
                if key.trim().eq_ignore_ascii_case("content-length") {
                    let value = value.trim();
                    let length = value.parse::<usize>().map_err(|_| {
                        TransportError::parse(format!("Invalid Content-Length: {value}"))
                    })?;
                    content_length = Some(length);
                }
            }
        }

        content_length.ok_or_else(|| TransportError::parse("Missing Content-Length header"))
    }
}

/// Validate JSON-RPC 2.0 envelope requirements
fn validate_request(request: &JsonRpcRequest) -> Result<(), TransportError> {
    if request.jsonrpc.is_empty() {
        return Err(TransportError::invalid_request(
            "Invalid Request: missing jsonrpc field",
        ));
    }
    if request.jsonrpc != "2.0" {
        return Err(TransportError::invalid_request(
            "Invalid Request: jsonrpc must be '2.0'",
        ));
    }
    if request.method.is_empty() {
        return Err(TransportError::invalid_request(
            "Invalid Request: missing method field",
        ));
    }
    Ok(())
}
