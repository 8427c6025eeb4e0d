//! Minimal HTTP/1.1 framing: one request per connection, `Connection: close`.

use std::io::{self, BufRead, Read, Write};

use serde::Serialize;
use thiserror::Error;

/// Bounds applied while reading a request
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub max_line_bytes: usize,
    pub max_headers: usize,
    pub max_body_bytes: usize,
}

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("connection error: {0}")]
    Io(#[from] io::Error),

    #[error("connection closed before a request was received")]
    Closed,

    #[error("bad request: {0}")]
    BadRequest(&'static str),

    #[error("request headers too large")]
    HeadersTooLarge,

    #[error("request body of {0} bytes exceeds the limit")]
    PayloadTooLarge(usize),
}

impl HttpError {
    /// Response to send back, if the connection is still usable
    pub fn to_response(&self) -> Option<HttpResponse> {
        let (status, code) = match self {
            HttpError::Io(_) | HttpError::Closed => return None,
            HttpError::BadRequest(_) => (400, "malformed_request"),
            HttpError::HeadersTooLarge => (431, "headers_too_large"),
            HttpError::PayloadTooLarge(_) => (413, "payload_too_large"),
        };
        Some(HttpResponse::error(status, code, &self.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: String,
    /// Path without the query string
    pub path: String,
    /// Names are lowercased
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Read one line (without the trailing CRLF), at most `limit` bytes.
fn read_line<R: BufRead>(reader: &mut R, limit: usize) -> Result<Option<String>, HttpError> {
    let mut line = String::new();
    let read = reader
        .by_ref()
        .take(limit as u64 + 1)
        .read_line(&mut line)
        .map_err(|err| match err.kind() {
            io::ErrorKind::InvalidData => HttpError::BadRequest("request is not valid UTF-8"),
            _ => HttpError::Io(err),
        })?;
    if read == 0 {
        return Ok(None);
    }
    if read > limit || !line.ends_with('\n') {
        return Err(HttpError::HeadersTooLarge);
    }
    let trimmed = line.trim_end_matches(['\r', '\n']).to_string();
    Ok(Some(trimmed))
}

pub fn read_request<R: BufRead>(reader: &mut R, limits: &Limits) -> Result<HttpRequest, HttpError> {
    let request_line = read_line(reader, limits.max_line_bytes)?.ok_or(HttpError::Closed)?;
    let mut parts = request_line.split_whitespace();
    let (method, target, version) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(method), Some(target), Some(version), None) => (method, target, version),
        _ => return Err(HttpError::BadRequest("malformed request line")),
    };
    if !version.starts_with("HTTP/1.") {
        return Err(HttpError::BadRequest("unsupported HTTP version"));
    }
    let path = target.split('?').next().unwrap_or(target).to_string();
    let method = method.to_ascii_uppercase();

    let mut headers = Vec::new();
    loop {
        let line = read_line(reader, limits.max_line_bytes)?
            .ok_or(HttpError::BadRequest("connection closed inside headers"))?;
        if line.is_empty() {
            break;
        }
        if headers.len() == limits.max_headers {
            return Err(HttpError::HeadersTooLarge);
        }
        let (name, value) = line
            .split_once(':')
            .ok_or(HttpError::BadRequest("malformed header line"))?;
        headers.push((name.trim().to_ascii_lowercase(), value.trim().to_string()));
    }

    let mut request = HttpRequest {
        method,
        path,
        headers,
        body: Vec::new(),
    };

    if request.header("transfer-encoding").is_some() {
        return Err(HttpError::BadRequest("chunked bodies are not supported"));
    }
    let length = match request.header("content-length") {
        Some(value) => value
            .parse::<usize>()
            .map_err(|_| HttpError::BadRequest("invalid Content-Length"))?,
        None => 0,
    };
    if length > limits.max_body_bytes {
        return Err(HttpError::PayloadTooLarge(length));
    }
    request.body = vec![0; length];
    reader.read_exact(&mut request.body).map_err(|err| match err.kind() {
        io::ErrorKind::UnexpectedEof => HttpError::BadRequest("body shorter than Content-Length"),
        _ => HttpError::Io(err),
    })?;

    Ok(request)
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: &'a str,
}

impl HttpResponse {
    pub fn empty(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self::empty(status)
                .with_header("Content-Type", "application/json")
                .with_body(body),
            Err(err) => Self::error(500, "internal_error", &err.to_string()),
        }
    }

    /// `{"error": code, "message": message}`
    pub fn error(status: u16, code: &str, message: &str) -> Self {
        let body = ErrorBody {
            error: code,
            message,
        };
        // ErrorBody holds two strings, serialization cannot fail
        let body = serde_json::to_vec(&body).unwrap_or_default();
        Self::empty(status)
            .with_header("Content-Type", "application/json")
            .with_body(body)
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write!(writer, "HTTP/1.1 {} {}\r\n", self.status, reason_phrase(self.status))?;
        for (name, value) in &self.headers {
            write!(writer, "{}: {}\r\n", name, value)?;
        }
        write!(writer, "Content-Length: {}\r\n", self.body.len())?;
        write!(writer, "Connection: close\r\n\r\n")?;
        writer.write_all(&self.body)?;
        writer.flush()
    }
}

pub fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        413 => "Payload Too Large",
        431 => "Request Header Fields Too Large",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
