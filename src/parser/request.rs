//! HTTP request parsing and representation.

use log::debug;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use crate::parser::error::Error;
use crate::parser::headers::Headers;
use crate::parser::method::Method;

/// Upper bound on the body buffer reserved up front from `Content-Length`.
const MAX_BODY_PREALLOC: usize = 64 * 1024;

/// Represents an HTTP request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// The request path, exactly as sent
    pub path: String,
    /// The protocol version token, exactly as sent
    pub version: String,
    /// The HTTP headers
    pub headers: Headers,
    /// The request body
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// Create a new HTTP request with an empty body.
    pub fn new(method: Method, path: impl Into<String>, version: impl Into<String>, headers: Headers) -> Self {
        Self {
            method,
            path: path.into(),
            version: version.into(),
            headers,
            body: Vec::new(),
        }
    }

    /// Create a new HTTP request with a body.
    pub fn with_body(
        method: Method,
        path: impl Into<String>,
        version: impl Into<String>,
        headers: Headers,
        body: Vec<u8>,
    ) -> Self {
        let mut request = Self::new(method, path, version, headers);
        request.body = body;
        request
    }

    /// Get a header value.
    ///
    /// Header names are matched case-insensitively.
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Check if a header exists.
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.contains(name)
    }

    /// The encodings listed in `Accept-Encoding`, with any `;q=` style
    /// parameters stripped and whitespace trimmed.
    pub fn accepted_encodings(&self) -> Vec<&str> {
        match self.get_header("Accept-Encoding") {
            Some(value) if !value.is_empty() => value
                .split(',')
                .map(|candidate| {
                    let scheme = candidate.split_once(';').map_or(candidate, |(scheme, _)| scheme);
                    scheme.trim()
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Whether the connection should stay open after answering this request.
    ///
    /// Only an explicit `Connection: close` ends the session.
    pub fn keep_alive(&self) -> bool {
        !self
            .get_header("Connection")
            .is_some_and(|value| value.eq_ignore_ascii_case("close"))
    }
}

/// Read one line including its `\n` terminator.
///
/// Returns `Ok(None)` when the stream ends before a terminator is seen.
async fn read_line<R>(reader: &mut R) -> std::io::Result<Option<Vec<u8>>>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = Vec::new();
    reader.read_until(b'\n', &mut line).await?;
    if line.last() != Some(&b'\n') {
        return Ok(None);
    }
    line.pop();
    if line.last() == Some(&b'\r') {
        line.pop();
    }
    Ok(Some(line))
}

/// Parse the next HTTP request from a buffered stream.
///
/// Returns `Ok(None)` when the stream ends (or fails) before a request line
/// arrives: that is how a client retires a persistent connection, and it is
/// not an error.
pub async fn parse_request<R>(reader: &mut R) -> Result<Option<HttpRequest>, Error>
where
    R: AsyncBufRead + Unpin,
{
    // An I/O failure here just means the session is over
    let request_line = match read_line(reader).await {
        Ok(Some(line)) => line,
        Ok(None) => return Ok(None),
        Err(e) => {
            debug!("Stream closed while awaiting request line: {e}");
            return Ok(None);
        }
    };

    let request_line = String::from_utf8(request_line)
        .map_err(|_| Error::MalformedRequestLine("Invalid UTF-8".to_string()))?;
    let request_line = request_line.trim();

    // Exactly one space between the three tokens
    let parts: Vec<&str> = request_line.split(' ').collect();
    let &[method, path, version] = parts.as_slice() else {
        return Err(Error::MalformedRequestLine(request_line.to_string()));
    };
    if method.is_empty() || path.is_empty() || version.is_empty() {
        return Err(Error::MalformedRequestLine(request_line.to_string()));
    }

    let method = Method::from(method);
    let path = path.to_string();
    let version = version.to_string();

    // Parse the headers
    let mut headers = Headers::new();
    loop {
        let line = read_line(reader).await?.ok_or(Error::IncompleteHeaders)?;
        let line = String::from_utf8_lossy(&line);
        let line = line.trim();

        // Empty line indicates the end of headers
        if line.is_empty() {
            break;
        }

        // Lines without a colon are skipped
        let Some((name, value)) = line.split_once(':') else {
            debug!("Skipping header line without colon: {line}");
            continue;
        };
        headers.insert(name.trim(), value.trim());
    }

    let content_length = match headers.get("Content-Length") {
        Some(value) => value
            .parse::<usize>()
            .map_err(|_| Error::InvalidContentLength(value.to_string()))?,
        None => 0,
    };

    let mut request = HttpRequest::new(method, path, version, headers);
    if content_length > 0 {
        let mut body = Vec::with_capacity(content_length.min(MAX_BODY_PREALLOC));
        let result = (&mut *reader).take(content_length as u64).read_to_end(&mut body).await;
        if let Err(e) = result {
            debug!("Body read failed: {e}");
        }
        if body.len() < content_length {
            return Err(Error::IncompleteBody {
                expected: content_length,
                received: body.len(),
            });
        }
        request.body = body;
    }

    Ok(Some(request))
}
