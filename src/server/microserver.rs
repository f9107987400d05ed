//! Minimal blocking HTTP/1.1 over any Read + Write stream.
//!
//! - One request per connection (no keep-alive)
//! - No chunked transfer encoding (rejected)
//! - POST requires Content-Length
//! - Header cap: 32 KiB, Body cap: 1 MiB (Read::take, not Content-Length trust)

use std::io::{Read, Write};

/// Maximum header section size (32 KiB)
pub const MAX_HEADER_SIZE: usize = 32 * 1024;

/// Maximum request body size (1 MiB)
pub const MAX_BODY_SIZE: usize = 1_048_576;

/// Parsed HTTP request
#[derive(Debug)]
pub struct HttpRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// HTTP response to write back
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// A request that could not be read, with the status to answer it with
#[derive(Debug, PartialEq, Eq)]
pub struct RequestError {
    pub status: u16,
    pub message: String,
}

impl RequestError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: 400,
            message: message.into(),
        }
    }

    fn too_large(message: impl Into<String>) -> Self {
        Self {
            status: 413,
            message: message.into(),
        }
    }
}

/// Reason phrase for the status codes this server emits
fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        413 => "Payload Too Large",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// Read and parse one HTTP request from a stream.
///
/// Returns None if the connection closed before any byte arrived.
pub fn read_request(stream: &mut impl Read) -> Option<Result<HttpRequest, RequestError>> {
    let mut header_buf = Vec::with_capacity(4096);
    let mut byte = [0u8; 1];

    loop {
        match stream.read(&mut byte) {
            Ok(0) => {
                if header_buf.is_empty() {
                    return None;
                }
                return Some(Err(RequestError::bad_request("Connection closed mid-request")));
            }
            Ok(_) => {
                header_buf.push(byte[0]);
                if header_buf.len() > MAX_HEADER_SIZE {
                    return Some(Err(RequestError::too_large("Headers too large")));
                }
                if header_buf.ends_with(b"\r\n\r\n") {
                    break;
                }
            }
            Err(e) => {
                if header_buf.is_empty() {
                    return None;
                }
                return Some(Err(RequestError::bad_request(format!("Read error: {}", e))));
            }
        }
    }

    let mut parsed_headers = [httparse::EMPTY_HEADER; 64];
    let mut req = httparse::Request::new(&mut parsed_headers);

    match req.parse(&header_buf) {
        Ok(httparse::Status::Complete(_)) => {}
        Ok(httparse::Status::Partial) => {
            return Some(Err(RequestError::bad_request("Incomplete HTTP request")));
        }
        Err(e) => {
            return Some(Err(RequestError::bad_request(format!("HTTP parse error: {}", e))));
        }
    }

    let method = req.method.unwrap_or("").to_string();
    // Query strings are not used by any route
    let path = req
        .path
        .unwrap_or("/")
        .split('?')
        .next()
        .unwrap_or("/")
        .to_string();

    let mut headers = Vec::new();
    let mut content_length: Option<usize> = None;
    let mut chunked = false;

    for h in req.headers.iter() {
        let name = h.name.to_string();
        let value = String::from_utf8_lossy(h.value).to_string();

        if name.eq_ignore_ascii_case("Content-Length") {
            content_length = value.trim().parse().ok();
        }
        if name.eq_ignore_ascii_case("Transfer-Encoding")
            && value.to_lowercase().contains("chunked")
        {
            chunked = true;
        }

        headers.push((name, value));
    }

    if chunked {
        return Some(Err(RequestError::bad_request(
            "Chunked transfer encoding not supported",
        )));
    }

    let body = if method == "POST" {
        let len = match content_length {
            Some(len) => len,
            None => return Some(Err(RequestError::bad_request("POST requires Content-Length"))),
        };
        if len > MAX_BODY_SIZE {
            return Some(Err(RequestError::too_large("Request body too large")));
        }
        let mut body = Vec::with_capacity(len);
        if let Err(e) = stream.take(len as u64).read_to_end(&mut body) {
            return Some(Err(RequestError::bad_request(format!("Read error: {}", e))));
        }
        if body.len() < len {
            return Some(Err(RequestError::bad_request("Connection closed mid-body")));
        }
        body
    } else {
        Vec::new()
    };

    Some(Ok(HttpRequest {
        method,
        path,
        headers,
        body,
    }))
}

/// Write an HTTP response to a stream.
pub fn write_response(stream: &mut impl Write, response: &HttpResponse) {
    let mut header_block = format!(
        "HTTP/1.1 {} {}\r\n",
        response.status,
        reason(response.status)
    );
    header_block.push_str(&format!("Content-Length: {}\r\n", response.body.len()));
    header_block.push_str("Connection: close\r\n");

    for (name, value) in &response.headers {
        header_block.push_str(&format!("{}: {}\r\n", name, value));
    }
    header_block.push_str("\r\n");

    // Client may have gone away; nothing useful to do with a write error
    let _ = stream.write_all(header_block.as_bytes());
    if !response.body.is_empty() {
        let _ = stream.write_all(&response.body);
    }
    let _ = stream.flush();
}
