//! Request decoding.
//!
//! # Responsibilities
//! - Extract method and path from the request line
//! - Extract the form value from the last line of the body
//! - Tell the connection layer when a request has fully arrived
//!
//! # Design Decisions
//! - Deliberately narrow: this is not a general HTTP parser
//! - Never fails; anything unparsable decodes to empty strings and is
//!   rejected further down (404 or a survey re-prompt)
//! - Only `+` and `%2C` are decoded in form values, nothing else

use std::fmt;

/// Request method. Only GET and POST are routed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Other(String),
}

impl Method {
    fn parse(token: &str) -> Self {
        match token {
            "GET" => Method::Get,
            "POST" => Method::Post,
            other => Method::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Other(other) => other,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    /// Decoded value of the form field on the last line of the request.
    /// Empty when there is no body or no `=`.
    pub body_value: String,
}

/// Decode a raw request buffer.
pub fn decode_request(bytes: &[u8]) -> Request {
    let text = String::from_utf8_lossy(bytes);

    let request_line = text.split('\n').next().unwrap_or_default();
    let mut tokens = request_line.trim_end_matches('\r').split(' ');
    let method = Method::parse(tokens.next().unwrap_or_default());
    let path = tokens.next().unwrap_or_default().to_string();

    let last_line = text.split('\n').last().unwrap_or_default();
    let body_value = form_value(last_line.trim_end_matches('\r'));

    Request {
        method,
        path,
        body_value,
    }
}

/// Value of a `key=value` line: everything after the first `=`, decoded.
pub fn form_value(line: &str) -> String {
    let raw = line.split_once('=').map(|(_, value)| value).unwrap_or_default();
    decode_form_value(raw)
}

/// Undo the two encodings the survey forms produce: `+` and `%2C`.
pub fn decode_form_value(raw: &str) -> String {
    raw.replace('+', " ").replace("%2C", ",")
}

/// Offset just past the blank line ending the header block.
pub fn header_end(buf: &[u8]) -> Option<usize> {
    let crlf = find(buf, b"\r\n\r\n").map(|i| i + 4);
    let lf = find(buf, b"\n\n").map(|i| i + 2);
    match (crlf, lf) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

/// Declared `Content-Length` in a header block, if any.
pub fn content_length(head: &str) -> Option<usize> {
    head.lines().skip(1).find_map(|line| {
        let (name, value) = line.split_once(':')?;
        if name.trim().eq_ignore_ascii_case("content-length") {
            value.trim().parse().ok()
        } else {
            None
        }
    })
}

/// Whether `buf` holds a complete request: headers terminated and any
/// declared body bytes present.
pub fn is_complete(buf: &[u8]) -> bool {
    let Some(end) = header_end(buf) else {
        return false;
    };
    let head = String::from_utf8_lossy(&buf[..end]);
    let expected = content_length(&head).unwrap_or(0);
    buf.len() - end >= expected
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
