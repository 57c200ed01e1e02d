//! Just enough HTTP/1.1 for one JSON request and one JSON response per
//! connection.

use std::io::{self, BufRead, Read, Write};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::rank::{top_words, Analysis, WordCount, TOP_N};

const MAX_HEADERS: usize = 100;
/// Longest request line or header line, terminator included.
pub const MAX_LINE_BYTES: usize = 8 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    pub path: String,
    pub body: Vec<u8>,
}

/// Read one line of the request head. `None` at end of stream.
fn read_head_line<R: BufRead>(reader: &mut R) -> Result<Option<String>> {
    let mut bytes = Vec::new();
    let read = reader
        .by_ref()
        .take(MAX_LINE_BYTES as u64)
        .read_until(b'\n', &mut bytes)?;
    if read == 0 {
        return Ok(None);
    }
    if !bytes.ends_with(b"\n") && read == MAX_LINE_BYTES {
        return Err(Error::HeaderTooLarge {
            limit: MAX_LINE_BYTES,
        });
    }

    String::from_utf8(bytes)
        .map(Some)
        .map_err(|_| Error::BadRequest("request head is not valid UTF-8".to_string()))
}

impl Request {
    /// Read the request line, the headers and a `Content-Length` body.
    pub fn read_from<R: BufRead>(reader: &mut R, max_body_bytes: usize) -> Result<Request> {
        let line = read_head_line(reader)?
            .ok_or_else(|| Error::BadRequest("empty request".to_string()))?;

        let mut parts = line.split_whitespace();
        let method = parts
            .next()
            .ok_or_else(|| Error::BadRequest("no method".to_string()))?
            .to_string();
        let path = parts
            .next()
            .ok_or_else(|| Error::BadRequest("no path".to_string()))?
            .to_string();
        parts
            .next()
            .ok_or_else(|| Error::BadRequest("no protocol".to_string()))?;

        let mut content_length = 0;
        let mut headers = 0;
        loop {
            let line = read_head_line(reader)?
                .ok_or_else(|| Error::BadRequest("headers not terminated".to_string()))?;
            let header = line.trim_end_matches(['\r', '\n']);
            if header.is_empty() {
                break;
            }

            headers += 1;
            if headers > MAX_HEADERS {
                return Err(Error::BadRequest("too many headers".to_string()));
            }

            let (name, value) = header
                .split_once(':')
                .ok_or_else(|| Error::BadRequest(format!("invalid header: {header}")))?;
            if name.trim().eq_ignore_ascii_case("content-length") {
                let value = value.trim();
                content_length = value
                    .parse::<usize>()
                    .map_err(|_| Error::BadRequest(format!("invalid Content-Length: {value}")))?;
            }
        }

        if content_length > max_body_bytes {
            return Err(Error::PayloadTooLarge {
                limit: max_body_bytes,
            });
        }

        let mut body = vec![0; content_length];
        reader.read_exact(&mut body)?;

        Ok(Request { method, path, body })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// JSON body of every response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub status: Status,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_counts: Option<Vec<WordCount>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn success(words: Vec<WordCount>) -> Self {
        Self::from_envelope(
            200,
            Envelope {
                status: Status::Success,
                message: format!("top {TOP_N} most used words"),
                word_counts: Some(words),
            },
        )
    }

    pub fn failure(err: &Error) -> Self {
        Self::from_envelope(
            err.status(),
            Envelope {
                status: Status::Error,
                message: err.to_string(),
                word_counts: None,
            },
        )
    }

    fn from_envelope(status: u16, envelope: Envelope) -> Self {
        match serde_json::to_string(&envelope) {
            Ok(body) => Response { status, body },
            Err(e) => {
                log::error!("Encoding response: {e}");
                Response {
                    status: 500,
                    body: r#"{"status":"error","message":"failed to encode response"}"#.to_string(),
                }
            }
        }
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write!(writer, "HTTP/1.1 {} {}\r\n", self.status, reason(self.status))?;
        write!(writer, "Content-Type: application/json\r\n")?;
        write!(writer, "Content-Length: {}\r\n", self.body.len())?;
        write!(writer, "Connection: close\r\n\r\n{}", self.body)?;
        writer.flush()
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        413 => "Payload Too Large",
        431 => "Request Header Fields Too Large",
        _ => "Internal Server Error",
    }
}

/// Answer one request. Every path is served the same way.
pub fn handle(request: &Request, analysis: &Analysis) -> Response {
    match most_used_words(request, analysis) {
        Ok(words) => Response::success(words),
        Err(e) => Response::failure(&e),
    }
}

fn most_used_words(request: &Request, analysis: &Analysis) -> Result<Vec<WordCount>> {
    if request.method != "POST" {
        return Err(Error::BadMethod(request.method.clone()));
    }
    let text: String = serde_json::from_slice(&request.body)?;
    top_words(&text, analysis)
}
