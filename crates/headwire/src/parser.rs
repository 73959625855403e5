//! HTTP/1.x message-head parsing.
//!
//! This module provides zero-copy parsing of request and response heads: the
//! request line or status line plus the header block, up to and including the
//! blank terminating line.
//!
//! # Zero-Copy Design
//!
//! All outputs borrow from the caller's buffer: the path, the reason phrase
//! and every header name/value are subslices of the input. The parser never
//! allocates and never writes to the buffer.
//!
//! # Restartability
//!
//! [`ParseStatus::Incomplete`] means every byte inspected so far is
//! consistent with a valid head and more bytes are needed. The caller keeps
//! the same prefix in place, appends newly received bytes, and calls `parse`
//! again from offset zero; identical inputs give identical results.
//!
//! # Example
//!
//! ```ignore
//! use headwire::{Header, ParseStatus, RequestHead};
//!
//! let buf = b"GET /items/42 HTTP/1.1\r\nHost: example.com\r\n\r\n";
//! let mut headers = [Header::EMPTY; 16];
//! let mut head = RequestHead::new(&mut headers);
//!
//! match head.parse(buf)? {
//!     ParseStatus::Complete(n) => {
//!         // body starts at buf[n..]
//!     }
//!     ParseStatus::Incomplete => {
//!         // read more bytes and call parse again
//!     }
//! }
//! ```

use headwire_types::{Method, Version};

use crate::class::Class;
use crate::cursor::Cursor;
use crate::scan::scan;

/// Shortest legal request head: `GET / HTTP/1.1\n`.
const MIN_REQUEST_HEAD: usize = 15;
/// Shortest legal response head: `HTTP/1.1 200\n`.
const MIN_RESPONSE_HEAD: usize = 13;

// ============================================================================
// Outcomes
// ============================================================================

/// Result of a parse attempt that did not hit a malformed byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStatus {
    /// The head is fully parsed; the payload carries the number of bytes
    /// consumed (request/status line, headers, blank terminator). The body
    /// starts at that offset.
    Complete(usize),
    /// More bytes are required to reach a decision. Append to the buffer
    /// and call again.
    Incomplete,
}

impl ParseStatus {
    /// Returns true for [`ParseStatus::Complete`].
    #[inline]
    #[must_use]
    pub const fn is_complete(self) -> bool {
        matches!(self, Self::Complete(_))
    }
}

/// Head parsing error.
///
/// A byte was observed that no valid message could contain at that position,
/// or the header array was too small for the message. Nothing is recovered
/// internally; on error the output fields are left at their last-written
/// state and must be treated as unspecified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Unrecognized request method token.
    InvalidMethod,
    /// Disallowed byte in the request path.
    InvalidPath,
    /// Protocol version other than HTTP/1.0 or HTTP/1.1, or a malformed
    /// version field.
    InvalidVersion,
    /// Status code is not three ASCII digits.
    InvalidStatus,
    /// Disallowed byte in the reason phrase.
    InvalidReason,
    /// Empty header name, or a disallowed byte before the `:` delimiter.
    InvalidHeaderName,
    /// Disallowed byte in a header value.
    InvalidHeaderValue,
    /// A line ended with a stray byte where LF or CR LF was required.
    InvalidLineEnding,
    /// The message carries more headers than the provided array holds.
    /// Retrying with a larger array may succeed.
    TooManyHeaders,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidMethod => write!(f, "invalid HTTP method"),
            Self::InvalidPath => write!(f, "invalid request path"),
            Self::InvalidVersion => write!(f, "invalid HTTP version"),
            Self::InvalidStatus => write!(f, "invalid status code"),
            Self::InvalidReason => write!(f, "invalid reason phrase"),
            Self::InvalidHeaderName => write!(f, "invalid header name"),
            Self::InvalidHeaderValue => write!(f, "invalid header value"),
            Self::InvalidLineEnding => write!(f, "invalid line ending"),
            Self::TooManyHeaders => write!(f, "too many headers"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Internal terminal condition: either the buffer ran out mid-head or a
/// malformed byte was hit. Mapped to the public outcome at the API boundary.
enum Halt {
    NeedMore,
    Bad(ParseError),
}

impl From<ParseError> for Halt {
    fn from(err: ParseError) -> Self {
        Self::Bad(err)
    }
}

type Step<T> = Result<T, Halt>;

// ============================================================================
// Header slot
// ============================================================================

/// A single parsed header: borrowed (name, value) slices into the buffer.
///
/// Names are never empty on emission; values may be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header<'b> {
    name: &'b [u8],
    value: &'b [u8],
}

impl<'b> Header<'b> {
    /// Empty slot for initializing a header array:
    /// `let mut headers = [Header::EMPTY; 32];`
    pub const EMPTY: Header<'static> = Header {
        name: &[],
        value: &[],
    };

    /// Header name as raw bytes (case preserved from the wire).
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'b [u8] {
        self.name
    }

    /// Header value as raw bytes, leading spaces already skipped.
    #[inline]
    #[must_use]
    pub fn value(&self) -> &'b [u8] {
        self.value
    }

    /// Header name as a string, if valid UTF-8.
    #[must_use]
    pub fn name_str(&self) -> Option<&'b str> {
        std::str::from_utf8(self.name).ok()
    }

    /// Header value as a string, if valid UTF-8.
    #[must_use]
    pub fn value_str(&self) -> Option<&'b str> {
        std::str::from_utf8(self.value).ok()
    }

    /// Returns true if the name matches, ASCII case-insensitively.
    #[must_use]
    pub fn name_eq_ignore_case(&self, other: &str) -> bool {
        self.name.eq_ignore_ascii_case(other.as_bytes())
    }
}

// ============================================================================
// Recognizers
// ============================================================================

const WORD_GET: u32 = u32::from_le_bytes(*b"GET ");
const WORD_PUT: u32 = u32::from_le_bytes(*b"PUT ");
const WORD_POST: u32 = u32::from_le_bytes(*b"POST");
const WORD_HEAD: u32 = u32::from_le_bytes(*b"HEAD");
const WORD_DELE: u32 = u32::from_le_bytes(*b"DELE");
const WORD_CONN: u32 = u32::from_le_bytes(*b"CONN");
const WORD_OPTI: u32 = u32::from_le_bytes(*b"OPTI");
const WORD_TRAC: u32 = u32::from_le_bytes(*b"TRAC");
const WORD_PATC: u32 = u32::from_le_bytes(*b"PATC");

const WORD_HTTP10: u64 = u64::from_le_bytes(*b"HTTP/1.0");
const WORD_HTTP11: u64 = u64::from_le_bytes(*b"HTTP/1.1");

/// Dispatch the method on the first four bytes packed as a word, then
/// consume the literal tail the match still owes (the space separator is
/// part of the tail, or of the word itself for `GET `/`PUT `).
fn parse_method(cur: &mut Cursor<'_>) -> Step<Method> {
    if !cur.has(4) {
        return Err(Halt::NeedMore);
    }
    let word = cur.load_u32();
    cur.advance(4);
    let method = match word {
        WORD_GET => Method::Get,
        WORD_PUT => Method::Put,
        WORD_POST => {
            expect_tail(cur, b" ")?;
            Method::Post
        }
        WORD_HEAD => {
            expect_tail(cur, b" ")?;
            Method::Head
        }
        WORD_DELE => {
            expect_tail(cur, b"TE ")?;
            Method::Delete
        }
        WORD_CONN => {
            expect_tail(cur, b"ECT ")?;
            Method::Connect
        }
        WORD_OPTI => {
            expect_tail(cur, b"ONS ")?;
            Method::Options
        }
        WORD_TRAC => {
            expect_tail(cur, b"E ")?;
            Method::Trace
        }
        WORD_PATC => {
            expect_tail(cur, b"H ")?;
            Method::Patch
        }
        _ => return Err(ParseError::InvalidMethod.into()),
    };
    Ok(method)
}

/// Consume an exact literal. A wrong byte is malformed; running out of
/// buffer while still matching is a consistent prefix.
fn expect_tail(cur: &mut Cursor<'_>, tail: &[u8]) -> Step<()> {
    for &expected in tail {
        match cur.next_byte() {
            None => return Err(Halt::NeedMore),
            Some(byte) if byte == expected => cur.advance(1),
            Some(_) => return Err(ParseError::InvalidMethod.into()),
        }
    }
    Ok(())
}

fn parse_path<'b>(cur: &mut Cursor<'b>) -> Step<&'b [u8]> {
    let start = cur.pos();
    scan(cur, Class::Path);
    match cur.next_byte() {
        Some(b' ') => {
            let path = cur.slice(start, cur.pos());
            cur.advance(1);
            Ok(path)
        }
        None => Err(Halt::NeedMore),
        Some(_) => Err(ParseError::InvalidPath.into()),
    }
}

/// Eight version bytes followed by a line end (request form). Requires nine
/// bytes so the terminator state machine always sees at least one byte.
fn parse_request_version(cur: &mut Cursor<'_>) -> Step<Version> {
    if !cur.has(9) {
        return Err(Halt::NeedMore);
    }
    let version = match_version(cur)?;
    eol(cur)?;
    Ok(version)
}

/// Eight version bytes followed by a single SP (status-line form).
fn parse_response_version(cur: &mut Cursor<'_>) -> Step<Version> {
    if !cur.has(9) {
        return Err(Halt::NeedMore);
    }
    let version = match_version(cur)?;
    match cur.next_byte() {
        Some(b' ') => {
            cur.advance(1);
            Ok(version)
        }
        _ => Err(ParseError::InvalidVersion.into()),
    }
}

fn match_version(cur: &mut Cursor<'_>) -> Step<Version> {
    let version = match cur.load_u64() {
        WORD_HTTP11 => Version::Http11,
        WORD_HTTP10 => Version::Http10,
        _ => return Err(ParseError::InvalidVersion.into()),
    };
    cur.advance(8);
    Ok(version)
}

/// Line-end state machine: bare LF, or CR LF with the CR possibly sitting at
/// the end of the buffer (Incomplete until the LF arrives).
fn eol(cur: &mut Cursor<'_>) -> Step<()> {
    match cur.next_byte() {
        Some(b'\n') => {
            cur.advance(1);
            Ok(())
        }
        Some(b'\r') => {
            cur.advance(1);
            match cur.next_byte() {
                Some(b'\n') => {
                    cur.advance(1);
                    Ok(())
                }
                None => Err(Halt::NeedMore),
                Some(_) => Err(ParseError::InvalidLineEnding.into()),
            }
        }
        None => Err(Halt::NeedMore),
        Some(_) => Err(ParseError::InvalidLineEnding.into()),
    }
}

/// Three ASCII digits folded into a `u16` in [0, 999].
fn parse_status(cur: &mut Cursor<'_>) -> Step<u16> {
    if !cur.has(3) {
        return Err(Halt::NeedMore);
    }
    let digits = cur.slice(cur.pos(), cur.pos() + 3);
    let mut code: u16 = 0;
    for &byte in digits {
        if !byte.is_ascii_digit() {
            return Err(ParseError::InvalidStatus.into());
        }
        code = code * 10 + u16::from(byte - b'0');
    }
    cur.advance(3);
    Ok(code)
}

/// Reason phrase, or `None` when the status line ends right after the code.
fn parse_reason<'b>(cur: &mut Cursor<'b>) -> Step<Option<&'b [u8]>> {
    match cur.next_byte() {
        Some(b' ') => {
            while cur.next_byte() == Some(b' ') {
                cur.advance(1);
            }
            let start = cur.pos();
            scan(cur, Class::Reason);
            let end = cur.pos();
            match cur.next_byte() {
                Some(b'\r' | b'\n') => {
                    eol(cur)?;
                    Ok(Some(cur.slice(start, end)))
                }
                None => Err(Halt::NeedMore),
                Some(_) => Err(ParseError::InvalidReason.into()),
            }
        }
        Some(b'\r' | b'\n') => {
            eol(cur)?;
            Ok(None)
        }
        None => Err(Halt::NeedMore),
        Some(_) => Err(ParseError::InvalidReason.into()),
    }
}

// ============================================================================
// Header block
// ============================================================================

fn parse_field<'b>(cur: &mut Cursor<'b>) -> Step<Header<'b>> {
    let name_start = cur.pos();
    scan(cur, Class::FieldName);
    let name_end = cur.pos();
    match cur.next_byte() {
        Some(b':') => {
            if name_end == name_start {
                return Err(ParseError::InvalidHeaderName.into());
            }
            cur.advance(1);
        }
        None => return Err(Halt::NeedMore),
        Some(_) => return Err(ParseError::InvalidHeaderName.into()),
    }

    // Leading SP between the colon and the value is not part of the value.
    while cur.next_byte() == Some(b' ') {
        cur.advance(1);
    }

    let value_start = cur.pos();
    scan(cur, Class::FieldValue);
    let value_end = cur.pos();
    match cur.next_byte() {
        Some(b'\r' | b'\n') => eol(cur)?,
        None => return Err(Halt::NeedMore),
        Some(_) => return Err(ParseError::InvalidHeaderValue.into()),
    }

    Ok(Header {
        name: cur.slice(name_start, name_end),
        value: cur.slice(value_start, value_end),
    })
}

/// Parse header lines until the blank terminating line, filling `headers`
/// from the front. Once capacity is spent the only acceptable continuation
/// is the blank line; anything else is `TooManyHeaders`.
fn parse_block<'b>(cur: &mut Cursor<'b>, headers: &mut [Header<'b>]) -> Step<usize> {
    let mut count = 0;
    while count < headers.len() {
        match cur.next_byte() {
            Some(b'\r' | b'\n') => {
                eol(cur)?;
                return Ok(count);
            }
            None => return Err(Halt::NeedMore),
            Some(_) => {}
        }
        headers[count] = parse_field(cur)?;
        count += 1;
    }
    match cur.next_byte() {
        Some(b'\r' | b'\n') => {
            eol(cur)?;
            Ok(count)
        }
        None => Err(Halt::NeedMore),
        Some(_) => Err(ParseError::TooManyHeaders.into()),
    }
}

// ============================================================================
// Request head
// ============================================================================

/// A parsed (or in-progress) request head.
///
/// The caller owns the header storage; the parser fills a prefix of it and
/// [`headers`](Self::headers) exposes exactly the emitted entries. On
/// [`ParseStatus::Incomplete`] or an error the public fields hold whatever
/// was written before the stop: useful when debugging, unspecified
/// otherwise.
#[derive(Debug)]
pub struct RequestHead<'b, 'h> {
    /// Request method, set on success.
    pub method: Option<Method>,
    /// Request path slice, set on success. May be empty.
    pub path: Option<&'b [u8]>,
    /// Protocol version, set on success.
    pub version: Option<Version>,
    headers: &'h mut [Header<'b>],
    header_count: usize,
}

impl<'b, 'h> RequestHead<'b, 'h> {
    /// Create a head whose parsed headers will be stored in `headers`.
    pub fn new(headers: &'h mut [Header<'b>]) -> Self {
        Self {
            method: None,
            path: None,
            version: None,
            headers,
            header_count: 0,
        }
    }

    /// Parse a request head from the start of `buf`.
    ///
    /// Buffers shorter than the shortest legal request head (15 bytes)
    /// return `Incomplete` without inspection. To resume after
    /// `Incomplete`, append bytes to the same prefix and call again.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when a byte no valid request could contain
    /// at that position is found, or when `headers` is too small.
    pub fn parse(&mut self, buf: &'b [u8]) -> Result<ParseStatus, ParseError> {
        self.method = None;
        self.path = None;
        self.version = None;
        self.header_count = 0;
        if buf.len() < MIN_REQUEST_HEAD {
            return Ok(ParseStatus::Incomplete);
        }
        let mut cur = Cursor::new(buf);
        match self.drive(&mut cur) {
            Ok(()) => Ok(ParseStatus::Complete(cur.pos())),
            Err(Halt::NeedMore) => Ok(ParseStatus::Incomplete),
            Err(Halt::Bad(err)) => Err(err),
        }
    }

    fn drive(&mut self, cur: &mut Cursor<'b>) -> Step<()> {
        self.method = Some(parse_method(cur)?);
        self.path = Some(parse_path(cur)?);
        self.version = Some(parse_request_version(cur)?);
        self.header_count = parse_block(cur, self.headers)?;
        Ok(())
    }

    /// The headers emitted by the last successful parse, in wire order.
    #[must_use]
    pub fn headers(&self) -> &[Header<'b>] {
        &self.headers[..self.header_count]
    }
}

// ============================================================================
// Response head
// ============================================================================

/// A parsed (or in-progress) response head.
#[derive(Debug)]
pub struct ResponseHead<'b, 'h> {
    /// Protocol version, set on success.
    pub version: Option<Version>,
    /// Status code in [0, 999], set on success.
    pub status: Option<u16>,
    /// Reason phrase. `None` when the status line ends right after the
    /// code; `Some` (possibly empty) when a space followed the code.
    pub reason: Option<&'b [u8]>,
    headers: &'h mut [Header<'b>],
    header_count: usize,
}

impl<'b, 'h> ResponseHead<'b, 'h> {
    /// Create a head whose parsed headers will be stored in `headers`.
    pub fn new(headers: &'h mut [Header<'b>]) -> Self {
        Self {
            version: None,
            status: None,
            reason: None,
            headers,
            header_count: 0,
        }
    }

    /// Parse a response head from the start of `buf`.
    ///
    /// Buffers shorter than the shortest legal status line (13 bytes)
    /// return `Incomplete` without inspection.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when a byte no valid response could contain
    /// at that position is found, or when `headers` is too small.
    pub fn parse(&mut self, buf: &'b [u8]) -> Result<ParseStatus, ParseError> {
        self.version = None;
        self.status = None;
        self.reason = None;
        self.header_count = 0;
        if buf.len() < MIN_RESPONSE_HEAD {
            return Ok(ParseStatus::Incomplete);
        }
        let mut cur = Cursor::new(buf);
        match self.drive(&mut cur) {
            Ok(()) => Ok(ParseStatus::Complete(cur.pos())),
            Err(Halt::NeedMore) => Ok(ParseStatus::Incomplete),
            Err(Halt::Bad(err)) => Err(err),
        }
    }

    fn drive(&mut self, cur: &mut Cursor<'b>) -> Step<()> {
        self.version = Some(parse_response_version(cur)?);
        self.status = Some(parse_status(cur)?);
        self.reason = parse_reason(cur)?;
        self.header_count = parse_block(cur, self.headers)?;
        Ok(())
    }

    /// The headers emitted by the last successful parse, in wire order.
    #[must_use]
    pub fn headers(&self) -> &[Header<'b>] {
        &self.headers[..self.header_count]
    }
}

// ============================================================================
// Standalone header block
// ============================================================================

/// Parse a standalone header block terminated by a blank line.
///
/// `buf` starts at the first header line. On `Complete` the returned slice
/// is the emitted prefix of `headers` and the consumed count includes the
/// blank terminator.
///
/// # Errors
///
/// Same contract as the head parsers: malformed bytes and capacity
/// overflow are errors, a consistent prefix is `Incomplete`.
pub fn parse_headers<'b, 'h>(
    buf: &'b [u8],
    headers: &'h mut [Header<'b>],
) -> Result<(ParseStatus, &'h [Header<'b>]), ParseError> {
    let mut cur = Cursor::new(buf);
    match parse_block(&mut cur, headers) {
        Ok(count) => {
            let all: &'h [Header<'b>] = headers;
            Ok((ParseStatus::Complete(cur.pos()), &all[..count]))
        }
        Err(Halt::NeedMore) => Ok((ParseStatus::Incomplete, &[])),
        Err(Halt::Bad(err)) => Err(err),
    }
}
