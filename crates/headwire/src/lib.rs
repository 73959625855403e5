//! Zero-copy HTTP/1.x message-head parser.
//!
//! headwire parses request and response heads (request line / status line
//! plus the header block, up to the blank terminating line) straight out of
//! a caller-owned byte buffer. Every output (path, reason phrase, header
//! names and values) is a borrowed slice into that buffer.
//!
//! # Features
//!
//! - Zero-copy, zero-allocation parsing into caller-provided header storage
//! - Restartable: `Incomplete` is a terminal, re-enterable outcome; append
//!   bytes and call again from offset zero
//! - Packed-word method and version dispatch
//! - Three-tier byte-class scanning (SSE2 lane, word SWAR, scalar table)
//!
//! # Example
//!
//! ```ignore
//! use headwire::{Header, ParseStatus, RequestHead};
//!
//! let buf = b"GET /path HTTP/1.1\r\nHost: example.com\r\n\r\n";
//! let mut headers = [Header::EMPTY; 32];
//! let mut head = RequestHead::new(&mut headers);
//! let status = head.parse(buf)?;
//! ```
//!
//! Bodies, percent-decoding, header folding and connection management are
//! out of scope; the parser stops at the head/body boundary and reports it.

#![deny(unsafe_code)]
// Pedantic clippy lints allowed (style suggestions, not correctness issues)
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::single_match_else)]
#![allow(clippy::trivially_copy_pass_by_ref)]
#![allow(clippy::len_without_is_empty)]

mod class;
mod cursor;
mod parser;
mod scan;

pub use headwire_types::{Method, Version};
pub use parser::{parse_headers, Header, ParseError, ParseStatus, RequestHead, ResponseHead};
