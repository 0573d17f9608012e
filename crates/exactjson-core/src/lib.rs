//! # exactjson-core
//!
//! A JSON codec that reproduces the encode/decode conventions of a
//! widely-used application-framework JSON library, not just the bare
//! grammar: insertion-ordered object keys, arbitrary-precision integers,
//! ISO-8601 datetime values, forward-slash escaping, and exact round-trip
//! fidelity across the decode→encode→decode cycle.
//!
//! Both directions are pure functions: no I/O, no global state, nothing
//! shared between calls. The enclosing program buffers a complete text blob,
//! calls [`decode`], and hands the resulting [`Value`] tree to [`encode`].
//!
//! ## Quick start
//!
//! ```rust
//! use exactjson_core::{decode, encode};
//!
//! // Every digit of a 20-digit integer survives the round trip.
//! let value = decode(r#"{"id": 12345678901234567890, "name": "Ada"}"#).unwrap();
//! let json = encode(&value).unwrap();
//! assert_eq!(json, r#"{"id":12345678901234567890,"name":"Ada"}"#);
//! ```
//!
//! Encoding is configurable where the reference library is:
//!
//! ```rust
//! use exactjson_core::{decode, encode_with, EncodeOptions};
//!
//! let value = decode(r#"{"note":"café"}"#).unwrap();
//! let options = EncodeOptions { ascii_only: true, ..Default::default() };
//! assert_eq!(encode_with(&value, &options).unwrap(), "{\"note\":\"caf\\u00e9\"}");
//! ```
//!
//! ## Modules
//!
//! - [`decoder`] — JSON text → [`Value`] tree
//! - [`encoder`] — [`Value`] tree → JSON text
//! - [`types`] — the `Value` tagged union and ordered [`Object`]
//! - [`error`] — offset-carrying parse errors, path-carrying encode errors

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod types;

pub use decoder::{decode, decode_bytes, decode_with, DecodeOptions};
pub use encoder::{encode, encode_with, EncodeOptions, NonFinitePolicy};
pub use error::{DecodeResult, EncodeError, EncodeResult, ParseError};
pub use types::{ArrayRef, Object, ObjectRef, Value};
