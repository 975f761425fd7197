//! # msgid
//!
//! Compact, time-sortable 128-bit identifiers for services that need to mint
//! unique keys without coordinating on every call.
//!
//! A [`MsgId`] combines:
//!
//! - the creation time in milliseconds since the Unix epoch (64 bits)
//! - a caller-assigned *spawner id* identifying the producer (32 bits)
//! - a per-generator sequence counter (32 bits, of which 23 are used)
//!
//! ```text
//!  Byte:   0                 8                12                16
//!          +-----------------+-----------------+-----------------+
//!  Field:  | millis (i64 BE) | spawner id (32) | sequence (32)   |
//!          +-----------------+-----------------+-----------------+
//! ```
//!
//! Uniqueness across producers relies on operators handing out distinct
//! spawner ids. Within a single generator the sequence wraps after
//! [`MAX_SEQUENCE`] values, so two ids only collide if the counter wraps
//! inside the same millisecond.
//!
//! ## Example
//!
//! ```
//! use msgid::{LockMsgIdGenerator, MsgId};
//!
//! let generator = LockMsgIdGenerator::new(3);
//! let id = generator.next_id();
//! assert_eq!(id.spawner_id(), 3);
//! assert_eq!(id.sequence(), 1);
//!
//! let token = id.encode();
//! assert_eq!(token.len(), 24);
//! assert_eq!(MsgId::decode(&token).unwrap(), id);
//! ```
//!
//! ## Features
//!
//! - `parking-lot`: guard the counter with `parking_lot::Mutex`
//! - `cache-padded`: pad the shared counter to a cache line
//! - `tracing`: emit `tracing` spans and events during generation
//! - `serde`: `#[serde(with = ...)]` helpers for [`MsgId`]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod generator;
mod id;
mod mutex;
#[cfg(feature = "serde")]
mod serde;
mod time;

pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
#[cfg(feature = "serde")]
pub use crate::serde::*;
pub use crate::time::*;
