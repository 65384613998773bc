//! Compact binary serializer.
//!
//! Encode/decode logic for each type is derived ahead of time with
//! `#[derive(Packable)]`, and runs directly against a growable byte buffer.
//! There is no schema and no runtime type inspection.
//!
//! ```
//! use ser_pack::Packable;
//!
//! #[derive(Packable, Debug, PartialEq)]
//! struct Player {
//! 	name: String,
//! 	level: u16,
//! 	guild: Option<String>,
//! }
//!
//! let player = Player {
//! 	name: "Alex".to_string(),
//! 	level: 12,
//! 	guild: None,
//! };
//! let bytes = ser_pack::serialize(&player).unwrap();
//! // Header (3 members), name, level, guild
//! assert_eq!(bytes, [3, 4, 0, 0, 0, b'A', b'l', b'e', b'x', 12, 0, 0]);
//! assert_eq!(ser_pack::deserialize::<Player>(&bytes).unwrap(), player);
//! ```
//!
//! # Wire format
//!
//! * Scalars are fixed-width, little-endian. `usize` / `isize` are 64-bit.
//! * `Option<T>` is a presence byte (`0` / `1`) then the value if present.
//! * Strings and sequences are a `u32` length then contents.
//! * Arrays and tuples are their elements, with no prefix.
//! * Derived structs are a header byte holding the member count (at most
//!   249), then each member in declaration order (or `#[pack(order = N)]`).
//! * Unions (derived enums, [`union_root!`] traits) are a tag then the
//!   variant. Tags up to 249 take 1 byte, larger tags are `250` then `u16`.

#[cfg(feature = "derive")]
pub use ser_pack_derive::Packable;
pub use ser_pack_shape as shape;

mod config;
pub use config::{Config, DEFAULT_MAX_DEPTH, DEFAULT_MAX_ZERO_SIZED_ELEMENTS, MAX_CAPACITY};

mod error;
pub use error::{Error, Result};

mod fixed;
pub use fixed::{Fixed, Plain};

mod packable;
pub use packable::{Described, Packable, UnionRoot};

mod reader;
pub use reader::BufferReader;

mod writer;
pub use writer::BufferWriter;

mod registry;
pub use registry::{DecodeFn, EncodeFn, Formatter, FormatterRegistry};

mod union;
#[doc(hidden)]
pub use union::unknown_tag;
pub use union::{AsAny, UnionDispatch, UnionTable, UnionTableBuilder};

mod impls;
mod macros;

/// Serialize `value` into a new buffer.
pub fn serialize<T: Packable>(value: &T) -> Result<Vec<u8>> {
	let mut writer = BufferWriter::new();
	value.pack(&mut writer)?;
	Ok(writer.into_vec())
}

/// Serialize `value`, appending to `writer`.
#[inline]
pub fn serialize_into<T: Packable>(value: &T, writer: &mut BufferWriter) -> Result<()> {
	value.pack(writer)
}

/// Deserialize a `T` from the start of `input`.
pub fn deserialize<T: Packable>(input: &[u8]) -> Result<T> {
	T::unpack(&mut BufferReader::new(input))
}

/// Deserialize a `T` from `reader`, advancing it.
#[inline]
pub fn deserialize_from<T: Packable>(reader: &mut BufferReader<'_>) -> Result<T> {
	T::unpack(reader)
}
