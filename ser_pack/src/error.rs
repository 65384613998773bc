use std::str::Utf8Error;

use thiserror::Error;

/// Result type returned by all fallible `ser_pack` operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from serializing or deserializing.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
	// Malformed input
	#[error("unexpected end of input: needed {needed} byte(s), {remaining} remaining")]
	OutOfData { needed: usize, remaining: usize },
	#[error("declared length {len} exceeds remaining input of {remaining} byte(s)")]
	LengthExceedsInput { len: usize, remaining: usize },
	#[error("unknown union tag {0}")]
	UnknownTag(u16),
	#[error("invalid union tag marker byte {0:#04x}")]
	InvalidTagMarker(u8),
	#[error("`{type_name}` expects {expected} member(s), input declares {found}")]
	MemberCount {
		type_name: &'static str,
		expected: u8,
		found: u8,
	},
	#[error("invalid bool byte {0:#04x}")]
	InvalidBool(u8),
	#[error("invalid char scalar value {0:#x}")]
	InvalidChar(u32),
	#[error("invalid presence marker {0:#04x}")]
	InvalidPresence(u8),
	#[error("invalid big integer sign byte {0:#04x}")]
	InvalidSign(u8),
	#[error("string is not valid UTF-8: {0}")]
	InvalidUtf8(#[from] Utf8Error),
	#[error("zero decoded for non-zero type `{type_name}`")]
	ZeroNonZero { type_name: &'static str },
	#[error("value does not fit in `{type_name}`")]
	IntegerOverflow { type_name: &'static str },
	#[error("`{type_name}` input repeats a key")]
	DuplicateKey { type_name: &'static str },
	#[error("nesting exceeds maximum depth of {max_depth}")]
	DepthLimitExceeded { max_depth: usize },

	// Resolution
	#[error("no formatter registered for `{type_name}`")]
	Unresolvable { type_name: &'static str },
	#[error("global formatter registry is already installed")]
	RegistryInstalled,

	// Unions
	#[error("union `{root}` declares tag {tag} more than once")]
	DuplicateUnionTag { root: &'static str, tag: u16 },
	#[error("union `{root}` declares variant `{variant}` more than once")]
	DuplicateUnionVariant {
		root: &'static str,
		variant: &'static str,
	},
	#[error("`{variant}` is not a registered variant of union `{root}`")]
	UnregisteredVariant {
		root: &'static str,
		variant: &'static str,
	},

	// Resources
	#[error("buffer cannot grow to {requested} byte(s), maximum capacity is {max_capacity}")]
	CapacityExhausted {
		requested: usize,
		max_capacity: usize,
	},
	#[error("length {0} does not fit in a 32-bit length prefix")]
	LengthOverflow(usize),
}

impl Error {
	/// `true` for errors caused by malformed or truncated input.
	pub fn is_malformed_input(&self) -> bool {
		matches!(
			self,
			Error::OutOfData { .. }
				| Error::LengthExceedsInput { .. }
				| Error::UnknownTag(_)
				| Error::InvalidTagMarker(_)
				| Error::MemberCount { .. }
				| Error::InvalidBool(_)
				| Error::InvalidChar(_)
				| Error::InvalidPresence(_)
				| Error::InvalidSign(_)
				| Error::InvalidUtf8(_)
				| Error::ZeroNonZero { .. }
				| Error::IntegerOverflow { .. }
				| Error::DuplicateKey { .. }
				| Error::DepthLimitExceeded { .. }
		)
	}
}
