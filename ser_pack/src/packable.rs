use crate::{BufferReader, BufferWriter, Result};

/// Types which can be encoded to and decoded from the wire format.
///
/// Usually derived with `#[derive(Packable)]`. Implemented for primitives,
/// strings, `Option`, tuples, arrays, standard collections, and smart pointers.
///
/// Only `pack` and `unpack` need to be implemented. The slice methods exist so
/// fixed-width scalars can override them with bulk copies.
pub trait Packable: Sized {
	/// Fewest bytes a value of this type can occupy on the wire.
	///
	/// Used to reject declared lengths the remaining input can't hold before
	/// allocating.
	const MIN_SIZE: usize = 0;

	fn pack(&self, writer: &mut BufferWriter) -> Result<()>;

	fn unpack(reader: &mut BufferReader<'_>) -> Result<Self>;

	/// Encode a slice of values, with no prefix.
	#[inline]
	fn pack_slice(values: &[Self], writer: &mut BufferWriter) -> Result<()> {
		for value in values {
			value.pack(writer)?;
		}
		Ok(())
	}

	/// Decode `len` values.
	#[inline]
	fn unpack_vec(reader: &mut BufferReader<'_>, len: usize) -> Result<Vec<Self>> {
		// Input was only checked against `MIN_SIZE`, so cap allocation
		// at one element per remaining byte
		let mut vec = Vec::with_capacity(len.min(reader.remaining()));
		for _ in 0..len {
			vec.push(Self::unpack(reader)?);
		}
		Ok(vec)
	}
}

/// Static shape of a derived aggregate.
pub trait Described {
	const NAME: &'static str;
	/// Serialized member names, in wire order.
	const MEMBERS: &'static [&'static str];
}

/// Enum encoded as a tagged union.
pub trait UnionRoot {
	/// `(tag, variant name)` for each variant, sorted by tag.
	const CASES: &'static [(u16, &'static str)];

	/// Tag of this value's variant.
	fn tag(&self) -> u16;
}
