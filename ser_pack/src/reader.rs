use std::{mem, ptr};

use crate::{
	config::Config,
	fixed::{Fixed, Plain},
	writer::{MAX_SHORT_TAG, WIDE_TAG_MARKER},
	Error, Result,
};

/// Cursor over encoded input.
///
/// Every read checks the remaining input first, and fails with
/// [`Error::OutOfData`] rather than reading past the end.
/// Borrowed reads ([`read_span`], [`read_str`]) point into the input without
/// copying.
///
/// [`read_span`]: BufferReader::read_span
/// [`read_str`]: BufferReader::read_str
pub struct BufferReader<'de> {
	input: &'de [u8],
	pos: usize,
	depth: usize,
	max_depth: usize,
	zero_sized_budget: usize,
}

impl<'de> BufferReader<'de> {
	/// Create new `BufferReader` with default [`Config`].
	#[inline]
	pub fn new(input: &'de [u8]) -> Self {
		Self::with_config(input, &Config::default())
	}

	pub fn with_config(input: &'de [u8], config: &Config) -> Self {
		Self {
			input,
			pos: 0,
			depth: 0,
			max_depth: config.max_depth,
			zero_sized_budget: config.max_zero_sized_elements,
		}
	}

	/// Number of bytes consumed so far.
	#[inline]
	pub fn pos(&self) -> usize {
		self.pos
	}

	/// Total length of input.
	#[inline]
	pub fn end(&self) -> usize {
		self.input.len()
	}

	#[inline]
	pub fn remaining(&self) -> usize {
		self.input.len() - self.pos
	}

	/// `true` if all input has been consumed.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.remaining() == 0
	}

	/// Borrow the next `len` bytes of input.
	#[inline]
	pub fn read_span(&mut self, len: usize) -> Result<&'de [u8]> {
		let remaining = self.remaining();
		if len > remaining {
			return Err(Error::OutOfData {
				needed: len,
				remaining,
			});
		}
		let input: &'de [u8] = self.input;
		let span = &input[self.pos..self.pos + len];
		self.pos += len;
		Ok(span)
	}

	/// Fill `out` from input.
	#[inline]
	pub fn read_raw(&mut self, out: &mut [u8]) -> Result<()> {
		out.copy_from_slice(self.read_span(out.len())?);
		Ok(())
	}

	#[inline]
	pub fn read_byte(&mut self) -> Result<u8> {
		let remaining = self.remaining();
		match self.input.get(self.pos) {
			Some(&byte) => {
				self.pos += 1;
				Ok(byte)
			}
			None => {
				Err(Error::OutOfData {
					needed: 1,
					remaining,
				})
			}
		}
	}

	/// Read a fixed-width little-endian scalar.
	#[inline]
	pub fn read_fixed<T: Fixed>(&mut self) -> Result<T> {
		let mut bytes = T::Bytes::default();
		self.read_raw(bytes.as_mut())?;
		Ok(T::from_le(bytes))
	}

	/// Read `len` fixed-width scalars.
	///
	/// On little-endian targets this is a single copy.
	pub fn read_fixed_vec<T: Plain>(&mut self, len: usize) -> Result<Vec<T>> {
		let size = len.checked_mul(T::SIZE).ok_or(Error::LengthExceedsInput {
			len,
			remaining: self.remaining(),
		})?;
		let bytes = self.read_span(size)?;

		if cfg!(target_endian = "little") {
			let mut vec = Vec::<T>::with_capacity(len);
			// `Plain` guarantees any `size_of::<T>()` bytes are a valid `T`,
			// and `bytes` is exactly `len * size_of::<T>()` long
			unsafe {
				debug_assert_eq!(bytes.len(), len * mem::size_of::<T>());
				ptr::copy_nonoverlapping(bytes.as_ptr(), vec.as_mut_ptr().cast::<u8>(), size);
				vec.set_len(len);
			}
			Ok(vec)
		} else {
			Ok(
				bytes
					.chunks_exact(T::SIZE)
					.map(|chunk| {
						let mut value = T::Bytes::default();
						value.as_mut().copy_from_slice(chunk);
						T::from_le(value)
					})
					.collect(),
			)
		}
	}

	/// Read a length prefix.
	#[inline]
	pub fn read_var_length(&mut self) -> Result<usize> {
		let len = self.read_fixed::<u32>()?;
		usize::try_from(len).map_err(|_| Error::IntegerOverflow { type_name: "usize" })
	}

	/// Read a length prefix for a sequence of elements each occupying at least
	/// `min_element_size` bytes.
	///
	/// Fails if the input cannot possibly hold that many elements, so callers
	/// can allocate for `len` elements without trusting the input.
	///
	/// Zero-sized elements are instead drawn from a budget shared by the whole
	/// input, set by [`Config::max_zero_sized_elements`].
	pub fn read_length(&mut self, min_element_size: usize) -> Result<usize> {
		let len = self.read_var_length()?;
		let remaining = self.remaining();
		if min_element_size == 0 {
			if len > self.zero_sized_budget {
				return Err(Error::LengthExceedsInput { len, remaining });
			}
			self.zero_sized_budget -= len;
		} else if len.saturating_mul(min_element_size) > remaining {
			return Err(Error::LengthExceedsInput { len, remaining });
		}
		Ok(len)
	}

	/// Read a nullable presence marker.
	#[inline]
	pub fn read_presence(&mut self) -> Result<bool> {
		match self.read_byte()? {
			0 => Ok(false),
			1 => Ok(true),
			byte => Err(Error::InvalidPresence(byte)),
		}
	}

	/// Read an aggregate header, and check it matches the expected member count.
	#[inline]
	pub fn read_member_count(&mut self, expected: u8, type_name: &'static str) -> Result<()> {
		let found = self.read_byte()?;
		if found != expected {
			return Err(Error::MemberCount {
				type_name,
				expected,
				found,
			});
		}
		Ok(())
	}

	/// Read a union tag.
	pub fn read_tag(&mut self) -> Result<u16> {
		match self.read_byte()? {
			byte if byte as u16 <= MAX_SHORT_TAG => Ok(byte as u16),
			WIDE_TAG_MARKER => self.read_fixed::<u16>(),
			byte => Err(Error::InvalidTagMarker(byte)),
		}
	}

	/// Read a string, borrowed from the input.
	pub fn read_str(&mut self) -> Result<&'de str> {
		let len = self.read_length(1)?;
		let bytes = self.read_span(len)?;
		Ok(std::str::from_utf8(bytes)?)
	}

	/// Enter one level of nesting.
	#[inline]
	pub fn descend(&mut self) -> Result<()> {
		if self.depth >= self.max_depth {
			return Err(Error::DepthLimitExceeded {
				max_depth: self.max_depth,
			});
		}
		self.depth += 1;
		Ok(())
	}

	/// Leave one level of nesting.
	#[inline]
	pub fn ascend(&mut self) {
		debug_assert!(self.depth > 0);
		self.depth = self.depth.saturating_sub(1);
	}

	/// Run `f` one level of nesting deeper.
	#[inline]
	pub fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
		self.descend()?;
		let result = f(self);
		self.ascend();
		result
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn reads_check_remaining() {
		let mut reader = BufferReader::new(&[1, 2, 3]);
		assert_eq!(reader.read_fixed::<u16>(), Ok(0x0201));
		assert_eq!(
			reader.read_fixed::<u16>(),
			Err(Error::OutOfData {
				needed: 2,
				remaining: 1,
			})
		);
		assert_eq!(reader.pos(), 2);
		assert_eq!(reader.read_byte(), Ok(3));
		assert!(reader.is_empty());
		assert_eq!(reader.end(), 3);
	}

	#[test]
	fn length_checked_against_input() {
		// Declares 1000 `u32`s, provides 8 bytes
		let mut input = 1000u32.to_le_bytes().to_vec();
		input.extend_from_slice(&[0; 8]);

		let mut reader = BufferReader::new(&input);
		assert_eq!(
			reader.read_length(4),
			Err(Error::LengthExceedsInput {
				len: 1000,
				remaining: 8,
			})
		);

		let mut reader = BufferReader::new(&[2, 0, 0, 0, 1, 0, 2, 0]);
		let len = reader.read_length(2).unwrap();
		assert_eq!(reader.read_fixed_vec::<u16>(len), Ok(vec![1, 2]));
	}

	#[test]
	fn zero_sized_lengths_share_budget() {
		let input = [3, 0, 0, 0, 3, 0, 0, 0, 3, 0, 0, 0];
		let config = Config::default().max_zero_sized_elements(7);
		let mut reader = BufferReader::with_config(&input, &config);
		assert_eq!(reader.read_length(0), Ok(3));
		assert_eq!(reader.read_length(0), Ok(3));
		assert_eq!(
			reader.read_length(0),
			Err(Error::LengthExceedsInput {
				len: 3,
				remaining: 0,
			})
		);
	}

	#[test]
	fn tags() {
		let mut reader = BufferReader::new(&[7, 250, 0x34, 0x12, 251]);
		assert_eq!(reader.read_tag(), Ok(7));
		assert_eq!(reader.read_tag(), Ok(0x1234));
		assert_eq!(reader.read_tag(), Err(Error::InvalidTagMarker(251)));
	}

	#[test]
	fn markers() {
		let mut reader = BufferReader::new(&[0, 1, 2, 3, 3]);
		assert_eq!(reader.read_presence(), Ok(false));
		assert_eq!(reader.read_presence(), Ok(true));
		assert_eq!(reader.read_presence(), Err(Error::InvalidPresence(2)));
		assert_eq!(reader.read_member_count(3, "Foo"), Ok(()));
		assert_eq!(
			reader.read_member_count(2, "Foo"),
			Err(Error::MemberCount {
				type_name: "Foo",
				expected: 2,
				found: 3,
			})
		);
	}

	#[test]
	fn strings_are_borrowed() {
		let input = [3, 0, 0, 0, b'a', b'b', b'c', 1, 0, 0, 0, 0xff];
		let mut reader = BufferReader::new(&input);
		let s = reader.read_str().unwrap();
		assert_eq!(s, "abc");
		assert_eq!(s.as_ptr(), input[4..].as_ptr());
		assert!(matches!(reader.read_str(), Err(Error::InvalidUtf8(_))));
	}

	#[test]
	fn depth_limit() {
		let mut reader = BufferReader::with_config(&[], &Config::default().max_depth(2));
		let result = reader.nested(|reader| reader.nested(|reader| reader.nested(|_| Ok(()))));
		assert_eq!(result, Err(Error::DepthLimitExceeded { max_depth: 2 }));
		// Depth is restored on the way out
		assert_eq!(reader.nested(|_| Ok(1)), Ok(1));
	}
}
