use std::{cmp, mem, slice};

use crate::{
	config::{Config, MAX_CAPACITY},
	fixed::{Fixed, Plain},
	Error, Result,
};

/// Minimum capacity a writer grows to on first write.
const MIN_CAPACITY: usize = 64;

/// Largest union tag encoded as a single byte.
pub(crate) const MAX_SHORT_TAG: u16 = 249;
/// Marker byte preceding a 2-byte union tag.
pub(crate) const WIDE_TAG_MARKER: u8 = 250;

/// Growable output buffer that encoded values are written to.
///
/// Bytes are only ever appended. The visible contents are always the
/// concatenation of every write, in call order.
///
/// Growth is in powers of 2, minimum 64 bytes, up to the configured maximum
/// capacity. Writes which would exceed it fail with
/// [`Error::CapacityExhausted`] and leave the buffer unchanged.
pub struct BufferWriter {
	buf: Vec<u8>,
	initial_capacity: usize,
	max_capacity: usize,
}

impl BufferWriter {
	/// Create new `BufferWriter` with default [`Config`].
	#[inline]
	pub fn new() -> Self {
		Self::with_config(&Config::default())
	}

	/// Create new `BufferWriter` with `config`.
	///
	/// Nothing is allocated until the first write.
	pub fn with_config(config: &Config) -> Self {
		let max_capacity = cmp::min(config.max_capacity, MAX_CAPACITY);
		Self {
			buf: Vec::new(),
			initial_capacity: cmp::min(config.initial_capacity, max_capacity),
			max_capacity,
		}
	}

	/// Reuse an existing allocation. `vec` is cleared first.
	pub fn from_vec(mut vec: Vec<u8>) -> Self {
		vec.clear();
		Self {
			buf: vec,
			initial_capacity: 0,
			max_capacity: MAX_CAPACITY,
		}
	}

	/// Number of bytes written so far.
	#[inline]
	pub fn pos(&self) -> usize {
		self.buf.len()
	}

	#[inline]
	pub fn capacity(&self) -> usize {
		self.buf.capacity()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.buf.is_empty()
	}

	#[inline]
	pub fn as_slice(&self) -> &[u8] {
		self.buf.as_slice()
	}

	#[inline]
	pub fn into_vec(self) -> Vec<u8> {
		self.buf
	}

	/// Discard contents, keeping the allocation.
	#[inline]
	pub fn clear(&mut self) {
		self.buf.clear();
	}

	/// Ensure capacity for at least `additional` more bytes.
	#[inline]
	pub fn reserve(&mut self, additional: usize) -> Result<()> {
		// Cannot wrap because capacity always exceeds len
		let remaining = self.buf.capacity().wrapping_sub(self.buf.len());
		if additional > remaining {
			self.grow_for_reserve(additional)?;
		}
		Ok(())
	}

	#[cold]
	fn grow_for_reserve(&mut self, additional: usize) -> Result<()> {
		let exhausted = |requested| {
			Error::CapacityExhausted {
				requested,
				max_capacity: self.max_capacity,
			}
		};

		let len = self.buf.len();
		let required = len
			.checked_add(additional)
			.ok_or_else(|| exhausted(usize::MAX))?;
		if required > self.max_capacity {
			return Err(exhausted(required));
		}

		let new_cap = match required.checked_next_power_of_two() {
			Some(new_cap) => cmp::max(new_cap, MIN_CAPACITY),
			None => self.max_capacity,
		};
		let new_cap = cmp::min(cmp::max(new_cap, self.initial_capacity), self.max_capacity);

		self
			.buf
			.try_reserve_exact(new_cap - len)
			.map_err(|_| exhausted(new_cap))
	}

	/// Append bytes verbatim.
	#[inline]
	pub fn write_raw(&mut self, bytes: &[u8]) -> Result<()> {
		self.reserve(bytes.len())?;
		self.buf.extend_from_slice(bytes);
		Ok(())
	}

	/// Append a fixed-width scalar, little-endian.
	#[inline]
	pub fn write_fixed<T: Fixed>(&mut self, value: T) -> Result<()> {
		self.write_raw(value.to_le().as_ref())
	}

	/// Append a slice of fixed-width scalars, little-endian, with no prefix.
	///
	/// On little-endian targets this is a single copy.
	pub fn write_fixed_slice<T: Plain>(&mut self, values: &[T]) -> Result<()> {
		if cfg!(target_endian = "little") {
			// `Plain` guarantees in-memory bytes are the wire bytes on little-endian
			let bytes =
				unsafe { slice::from_raw_parts(values.as_ptr().cast::<u8>(), mem::size_of_val(values)) };
			self.write_raw(bytes)
		} else {
			self.reserve(values.len() * T::SIZE)?;
			for value in values {
				self.buf.extend_from_slice(value.to_le().as_ref());
			}
			Ok(())
		}
	}

	/// Append a length prefix (`u32`, little-endian).
	#[inline]
	pub fn write_var_length(&mut self, len: usize) -> Result<()> {
		let len = u32::try_from(len).map_err(|_| Error::LengthOverflow(len))?;
		self.write_fixed(len)
	}

	/// Hand out the next `len` bytes for the caller to fill in.
	/// The bytes are zeroed, and count as written.
	pub fn reserve_span(&mut self, len: usize) -> Result<&mut [u8]> {
		self.reserve(len)?;
		let start = self.buf.len();
		self.buf.resize(start + len, 0);
		Ok(&mut self.buf[start..])
	}

	/// Append a nullable presence marker.
	#[inline]
	pub fn write_presence(&mut self, present: bool) -> Result<()> {
		self.write_raw(&[present as u8])
	}

	/// Append an aggregate header.
	#[inline]
	pub fn write_member_count(&mut self, count: u8) -> Result<()> {
		debug_assert!(count as usize <= ser_pack_shape::MAX_MEMBERS);
		self.write_raw(&[count])
	}

	/// Append a union tag.
	///
	/// Tags up to 249 take 1 byte. Larger tags are a marker byte followed by
	/// the tag as `u16`.
	pub fn write_tag(&mut self, tag: u16) -> Result<()> {
		if tag <= MAX_SHORT_TAG {
			self.write_raw(&[tag as u8])
		} else {
			let [low, high] = tag.to_le_bytes();
			self.write_raw(&[WIDE_TAG_MARKER, low, high])
		}
	}

	/// Append a string: length prefix, then UTF-8 bytes.
	pub fn write_str(&mut self, s: &str) -> Result<()> {
		self.write_var_length(s.len())?;
		self.write_raw(s.as_bytes())
	}
}

impl Default for BufferWriter {
	fn default() -> Self {
		Self::new()
	}
}
