use std::{marker::PhantomData, mem, num};

use crate::{BufferReader, BufferWriter, Error, Packable, Result};

// Fixed-width scalars. Slices are copied in bulk.
macro_rules! impl_primitive {
	($ty:ty) => {
		impl Packable for $ty {
			const MIN_SIZE: usize = mem::size_of::<$ty>();

			#[inline(always)]
			fn pack(&self, writer: &mut BufferWriter) -> Result<()> {
				writer.write_fixed(*self)
			}

			#[inline(always)]
			fn unpack(reader: &mut BufferReader<'_>) -> Result<Self> {
				reader.read_fixed()
			}

			#[inline]
			fn pack_slice(values: &[Self], writer: &mut BufferWriter) -> Result<()> {
				writer.write_fixed_slice(values)
			}

			#[inline]
			fn unpack_vec(reader: &mut BufferReader<'_>, len: usize) -> Result<Vec<Self>> {
				reader.read_fixed_vec(len)
			}
		}
	};
}

impl_primitive!(u8);
impl_primitive!(u16);
impl_primitive!(u32);
impl_primitive!(u64);
impl_primitive!(u128);

impl_primitive!(i8);
impl_primitive!(i16);
impl_primitive!(i32);
impl_primitive!(i64);
impl_primitive!(i128);

impl_primitive!(f32);
impl_primitive!(f64);

// `usize` and `isize` are always 64 bits on the wire
macro_rules! impl_pointer_sized {
	($ty:ty, $wire:ty) => {
		impl Packable for $ty {
			const MIN_SIZE: usize = mem::size_of::<$wire>();

			#[inline]
			fn pack(&self, writer: &mut BufferWriter) -> Result<()> {
				writer.write_fixed(*self as $wire)
			}

			#[inline]
			fn unpack(reader: &mut BufferReader<'_>) -> Result<Self> {
				let value = reader.read_fixed::<$wire>()?;
				<$ty>::try_from(value).map_err(|_| {
					Error::IntegerOverflow {
						type_name: stringify!($ty),
					}
				})
			}
		}
	};
}

impl_pointer_sized!(usize, u64);
impl_pointer_sized!(isize, i64);

macro_rules! impl_non_zero {
	($ty:ident, $inner:ty) => {
		impl Packable for num::$ty {
			const MIN_SIZE: usize = <$inner as Packable>::MIN_SIZE;

			#[inline]
			fn pack(&self, writer: &mut BufferWriter) -> Result<()> {
				self.get().pack(writer)
			}

			#[inline]
			fn unpack(reader: &mut BufferReader<'_>) -> Result<Self> {
				num::$ty::new(<$inner>::unpack(reader)?).ok_or(Error::ZeroNonZero {
					type_name: stringify!($ty),
				})
			}
		}
	};
}

impl_non_zero!(NonZeroU8, u8);
impl_non_zero!(NonZeroU16, u16);
impl_non_zero!(NonZeroU32, u32);
impl_non_zero!(NonZeroU64, u64);
impl_non_zero!(NonZeroU128, u128);
impl_non_zero!(NonZeroUsize, usize);

impl_non_zero!(NonZeroI8, i8);
impl_non_zero!(NonZeroI16, i16);
impl_non_zero!(NonZeroI32, i32);
impl_non_zero!(NonZeroI64, i64);
impl_non_zero!(NonZeroI128, i128);
impl_non_zero!(NonZeroIsize, isize);

impl Packable for bool {
	const MIN_SIZE: usize = 1;

	#[inline]
	fn pack(&self, writer: &mut BufferWriter) -> Result<()> {
		writer.write_raw(&[*self as u8])
	}

	#[inline]
	fn unpack(reader: &mut BufferReader<'_>) -> Result<Self> {
		match reader.read_byte()? {
			0 => Ok(false),
			1 => Ok(true),
			byte => Err(Error::InvalidBool(byte)),
		}
	}
}

impl Packable for char {
	const MIN_SIZE: usize = 4;

	#[inline]
	fn pack(&self, writer: &mut BufferWriter) -> Result<()> {
		writer.write_fixed(*self as u32)
	}

	#[inline]
	fn unpack(reader: &mut BufferReader<'_>) -> Result<Self> {
		let value = reader.read_fixed::<u32>()?;
		char::from_u32(value).ok_or(Error::InvalidChar(value))
	}
}

impl Packable for () {
	#[inline(always)]
	fn pack(&self, _writer: &mut BufferWriter) -> Result<()> {
		Ok(())
	}

	#[inline(always)]
	fn unpack(_reader: &mut BufferReader<'_>) -> Result<Self> {
		Ok(())
	}
}

impl<T: ?Sized> Packable for PhantomData<T> {
	#[inline(always)]
	fn pack(&self, _writer: &mut BufferWriter) -> Result<()> {
		Ok(())
	}

	#[inline(always)]
	fn unpack(_reader: &mut BufferReader<'_>) -> Result<Self> {
		Ok(PhantomData)
	}
}
