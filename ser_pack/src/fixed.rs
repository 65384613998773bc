//! Fixed-width little-endian scalars.

mod sealed {
	pub trait Sealed {}
}

/// Types with a fixed-width little-endian wire representation.
///
/// Implemented for all integer and float primitives. Sealed.
pub trait Fixed: Copy + sealed::Sealed {
	/// Size on the wire, in bytes.
	const SIZE: usize;

	type Bytes: AsRef<[u8]> + AsMut<[u8]> + Default;

	fn to_le(self) -> Self::Bytes;

	fn from_le(bytes: Self::Bytes) -> Self;
}

/// [`Fixed`] types whose in-memory representation on a little-endian target is
/// exactly their wire representation.
///
/// Slices of these types are copied to and from buffers in one operation.
///
/// # Safety
///
/// Implementor must have no padding, no invalid bit patterns, and
/// `size_of::<Self>() == Self::SIZE`.
pub unsafe trait Plain: Fixed {}

macro_rules! impl_fixed {
	($ty:ty) => {
		impl sealed::Sealed for $ty {}

		impl Fixed for $ty {
			const SIZE: usize = std::mem::size_of::<$ty>();

			type Bytes = [u8; std::mem::size_of::<$ty>()];

			#[inline(always)]
			fn to_le(self) -> Self::Bytes {
				self.to_le_bytes()
			}

			#[inline(always)]
			fn from_le(bytes: Self::Bytes) -> Self {
				<$ty>::from_le_bytes(bytes)
			}
		}

		unsafe impl Plain for $ty {}
	};
}

impl_fixed!(u8);
impl_fixed!(u16);
impl_fixed!(u32);
impl_fixed!(u64);
impl_fixed!(u128);

impl_fixed!(i8);
impl_fixed!(i16);
impl_fixed!(i32);
impl_fixed!(i64);
impl_fixed!(i128);

impl_fixed!(f32);
impl_fixed!(f64);
