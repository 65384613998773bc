use crate::{BufferReader, BufferWriter, Error, Packable, Result};

impl<T: Packable> Packable for Option<T> {
	const MIN_SIZE: usize = 1;

	#[inline]
	fn pack(&self, writer: &mut BufferWriter) -> Result<()> {
		match self {
			Some(value) => {
				writer.write_presence(true)?;
				value.pack(writer)
			}
			None => writer.write_presence(false),
		}
	}

	#[inline]
	fn unpack(reader: &mut BufferReader<'_>) -> Result<Self> {
		match reader.read_presence()? {
			true => T::unpack(reader).map(Some),
			false => Ok(None),
		}
	}
}

// Arrays are positional, with no length prefix
impl<T: Packable, const N: usize> Packable for [T; N] {
	const MIN_SIZE: usize = T::MIN_SIZE * N;

	#[inline]
	fn pack(&self, writer: &mut BufferWriter) -> Result<()> {
		T::pack_slice(self, writer)
	}

	fn unpack(reader: &mut BufferReader<'_>) -> Result<Self> {
		let remaining = reader.remaining();
		let values = T::unpack_vec(reader, N)?;
		// `unpack_vec` always returns exactly `N` values
		values
			.try_into()
			.map_err(|_| Error::LengthExceedsInput { len: N, remaining })
	}
}

macro_rules! impl_tuple {
	($($name:ident $index:tt),+) => {
		impl<$($name: Packable),+> Packable for ($($name,)+) {
			const MIN_SIZE: usize = 0 $(+ $name::MIN_SIZE)+;

			#[inline]
			fn pack(&self, writer: &mut BufferWriter) -> Result<()> {
				$(self.$index.pack(writer)?;)+
				Ok(())
			}

			#[inline]
			fn unpack(reader: &mut BufferReader<'_>) -> Result<Self> {
				Ok(($($name::unpack(reader)?,)+))
			}
		}
	};
}

impl_tuple!(A 0);
impl_tuple!(A 0, B 1);
impl_tuple!(A 0, B 1, C 2);
impl_tuple!(A 0, B 1, C 2, D 3);
impl_tuple!(A 0, B 1, C 2, D 3, E 4);
impl_tuple!(A 0, B 1, C 2, D 3, E 4, F 5);
impl_tuple!(A 0, B 1, C 2, D 3, E 4, F 5, G 6);
impl_tuple!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7);
impl_tuple!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8);
impl_tuple!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9);
impl_tuple!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9, K 10);
impl_tuple!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9, K 10, L 11);
