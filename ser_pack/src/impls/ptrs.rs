use std::{rc::Rc, sync::Arc};

use crate::{BufferReader, BufferWriter, Packable, Result};

// Smart pointers are transparent: the pointee is encoded in place
macro_rules! impl_transparent {
	($ptr:ident) => {
		impl<T: Packable> Packable for $ptr<T> {
			const MIN_SIZE: usize = T::MIN_SIZE;

			#[inline]
			fn pack(&self, writer: &mut BufferWriter) -> Result<()> {
				(**self).pack(writer)
			}

			#[inline]
			fn unpack(reader: &mut BufferReader<'_>) -> Result<Self> {
				T::unpack(reader).map($ptr::new)
			}
		}
	};
}

impl_transparent!(Box);
impl_transparent!(Rc);
impl_transparent!(Arc);

impl<T: Packable> Packable for Vec<T> {
	const MIN_SIZE: usize = 4;

	fn pack(&self, writer: &mut BufferWriter) -> Result<()> {
		writer.write_var_length(self.len())?;
		T::pack_slice(self, writer)
	}

	fn unpack(reader: &mut BufferReader<'_>) -> Result<Self> {
		let len = reader.read_length(T::MIN_SIZE)?;
		T::unpack_vec(reader, len)
	}
}

impl<T: Packable> Packable for Box<[T]> {
	const MIN_SIZE: usize = 4;

	fn pack(&self, writer: &mut BufferWriter) -> Result<()> {
		writer.write_var_length(self.len())?;
		T::pack_slice(self, writer)
	}

	#[inline]
	fn unpack(reader: &mut BufferReader<'_>) -> Result<Self> {
		Vec::<T>::unpack(reader).map(Vec::into_boxed_slice)
	}
}

impl Packable for String {
	const MIN_SIZE: usize = 4;

	#[inline]
	fn pack(&self, writer: &mut BufferWriter) -> Result<()> {
		writer.write_str(self)
	}

	#[inline]
	fn unpack(reader: &mut BufferReader<'_>) -> Result<Self> {
		reader.read_str().map(str::to_owned)
	}
}

impl Packable for Box<str> {
	const MIN_SIZE: usize = 4;

	#[inline]
	fn pack(&self, writer: &mut BufferWriter) -> Result<()> {
		writer.write_str(self)
	}

	#[inline]
	fn unpack(reader: &mut BufferReader<'_>) -> Result<Self> {
		reader.read_str().map(Box::from)
	}
}
