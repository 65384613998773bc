use std::{
	any,
	collections::{BTreeMap, BTreeSet, BinaryHeap, HashMap, HashSet, LinkedList, VecDeque},
	hash::{BuildHasher, Hash},
};

use crate::{BufferReader, BufferWriter, Error, Packable, Result};

/// Write length prefix, then each item.
#[inline]
fn pack_items<'a, T, I>(len: usize, items: I, writer: &mut BufferWriter) -> Result<()>
where
	T: Packable + 'a,
	I: IntoIterator<Item = &'a T>,
{
	writer.write_var_length(len)?;
	for item in items {
		item.pack(writer)?;
	}
	Ok(())
}

/// Read length prefix, then collect that many items.
#[inline]
fn unpack_items<T, C>(reader: &mut BufferReader<'_>) -> Result<C>
where
	T: Packable,
	C: FromIterator<T>,
{
	let len = reader.read_length(T::MIN_SIZE)?;
	(0..len).map(|_| T::unpack(reader)).collect()
}

/// Read length prefix, then collect that many distinct items.
///
/// Input repeating an item is malformed, as the result would hold fewer items
/// than declared.
#[inline]
fn unpack_unique<T, C>(reader: &mut BufferReader<'_>, len_of: impl Fn(&C) -> usize) -> Result<C>
where
	T: Packable,
	C: FromIterator<T>,
{
	let len = reader.read_length(T::MIN_SIZE)?;
	let collection = (0..len).map(|_| T::unpack(reader)).collect::<Result<C>>()?;
	check_unique(len, len_of(&collection), any::type_name::<C>())?;
	Ok(collection)
}

#[inline]
fn check_unique(declared: usize, collected: usize, type_name: &'static str) -> Result<()> {
	if collected != declared {
		log::debug!("{} duplicate key(s) decoding `{}`", declared - collected, type_name);
		return Err(Error::DuplicateKey { type_name });
	}
	Ok(())
}

macro_rules! impl_sequence {
	($ty:ident<T $(: $bound:ident $(+ $bounds:ident)*)?>) => {
		impl<T: Packable $(+ $bound $(+ $bounds)*)?> Packable for $ty<T> {
			const MIN_SIZE: usize = 4;

			fn pack(&self, writer: &mut BufferWriter) -> Result<()> {
				pack_items(self.len(), self, writer)
			}

			fn unpack(reader: &mut BufferReader<'_>) -> Result<Self> {
				unpack_items(reader)
			}
		}
	};
}

impl_sequence!(VecDeque<T>);
impl_sequence!(LinkedList<T>);
impl_sequence!(BinaryHeap<T: Ord>);

impl<T, S> Packable for HashSet<T, S>
where
	T: Packable + Eq + Hash,
	S: BuildHasher + Default,
{
	const MIN_SIZE: usize = 4;

	fn pack(&self, writer: &mut BufferWriter) -> Result<()> {
		pack_items(self.len(), self, writer)
	}

	fn unpack(reader: &mut BufferReader<'_>) -> Result<Self> {
		unpack_unique(reader, |set: &Self| set.len())
	}
}

impl<T: Packable + Ord> Packable for BTreeSet<T> {
	const MIN_SIZE: usize = 4;

	fn pack(&self, writer: &mut BufferWriter) -> Result<()> {
		pack_items(self.len(), self, writer)
	}

	fn unpack(reader: &mut BufferReader<'_>) -> Result<Self> {
		unpack_unique(reader, |set: &Self| set.len())
	}
}

/// Write length prefix, then each key followed by its value.
#[inline]
fn pack_entries<'a, K, V, I>(len: usize, entries: I, writer: &mut BufferWriter) -> Result<()>
where
	K: Packable + 'a,
	V: Packable + 'a,
	I: IntoIterator<Item = (&'a K, &'a V)>,
{
	writer.write_var_length(len)?;
	for (key, value) in entries {
		key.pack(writer)?;
		value.pack(writer)?;
	}
	Ok(())
}

/// Read length prefix, then collect that many entries. Keys must be distinct.
#[inline]
fn unpack_entries<K, V, C>(reader: &mut BufferReader<'_>, len_of: impl Fn(&C) -> usize) -> Result<C>
where
	K: Packable,
	V: Packable,
	C: FromIterator<(K, V)>,
{
	let len = reader.read_length(K::MIN_SIZE + V::MIN_SIZE)?;
	let map = (0..len)
		.map(|_| -> Result<(K, V)> { Ok((K::unpack(reader)?, V::unpack(reader)?)) })
		.collect::<Result<C>>()?;
	check_unique(len, len_of(&map), any::type_name::<C>())?;
	Ok(map)
}

impl<K, V, S> Packable for HashMap<K, V, S>
where
	K: Packable + Eq + Hash,
	V: Packable,
	S: BuildHasher + Default,
{
	const MIN_SIZE: usize = 4;

	fn pack(&self, writer: &mut BufferWriter) -> Result<()> {
		pack_entries(self.len(), self, writer)
	}

	fn unpack(reader: &mut BufferReader<'_>) -> Result<Self> {
		unpack_entries(reader, |map: &Self| map.len())
	}
}

impl<K, V> Packable for BTreeMap<K, V>
where
	K: Packable + Ord,
	V: Packable,
{
	const MIN_SIZE: usize = 4;

	fn pack(&self, writer: &mut BufferWriter) -> Result<()> {
		pack_entries(self.len(), self, writer)
	}

	fn unpack(reader: &mut BufferReader<'_>) -> Result<Self> {
		unpack_entries(reader, |map: &Self| map.len())
	}
}
