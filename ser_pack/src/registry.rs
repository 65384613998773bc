use std::{
	any::{self, Any, TypeId},
	collections::HashMap,
	fmt,
	sync::OnceLock,
};

use crate::{BufferReader, BufferWriter, Error, Packable, Result};

pub type EncodeFn<T> = fn(&T, &mut BufferWriter) -> Result<()>;
pub type DecodeFn<T> = fn(&mut BufferReader<'_>) -> Result<T>;

/// Encode and decode routines for a type `T`.
///
/// A `Formatter` is stateless and `Copy`. Callers serializing many values of
/// the same type can resolve a formatter once and keep it. Each call is then
/// a single function pointer call.
pub struct Formatter<T> {
	encode: EncodeFn<T>,
	decode: DecodeFn<T>,
	type_name: &'static str,
}

impl<T> Formatter<T> {
	/// Create a formatter from explicit routines.
	/// Use for types which don't implement [`Packable`].
	pub fn new(encode: EncodeFn<T>, decode: DecodeFn<T>) -> Self {
		Self {
			encode,
			decode,
			type_name: any::type_name::<T>(),
		}
	}

	#[inline]
	pub fn type_name(&self) -> &'static str {
		self.type_name
	}

	#[inline]
	pub fn encode(&self, value: &T, writer: &mut BufferWriter) -> Result<()> {
		(self.encode)(value, writer)
	}

	#[inline]
	pub fn decode(&self, reader: &mut BufferReader<'_>) -> Result<T> {
		(self.decode)(reader)
	}

	/// Encode `value` into a new buffer.
	pub fn serialize(&self, value: &T) -> Result<Vec<u8>> {
		let mut writer = BufferWriter::new();
		self.encode(value, &mut writer)?;
		Ok(writer.into_vec())
	}

	pub fn deserialize(&self, input: &[u8]) -> Result<T> {
		self.decode(&mut BufferReader::new(input))
	}
}

impl<T: Packable> Formatter<T> {
	/// Formatter for a [`Packable`] type.
	#[inline]
	pub fn of() -> Self {
		Self::new(T::pack, T::unpack)
	}
}

// Manual impls, as derive would require `T: Clone`
impl<T> Clone for Formatter<T> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<T> Copy for Formatter<T> {}

impl<T> fmt::Debug for Formatter<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Formatter")
			.field("type_name", &self.type_name)
			.finish()
	}
}

struct Entry {
	type_name: &'static str,
	formatter: Box<dyn Any + Send + Sync>,
}

/// Maps types to their [`Formatter`]s.
///
/// Populate with [`register`] / [`register_formatter`], then resolve.
/// Registering a type a second time keeps the first formatter.
///
/// One registry can be installed process-wide with [`install_global`].
///
/// [`register`]: FormatterRegistry::register
/// [`register_formatter`]: FormatterRegistry::register_formatter
/// [`install_global`]: FormatterRegistry::install_global
#[derive(Default)]
pub struct FormatterRegistry {
	entries: HashMap<TypeId, Entry>,
}

static GLOBAL: OnceLock<FormatterRegistry> = OnceLock::new();

impl FormatterRegistry {
	/// Registry with no formatters.
	pub fn empty() -> Self {
		Self::default()
	}

	/// Registry with formatters for scalars, `String` and `Vec<u8>`.
	pub fn new() -> Self {
		let mut registry = Self::empty();
		registry
			.register::<u8>()
			.register::<u16>()
			.register::<u32>()
			.register::<u64>()
			.register::<u128>()
			.register::<usize>()
			.register::<i8>()
			.register::<i16>()
			.register::<i32>()
			.register::<i64>()
			.register::<i128>()
			.register::<isize>()
			.register::<f32>()
			.register::<f64>()
			.register::<bool>()
			.register::<char>()
			.register::<()>()
			.register::<String>()
			.register::<Vec<u8>>();
		registry
	}

	/// Register `T`'s own formatter.
	#[inline]
	pub fn register<T: Packable + 'static>(&mut self) -> &mut Self {
		self.register_formatter(Formatter::<T>::of())
	}

	/// Register an explicit formatter.
	pub fn register_formatter<T: 'static>(&mut self, formatter: Formatter<T>) -> &mut Self {
		let type_name = formatter.type_name();
		match self.entries.entry(TypeId::of::<T>()) {
			std::collections::hash_map::Entry::Occupied(_) => {
				log::debug!("formatter for `{}` already registered, keeping existing", type_name);
			}
			std::collections::hash_map::Entry::Vacant(entry) => {
				log::debug!("registered formatter for `{}`", type_name);
				entry.insert(Entry {
					type_name,
					formatter: Box::new(formatter),
				});
			}
		}
		self
	}

	#[inline]
	pub fn contains<T: 'static>(&self) -> bool {
		self.entries.contains_key(&TypeId::of::<T>())
	}

	/// Get `T`'s formatter.
	pub fn resolve<T: 'static>(&self) -> Result<Formatter<T>> {
		self
			.entries
			.get(&TypeId::of::<T>())
			.and_then(|entry| entry.formatter.downcast_ref::<Formatter<T>>())
			.copied()
			.ok_or(Error::Unresolvable {
				type_name: any::type_name::<T>(),
			})
	}

	/// Resolve `T`'s formatter and encode `value` into a new buffer.
	pub fn serialize<T: 'static>(&self, value: &T) -> Result<Vec<u8>> {
		self.resolve::<T>()?.serialize(value)
	}

	/// Resolve `T`'s formatter and decode a value from `input`.
	pub fn deserialize<T: 'static>(&self, input: &[u8]) -> Result<T> {
		self.resolve::<T>()?.deserialize(input)
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Names of registered types, in no particular order.
	pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
		self.entries.values().map(|entry| entry.type_name)
	}

	/// Install as the process-wide registry.
	///
	/// Fails if a registry is already installed, including the default one
	/// [`global`] initializes on first use.
	///
	/// [`global`]: FormatterRegistry::global
	pub fn install_global(self) -> Result<&'static FormatterRegistry> {
		let len = self.len();
		GLOBAL.set(self).map_err(|_| Error::RegistryInstalled)?;
		log::debug!("installed global formatter registry with {} formatter(s)", len);
		Ok(Self::global())
	}

	/// Process-wide registry.
	/// If none was installed, one with the built-in formatters is created.
	pub fn global() -> &'static FormatterRegistry {
		GLOBAL.get_or_init(FormatterRegistry::new)
	}
}

impl fmt::Debug for FormatterRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_set().entries(self.type_names()).finish()
	}
}
