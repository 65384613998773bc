use std::{
	any::{self, Any, TypeId},
	collections::HashMap,
	fmt,
};

use crate::{BufferReader, BufferWriter, Error, Packable, Result};

/// Access to a value's concrete type, through a trait object.
///
/// Make it a supertrait of a union root trait:
///
/// ```
/// trait Shape: ser_pack::AsAny {}
/// ```
pub trait AsAny: Any {
	fn as_any(&self) -> &dyn Any;

	/// Name of the concrete type.
	fn concrete_type_name(&self) -> &'static str;
}

impl<T: Any> AsAny for T {
	#[inline]
	fn as_any(&self) -> &dyn Any {
		self
	}

	#[inline]
	fn concrete_type_name(&self) -> &'static str {
		any::type_name::<T>()
	}
}

type VariantEncodeFn = Box<dyn Fn(&dyn Any, &mut BufferWriter) -> Result<()> + Send + Sync>;
type VariantDecodeFn<R> = Box<dyn Fn(&mut BufferReader<'_>) -> Result<Box<R>> + Send + Sync>;

struct Case<R: ?Sized> {
	tag: u16,
	variant: &'static str,
	encode: VariantEncodeFn,
	decode: VariantDecodeFn<R>,
}

/// Dispatch table for a union root `R`, usually a trait object type.
///
/// Encodes a value as its variant's tag followed by the variant's own encoding,
/// and decodes by reading the tag and dispatching to that variant's decoder.
///
/// Build with [`UnionTable::builder`], or declare with [`union_root!`].
///
/// [`union_root!`]: crate::union_root
pub struct UnionTable<R: ?Sized> {
	root: &'static str,
	cases: Vec<Case<R>>,
	by_tag: HashMap<u16, usize>,
	by_type: HashMap<TypeId, usize>,
}

impl<R: ?Sized + AsAny> UnionTable<R> {
	pub fn builder(root: &'static str) -> UnionTableBuilder<R> {
		UnionTableBuilder {
			table: UnionTable {
				root,
				cases: Vec::new(),
				by_tag: HashMap::new(),
				by_type: HashMap::new(),
			},
			error: None,
		}
	}

	#[inline]
	pub fn root(&self) -> &'static str {
		self.root
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.cases.len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.cases.is_empty()
	}

	/// `(tag, variant type name)` for each case, sorted by tag.
	pub fn cases(&self) -> Vec<(u16, &'static str)> {
		let mut cases = self
			.cases
			.iter()
			.map(|case| (case.tag, case.variant))
			.collect::<Vec<_>>();
		cases.sort_unstable_by_key(|&(tag, _)| tag);
		cases
	}

	/// Tag of variant type `C`.
	pub fn tag_of<C: Any>(&self) -> Option<u16> {
		self
			.by_type
			.get(&TypeId::of::<C>())
			.map(|&index| self.cases[index].tag)
	}

	pub fn encode(&self, value: &R, writer: &mut BufferWriter) -> Result<()> {
		let any = AsAny::as_any(value);
		let case = match self.by_type.get(&Any::type_id(any)) {
			Some(&index) => &self.cases[index],
			None => {
				return Err(Error::UnregisteredVariant {
					root: self.root,
					variant: AsAny::concrete_type_name(value),
				})
			}
		};
		writer.write_tag(case.tag)?;
		(case.encode)(any, writer)
	}

	pub fn decode(&self, reader: &mut BufferReader<'_>) -> Result<Box<R>> {
		reader.nested(|reader| {
			let tag = reader.read_tag()?;
			match self.by_tag.get(&tag) {
				Some(&index) => (self.cases[index].decode)(reader),
				None => Err(unknown_tag(self.root, tag)),
			}
		})
	}
}

impl<R: ?Sized> fmt::Debug for UnionTable<R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("UnionTable")
			.field("root", &self.root)
			.field(
				"cases",
				&self
					.cases
					.iter()
					.map(|case| (case.tag, case.variant))
					.collect::<Vec<_>>(),
			)
			.finish()
	}
}

pub struct UnionTableBuilder<R: ?Sized> {
	table: UnionTable<R>,
	error: Option<Error>,
}

impl<R: ?Sized + AsAny> UnionTableBuilder<R> {
	/// Add variant `C` with wire tag `tag`.
	/// `into_root` converts a decoded `C` into the root type.
	pub fn variant<C>(mut self, tag: u16, into_root: fn(C) -> Box<R>) -> Self
	where C: Packable + Any {
		if self.error.is_some() {
			return self;
		}

		let table = &mut self.table;
		let variant = any::type_name::<C>();
		if table.by_tag.contains_key(&tag) {
			self.error = Some(Error::DuplicateUnionTag {
				root: table.root,
				tag,
			});
			return self;
		}
		if table.by_type.contains_key(&TypeId::of::<C>()) {
			self.error = Some(Error::DuplicateUnionVariant {
				root: table.root,
				variant,
			});
			return self;
		}

		let root = table.root;
		let encode: VariantEncodeFn = Box::new(move |value, writer| {
			match value.downcast_ref::<C>() {
				Some(value) => value.pack(writer),
				None => Err(Error::UnregisteredVariant { root, variant }),
			}
		});
		let decode: VariantDecodeFn<R> = Box::new(move |reader| C::unpack(reader).map(into_root));

		let index = table.cases.len();
		table.by_tag.insert(tag, index);
		table.by_type.insert(TypeId::of::<C>(), index);
		table.cases.push(Case {
			tag,
			variant,
			encode,
			decode,
		});
		self
	}

	/// Finish the table.
	/// Fails if a tag or variant type was declared more than once.
	pub fn build(self) -> Result<UnionTable<R>> {
		match self.error {
			Some(error) => {
				log::debug!("union table rejected: {}", error);
				Err(error)
			}
			None => {
				log::debug!(
					"built union table for `{}` with {} variant(s)",
					self.table.root,
					self.table.cases.len()
				);
				Ok(self.table)
			}
		}
	}
}

/// Union roots declared with [`union_root!`].
///
/// [`union_root!`]: crate::union_root
pub trait UnionDispatch: AsAny {
	fn union_table() -> &'static Result<UnionTable<Self>>;
}

/// Error for a tag which `root` doesn't declare.
#[doc(hidden)]
#[cold]
pub fn unknown_tag(root: &'static str, tag: u16) -> Error {
	log::debug!("unknown tag {} for union `{}`", tag, root);
	Error::UnknownTag(tag)
}
