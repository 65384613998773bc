//! Language-neutral description of a candidate type's structure.
//!
//! A front end (e.g. `ser_pack_derive`) builds one [`TypeShape`] per type it
//! knows about, and hands the whole set to the [`Validator`].
//! Only shapes with `annotated == true` are candidates for derivation.
//! The others are context: base types, union variants, member types.
//!
//! [`Validator`]: crate::Validator

/// What kind of type declaration a shape describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeKind {
	/// Concrete type with reference layout.
	Class,
	/// Concrete type with value layout.
	Struct,
	/// Abstract base type.
	Abstract,
	/// Interface / capability set.
	Interface,
}

impl TypeKind {
	/// `true` for types which cannot be instantiated directly.
	#[inline]
	pub fn is_abstract(self) -> bool {
		matches!(self, TypeKind::Abstract | TypeKind::Interface)
	}
}

/// How the derivation should treat a type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GenerateMode {
	/// Aggregate of named members.
	#[default]
	Object,
	/// Encoded as the collection it wraps.
	Collection,
}

/// Collection capability a type exposes, for [`GenerateMode::Collection`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollectionCapability {
	List,
	Set,
	Map,
}

/// Fixed-width scalar kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scalar {
	U8,
	U16,
	U32,
	U64,
	U128,
	Usize,
	I8,
	I16,
	I32,
	I64,
	I128,
	Isize,
	F32,
	F64,
	Bool,
	Char,
	Unit,
}

impl Scalar {
	/// Look up a scalar by its Rust primitive name.
	pub fn from_name(name: &str) -> Option<Self> {
		let scalar = match name {
			"u8" => Scalar::U8,
			"u16" => Scalar::U16,
			"u32" => Scalar::U32,
			"u64" => Scalar::U64,
			"u128" => Scalar::U128,
			"usize" => Scalar::Usize,
			"i8" => Scalar::I8,
			"i16" => Scalar::I16,
			"i32" => Scalar::I32,
			"i64" => Scalar::I64,
			"i128" => Scalar::I128,
			"isize" => Scalar::Isize,
			"f32" => Scalar::F32,
			"f64" => Scalar::F64,
			"bool" => Scalar::Bool,
			"char" => Scalar::Char,
			_ => return None,
		};
		Some(scalar)
	}
}

/// Reference to a member's type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeRef {
	Scalar(Scalar),
	String,
	/// Value which may be absent.
	Nullable(Box<TypeRef>),
	/// Variable-length ordered or unordered collection.
	Sequence(Box<TypeRef>),
	/// Fixed-length array.
	Array(Box<TypeRef>, usize),
	Map(Box<TypeRef>, Box<TypeRef>),
	Tuple(Vec<TypeRef>),
	/// Any other type, by name. Must be packable itself.
	Named(String),
	/// Unconstrained reference (`object`, `Box<dyn Any>`).
	Object,
	/// Platform array base type with no element type.
	ArrayBase,
	/// Delegate, closure or function pointer.
	Delegate,
	/// Raw pointer.
	Pointer,
	/// Non-owning stack-only view (a span, a borrowed slice).
	StackOnly(String),
}

impl TypeRef {
	#[inline]
	pub fn named(name: impl Into<String>) -> Self {
		TypeRef::Named(name.into())
	}

	#[inline]
	pub fn nullable(inner: TypeRef) -> Self {
		TypeRef::Nullable(Box::new(inner))
	}

	#[inline]
	pub fn sequence(inner: TypeRef) -> Self {
		TypeRef::Sequence(Box::new(inner))
	}

	#[inline]
	pub fn map(key: TypeRef, value: TypeRef) -> Self {
		TypeRef::Map(Box::new(key), Box::new(value))
	}

	/// Whether values of this type consist only of fixed-width scalars,
	/// with no owned or referenced data.
	pub fn is_unmanaged(&self) -> bool {
		match self {
			TypeRef::Scalar(_) => true,
			TypeRef::Array(inner, _) => inner.is_unmanaged(),
			TypeRef::Tuple(items) => items.iter().all(TypeRef::is_unmanaged),
			_ => false,
		}
	}

	/// Visit this type and every type nested inside it, depth first.
	/// Stops early and returns the first `Some` the visitor produces.
	pub fn find<R>(&self, visit: &mut impl FnMut(&TypeRef) -> Option<R>) -> Option<R> {
		if let Some(found) = visit(self) {
			return Some(found);
		}
		match self {
			TypeRef::Nullable(inner) | TypeRef::Sequence(inner) | TypeRef::Array(inner, _) => {
				inner.find(visit)
			}
			TypeRef::Map(key, value) => key.find(visit).or_else(|| value.find(visit)),
			TypeRef::Tuple(items) => items.iter().find_map(|item| item.find(visit)),
			_ => None,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
	Public,
	Private,
}

/// Explicit per-member annotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemberAnnotation {
	Include,
	Ignore,
}

/// A field or property.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberShape {
	pub name: String,
	pub ty: TypeRef,
	pub visibility: Visibility,
	pub annotation: Option<MemberAnnotation>,
	/// Explicit wire position.
	pub order: Option<u16>,
	/// Member overrides one declared by a base type.
	pub is_override: bool,
}

impl MemberShape {
	/// Public member with no annotations.
	pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
		Self {
			name: name.into(),
			ty,
			visibility: Visibility::Public,
			annotation: None,
			order: None,
			is_override: false,
		}
	}

	pub fn private(mut self) -> Self {
		self.visibility = Visibility::Private;
		self
	}

	pub fn include(mut self) -> Self {
		self.annotation = Some(MemberAnnotation::Include);
		self
	}

	pub fn ignore(mut self) -> Self {
		self.annotation = Some(MemberAnnotation::Ignore);
		self
	}

	pub fn order(mut self, order: u16) -> Self {
		self.order = Some(order);
		self
	}

	pub fn overriding(mut self) -> Self {
		self.is_override = true;
		self
	}

	/// Whether the member takes part in the wire format.
	///
	/// Public members are serialized unless ignored.
	/// Private members only if explicitly included.
	pub fn is_serialized(&self) -> bool {
		match self.annotation {
			Some(MemberAnnotation::Ignore) => false,
			Some(MemberAnnotation::Include) => true,
			None => self.visibility == Visibility::Public,
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConstructorShape {
	/// Parameter names, in declaration order.
	pub params: Vec<String>,
	/// Explicitly designated for deserialization.
	pub designated: bool,
}

impl ConstructorShape {
	pub fn new<I, S>(params: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			params: params.into_iter().map(Into::into).collect(),
			designated: false,
		}
	}

	pub fn parameterless() -> Self {
		Self::default()
	}

	pub fn designated(mut self) -> Self {
		self.designated = true;
		self
	}
}

/// Point in the (de)serialization lifecycle a hook runs at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HookKind {
	OnSerializing,
	OnSerialized,
	OnDeserializing,
	OnDeserialized,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HookShape {
	pub kind: HookKind,
	pub name: String,
	pub param_count: usize,
}

impl HookShape {
	pub fn new(kind: HookKind, name: impl Into<String>) -> Self {
		Self {
			kind,
			name: name.into(),
			param_count: 0,
		}
	}

	pub fn with_params(mut self, param_count: usize) -> Self {
		self.param_count = param_count;
		self
	}
}

/// One declared union case: wire tag and variant type name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnionCase {
	pub tag: u16,
	pub variant: String,
}

/// Shape of one type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeShape {
	pub name: String,
	pub kind: TypeKind,
	/// Declared in a form the derivation can attach members to.
	pub partial: bool,
	pub sealed: bool,
	/// Non-owning view type which cannot live outside the stack.
	pub stack_only: bool,
	/// Enclosing type, if nested.
	pub enclosing: Option<String>,
	/// Opted into derivation.
	pub annotated: bool,
	pub mode: GenerateMode,
	pub base: Option<String>,
	pub implements: Vec<String>,
	pub collection: Option<CollectionCapability>,
	pub members: Vec<MemberShape>,
	pub constructors: Vec<ConstructorShape>,
	pub hooks: Vec<HookShape>,
	pub unions: Vec<UnionCase>,
}

impl TypeShape {
	/// Annotated, partial shape of the given kind with nothing else declared.
	pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
		Self {
			name: name.into(),
			kind,
			partial: true,
			sealed: kind == TypeKind::Struct,
			stack_only: false,
			enclosing: None,
			annotated: true,
			mode: GenerateMode::Object,
			base: None,
			implements: Vec::new(),
			collection: None,
			members: Vec::new(),
			constructors: Vec::new(),
			hooks: Vec::new(),
			unions: Vec::new(),
		}
	}

	pub fn class(name: impl Into<String>) -> Self {
		Self::new(name, TypeKind::Class)
	}

	pub fn structure(name: impl Into<String>) -> Self {
		Self::new(name, TypeKind::Struct)
	}

	pub fn abstract_class(name: impl Into<String>) -> Self {
		Self::new(name, TypeKind::Abstract)
	}

	pub fn interface(name: impl Into<String>) -> Self {
		Self::new(name, TypeKind::Interface)
	}

	pub fn not_partial(mut self) -> Self {
		self.partial = false;
		self
	}

	pub fn sealed(mut self) -> Self {
		self.sealed = true;
		self
	}

	pub fn stack_only(mut self) -> Self {
		self.stack_only = true;
		self
	}

	pub fn nested_in(mut self, enclosing: impl Into<String>) -> Self {
		self.enclosing = Some(enclosing.into());
		self
	}

	/// Mark as context only: not a derivation candidate.
	pub fn unannotated(mut self) -> Self {
		self.annotated = false;
		self
	}

	pub fn collection_mode(mut self) -> Self {
		self.mode = GenerateMode::Collection;
		self
	}

	pub fn collection(mut self, capability: CollectionCapability) -> Self {
		self.collection = Some(capability);
		self
	}

	pub fn base(mut self, base: impl Into<String>) -> Self {
		self.base = Some(base.into());
		self
	}

	pub fn implements(mut self, interface: impl Into<String>) -> Self {
		self.implements.push(interface.into());
		self
	}

	pub fn member(mut self, member: MemberShape) -> Self {
		self.members.push(member);
		self
	}

	pub fn constructor(mut self, constructor: ConstructorShape) -> Self {
		self.constructors.push(constructor);
		self
	}

	pub fn hook(mut self, hook: HookShape) -> Self {
		self.hooks.push(hook);
		self
	}

	pub fn union_case(mut self, tag: u16, variant: impl Into<String>) -> Self {
		self.unions.push(UnionCase {
			tag,
			variant: variant.into(),
		});
		self
	}

	/// `true` if the shape declares union cases.
	#[inline]
	pub fn is_union_root(&self) -> bool {
		!self.unions.is_empty()
	}

	/// Members which take part in the wire format, in declaration order.
	pub fn serialized_members(&self) -> impl Iterator<Item = &MemberShape> {
		self.members.iter().filter(|member| member.is_serialized())
	}
}
