use crate::shape::{CollectionCapability, GenerateMode, HookShape, TypeRef, UnionCase};

/// Validated model of an accepted type.
///
/// Member order is the wire order: a formatter is synthesized by writing
/// `members` one after the other, and reading them back in the same order.
/// Once derived, that order is part of the wire contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShapeDescriptor {
	pub name: String,
	pub mode: GenerateMode,
	pub members: Vec<DescribedMember>,
	/// Members present on the type but not serialized.
	pub excluded: Vec<String>,
	pub constructor: ConstructorPlan,
	/// Union cases sorted by tag. Empty unless the type is a union root.
	pub union_cases: Vec<UnionCase>,
	pub hooks: Vec<HookShape>,
	pub collection: Option<CollectionCapability>,
}

impl ShapeDescriptor {
	#[inline]
	pub fn is_union_root(&self) -> bool {
		!self.union_cases.is_empty()
	}

	pub fn member(&self, name: &str) -> Option<&DescribedMember> {
		self.members.iter().find(|member| member.name == name)
	}

	pub fn member_names(&self) -> impl Iterator<Item = &str> {
		self.members.iter().map(|member| member.name.as_str())
	}

	/// Tag of a union variant.
	pub fn tag_of(&self, variant: &str) -> Option<u16> {
		self
			.union_cases
			.iter()
			.find(|case| case.variant == variant)
			.map(|case| case.tag)
	}
}

/// A serialized member and its stable wire position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DescribedMember {
	pub name: String,
	pub position: usize,
	pub ty: TypeRef,
}

/// How a decoded value gets constructed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConstructorPlan {
	/// Construct empty, then assign every member.
	Parameterless,
	/// Call the selected constructor. `params` holds, for each parameter in
	/// order, the wire position of the member bound to it.
	Parameterized { params: Vec<usize> },
}
