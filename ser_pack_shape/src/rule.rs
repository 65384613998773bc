use std::fmt;

use thiserror::Error;

/// Acceptance rules. Each rejection names exactly one of these.
///
/// The numeric identifiers are stable: front ends display them as `PACK0NN`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rule {
	MustBePartial = 1,
	NestedNotAllowed = 2,
	AbstractMustBeUnion = 3,
	AmbiguousConstructor = 4,
	MultipleDesignatedConstructors = 5,
	UnmatchedConstructorParameter = 6,
	HookHasParameters = 7,
	HookOnUnmanagedType = 8,
	OverrideMemberAnnotated = 9,
	SealedTypeCantBeUnion = 10,
	ConcreteTypeCantBeUnion = 11,
	DuplicateUnionTag = 12,
	UnionVariantNotImplementingRoot = 13,
	UnionVariantNotDerivedFromRoot = 14,
	UnionVariantIsValueType = 15,
	UnionVariantNotPackable = 16,
	TooManyMembers = 17,
	UnsupportedMemberType = 18,
	MemberNotPackable = 19,
	TypeIsStackOnly = 20,
	MemberIsStackOnly = 21,
	CollectionTypeIsAbstract = 22,
	CollectionCapabilityMissing = 23,
	CollectionNeedsParameterlessConstructor = 24,
	PartialMemberOrder = 25,
	NonContinuousMemberOrder = 26,
}

impl Rule {
	/// Numeric identifier.
	#[inline]
	pub fn number(self) -> u16 {
		self as u16
	}

	/// Identifier as displayed in diagnostics, e.g. `PACK004`.
	pub fn code(self) -> String {
		format!("PACK{:03}", self.number())
	}

	pub fn name(self) -> &'static str {
		match self {
			Rule::MustBePartial => "must be partial",
			Rule::NestedNotAllowed => "nested type not allowed",
			Rule::AbstractMustBeUnion => "abstract type must be a union",
			Rule::AmbiguousConstructor => "ambiguous constructor",
			Rule::MultipleDesignatedConstructors => "multiple designated constructors",
			Rule::UnmatchedConstructorParameter => "unmatched constructor parameter",
			Rule::HookHasParameters => "hook has parameters",
			Rule::HookOnUnmanagedType => "hook on unmanaged type",
			Rule::OverrideMemberAnnotated => "override member annotated",
			Rule::SealedTypeCantBeUnion => "sealed type can't be union",
			Rule::ConcreteTypeCantBeUnion => "concrete type can't be union",
			Rule::DuplicateUnionTag => "duplicate union tag",
			Rule::UnionVariantNotImplementingRoot => "union variant not implementing root",
			Rule::UnionVariantNotDerivedFromRoot => "union variant not derived from root",
			Rule::UnionVariantIsValueType => "union variant is value type",
			Rule::UnionVariantNotPackable => "union variant not packable",
			Rule::TooManyMembers => "too many members",
			Rule::UnsupportedMemberType => "unsupported member type",
			Rule::MemberNotPackable => "member not packable",
			Rule::TypeIsStackOnly => "type is stack-only",
			Rule::MemberIsStackOnly => "member is stack-only",
			Rule::CollectionTypeIsAbstract => "collection type is abstract",
			Rule::CollectionCapabilityMissing => "collection capability missing",
			Rule::CollectionNeedsParameterlessConstructor => {
				"collection needs parameterless constructor"
			}
			Rule::PartialMemberOrder => "partial member order",
			Rule::NonContinuousMemberOrder => "non-continuous member order",
		}
	}
}

impl fmt::Display for Rule {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} ({})", self.code(), self.name())
	}
}

/// A rejection: the rule violated, and where.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("[{}] `{type_name}`{}: {message}", .rule.code(), member_suffix(.member))]
pub struct Diagnostic {
	pub rule: Rule,
	pub type_name: String,
	/// Offending member, constructor parameter, hook or union variant.
	pub member: Option<String>,
	pub message: String,
}

fn member_suffix(member: &Option<String>) -> String {
	match member {
		Some(member) => format!(" (`{}`)", member),
		None => String::new(),
	}
}
