use std::collections::{HashMap, HashSet};

use crate::{
	descriptor::{ConstructorPlan, DescribedMember, ShapeDescriptor},
	rule::{Diagnostic, Rule},
	shape::{GenerateMode, MemberShape, TypeKind, TypeRef, TypeShape},
};

/// Maximum number of serialized members.
/// Aggregate header is a single byte, and values above this are reserved.
pub const MAX_MEMBERS: usize = 249;

/// Outcome of validating one acceptance unit.
#[derive(Clone, Debug, Default)]
pub struct Report {
	/// Descriptors of accepted types, in input order.
	pub descriptors: Vec<ShapeDescriptor>,
	/// Every rejection, in input order.
	pub diagnostics: Vec<Diagnostic>,
}

impl Report {
	/// `true` if no type was rejected.
	#[inline]
	pub fn is_clean(&self) -> bool {
		self.diagnostics.is_empty()
	}

	pub fn descriptor(&self, name: &str) -> Option<&ShapeDescriptor> {
		self.descriptors.iter().find(|descriptor| descriptor.name == name)
	}

	pub fn diagnostics_for<'r>(&'r self, name: &'r str) -> impl Iterator<Item = &'r Diagnostic> {
		self
			.diagnostics
			.iter()
			.filter(move |diagnostic| diagnostic.type_name == name)
	}

	/// Rules violated, in the order reported.
	pub fn rules(&self) -> Vec<Rule> {
		self.diagnostics.iter().map(|diagnostic| diagnostic.rule).collect()
	}
}

/// Applies the acceptance rules to a set of shapes.
///
/// Shapes are validated together as one acceptance unit, because some rules
/// need to look at other types: member types must themselves be packable, and
/// union variants must relate to their root.
#[derive(Clone, Debug, Default)]
pub struct Validator {
	known_types: HashSet<String>,
	defer_unknown_types: bool,
}

impl Validator {
	pub fn new() -> Self {
		Self::default()
	}

	/// Declare a type name which has a formatter without being in the unit
	/// (a built-in or hand-registered formatter).
	pub fn known_type(mut self, name: impl Into<String>) -> Self {
		self.known_types.insert(name.into());
		self
	}

	/// Accept member types not found in the unit, leaving the check to a later
	/// stage. Used by the derive macro, where the trait system performs it.
	pub fn defer_unknown_types(mut self, defer: bool) -> Self {
		self.defer_unknown_types = defer;
		self
	}

	/// Validate every annotated shape in `shapes`.
	pub fn validate(&self, shapes: &[TypeShape]) -> Report {
		let unit = shapes
			.iter()
			.map(|shape| (shape.name.as_str(), shape))
			.collect::<HashMap<_, _>>();

		let mut report = Report::default();
		for shape in shapes.iter().filter(|shape| shape.annotated) {
			let mut check = Check {
				validator: self,
				unit: &unit,
				shape,
				diagnostics: Vec::new(),
			};
			match check.run() {
				Some(descriptor) if check.diagnostics.is_empty() => report.descriptors.push(descriptor),
				_ => {
					for diagnostic in &check.diagnostics {
						log::debug!("rejected: {}", diagnostic);
					}
					report.diagnostics.append(&mut check.diagnostics);
				}
			}
		}
		report
	}
}

/// Validation state for a single candidate.
struct Check<'v> {
	validator: &'v Validator,
	unit: &'v HashMap<&'v str, &'v TypeShape>,
	shape: &'v TypeShape,
	diagnostics: Vec<Diagnostic>,
}

impl<'v> Check<'v> {
	fn reject(&mut self, rule: Rule, member: Option<&str>, message: impl Into<String>) {
		self.diagnostics.push(Diagnostic {
			rule,
			type_name: self.shape.name.clone(),
			member: member.map(str::to_string),
			message: message.into(),
		});
	}

	/// Returns a descriptor if the type-level gates pass.
	/// Member-level rejections are collected in `diagnostics`.
	fn run(&mut self) -> Option<ShapeDescriptor> {
		let shape = self.shape;

		if !shape.partial {
			self.reject(
				Rule::MustBePartial,
				None,
				"type must be declared so that generated members can be attached to it",
			);
			return None;
		}
		if let Some(enclosing) = &shape.enclosing {
			self.reject(
				Rule::NestedNotAllowed,
				None,
				format!("type is nested inside `{}`", enclosing),
			);
			return None;
		}
		if shape.stack_only {
			self.reject(
				Rule::TypeIsStackOnly,
				None,
				"stack-only view types cannot be serialized",
			);
			return None;
		}

		if shape.mode == GenerateMode::Collection {
			return self.check_collection();
		}

		if shape.is_union_root() {
			return self.check_union_root();
		}

		if shape.kind.is_abstract() {
			self.reject(
				Rule::AbstractMustBeUnion,
				None,
				"abstract types and interfaces must declare union cases",
			);
			return None;
		}

		self.check_object()
	}

	fn check_collection(&mut self) -> Option<ShapeDescriptor> {
		let shape = self.shape;
		if shape.kind.is_abstract() {
			self.reject(
				Rule::CollectionTypeIsAbstract,
				None,
				"collection mode requires a concrete type",
			);
		}
		if shape.collection.is_none() {
			self.reject(
				Rule::CollectionCapabilityMissing,
				None,
				"collection mode requires a list, set or map capability",
			);
		}
		let has_parameterless = shape.constructors.is_empty()
			|| shape
				.constructors
				.iter()
				.any(|constructor| constructor.params.is_empty());
		if !has_parameterless {
			self.reject(
				Rule::CollectionNeedsParameterlessConstructor,
				None,
				"collection mode requires a parameterless constructor",
			);
		}

		Some(ShapeDescriptor {
			name: shape.name.clone(),
			mode: GenerateMode::Collection,
			members: Vec::new(),
			excluded: Vec::new(),
			constructor: ConstructorPlan::Parameterless,
			union_cases: Vec::new(),
			hooks: shape.hooks.clone(),
			collection: shape.collection,
		})
	}

	fn check_union_root(&mut self) -> Option<ShapeDescriptor> {
		let shape = self.shape;

		if shape.kind == TypeKind::Struct || shape.sealed {
			self.reject(
				Rule::SealedTypeCantBeUnion,
				None,
				"sealed types cannot declare union cases",
			);
		} else if shape.kind == TypeKind::Class {
			self.reject(
				Rule::ConcreteTypeCantBeUnion,
				None,
				"only abstract types and interfaces can declare union cases",
			);
		}

		let mut seen_tags = HashSet::new();
		let mut reported_tags = HashSet::new();
		for case in &shape.unions {
			if !seen_tags.insert(case.tag) && reported_tags.insert(case.tag) {
				self.reject(
					Rule::DuplicateUnionTag,
					Some(&case.variant),
					format!("union tag {} is declared more than once", case.tag),
				);
			}
		}

		for case in &shape.unions {
			let variant = match self.unit.get(case.variant.as_str()) {
				Some(variant) if variant.annotated => *variant,
				_ => {
					self.reject(
						Rule::UnionVariantNotPackable,
						Some(&case.variant),
						"union variant must itself be packable",
					);
					continue;
				}
			};

			if variant.kind == TypeKind::Struct {
				self.reject(
					Rule::UnionVariantIsValueType,
					Some(&case.variant),
					"union variant must have reference layout",
				);
			} else if shape.kind == TypeKind::Interface && !self.implements(variant, &shape.name) {
				self.reject(
					Rule::UnionVariantNotImplementingRoot,
					Some(&case.variant),
					format!("union variant does not implement `{}`", shape.name),
				);
			} else if shape.kind != TypeKind::Interface && !self.derives_from(variant, &shape.name) {
				self.reject(
					Rule::UnionVariantNotDerivedFromRoot,
					Some(&case.variant),
					format!("union variant does not derive from `{}`", shape.name),
				);
			}
		}

		let mut union_cases = shape.unions.clone();
		union_cases.sort_by_key(|case| case.tag);

		Some(ShapeDescriptor {
			name: shape.name.clone(),
			mode: GenerateMode::Object,
			members: Vec::new(),
			excluded: Vec::new(),
			constructor: ConstructorPlan::Parameterless,
			union_cases,
			hooks: shape.hooks.clone(),
			collection: None,
		})
	}

	fn check_object(&mut self) -> Option<ShapeDescriptor> {
		let shape = self.shape;

		for hook in &shape.hooks {
			if hook.param_count > 0 {
				self.reject(
					Rule::HookHasParameters,
					Some(&hook.name),
					format!("hook takes {} parameter(s), expected none", hook.param_count),
				);
			}
		}
		if shape.kind == TypeKind::Struct
			&& shape.serialized_members().all(|member| member.ty.is_unmanaged())
		{
			for hook in &shape.hooks {
				self.reject(
					Rule::HookOnUnmanagedType,
					Some(&hook.name),
					"hooks are not supported on unmanaged value types",
				);
			}
		}

		for member in &shape.members {
			if member.is_override && member.annotation.is_some() {
				self.reject(
					Rule::OverrideMemberAnnotated,
					Some(&member.name),
					"an overriding member cannot change the annotation of its base member",
				);
			}
		}

		let serialized = shape.serialized_members().collect::<Vec<_>>();
		for member in &serialized {
			self.check_member_type(member);
		}

		if serialized.len() > MAX_MEMBERS {
			self.reject(
				Rule::TooManyMembers,
				None,
				format!(
					"{} members are serialized, maximum is {}",
					serialized.len(),
					MAX_MEMBERS
				),
			);
		}

		let ordered = self.order_members(serialized);
		let constructor = self.select_constructor(&ordered);

		let members = ordered
			.iter()
			.enumerate()
			.map(|(position, member)| {
				DescribedMember {
					name: member.name.clone(),
					position,
					ty: member.ty.clone(),
				}
			})
			.collect();
		let excluded = shape
			.members
			.iter()
			.filter(|member| !member.is_serialized())
			.map(|member| member.name.clone())
			.collect();

		Some(ShapeDescriptor {
			name: shape.name.clone(),
			mode: GenerateMode::Object,
			members,
			excluded,
			constructor: constructor?,
			union_cases: Vec::new(),
			hooks: shape.hooks.clone(),
			collection: None,
		})
	}

	/// Report the first unsupported type found inside the member's type.
	fn check_member_type(&mut self, member: &MemberShape) {
		let problem = member.ty.find(&mut |ty| {
			match ty {
				TypeRef::StackOnly(name) => {
					Some((
						Rule::MemberIsStackOnly,
						format!("`{}` is a stack-only view type", name),
					))
				}
				TypeRef::Object => {
					Some((
						Rule::UnsupportedMemberType,
						"unconstrained reference types cannot be serialized".to_string(),
					))
				}
				TypeRef::ArrayBase => {
					Some((
						Rule::UnsupportedMemberType,
						"untyped arrays cannot be serialized".to_string(),
					))
				}
				TypeRef::Delegate => {
					Some((
						Rule::UnsupportedMemberType,
						"functions and delegates cannot be serialized".to_string(),
					))
				}
				TypeRef::Pointer => {
					Some((
						Rule::UnsupportedMemberType,
						"pointers cannot be serialized".to_string(),
					))
				}
				TypeRef::Named(name) if !self.is_packable(name) => {
					Some((
						Rule::MemberNotPackable,
						format!("`{}` is not packable", name),
					))
				}
				_ => None,
			}
		});

		if let Some((rule, message)) = problem {
			self.reject(rule, Some(&member.name), message);
		}
	}

	/// Sort serialized members into wire order.
	///
	/// Either no member carries an explicit order (declaration order is used),
	/// or all of them do and the orders are exactly `0..n`.
	fn order_members(&mut self, serialized: Vec<&'v MemberShape>) -> Vec<&'v MemberShape> {
		let annotated = serialized.iter().filter(|member| member.order.is_some()).count();
		if annotated == 0 {
			return serialized;
		}
		if annotated != serialized.len() {
			for member in serialized.iter().filter(|member| member.order.is_none()) {
				self.reject(
					Rule::PartialMemberOrder,
					Some(&member.name),
					"when any member declares an order, all serialized members must",
				);
			}
			return serialized;
		}

		let mut ordered = serialized;
		ordered.sort_by_key(|member| member.order);
		for (expected, member) in ordered.iter().enumerate() {
			if member.order != Some(expected as u16) {
				self.reject(
					Rule::NonContinuousMemberOrder,
					Some(&member.name),
					format!("member orders must be continuous from 0, expected {}", expected),
				);
				break;
			}
		}
		ordered
	}

	/// Pick the constructor used for deserialization and bind its parameters.
	/// Returns `None` if no single constructor could be selected.
	fn select_constructor(&mut self, ordered: &[&MemberShape]) -> Option<ConstructorPlan> {
		let shape = self.shape;
		let designated = shape
			.constructors
			.iter()
			.filter(|constructor| constructor.designated)
			.collect::<Vec<_>>();

		let selected = match (designated.len(), shape.constructors.len()) {
			(0, 0) => return Some(ConstructorPlan::Parameterless),
			(0, 1) => &shape.constructors[0],
			(0, _) => {
				self.reject(
					Rule::AmbiguousConstructor,
					None,
					"more than one constructor and none is designated",
				);
				return None;
			}
			(1, _) => designated[0],
			_ => {
				self.reject(
					Rule::MultipleDesignatedConstructors,
					None,
					"more than one constructor is designated",
				);
				return None;
			}
		};

		if selected.params.is_empty() {
			return Some(ConstructorPlan::Parameterless);
		}

		let mut params = Vec::with_capacity(selected.params.len());
		for param in &selected.params {
			let position = ordered
				.iter()
				.position(|member| member.name.eq_ignore_ascii_case(param));
			match position {
				Some(position) => params.push(position),
				None => {
					self.reject(
						Rule::UnmatchedConstructorParameter,
						Some(param),
						"constructor parameter does not match any serialized member",
					);
				}
			}
		}

		if params.len() == selected.params.len() {
			Some(ConstructorPlan::Parameterized { params })
		} else {
			None
		}
	}

	fn is_packable(&self, name: &str) -> bool {
		if self.validator.known_types.contains(name) {
			return true;
		}
		match self.unit.get(name) {
			Some(shape) => shape.annotated,
			None => self.validator.defer_unknown_types,
		}
	}

	/// Whether `shape` or any of its bases declares `interface`.
	fn implements(&self, shape: &TypeShape, interface: &str) -> bool {
		self
			.ancestry(shape)
			.any(|ancestor| ancestor.implements.iter().any(|name| name == interface))
	}

	/// Whether `root` appears in the base chain of `shape`.
	fn derives_from(&self, shape: &TypeShape, root: &str) -> bool {
		self
			.ancestry(shape)
			.skip(1)
			.any(|ancestor| ancestor.name == root)
			|| shape.base.as_deref() == Some(root)
	}

	/// `shape` followed by its bases, as far as they're known in the unit.
	fn ancestry<'a>(&'a self, shape: &'a TypeShape) -> impl Iterator<Item = &'a TypeShape> + 'a {
		let mut next = Some(shape);
		let mut depth = 0;
		std::iter::from_fn(move || {
			let current = next?;
			// Guard against base cycles in malformed input
			depth += 1;
			next = match (&current.base, depth < 64) {
				(Some(base), true) => self.unit.get(base.as_str()).copied(),
				_ => None,
			};
			Some(current)
		})
	}
}
