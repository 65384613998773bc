//! Structural acceptance rules for `ser_pack` derivation.
//!
//! A front end describes each candidate type as a [`TypeShape`], then runs a
//! [`Validator`] over the whole acceptance unit. Accepted types come back as
//! [`ShapeDescriptor`]s giving the stable wire order of their members and how
//! to construct them on decode. Rejected types come back as [`Diagnostic`]s,
//! each naming exactly one [`Rule`].
//!
//! ```
//! use ser_pack_shape::{MemberShape, Rule, Scalar, TypeRef, TypeShape, Validator};
//!
//! let shapes = [TypeShape::class("Point")
//! 	.member(MemberShape::new("x", TypeRef::Scalar(Scalar::I32)))
//! 	.member(MemberShape::new("y", TypeRef::Scalar(Scalar::I32)))
//! 	.nested_in("Canvas")];
//!
//! let report = Validator::new().validate(&shapes);
//! assert_eq!(report.rules(), [Rule::NestedNotAllowed]);
//! ```

mod descriptor;
mod rule;
mod shape;
mod validate;

pub use descriptor::{ConstructorPlan, DescribedMember, ShapeDescriptor};
pub use rule::{Diagnostic, Rule};
pub use shape::{
	CollectionCapability, ConstructorShape, GenerateMode, HookKind, HookShape, MemberAnnotation,
	MemberShape, Scalar, TypeKind, TypeRef, TypeShape, UnionCase, Visibility,
};
pub use validate::{Report, Validator, MAX_MEMBERS};
