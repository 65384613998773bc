use std::collections::HashMap;

use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote};
use ser_pack_shape::{Diagnostic, MemberShape, Report, TypeShape, Validator};
use syn::{spanned::Spanned, Error, Field, Fields, Ident, Index, Result, Type};

use crate::{
	attrs::{field_attrs, FieldAttrs},
	types::classify,
};

/// A struct or variant field.
pub struct Member<'a> {
	pub field: &'a Field,
	/// Field name, or index for tuple fields.
	pub name: String,
	/// `name` or `0`, for `self.#accessor`.
	pub accessor: TokenStream,
	/// Local the decoded value is bound to.
	pub binding: Ident,
	pub attrs: FieldAttrs,
}

impl<'a> Member<'a> {
	#[inline]
	pub fn ty(&self) -> &'a Type {
		&self.field.ty
	}

	pub fn shape(&self) -> MemberShape {
		// Rust fields are all treated as public.
		// Private fields of other modules aren't visible here anyway.
		let mut shape = MemberShape::new(&self.name, classify(&self.field.ty));
		if self.attrs.ignore {
			shape = shape.ignore();
		} else if self.attrs.include {
			shape = shape.include();
		}
		if let Some(order) = self.attrs.order {
			shape = shape.order(order);
		}
		shape
	}
}

pub fn members(fields: &Fields) -> Result<Vec<Member<'_>>> {
	fields
		.iter()
		.enumerate()
		.map(|(index, field)| {
			let attrs = field_attrs(&field.attrs)?;
			let member = match &field.ident {
				Some(ident) => {
					Member {
						field,
						name: ident.to_string(),
						accessor: quote!(#ident),
						binding: format_ident!("__{}", ident),
						attrs,
					}
				}
				None => {
					let accessor = Index::from(index);
					Member {
						field,
						name: index.to_string(),
						accessor: quote!(#accessor),
						binding: format_ident!("__{}", index),
						attrs,
					}
				}
			};
			Ok(member)
		})
		.collect()
}

/// Find member by its name in a validated descriptor.
pub fn by_name<'m, 'a>(members: &'m [Member<'a>], name: &str) -> Result<&'m Member<'a>> {
	members
		.iter()
		.find(|member| member.name == name)
		.ok_or_else(|| Error::new(Span::call_site(), format!("unknown member `{}`", name)))
}

/// Source locations to attach diagnostics to.
#[derive(Default)]
pub struct Spans {
	types: HashMap<String, Span>,
	members: HashMap<(String, String), Span>,
}

impl Spans {
	pub fn add_type(&mut self, name: &str, span: Span) {
		self.types.insert(name.to_string(), span);
	}

	pub fn add_member(&mut self, type_name: &str, member: &str, span: Span) {
		self
			.members
			.insert((type_name.to_string(), member.to_string()), span);
	}

	pub fn add_members(&mut self, type_name: &str, members: &[Member]) {
		for member in members {
			self.add_member(type_name, &member.name, member.field.span());
		}
	}

	fn locate(&self, diagnostic: &Diagnostic) -> Span {
		let member = diagnostic.member.as_ref().and_then(|member| {
			self
				.members
				.get(&(diagnostic.type_name.clone(), member.clone()))
				.or_else(|| self.types.get(member))
		});
		member
			.or_else(|| self.types.get(&diagnostic.type_name))
			.copied()
			.unwrap_or_else(Span::call_site)
	}
}

/// Run the shape rules over the acceptance unit.
/// Every rejection becomes a compile error at the offending item.
pub fn validate(shapes: &[TypeShape], spans: &Spans) -> Result<Report> {
	// Named member types are checked by the trait system instead
	let report = Validator::new()
		.defer_unknown_types(true)
		.validate(shapes);

	let mut errors = report
		.diagnostics
		.iter()
		.map(|diagnostic| Error::new(spans.locate(diagnostic), diagnostic.to_string()));
	match errors.next() {
		Some(mut error) => {
			for other in errors {
				error.combine(other);
			}
			Err(error)
		}
		None => Ok(report),
	}
}
