//! `#[derive(Packable)]` for `ser_pack`.
//!
//! The type's shape is checked against the acceptance rules in
//! `ser_pack_shape` before any code is generated. Each violated rule is
//! reported as a compile error at the offending item, prefixed with its
//! `PACK0NN` identifier.

use proc_macro2::TokenStream;
use syn::{parse_macro_input, parse_quote, Data, DeriveInput, Error, GenericParam, Generics};

mod attrs;
mod enums;
mod model;
mod structs;
mod types;

use attrs::container_attrs;
use enums::derive_enum;
use structs::derive_struct;

/// Derive `Packable`.
///
/// Container attributes:
/// * `#[pack(collection)]`: encode as the single collection field.
/// * `#[pack(constructor(new, a, b))]`: decode by calling `Self::new(a, b)`.
/// * `#[pack(on_serializing = "method")]` (also `on_serialized`,
///   `on_deserializing`, `on_deserialized`): lifecycle hooks. Serialization
///   hooks take `&self`, `on_deserializing` is an associated function, and
///   `on_deserialized` takes `&mut self`.
///
/// Ignored fields are decoded as `Default::default()`, unless a constructor
/// creates the value.
///
/// Field attributes: `#[pack(ignore)]`, `#[pack(include)]`,
/// `#[pack(order = N)]`.
///
/// Variant attributes: `#[pack(tag = N)]`.
#[proc_macro_derive(Packable, attributes(pack))]
pub fn packable(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
	let input = parse_macro_input!(input as DeriveInput);
	packable_impl(input)
		.unwrap_or_else(|error| error.to_compile_error())
		.into()
}

fn packable_impl(input: DeriveInput) -> syn::Result<TokenStream> {
	let attrs = container_attrs(&input.attrs)?;
	let generics = get_generics(&input.generics);

	match &input.data {
		Data::Struct(data) => derive_struct(data, &input, attrs, generics),
		Data::Enum(data) => derive_enum(data, &input, attrs, generics),
		Data::Union(_) => {
			Err(Error::new_spanned(
				&input.ident,
				"deriving `Packable` on unions is not supported",
			))
		}
	}
}

/// Amend generics to add `Packable` bound to each type parameter.
fn get_generics(generics: &Generics) -> Generics {
	let mut generics = generics.clone();
	let params = generics
		.params
		.iter()
		.filter_map(|param| {
			match param {
				GenericParam::Type(param) => Some(param.ident.clone()),
				_ => None,
			}
		})
		.collect::<Vec<_>>();

	let where_clause = generics.make_where_clause();
	for param in params {
		where_clause
			.predicates
			.push(parse_quote!(#param: ::ser_pack::Packable));
	}
	generics
}
