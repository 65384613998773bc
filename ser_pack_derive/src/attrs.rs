use proc_macro2::Span;
use ser_pack_shape::HookKind;
use syn::{spanned::Spanned, Attribute, Error, Ident, Lit, Meta, NestedMeta, Path, Result};

/// `#[pack(...)]` options on a struct or enum.
#[derive(Default)]
pub struct ContainerAttrs {
	pub collection: Option<Span>,
	pub constructors: Vec<Constructor>,
	pub hooks: Vec<(HookKind, Ident)>,
}

/// `#[pack(constructor(new, a, b))]`
pub struct Constructor {
	pub function: Ident,
	pub params: Vec<Ident>,
}

/// `#[pack(...)]` options on a field.
#[derive(Default)]
pub struct FieldAttrs {
	pub ignore: bool,
	pub include: bool,
	pub order: Option<u16>,
}

/// `#[pack(...)]` options on an enum variant.
#[derive(Default)]
pub struct VariantAttrs {
	pub tag: Option<u16>,
}

/// Collect the items of all `#[pack(...)]` attributes.
fn pack_items(attrs: &[Attribute]) -> Result<Vec<NestedMeta>> {
	let mut items = Vec::new();
	for attr in attrs.iter().filter(|attr| attr.path.is_ident("pack")) {
		match attr.parse_meta()? {
			Meta::List(list) => items.extend(list.nested),
			meta => return Err(Error::new_spanned(meta, "expected `#[pack(...)]`")),
		}
	}
	Ok(items)
}

fn unknown(item: &NestedMeta) -> Error {
	Error::new_spanned(item, "unrecognised `pack` attribute")
}

fn path_ident(path: &Path) -> Result<Ident> {
	path
		.get_ident()
		.cloned()
		.ok_or_else(|| Error::new_spanned(path, "expected an identifier"))
}

fn int_lit(lit: &Lit) -> Result<u16> {
	match lit {
		Lit::Int(int) => int.base10_parse::<u16>(),
		_ => Err(Error::new_spanned(lit, "expected an integer")),
	}
}

pub fn container_attrs(attrs: &[Attribute]) -> Result<ContainerAttrs> {
	let mut parsed = ContainerAttrs::default();
	for item in pack_items(attrs)? {
		match &item {
			NestedMeta::Meta(Meta::Path(path)) if path.is_ident("collection") => {
				parsed.collection = Some(path.span());
			}
			NestedMeta::Meta(Meta::List(list)) if list.path.is_ident("constructor") => {
				let mut idents = list
					.nested
					.iter()
					.map(|nested| {
						match nested {
							NestedMeta::Meta(Meta::Path(path)) => path_ident(path),
							_ => Err(Error::new_spanned(nested, "expected an identifier")),
						}
					})
					.collect::<Result<Vec<_>>>()?
					.into_iter();
				let function = idents.next().ok_or_else(|| {
					Error::new_spanned(
						list,
						"expected constructor function name e.g. `#[pack(constructor(new, a, b))]`",
					)
				})?;
				parsed.constructors.push(Constructor {
					function,
					params: idents.collect(),
				});
			}
			NestedMeta::Meta(Meta::NameValue(name_value)) => {
				let kind = if name_value.path.is_ident("on_serializing") {
					HookKind::OnSerializing
				} else if name_value.path.is_ident("on_serialized") {
					HookKind::OnSerialized
				} else if name_value.path.is_ident("on_deserializing") {
					HookKind::OnDeserializing
				} else if name_value.path.is_ident("on_deserialized") {
					HookKind::OnDeserialized
				} else {
					return Err(unknown(&item));
				};
				let method = match &name_value.lit {
					Lit::Str(method) => method.parse::<Ident>()?,
					lit => return Err(Error::new_spanned(lit, "expected method name as a string")),
				};
				parsed.hooks.push((kind, method));
			}
			_ => return Err(unknown(&item)),
		}
	}
	Ok(parsed)
}

pub fn field_attrs(attrs: &[Attribute]) -> Result<FieldAttrs> {
	let mut parsed = FieldAttrs::default();
	for item in pack_items(attrs)? {
		match &item {
			NestedMeta::Meta(Meta::Path(path)) if path.is_ident("ignore") => parsed.ignore = true,
			NestedMeta::Meta(Meta::Path(path)) if path.is_ident("include") => parsed.include = true,
			NestedMeta::Meta(Meta::NameValue(name_value)) if name_value.path.is_ident("order") => {
				parsed.order = Some(int_lit(&name_value.lit)?);
			}
			_ => return Err(unknown(&item)),
		}
	}
	if parsed.ignore && parsed.include {
		return Err(Error::new(
			Span::call_site(),
			"a field cannot be both `ignore` and `include`",
		));
	}
	Ok(parsed)
}

pub fn variant_attrs(attrs: &[Attribute]) -> Result<VariantAttrs> {
	let mut parsed = VariantAttrs::default();
	for item in pack_items(attrs)? {
		match &item {
			NestedMeta::Meta(Meta::NameValue(name_value)) if name_value.path.is_ident("tag") => {
				parsed.tag = Some(int_lit(&name_value.lit)?);
			}
			_ => return Err(unknown(&item)),
		}
	}
	Ok(parsed)
}
