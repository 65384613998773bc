use proc_macro2::TokenStream;
use quote::{quote, quote_spanned};
use ser_pack_shape::{ShapeDescriptor, TypeShape};
use syn::{spanned::Spanned, DataEnum, DeriveInput, Error, Fields, Generics, Result, Variant};

use crate::{
	attrs::{variant_attrs, ContainerAttrs},
	model::{by_name, members, validate, Member, Spans},
};

/// Enum variant, as a case of the enum's union.
struct Case<'a> {
	variant: &'a Variant,
	/// `Enum::Variant`
	name: String,
	tag: u16,
	members: Vec<Member<'a>>,
}

impl<'a> Case<'a> {
	/// Single unnamed field, encoded directly after the tag.
	fn is_newtype(&self) -> bool {
		matches!(self.variant.fields, Fields::Unnamed(_))
			&& matches!(self.members.as_slice(), [member] if !member.attrs.ignore)
	}

	fn shape(&self, root: &str) -> TypeShape {
		let mut shape = TypeShape::class(&self.name).base(root);
		for member in &self.members {
			shape = shape.member(member.shape());
		}
		shape
	}
}

pub fn derive_enum(
	data: &DataEnum,
	input: &DeriveInput,
	attrs: ContainerAttrs,
	generics: Generics,
) -> Result<TokenStream> {
	let ident = &input.ident;
	let name = ident.to_string();

	if let Some((_, method)) = attrs.hooks.first() {
		return Err(Error::new_spanned(method, "hooks are not supported on enums"));
	}
	if let Some(constructor) = attrs.constructors.first() {
		return Err(Error::new_spanned(
			&constructor.function,
			"constructors are not supported on enums",
		));
	}

	let cases = data
		.variants
		.iter()
		.enumerate()
		.map(|(index, variant)| {
			let tag = match variant_attrs(&variant.attrs)?.tag {
				Some(tag) => tag,
				None => {
					u16::try_from(index)
						.map_err(|_| Error::new_spanned(&variant.ident, "too many variants"))?
				}
			};
			Ok(Case {
				variant,
				name: format!("{}::{}", name, variant.ident),
				tag,
				members: members(&variant.fields)?,
			})
		})
		.collect::<Result<Vec<_>>>()?;

	let mut root = TypeShape::abstract_class(&name);
	if input.generics.lifetimes().next().is_some() {
		root = root.stack_only();
	}
	if attrs.collection.is_some() {
		root = root.collection_mode();
	}
	for case in &cases {
		root = root.union_case(case.tag, &case.name);
	}

	let mut shapes = vec![root];
	let mut spans = Spans::default();
	spans.add_type(&name, ident.span());
	for case in &cases {
		shapes.push(case.shape(&name));
		spans.add_type(&case.name, case.variant.ident.span());
		spans.add_members(&case.name, &case.members);
	}

	let report = validate(&shapes, &spans)?;
	let descriptor = report
		.descriptor(&name)
		.ok_or_else(|| Error::new(ident.span(), "type was not accepted"))?;

	let mut pack_arms = Vec::with_capacity(cases.len());
	let mut unpack_arms = Vec::with_capacity(cases.len());
	for case in &cases {
		let case_descriptor = report
			.descriptor(&case.name)
			.ok_or_else(|| Error::new(case.variant.ident.span(), "variant was not accepted"))?;
		let (pack_arm, unpack_arm) = case_arms(case, case_descriptor)?;
		pack_arms.push(pack_arm);
		unpack_arms.push(unpack_arm);
	}

	let tag_arms = cases.iter().map(|case| {
		let variant_ident = &case.variant.ident;
		let tag = case.tag;
		quote!(Self::#variant_ident { .. } => #tag,)
	});
	let case_entries = descriptor.union_cases.iter().map(|case| {
		let tag = case.tag;
		let variant = &case.variant;
		quote!((#tag, #variant))
	});

	let (impl_generics, type_generics, where_clause) = generics.split_for_impl();

	Ok(quote! {
		#[automatically_derived]
		impl #impl_generics ::ser_pack::Packable for #ident #type_generics #where_clause {
			const MIN_SIZE: usize = 1;

			fn pack(&self, writer: &mut ::ser_pack::BufferWriter) -> ::ser_pack::Result<()> {
				match self {
					#(#pack_arms)*
				}
				Ok(())
			}

			fn unpack(reader: &mut ::ser_pack::BufferReader<'_>) -> ::ser_pack::Result<Self> {
				reader.nested(|reader| {
					match reader.read_tag()? {
						#(#unpack_arms)*
						tag => Err(::ser_pack::unknown_tag(#name, tag)),
					}
				})
			}
		}

		#[automatically_derived]
		impl #impl_generics ::ser_pack::UnionRoot for #ident #type_generics #where_clause {
			const CASES: &'static [(u16, &'static str)] = &[#(#case_entries),*];

			#[inline]
			fn tag(&self) -> u16 {
				match self {
					#(#tag_arms)*
				}
			}
		}

		#[automatically_derived]
		impl #impl_generics ::ser_pack::Described for #ident #type_generics #where_clause {
			const NAME: &'static str = #name;
			const MEMBERS: &'static [&'static str] = &[];
		}
	})
}

/// Match arms encoding and decoding one variant.
fn case_arms(case: &Case, descriptor: &ShapeDescriptor) -> Result<(TokenStream, TokenStream)> {
	let variant_ident = &case.variant.ident;
	let tag = case.tag;
	let span = case.variant.span();

	match &case.variant.fields {
		Fields::Unit => {
			return Ok((
				quote_spanned! {span=> Self::#variant_ident => writer.write_tag(#tag)?, },
				quote_spanned! {span=> #tag => Ok(Self::#variant_ident), },
			));
		}
		_ if case.is_newtype() => {
			let member = &case.members[0];
			let binding = &member.binding;
			let ty = member.ty();
			return Ok((
				quote_spanned! {span=>
					Self::#variant_ident(#binding) => {
						writer.write_tag(#tag)?;
						::ser_pack::Packable::pack(#binding, writer)?;
					}
				},
				quote_spanned! {span=>
					#tag => Ok(Self::#variant_ident(<#ty as ::ser_pack::Packable>::unpack(reader)?)),
				},
			));
		}
		_ => {}
	}

	let ordered = descriptor
		.members
		.iter()
		.map(|member| by_name(&case.members, &member.name))
		.collect::<Result<Vec<_>>>()?;
	// Validator caps serialized members at 249
	let count = ordered.len() as u8;
	let case_name = &case.name;

	let pattern = match &case.variant.fields {
		Fields::Named(_) => {
			let bindings = case
				.members
				.iter()
				.filter(|member| !member.attrs.ignore)
				.map(|member| {
					let accessor = &member.accessor;
					let binding = &member.binding;
					quote!(#accessor: #binding)
				});
			quote!(Self::#variant_ident { #(#bindings,)* .. })
		}
		_ => {
			let bindings = case.members.iter().map(|member| {
				if member.attrs.ignore {
					quote!(_)
				} else {
					let binding = &member.binding;
					quote!(#binding)
				}
			});
			quote!(Self::#variant_ident(#(#bindings),*))
		}
	};

	let values = case.members.iter().map(|member| {
		if member.attrs.ignore {
			quote_spanned! {member.field.span()=> ::core::default::Default::default()}
		} else {
			let binding = &member.binding;
			quote!(#binding)
		}
	});
	let literal = match &case.variant.fields {
		Fields::Named(_) => {
			let accessors = case.members.iter().map(|member| &member.accessor);
			quote!(Self::#variant_ident { #(#accessors: #values),* })
		}
		_ => quote!(Self::#variant_ident(#(#values),*)),
	};

	let pack_stmts = ordered.iter().map(|member| {
		let binding = &member.binding;
		quote_spanned! {member.field.span()=>
			::ser_pack::Packable::pack(#binding, writer)?;
		}
	});
	let unpack_stmts = ordered.iter().map(|member| {
		let binding = &member.binding;
		let ty = member.ty();
		quote_spanned! {member.field.span()=>
			let #binding = <#ty as ::ser_pack::Packable>::unpack(reader)?;
		}
	});

	Ok((
		quote_spanned! {span=>
			#pattern => {
				writer.write_tag(#tag)?;
				writer.write_member_count(#count)?;
				#(#pack_stmts)*
			}
		},
		quote_spanned! {span=>
			#tag => {
				reader.read_member_count(#count, #case_name)?;
				#(#unpack_stmts)*
				Ok(#literal)
			}
		},
	))
}
