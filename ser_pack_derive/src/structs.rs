use proc_macro2::{Span, TokenStream};
use quote::{quote, quote_spanned};
use ser_pack_shape::{
	ConstructorPlan, ConstructorShape, GenerateMode, HookKind, HookShape, ShapeDescriptor, TypeShape,
};
use syn::{spanned::Spanned, DataStruct, DeriveInput, Error, Fields, Generics, Ident, Result};

use crate::{
	attrs::ContainerAttrs,
	model::{by_name, members, validate, Member, Spans},
	types::capability,
};

pub fn derive_struct(
	data: &DataStruct,
	input: &DeriveInput,
	attrs: ContainerAttrs,
	generics: Generics,
) -> Result<TokenStream> {
	let ident = &input.ident;
	let name = ident.to_string();
	let members = members(&data.fields)?;

	let shape = struct_shape(&name, input, &attrs, &members);

	let mut spans = Spans::default();
	spans.add_type(&name, ident.span());
	for constructor in &attrs.constructors {
		for param in &constructor.params {
			spans.add_member(&name, &param.to_string(), param.span());
		}
	}
	for (_, method) in &attrs.hooks {
		spans.add_member(&name, &method.to_string(), method.span());
	}
	spans.add_members(&name, &members);

	let report = validate(&[shape], &spans)?;
	let descriptor = report
		.descriptor(&name)
		.ok_or_else(|| Error::new(ident.span(), "type was not accepted"))?;

	let body = match descriptor.mode {
		GenerateMode::Object => object_impl(data, &name, &attrs, &members, descriptor)?,
		GenerateMode::Collection => collection_impl(data, &attrs, &members)?,
	};

	let member_names = descriptor.member_names();
	let (impl_generics, type_generics, where_clause) = generics.split_for_impl();

	Ok(quote! {
		#[automatically_derived]
		impl #impl_generics ::ser_pack::Packable for #ident #type_generics #where_clause {
			#body
		}

		#[automatically_derived]
		impl #impl_generics ::ser_pack::Described for #ident #type_generics #where_clause {
			const NAME: &'static str = #name;
			const MEMBERS: &'static [&'static str] = &[#(#member_names),*];
		}
	})
}

fn struct_shape(
	name: &str,
	input: &DeriveInput,
	attrs: &ContainerAttrs,
	members: &[Member],
) -> TypeShape {
	let mut shape = TypeShape::class(name).sealed();

	// A borrowing struct is a view into data it doesn't own
	if input.generics.lifetimes().next().is_some() {
		shape = shape.stack_only();
	}

	if attrs.collection.is_some() {
		shape = shape.collection_mode();
		if let [member] = members {
			if let Some(capability) = capability(member.ty()) {
				shape = shape.collection(capability);
			}
		}
	}

	for member in members {
		shape = shape.member(member.shape());
	}
	for constructor in &attrs.constructors {
		let params = constructor.params.iter().map(Ident::to_string);
		shape = shape.constructor(ConstructorShape::new(params).designated());
	}
	for (kind, method) in &attrs.hooks {
		shape = shape.hook(HookShape::new(*kind, method.to_string()));
	}
	shape
}

fn hooks(attrs: &ContainerAttrs, kind: HookKind) -> Vec<&Ident> {
	attrs
		.hooks
		.iter()
		.filter(|(hook_kind, _)| *hook_kind == kind)
		.map(|(_, method)| method)
		.collect()
}

/// Aggregate: member count header, then each member in wire order.
fn object_impl(
	data: &DataStruct,
	name: &str,
	attrs: &ContainerAttrs,
	members: &[Member],
	descriptor: &ShapeDescriptor,
) -> Result<TokenStream> {
	let ordered = descriptor
		.members
		.iter()
		.map(|member| by_name(members, &member.name))
		.collect::<Result<Vec<_>>>()?;
	// Validator caps serialized members at 249
	let count = ordered.len() as u8;

	let pack_stmts = ordered.iter().map(|member| {
		let accessor = &member.accessor;
		quote_spanned! {member.field.span()=>
			::ser_pack::Packable::pack(&self.#accessor, writer)?;
		}
	});
	let unpack_stmts = ordered.iter().map(|member| {
		let binding = &member.binding;
		let ty = member.ty();
		quote_spanned! {member.field.span()=>
			let #binding = <#ty as ::ser_pack::Packable>::unpack(reader)?;
		}
	});

	let construct = match &descriptor.constructor {
		ConstructorPlan::Parameterized { params } => {
			let constructor = attrs.constructors.first().ok_or_else(|| {
				Error::new(Span::call_site(), "parameterized plan without a constructor")
			})?;
			let function = &constructor.function;
			let args = params.iter().map(|&position| &ordered[position].binding);
			let assigns = assign_members(
				ordered
					.iter()
					.enumerate()
					.filter(|(position, _)| !params.contains(position))
					.map(|(_, member)| *member),
			);
			quote! {
				#[allow(unused_mut)]
				let mut value = Self::#function(#(#args),*);
				#assigns
			}
		}
		ConstructorPlan::Parameterless => {
			let constructor = attrs.constructors.first().map(|constructor| &constructor.function);
			construct_parameterless(&data.fields, members, constructor)
		}
	};

	let on_serializing = hooks(attrs, HookKind::OnSerializing);
	let on_serialized = hooks(attrs, HookKind::OnSerialized);
	let on_deserializing = hooks(attrs, HookKind::OnDeserializing);
	let on_deserialized = hooks(attrs, HookKind::OnDeserialized);

	Ok(quote! {
		const MIN_SIZE: usize = 1;

		fn pack(&self, writer: &mut ::ser_pack::BufferWriter) -> ::ser_pack::Result<()> {
			#(self.#on_serializing();)*
			writer.write_member_count(#count)?;
			#(#pack_stmts)*
			#(self.#on_serialized();)*
			Ok(())
		}

		fn unpack(reader: &mut ::ser_pack::BufferReader<'_>) -> ::ser_pack::Result<Self> {
			#(Self::#on_deserializing();)*
			reader.nested(|reader| {
				reader.read_member_count(#count, #name)?;
				#(#unpack_stmts)*
				#construct
				#(value.#on_deserialized();)*
				Ok(value)
			})
		}
	})
}

/// Encoded exactly as the single collection field, with no header.
fn collection_impl(
	data: &DataStruct,
	attrs: &ContainerAttrs,
	members: &[Member],
) -> Result<TokenStream> {
	let member = match members {
		[member] => member,
		_ => return Err(Error::new(Span::call_site(), "collection needs exactly one field")),
	};
	if member.attrs.ignore {
		return Err(Error::new_spanned(
			member.field,
			"the field of a collection cannot be ignored",
		));
	}
	let accessor = &member.accessor;
	let binding = &member.binding;
	let ty = member.ty();

	let constructor = attrs
		.constructors
		.iter()
		.find(|constructor| constructor.params.is_empty())
		.map(|constructor| &constructor.function);
	let construct = construct_parameterless(&data.fields, members, constructor);

	let on_serializing = hooks(attrs, HookKind::OnSerializing);
	let on_serialized = hooks(attrs, HookKind::OnSerialized);
	let on_deserializing = hooks(attrs, HookKind::OnDeserializing);
	let on_deserialized = hooks(attrs, HookKind::OnDeserialized);

	Ok(quote! {
		const MIN_SIZE: usize = <#ty as ::ser_pack::Packable>::MIN_SIZE;

		fn pack(&self, writer: &mut ::ser_pack::BufferWriter) -> ::ser_pack::Result<()> {
			#(self.#on_serializing();)*
			::ser_pack::Packable::pack(&self.#accessor, writer)?;
			#(self.#on_serialized();)*
			Ok(())
		}

		fn unpack(reader: &mut ::ser_pack::BufferReader<'_>) -> ::ser_pack::Result<Self> {
			#(Self::#on_deserializing();)*
			let #binding = <#ty as ::ser_pack::Packable>::unpack(reader)?;
			#construct
			#(value.#on_deserialized();)*
			Ok(value)
		}
	})
}

/// Bind `value`, either by calling a parameterless `constructor` and
/// assigning serialized members, or as a struct literal with ignored members
/// defaulted.
fn construct_parameterless(
	fields: &Fields,
	members: &[Member],
	constructor: Option<&Ident>,
) -> TokenStream {
	if let Some(function) = constructor {
		let assigns = assign_members(members.iter().filter(|member| !member.attrs.ignore));
		return quote! {
			#[allow(unused_mut)]
			let mut value = Self::#function();
			#assigns
		};
	}

	let values = members.iter().map(|member| {
		if member.attrs.ignore {
			quote_spanned! {member.field.span()=> ::core::default::Default::default()}
		} else {
			let binding = &member.binding;
			quote!(#binding)
		}
	});
	let literal = match fields {
		Fields::Named(_) => {
			let accessors = members.iter().map(|member| &member.accessor);
			quote!(Self { #(#accessors: #values),* })
		}
		Fields::Unnamed(_) => quote!(Self(#(#values),*)),
		Fields::Unit => quote!(Self),
	};
	quote! {
		#[allow(unused_mut)]
		let mut value = #literal;
	}
}

fn assign_members<'m, 'a: 'm>(members: impl Iterator<Item = &'m Member<'a>>) -> TokenStream {
	let assigns = members.map(|member| {
		let accessor = &member.accessor;
		let binding = &member.binding;
		quote!(value.#accessor = #binding;)
	});
	quote!(#(#assigns)*)
}
