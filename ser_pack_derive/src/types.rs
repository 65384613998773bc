use quote::ToTokens;
use ser_pack_shape::{CollectionCapability, Scalar, TypeRef};
use syn::{
	Expr, GenericArgument, Lit, Path, PathArguments, PathSegment, Type, TypeParamBound,
	TypeTraitObject,
};

/// Describe a field's type for the shape validator.
///
/// Only the structure matters here. Whether a named type is actually
/// `Packable` is left to the trait system.
pub fn classify(ty: &Type) -> TypeRef {
	match ty {
		Type::Reference(_) => TypeRef::StackOnly(type_name(ty)),
		Type::BareFn(_) => TypeRef::Delegate,
		Type::Ptr(_) => TypeRef::Pointer,
		Type::TraitObject(object) => classify_trait_object(object),
		Type::Slice(_) => TypeRef::ArrayBase,
		Type::Array(array) => TypeRef::Array(Box::new(classify(&array.elem)), array_len(&array.len)),
		Type::Tuple(tuple) if tuple.elems.is_empty() => TypeRef::Scalar(Scalar::Unit),
		Type::Tuple(tuple) => TypeRef::Tuple(tuple.elems.iter().map(classify).collect()),
		Type::Paren(paren) => classify(&paren.elem),
		Type::Group(group) => classify(&group.elem),
		Type::Path(path) if path.qself.is_none() => classify_path(&path.path),
		_ => TypeRef::named(type_name(ty)),
	}
}

/// Collection capability of a type, for `#[pack(collection)]`.
pub fn capability(ty: &Type) -> Option<CollectionCapability> {
	let segment = match ty {
		Type::Path(path) if path.qself.is_none() => path.path.segments.last()?,
		_ => return None,
	};
	match segment.ident.to_string().as_str() {
		"Vec" | "VecDeque" | "LinkedList" | "BinaryHeap" => Some(CollectionCapability::List),
		"HashSet" | "BTreeSet" => Some(CollectionCapability::Set),
		"HashMap" | "BTreeMap" => Some(CollectionCapability::Map),
		_ => None,
	}
}

fn classify_path(path: &Path) -> TypeRef {
	let segment = match path.segments.last() {
		Some(segment) => segment,
		None => return TypeRef::named(type_name(path)),
	};
	let name = segment.ident.to_string();

	if path.segments.len() == 1 {
		if let Some(scalar) = Scalar::from_name(&name) {
			return TypeRef::Scalar(scalar);
		}
	}

	match (name.as_str(), type_args(segment).as_slice()) {
		("String", []) => TypeRef::String,
		("PhantomData", _) => TypeRef::Scalar(Scalar::Unit),
		("Option", [inner]) => TypeRef::nullable(classify(inner)),
		("Vec" | "VecDeque" | "LinkedList" | "HashSet" | "BTreeSet" | "BinaryHeap", [inner, ..]) => {
			TypeRef::sequence(classify(inner))
		}
		("HashMap" | "BTreeMap", [key, value, ..]) => TypeRef::map(classify(key), classify(value)),
		("Box" | "Rc" | "Arc", [inner]) => {
			match inner {
				Type::Slice(slice) => TypeRef::sequence(classify(&slice.elem)),
				Type::Path(path) if path.path.is_ident("str") => TypeRef::String,
				_ => classify(inner),
			}
		}
		_ => TypeRef::named(type_name(path)),
	}
}

fn classify_trait_object(object: &TypeTraitObject) -> TypeRef {
	let traits = object.bounds.iter().filter_map(|bound| {
		match bound {
			TypeParamBound::Trait(bound) => bound.path.segments.last(),
			TypeParamBound::Lifetime(_) => None,
		}
	});
	for segment in traits {
		match segment.ident.to_string().as_str() {
			"Any" => return TypeRef::Object,
			"Fn" | "FnMut" | "FnOnce" => return TypeRef::Delegate,
			_ => {}
		}
	}
	// Union root trait, packable through `union_root!`
	TypeRef::named(type_name(object))
}

fn type_args(segment: &PathSegment) -> Vec<&Type> {
	match &segment.arguments {
		PathArguments::AngleBracketed(args) => {
			args
				.args
				.iter()
				.filter_map(|arg| {
					match arg {
						GenericArgument::Type(ty) => Some(ty),
						_ => None,
					}
				})
				.collect()
		}
		_ => Vec::new(),
	}
}

fn array_len(len: &Expr) -> usize {
	match len {
		Expr::Lit(expr) => {
			match &expr.lit {
				Lit::Int(int) => int.base10_parse().unwrap_or(0),
				_ => 0,
			}
		}
		_ => 0,
	}
}

fn type_name(tokens: &impl ToTokens) -> String {
	tokens.to_token_stream().to_string().replace(' ', "")
}
