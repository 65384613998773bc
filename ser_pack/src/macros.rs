/// Declare a trait as a union root, dispatching on the concrete type of a
/// `Box<dyn Trait>`.
///
/// Each variant is listed with its wire tag. Tags must be unique per root:
/// duplicates fail to compile. The trait must have [`AsAny`] as a supertrait,
/// and every variant must implement [`Packable`] and the trait.
///
/// Implements [`Packable`] for `Box<dyn Trait>` and [`UnionDispatch`] for
/// `dyn Trait`.
///
/// ```
/// use ser_pack::{union_root, AsAny, Packable};
///
/// trait Shape: AsAny {
/// 	fn area(&self) -> f64;
/// }
///
/// #[derive(Packable)]
/// struct Circle {
/// 	radius: f64,
/// }
///
/// #[derive(Packable)]
/// struct Square {
/// 	side: f64,
/// }
///
/// impl Shape for Circle {
/// 	fn area(&self) -> f64 {
/// 		std::f64::consts::PI * self.radius * self.radius
/// 	}
/// }
///
/// impl Shape for Square {
/// 	fn area(&self) -> f64 {
/// 		self.side * self.side
/// 	}
/// }
///
/// union_root!(Shape {
/// 	0 => Circle,
/// 	1 => Square,
/// });
///
/// let shape: Box<dyn Shape> = Box::new(Square { side: 2.0 });
/// let bytes = ser_pack::serialize(&shape).unwrap();
/// assert_eq!(bytes[0], 1);
///
/// let shape = ser_pack::deserialize::<Box<dyn Shape>>(&bytes).unwrap();
/// assert_eq!(shape.area(), 4.0);
/// ```
///
/// [`AsAny`]: crate::AsAny
/// [`Packable`]: crate::Packable
/// [`UnionDispatch`]: crate::UnionDispatch
#[macro_export]
macro_rules! union_root {
	($root:ident { $($tag:literal => $variant:ty),+ $(,)? }) => {
		const _: () = {
			let tags: &[u16] = &[$($tag),+];
			let mut i = 0;
			while i < tags.len() {
				let mut j = i + 1;
				while j < tags.len() {
					if tags[i] == tags[j] {
						panic!(concat!("duplicate union tag in `", stringify!($root), "`"));
					}
					j += 1;
				}
				i += 1;
			}
		};

		impl $crate::UnionDispatch for dyn $root {
			fn union_table() -> &'static $crate::Result<$crate::UnionTable<Self>> {
				static TABLE: ::std::sync::OnceLock<$crate::Result<$crate::UnionTable<dyn $root>>> =
					::std::sync::OnceLock::new();
				TABLE.get_or_init(|| {
					$crate::UnionTable::<dyn $root>::builder(stringify!($root))
						$(
							.variant::<$variant>(
								$tag,
								|value: $variant| -> ::std::boxed::Box<dyn $root> {
									::std::boxed::Box::new(value)
								},
							)
						)+
						.build()
				})
			}
		}

		impl $crate::Packable for ::std::boxed::Box<dyn $root> {
			const MIN_SIZE: usize = 1;

			fn pack(&self, writer: &mut $crate::BufferWriter) -> $crate::Result<()> {
				match <dyn $root as $crate::UnionDispatch>::union_table() {
					Ok(table) => table.encode(&**self, writer),
					Err(error) => Err(error.clone()),
				}
			}

			fn unpack(reader: &mut $crate::BufferReader<'_>) -> $crate::Result<Self> {
				match <dyn $root as $crate::UnionDispatch>::union_table() {
					Ok(table) => table.decode(reader),
					Err(error) => Err(error.clone()),
				}
			}
		}
	};
}
