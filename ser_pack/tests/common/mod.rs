mod library_data;
pub use library_data::generate_data as generate_library_data;

pub enum Test {
	Primitives,
	NonZeroNumbers,
	Arrays,
	ArraysOfBoxes,
	Tuples,
	EnumFieldless,
	EnumNewtypes,
	EnumAggregates,
	BoxedPrimitives,
	BoxedStructs,
	VecOfPrimitives,
	VecOfVecs,
	Strings,
	Options,
	Collections,
	Maps,
	Zeroed,
	NestedStructs,
	LibraryData,
}

macro_rules! tests {
	($test_serialize:ident) => {
		#[test]
		fn primitives() {
			#[derive(Packable, Debug, PartialEq)]
			struct Foo {
				u8: u8,
				u16: u16,
				u32: u32,
				u64: u64,
				u128: u128,
				i8: i8,
				i16: i16,
				i32: i32,
				i64: i64,
				i128: i128,
				usize: usize,
				isize: isize,
				f32: f32,
				f64: f64,
				bool: bool,
				char: char,
			}

			let input = Foo {
				u8: 0x01,
				u16: 0x0203,
				u32: 0x04050607,
				u64: 0x08090a0b0c0d0e0f,
				u128: 0x101112131415161718191a1b1c1d1e1f,
				i8: -0x01,
				i16: -0x0203,
				i32: -0x04050607,
				i64: -0x08090a0b0c0d0e0f,
				i128: -0x101112131415161718191a1b1c1d1e1f,
				usize: u32::MAX as usize,
				isize: i32::MIN as isize,
				f32: f32::MAX,
				f64: -f64::MAX / 2f64,
				bool: true,
				char: 'ß',
			};
			$test_serialize(&input, Test::Primitives, 0);
		}

		#[test]
		fn non_zero_numbers() {
			use std::num;

			#[derive(Packable, Debug, PartialEq)]
			#[allow(non_snake_case)]
			struct Foo {
				NonZeroU8: num::NonZeroU8,
				NonZeroU16: num::NonZeroU16,
				NonZeroU32: num::NonZeroU32,
				NonZeroU64: num::NonZeroU64,
				NonZeroU128: num::NonZeroU128,
				NonZeroUsize: num::NonZeroUsize,
				NonZeroI8: num::NonZeroI8,
				NonZeroI16: num::NonZeroI16,
				NonZeroI32: num::NonZeroI32,
				NonZeroI64: num::NonZeroI64,
				NonZeroI128: num::NonZeroI128,
				NonZeroIsize: num::NonZeroIsize,
			}

			let input = Foo {
				NonZeroU8: num::NonZeroU8::new(0x01).unwrap(),
				NonZeroU16: num::NonZeroU16::new(0x0203).unwrap(),
				NonZeroU32: num::NonZeroU32::new(0x04050607).unwrap(),
				NonZeroU64: num::NonZeroU64::new(0x08090a0b0c0d0e0f).unwrap(),
				NonZeroU128: num::NonZeroU128::new(u128::MAX).unwrap(),
				NonZeroUsize: num::NonZeroUsize::new(0x1000).unwrap(),
				NonZeroI8: num::NonZeroI8::new(-0x01).unwrap(),
				NonZeroI16: num::NonZeroI16::new(-0x0203).unwrap(),
				NonZeroI32: num::NonZeroI32::new(-0x04050607).unwrap(),
				NonZeroI64: num::NonZeroI64::new(i64::MIN).unwrap(),
				NonZeroI128: num::NonZeroI128::new(-0x101112131415161718191a1b1c1d1e1f).unwrap(),
				NonZeroIsize: num::NonZeroIsize::new(-0x1000).unwrap(),
			};
			$test_serialize(&input, Test::NonZeroNumbers, 0);
		}

		#[test]
		fn arrays() {
			#[derive(Packable, Debug, PartialEq)]
			struct Foo {
				empty: [u8; 0],
				single: [u8; 1],
				double: [u16; 2],
				triple: [u32; 3],
			}

			let input = Foo {
				empty: [],
				single: [0x01],
				double: [0x0203, 0x0405],
				triple: [0x06070809, 0x0a0b0c0d, 0x0e0f1011],
			};
			$test_serialize(&input, Test::Arrays, 0);
		}

		#[test]
		fn arrays_of_boxes() {
			#[derive(Packable, Debug, PartialEq)]
			struct Bar {
				empty: [Box<u8>; 0],
				single: [Box<u8>; 1],
				double: [Box<u16>; 2],
				triple: [Box<u32>; 3],
			}

			let input = Bar {
				empty: [],
				single: [Box::new(0x01)],
				double: [Box::new(0x0203), Box::new(0x0405)],
				triple: [
					Box::new(0x06070809),
					Box::new(0x0a0b0c0d),
					Box::new(0x0e0f1011),
				],
			};
			$test_serialize(&input, Test::ArraysOfBoxes, 0);
		}

		#[test]
		fn tuples() {
			#[derive(Packable, Debug, PartialEq)]
			struct Foo {
				tup: (u8, u16, u32),
				tup_of_boxes: (Box<u8>, Box<u16>, Box<u32>),
			}

			let input = Foo {
				tup: (0x01, 0x0203, 0x04050607),
				tup_of_boxes: (Box::new(0x08), Box::new(0x090a), Box::new(0x0b0c0d0e)),
			};
			$test_serialize(&input, Test::Tuples, 0);
		}

		#[test]
		fn enum_fieldless() {
			#[derive(Packable, Debug, PartialEq)]
			enum Foo {
				One,
				Two,
				Three,
			}

			$test_serialize(&Foo::One, Test::EnumFieldless, 0);
			$test_serialize(&Foo::Two, Test::EnumFieldless, 1);
			$test_serialize(&Foo::Three, Test::EnumFieldless, 2);
		}

		#[test]
		fn enum_newtypes() {
			#[derive(Packable, Debug, PartialEq)]
			enum Foo {
				Bar(Bar),
				Qux(Qux),
			}

			#[derive(Packable, Debug, PartialEq)]
			struct Bar {
				small: u8,
				big: u32,
			}

			#[derive(Packable, Debug, PartialEq)]
			struct Qux {
				big: u64,
				small: u16,
			}

			let bar = Foo::Bar(Bar {
				small: 0x01,
				big: 0x02030405,
			});
			let qux = Foo::Qux(Qux {
				big: 0x060708090a0b0c0d,
				small: 0x0e0f,
			});
			$test_serialize(&bar, Test::EnumNewtypes, 0);
			$test_serialize(&qux, Test::EnumNewtypes, 1);
		}

		#[test]
		fn enum_aggregates() {
			#[derive(Packable, Debug, PartialEq)]
			enum Shape {
				Point,
				Circle { radius: f32 },
				Rect(u16, u16),
			}

			$test_serialize(&Shape::Point, Test::EnumAggregates, 0);
			$test_serialize(&Shape::Circle { radius: 1.5 }, Test::EnumAggregates, 1);
			$test_serialize(&Shape::Rect(3, 4), Test::EnumAggregates, 2);
		}

		#[test]
		fn boxed_primitives() {
			use std::{rc::Rc, sync::Arc};

			#[derive(Packable, Debug, PartialEq)]
			struct Foo {
				boxed: Box<u8>,
				double_boxed: Box<Box<u32>>,
				rc: Rc<u16>,
				arc: Arc<u64>,
			}

			let input = Foo {
				boxed: Box::new(0x01),
				double_boxed: Box::new(Box::new(0x02030405)),
				rc: Rc::new(0x0607),
				arc: Arc::new(0x08090a0b0c0d0e0f),
			};
			$test_serialize(&input, Test::BoxedPrimitives, 0);
		}

		#[test]
		fn boxed_structs() {
			#[derive(Packable, Debug, PartialEq)]
			struct Foo {
				first: Box<Bar>,
				second: Box<Bar>,
			}

			#[derive(Packable, Debug, PartialEq)]
			struct Bar {
				small: u8,
				big: u32,
			}

			let input = Foo {
				first: Box::new(Bar {
					small: 0x01,
					big: 0x02030405,
				}),
				second: Box::new(Bar {
					small: 0x06,
					big: 0x0708090a,
				}),
			};
			$test_serialize(&input, Test::BoxedStructs, 0);
		}

		#[test]
		fn vec_of_primitives() {
			#[derive(Packable, Debug, PartialEq)]
			struct Foo {
				vec: Vec<u32>,
			}

			let inputs = [vec![], vec![0x01020304], vec![1, 2, 3, 4, 5]];
			for (test_num, vec) in inputs.into_iter().enumerate() {
				$test_serialize(&Foo { vec }, Test::VecOfPrimitives, test_num);
			}
		}

		#[test]
		fn vec_of_vecs() {
			#[derive(Packable, Debug, PartialEq)]
			struct Foo {
				vec: Vec<Vec<u8>>,
			}

			let input = Foo {
				vec: vec![vec![1, 2], vec![], vec![3]],
			};
			$test_serialize(&input, Test::VecOfVecs, 0);
		}

		#[test]
		fn strings() {
			#[derive(Packable, Debug, PartialEq)]
			struct Foo {
				string: String,
			}

			let inputs = ["", "abc", "ünïcode"];
			for (test_num, string) in inputs.into_iter().enumerate() {
				let input = Foo {
					string: string.to_string(),
				};
				$test_serialize(&input, Test::Strings, test_num);
			}
		}

		#[test]
		fn options() {
			#[derive(Packable, Debug, PartialEq)]
			struct Foo {
				first: Option<u32>,
				second: Option<u32>,
				nested: Option<Option<u8>>,
			}

			let input = Foo {
				first: None,
				second: Some(7),
				nested: Some(None),
			};
			$test_serialize(&input, Test::Options, 0);

			let input = Foo {
				first: None,
				second: None,
				nested: Some(Some(3)),
			};
			$test_serialize(&input, Test::Options, 1);
		}

		#[test]
		fn collections() {
			use std::collections::{BTreeSet, HashSet, LinkedList, VecDeque};

			#[derive(Packable, Debug, PartialEq)]
			struct Foo {
				deque: VecDeque<u8>,
				list: LinkedList<u16>,
				set: BTreeSet<u32>,
				hash_set: HashSet<u8>,
			}

			let input = Foo {
				deque: VecDeque::from([1, 2, 3]),
				list: LinkedList::from([4, 5]),
				set: BTreeSet::from([6]),
				hash_set: HashSet::from([7]),
			};
			$test_serialize(&input, Test::Collections, 0);
		}

		#[test]
		fn maps() {
			use std::collections::{BTreeMap, HashMap};

			#[derive(Packable, Debug, PartialEq)]
			struct Foo {
				hash_map: HashMap<String, u8>,
				btree_map: BTreeMap<u8, Vec<u8>>,
			}

			let input = Foo {
				hash_map: HashMap::from([("a".to_string(), 1)]),
				btree_map: BTreeMap::from([(1, vec![2, 3]), (4, vec![])]),
			};
			$test_serialize(&input, Test::Maps, 0);
		}

		#[test]
		fn zero_sized() {
			use std::marker::PhantomData;

			#[derive(Packable, Debug, PartialEq)]
			struct Foo {
				unit: (),
				phantom: PhantomData<u64>,
				value: u8,
			}

			let input = Foo {
				unit: (),
				phantom: PhantomData,
				value: 0x01,
			};
			$test_serialize(&input, Test::Zeroed, 0);
		}

		#[test]
		fn nested_structs() {
			#[derive(Packable, Debug, PartialEq)]
			struct Outer {
				inner: Inner,
				tail: u8,
			}

			#[derive(Packable, Debug, PartialEq)]
			struct Inner {
				value: u16,
			}

			let input = Outer {
				inner: Inner { value: 0x0102 },
				tail: 0x03,
			};
			$test_serialize(&input, Test::NestedStructs, 0);
		}

		#[test]
		fn library_data() {
			let input = generate_library_data();
			$test_serialize(&input, Test::LibraryData, 0);
		}
	};
}

pub(crate) use tests;
