use std::{
	cell::Cell,
	collections::BTreeMap,
	sync::atomic::{AtomicUsize, Ordering},
};

use ser_pack::{Described, Packable, UnionRoot};

fn round_trip<T: Packable>(value: &T) -> (Vec<u8>, T) {
	let bytes = ser_pack::serialize(value).unwrap();
	let output = ser_pack::deserialize::<T>(&bytes).unwrap();
	(bytes, output)
}

#[test]
fn explicit_member_order() {
	#[derive(Packable, Debug, PartialEq)]
	struct Foo {
		#[pack(order = 2)]
		first: u8,
		#[pack(order = 0)]
		second: u16,
		#[pack(order = 1)]
		third: bool,
	}

	let input = Foo {
		first: 0x01,
		second: 0x0203,
		third: true,
	};
	let (bytes, output) = round_trip(&input);
	assert_eq!(bytes, [3, 0x03, 0x02, 1, 0x01]);
	assert_eq!(output, input);
	assert_eq!(Foo::NAME, "Foo");
	assert_eq!(Foo::MEMBERS, ["second", "third", "first"]);
}

#[test]
fn ignored_members_are_defaulted() {
	#[derive(Packable, Debug, PartialEq)]
	struct Foo {
		id: u32,
		#[pack(ignore)]
		cache: Vec<u8>,
		#[pack(include)]
		name: String,
	}

	let input = Foo {
		id: 7,
		cache: vec![1, 2, 3],
		name: "x".to_string(),
	};
	let (bytes, output) = round_trip(&input);
	assert_eq!(bytes, [2, 7, 0, 0, 0, 1, 0, 0, 0, b'x']);
	assert_eq!(
		output,
		Foo {
			id: 7,
			cache: vec![],
			name: "x".to_string(),
		}
	);
	assert_eq!(Foo::MEMBERS, ["id", "name"]);
}

#[test]
fn tuple_and_unit_structs() {
	#[derive(Packable, Debug, PartialEq)]
	struct Pair(u8, #[pack(ignore)] u8, u16);

	#[derive(Packable, Debug, PartialEq)]
	struct Marker;

	let (bytes, output) = round_trip(&Pair(1, 2, 0x0304));
	assert_eq!(bytes, [2, 1, 0x04, 0x03]);
	assert_eq!(output, Pair(1, 0, 0x0304));
	assert_eq!(Pair::MEMBERS, ["0", "2"]);

	let (bytes, output) = round_trip(&Marker);
	assert_eq!(bytes, [0]);
	assert_eq!(output, Marker);
}

#[test]
fn constructor_binds_members_by_name() {
	#[derive(Packable, Debug, PartialEq)]
	#[pack(constructor(new, y, x))]
	struct Point {
		x: i32,
		y: i32,
		#[pack(ignore)]
		len_sq: i64,
	}

	impl Point {
		fn new(y: i32, x: i32) -> Self {
			let len_sq = (x as i64) * (x as i64) + (y as i64) * (y as i64);
			Self { x, y, len_sq }
		}
	}

	let input = Point::new(4, 3);
	let (bytes, output) = round_trip(&input);
	assert_eq!(bytes, [2, 3, 0, 0, 0, 4, 0, 0, 0]);
	assert_eq!(output, input);
	assert_eq!(output.len_sq, 25);
}

#[test]
fn constructor_with_some_members() {
	#[derive(Packable, Debug, PartialEq)]
	#[pack(constructor(named, name))]
	struct Tally {
		name: String,
		count: u32,
	}

	impl Tally {
		fn named(name: String) -> Self {
			Self { name, count: 0 }
		}
	}

	let input = Tally {
		name: "votes".to_string(),
		count: 12,
	};
	let (_, output) = round_trip(&input);
	assert_eq!(output, input);
}

#[test]
fn parameterless_constructor() {
	#[derive(Packable, Debug, PartialEq)]
	#[pack(constructor(empty))]
	struct Counter {
		hits: u32,
		#[pack(ignore)]
		label: &'static str,
	}

	impl Counter {
		fn empty() -> Self {
			Self {
				hits: 0,
				label: "counter",
			}
		}
	}

	let input = Counter {
		hits: 3,
		label: "other",
	};
	let (bytes, output) = round_trip(&input);
	assert_eq!(bytes, [1, 3, 0, 0, 0]);
	assert_eq!(
		output,
		Counter {
			hits: 3,
			label: "counter",
		}
	);
}

static DESERIALIZING: AtomicUsize = AtomicUsize::new(0);

#[test]
fn lifecycle_hooks() {
	#[derive(Packable, Debug, PartialEq)]
	#[pack(
		on_serializing = "before_pack",
		on_serialized = "after_pack",
		on_deserializing = "before_unpack",
		on_deserialized = "after_unpack"
	)]
	struct Hooked {
		value: u32,
		#[pack(ignore)]
		doubled: u32,
		#[pack(ignore)]
		packs: Cell<u32>,
	}

	impl Hooked {
		fn before_pack(&self) {
			self.packs.set(self.packs.get() + 1);
		}

		fn after_pack(&self) {
			self.packs.set(self.packs.get() + 10);
		}

		fn before_unpack() {
			DESERIALIZING.fetch_add(1, Ordering::SeqCst);
		}

		fn after_unpack(&mut self) {
			self.doubled = self.value * 2;
		}
	}

	let input = Hooked {
		value: 21,
		doubled: 0,
		packs: Cell::new(0),
	};
	let (bytes, output) = round_trip(&input);
	assert_eq!(bytes, [1, 21, 0, 0, 0]);
	assert_eq!(input.packs.get(), 11);
	assert_eq!(output.value, 21);
	assert_eq!(output.doubled, 42);
	assert_eq!(output.packs.get(), 0);
	assert_eq!(DESERIALIZING.load(Ordering::SeqCst), 1);
}

#[test]
fn collection_mode() {
	#[derive(Packable, Debug, PartialEq)]
	#[pack(collection)]
	struct Ids(Vec<u32>);

	#[derive(Packable, Debug, PartialEq)]
	#[pack(collection)]
	struct Index {
		entries: BTreeMap<String, u16>,
	}

	let ids = Ids(vec![1, 2]);
	let (bytes, output) = round_trip(&ids);
	assert_eq!(bytes, ser_pack::serialize(&vec![1u32, 2]).unwrap());
	assert_eq!(output, ids);
	assert_eq!(Ids::MIN_SIZE, <Vec<u32> as Packable>::MIN_SIZE);
	assert!(Ids::MEMBERS.is_empty());

	let index = Index {
		entries: BTreeMap::from([("a".to_string(), 1), ("b".to_string(), 2)]),
	};
	let (bytes, output) = round_trip(&index);
	assert_eq!(bytes, ser_pack::serialize(&index.entries).unwrap());
	assert_eq!(output, index);
}

#[test]
fn generic_struct() {
	#[derive(Packable, Debug, PartialEq)]
	struct Wrapper<T> {
		inner: T,
		count: u8,
	}

	let input = Wrapper {
		inner: "hi".to_string(),
		count: 2,
	};
	let (bytes, output) = round_trip(&input);
	assert_eq!(bytes, [2, 2, 0, 0, 0, b'h', b'i', 2]);
	assert_eq!(output, input);

	let (_, output) = round_trip(&Wrapper {
		inner: Wrapper { inner: 1u64, count: 0 },
		count: 1,
	});
	assert_eq!(output.inner.inner, 1);
}

#[test]
fn enum_tags() {
	#[derive(Packable, Debug, PartialEq)]
	enum Message {
		#[pack(tag = 300)]
		Ping,
		#[pack(tag = 5)]
		Text(String),
		Move {
			x: i16,
			#[pack(ignore)]
			cached: bool,
			y: i16,
		},
	}

	let (bytes, output) = round_trip(&Message::Ping);
	assert_eq!(bytes, [250, 0x2c, 0x01]);
	assert_eq!(output, Message::Ping);

	let (bytes, output) = round_trip(&Message::Text("yo".to_string()));
	assert_eq!(bytes, [5, 2, 0, 0, 0, b'y', b'o']);
	assert_eq!(output, Message::Text("yo".to_string()));

	// Undeclared tag is the variant's index
	let input = Message::Move {
		x: -1,
		cached: true,
		y: 2,
	};
	let (bytes, output) = round_trip(&input);
	assert_eq!(bytes, [2, 2, 0xff, 0xff, 2, 0]);
	assert_eq!(
		output,
		Message::Move {
			x: -1,
			cached: false,
			y: 2,
		}
	);

	assert_eq!(
		Message::CASES,
		[(2, "Message::Move"), (5, "Message::Text"), (300, "Message::Ping")]
	);
	assert_eq!(Message::Ping.tag(), 300);
	assert_eq!(input.tag(), 2);
	assert_eq!(Message::NAME, "Message");
}

#[test]
fn enum_tuple_variant_with_ignored_field() {
	#[derive(Packable, Debug, PartialEq)]
	enum Slot {
		Empty,
		Filled(#[pack(ignore)] u8, u32),
	}

	let (bytes, output) = round_trip(&Slot::Filled(9, 0x01020304));
	assert_eq!(bytes, [1, 1, 0x04, 0x03, 0x02, 0x01]);
	assert_eq!(output, Slot::Filled(0, 0x01020304));

	let (bytes, _) = round_trip(&Slot::Empty);
	assert_eq!(bytes, [0]);
}
