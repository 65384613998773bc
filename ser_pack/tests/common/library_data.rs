// Randomly generated, but deterministic, data set of realistic shape

use std::{collections::BTreeMap, ops};

use rand::Rng;
use rand_pcg::Lcg64Xsh32;
use ser_pack::Packable;

#[derive(Packable, Clone, Copy, Debug, PartialEq)]
pub enum Genre {
	Fiction,
	History,
	Science,
	Poetry,
	#[pack(tag = 300)]
	Reference,
}

impl Generate for Genre {
	fn generate<R: Rng>(rng: &mut R) -> Self {
		match rng.gen_range(0..5) {
			0 => Genre::Fiction,
			1 => Genre::History,
			2 => Genre::Science,
			3 => Genre::Poetry,
			_ => Genre::Reference,
		}
	}
}

#[derive(Packable, Clone, Debug, PartialEq)]
pub enum Location {
	Shelf { aisle: u8, shelf: u8, position: u16 },
	OnLoan(Loan),
	Archive(u32, String),
	Lost,
}

impl Generate for Location {
	fn generate<R: Rng>(rng: &mut R) -> Self {
		const BOXES: [&str; 4] = ["north", "south", "basement", "offsite"];
		match rng.gen_range(0..4) {
			0 => {
				Location::Shelf {
					aisle: rng.gen(),
					shelf: rng.gen(),
					position: rng.gen(),
				}
			}
			1 => Location::OnLoan(Loan::generate(rng)),
			2 => Location::Archive(rng.gen(), BOXES[rng.gen_range(0..BOXES.len())].to_string()),
			_ => Location::Lost,
		}
	}
}

#[derive(Packable, Clone, Debug, PartialEq)]
pub struct Loan {
	pub member_id: u64,
	pub due: (u16, u8, u8),
	pub renewals: u8,
}

impl Generate for Loan {
	fn generate<R: Rng>(rng: &mut R) -> Self {
		Self {
			member_id: rng.gen(),
			due: <(u16, u8, u8) as Generate>::generate(rng),
			renewals: rng.gen_range(0..4),
		}
	}
}

#[derive(Packable, Clone, Debug, PartialEq)]
pub struct Book {
	#[pack(order = 1)]
	pub title: String,
	#[pack(order = 0)]
	pub isbn: [u8; 13],
	#[pack(order = 2)]
	pub authors: Vec<String>,
	#[pack(order = 3)]
	pub genre: Genre,
	#[pack(order = 4)]
	pub pages: u16,
	#[pack(order = 5)]
	pub rating: Option<f32>,
	#[pack(order = 6)]
	pub location: Location,
	#[pack(order = 7)]
	pub tags: Vec<char>,
}

impl Generate for Book {
	fn generate<R: Rng>(rng: &mut R) -> Self {
		const WORDS: [&str; 10] = [
			"the", "river", "silent", "history", "of", "glass", "winter", "atlas", "garden", "clock",
		];
		const AUTHORS: [&str; 6] = ["Okafor", "Lindqvist", "Moreau", "Tanaka", "Novak", "Ibáñez"];

		let words = rng.gen_range(1..6);
		let title = (0..words)
			.map(|_| WORDS[rng.gen_range(0..WORDS.len())])
			.collect::<Vec<_>>()
			.join(" ");
		let authors = (0..rng.gen_range(1..4))
			.map(|_| AUTHORS[rng.gen_range(0..AUTHORS.len())].to_string())
			.collect();

		Self {
			title,
			isbn: <[u8; 13] as Generate>::generate(rng),
			authors,
			genre: Genre::generate(rng),
			pages: rng.gen(),
			rating: <Option<f32> as Generate>::generate(rng),
			location: Location::generate(rng),
			tags: generate_vec(rng, 0..5),
		}
	}
}

#[derive(Packable, Clone, Debug, PartialEq)]
pub struct Patron {
	pub id: u64,
	pub name: String,
	pub joined: i64,
	pub active: bool,
	pub fines: Option<u32>,
	pub history: Vec<u64>,
}

impl Generate for Patron {
	fn generate<R: Rng>(rng: &mut R) -> Self {
		const NAMES: [&str; 6] = ["Ada", "Bashir", "Chen", "Dolores", "Emeka", "Freya"];
		Self {
			id: rng.gen(),
			name: NAMES[rng.gen_range(0..NAMES.len())].to_string(),
			joined: rng.gen(),
			active: rng.gen_bool(0.8),
			fines: <Option<u32> as Generate>::generate(rng),
			history: generate_vec(rng, 0..20),
		}
	}
}

#[derive(Packable, Clone, Debug, PartialEq)]
pub struct Library {
	pub name: String,
	pub books: Vec<Book>,
	pub patrons: Vec<Patron>,
	pub shelves: BTreeMap<u16, Vec<u32>>,
}

pub trait Generate {
	fn generate<R: Rng>(rng: &mut R) -> Self;
}

impl Generate for char {
	fn generate<R: Rng>(rng: &mut R) -> Self {
		rng.gen_range('a'..='z')
	}
}

macro_rules! impl_generate {
	($ty:ty) => {
		impl Generate for $ty {
			fn generate<R: Rng>(rng: &mut R) -> Self {
				rng.gen()
			}
		}
	};
}

impl_generate!(u8);
impl_generate!(u16);
impl_generate!(u32);
impl_generate!(u64);
impl_generate!(i64);
impl_generate!(f32);

macro_rules! impl_tuple {
	() => {};
	($first:ident, $($rest:ident,)*) => {
		impl<$first: Generate, $($rest: Generate,)*> Generate for ($first, $($rest,)*) {
			fn generate<R: Rng>(rng: &mut R) -> Self {
				($first::generate(rng), $($rest::generate(rng),)*)
			}
		}

		impl_tuple!($($rest,)*);
	};
}

impl_tuple!(T0, T1, T2,);

impl<T: Generate, const N: usize> Generate for [T; N] {
	fn generate<R: Rng>(rng: &mut R) -> Self {
		std::array::from_fn(|_| T::generate(rng))
	}
}

impl<T: Generate> Generate for Option<T> {
	fn generate<R: Rng>(rng: &mut R) -> Self {
		if rng.gen_bool(0.5) {
			Some(T::generate(rng))
		} else {
			None
		}
	}
}

fn generate_vec<R: Rng, T: Generate>(rng: &mut R, range: ops::Range<usize>) -> Vec<T> {
	let len = rng.gen_range(range);
	(0..len).map(|_| T::generate(rng)).collect()
}

pub fn generate_data() -> Library {
	const STATE: u64 = 2718281828;
	const STREAM: u64 = 4590452353;
	const BOOKS: usize = 400;
	const PATRONS: usize = 150;

	let mut rng = Lcg64Xsh32::new(STATE, STREAM);

	let books = (0..BOOKS).map(|_| Book::generate(&mut rng)).collect();
	let patrons = (0..PATRONS).map(|_| Patron::generate(&mut rng)).collect();
	let shelves = (0..40u16)
		.map(|aisle| (aisle, generate_vec(&mut rng, 0..30)))
		.collect();

	Library {
		name: "Central Lending Library".to_string(),
		books,
		patrons,
		shelves,
	}
}
