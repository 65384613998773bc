/// Default maximum nesting depth when decoding.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Largest capacity a buffer can have on this platform.
pub const MAX_CAPACITY: usize = isize::MAX as usize;

/// Default total of zero-sized elements a reader will decode.
pub const DEFAULT_MAX_ZERO_SIZED_ELEMENTS: usize = 1 << 20;

/// Limits and sizing for [`BufferWriter`] and [`BufferReader`].
///
/// ```
/// use ser_pack::Config;
///
/// let config = Config::default().initial_capacity(1024).max_depth(16);
/// assert_eq!(config.max_depth, 16);
/// ```
///
/// [`BufferWriter`]: crate::BufferWriter
/// [`BufferReader`]: crate::BufferReader
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
	/// Bytes allocated by a writer on its first write.
	pub initial_capacity: usize,
	/// Writer capacity never grows beyond this.
	pub max_capacity: usize,
	/// Maximum nesting of aggregates and unions a reader will descend into.
	pub max_depth: usize,
	/// Total elements of zero encoded size (e.g. `()`) a reader will decode,
	/// summed over every sequence in the input.
	///
	/// Such elements consume no input, so their declared count can't be
	/// checked against the remaining bytes.
	pub max_zero_sized_elements: usize,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			initial_capacity: 0,
			max_capacity: MAX_CAPACITY,
			max_depth: DEFAULT_MAX_DEPTH,
			max_zero_sized_elements: DEFAULT_MAX_ZERO_SIZED_ELEMENTS,
		}
	}
}

impl Config {
	pub fn initial_capacity(mut self, initial_capacity: usize) -> Self {
		self.initial_capacity = initial_capacity;
		self
	}

	pub fn max_capacity(mut self, max_capacity: usize) -> Self {
		self.max_capacity = max_capacity.min(MAX_CAPACITY);
		self
	}

	pub fn max_depth(mut self, max_depth: usize) -> Self {
		self.max_depth = max_depth;
		self
	}

	pub fn max_zero_sized_elements(mut self, max_zero_sized_elements: usize) -> Self {
		self.max_zero_sized_elements = max_zero_sized_elements;
		self
	}
}
