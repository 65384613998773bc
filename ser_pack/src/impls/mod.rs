mod collections;
mod other;
mod primitives;
mod ptrs;

#[cfg(feature = "num_bigint")]
mod bigint;
