//! Decodes the binary representation of a Java `.class` file (JVMS ch. 4)
//! into the structured model defined by `cs_model`.
//!
//! Decoding is single-threaded, synchronous, and one-shot: a byte slice goes
//! in, a [`cs_model::Class`] or a [`cs_model::DecodeError`] comes out. There
//! is no partial result and no retry.

mod attributes;
mod class;
mod member;
mod pool;
mod reader;

pub use class::parse_class_file;
pub use pool::{expand_pool, read_raw_pool};
