//! Data model for a decoded Java `.class` file: the constant pool, member,
//! attribute, and signature types produced by `cs_parser`.
//!
//! This crate is pure data plus the grammar for descriptors/signatures; the
//! binary reader and the actual pool/attribute/class decoding live in
//! `cs_parser`, which depends on it.

pub mod access;
pub mod attribute;
pub mod class;
pub mod constant;
pub mod error;
pub mod member;
pub mod path;
pub mod signature;

pub use access::{AccessFlag, AccessFlags};
pub use attribute::{Annotation, Attribute, ElementValue};
pub use class::{Class, InnerClassRecord};
pub use constant::{Const, RawConst, ReferenceKind};
pub use error::{DecodeError, Result};
pub use member::{Member, MemberKind};
pub use path::Path;
pub use signature::{FormalTypeParam, MethodSig, Signature, TypeArg, Wildcard};
