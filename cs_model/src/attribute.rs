//! The result of attribute dispatch: most named attributes are consumed by a
//! context-specific handler and folded directly into the enclosing record
//! (`ConstantValue` into a field's `constant`, `Signature` into `signature`,
//! ...), so what's left here is deliberately small — the handful of
//! attributes that stand on their own plus the opaque fallback.

use crate::constant::Const;
use crate::signature::Signature;

#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    Deprecated,
    VisibleAnnotations(Vec<Annotation>),
    InvisibleAnnotations(Vec<Annotation>),
    /// Anything the engine doesn't specifically know, kept verbatim so
    /// downstream tooling never silently loses data. `Code` bodies also take
    /// this shape (as `Unknown("Code", bytes)`) since bytecode itself is out
    /// of scope here.
    Unknown(String, Vec<u8>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub type_: Signature,
    pub elements: Vec<(String, ElementValue)>,
}

/// One annotation element value. `tag_byte` on `Const` preserves the
/// original ASCII discriminator (`'B'`, `'C'`, `'D'`, ... `'s'`) so a
/// round-trip encoder can reproduce the exact byte, rather than re-deriving
/// it from the resolved constant's kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementValue {
    Const(u8, Const),
    Enum(Signature, String),
    Class(Signature),
    Annotation(Annotation),
    Array(Vec<ElementValue>),
}
