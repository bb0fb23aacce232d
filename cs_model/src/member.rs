//! A decoded field or method: descriptor-derived and signature-refined
//! typing, access flags, and whatever attributes the member carried.

use crate::access::AccessFlags;
use crate::attribute::Attribute;
use crate::constant::Const;
use crate::signature::{FormalTypeParam, Signature};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Field,
    Method,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub name: String,
    pub kind: MemberKind,
    /// The type as derived straight from the descriptor string.
    pub vm_signature: Signature,
    /// `vm_signature` unless a `Signature` attribute refined it with generic
    /// detail; always the same structural kind (method stays method, field
    /// stays field).
    pub signature: Signature,
    pub throws: Vec<Signature>,
    pub type_params: Vec<FormalTypeParam>,
    pub flags: AccessFlags,
    pub attributes: Vec<Attribute>,
    /// Set only for fields, from a `ConstantValue` attribute.
    pub constant: Option<Const>,
    /// Set only for methods: the raw `Code` attribute, if present.
    pub code: Option<Attribute>,
}
