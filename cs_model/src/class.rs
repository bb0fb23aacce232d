//! The top-level decoded record and the class-level `InnerClasses` entries
//! it carries.

use crate::access::AccessFlags;
use crate::attribute::Attribute;
use crate::constant::Const;
use crate::member::Member;
use crate::path::Path;
use crate::signature::{FormalTypeParam, Signature};

#[derive(Debug, Clone, PartialEq)]
pub struct InnerClassRecord {
    pub inner: Path,
    pub outer: Option<Path>,
    pub inner_name: Option<String>,
    pub flags: AccessFlags,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub version: (u16, u16),
    pub constants: Vec<Const>,
    pub path: Path,
    /// `Object(java/lang/Object, [])` when the raw `super_class` index was 0
    /// (the case for `java.lang.Object` itself).
    pub super_: Signature,
    pub flags: AccessFlags,
    pub interfaces: Vec<Signature>,
    pub fields: Vec<Member>,
    pub methods: Vec<Member>,
    pub attributes: Vec<Attribute>,
    pub inner_types: Vec<InnerClassRecord>,
    pub type_params: Vec<FormalTypeParam>,
}
