//! Constant pool entries, both the raw tag-dispatched form read straight off
//! the wire and the fully expanded form callers actually see.

use crate::error::{DecodeError, Result};
use crate::path::Path;
use crate::signature::{MethodSig, Signature};

/// A `method_handle_info`'s `reference_kind`, JVMS §4.4.8, tags 1..9.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    GetField,
    GetStatic,
    PutField,
    PutStatic,
    InvokeVirtual,
    InvokeStatic,
    InvokeSpecial,
    NewInvokeSpecial,
    InvokeInterface,
}

impl ReferenceKind {
    pub fn from_tag(tag: u8) -> Result<Self> {
        Ok(match tag {
            1 => ReferenceKind::GetField,
            2 => ReferenceKind::GetStatic,
            3 => ReferenceKind::PutField,
            4 => ReferenceKind::PutStatic,
            5 => ReferenceKind::InvokeVirtual,
            6 => ReferenceKind::InvokeStatic,
            7 => ReferenceKind::InvokeSpecial,
            8 => ReferenceKind::NewInvokeSpecial,
            9 => ReferenceKind::InvokeInterface,
            other => return Err(DecodeError::BadReferenceKind(other)),
        })
    }
}

/// One constant-pool slot as read directly off the wire, index references
/// still unresolved. Slot 0 and the slot following any `Long`/`Double` are
/// both `Unusable`.
#[derive(Debug, Clone, PartialEq)]
pub enum RawConst {
    Unusable,
    Utf8(Vec<u8>),
    Int(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    ClassRef(u16),
    StringRef(u16),
    FieldRef(u16, u16),
    MethodRef(u16, u16),
    InterfaceMethodRef(u16, u16),
    NameAndTypeRef(u16, u16),
    MethodHandle(ReferenceKind, u16),
    MethodTypeRef(u16),
    InvokeDynamic(u16, u16),
}

/// A constant-pool slot after phase-2 expansion: every index chase has
/// already happened, so a `Const` is self-contained and carries no further
/// indirection.
#[derive(Debug, Clone, PartialEq)]
pub enum Const {
    Unusable,
    Class(Path),
    Field(Path, String, Signature),
    Method(Path, String, MethodSig),
    InterfaceMethod(Path, String, MethodSig),
    String(String),
    Int(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    NameAndType(String, Signature),
    Utf8(Vec<u8>),
    MethodHandle(ReferenceKind, Box<Const>),
    MethodType(MethodSig),
    InvokeDynamic(u16, String, Signature),
}
