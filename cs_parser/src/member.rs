//! Field and method parsing: access flags, name/descriptor, then a round of
//! attributes whose override hook is where most of the member-specific
//! behaviour (`ConstantValue`, `Signature`, `Code`, `Exceptions`, ...) lives.

use cs_model::access::{self, FlagTable};
use cs_model::{Attribute, Const, DecodeError, Member, MemberKind, Path, Result, Signature};

use crate::attributes::{read_attribute, Hook};
use crate::reader::Reader;

pub fn read_field(r: &mut Reader, pool: &[Const]) -> Result<Member> {
    read_member(r, pool, MemberKind::Field, &access::FIELD_FLAGS)
}

pub fn read_method(r: &mut Reader, pool: &[Const]) -> Result<Member> {
    read_member(r, pool, MemberKind::Method, &access::METHOD_FLAGS)
}

fn utf8_str(pool: &[Const], idx: u16) -> Result<String> {
    match pool.get(idx as usize) {
        Some(Const::Utf8(bytes)) => Ok(String::from_utf8_lossy(bytes).into_owned()),
        _ => Err(DecodeError::InvalidConstantIndex(idx)),
    }
}

fn read_member(r: &mut Reader, pool: &[Const], kind: MemberKind, table: &FlagTable) -> Result<Member> {
    let raw_flags = r.u16()?;
    let flags = access::decode_flags(raw_flags, table)?;
    let name = utf8_str(pool, r.u16()?)?;
    let descriptor = utf8_str(pool, r.u16()?)?;
    let vm_signature = match kind {
        MemberKind::Field => cs_model::signature::parse_field_descriptor(&descriptor)?,
        MemberKind::Method => cs_model::signature::parse_method_descriptor(&descriptor)?,
    };

    let mut member = Member {
        name,
        kind,
        vm_signature: vm_signature.clone(),
        signature: vm_signature,
        throws: vec![],
        type_params: vec![],
        flags,
        attributes: vec![],
        constant: None,
        code: None,
    };

    let attribute_count = r.u16()?;
    for _ in 0..attribute_count {
        let attr = read_attribute(r, pool, |name, body| hook(kind, name, body, pool, &mut member))?;
        if let Some(attr) = attr {
            member.attributes.push(attr);
        }
    }

    Ok(member)
}

fn hook(
    kind: MemberKind,
    name: &str,
    body: &[u8],
    pool: &[Const],
    member: &mut Member,
) -> Result<Hook> {
    match (kind, name) {
        (MemberKind::Field, "ConstantValue") => {
            let mut body_reader = Reader::new(body);
            let index = body_reader.u16()?;
            let value = pool.get(index as usize).ok_or(DecodeError::InvalidConstantIndex(index))?;
            debug_assert!(
                constant_matches_descriptor(&member.vm_signature, value),
                "ConstantValue kind {value:?} doesn't match descriptor {:?}",
                member.vm_signature
            );
            member.constant = Some(value.clone());
            Ok(Hook::Handled(None))
        }
        (MemberKind::Field, "Synthetic") => {
            member.flags.insert(cs_model::AccessFlag::Synthetic);
            Ok(Hook::Handled(None))
        }
        (MemberKind::Field, "Signature") => {
            let mut body_reader = Reader::new(body);
            let index = body_reader.u16()?;
            member.signature = cs_model::signature::parse_field_signature(&utf8_str(pool, index)?)?;
            Ok(Hook::Handled(None))
        }
        (MemberKind::Method, "Signature") => {
            let mut body_reader = Reader::new(body);
            let index = body_reader.u16()?;
            let (params, sig, throws) =
                cs_model::signature::parse_method_signature(&utf8_str(pool, index)?)?;
            member.signature = sig;
            member.type_params = params;
            if !throws.is_empty() {
                member.throws = throws;
            }
            Ok(Hook::Handled(None))
        }
        (MemberKind::Method, "Code") => {
            member.code = Some(Attribute::Unknown("Code".to_string(), body.to_vec()));
            Ok(Hook::Handled(Some(Attribute::Unknown("Code".to_string(), body.to_vec()))))
        }
        (MemberKind::Method, "Exceptions") => {
            let mut body_reader = Reader::new(body);
            let count = body_reader.u16()?;
            let mut throws = Vec::with_capacity(count as usize);
            for _ in 0..count {
                let index = body_reader.u16()?;
                let path = class_path_at(pool, index)?;
                throws.push(Signature::Object(path, vec![]));
            }
            member.throws = throws;
            Ok(Hook::Handled(None))
        }
        _ => Ok(Hook::Default),
    }
}

fn class_path_at(pool: &[Const], idx: u16) -> Result<Path> {
    match pool.get(idx as usize) {
        Some(Const::Class(path)) => Ok(path.clone()),
        _ => Err(DecodeError::UnexpectedConstantKind(idx)),
    }
}

/// Whether a `ConstantValue` constant's kind matches the primitive class of
/// a field's descriptor (SPEC_FULL §8, property 5). Debug-only hardening: a
/// well-formed class file always satisfies this, so it's not worth aborting
/// decode over in release builds.
fn constant_matches_descriptor(descriptor: &Signature, value: &Const) -> bool {
    matches!(
        (descriptor, value),
        (Signature::Int | Signature::Short | Signature::Char | Signature::Byte | Signature::Bool, Const::Int(_))
            | (Signature::Long, Const::Long(_))
            | (Signature::Float, Const::Float(_))
            | (Signature::Double, Const::Double(_))
            | (Signature::Object(..), Const::String(_))
    )
}

#[cfg(test)]
mod test {
    use super::*;

    fn pool_with(entries: Vec<Const>) -> Vec<Const> {
        let mut pool = vec![Const::Unusable];
        pool.extend(entries);
        pool
    }

    #[test]
    fn parses_name_descriptor_and_flags() {
        let pool = pool_with(vec![
            Const::Utf8(b"count".to_vec()),
            Const::Utf8(b"I".to_vec()),
        ]);
        let mut bytes = vec![0, 0x19]; // Public | Static | Final
        bytes.extend([0, 1]); // name_index
        bytes.extend([0, 2]); // descriptor_index
        bytes.extend([0, 0]); // attribute count
        let mut r = Reader::new(&bytes);
        let field = read_field(&mut r, &pool).unwrap();
        assert_eq!(field.name, "count");
        assert_eq!(field.vm_signature, cs_model::Signature::Int);
        assert!(field.flags.contains(cs_model::AccessFlag::Public));
        assert!(field.flags.contains(cs_model::AccessFlag::Static));
        assert!(field.flags.contains(cs_model::AccessFlag::Final));
    }

    #[test]
    fn constant_value_fills_constant_and_is_dropped() {
        let pool = pool_with(vec![
            Const::Utf8(b"MAX".to_vec()),
            Const::Utf8(b"I".to_vec()),
            Const::Utf8(b"ConstantValue".to_vec()),
            Const::Int(42),
        ]);
        let mut bytes = vec![0, 0x19];
        bytes.extend([0, 1]);
        bytes.extend([0, 2]);
        bytes.extend([0, 1]); // one attribute
        bytes.extend([0, 3]); // name_index -> "ConstantValue"
        bytes.extend(2u32.to_be_bytes()); // length
        bytes.extend([0, 4]); // constantvalue_index -> Int(42)
        let mut r = Reader::new(&bytes);
        let field = read_field(&mut r, &pool).unwrap();
        assert_eq!(field.constant, Some(Const::Int(42)));
        assert!(field.attributes.is_empty());
    }

    #[test]
    fn method_synthetic_is_not_special_cased() {
        let pool = pool_with(vec![
            Const::Utf8(b"access$000".to_vec()),
            Const::Utf8(b"()V".to_vec()),
            Const::Utf8(b"Synthetic".to_vec()),
        ]);
        let mut bytes = vec![0, 0x01]; // Public
        bytes.extend([0, 1]);
        bytes.extend([0, 2]);
        bytes.extend([0, 1]); // one attribute
        bytes.extend([0, 3]); // name_index -> "Synthetic"
        bytes.extend(0u32.to_be_bytes()); // length 0
        let mut r = Reader::new(&bytes);
        let method = read_method(&mut r, &pool).unwrap();
        assert!(!method.flags.contains(cs_model::AccessFlag::Synthetic));
        assert_eq!(method.attributes, vec![Attribute::Unknown("Synthetic".to_string(), vec![])]);
    }

    #[test]
    fn method_signature_overrides_descriptor_and_keeps_vm_signature() {
        let pool = pool_with(vec![
            Const::Utf8(b"identity".to_vec()),
            Const::Utf8(b"(Ljava/lang/Object;)V".to_vec()),
            Const::Utf8(b"Signature".to_vec()),
            Const::Utf8(b"<T:Ljava/lang/Object;>(TT;)V".to_vec()),
        ]);
        let mut bytes = vec![0, 0x01]; // Public
        bytes.extend([0, 1]);
        bytes.extend([0, 2]);
        bytes.extend([0, 1]);
        bytes.extend([0, 3]);
        bytes.extend(2u32.to_be_bytes());
        bytes.extend([0, 4]);
        let mut r = Reader::new(&bytes);
        let method = read_method(&mut r, &pool).unwrap();
        assert_eq!(method.type_params.len(), 1);
        assert_ne!(method.signature, method.vm_signature);
        match &method.vm_signature {
            Signature::Method(args, None) => assert!(matches!(args[0], Signature::Object(..))),
            other => panic!("unexpected vm_signature {other:?}"),
        }
        match &method.signature {
            Signature::Method(args, None) => assert!(matches!(args[0], Signature::TypeVariable(_))),
            other => panic!("unexpected signature {other:?}"),
        }
    }
}
