//! The top-level orchestrator: magic/version, pool, flags, this/super,
//! interfaces, members, then class-level attributes.

use cs_model::access;
use cs_model::{Class, Const, DecodeError, InnerClassRecord, Path, Result, Signature};
use log::debug;

use crate::attributes::{read_attribute, Hook};
use crate::member::{read_field, read_method};
use crate::pool::{expand_pool, read_raw_pool};
use crate::reader::Reader;

const MAGIC: u32 = 0xCAFE_BABE;

pub fn parse_class_file(data: &[u8]) -> Result<Class> {
    let mut r = Reader::new(data);

    if r.u32()? != MAGIC {
        return Err(DecodeError::BadMagic);
    }
    let minor = r.u16()?;
    let major = r.u16()?;
    debug!("class file version {major}.{minor}");

    let constant_pool_count = r.u16()?;
    let raw_pool = read_raw_pool(&mut r, constant_pool_count)?;
    let constants = expand_pool(&raw_pool)?;

    let class_flags = r.u16()?;
    let flags = access::decode_flags(class_flags, &access::CLASS_FLAGS)?;

    let this_class = r.u16()?;
    let path = class_path(&constants, this_class)?;

    let super_class = r.u16()?;
    let super_ = if super_class == 0 {
        Signature::Object(Path::object(), vec![])
    } else {
        Signature::Object(class_path(&constants, super_class)?, vec![])
    };

    let interface_count = r.u16()?;
    let mut interfaces = Vec::with_capacity(interface_count as usize);
    for _ in 0..interface_count {
        let index = r.u16()?;
        interfaces.push(Signature::Object(class_path(&constants, index)?, vec![]));
    }

    let field_count = r.u16()?;
    let mut fields = Vec::with_capacity(field_count as usize);
    for _ in 0..field_count {
        fields.push(read_field(&mut r, &constants)?);
    }

    let method_count = r.u16()?;
    let mut methods = Vec::with_capacity(method_count as usize);
    for _ in 0..method_count {
        methods.push(read_method(&mut r, &constants)?);
    }

    let mut class = Class {
        version: (major, minor),
        constants,
        path,
        super_,
        flags,
        interfaces,
        fields,
        methods,
        attributes: vec![],
        inner_types: vec![],
        type_params: vec![],
    };

    let attribute_count = r.u16()?;
    let pool = class.constants.clone();
    for _ in 0..attribute_count {
        let attr = read_attribute(&mut r, &pool, |name, body| class_hook(name, body, &pool, &mut class))?;
        if let Some(attr) = attr {
            class.attributes.push(attr);
        }
    }

    Ok(class)
}

fn class_hook(name: &str, body: &[u8], pool: &[Const], class: &mut Class) -> Result<Hook> {
    match name {
        "InnerClasses" => {
            let mut r = Reader::new(body);
            let count = r.u16()?;
            let mut records = Vec::with_capacity(count as usize);
            for _ in 0..count {
                let inner_index = r.u16()?;
                let outer_index = r.u16()?;
                let name_index = r.u16()?;
                let raw_flags = r.u16()?;
                let inner_flags = access::decode_flags(raw_flags, &access::INNER_CLASS_FLAGS)?;
                records.push(InnerClassRecord {
                    inner: class_path(pool, inner_index)?,
                    outer: if outer_index == 0 {
                        None
                    } else {
                        Some(class_path(pool, outer_index)?)
                    },
                    inner_name: if name_index == 0 {
                        None
                    } else {
                        Some(utf8_str(pool, name_index)?)
                    },
                    flags: inner_flags,
                });
            }
            class.inner_types = records;
            Ok(Hook::Handled(None))
        }
        "Signature" => {
            let mut r = Reader::new(body);
            let index = r.u16()?;
            let (params, super_sig, interfaces) =
                cs_model::signature::parse_class_signature(&utf8_str(pool, index)?)?;
            class.type_params = params;
            class.super_ = super_sig;
            class.interfaces = interfaces;
            Ok(Hook::Handled(None))
        }
        _ => Ok(Hook::Default),
    }
}

fn class_path(pool: &[Const], idx: u16) -> Result<Path> {
    match pool.get(idx as usize) {
        Some(Const::Class(path)) => Ok(path.clone()),
        _ => Err(DecodeError::UnexpectedConstantKind(idx)),
    }
}

fn utf8_str(pool: &[Const], idx: u16) -> Result<String> {
    match pool.get(idx as usize) {
        Some(Const::Utf8(bytes)) => Ok(String::from_utf8_lossy(bytes).into_owned()),
        _ => Err(DecodeError::InvalidConstantIndex(idx)),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use cs_model::AccessFlag;

    fn push_u16(bytes: &mut Vec<u8>, v: u16) {
        bytes.extend(v.to_be_bytes());
    }

    fn push_u32(bytes: &mut Vec<u8>, v: u32) {
        bytes.extend(v.to_be_bytes());
    }

    fn minimal_class_bytes() -> Vec<u8> {
        // Constant pool: [_, Utf8("Empty"), Utf8("java/lang/Object"), ClassRef(1), ClassRef(2)]
        let mut bytes = vec![];
        push_u32(&mut bytes, MAGIC);
        push_u16(&mut bytes, 0); // minor
        push_u16(&mut bytes, 61); // major

        push_u16(&mut bytes, 5); // constant_pool_count
        bytes.push(1);
        push_u16(&mut bytes, 5);
        bytes.extend(b"Empty");
        bytes.push(1);
        push_u16(&mut bytes, 16);
        bytes.extend(b"java/lang/Object");
        bytes.push(7); // ClassRef -> Empty
        push_u16(&mut bytes, 1);
        bytes.push(7); // ClassRef -> java/lang/Object
        push_u16(&mut bytes, 2);

        push_u16(&mut bytes, 0x0021); // access_flags: Public | Super
        push_u16(&mut bytes, 3); // this_class
        push_u16(&mut bytes, 4); // super_class
        push_u16(&mut bytes, 0); // interfaces_count
        push_u16(&mut bytes, 0); // fields_count
        push_u16(&mut bytes, 0); // methods_count
        push_u16(&mut bytes, 0); // attributes_count
        bytes
    }

    #[test]
    fn parses_a_minimal_class() {
        let bytes = minimal_class_bytes();
        let class = parse_class_file(&bytes).unwrap();
        assert_eq!(class.version, (61, 0));
        assert_eq!(class.path, Path::new(vec![], "Empty".to_string()));
        assert_eq!(class.super_, Signature::Object(Path::object(), vec![]));
        assert!(class.fields.is_empty());
        assert!(class.methods.is_empty());
        assert!(class.flags.contains(AccessFlag::Public));
    }

    #[test]
    fn bad_magic_is_rejected() {
        let mut bytes = minimal_class_bytes();
        bytes[0] = 0;
        assert!(matches!(parse_class_file(&bytes), Err(DecodeError::BadMagic)));
    }

    #[test]
    fn super_zero_means_object() {
        let mut bytes = vec![];
        push_u32(&mut bytes, MAGIC);
        push_u16(&mut bytes, 0);
        push_u16(&mut bytes, 61);
        push_u16(&mut bytes, 3);
        bytes.push(1);
        push_u16(&mut bytes, 4);
        bytes.extend(b"Root");
        bytes.push(7);
        push_u16(&mut bytes, 1);
        push_u16(&mut bytes, 0x0021);
        push_u16(&mut bytes, 2); // this_class
        push_u16(&mut bytes, 0); // super_class = 0
        push_u16(&mut bytes, 0);
        push_u16(&mut bytes, 0);
        push_u16(&mut bytes, 0);
        push_u16(&mut bytes, 0);
        let class = parse_class_file(&bytes).unwrap();
        assert_eq!(class.super_, Signature::Object(Path::object(), vec![]));
    }
}
