//! Constant pool decoding: phase 1 reads the raw, tag-switched entries off
//! the wire; phase 2 walks that raw array once, chasing every index into a
//! fully self-contained resolved entry.

use cs_model::{Const, DecodeError, Path, RawConst, Result, Signature};

use crate::reader::Reader;

/// Reads `constant_pool_count` (the wire field, one more than the number of
/// usable entries) worth of raw entries. Slot 0 is `Unusable`; the slot
/// after any `Long`/`Double` is forced `Unusable` without consuming bytes.
pub fn read_raw_pool(r: &mut Reader, constant_pool_count: u16) -> Result<Vec<RawConst>> {
    let mut pool = vec![RawConst::Unusable];
    let mut next = 1u16;
    while next < constant_pool_count {
        let entry = read_entry(r)?;
        let wide = matches!(entry, RawConst::Long(_) | RawConst::Double(_));
        pool.push(entry);
        next += 1;
        if wide {
            pool.push(RawConst::Unusable);
            next += 1;
        }
    }
    Ok(pool)
}

fn read_entry(r: &mut Reader) -> Result<RawConst> {
    Ok(match r.u8()? {
        1 => {
            let len = r.u16()? as usize;
            RawConst::Utf8(r.bytes(len)?.to_vec())
        }
        3 => RawConst::Int(r.i32()?),
        4 => RawConst::Float(r.f32()?),
        5 => RawConst::Long(r.i64()?),
        6 => RawConst::Double(r.f64()?),
        7 => RawConst::ClassRef(r.u16()?),
        8 => RawConst::StringRef(r.u16()?),
        9 => RawConst::FieldRef(r.u16()?, r.u16()?),
        10 => RawConst::MethodRef(r.u16()?, r.u16()?),
        11 => RawConst::InterfaceMethodRef(r.u16()?, r.u16()?),
        12 => RawConst::NameAndTypeRef(r.u16()?, r.u16()?),
        15 => {
            let kind = cs_model::ReferenceKind::from_tag(r.u8()?)?;
            RawConst::MethodHandle(kind, r.u16()?)
        }
        16 => RawConst::MethodTypeRef(r.u16()?),
        18 => RawConst::InvokeDynamic(r.u16()?, r.u16()?),
        other => return Err(DecodeError::BadConstantTag(other)),
    })
}

fn raw_at(raw: &[RawConst], idx: u16) -> Result<&RawConst> {
    if idx == 0 {
        return Err(DecodeError::InvalidConstantIndex(idx));
    }
    match raw.get(idx as usize) {
        Some(RawConst::Unusable) | None => Err(DecodeError::InvalidConstantIndex(idx)),
        Some(entry) => Ok(entry),
    }
}

fn utf8_str(raw: &[RawConst], idx: u16) -> Result<String> {
    match raw_at(raw, idx)? {
        RawConst::Utf8(bytes) => Ok(String::from_utf8_lossy(bytes).into_owned()),
        _ => Err(DecodeError::UnexpectedConstantKind(idx)),
    }
}

fn class_path(raw: &[RawConst], idx: u16) -> Result<Path> {
    match raw_at(raw, idx)? {
        RawConst::ClassRef(u) => Ok(Path::from_internal_name(&utf8_str(raw, *u)?)),
        _ => Err(DecodeError::UnexpectedConstantKind(idx)),
    }
}

fn raw_name_and_type(raw: &[RawConst], idx: u16) -> Result<(u16, u16)> {
    match raw_at(raw, idx)? {
        RawConst::NameAndTypeRef(n, t) => Ok((*n, *t)),
        _ => Err(DecodeError::UnexpectedConstantKind(idx)),
    }
}

/// A `NameAndType`'s descriptor is either a field or a method descriptor;
/// the two grammars are unambiguous on their first byte.
fn parse_descriptor(s: &str) -> Result<Signature> {
    if s.starts_with('(') {
        cs_model::signature::parse_method_descriptor(s)
    } else {
        cs_model::signature::parse_field_descriptor(s)
    }
}

/// Walks the raw pool once, producing a resolved array of the same length.
/// `MethodHandle` is the only self-referential shape and is expanded by a
/// single direct recursive call into the raw array, never memoised, so no
/// cycle can form.
pub fn expand_pool(raw: &[RawConst]) -> Result<Vec<Const>> {
    (0..raw.len()).map(|i| expand_entry(raw, i as u16)).collect()
}

fn expand_entry(raw: &[RawConst], idx: u16) -> Result<Const> {
    if idx == 0 {
        return Ok(Const::Unusable);
    }
    match &raw[idx as usize] {
        RawConst::Unusable => Ok(Const::Unusable),
        RawConst::Utf8(bytes) => Ok(Const::Utf8(bytes.clone())),
        RawConst::Int(v) => Ok(Const::Int(*v)),
        RawConst::Float(v) => Ok(Const::Float(*v)),
        RawConst::Long(v) => Ok(Const::Long(*v)),
        RawConst::Double(v) => Ok(Const::Double(*v)),
        RawConst::ClassRef(u) => Ok(Const::Class(Path::from_internal_name(&utf8_str(raw, *u)?))),
        RawConst::StringRef(u) => Ok(Const::String(utf8_str(raw, *u)?)),
        RawConst::FieldRef(c, nt) => {
            let path = class_path(raw, *c)?;
            let (n, t) = raw_name_and_type(raw, *nt)?;
            let name = utf8_str(raw, n)?;
            let sig = cs_model::signature::parse_field_descriptor(&utf8_str(raw, t)?)?;
            Ok(Const::Field(path, name, sig))
        }
        RawConst::MethodRef(c, nt) => {
            let path = class_path(raw, *c)?;
            let (n, t) = raw_name_and_type(raw, *nt)?;
            let name = utf8_str(raw, n)?;
            let sig = cs_model::signature::parse_method_descriptor(&utf8_str(raw, t)?)?;
            Ok(Const::Method(path, name, sig))
        }
        RawConst::InterfaceMethodRef(c, nt) => {
            let path = class_path(raw, *c)?;
            let (n, t) = raw_name_and_type(raw, *nt)?;
            let name = utf8_str(raw, n)?;
            let sig = cs_model::signature::parse_method_descriptor(&utf8_str(raw, t)?)?;
            Ok(Const::InterfaceMethod(path, name, sig))
        }
        RawConst::NameAndTypeRef(n, t) => {
            let name = utf8_str(raw, *n)?;
            let sig = parse_descriptor(&utf8_str(raw, *t)?)?;
            Ok(Const::NameAndType(name, sig))
        }
        RawConst::MethodHandle(kind, target) => {
            match raw_at(raw, *target)? {
                RawConst::FieldRef(..) | RawConst::MethodRef(..) | RawConst::InterfaceMethodRef(..) => {}
                _ => return Err(DecodeError::UnexpectedConstantKind(*target)),
            }
            let referenced = expand_entry(raw, *target)?;
            Ok(Const::MethodHandle(*kind, Box::new(referenced)))
        }
        RawConst::MethodTypeRef(u) => {
            let sig = cs_model::signature::parse_method_descriptor(&utf8_str(raw, *u)?)?;
            Ok(Const::MethodType(sig))
        }
        RawConst::InvokeDynamic(bootstrap, nt) => {
            let (n, t) = raw_name_and_type(raw, *nt)?;
            let name = utf8_str(raw, n)?;
            let sig = parse_descriptor(&utf8_str(raw, t)?)?;
            Ok(Const::InvokeDynamic(*bootstrap, name, sig))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn long_and_double_occupy_two_slots() {
        // count = 4: entry 1 is a Long, entry 2 is forced Unusable, entry 3 is an Int.
        let mut bytes = vec![5]; // Long tag
        bytes.extend(7i64.to_be_bytes());
        bytes.push(3); // Int tag
        bytes.extend(9i32.to_be_bytes());
        let mut r = Reader::new(&bytes);
        let raw = read_raw_pool(&mut r, 4).unwrap();
        assert_eq!(raw.len(), 4);
        assert_eq!(raw[0], RawConst::Unusable);
        assert_eq!(raw[1], RawConst::Long(7));
        assert_eq!(raw[2], RawConst::Unusable);
        assert_eq!(raw[3], RawConst::Int(9));

        let resolved = expand_pool(&raw).unwrap();
        assert_eq!(resolved.len(), 4);
        assert_eq!(resolved[0], Const::Unusable);
        assert_eq!(resolved[2], Const::Unusable);
        assert_eq!(resolved[3], Const::Int(9));
    }

    #[test]
    fn class_ref_splits_package_and_name() {
        // [_, Utf8("java/lang/Object"), ClassRef(1)]
        let name = b"java/lang/Object";
        let mut bytes = vec![1, 0, name.len() as u8];
        bytes.extend(name);
        bytes.extend([7, 0, 1]);
        let mut r = Reader::new(&bytes);
        let raw = read_raw_pool(&mut r, 3).unwrap();
        let resolved = expand_pool(&raw).unwrap();
        assert_eq!(
            resolved[2],
            Const::Class(Path::new(vec!["java".into(), "lang".into()], "Object".into()))
        );
    }

    #[test]
    fn bad_tag_is_an_error() {
        let bytes = [42u8];
        let mut r = Reader::new(&bytes);
        assert!(matches!(
            read_raw_pool(&mut r, 2),
            Err(DecodeError::BadConstantTag(42))
        ));
    }

    #[test]
    fn out_of_bounds_index_is_invalid() {
        let raw = vec![RawConst::Unusable, RawConst::ClassRef(99)];
        assert!(matches!(
            expand_pool(&raw),
            Err(DecodeError::InvalidConstantIndex(99))
        ));
    }
}
