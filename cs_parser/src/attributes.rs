//! The generic attribute engine: read an `(name, length, body)` record off
//! the wire, then dispatch on `name` either to a caller-supplied override
//! hook or to the handful of attributes everyone agrees on regardless of
//! context (`Deprecated`, the two annotation lists).

use cs_model::{Annotation, Attribute, Const, DecodeError, ElementValue, Result};
use log::{trace, warn};

use crate::reader::Reader;

/// What an override hook decides to do with a record it was offered.
pub enum Hook {
    /// The hook consumed the body itself; the attribute it produced (or
    /// `None` if the record should simply be dropped).
    Handled(Option<Attribute>),
    /// The hook doesn't recognise this name; fall through to the default
    /// attributes, ending in `Unknown` if nothing else claims it either.
    Default,
}

/// Reads one attribute record and dispatches it.
///
/// `hook` is given the attribute's name and its already-sliced body (the
/// stream has already advanced past it, so there is no obligation-to-consume
/// bookkeeping left for the hook to get wrong).
pub fn read_attribute(
    r: &mut Reader,
    pool: &[Const],
    mut hook: impl FnMut(&str, &[u8]) -> Result<Hook>,
) -> Result<Option<Attribute>> {
    let name_index = r.u16()?;
    let length = r.u32()?;
    let body = r.bytes(length as usize)?;
    let name = utf8_str(pool, name_index)?;
    trace!("attribute {name} ({length} bytes)");

    match hook(&name, body)? {
        Hook::Handled(attr) => Ok(attr),
        Hook::Default => default_attribute(&name, body, pool).map(Some),
    }
}

fn default_attribute(name: &str, body: &[u8], pool: &[Const]) -> Result<Attribute> {
    match name {
        "Deprecated" => {
            if !body.is_empty() {
                return Err(DecodeError::MalformedAttribute("Deprecated"));
            }
            Ok(Attribute::Deprecated)
        }
        "RuntimeVisibleAnnotations" => {
            Ok(Attribute::VisibleAnnotations(read_annotations(body, pool)?))
        }
        "RuntimeInvisibleAnnotations" => {
            Ok(Attribute::InvisibleAnnotations(read_annotations(body, pool)?))
        }
        other => {
            warn!("preserving unknown attribute {other} opaquely");
            Ok(Attribute::Unknown(other.to_string(), body.to_vec()))
        }
    }
}

fn read_annotations(body: &[u8], pool: &[Const]) -> Result<Vec<Annotation>> {
    let mut r = Reader::new(body);
    let count = r.u16()?;
    (0..count).map(|_| read_annotation(&mut r, pool)).collect()
}

fn read_annotation(r: &mut Reader, pool: &[Const]) -> Result<Annotation> {
    let type_index = r.u16()?;
    let type_ = cs_model::signature::parse_field_descriptor(&utf8_str(pool, type_index)?)?;
    let count = r.u16()?;
    let elements = (0..count)
        .map(|_| {
            let name_index = r.u16()?;
            let name = utf8_str(pool, name_index)?;
            let value = read_element_value(r, pool)?;
            Ok((name, value))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Annotation { type_, elements })
}

fn read_element_value(r: &mut Reader, pool: &[Const]) -> Result<ElementValue> {
    let tag = r.u8()?;
    Ok(match tag {
        b'B' | b'C' | b'D' | b'F' | b'I' | b'J' | b'S' | b'Z' | b's' => {
            let const_value_index = r.u16()?;
            ElementValue::Const(tag, const_at(pool, const_value_index)?.clone())
        }
        b'e' => {
            let type_name_index = r.u16()?;
            let const_name_index = r.u16()?;
            let type_ = cs_model::signature::parse_field_descriptor(&utf8_str(pool, type_name_index)?)?;
            ElementValue::Enum(type_, utf8_str(pool, const_name_index)?)
        }
        b'c' => {
            let class_info_index = r.u16()?;
            let type_ = cs_model::signature::parse_field_descriptor(&utf8_str(pool, class_info_index)?)?;
            ElementValue::Class(type_)
        }
        b'@' => ElementValue::Annotation(read_annotation(r, pool)?),
        b'[' => {
            let count = r.u16()?;
            let values = (0..count)
                .map(|_| read_element_value(r, pool))
                .collect::<Result<Vec<_>>>()?;
            ElementValue::Array(values)
        }
        _ => return Err(DecodeError::MalformedAttribute("annotation element value")),
    })
}

fn utf8_str(pool: &[Const], idx: u16) -> Result<String> {
    match pool.get(idx as usize) {
        Some(Const::Utf8(bytes)) => Ok(String::from_utf8_lossy(bytes).into_owned()),
        _ => Err(DecodeError::InvalidConstantIndex(idx)),
    }
}

fn const_at(pool: &[Const], idx: u16) -> Result<&Const> {
    pool.get(idx as usize).ok_or(DecodeError::InvalidConstantIndex(idx))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn deprecated_with_nonzero_length_is_malformed() {
        let mut bytes = vec![0, 1]; // name_index
        bytes.extend(1u32.to_be_bytes()); // length 1
        bytes.push(0); // one stray byte
        let pool = vec![Const::Unusable, Const::Utf8(b"Deprecated".to_vec())];
        let mut r = Reader::new(&bytes);
        let result = read_attribute(&mut r, &pool, |_, _| Ok(Hook::Default));
        assert!(matches!(result, Err(DecodeError::MalformedAttribute("Deprecated"))));
    }

    #[test]
    fn unknown_attribute_preserved_opaque() {
        let mut bytes = vec![0, 1];
        bytes.extend(3u32.to_be_bytes());
        bytes.extend([9, 9, 9]);
        let pool = vec![Const::Unusable, Const::Utf8(b"FancyVendorData".to_vec())];
        let mut r = Reader::new(&bytes);
        let attr = read_attribute(&mut r, &pool, |_, _| Ok(Hook::Default)).unwrap().unwrap();
        assert_eq!(attr, Attribute::Unknown("FancyVendorData".to_string(), vec![9, 9, 9]));
    }

    #[test]
    fn hook_can_drop_a_record() {
        let mut bytes = vec![0, 1];
        bytes.extend(2u32.to_be_bytes());
        bytes.extend([1, 2]);
        let pool = vec![Const::Unusable, Const::Utf8(b"ConstantValue".to_vec())];
        let mut r = Reader::new(&bytes);
        let attr = read_attribute(&mut r, &pool, |name, _| {
            assert_eq!(name, "ConstantValue");
            Ok(Hook::Handled(None))
        })
        .unwrap();
        assert!(attr.is_none());
        assert!(r.at_end());
    }
}
