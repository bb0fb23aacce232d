use enumset::{EnumSet, EnumSetType};

use crate::error::{DecodeError, Result};

/// One JVM access/modifier flag.
///
/// `Unusable` is not a real modifier; it occupies bit positions that are not
/// legal for a given context (a class, field, method, or inner-class entry).
/// Seeing it *set* in a context's table is what makes a bit fatal rather than
/// silently ignored, see [`decode_flags`].
#[derive(EnumSetType, Debug)]
pub enum AccessFlag {
    Public,
    Private,
    Protected,
    Static,
    Final,
    Super,
    Synchronized,
    Volatile,
    Bridge,
    Transient,
    VarArgs,
    Native,
    Interface,
    Abstract,
    Strict,
    Synthetic,
    Annotation,
    Enum,
    Unusable,
}

pub type AccessFlags = EnumSet<AccessFlag>;

/// Maps each of the 16 bit positions of an access-flags `u16` to the flag it
/// denotes in a particular context. `None` means the bit has no meaning at all
/// in this context and any value is accepted in it being unset; `Unusable`
/// means the bit is reserved and must not be set.
pub type FlagTable = [Option<AccessFlag>; 16];

use AccessFlag::*;

pub const CLASS_FLAGS: FlagTable = [
    Some(Public),
    Some(Unusable),
    Some(Unusable),
    Some(Unusable),
    Some(Final),
    Some(Super),
    Some(Unusable),
    Some(Unusable),
    Some(Unusable),
    Some(Interface),
    Some(Abstract),
    Some(Unusable),
    Some(Synthetic),
    Some(Annotation),
    Some(Enum),
    None,
];

pub const FIELD_FLAGS: FlagTable = [
    Some(Public),
    Some(Private),
    Some(Protected),
    Some(Static),
    Some(Final),
    Some(Unusable),
    Some(Volatile),
    Some(Transient),
    Some(Unusable),
    Some(Unusable),
    Some(Unusable),
    Some(Unusable),
    Some(Synthetic),
    Some(Unusable),
    Some(Enum),
    None,
];

pub const METHOD_FLAGS: FlagTable = [
    Some(Public),
    Some(Private),
    Some(Protected),
    Some(Static),
    Some(Final),
    Some(Synchronized),
    Some(Bridge),
    Some(VarArgs),
    Some(Native),
    Some(Unusable),
    Some(Abstract),
    Some(Strict),
    Some(Synthetic),
    None,
    None,
    None,
];

pub const INNER_CLASS_FLAGS: FlagTable = [
    Some(Public),
    Some(Private),
    Some(Protected),
    Some(Static),
    Some(Final),
    Some(Unusable),
    Some(Unusable),
    Some(Unusable),
    Some(Unusable),
    Some(Interface),
    Some(Abstract),
    Some(Synthetic),
    Some(Annotation),
    Some(Enum),
    None,
    None,
];

/// Decodes a raw `u16` access-flags field against a context-specific table,
/// failing with [`DecodeError::UnusableFlagBitSet`] on the first reserved bit
/// found set.
pub fn decode_flags(bits: u16, table: &FlagTable) -> Result<AccessFlags> {
    let mut flags = AccessFlags::new();
    for (i, entry) in table.iter().enumerate() {
        if bits & (1 << i) == 0 {
            continue;
        }
        match entry {
            Some(Unusable) | None => return Err(DecodeError::UnusableFlagBitSet(bits)),
            Some(flag) => {
                flags.insert(*flag);
            }
        }
    }
    Ok(flags)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn public_static_final_field() {
        let flags = decode_flags(0x0001 | 0x0008 | 0x0010, &FIELD_FLAGS).unwrap();
        assert!(flags.contains(Public));
        assert!(flags.contains(Static));
        assert!(flags.contains(Final));
        assert!(!flags.contains(Volatile));
    }

    #[test]
    fn unusable_bit_is_fatal() {
        // bit 5 (0x0020) is reserved for fields
        let err = decode_flags(0x0020, &FIELD_FLAGS).unwrap_err();
        assert!(matches!(err, DecodeError::UnusableFlagBitSet(0x0020)));
    }
}
