use thiserror::Error;

/// Everything that can go wrong while decoding a `.class` file.
///
/// A single decode either produces a [`crate::Class`] or one of these; there is no
/// partial result and no retry, see the crate docs for the state machine this
/// taxonomy sits on top of.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("not a class file: bad magic number")]
    BadMagic,

    #[error("unexpected end of input")]
    Truncated,

    #[error("invalid constant pool tag: {0}")]
    BadConstantTag(u8),

    #[error("invalid constant pool index: {0}")]
    InvalidConstantIndex(u16),

    #[error("constant pool entry {0} has an unexpected kind")]
    UnexpectedConstantKind(u16),

    #[error("invalid method handle reference kind: {0}")]
    BadReferenceKind(u8),

    #[error("invalid signature: {0:?}")]
    InvalidSignature(String),

    #[error("inner class segment declares a package: {0:?}")]
    InnerWithPackage(String),

    #[error("malformed {0} attribute")]
    MalformedAttribute(&'static str),

    #[error("access flags set an unusable bit: {0:#06x}")]
    UnusableFlagBitSet(u16),

    #[error("signature nesting too deep")]
    SignatureTooDeep,
}

pub type Result<T> = std::result::Result<T, DecodeError>;

/// A truncated read from an I/O-backed source is just another way to run out
/// of bytes; it collapses to the same `Truncated` case the in-memory reader
/// produces rather than getting its own variant.
impl From<std::io::Error> for DecodeError {
    fn from(_: std::io::Error) -> Self {
        DecodeError::Truncated
    }
}
