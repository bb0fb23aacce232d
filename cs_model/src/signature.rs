//! The descriptor/signature grammar: field and method descriptors, and the
//! richer generic class/method signature dialect layered on top of them.
//!
//! Both dialects are parsed by the same recursive-descent `Parser`: a plain
//! descriptor is simply a signature string that never happens to use the
//! generic-only productions (`<...>`, `T...;`, the `.` inner-class switch).

use std::fmt;

use crate::error::{DecodeError, Result};
use crate::path::Path;

/// A field, method, or generic-signature type, JVMS §4.3.
///
/// `Method`'s return type is boxed (rather than a bare `Option<Signature>`,
/// as the spec prose puts it) because `Signature` is recursive and Rust enums
/// must be finitely sized; the boxed field still means exactly "no return
/// type / void".
#[derive(Debug, Clone, PartialEq)]
pub enum Signature {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Bool,
    Object(Path, Vec<TypeArg>),
    /// A dotted inner-class chain: `package` plus one `(name, type args)` pair
    /// per link, outermost first.
    ObjectInner(Vec<String>, Vec<(String, Vec<TypeArg>)>),
    Array(Box<Signature>, Option<i32>),
    Method(Vec<Signature>, Option<Box<Signature>>),
    TypeVariable(String),
}

/// A type known (by construction) to be [`Signature::Method`]. Kept as an
/// alias rather than a newtype so constant-pool expansion can hand back a
/// plain `Signature` without an extra conversion step.
pub type MethodSig = Signature;

#[derive(Debug, Clone, PartialEq)]
pub enum TypeArg {
    Any,
    Typed(Wildcard, Box<Signature>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wildcard {
    None,
    Extends,
    Super,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormalTypeParam {
    pub name: String,
    pub extends: Option<Signature>,
    pub interfaces: Vec<Signature>,
}

/// Nesting deeper than this (arrays-of-arrays, generics-of-generics, inner
/// class chains, ...) fails with [`DecodeError::SignatureTooDeep`] rather
/// than blowing the native stack on adversarial input.
const MAX_DEPTH: usize = 256;

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            depth: 0,
        }
    }

    fn error(&self) -> DecodeError {
        DecodeError::InvalidSignature(self.input.to_string())
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn expect(&mut self, c: char) -> Result<()> {
        if self.bump() == Some(c) {
            Ok(())
        } else {
            Err(self.error())
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn finish(&self) -> Result<()> {
        if self.at_end() {
            Ok(())
        } else {
            Err(self.error())
        }
    }

    fn take_until_any(&mut self, terminators: &[char]) -> Result<&'a str> {
        let start = self.pos;
        loop {
            match self.peek() {
                Some(c) if terminators.contains(&c) => return Ok(&self.input[start..self.pos]),
                Some(_) => {
                    self.bump();
                }
                None => return Err(self.error()),
            }
        }
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(DecodeError::SignatureTooDeep);
        }
        Ok(())
    }

    fn parse_type(&mut self) -> Result<Signature> {
        self.enter()?;
        let result = self.parse_type_inner();
        self.depth -= 1;
        result
    }

    fn parse_type_inner(&mut self) -> Result<Signature> {
        match self.bump().ok_or_else(|| self.error())? {
            'B' => Ok(Signature::Byte),
            'C' => Ok(Signature::Char),
            'D' => Ok(Signature::Double),
            'F' => Ok(Signature::Float),
            'I' => Ok(Signature::Int),
            'J' => Ok(Signature::Long),
            'S' => Ok(Signature::Short),
            'Z' => Ok(Signature::Bool),
            'T' => self.parse_type_variable(),
            'L' => self.parse_object(),
            '[' => self.parse_array(),
            _ => Err(self.error()),
        }
    }

    fn parse_type_variable(&mut self) -> Result<Signature> {
        let name = self.take_until_any(&[';'])?.to_string();
        self.expect(';')?;
        Ok(Signature::TypeVariable(name))
    }

    fn parse_array(&mut self) -> Result<Signature> {
        let mut size = None;
        if matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            let start = self.pos;
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.bump();
            }
            size = self.input[start..self.pos].parse::<i32>().ok();
        }
        let element = self.parse_type()?;
        Ok(Signature::Array(Box::new(element), size))
    }

    fn parse_qualified_name(&mut self) -> Result<(Vec<String>, String)> {
        let raw = self.take_until_any(&['<', ';', '.'])?;
        let mut segments: Vec<&str> = raw.split('/').collect();
        let name = segments.pop().ok_or_else(|| self.error())?;
        Ok((
            segments.into_iter().map(str::to_string).collect(),
            name.to_string(),
        ))
    }

    fn parse_object(&mut self) -> Result<Signature> {
        let (package, name) = self.parse_qualified_name()?;
        let args = self.parse_optional_type_args()?;
        match self.peek() {
            Some(';') => {
                self.bump();
                Ok(Signature::Object(Path::new(package, name), args))
            }
            Some('.') => {
                let mut chain = vec![(name, args)];
                loop {
                    self.bump(); // '.'
                    let inner_name = self.take_until_any(&['<', ';', '.'])?;
                    if inner_name.contains('/') {
                        return Err(DecodeError::InnerWithPackage(inner_name.to_string()));
                    }
                    let inner_name = inner_name.to_string();
                    let inner_args = self.parse_optional_type_args()?;
                    chain.push((inner_name, inner_args));
                    match self.peek() {
                        Some(';') => {
                            self.bump();
                            break;
                        }
                        Some('.') => continue,
                        _ => return Err(self.error()),
                    }
                }
                Ok(Signature::ObjectInner(package, chain))
            }
            _ => Err(self.error()),
        }
    }

    fn parse_optional_type_args(&mut self) -> Result<Vec<TypeArg>> {
        if self.peek() != Some('<') {
            return Ok(vec![]);
        }
        self.bump();
        let mut args = vec![];
        loop {
            if self.peek() == Some('>') {
                self.bump();
                break;
            }
            args.push(self.parse_type_arg()?);
        }
        Ok(args)
    }

    fn parse_type_arg(&mut self) -> Result<TypeArg> {
        match self.peek() {
            Some('*') => {
                self.bump();
                Ok(TypeArg::Any)
            }
            Some('+') => {
                self.bump();
                Ok(TypeArg::Typed(Wildcard::Extends, Box::new(self.parse_type()?)))
            }
            Some('-') => {
                self.bump();
                Ok(TypeArg::Typed(Wildcard::Super, Box::new(self.parse_type()?)))
            }
            Some(_) => Ok(TypeArg::Typed(Wildcard::None, Box::new(self.parse_type()?))),
            None => Err(self.error()),
        }
    }

    fn parse_method(&mut self) -> Result<Signature> {
        self.expect('(')?;
        let mut args = vec![];
        loop {
            if self.peek() == Some(')') {
                self.bump();
                break;
            }
            args.push(self.parse_type()?);
        }
        let ret = if self.peek() == Some('V') {
            self.bump();
            None
        } else {
            Some(Box::new(self.parse_type()?))
        };
        Ok(Signature::Method(args, ret))
    }

    fn parse_formal_type_params(&mut self) -> Result<Vec<FormalTypeParam>> {
        if self.peek() != Some('<') {
            return Ok(vec![]);
        }
        self.bump();
        let mut params = vec![];
        loop {
            if self.peek() == Some('>') {
                self.bump();
                break;
            }
            params.push(self.parse_formal_type_param()?);
        }
        Ok(params)
    }

    fn parse_formal_type_param(&mut self) -> Result<FormalTypeParam> {
        let name = self.take_until_any(&[':'])?.to_string();
        self.expect(':')?;
        let extends = if self.peek() == Some(':') {
            None
        } else {
            Some(self.parse_type()?)
        };
        let mut interfaces = vec![];
        while self.peek() == Some(':') {
            self.bump();
            interfaces.push(self.parse_type()?);
        }
        Ok(FormalTypeParam {
            name,
            extends,
            interfaces,
        })
    }

    fn parse_throws(&mut self) -> Result<Vec<Signature>> {
        let mut throws = vec![];
        while self.peek() == Some('^') {
            self.bump();
            throws.push(self.parse_type()?);
        }
        Ok(throws)
    }
}

/// Parses a plain field descriptor, e.g. `[Ljava/lang/String;`.
pub fn parse_field_descriptor(s: &str) -> Result<Signature> {
    let mut p = Parser::new(s);
    let sig = p.parse_type()?;
    p.finish()?;
    Ok(sig)
}

/// Parses a plain method descriptor, e.g. `(Ljava/lang/String;I)V`.
pub fn parse_method_descriptor(s: &str) -> Result<Signature> {
    let mut p = Parser::new(s);
    let sig = p.parse_method()?;
    p.finish()?;
    Ok(sig)
}

/// A field's generic `Signature` attribute shares the field-descriptor
/// grammar, just with generics and type variables allowed.
pub fn parse_field_signature(s: &str) -> Result<Signature> {
    parse_field_descriptor(s)
}

/// A class's generic `Signature` attribute: optional formal type parameters,
/// the superclass signature, then zero or more interface signatures back to
/// back until the string is exhausted.
pub fn parse_class_signature(s: &str) -> Result<(Vec<FormalTypeParam>, Signature, Vec<Signature>)> {
    let mut p = Parser::new(s);
    let params = p.parse_formal_type_params()?;
    let super_sig = p.parse_type()?;
    let mut interfaces = vec![];
    while !p.at_end() {
        interfaces.push(p.parse_type()?);
    }
    p.finish()?;
    Ok((params, super_sig, interfaces))
}

/// A method's generic `Signature` attribute: optional formal type parameters,
/// the method signature, then an optional throws clause.
pub fn parse_method_signature(
    s: &str,
) -> Result<(Vec<FormalTypeParam>, Signature, Vec<Signature>)> {
    let mut p = Parser::new(s);
    let params = p.parse_formal_type_params()?;
    let method_sig = p.parse_method()?;
    let throws = p.parse_throws()?;
    p.finish()?;
    Ok((params, method_sig, throws))
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signature::Byte => write!(f, "B"),
            Signature::Char => write!(f, "C"),
            Signature::Double => write!(f, "D"),
            Signature::Float => write!(f, "F"),
            Signature::Int => write!(f, "I"),
            Signature::Long => write!(f, "J"),
            Signature::Short => write!(f, "S"),
            Signature::Bool => write!(f, "Z"),
            Signature::TypeVariable(name) => write!(f, "T{name};"),
            Signature::Array(elem, size) => {
                write!(f, "[")?;
                if let Some(n) = size {
                    write!(f, "{n}")?;
                }
                write!(f, "{elem}")
            }
            Signature::Object(path, args) => {
                write!(f, "L")?;
                for seg in &path.package {
                    write!(f, "{seg}/")?;
                }
                write!(f, "{}", path.name)?;
                fmt_type_args(f, args)?;
                write!(f, ";")
            }
            Signature::ObjectInner(package, chain) => {
                write!(f, "L")?;
                for seg in package {
                    write!(f, "{seg}/")?;
                }
                for (i, (name, args)) in chain.iter().enumerate() {
                    if i > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{name}")?;
                    fmt_type_args(f, args)?;
                }
                write!(f, ";")
            }
            Signature::Method(args, ret) => {
                write!(f, "(")?;
                for arg in args {
                    write!(f, "{arg}")?;
                }
                write!(f, ")")?;
                match ret {
                    Some(ret) => write!(f, "{ret}"),
                    None => write!(f, "V"),
                }
            }
        }
    }
}

fn fmt_type_args(f: &mut fmt::Formatter<'_>, args: &[TypeArg]) -> fmt::Result {
    if args.is_empty() {
        return Ok(());
    }
    write!(f, "<")?;
    for arg in args {
        match arg {
            TypeArg::Any => write!(f, "*")?,
            TypeArg::Typed(Wildcard::None, ty) => write!(f, "{ty}")?,
            TypeArg::Typed(Wildcard::Extends, ty) => write!(f, "+{ty}")?,
            TypeArg::Typed(Wildcard::Super, ty) => write!(f, "-{ty}")?,
        }
    }
    write!(f, ">")
}

impl fmt::Display for FormalTypeParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.name)?;
        if let Some(extends) = &self.extends {
            write!(f, "{extends}")?;
        }
        for iface in &self.interfaces {
            write!(f, ":{iface}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn primitives_and_arrays() {
        assert_eq!(parse_field_descriptor("B").unwrap(), Signature::Byte);
        assert_eq!(
            parse_field_descriptor("[I").unwrap(),
            Signature::Array(Box::new(Signature::Int), None)
        );
        assert_eq!(
            parse_field_descriptor("[[Z").unwrap(),
            Signature::Array(Box::new(Signature::Array(Box::new(Signature::Bool), None)), None)
        );
    }

    #[test]
    fn object_type() {
        assert_eq!(
            parse_field_descriptor("Ljava/lang/String;").unwrap(),
            Signature::Object(Path::new(vec!["java".into(), "lang".into()], "String".into()), vec![])
        );
    }

    #[test]
    fn method_descriptor_round_trip() {
        let descriptor = "(Ljava/lang/String;[I)V";
        let sig = parse_method_descriptor(descriptor).unwrap();
        assert_eq!(
            sig,
            Signature::Method(
                vec![
                    Signature::Object(Path::new(vec!["java".into(), "lang".into()], "String".into()), vec![]),
                    Signature::Array(Box::new(Signature::Int), None),
                ],
                None
            )
        );
        assert_eq!(sig.to_string(), descriptor);
    }

    #[test]
    fn generic_inner_class() {
        let sig_str = "Ljava/util/Map<TK;TV;>.Entry<TK;TV;>;";
        let sig = parse_field_signature(sig_str).unwrap();
        let k = TypeArg::Typed(Wildcard::None, Box::new(Signature::TypeVariable("K".into())));
        let v = TypeArg::Typed(Wildcard::None, Box::new(Signature::TypeVariable("V".into())));
        assert_eq!(
            sig,
            Signature::ObjectInner(
                vec!["java".into(), "util".into()],
                vec![
                    ("Map".into(), vec![k.clone(), v.clone()]),
                    ("Entry".into(), vec![k, v]),
                ]
            )
        );
        assert_eq!(sig.to_string(), sig_str);
    }

    #[test]
    fn inner_with_package_is_an_error() {
        let err = parse_field_signature("Lfoo/Bar.baz/Quux;").unwrap_err();
        assert!(matches!(err, DecodeError::InnerWithPackage(_)));
    }

    #[test]
    fn bounded_wildcards() {
        let sig = parse_field_signature("Ljava/util/List<+Ljava/lang/Number;>;").unwrap();
        match sig {
            Signature::Object(_, args) => {
                assert_eq!(args.len(), 1);
                assert!(matches!(args[0], TypeArg::Typed(Wildcard::Extends, _)));
            }
            other => panic!("unexpected signature: {other:?}"),
        }
    }

    #[test]
    fn method_signature_with_type_params_and_throws() {
        let sig_str = "<T:Ljava/lang/Object;>(TT;)V^Ljava/io/IOException;";
        let (params, method_sig, throws) = parse_method_signature(sig_str).unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].name, "T");
        assert_eq!(
            params[0].extends,
            Some(Signature::Object(Path::new(vec!["java".into(), "lang".into()], "Object".into()), vec![]))
        );
        assert_eq!(
            method_sig,
            Signature::Method(vec![Signature::TypeVariable("T".into())], None)
        );
        assert_eq!(throws.len(), 1);
    }

    #[test]
    fn trailing_garbage_is_rejected() {
        assert!(parse_field_descriptor("IJ").is_err());
        assert!(parse_field_descriptor("").is_err());
        assert!(parse_field_descriptor("Q").is_err());
    }

    #[test]
    fn depth_limit_is_enforced() {
        let deep: String = "[".repeat(MAX_DEPTH + 10) + "I";
        assert!(matches!(
            parse_field_descriptor(&deep),
            Err(DecodeError::SignatureTooDeep)
        ));
    }
}
