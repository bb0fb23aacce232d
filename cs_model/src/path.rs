use std::fmt;

/// A fully qualified class name: its package segments and its simple name, kept
/// apart rather than as one slash-joined string so callers never have to split it
/// again.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Path {
    pub package: Vec<String>,
    pub name: String,
}

impl Path {
    pub fn new(package: Vec<String>, name: String) -> Self {
        Self { package, name }
    }

    /// Splits a `/`-separated internal name (e.g. `java/lang/String`) into package
    /// segments and a simple name.
    pub fn from_internal_name(internal: &str) -> Self {
        let mut segments: Vec<&str> = internal.split('/').collect();
        let name = segments.pop().unwrap_or_default().to_string();
        let package = segments.into_iter().map(str::to_string).collect();
        Self { package, name }
    }

    pub fn object() -> Self {
        Self::from_internal_name("java/lang/Object")
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.package {
            write!(f, "{segment}/")?;
        }
        write!(f, "{}", self.name)
    }
}
