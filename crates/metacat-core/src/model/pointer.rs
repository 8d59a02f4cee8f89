//! Qualified names: the `Kind.TypeName` addressing used between objects.

use crate::error::Error;
use std::fmt;

/// Prefix of enumeration references.
pub const ENUMERATIONS_PREFIX: &str = "Enumerations";

/// Kind part of a qualified name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// A master-data catalog.
    Catalog,
    /// A document.
    Document,
    /// An enumeration.
    Enumeration,
}

impl PointerKind {
    /// Text used for this kind in qualified names.
    pub fn as_str(&self) -> &'static str {
        match self {
            PointerKind::Catalog => "Catalog",
            PointerKind::Document => "Document",
            PointerKind::Enumeration => ENUMERATIONS_PREFIX,
        }
    }
}

impl fmt::Display for PointerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed `Kind.TypeName` reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    /// Kind of the referenced object.
    pub kind: PointerKind,
    /// Name of the referenced object.
    pub type_name: String,
}

impl QualifiedName {
    /// Create a catalog reference.
    pub fn catalog(name: impl Into<String>) -> Self {
        Self {
            kind: PointerKind::Catalog,
            type_name: name.into(),
        }
    }

    /// Create a document reference.
    pub fn document(name: impl Into<String>) -> Self {
        Self {
            kind: PointerKind::Document,
            type_name: name.into(),
        }
    }

    /// Create an enumeration reference.
    pub fn enumeration(name: impl Into<String>) -> Self {
        Self {
            kind: PointerKind::Enumeration,
            type_name: name.into(),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.kind, self.type_name)
    }
}

fn split(pointer: &str) -> Result<(&str, &str), Error> {
    pointer.split_once('.').ok_or_else(|| Error::MalformedPointer {
        pointer: pointer.to_string(),
        reason: "missing `.` separator",
    })
}

/// Parse the target of a pointer field: `Catalog.X` or `Document.X`.
pub fn parse_pointer(pointer: &str) -> Result<QualifiedName, Error> {
    let (kind, type_name) = split(pointer)?;
    let kind = match kind {
        "Catalog" => PointerKind::Catalog,
        "Document" => PointerKind::Document,
        _ => {
            return Err(Error::MalformedPointer {
                pointer: pointer.to_string(),
                reason: "kind must be `Catalog` or `Document`",
            })
        }
    };
    Ok(QualifiedName {
        kind,
        type_name: type_name.to_string(),
    })
}

/// Parse the target of an enum field: `Enumerations.X`.
pub fn parse_enum_pointer(pointer: &str) -> Result<QualifiedName, Error> {
    let (kind, type_name) = split(pointer)?;
    if kind != ENUMERATIONS_PREFIX {
        return Err(Error::MalformedPointer {
            pointer: pointer.to_string(),
            reason: "enum pointers must start with `Enumerations.`",
        });
    }
    Ok(QualifiedName::enumeration(type_name))
}
