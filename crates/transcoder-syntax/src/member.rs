//! Top-level members of a module, as enumerated by a reader.

use serde::{Deserialize, Serialize};

/// One named top-level member of a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleMember {
    pub name: String,
    pub kind: MemberKind,
}

/// What a module member is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    /// A function, with its own isolated source text.
    Callable { source: String },
    /// A reference to another module (`import x`, `from . import x`).
    Submodule { path: String },
    /// Anything else bound at module level (classes, state).
    Other { shape: String },
}

impl ModuleMember {
    pub fn callable(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Callable {
                source: source.into(),
            },
        }
    }

    pub fn submodule(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Submodule { path: path.into() },
        }
    }

    pub fn other(name: impl Into<String>, shape: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Other {
                shape: shape.into(),
            },
        }
    }

    /// Members starting with an underscore are private by convention.
    pub fn is_public(&self) -> bool {
        !self.name.starts_with('_')
    }
}
