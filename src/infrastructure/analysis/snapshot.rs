//! Immutable view of a program's type and member structure

use serde::{Deserialize, Serialize};

/// Declared accessibility of a type or member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    Public,
    /// Visible inside some enclosing scope only, e.g. `pub(crate)`
    Restricted,
    Private,
}

impl Visibility {
    pub fn is_public(self) -> bool {
        self == Visibility::Public
    }
}

/// What kind of callable a member is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberKind {
    Ordinary,
    Constructor,
    Accessor,
    Operator,
    TraitImpl,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDeclaration {
    pub name: String,
    pub kind: MemberKind,
    pub visibility: Visibility,
    /// Metadata name of the declared return type
    pub return_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDeclaration {
    pub name: String,
    pub namespace: String,
    pub visibility: Visibility,
    /// Declaration order
    #[serde(default)]
    pub members: Vec<MemberDeclaration>,
}

/// The declarations found in one source file, in file order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDeclarations {
    pub path: String,
    #[serde(default)]
    pub classes: Vec<ClassDeclaration>,
}

/// Everything the extractor may look at for one run.
///
/// File order is traversal order; hosts must supply files in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationSnapshot {
    #[serde(default)]
    pub files: Vec<SourceDeclarations>,
}

impl DeclarationSnapshot {
    pub fn new(files: Vec<SourceDeclarations>) -> Self {
        Self { files }
    }

    /// All classes in namespace/file-declaration order
    pub fn classes(&self) -> impl Iterator<Item = &ClassDeclaration> {
        self.files.iter().flat_map(|file| file.classes.iter())
    }

    /// Load a snapshot that a host serialized as JSON
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
