//! Declarations.

use crate::syntax::Body;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use throwdoc_common::{Accessor, Span};

/// Handle of a declaration in a [`Program`](crate::Program).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeclId(pub u32);

impl DeclId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle of an external (referenced, not analyzed) module.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclKind {
    Class,
    Interface,
    Struct,
    Method,
    Constructor,
    Operator,
    Property,
    Indexer,
    Event,
    /// One side of a property, indexer or event.
    Accessor(Accessor),
    Field,
    LocalFunction,
    Lambda,
}

impl DeclKind {
    pub const fn is_type(self) -> bool {
        matches!(self, Self::Class | Self::Interface | Self::Struct)
    }

    /// Members that own accessor declarations.
    pub const fn has_accessors(self) -> bool {
        matches!(self, Self::Property | Self::Indexer | Self::Event)
    }

    /// Declarations that are invoked when referenced in call position.
    pub const fn is_invocable(self) -> bool {
        matches!(
            self,
            Self::Method | Self::Constructor | Self::Operator | Self::LocalFunction | Self::Lambda
        )
    }

    /// Local callables are analyzed through their enclosing declaration.
    pub const fn is_local_callable(self) -> bool {
        matches!(self, Self::LocalFunction | Self::Lambda)
    }
}

/// Where a declaration comes from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Declared in the program being analyzed.
    #[default]
    Source,
    /// Declared in a referenced module; only its documentation is visible.
    External(ModuleId),
}

/// Whether the front end retained documentation comments.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentationMode {
    /// Documentation comments were dropped; nothing can be verified.
    None,
    Parse,
    #[default]
    Diagnose,
}

/// A named program entity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Declaration {
    pub kind: DeclKind,
    /// Simple name as written in source.
    pub name: String,
    /// Stable documentation id (`T:N.Type`, `M:N.Type.Method`, ...).
    pub doc_id: String,
    #[serde(default)]
    pub containing: Option<DeclId>,
    /// Base class of a type.
    #[serde(default)]
    pub base: Option<DeclId>,
    /// Non-specialized form of a constructed/specialized declaration.
    #[serde(default)]
    pub original: Option<DeclId>,
    #[serde(default)]
    pub overridden: Option<DeclId>,
    /// Interface members this declaration implements.
    #[serde(default)]
    pub implements: SmallVec<[DeclId; 2]>,
    /// Accessor declarations of a property, indexer or event.
    #[serde(default)]
    pub accessors: SmallVec<[DeclId; 2]>,
    /// Owning member of an accessor declaration.
    #[serde(default)]
    pub associated: Option<DeclId>,
    #[serde(default)]
    pub parameter_count: u32,
    #[serde(default = "default_true")]
    pub is_public: bool,
    #[serde(default)]
    pub is_static: bool,
    /// Compiler-synthesized (e.g. an implicit default constructor).
    #[serde(default)]
    pub is_implicit: bool,
    #[serde(default)]
    pub origin: Origin,
    /// Raw structured documentation text attached in source.
    #[serde(default)]
    pub documentation: Option<String>,
    #[serde(default)]
    pub body: Option<Body>,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub span: Span,
}

const fn default_true() -> bool {
    true
}

impl Declaration {
    pub fn new(kind: DeclKind, name: impl Into<String>, doc_id: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            doc_id: doc_id.into(),
            containing: None,
            base: None,
            original: None,
            overridden: None,
            implements: SmallVec::new(),
            accessors: SmallVec::new(),
            associated: None,
            parameter_count: 0,
            is_public: true,
            is_static: false,
            is_implicit: false,
            origin: Origin::Source,
            documentation: None,
            body: None,
            file: None,
            span: Span::dummy(),
        }
    }

    #[inline]
    pub const fn is_in_source(&self) -> bool {
        matches!(self.origin, Origin::Source)
    }

    /// The accessor side, for accessor declarations.
    pub const fn accessor(&self) -> Option<Accessor> {
        match self.kind {
            DeclKind::Accessor(accessor) => Some(accessor),
            _ => None,
        }
    }
}

/// A referenced module whose declarations are documented out of band.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ExternalModule {
    pub name: String,
    /// Contents of the side documentation file shipped with the module.
    #[serde(default)]
    pub documentation_xml: Option<String>,
    /// Per-member documentation embedded in the module metadata, keyed by
    /// stable id.
    #[serde(default)]
    pub embedded_documentation: rustc_hash::FxHashMap<String, String>,
}
