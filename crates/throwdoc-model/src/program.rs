//! The declaration arena handed over by the front end.

use crate::decl::{
    DeclId, DeclKind, Declaration, DocumentationMode, ExternalModule, ModuleId, Origin,
};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use throwdoc_common::{Accessor, AccessorShape};

/// Kind prefixes of stable documentation ids.
const DOC_ID_PREFIXES: [&str; 5] = ["T:", "M:", "P:", "E:", "F:"];

#[derive(Debug, thiserror::Error)]
pub enum ProgramLoadError {
    #[error("malformed program dump: {0}")]
    Json(#[from] serde_json::Error),
    #[error("declaration {index} references out-of-range declaration {target}")]
    DanglingReference { index: usize, target: u32 },
    #[error("declaration {index} references unknown module {module}")]
    UnknownModule { index: usize, module: u32 },
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Program {
    pub decls: Vec<Declaration>,
    #[serde(default)]
    pub modules: Vec<Arc<ExternalModule>>,
    #[serde(default)]
    pub documentation_mode: DocumentationMode,
    #[serde(skip)]
    doc_id_index: FxHashMap<String, DeclId>,
}

impl Program {
    /// Build a program from parts and index it.
    pub fn from_parts(
        decls: Vec<Declaration>,
        modules: Vec<Arc<ExternalModule>>,
        documentation_mode: DocumentationMode,
    ) -> Self {
        let mut program = Self {
            decls,
            modules,
            documentation_mode,
            doc_id_index: FxHashMap::default(),
        };
        program.reindex();
        program
    }

    /// Load a program dump produced by a front end.
    pub fn from_json(text: &str) -> Result<Self, ProgramLoadError> {
        let mut program: Self = serde_json::from_str(text)?;
        program.validate()?;
        program.reindex();
        Ok(program)
    }

    fn validate(&self) -> Result<(), ProgramLoadError> {
        let len = self.decls.len();
        for (index, decl) in self.decls.iter().enumerate() {
            let refs = decl
                .containing
                .iter()
                .chain(decl.base.iter())
                .chain(decl.original.iter())
                .chain(decl.overridden.iter())
                .chain(decl.associated.iter())
                .chain(decl.implements.iter())
                .chain(decl.accessors.iter());
            for target in refs {
                if target.index() >= len {
                    return Err(ProgramLoadError::DanglingReference {
                        index,
                        target: target.0,
                    });
                }
            }
            if let Origin::External(module) = decl.origin
                && module.0 as usize >= self.modules.len()
            {
                return Err(ProgramLoadError::UnknownModule {
                    index,
                    module: module.0,
                });
            }
        }
        Ok(())
    }

    fn reindex(&mut self) {
        self.doc_id_index.clear();
        for (index, decl) in self.decls.iter().enumerate() {
            // First declaration wins; specialized copies share the id of
            // their original.
            self.doc_id_index
                .entry(decl.doc_id.clone())
                .or_insert(DeclId(index as u32));
        }
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    #[inline]
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Get a declaration. Handles always come from this program, so an
    /// out-of-range handle is an inconsistent front-end model.
    #[inline]
    pub fn decl(&self, id: DeclId) -> &Declaration {
        &self.decls[id.index()]
    }

    #[inline]
    pub fn get(&self, id: DeclId) -> Option<&Declaration> {
        self.decls.get(id.index())
    }

    pub fn ids(&self) -> impl Iterator<Item = DeclId> + '_ {
        (0..self.decls.len() as u32).map(DeclId)
    }

    /// Follow `original` links to the non-specialized declaration.
    pub fn canonical(&self, id: DeclId) -> DeclId {
        let mut current = id;
        // Bounded: a malformed original chain must not hang the analysis.
        for _ in 0..self.decls.len() {
            match self.get(current).and_then(|d| d.original) {
                Some(original) if original != current => current = original,
                _ => break,
            }
        }
        current
    }

    pub fn resolve_doc_id(&self, doc_id: &str) -> Option<DeclId> {
        self.doc_id_index.get(doc_id.trim()).copied()
    }

    /// Resolve a documentation cross reference written in `context`.
    ///
    /// Accepts stable ids (`T:N.Error`), unprefixed qualified names
    /// (`N.Error`, tried as each id kind) and finally a simple or partially
    /// qualified name that matches exactly one declaration.
    pub fn resolve_cref(&self, text: &str, context: Option<DeclId>) -> Option<DeclId> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if let Some(id) = self.resolve_doc_id(text) {
            return Some(id);
        }
        if has_doc_id_prefix(text) {
            return None;
        }
        for prefix in DOC_ID_PREFIXES {
            if let Some(id) = self.resolve_doc_id(&format!("{prefix}{text}")) {
                return Some(id);
            }
        }
        // Names relative to the enclosing namespace/type of the context.
        if let Some(scope) = context.and_then(|ctx| self.namespace_of(ctx)) {
            for prefix in DOC_ID_PREFIXES {
                if let Some(id) = self.resolve_doc_id(&format!("{prefix}{scope}.{text}")) {
                    return Some(id);
                }
            }
        }
        self.resolve_unique_suffix(text)
    }

    fn resolve_unique_suffix(&self, text: &str) -> Option<DeclId> {
        let dotted = format!(".{text}");
        let mut found: Option<DeclId> = None;
        for id in self.ids() {
            let decl = self.decl(id);
            if decl.original.is_some() || decl.kind.is_local_callable() {
                continue;
            }
            let name = strip_doc_id_prefix(&decl.doc_id);
            if name == text || name.ends_with(&dotted) {
                if found.is_some() {
                    return None;
                }
                found = Some(id);
            }
        }
        found
    }

    /// Qualified name of the namespace containing the type of `id`.
    fn namespace_of(&self, id: DeclId) -> Option<String> {
        let ty = self.containing_type(id).unwrap_or(id);
        let qualified = strip_doc_id_prefix(&self.decl(ty).doc_id);
        qualified.rfind('.').map(|dot| qualified[..dot].to_string())
    }

    // =========================================================================
    // Structure queries
    // =========================================================================

    /// Innermost type declaration containing `id`.
    pub fn containing_type(&self, id: DeclId) -> Option<DeclId> {
        let mut current = self.decl(id).containing;
        while let Some(candidate) = current {
            let decl = self.decl(candidate);
            if decl.kind.is_type() {
                return Some(candidate);
            }
            current = decl.containing;
        }
        None
    }

    /// Innermost non-local declaration containing a local function/closure.
    pub fn enclosing_member(&self, id: DeclId) -> DeclId {
        let mut current = id;
        for _ in 0..self.decls.len() {
            let decl = self.decl(current);
            if !decl.kind.is_local_callable() {
                break;
            }
            match decl.containing {
                Some(parent) => current = parent,
                None => break,
            }
        }
        current
    }

    /// Whether `ty` is `ancestor` or a class-chain descendant of it.
    ///
    /// Only the single-rooted class chain counts; implemented interfaces
    /// never make one type subsume another.
    pub fn is_subclass_of(&self, ty: DeclId, ancestor: DeclId) -> bool {
        let ancestor = self.canonical(ancestor);
        let mut current = Some(self.canonical(ty));
        let mut steps = 0usize;
        while let Some(candidate) = current {
            if candidate == ancestor {
                return true;
            }
            steps += 1;
            if steps > self.decls.len() {
                return false;
            }
            current = self.decl(candidate).base.map(|base| self.canonical(base));
        }
        false
    }

    /// Accessor sides declared by a property, indexer or event.
    pub fn accessor_shape(&self, member: DeclId) -> AccessorShape {
        let mut shape = AccessorShape::default();
        for &accessor in &self.decl(member).accessors {
            match self.decl(accessor).accessor() {
                Some(Accessor::Get) => shape.has_get = true,
                Some(Accessor::Set) => shape.has_set = true,
                Some(Accessor::Add) => shape.has_add = true,
                Some(Accessor::Remove) => shape.has_remove = true,
                Some(Accessor::None) | None => {}
            }
        }
        shape
    }

    /// The accessor declaration of `member` for one side.
    pub fn accessor_decl(&self, member: DeclId, accessor: Accessor) -> Option<DeclId> {
        self.decl(member)
            .accessors
            .iter()
            .copied()
            .find(|&id| self.decl(id).accessor() == Some(accessor))
    }

    /// For an accessor declaration, its owning member and side.
    pub fn accessor_owner(&self, id: DeclId) -> Option<(DeclId, Accessor)> {
        let decl = self.decl(id);
        let accessor = decl.accessor()?;
        decl.associated.map(|owner| (owner, accessor))
    }

    pub fn members_of(&self, ty: DeclId) -> impl Iterator<Item = DeclId> + '_ {
        self.ids().filter(move |&id| self.decl(id).containing == Some(ty))
    }

    /// Explicitly declared instance constructors of a type.
    pub fn constructors_of(&self, ty: DeclId) -> impl Iterator<Item = DeclId> + '_ {
        self.members_of(ty).filter(move |&id| {
            let decl = self.decl(id);
            decl.kind == DeclKind::Constructor && !decl.is_static && !decl.is_implicit
        })
    }

    /// The accessible parameterless instance constructor of a type, if any.
    ///
    /// A type without any explicit constructor has an implicit one.
    pub fn parameterless_constructor(&self, ty: DeclId) -> Option<DeclId> {
        self.members_of(ty).find(|&id| {
            let decl = self.decl(id);
            decl.kind == DeclKind::Constructor
                && !decl.is_static
                && decl.is_public
                && decl.parameter_count == 0
        })
    }

    pub fn module(&self, id: ModuleId) -> Option<&Arc<ExternalModule>> {
        self.modules.get(id.0 as usize)
    }

    pub fn module_of(&self, id: DeclId) -> Option<&Arc<ExternalModule>> {
        match self.decl(id).origin {
            Origin::External(module) => self.module(module),
            Origin::Source => None,
        }
    }

    /// Declarations analyzed on their own: source members with bodies and
    /// source classes (for the implicit constructor check). Local functions
    /// and closures are reached through their enclosing member.
    pub fn top_level_declarations(&self) -> Vec<DeclId> {
        self.ids()
            .filter(|&id| {
                let decl = self.decl(id);
                if !decl.is_in_source() || decl.original.is_some() {
                    return false;
                }
                match decl.kind {
                    DeclKind::Class | DeclKind::Struct => true,
                    DeclKind::LocalFunction | DeclKind::Lambda => false,
                    DeclKind::Interface => false,
                    _ => decl.body.is_some(),
                }
            })
            .collect()
    }

    /// Human readable name: `Type.Member`, or the simple name for types.
    pub fn display_name(&self, id: DeclId) -> String {
        let decl = self.decl(id);
        if let Some((owner, accessor)) = self.accessor_owner(id) {
            return format!("{}.{}", self.display_name(owner), accessor);
        }
        match decl.containing {
            Some(parent) if !decl.kind.is_type() => {
                format!("{}.{}", self.display_name(parent), decl.name)
            }
            _ => decl.name.clone(),
        }
    }
}

fn has_doc_id_prefix(text: &str) -> bool {
    DOC_ID_PREFIXES.iter().any(|prefix| text.starts_with(prefix))
}

/// `T:N.Type` -> `N.Type`; text without a prefix is returned unchanged.
pub fn strip_doc_id_prefix(doc_id: &str) -> &str {
    if has_doc_id_prefix(doc_id) {
        &doc_id[2..]
    } else {
        doc_id
    }
}
