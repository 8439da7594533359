//! Incremental construction of a [`Program`].
//!
//! Front ends that do not go through the JSON dump (and the tests) build
//! programs declaration by declaration. Stable ids follow the usual
//! documentation-id shape: `T:N.Type`, `M:N.Type.Method`, `P:N.Type.Prop`,
//! `E:N.Type.Event`, `F:N.Type.Field`; constructors are `M:N.Type.#ctor`
//! and accessors `M:N.Type.get_Prop`.

use crate::decl::{
    DeclId, DeclKind, Declaration, DocumentationMode, ExternalModule, ModuleId, Origin,
};
use crate::program::{Program, strip_doc_id_prefix};
use crate::syntax::Body;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use throwdoc_common::{Accessor, AccessorShape};

#[derive(Default)]
pub struct ProgramBuilder {
    decls: Vec<Declaration>,
    modules: Vec<ExternalModule>,
    documentation_mode: DocumentationMode,
    /// Module new declarations are attributed to; `None` means source.
    current_module: Option<ModuleId>,
    file: Option<String>,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the builder and index the program.
    pub fn finish(self) -> Program {
        Program::from_parts(
            self.decls,
            self.modules.into_iter().map(Arc::new).collect(),
            self.documentation_mode,
        )
    }

    pub fn documentation_mode(&mut self, mode: DocumentationMode) -> &mut Self {
        self.documentation_mode = mode;
        self
    }

    /// Source file recorded on subsequently added source declarations.
    pub fn file(&mut self, name: &str) -> &mut Self {
        self.file = Some(name.to_string());
        self
    }

    // =========================================================================
    // External modules
    // =========================================================================

    /// Register an external module with an optional side documentation file.
    pub fn external_module(&mut self, name: &str, documentation_xml: Option<&str>) -> ModuleId {
        let id = ModuleId(self.modules.len() as u32);
        self.modules.push(ExternalModule {
            name: name.to_string(),
            documentation_xml: documentation_xml.map(str::to_string),
            embedded_documentation: FxHashMap::default(),
        });
        id
    }

    /// Attach embedded documentation for one member of an external module.
    pub fn embedded_documentation(&mut self, module: ModuleId, doc_id: &str, xml: &str) {
        if let Some(m) = self.modules.get_mut(module.0 as usize) {
            m.embedded_documentation
                .insert(doc_id.to_string(), xml.to_string());
        }
    }

    /// Run `f` with new declarations attributed to `module`.
    pub fn in_module<R>(&mut self, module: ModuleId, f: impl FnOnce(&mut Self) -> R) -> R {
        let previous = self.current_module.replace(module);
        let result = f(self);
        self.current_module = previous;
        result
    }

    // =========================================================================
    // Types
    // =========================================================================

    /// Add a class; `qualified` is the namespace-qualified name (`N.Error`).
    pub fn class(&mut self, qualified: &str, base: Option<DeclId>) -> DeclId {
        let id = self.type_decl(DeclKind::Class, qualified);
        self.decls[id.index()].base = base;
        id
    }

    pub fn interface(&mut self, qualified: &str) -> DeclId {
        self.type_decl(DeclKind::Interface, qualified)
    }

    fn type_decl(&mut self, kind: DeclKind, qualified: &str) -> DeclId {
        let name = qualified.rsplit('.').next().unwrap_or(qualified);
        self.push(Declaration::new(kind, name, format!("T:{qualified}")))
    }

    // =========================================================================
    // Members
    // =========================================================================

    pub fn method(&mut self, ty: DeclId, name: &str) -> DeclId {
        self.member(ty, DeclKind::Method, name, 'M', name)
    }

    pub fn operator(&mut self, ty: DeclId, name: &str) -> DeclId {
        self.member(ty, DeclKind::Operator, name, 'M', name)
    }

    pub fn constructor(&mut self, ty: DeclId, parameter_count: u32) -> DeclId {
        let id = if parameter_count == 0 {
            self.member(ty, DeclKind::Constructor, ".ctor", 'M', "#ctor")
        } else {
            let suffix = format!("#ctor`{parameter_count}");
            self.member(ty, DeclKind::Constructor, ".ctor", 'M', &suffix)
        };
        self.decls[id.index()].parameter_count = parameter_count;
        id
    }

    pub fn field(&mut self, ty: DeclId, name: &str) -> DeclId {
        self.member(ty, DeclKind::Field, name, 'F', name)
    }

    /// Add a property with the accessor sides of `shape`.
    pub fn property(&mut self, ty: DeclId, name: &str, shape: AccessorShape) -> DeclId {
        let id = self.member(ty, DeclKind::Property, name, 'P', name);
        for accessor in [Accessor::Get, Accessor::Set] {
            if shape.has(accessor) {
                self.add_accessor(id, ty, name, accessor);
            }
        }
        id
    }

    pub fn indexer(&mut self, ty: DeclId, shape: AccessorShape) -> DeclId {
        let id = self.member(ty, DeclKind::Indexer, "this[]", 'P', "Item");
        for accessor in [Accessor::Get, Accessor::Set] {
            if shape.has(accessor) {
                self.add_accessor(id, ty, "Item", accessor);
            }
        }
        id
    }

    pub fn event(&mut self, ty: DeclId, name: &str) -> DeclId {
        let id = self.member(ty, DeclKind::Event, name, 'E', name);
        for accessor in [Accessor::Add, Accessor::Remove] {
            self.add_accessor(id, ty, name, accessor);
        }
        id
    }

    fn add_accessor(
        &mut self,
        owner: DeclId,
        ty: DeclId,
        name: &str,
        accessor: Accessor,
    ) -> DeclId {
        let accessor_name = format!("{accessor}_{name}");
        let id = self.member(ty, DeclKind::Accessor(accessor), &accessor_name, 'M', &accessor_name);
        self.decls[id.index()].associated = Some(owner);
        self.decls[owner.index()].accessors.push(id);
        id
    }

    /// Accessor declaration of `member` for one side.
    pub fn accessor(&self, member: DeclId, accessor: Accessor) -> Option<DeclId> {
        self.decls[member.index()]
            .accessors
            .iter()
            .copied()
            .find(|&id| self.decls[id.index()].accessor() == Some(accessor))
    }

    /// A local function declared inside `owner`.
    pub fn local_function(&mut self, owner: DeclId, name: &str) -> DeclId {
        let doc_id = format!("{}~{name}", self.decls[owner.index()].doc_id);
        let mut decl = Declaration::new(DeclKind::LocalFunction, name, doc_id);
        decl.containing = Some(owner);
        self.push(decl)
    }

    /// A closure created inside `owner`.
    pub fn lambda(&mut self, owner: DeclId) -> DeclId {
        let ordinal = self
            .decls
            .iter()
            .filter(|d| d.kind == DeclKind::Lambda && d.containing == Some(owner))
            .count();
        let doc_id = format!("{}~lambda{ordinal}", self.decls[owner.index()].doc_id);
        let mut decl = Declaration::new(DeclKind::Lambda, format!("lambda{ordinal}"), doc_id);
        decl.containing = Some(owner);
        self.push(decl)
    }

    fn member(
        &mut self,
        ty: DeclId,
        kind: DeclKind,
        name: &str,
        prefix: char,
        id_name: &str,
    ) -> DeclId {
        let qualified = strip_doc_id_prefix(&self.decls[ty.index()].doc_id).to_string();
        let mut decl = Declaration::new(kind, name, format!("{prefix}:{qualified}.{id_name}"));
        decl.containing = Some(ty);
        self.push(decl)
    }

    fn push(&mut self, mut decl: Declaration) -> DeclId {
        let id = DeclId(self.decls.len() as u32);
        match self.current_module {
            Some(module) => decl.origin = Origin::External(module),
            None => decl.file = self.file.clone(),
        }
        self.decls.push(decl);
        id
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    pub fn doc(&mut self, id: DeclId, documentation: &str) -> &mut Self {
        self.decls[id.index()].documentation = Some(documentation.to_string());
        self
    }

    pub fn body(&mut self, id: DeclId, body: Body) -> &mut Self {
        self.decls[id.index()].body = Some(body);
        self
    }

    pub fn overrides(&mut self, id: DeclId, base: DeclId) -> &mut Self {
        self.decls[id.index()].overridden = Some(base);
        self
    }

    pub fn implements(&mut self, id: DeclId, interface_member: DeclId) -> &mut Self {
        self.decls[id.index()].implements.push(interface_member);
        self
    }

    /// Mark `id` as a specialization of `original`.
    pub fn specialization_of(&mut self, id: DeclId, original: DeclId) -> &mut Self {
        self.decls[id.index()].original = Some(original);
        self
    }

    pub fn set_public(&mut self, id: DeclId, is_public: bool) -> &mut Self {
        self.decls[id.index()].is_public = is_public;
        self
    }

    pub fn set_static(&mut self, id: DeclId, is_static: bool) -> &mut Self {
        self.decls[id.index()].is_static = is_static;
        self
    }

    pub fn set_implicit(&mut self, id: DeclId, is_implicit: bool) -> &mut Self {
        self.decls[id.index()].is_implicit = is_implicit;
        self
    }

    pub fn decl_mut(&mut self, id: DeclId) -> &mut Declaration {
        &mut self.decls[id.index()]
    }
}
