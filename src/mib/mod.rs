//! MIB registry.
//!
//! Loads MIB modules and maps `Module::symbol` names to numeric OIDs. Module
//! sources are searched in order:
//!
//! 1. built-in SMI base modules (`SNMPv2-SMI`, `SNMPv2-TC`, `RFC1155-SMI`, ...)
//! 2. directories on the search path, trying `M`, `M.txt`, `M.mib` and `M.my`
//! 3. modules bundled with the crate (`SNMPv2-MIB`, `IF-MIB`, ...)
//!
//! Module text is read leniently: only imports, OID assignments and the
//! `SYNTAX` of each object are extracted.
//!
//! # Example
//!
//! ```
//! use snmpy::mib::Registry;
//! use snmpy::oid;
//!
//! let mut registry = Registry::new();
//! registry.load(["IF-MIB"]).unwrap();
//! assert_eq!(
//!     registry.resolve("IF-MIB", "ifNumber").unwrap(),
//!     oid!(1, 3, 6, 1, 2, 1, 2, 1)
//! );
//! ```

mod base;
mod bundled;
mod lexer;
mod oid_ref;
mod parser;
mod syntax;

pub use oid_ref::{OidRef, SymbolicRef};
pub use syntax::Syntax;

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crate::error::{Error, LoadErrorKind, Result};
use crate::oid::Oid;
use base::BaseModule;
use parser::{ModuleDef, OidAssignment, OidComponent, TypeRef};

/// File names tried for module `M` in each search directory.
const EXTENSIONS: [&str; 4] = ["", ".txt", ".mib", ".my"];

/// Textual conventions may refer to other conventions; bound the chain.
const MAX_TYPE_DEPTH: usize = 16;

/// A named node of the OID tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MibObject {
    pub module: String,
    pub name: String,
    pub oid: Oid,
    /// Base syntax for objects with a `SYNTAX` clause.
    pub syntax: Option<Syntax>,
}

#[derive(Debug)]
struct Module {
    name: String,
    objects: HashMap<String, MibObject>,
    types: HashMap<String, Syntax>,
}

impl Module {
    fn from_base(base: BaseModule) -> Self {
        let objects = base
            .nodes()
            .iter()
            .map(|(name, arcs)| {
                let object = MibObject {
                    module: base.name().to_string(),
                    name: name.to_string(),
                    oid: Oid::from_slice(arcs),
                    syntax: None,
                };
                (name.to_string(), object)
            })
            .collect();
        let types = base
            .types()
            .iter()
            .map(|(name, syntax)| (name.to_string(), *syntax))
            .collect();
        Self {
            name: base.name().to_string(),
            objects,
            types,
        }
    }
}

enum Source {
    Base(BaseModule),
    Text(Cow<'static, str>),
}

/// Loaded MIB modules and the search path used to find more.
#[derive(Debug, Default)]
pub struct Registry {
    search_path: Vec<PathBuf>,
    modules: HashMap<String, Module>,
    load_order: Vec<String>,
    by_oid: BTreeMap<Oid, (String, String)>,
}

impl Registry {
    /// Create an empty registry with an empty search path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append directories to the search path. Order is preserved and
    /// duplicates are kept.
    pub fn add_path<I, P>(&mut self, paths: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.search_path.extend(paths.into_iter().map(Into::into));
    }

    pub fn search_path(&self) -> &[PathBuf] {
        &self.search_path
    }

    /// Load modules in order, together with everything they import.
    ///
    /// Modules that are already loaded are skipped. Stops at the first
    /// failure; a module that fails to load leaves no entries behind, while
    /// dependencies loaded before the failure stay loaded.
    pub fn load<I, S>(&mut self, modules: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for module in modules {
            let mut importing = Vec::new();
            self.load_module(module.as_ref(), &mut importing)?;
        }
        Ok(())
    }

    /// Load a module from its source text, e.g. a vendor MIB embedded with
    /// `include_str!`. Imports are found as for [`load`](Self::load).
    ///
    /// Returns the module name. Text for a module that is already loaded is
    /// still parsed but otherwise ignored.
    ///
    /// ```
    /// use snmpy::mib::Registry;
    /// use snmpy::oid;
    ///
    /// let mut registry = Registry::new();
    /// let name = registry
    ///     .load_text(
    ///         "ACME-MIB DEFINITIONS ::= BEGIN
    ///          IMPORTS enterprises FROM SNMPv2-SMI;
    ///          acme OBJECT IDENTIFIER ::= { enterprises 99999 }
    ///          END",
    ///     )
    ///     .unwrap();
    /// assert_eq!(name, "ACME-MIB");
    /// assert_eq!(registry.resolve("ACME-MIB", "acme").unwrap(), oid!(1, 3, 6, 1, 4, 1, 99999));
    /// ```
    pub fn load_text(&mut self, text: &str) -> Result<String> {
        let module = self.build_from_text(None, text, &mut Vec::new())?;
        let name = module.name.clone();
        if self.is_loaded(&name) {
            tracing::debug!(target: "snmpy::mib", { snmp.module = %name }, "module already loaded");
        } else {
            tracing::debug!(target: "snmpy::mib", { snmp.module = %name, objects = module.objects.len() }, "loaded module from text");
            self.insert(module);
        }
        Ok(name)
    }

    pub fn is_loaded(&self, module: &str) -> bool {
        self.modules.contains_key(module)
    }

    /// Names of the loaded modules, in load order.
    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.load_order.iter().map(String::as_str)
    }

    pub fn lookup(&self, module: &str, symbol: &str) -> Option<&MibObject> {
        self.modules.get(module)?.objects.get(symbol)
    }

    /// OID of `module::symbol`.
    ///
    /// Fails with [`Error::UnknownSymbol`] when the module is not loaded or
    /// does not define the symbol.
    pub fn resolve(&self, module: &str, symbol: &str) -> Result<Oid> {
        self.lookup(module, symbol)
            .map(|object| object.oid.clone())
            .ok_or_else(|| Error::unknown_symbol(module, symbol))
    }

    /// Name an OID by its longest registered prefix.
    ///
    /// ```
    /// use snmpy::mib::Registry;
    /// use snmpy::oid;
    ///
    /// let mut registry = Registry::new();
    /// registry.load(["SNMPv2-MIB"]).unwrap();
    /// let name = registry.translate(&oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)).unwrap();
    /// assert_eq!(name.to_string(), "SNMPv2-MIB::sysDescr.0");
    /// ```
    pub fn translate(&self, oid: &Oid) -> Option<SymbolicRef> {
        let arcs = oid.arcs();
        (1..=arcs.len()).rev().find_map(|len| {
            self.by_oid
                .get(&Oid::from_slice(&arcs[..len]))
                .map(|(module, symbol)| SymbolicRef::new(module, symbol, &arcs[len..]))
        })
    }

    fn load_module(&mut self, name: &str, importing: &mut Vec<String>) -> Result<()> {
        if self.is_loaded(name) {
            tracing::debug!(target: "snmpy::mib", { snmp.module = name }, "module already loaded");
            return Ok(());
        }
        if importing.iter().any(|m| m == name) {
            let importer = importing.last().map(String::as_str).unwrap_or(name);
            return Err(Error::load(
                importer,
                LoadErrorKind::CircularImport {
                    dependency: name.to_string(),
                },
            ));
        }

        let module = match self.find_source(name)? {
            Source::Base(base) => Module::from_base(base),
            Source::Text(text) => self.build_from_text(Some(name), &text, importing)?,
        };

        tracing::debug!(
            target: "snmpy::mib",
            {
                snmp.module = name,
                objects = module.objects.len(),
                types = module.types.len()
            },
            "loaded module"
        );
        self.insert(module);
        Ok(())
    }

    /// Parse module text, load its imports and resolve it.
    ///
    /// With `expected` set, the module must declare that name.
    fn build_from_text(
        &mut self,
        expected: Option<&str>,
        text: &str,
        importing: &mut Vec<String>,
    ) -> Result<Module> {
        let def = parser::parse(text).map_err(|e| {
            Error::load(
                expected.unwrap_or("<text>"),
                LoadErrorKind::Syntax {
                    line: e.line,
                    message: e.message,
                },
            )
        })?;
        let name = def.name;
        if let Some(expected) = expected
            && expected != name
        {
            return Err(Error::load(
                expected,
                LoadErrorKind::NameMismatch {
                    found: name.to_string(),
                },
            ));
        }

        importing.push(name.to_string());
        for import in &def.imports {
            match self.load_module(import.module, importing) {
                Err(Error::Load {
                    module,
                    kind: LoadErrorKind::NotFound,
                }) if &*module == import.module => {
                    return Err(Error::load(
                        name,
                        LoadErrorKind::MissingDependency {
                            dependency: import.module.to_string(),
                        },
                    ));
                }
                result => result?,
            }
        }
        importing.pop();

        self.build_module(&def)
    }

    fn find_source(&self, name: &str) -> Result<Source> {
        if let Some(base) = BaseModule::from_name(name) {
            return Ok(Source::Base(base));
        }

        for dir in &self.search_path {
            for ext in EXTENSIONS {
                let path = dir.join(format!("{}{}", name, ext));
                if path.is_file() {
                    return read_source(name, &path).map(|text| Source::Text(Cow::Owned(text)));
                }
            }
        }

        if let Some(text) = bundled::find(name) {
            tracing::debug!(target: "snmpy::mib", { snmp.module = name }, "using bundled module");
            return Ok(Source::Text(Cow::Borrowed(text)));
        }

        Err(Error::load(name, LoadErrorKind::NotFound))
    }

    /// Resolve a parsed module against the loaded registry.
    ///
    /// Everything is resolved before anything is inserted, so a failure
    /// leaves the registry untouched.
    fn build_module(&self, def: &ModuleDef<'_>) -> Result<Module> {
        let types = def
            .types
            .iter()
            .filter_map(|ty| {
                self.resolve_type(def, ty.syntax, 0)
                    .map(|syntax| (ty.name.to_string(), syntax))
            })
            .collect();

        // OID values may refer forward, so resolve until nothing changes
        let mut resolved: HashMap<&str, Oid> = HashMap::new();
        let mut pending: Vec<&OidAssignment<'_>> = def.oids.iter().collect();
        while !pending.is_empty() {
            let before = pending.len();
            pending.retain(|assignment| match self.resolve_value(def, assignment, &resolved) {
                Some(oid) => {
                    resolved.insert(assignment.name, oid);
                    false
                }
                None => true,
            });
            if pending.len() == before {
                break;
            }
        }
        if let Some(assignment) = pending.first() {
            tracing::debug!(
                target: "snmpy::mib",
                {
                    snmp.module = def.name,
                    line = assignment.line
                },
                "unresolved OID assignment {}",
                assignment.name
            );
            return Err(Error::load(
                def.name,
                LoadErrorKind::UnresolvedOid {
                    symbol: assignment.name.to_string(),
                },
            ));
        }

        let objects = def
            .oids
            .iter()
            .filter_map(|assignment| {
                let oid = resolved.get(assignment.name)?.clone();
                let syntax = assignment
                    .syntax
                    .and_then(|ty| self.resolve_type(def, ty, 0));
                let object = MibObject {
                    module: def.name.to_string(),
                    name: assignment.name.to_string(),
                    oid,
                    syntax,
                };
                Some((assignment.name.to_string(), object))
            })
            .collect();

        Ok(Module {
            name: def.name.to_string(),
            objects,
            types,
        })
    }

    fn resolve_value(
        &self,
        def: &ModuleDef<'_>,
        assignment: &OidAssignment<'_>,
        resolved: &HashMap<&str, Oid>,
    ) -> Option<Oid> {
        let (first, rest) = assignment.components.split_first()?;
        let mut arcs = match *first {
            OidComponent::Number(arc) | OidComponent::NamedNumber(_, arc) => vec![arc],
            OidComponent::Name(name) => self.resolve_name(def, name, resolved)?.arcs().to_vec(),
        };
        for component in rest {
            match *component {
                OidComponent::Number(arc) | OidComponent::NamedNumber(_, arc) => arcs.push(arc),
                OidComponent::Name(_) => return None,
            }
        }
        Some(Oid::new(arcs))
    }

    fn resolve_name(
        &self,
        def: &ModuleDef<'_>,
        name: &str,
        resolved: &HashMap<&str, Oid>,
    ) -> Option<Oid> {
        if let Some(oid) = resolved.get(name) {
            return Some(oid.clone());
        }
        if let Some(object) = def
            .import_source(name)
            .and_then(|module| self.lookup(module, name))
        {
            return Some(object.oid.clone());
        }
        match name {
            "ccitt" | "itu-t" => Some(Oid::from_slice(&[0])),
            "iso" => Some(Oid::from_slice(&[1])),
            "joint-iso-ccitt" | "joint-iso-itu-t" => Some(Oid::from_slice(&[2])),
            _ => None,
        }
    }

    fn resolve_type(&self, def: &ModuleDef<'_>, ty: TypeRef<'_>, depth: usize) -> Option<Syntax> {
        let name = ty.name()?;
        if depth > MAX_TYPE_DEPTH {
            return None;
        }
        if let Some(local) = def.types.iter().find(|local| local.name == name) {
            return self.resolve_type(def, local.syntax, depth + 1);
        }
        if let Some(syntax) = def
            .import_source(name)
            .and_then(|module| self.modules.get(module))
            .and_then(|module| module.types.get(name))
        {
            return Some(*syntax);
        }
        Syntax::from_name(name)
    }

    fn insert(&mut self, module: Module) {
        for object in module.objects.values() {
            self.by_oid
                .entry(object.oid.clone())
                .or_insert_with(|| (object.module.clone(), object.name.clone()));
        }
        self.load_order.push(module.name.clone());
        self.modules.insert(module.name.clone(), module);
    }
}

fn read_source(name: &str, path: &Path) -> Result<String> {
    tracing::debug!(
        target: "snmpy::mib",
        {
            snmp.module = name,
            snmp.path = %path.display()
        },
        "reading module"
    );
    let bytes = std::fs::read(path).map_err(|e| Error::load(name, LoadErrorKind::Io(e.kind())))?;
    // Vendor MIBs are frequently Latin-1
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
