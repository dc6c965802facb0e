//  PACKAGE.rs
//    by Lut99
//
//  Created:
//    06 Mar 2025, 10:24:18
//  Last edited:
//    21 Aug 2025, 14:55:30
//  Auto updated?
//    Yes
//
//  Description:
//!   Implements the package layer of the resolution chain: loads and
//!   merges a package's source files, then resolves every declared
//!   symbol through the signature and symbol caches.
//

use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use karst_dsl::ast::declarations::Declaration;
use karst_dsl::parse_source;
use log::debug;

use crate::cache::AcyclicCache;
use crate::collections::LinearMap;
use crate::errors::{AstError, Subject};
use crate::name::Name;
use crate::semantic::{Package, Signature, Symbol};
use super::module::ModuleChecker;
use super::symbol::SymbolChecker;


/***** LIBRARY *****/
/// What a package compiles to, per the module configuration.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum PackageKind {
    /// Declared as an executable.
    Executable,
    /// Declared as a library.
    Library,
    /// Not declared at all; resolvable only from within the module.
    Implementation,
}

/// The package layer of the resolution chain.
///
/// Owns the package's merged declaration table plus two caches: the signature cache resolves the
/// cheap, strictly acyclic half of a symbol (parameter and return types, type-ness of structs),
/// the symbol cache the full thing. A procedure body only ever needs the *signatures* of its
/// callees, which is what makes mutual recursion within one package legal.
pub struct PackageChecker<'m, 'c> {
    /// The module checker that spawned us, for cross-package accesses.
    parent       : &'m mut ModuleChecker<'c>,
    /// What this package compiles to.
    kind         : PackageKind,
    /// The fully qualified name of this package.
    name         : Name,
    /// The merged declarations of all source files, keyed by identifier.
    declarations : LinearMap<String, (Rc<PathBuf>, Declaration)>,
    /// The signature cache.
    signatures   : AcyclicCache<String, Rc<Signature>>,
    /// The symbol cache.
    symbols      : AcyclicCache<String, Rc<Symbol>>,
}

impl<'m, 'c> PackageChecker<'m, 'c> {
    /// Resolves the package with the given name.
    ///
    /// # Arguments
    /// - `parent`: The [`ModuleChecker`] to resolve cross-package accesses through.
    /// - `kind`: What the package compiles to, per the module configuration.
    /// - `name`: The fully qualified name of the package.
    ///
    /// # Returns
    /// The resolved [`Package`].
    ///
    /// # Errors
    /// This function errors if the package's sources fail to load or parse, two declarations
    /// share a name, or any symbol fails to resolve.
    pub(crate) fn check(parent: &'m mut ModuleChecker<'c>, kind: PackageKind, name: Name) -> Result<Rc<Package>, AstError> {
        debug!("Resolving package '{name}'");

        // The package's directory is its name below `src/`, minus the module segment
        let mut directory: PathBuf = parent.sources();
        for segment in &name.segments()[1..] {
            directory.push(segment);
        }

        // Load and merge the declarations of every source file, in lexicographic file order
        let mut files: Vec<PathBuf> = fs::read_dir(&directory)
            .map_err(|source| AstError::Io{ path: directory.clone(), source })?
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| path.extension().map(|ext| ext == "karst").unwrap_or(false))
            .collect();
        files.sort();
        let mut declarations: LinearMap<String, (Rc<PathBuf>, Declaration)> = LinearMap::new();
        for file in files {
            let raw: String = fs::read_to_string(&file).map_err(|source| AstError::Io{ path: file.clone(), source })?;
            let decls: Vec<Declaration> = parse_source(&raw).map_err(|err| AstError::Parse{ path: file.clone(), err })?;
            let file: Rc<PathBuf> = Rc::new(file);
            for decl in decls {
                let identifier: String = decl.name.name.clone();
                if let Some((first_file, first)) = declarations.get(identifier.as_str()) {
                    return Err(AstError::Redeclaration {
                        name   : identifier,
                        first  : Subject::new(first_file.as_ref().clone(), first.name.range),
                        second : Subject::new(file.as_ref().clone(), decl.name.range),
                    });
                }
                declarations.add(identifier, (file.clone(), decl));
            }
        }

        // Force resolution of every declared symbol
        let mut this: Self = Self {
            parent,
            kind,
            name: name.clone(),
            declarations,
            signatures: AcyclicCache::new(),
            symbols: AcyclicCache::new(),
        };
        let identifiers: Vec<String> = this.declarations.keys().cloned().collect();
        for identifier in identifiers {
            this.resolve_symbol(&identifier)?;
        }

        let symbols: LinearMap<String, Rc<Symbol>> = this.symbols.all().clone();
        Ok(Rc::new(match kind {
            PackageKind::Executable => Package::Executable{ name, symbols },
            PackageKind::Library => Package::Library{ name, symbols },
            PackageKind::Implementation => Package::Implementation{ name, symbols },
        }))
    }

    /// Returns the fully qualified name of this package.
    #[inline]
    pub(crate) fn name(&self) -> &Name { &self.name }

    /// Returns the raw declaration for the given identifier, if it exists in this package.
    #[inline]
    pub(crate) fn declaration(&self, identifier: &str) -> Option<&(Rc<PathBuf>, Declaration)> { self.declarations.get(identifier) }

    /// Returns the signature of the symbol with the given identifier in this package, resolving
    /// it first if necessary.
    pub(crate) fn resolve_signature(&mut self, identifier: &str) -> Result<Rc<Signature>, AstError> {
        AcyclicCache::get_or_compute(self, identifier.to_string(), |c| &mut c.signatures, |c, identifier| {
            SymbolChecker::signature(c, identifier)
        })
    }

    /// Returns the symbol with the given identifier in this package, resolving it first if
    /// necessary.
    pub(crate) fn resolve_symbol(&mut self, identifier: &str) -> Result<Rc<Symbol>, AstError> {
        AcyclicCache::get_or_compute(self, identifier.to_string(), |c| &mut c.symbols, |c, identifier| {
            SymbolChecker::check(c, identifier)
        })
    }

    /// Returns the signature of the symbol with the given fully qualified name, wherever it
    /// lives.
    ///
    /// Same-package symbols go through this package's signature cache; anything else resolves the
    /// target package in full through the module layer, which also enforces the import rules, and
    /// requires the symbol to be public.
    ///
    /// # Arguments
    /// - `name`: The fully qualified name of the symbol.
    /// - `subject`: Where the reference is written, for diagnostics.
    ///
    /// # Errors
    /// This function errors if the symbol does not exist, is not accessible from here, fails to
    /// resolve or closes a dependency cycle.
    pub(crate) fn access_signature(&mut self, name: &Name, subject: &Subject) -> Result<Rc<Signature>, AstError> {
        match name.scope() {
            Some(scope) if scope == self.name => {
                if !self.declarations.contains(name.identifier()) {
                    return Err(AstError::UnknownSymbol{ name: name.clone(), subject: subject.clone() });
                }
                self.resolve_signature(name.identifier())
            },
            Some(scope) => {
                let package: Rc<Package> = self.parent.access_package(&scope, subject)?;
                let symbol: &Rc<Symbol> = match package.symbols().get(name.identifier()) {
                    Some(symbol) => symbol,
                    None => return Err(AstError::UnknownSymbol{ name: name.clone(), subject: subject.clone() }),
                };
                if !symbol.public() {
                    return Err(AstError::PrivateSymbol{ name: name.clone(), subject: subject.clone() });
                }
                Ok(Rc::new(Signature::of(symbol)))
            },
            // A bare module name never denotes a symbol
            None => Err(AstError::UnknownSymbol{ name: name.clone(), subject: subject.clone() }),
        }
    }
}

impl<'m, 'c> std::fmt::Debug for PackageChecker<'m, 'c> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackageChecker").field("kind", &self.kind).field("name", &self.name).finish_non_exhaustive()
    }
}
