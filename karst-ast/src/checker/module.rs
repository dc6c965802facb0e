//  MODULE.rs
//    by Lut99
//
//  Created:
//    06 Mar 2025, 09:40:57
//  Last edited:
//    21 Aug 2025, 14:31:25
//  Auto updated?
//    Yes
//
//  Description:
//!   Implements the module layer of the resolution chain: parses a
//!   module's configuration, resolves its declared packages and
//!   enforces the entrypoint rules.
//

use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use karst_dsl::config::{parse_config, Configuration, TargetKind};
use log::debug;

use crate::cache::AcyclicCache;
use crate::collections::LinearSet;
use crate::errors::{AstError, Subject};
use crate::name::Name;
use crate::semantic::{Module, Package, Symbol};
use super::package::{PackageChecker, PackageKind};
use super::{directory_name, Checker};


/***** LIBRARY *****/
/// The module layer of the resolution chain.
///
/// Borrows the [`Checker`] exclusively for its lifetime, so cross-module accesses flow back up
/// into the module cache without any shared state.
pub struct ModuleChecker<'c> {
    /// The checker that spawned us, for cross-module accesses.
    parent      : &'c mut Checker,
    /// The root directory of this module.
    directory   : PathBuf,
    /// The name of this module.
    name        : String,
    /// The packages the configuration declares as executables.
    executables : LinearSet<Name>,
    /// The packages the configuration declares as libraries.
    libraries   : LinearSet<Name>,
    /// The package cache.
    packages    : AcyclicCache<Name, Rc<Package>>,
}

impl<'c> ModuleChecker<'c> {
    /// Resolves the module in the given directory.
    ///
    /// # Arguments
    /// - `parent`: The [`Checker`] to resolve cross-module accesses through.
    /// - `directory`: The root directory of the module, holding its `module.karst`.
    ///
    /// # Returns
    /// The resolved [`Module`].
    ///
    /// # Errors
    /// This function errors if the configuration fails to parse, any declared package fails to
    /// resolve or an entrypoint rule is violated.
    pub(crate) fn check(parent: &'c mut Checker, directory: PathBuf) -> Result<Rc<Module>, AstError> {
        let name: String = directory_name(&directory)?;
        debug!("Resolving module '{name}'");

        // Parse the configuration
        let config_path: PathBuf = directory.join("module.karst");
        let raw: String = fs::read_to_string(&config_path).map_err(|source| AstError::Io{ path: config_path.clone(), source })?;
        let config: Configuration = parse_config(&raw).map_err(|err| AstError::Config{ path: config_path.clone(), err })?;

        // Collect the declared packages, in file order
        let mut executables: LinearSet<Name> = LinearSet::new();
        let mut libraries: LinearSet<Name> = LinearSet::new();
        let mut declared: Vec<Name> = Vec::new();
        for decl in &config.declarations {
            let package: Name = Name::new(decl.name.segments.iter().map(|s| s.name.clone()));
            if package.module() != name {
                return Err(AstError::UnknownPackage{ name: package, subject: Subject::new(&config_path, decl.name.range) });
            }
            let fresh: bool = match decl.kind {
                TargetKind::Executable => executables.add(package.clone()) && !libraries.contains(&package),
                TargetKind::Library => libraries.add(package.clone()) && !executables.contains(&package),
            };
            if !fresh {
                return Err(AstError::PackageRedeclaration{ name: package });
            }
            declared.push(package);
        }

        // Force resolution of every declared package
        let mut this: Self = Self {
            parent,
            directory,
            name: name.clone(),
            executables,
            libraries,
            packages: AcyclicCache::new(),
        };
        for package in declared {
            let resolved: Rc<Package> = this.resolve_package(package)?;
            this.check_entrypoint(&resolved)?;
        }

        Ok(Rc::new(Module {
            name,
            packages : this.packages.all().clone(),
        }))
    }

    /// Asserts the entrypoint rules for a declared package.
    ///
    /// An executable package must have a `main` procedure without parameters or return value; a
    /// library package must not have a `main` procedure at all.
    fn check_entrypoint(&self, package: &Package) -> Result<(), AstError> {
        match package {
            Package::Executable{ name, symbols } => match symbols.get("main").map(Rc::as_ref) {
                Some(Symbol::Procedure{ parameters, ret, .. }) if parameters.is_empty() && ret.is_unit() => Ok(()),
                _ => Err(AstError::InvalidEntrypoint{ package: name.clone() }),
            },

            Package::Library{ name, symbols } => match symbols.get("main").map(Rc::as_ref) {
                Some(Symbol::Procedure{ .. }) => Err(AstError::SpuriousEntrypoint{ package: name.clone() }),
                _ => Ok(()),
            },

            Package::Implementation{ .. } => Ok(()),
        }
    }

    /// Returns the name of this module.
    #[inline]
    pub(crate) fn name(&self) -> &str { &self.name }

    /// Returns the source directory of this module.
    #[inline]
    pub(crate) fn sources(&self) -> PathBuf { self.directory.join("src") }

    /// Returns the package with the given name, resolving it first if necessary.
    pub(crate) fn resolve_package(&mut self, name: Name) -> Result<Rc<Package>, AstError> {
        AcyclicCache::get_or_compute(self, name, |c| &mut c.packages, |c, name| c.check_package(name))
    }

    /// The package cache's compute function.
    fn check_package(&mut self, name: &Name) -> Result<Rc<Package>, AstError> {
        let kind: PackageKind = if self.executables.contains(name) {
            PackageKind::Executable
        } else if self.libraries.contains(name) {
            PackageKind::Library
        } else {
            PackageKind::Implementation
        };
        PackageChecker::check(self, kind, name.clone())
    }

    /// Returns the package with the given name for an import, wherever it lives.
    ///
    /// Same-module imports may target library and implementation packages; cross-module imports
    /// may only target libraries.
    ///
    /// # Arguments
    /// - `name`: The fully qualified name of the package.
    /// - `subject`: Where the import is written, for diagnostics.
    ///
    /// # Errors
    /// This function errors if the package does not exist, is not importable from here, fails to
    /// resolve or closes a dependency cycle.
    pub(crate) fn access_package(&mut self, name: &Name, subject: &Subject) -> Result<Rc<Package>, AstError> {
        if name.module() == self.name {
            let package: Rc<Package> = self.resolve_package(name.clone())?;
            if matches!(*package, Package::Executable{ .. }) {
                return Err(AstError::InaccessiblePackage{ name: name.clone(), subject: subject.clone() });
            }
            Ok(package)
        } else {
            let module: Rc<Module> = self.parent.access_module(name.module())?;
            let package: &Rc<Package> = match module.packages.get(name) {
                Some(package) => package,
                None => return Err(AstError::UnknownPackage{ name: name.clone(), subject: subject.clone() }),
            };
            if !matches!(**package, Package::Library{ .. }) {
                return Err(AstError::InaccessiblePackage{ name: name.clone(), subject: subject.clone() });
            }
            Ok(package.clone())
        }
    }
}
