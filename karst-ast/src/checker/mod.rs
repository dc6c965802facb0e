//  MOD.rs
//    by Lut99
//
//  Created:
//    06 Mar 2025, 09:02:13
//  Last edited:
//    21 Aug 2025, 14:12:40
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines the three-layer resolution chain. The [`Checker`] resolves
//!   modules, every module resolves its packages and every package
//!   resolves its symbols, each layer through its own acyclic cache.
//

use std::io::{Error as IoError, ErrorKind};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use log::debug;

use crate::cache::AcyclicCache;
use crate::errors::AstError;
use crate::semantic::{builtin_module, Module, Target, BUILTIN_MODULE};

// Declare submodules
pub mod module;
pub mod package;
pub mod symbol;

pub use module::ModuleChecker;
pub use package::PackageChecker;
pub use symbol::SymbolChecker;


/***** LIBRARY *****/
/// The root of the resolution chain: resolves modules by name.
///
/// The main module is the compiled directory itself; any other module is searched under the given
/// bases; the reserved `karst` module is built in memory. Owns the module cache exclusively, so
/// independent compilations never share state.
pub struct Checker {
    /// The directory of the main module.
    directory : PathBuf,
    /// The bases under which other modules are searched.
    bases     : Vec<PathBuf>,
    /// The name of the main module.
    main      : String,
    /// The module cache.
    modules   : AcyclicCache<String, Rc<Module>>,
}

impl Checker {
    /// Resolves the module in the given directory, plus everything it depends on.
    ///
    /// # Arguments
    /// - `directory`: The directory of the main module.
    /// - `bases`: The bases under which any other mentioned module is searched.
    ///
    /// # Returns
    /// The fully resolved [`Target`].
    ///
    /// # Errors
    /// This function errors on the first fatal diagnostic anywhere in the dependency closure of
    /// the main module.
    pub fn check(directory: impl Into<PathBuf>, bases: Vec<PathBuf>) -> Result<Target, AstError> {
        let directory: PathBuf = directory.into();
        let main: String = directory_name(&directory)?;
        if main == BUILTIN_MODULE {
            return Err(AstError::ReservedModule{ name: main });
        }
        debug!("Checking module '{main}' in {}", directory.display());

        let mut this: Self = Self {
            directory,
            bases,
            main: main.clone(),
            modules: AcyclicCache::new(),
        };
        AcyclicCache::get_or_compute(&mut this, main.clone(), |c| &mut c.modules, |c, name| c.check_module(name))?;
        // The backend reaches the primitives through every procedure's return type, so the builtin
        // module is part of every target, whether or not a source mentions it.
        this.access_module(BUILTIN_MODULE)?;
        Ok(Target {
            main,
            modules : this.modules.all().clone(),
        })
    }

    /// Returns the module with the given name, resolving it first if necessary.
    ///
    /// # Errors
    /// This function errors if the module does not exist, fails to resolve, or is currently being
    /// resolved (a module-level dependency cycle).
    pub(crate) fn access_module(&mut self, name: &str) -> Result<Rc<Module>, AstError> {
        AcyclicCache::get_or_compute(self, name.to_string(), |c| &mut c.modules, |c, name| c.check_module(name))
    }

    /// The module cache's compute function.
    fn check_module(&mut self, name: &str) -> Result<Rc<Module>, AstError> {
        if name == BUILTIN_MODULE {
            return Ok(builtin_module());
        }
        let directory: PathBuf = self.locate_module(name)?;
        ModuleChecker::check(self, directory)
    }

    /// Finds the root directory of the module with the given name.
    fn locate_module(&self, name: &str) -> Result<PathBuf, AstError> {
        if name == self.main {
            return Ok(self.directory.clone());
        }
        for base in &self.bases {
            // The base may be the module itself, or contain it as a subdirectory
            if base.file_name().map(|n| n.to_string_lossy() == name).unwrap_or(false) && base.join("module.karst").exists() {
                return Ok(base.clone());
            }
            let candidate: PathBuf = base.join(name);
            if candidate.join("module.karst").exists() {
                return Ok(candidate);
            }
        }
        Err(AstError::UnknownModule{ name: name.into() })
    }
}

impl AsRef<Checker> for Checker {
    #[inline]
    fn as_ref(&self) -> &Self { self }
}

/// Returns the name of a module directory.
pub(crate) fn directory_name(directory: &Path) -> Result<String, AstError> {
    match directory.file_name() {
        Some(name) => Ok(name.to_string_lossy().into_owned()),
        None => Err(AstError::Io{ path: directory.into(), source: IoError::new(ErrorKind::InvalidInput, "not a module directory") }),
    }
}
