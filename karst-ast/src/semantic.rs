//  SEMANTIC.rs
//    by Lut99
//
//  Created:
//    05 Mar 2025, 13:10:27
//  Last edited:
//    21 Aug 2025, 13:02:19
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines the resolved semantic model: targets, modules, packages,
//!   symbols and the typed statement and expression trees.
//

use std::fmt::{Display, Formatter, Result as FResult};
use std::rc::Rc;

use crate::collections::LinearMap;
use crate::name::Name;


/***** CONSTANTS *****/
/// The reserved name of the builtin module.
pub const BUILTIN_MODULE: &str = "karst";





/***** LIBRARY *****/
/// The root value the resolution chain produces: the main module plus every module it pulled in.
#[derive(Clone, Debug)]
pub struct Target {
    /// The name of the main module.
    pub main    : String,
    /// All resolved modules, including the main one and the builtin one.
    pub modules : LinearMap<String, Rc<Module>>,
}
impl Target {
    /// Returns the main module.
    ///
    /// # Panics
    /// This function panics if the target was constructed without its main module, which the
    /// resolution chain never does.
    #[inline]
    pub fn main_module(&self) -> &Rc<Module> {
        match self.modules.get(self.main.as_str()) {
            Some(module) => module,
            None => panic!("Target without its main module '{}'", self.main),
        }
    }
}

/// A resolved module: a named set of packages.
#[derive(Clone, Debug)]
pub struct Module {
    /// The name of the module.
    pub name     : String,
    /// The packages of this module, keyed by their fully qualified name.
    pub packages : LinearMap<Name, Rc<Package>>,
}

/// A resolved package: a named set of symbols, tagged by what it compiles to.
#[derive(Clone, Debug)]
pub enum Package {
    /// A package that compiles to an executable. Has exactly one `main` entrypoint.
    Executable {
        /// The fully qualified name of the package.
        name    : Name,
        /// The resolved symbols of the package, keyed by identifier.
        symbols : LinearMap<String, Rc<Symbol>>,
    },
    /// A package that compiles to a library. Must not have an entrypoint.
    Library {
        /// The fully qualified name of the package.
        name    : Name,
        /// The resolved symbols of the package, keyed by identifier.
        symbols : LinearMap<String, Rc<Symbol>>,
    },
    /// A package that is not declared in the module configuration, existing only to be imported
    /// by other packages of the same module.
    Implementation {
        /// The fully qualified name of the package.
        name    : Name,
        /// The resolved symbols of the package, keyed by identifier.
        symbols : LinearMap<String, Rc<Symbol>>,
    },
}
impl Package {
    /// Returns the fully qualified name of the package.
    #[inline]
    pub fn name(&self) -> &Name {
        match self {
            Self::Executable{ name, .. } | Self::Library{ name, .. } | Self::Implementation{ name, .. } => name,
        }
    }

    /// Returns the resolved symbols of the package.
    #[inline]
    pub fn symbols(&self) -> &LinearMap<String, Rc<Symbol>> {
        match self {
            Self::Executable{ symbols, .. } | Self::Library{ symbols, .. } | Self::Implementation{ symbols, .. } => symbols,
        }
    }
}

/// A resolved, immutable symbol. Produced exactly once per distinct fully qualified name and
/// shared read-only from there on.
#[derive(Clone, Debug)]
pub enum Symbol {
    /// A procedure with a checked body.
    Procedure {
        /// The fully qualified name of the procedure.
        name       : Name,
        /// Whether the procedure is visible outside its package.
        public     : bool,
        /// The parameters of the procedure, in order.
        parameters : Vec<(String, Type)>,
        /// The return type of the procedure.
        ret        : Type,
        /// The checked body of the procedure.
        body       : Statement,
    },

    /// A procedure that links against an externally defined routine.
    ExternalProcedure {
        /// The fully qualified name of the procedure.
        name       : Name,
        /// Whether the procedure is visible outside its package.
        public     : bool,
        /// The parameters of the procedure, in order.
        parameters : Vec<(String, Type)>,
        /// The return type of the procedure.
        ret        : Type,
        /// The linkage name of the external routine.
        external   : String,
    },

    /// A struct type.
    Struct {
        /// The fully qualified name of the struct.
        name    : Name,
        /// Whether the struct is visible outside its package.
        public  : bool,
        /// The members of the struct, in declaration order.
        members : Vec<(String, Type)>,
    },

    /// A builtin primitive type.
    Primitive(Primitive),
}
impl Symbol {
    /// Returns the fully qualified name of the symbol.
    #[inline]
    pub fn name(&self) -> Name {
        match self {
            Self::Procedure{ name, .. } | Self::ExternalProcedure{ name, .. } | Self::Struct{ name, .. } => name.clone(),
            Self::Primitive(prim) => prim.name(),
        }
    }

    /// Returns whether the symbol is visible outside its package.
    #[inline]
    pub fn public(&self) -> bool {
        match self {
            Self::Procedure{ public, .. } | Self::ExternalProcedure{ public, .. } | Self::Struct{ public, .. } => *public,
            Self::Primitive(_) => true,
        }
    }
}

/// The builtin primitive types, living in the reserved `karst` module.
#[derive(Clone, Copy, Debug, Eq, PartialEq, strum::Display)]
pub enum Primitive {
    /// An 8-bit natural.
    Byte,
    /// A 1-bit natural.
    Boolean,
    /// A 32-bit natural.
    Natural32,
    /// A 64-bit natural.
    Natural64,
    /// A 32-bit two's-complement integer.
    Integer32,
    /// The type of nothing, used as the return type of procedures that return no value.
    Unit,
    /// The return type of procedures that never return at all.
    Noreturn,
}
impl Primitive {
    /// All primitives, in emission order.
    pub const ALL: [Self; 7] = [Self::Byte, Self::Boolean, Self::Natural32, Self::Natural64, Self::Integer32, Self::Unit, Self::Noreturn];

    /// Returns the fully qualified name of the primitive.
    #[inline]
    pub fn name(&self) -> Name { Name::new([BUILTIN_MODULE.to_string(), self.to_string()]) }

    /// Resolves a fully qualified name back to a primitive, if it names one.
    pub fn from_name(name: &Name) -> Option<Self> {
        if name.segments().len() != 2 || name.module() != BUILTIN_MODULE { return None; }
        Self::ALL.into_iter().find(|prim| prim.to_string() == name.identifier())
    }

    /// Returns whether values of this primitive can be compared arithmetically.
    #[inline]
    pub fn is_arithmetic(&self) -> bool { matches!(self, Self::Byte | Self::Boolean | Self::Natural32 | Self::Natural64 | Self::Integer32) }
}

/// A resolved type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Type {
    /// A type known by its fully qualified name: a primitive or a struct.
    Named(Name),
    /// A pointer to some other type.
    Pointer(Box<Type>),
    /// The compile-time-only type of an integral constant that has not been forced to a concrete
    /// width yet. Never has a runtime representation.
    ConstantIntegral,
}
impl Type {
    /// Returns the unit type.
    #[inline]
    pub fn unit() -> Self { Self::Named(Primitive::Unit.name()) }

    /// Returns whether this type is the unit type.
    #[inline]
    pub fn is_unit(&self) -> bool { matches!(self, Self::Named(name) if Primitive::from_name(name) == Some(Primitive::Unit)) }

    /// Returns whether this type is the noreturn type.
    #[inline]
    pub fn is_noreturn(&self) -> bool { matches!(self, Self::Named(name) if Primitive::from_name(name) == Some(Primitive::Noreturn)) }
}
impl Display for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        match self {
            Self::Named(name) => write!(f, "{name}"),
            Self::Pointer(pointee) => write!(f, "*{pointee}"),
            Self::ConstantIntegral => write!(f, "constant-integral"),
        }
    }
}

/// The cheap, acyclic half of a symbol: what a call site or type reference needs to know about it
/// without resolving its body.
#[derive(Clone, Debug)]
pub enum Signature {
    /// The symbol is a procedure (external or not) with these parameter and return types.
    Procedure {
        /// Whether the procedure is visible outside its package.
        public     : bool,
        /// The parameter types, in order.
        parameters : Vec<Type>,
        /// The return type.
        ret        : Type,
    },
    /// The symbol is a type.
    Type {
        /// Whether the type is visible outside its package.
        public : bool,
    },
}
impl Signature {
    /// Derives the signature of an already fully resolved symbol.
    pub fn of(symbol: &Symbol) -> Self {
        match symbol {
            Symbol::Procedure{ public, parameters, ret, .. } | Symbol::ExternalProcedure{ public, parameters, ret, .. } => Self::Procedure {
                public     : *public,
                parameters : parameters.iter().map(|(_, ty)| ty.clone()).collect(),
                ret        : ret.clone(),
            },
            Symbol::Struct{ public, .. } => Self::Type{ public: *public },
            Symbol::Primitive(_) => Self::Type{ public: true },
        }
    }

    /// Returns whether the symbol behind this signature is visible outside its package.
    #[inline]
    pub fn public(&self) -> bool {
        match self {
            Self::Procedure{ public, .. } | Self::Type{ public } => *public,
        }
    }
}

/// A checked statement.
#[derive(Clone, Debug)]
pub enum Statement {
    /// A scoped block of statements.
    Block(Vec<Statement>),
    /// A conditional branch.
    If {
        /// The boolean condition.
        condition    : Expression,
        /// The branch taken if the condition holds.
        true_branch  : Box<Statement>,
        /// The branch taken if the condition does not hold, if any.
        false_branch : Option<Box<Statement>>,
    },
    /// A local variable definition.
    Declare {
        /// The name of the variable.
        name  : String,
        /// The resolved type of the variable.
        ty    : Type,
        /// The value the variable is initialized with.
        value : Expression,
    },
    /// A return from the enclosing procedure.
    Return(Option<Expression>),
    /// An expression of which the value is discarded.
    Discard(Expression),
}

/// A checked expression.
#[derive(Clone, Debug)]
pub enum Expression {
    /// A less-than comparison of two arithmetic operands.
    LessThan {
        /// The lefthand-side operand.
        left  : Box<Expression>,
        /// The righthand-side operand.
        right : Box<Expression>,
    },
    /// An invocation of a procedure, by fully qualified name.
    Invocation {
        /// The fully qualified name of the callee.
        callee    : Name,
        /// The arguments, in order.
        arguments : Vec<Expression>,
    },
    /// An access of a local variable or parameter.
    LocalAccess(String),
    /// A 32-bit natural literal.
    Natural32(u32),
    /// A 64-bit natural literal.
    Natural64(u64),
    /// An integral constant that was never forced to a concrete width. Compile-time-only; the
    /// backend rejects it.
    IntegralConstant(u64),
    /// A string literal.
    String(String),
}

/// Builds the builtin module, holding a single library package with the primitive symbols.
///
/// The module name `karst` is reserved for it: resolution never touches the filesystem for it,
/// and a user module cannot take the name.
pub fn builtin_module() -> Rc<Module> {
    let name: Name = Name::single(BUILTIN_MODULE);
    let symbols: LinearMap<String, Rc<Symbol>> =
        Primitive::ALL.into_iter().map(|prim| (prim.to_string(), Rc::new(Symbol::Primitive(prim)))).collect();
    let package: Rc<Package> = Rc::new(Package::Library{ name: name.clone(), symbols });
    Rc::new(Module {
        name     : BUILTIN_MODULE.into(),
        packages : [(name, package)].into_iter().collect(),
    })
}





/***** TESTS *****/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_names() {
        assert_eq!(Primitive::Natural32.name().to_string(), "karst.Natural32");
        assert_eq!(Primitive::from_name(&Name::new(["karst", "Noreturn"])), Some(Primitive::Noreturn));
        assert_eq!(Primitive::from_name(&Name::new(["karst", "Nope"])), None);
        assert_eq!(Primitive::from_name(&Name::new(["other", "Natural32"])), None);
    }

    #[test]
    fn test_builtin_module() {
        let module: Rc<Module> = builtin_module();
        assert_eq!(module.name, "karst");
        let package: &Rc<Package> = module.packages.get(&Name::single("karst")).unwrap();
        assert_eq!(package.symbols().len(), Primitive::ALL.len());
        assert!(package.symbols().contains("Unit"));
    }

    #[test]
    fn test_type_display() {
        let ty: Type = Type::Pointer(Box::new(Type::Named(Name::new(["hello", "core", "Node"]))));
        assert_eq!(ty.to_string(), "*hello.core.Node");
        assert!(Type::unit().is_unit());
        assert!(!ty.is_unit());
    }
}
