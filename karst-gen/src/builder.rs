//  BUILDER.rs
//    by Lut99
//
//  Created:
//    07 Mar 2025, 10:44:18
//  Last edited:
//    22 Aug 2025, 09:36:51
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines the C backend: a depth-first walk over a resolved
//!   [`Target`] that emits every symbol before its first use.
//

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use karst_ast::collections::LinearSet;
use karst_ast::name::Name;
use karst_ast::semantic::{Expression, Package, Primitive, Statement, Symbol, Target, Type};
use log::debug;

use crate::errors::GenError;


/***** HELPER FUNCTIONS *****/
/// Appends the given text as a C string literal, quotes included.
fn quote(out: &mut String, text: &str) {
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out.push('"');
}





/***** LIBRARY *****/
/// Generates C translation units for one resolved [`Target`].
///
/// Every `Executable` package of the main module becomes one unit. Symbols are emitted exactly
/// once each, declaration before first use, by walking the dependencies of a symbol before the
/// symbol itself. The name of a visited symbol is recorded _before_ its dependencies are walked,
/// which is what keeps mutually-pointing structs and mutually recursive procedures from looping;
/// a procedure re-entered that way gets a signature-only prototype ahead of the body that calls
/// it, so a linear scan over the unit still sees a declaration before every use.
#[derive(Debug)]
pub struct Builder<'t> {
    /// The resolved target to generate code for.
    target      : &'t Target,
    /// The unit built so far.
    out         : String,
    /// The fully qualified names already visited in the current unit.
    built       : LinearSet<Name>,
    /// The fully qualified names with at least a declaration in the current unit.
    declared    : LinearSet<Name>,
    /// The current indentation depth, in levels of two spaces.
    indentation : usize,
}

impl<'t> Builder<'t> {
    /// Constructor for the Builder.
    ///
    /// # Arguments
    /// - `target`: The resolved [`Target`] to generate code for.
    #[inline]
    pub fn new(target: &'t Target) -> Self { Self { target, out: String::new(), built: LinearSet::new(), declared: LinearSet::new(), indentation: 0 } }

    /// Generates every unit of the given target into the given directory.
    ///
    /// # Arguments
    /// - `target`: The resolved [`Target`] to generate code for.
    /// - `dist`: The directory to write the units to. Created if it does not exist.
    ///
    /// # Errors
    /// This function errors if any unit reaches a compile-time-only type or constant, or if
    /// writing a unit fails.
    pub fn generate(target: &Target, dist: impl AsRef<Path>) -> Result<(), GenError> {
        let dist: &Path = dist.as_ref();
        fs::create_dir_all(dist).map_err(|source| GenError::Io { path: dist.into(), source })?;
        for package in target.main_module().packages.values() {
            let mut builder: Builder = Builder::new(target);
            if let Some(unit) = builder.build_package(package)? {
                let path: PathBuf = dist.join(format!("{}.c", package.name()));
                debug!("Writing unit for package '{}' to {}", package.name(), path.display());
                fs::write(&path, unit).map_err(|source| GenError::Io { path: path.clone(), source })?;
            }
        }
        Ok(())
    }

    /// Builds the unit of a single package.
    ///
    /// # Arguments
    /// - `package`: The resolved [`Package`] to build.
    ///
    /// # Returns
    /// The text of the unit, or [`None`] if the package does not compile to one (only
    /// `Executable` packages do).
    ///
    /// # Errors
    /// This function errors if the dependency closure of the entrypoint reaches a
    /// compile-time-only type or constant.
    pub fn build_package(&mut self, package: &Package) -> Result<Option<String>, GenError> {
        if !matches!(package, Package::Executable { .. }) {
            return Ok(None);
        }
        self.out.clear();
        self.built = LinearSet::new();
        self.declared = LinearSet::new();
        self.indentation = 0;

        // The unit is the dependency closure of a call to the entrypoint, then the wrapper making
        // that call.
        let entrypoint: Statement = Statement::Discard(Expression::Invocation { callee: package.name().sub("main"), arguments: vec![] });
        self.build_statement_dependencies(&entrypoint)?;
        self.out.push_str("int main() {");
        self.indentation += 1;
        self.build_new_line();
        self.build_statement(&entrypoint)?;
        self.indentation -= 1;
        self.build_new_line();
        self.out.push('}');
        self.out.push('\n');
        Ok(Some(std::mem::take(&mut self.out)))
    }

    /// Looks a symbol up in the target by its fully qualified name.
    fn symbol(&self, name: &Name) -> Result<Rc<Symbol>, GenError> {
        self.target
            .modules
            .get(name.module())
            .and_then(|module| module.packages.get(&name.scope()?).cloned())
            .and_then(|package| package.symbols().get(name.identifier()).cloned())
            .ok_or_else(|| GenError::MissingSymbol { name: name.clone() })
    }

    /// Emits the definition of the named symbol, dependencies first, unless it was emitted into
    /// this unit already.
    ///
    /// The name is marked as built before its dependencies are walked, so that cycles through
    /// pointers or call sites terminate. A procedure re-entered while its own definition is still
    /// being walked (mutual recursion) is forward-declared here: its parameter and return types
    /// are emitted before its body is walked, so a prototype always has what it needs.
    fn build_symbol(&mut self, name: &Name) -> Result<(), GenError> {
        if self.built.contains(name) {
            if !self.declared.contains(name) {
                let symbol: Rc<Symbol> = self.symbol(name)?;
                if let Symbol::Procedure { name, parameters, ret, .. } = &*symbol {
                    self.declared.add(name.clone());
                    self.build_signature(name, parameters, ret)?;
                }
            }
            return Ok(());
        }
        self.built.add(name.clone());
        self.build_definition(name)?;
        self.declared.add(name.clone());
        Ok(())
    }

    /// Emits the definition of the named symbol, dependencies first.
    fn build_definition(&mut self, name: &Name) -> Result<(), GenError> {
        let symbol: Rc<Symbol> = self.symbol(name)?;
        match &*symbol {
            Symbol::Procedure { name, parameters, ret, body, .. } => {
                for (_, ty) in parameters {
                    self.build_type_dependencies(ty)?;
                }
                self.build_type_dependencies(ret)?;
                self.build_statement_dependencies(body)?;

                self.build_type(ret)?;
                self.out.push(' ');
                self.build_access(name)?;
                self.build_parameters(parameters)?;
                self.out.push(' ');
                self.build_statement(body)?;
                self.build_new_line();
                Ok(())
            },

            Symbol::ExternalProcedure { name, parameters, ret, .. } => {
                for (_, ty) in parameters {
                    self.build_type_dependencies(ty)?;
                }
                self.build_type_dependencies(ret)?;

                // Declaration only, under the linkage name; the definition is linked in later.
                self.build_signature(name, parameters, ret)
            },

            Symbol::Struct { name, members, .. } => {
                for (_, ty) in members {
                    self.build_type_dependencies(ty)?;
                }

                // Opaque on purpose; only pointers to it are ever formed.
                let tag: String = name.joined("$");
                self.out.push_str("typedef struct ");
                self.out.push_str(&tag);
                self.out.push(' ');
                self.out.push_str(&tag);
                self.out.push(';');
                self.build_new_line();
                Ok(())
            },

            Symbol::Primitive(prim) => {
                self.out.push_str(match prim {
                    Primitive::Byte => "typedef unsigned char karst$Byte;",
                    Primitive::Boolean => "typedef _Bool karst$Boolean;",
                    Primitive::Natural32 => "typedef unsigned int karst$Natural32;",
                    Primitive::Natural64 => "typedef unsigned long long karst$Natural64;",
                    Primitive::Integer32 => "typedef int karst$Integer32;",
                    Primitive::Unit => "typedef void karst$Unit;",
                    Primitive::Noreturn => "#define karst$Noreturn _Noreturn void",
                });
                self.build_new_line();
                Ok(())
            },
        }
    }

    /// Emits a signature-only declaration line for a procedure.
    fn build_signature(&mut self, name: &Name, parameters: &[(String, Type)], ret: &Type) -> Result<(), GenError> {
        self.build_type(ret)?;
        self.out.push(' ');
        self.build_access(name)?;
        self.build_parameters(parameters)?;
        self.out.push(';');
        self.build_new_line();
        Ok(())
    }

    /// Emits the C name under which the named symbol is accessed: its linkage name if it is
    /// external, its `$`-joined fully qualified name otherwise.
    fn build_access(&mut self, name: &Name) -> Result<(), GenError> {
        let symbol: Rc<Symbol> = self.symbol(name)?;
        match &*symbol {
            Symbol::ExternalProcedure { external, .. } => self.out.push_str(external),
            _ => self.out.push_str(&name.joined("$")),
        }
        Ok(())
    }

    /// Emits a parenthesized parameter list.
    fn build_parameters(&mut self, parameters: &[(String, Type)]) -> Result<(), GenError> {
        self.out.push('(');
        for (i, (name, ty)) in parameters.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.build_type(ty)?;
            self.out.push(' ');
            self.out.push_str(name);
        }
        self.out.push(')');
        Ok(())
    }

    /// Emits the symbols a type mention depends on.
    fn build_type_dependencies(&mut self, ty: &Type) -> Result<(), GenError> {
        match ty {
            Type::Named(name) => self.build_symbol(name),
            Type::Pointer(pointee) => self.build_type_dependencies(pointee),
            Type::ConstantIntegral => Err(GenError::UnrepresentableType { ty: ty.to_string() }),
        }
    }

    /// Emits a type mention.
    fn build_type(&mut self, ty: &Type) -> Result<(), GenError> {
        match ty {
            Type::Named(name) => self.build_access(name),
            Type::Pointer(pointee) => {
                self.build_type(pointee)?;
                self.out.push('*');
                Ok(())
            },
            Type::ConstantIntegral => Err(GenError::UnrepresentableType { ty: ty.to_string() }),
        }
    }

    /// Emits the symbols a statement depends on.
    fn build_statement_dependencies(&mut self, statement: &Statement) -> Result<(), GenError> {
        match statement {
            Statement::Block(statements) => {
                for statement in statements {
                    self.build_statement_dependencies(statement)?;
                }
                Ok(())
            },
            Statement::If { condition, true_branch, false_branch } => {
                self.build_expression_dependencies(condition)?;
                self.build_statement_dependencies(true_branch)?;
                if let Some(false_branch) = false_branch {
                    self.build_statement_dependencies(false_branch)?;
                }
                Ok(())
            },
            Statement::Declare { ty, value, .. } => {
                self.build_type_dependencies(ty)?;
                self.build_expression_dependencies(value)
            },
            Statement::Return(value) => match value {
                Some(value) => self.build_expression_dependencies(value),
                None => Ok(()),
            },
            Statement::Discard(value) => self.build_expression_dependencies(value),
        }
    }

    /// Emits the symbols an expression depends on.
    fn build_expression_dependencies(&mut self, expression: &Expression) -> Result<(), GenError> {
        match expression {
            Expression::LessThan { left, right } => {
                self.build_expression_dependencies(left)?;
                self.build_expression_dependencies(right)
            },
            Expression::Invocation { callee, arguments } => {
                self.build_symbol(callee)?;
                for argument in arguments {
                    self.build_expression_dependencies(argument)?;
                }
                Ok(())
            },
            Expression::LocalAccess(_) | Expression::Natural32(_) | Expression::Natural64(_) | Expression::String(_) => Ok(()),
            Expression::IntegralConstant(value) => Err(GenError::UnrepresentableConstant { value: *value }),
        }
    }

    /// Emits a statement at the current indentation.
    fn build_statement(&mut self, statement: &Statement) -> Result<(), GenError> {
        match statement {
            Statement::Block(statements) => {
                self.out.push('{');
                self.indentation += 1;
                for statement in statements {
                    self.build_new_line();
                    self.build_statement(statement)?;
                }
                self.indentation -= 1;
                self.build_new_line();
                self.out.push('}');
                Ok(())
            },

            Statement::If { condition, true_branch, false_branch } => {
                self.out.push_str("if (");
                self.build_expression(condition)?;
                self.out.push_str(") ");
                self.build_statement(true_branch)?;
                if let Some(false_branch) = false_branch {
                    self.out.push_str(" else ");
                    self.build_statement(false_branch)?;
                }
                Ok(())
            },

            Statement::Declare { name, ty, value } => {
                self.build_type(ty)?;
                self.out.push(' ');
                self.out.push_str(name);
                self.out.push_str(" = ");
                self.build_expression(value)?;
                self.out.push(';');
                Ok(())
            },

            Statement::Return(value) => {
                self.out.push_str("return");
                if let Some(value) = value {
                    self.out.push(' ');
                    self.build_expression(value)?;
                }
                self.out.push(';');
                Ok(())
            },

            Statement::Discard(value) => {
                self.build_expression(value)?;
                self.out.push(';');
                Ok(())
            },
        }
    }

    /// Emits an expression.
    fn build_expression(&mut self, expression: &Expression) -> Result<(), GenError> {
        match expression {
            Expression::LessThan { left, right } => {
                self.build_expression(left)?;
                self.out.push_str(" < ");
                self.build_expression(right)
            },

            Expression::Invocation { callee, arguments } => {
                self.build_access(callee)?;
                self.out.push('(');
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.build_expression(argument)?;
                }
                self.out.push(')');
                Ok(())
            },

            Expression::LocalAccess(name) => {
                self.out.push_str(name);
                Ok(())
            },

            Expression::Natural32(value) => {
                self.out.push_str(&value.to_string());
                Ok(())
            },
            Expression::Natural64(value) => {
                self.out.push_str(&value.to_string());
                Ok(())
            },

            Expression::IntegralConstant(value) => Err(GenError::UnrepresentableConstant { value: *value }),

            Expression::String(text) => {
                quote(&mut self.out, text);
                Ok(())
            },
        }
    }

    /// Terminates the current line and indents the next one.
    fn build_new_line(&mut self) {
        self.out.push('\n');
        for _ in 0..self.indentation {
            self.out.push_str("  ");
        }
    }
}





/***** TESTS *****/
#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use karst_ast::collections::LinearMap;
    use karst_ast::semantic::{Module, builtin_module};

    use super::*;


    /// Builds a target with a single executable package `hello` holding the given symbols.
    fn target_with(symbols: Vec<(&str, Symbol)>) -> Target {
        let name: Name = Name::single("hello");
        let symbols: LinearMap<String, Rc<Symbol>> = symbols.into_iter().map(|(id, sym)| (id.to_string(), Rc::new(sym))).collect();
        let package: Rc<Package> = Rc::new(Package::Executable { name: name.clone(), symbols });
        let module: Rc<Module> = Rc::new(Module { name: "hello".into(), packages: [(name, package)].into_iter().collect() });
        Target { main: "hello".into(), modules: [("karst".into(), builtin_module()), ("hello".into(), module)].into_iter().collect() }
    }

    /// Shorthand for an empty-bodied procedure symbol.
    fn procedure(name: Name, body: Statement) -> Symbol {
        Symbol::Procedure { name, public: false, parameters: vec![], ret: Type::unit(), body }
    }

    fn invoke(callee: Name) -> Expression { Expression::Invocation { callee, arguments: vec![] } }


    #[test]
    fn test_dependencies_before_use() {
        let target: Target = target_with(vec![
            ("greet", procedure(Name::new(["hello", "greet"]), Statement::Block(vec![]))),
            ("main", procedure(Name::new(["hello", "main"]), Statement::Block(vec![Statement::Discard(invoke(Name::new(["hello", "greet"])))]))),
        ]);

        let unit: String = Builder::new(&target).build_package(target.main_module().packages.values().next().unwrap()).unwrap().unwrap();
        let unit_def: usize = unit.find("typedef void karst$Unit;").unwrap();
        let greet_def: usize = unit.find("karst$Unit hello$greet() {").unwrap();
        let main_def: usize = unit.find("karst$Unit hello$main() {").unwrap();
        let wrapper: usize = unit.find("int main() {").unwrap();
        assert!(unit_def < greet_def && greet_def < main_def && main_def < wrapper, "definitions out of order:\n{unit}");
        assert!(unit.contains("hello$main();"));
    }

    #[test]
    fn test_symbols_emitted_once() {
        // Two call sites, one definition
        let body: Statement = Statement::Block(vec![
            Statement::Discard(invoke(Name::new(["hello", "greet"]))),
            Statement::Discard(invoke(Name::new(["hello", "greet"]))),
        ]);
        let target: Target = target_with(vec![
            ("greet", procedure(Name::new(["hello", "greet"]), Statement::Block(vec![]))),
            ("main", procedure(Name::new(["hello", "main"]), body)),
        ]);

        let unit: String = Builder::new(&target).build_package(target.main_module().packages.values().next().unwrap()).unwrap().unwrap();
        assert_eq!(unit.matches("karst$Unit hello$greet() {").count(), 1, "definition not unique:\n{unit}");
        assert_eq!(unit.matches("hello$greet();").count(), 2);
    }

    #[test]
    fn test_mutual_recursion_declared_before_use() {
        // flip calls flop calls flip; whichever body lands first must be preceded by a prototype
        // of its callee
        let flip: Name = Name::new(["hello", "flip"]);
        let flop: Name = Name::new(["hello", "flop"]);
        let target: Target = target_with(vec![
            ("flip", procedure(flip.clone(), Statement::Block(vec![Statement::Discard(invoke(flop.clone()))]))),
            ("flop", procedure(flop.clone(), Statement::Block(vec![Statement::Discard(invoke(flip.clone()))]))),
            ("main", procedure(Name::new(["hello", "main"]), Statement::Block(vec![Statement::Discard(invoke(flip))]))),
        ]);

        let unit: String = Builder::new(&target).build_package(target.main_module().packages.values().next().unwrap()).unwrap().unwrap();
        let flip_decl: usize = unit.find("karst$Unit hello$flip();").unwrap();
        let flop_def: usize = unit.find("karst$Unit hello$flop() {").unwrap();
        let flip_def: usize = unit.find("karst$Unit hello$flip() {").unwrap();
        assert!(flip_decl < flop_def && flop_def < flip_def, "use before declaration:\n{unit}");
        // The prototype does not duplicate either definition
        assert_eq!(unit.matches("karst$Unit hello$flip() {").count(), 1, "definition not unique:\n{unit}");
        assert_eq!(unit.matches("karst$Unit hello$flip();").count(), 1, "prototype not unique:\n{unit}");
    }

    #[test]
    fn test_mutually_pointing_structs() {
        let a: Name = Name::new(["hello", "A"]);
        let b: Name = Name::new(["hello", "B"]);
        let target: Target = target_with(vec![
            ("A", Symbol::Struct { name: a.clone(), public: false, members: vec![("next".into(), Type::Pointer(Box::new(Type::Named(b.clone()))))] }),
            ("B", Symbol::Struct { name: b.clone(), public: false, members: vec![("next".into(), Type::Pointer(Box::new(Type::Named(a.clone()))))] }),
            ("mk", Symbol::ExternalProcedure {
                name       : Name::new(["hello", "mk"]),
                public     : false,
                parameters : vec![],
                ret        : Type::Pointer(Box::new(Type::Named(a))),
                external   : "mk_node".into(),
            }),
            ("main", procedure(Name::new(["hello", "main"]), Statement::Block(vec![Statement::Discard(invoke(Name::new(["hello", "mk"])))]))),
        ]);

        let unit: String = Builder::new(&target).build_package(target.main_module().packages.values().next().unwrap()).unwrap().unwrap();
        // A is visited first and marked built, so B completes inside of it and lands first
        let b_def: usize = unit.find("typedef struct hello$B hello$B;").unwrap();
        let a_def: usize = unit.find("typedef struct hello$A hello$A;").unwrap();
        assert!(b_def < a_def, "pointee not emitted first:\n{unit}");
        // The external procedure is declared under its linkage name, signature only
        assert!(unit.contains("hello$A* mk_node();"), "missing extern declaration:\n{unit}");
        assert!(unit.contains("mk_node();"));
    }

    #[test]
    fn test_library_package_builds_nothing() {
        let package: Package = Package::Library { name: Name::single("hello"), symbols: LinearMap::new() };
        let target: Target = target_with(vec![("main", procedure(Name::new(["hello", "main"]), Statement::Block(vec![])))]);
        assert!(Builder::new(&target).build_package(&package).unwrap().is_none());
    }

    #[test]
    fn test_unrepresentable_constant() {
        let body: Statement = Statement::Block(vec![Statement::Discard(Expression::IntegralConstant(42))]);
        let target: Target = target_with(vec![("main", procedure(Name::new(["hello", "main"]), body))]);

        let err: GenError = Builder::new(&target).build_package(target.main_module().packages.values().next().unwrap()).unwrap_err();
        assert!(matches!(err, GenError::UnrepresentableConstant { value: 42 }), "unexpected error: {err}");
    }

    #[test]
    fn test_unrepresentable_type() {
        let body: Statement =
            Statement::Block(vec![Statement::Declare { name: "x".into(), ty: Type::ConstantIntegral, value: Expression::Natural32(1) }]);
        let target: Target = target_with(vec![("main", procedure(Name::new(["hello", "main"]), body))]);

        let err: GenError = Builder::new(&target).build_package(target.main_module().packages.values().next().unwrap()).unwrap_err();
        assert!(matches!(err, GenError::UnrepresentableType { .. }), "unexpected error: {err}");
    }

    #[test]
    fn test_string_escaping() {
        let body: Statement = Statement::Block(vec![Statement::Declare {
            name  : "s".into(),
            ty    : Type::Pointer(Box::new(Type::Named(Primitive::Byte.name()))),
            value : Expression::String("a\n\"b\"\\".into()),
        }]);
        let target: Target = target_with(vec![("main", procedure(Name::new(["hello", "main"]), body))]);

        let unit: String = Builder::new(&target).build_package(target.main_module().packages.values().next().unwrap()).unwrap().unwrap();
        assert!(unit.contains("karst$Byte* s = \"a\\n\\\"b\\\"\\\\\";"), "bad escaping:\n{unit}");
    }

    #[test]
    fn test_control_flow_rendering() {
        let body: Statement = Statement::Block(vec![Statement::If {
            condition    : Expression::LessThan { left: Box::new(Expression::Natural32(1)), right: Box::new(Expression::Natural32(2)) },
            true_branch  : Box::new(Statement::Block(vec![Statement::Return(None)])),
            false_branch : Some(Box::new(Statement::Block(vec![]))),
        }]);
        let target: Target = target_with(vec![("main", procedure(Name::new(["hello", "main"]), body))]);

        let unit: String = Builder::new(&target).build_package(target.main_module().packages.values().next().unwrap()).unwrap().unwrap();
        assert!(unit.contains("if (1 < 2) {"), "bad if rendering:\n{unit}");
        assert!(unit.contains("return;"));
        assert!(unit.contains("} else {"));
    }
}
