//  SYMBOL.rs
//    by Lut99
//
//  Created:
//    06 Mar 2025, 11:08:44
//  Last edited:
//    21 Aug 2025, 15:40:12
//  Auto updated?
//    Yes
//
//  Description:
//!   Implements the symbol layer of the resolution chain: type-checks a
//!   single declaration into a resolved symbol, or just its signature.
//

use std::path::PathBuf;
use std::rc::Rc;

use karst_dsl::ast as parsed;
use karst_dsl::ast::auxillary::{Binding, Formula, Mention};
use karst_dsl::ast::declarations::DeclarationKind;
use karst_dsl::ast::spec::{Node, TextRange};

use crate::errors::{AstError, Subject};
use crate::name::Name;
use crate::semantic::{Expression, Primitive, Signature, Statement, Symbol, Type};
use super::package::PackageChecker;


/***** HELPERS *****/
/// How a checked statement relates to the control flow around it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Control {
    /// Control falls through to whatever comes after the statement.
    Flows,
    /// Control never leaves the statement (it ends in a noreturn call).
    Sinks,
    /// Control returns from the enclosing procedure.
    Returns,
    /// Different branches of the statement end differently, but none fall through.
    Branching,
}
impl Control {
    /// Combines this statement's control with that of the statement after it.
    #[inline]
    fn sequent(self, second: Self) -> Self {
        if self != Self::Flows { self } else { second }
    }

    /// Combines the controls of two sibling branches.
    #[inline]
    fn branch(self, other: Self) -> Self {
        if self == Self::Flows || other == Self::Flows {
            Self::Flows
        } else if self == other {
            self
        } else {
            Self::Branching
        }
    }
}

/// Returns whether values of the given type can be compared arithmetically.
///
/// Pointers count: they compare as addresses.
#[inline]
fn is_arithmetic(ty: &Type) -> bool {
    match ty {
        Type::Named(name) => Primitive::from_name(name).map(|prim| prim.is_arithmetic()).unwrap_or(false),
        Type::Pointer(_) => true,
        Type::ConstantIntegral => true,
    }
}

/// Returns the boolean type.
#[inline]
fn boolean() -> Type { Type::Named(Primitive::Boolean.name()) }





/***** LIBRARY *****/
/// The symbol layer of the resolution chain.
///
/// One instance checks one declaration. Spawned twice per symbol at most: once by the signature
/// cache (which never touches bodies) and once by the symbol cache.
pub struct SymbolChecker<'p, 'm, 'c> {
    /// The package checker that spawned us, for global accesses.
    parent      : &'p mut PackageChecker<'m, 'c>,
    /// The file the checked declaration lives in.
    file        : Rc<PathBuf>,
    /// The fully qualified name of the checked symbol.
    name        : Name,
    /// The local variables and parameters in scope, innermost last.
    locals      : Vec<(String, Type)>,
    /// The return type of the checked procedure.
    return_type : Type,
}

impl<'p, 'm, 'c> SymbolChecker<'p, 'm, 'c> {
    /// Resolves the signature of the declaration with the given identifier.
    ///
    /// This is the strictly acyclic half of a symbol: parameter and return types for procedures,
    /// bare type-ness for structs. Struct members are walked here too, so that a struct that
    /// directly embeds itself is caught as a cycle, but pointer pointees are only checked for
    /// existence, which is what makes mutually-pointing structs legal.
    ///
    /// # Errors
    /// This function errors if the signature references unknown or inaccessible symbols, or
    /// closes a dependency cycle.
    pub(crate) fn signature(parent: &'p mut PackageChecker<'m, 'c>, identifier: &str) -> Result<Rc<Signature>, AstError> {
        let (file, decl) = match parent.declaration(identifier) {
            Some((file, decl)) => (file.clone(), decl.clone()),
            None => return Err(unknown_in_package(parent, identifier)),
        };
        let mut this: Self = Self {
            name        : parent.name().sub(identifier),
            parent,
            file,
            locals      : Vec::new(),
            return_type : Type::unit(),
        };

        Ok(Rc::new(match decl.kind {
            DeclarationKind::Procedure{ params, ret, .. } | DeclarationKind::ExternalProcedure{ params, ret, .. } => {
                let parameters: Vec<Type> = this.check_parameters(&params)?.into_iter().map(|(_, ty)| ty).collect();
                let ret: Type = match ret {
                    Some(formula) => this.check_type(&formula)?,
                    None => Type::unit(),
                };
                Signature::Procedure{ public: decl.public, parameters, ret }
            },
            DeclarationKind::Struct{ members } => {
                this.check_members(&members)?;
                Signature::Type{ public: decl.public }
            },
        }))
    }

    /// Resolves the declaration with the given identifier in full.
    ///
    /// # Errors
    /// This function errors if the declaration fails to check, references unknown or
    /// inaccessible symbols, or closes a dependency cycle.
    pub(crate) fn check(parent: &'p mut PackageChecker<'m, 'c>, identifier: &str) -> Result<Rc<Symbol>, AstError> {
        let (file, decl) = match parent.declaration(identifier) {
            Some((file, decl)) => (file.clone(), decl.clone()),
            None => return Err(unknown_in_package(parent, identifier)),
        };

        // Force the signature first, so signature-level cycles surface regardless of which cache
        // is asked first
        parent.resolve_signature(identifier)?;

        let mut this: Self = Self {
            name        : parent.name().sub(identifier),
            parent,
            file,
            locals      : Vec::new(),
            return_type : Type::unit(),
        };

        Ok(Rc::new(match decl.kind {
            DeclarationKind::Procedure{ params, ret, body } => {
                let parameters: Vec<(String, Type)> = this.check_parameters(&params)?;
                let ret: Type = match ret {
                    Some(formula) => this.check_type(&formula)?,
                    None => Type::unit(),
                };
                this.return_type = ret.clone();
                let (body, control): (Statement, Control) = this.check_statement(&body)?;
                if !ret.is_unit() && control == Control::Flows {
                    return Err(AstError::MissingReturn{ name: this.name.clone() });
                }
                Symbol::Procedure{ name: this.name, public: decl.public, parameters, ret, body }
            },

            DeclarationKind::ExternalProcedure{ params, ret, external } => {
                let parameters: Vec<(String, Type)> = this.check_parameters(&params)?;
                let ret: Type = match ret {
                    Some(formula) => this.check_type(&formula)?,
                    None => Type::unit(),
                };
                Symbol::ExternalProcedure{ name: this.name, public: decl.public, parameters, ret, external }
            },

            DeclarationKind::Struct{ members } => {
                let members: Vec<(String, Type)> = this.check_members(&members)?;
                Symbol::Struct{ name: this.name, public: decl.public, members }
            },
        }))
    }


    /// Points a diagnostic at the given range of the checked file.
    #[inline]
    fn subject(&self, range: TextRange) -> Subject { Subject::new(self.file.as_ref().clone(), range) }

    /// Resolves a mention to a fully qualified name.
    ///
    /// A single segment names a declaration in this package; more segments are already fully
    /// qualified.
    fn resolve_mention(&self, mention: &Mention) -> Name {
        if mention.segments.len() == 1 {
            self.parent.name().sub(mention.segments[0].name.clone())
        } else {
            Name::new(mention.segments.iter().map(|segment| segment.name.clone()))
        }
    }

    /// Checks a parameter list, entering each parameter into scope.
    fn check_parameters(&mut self, params: &[Binding]) -> Result<Vec<(String, Type)>, AstError> {
        let mut parameters: Vec<(String, Type)> = Vec::with_capacity(params.len());
        for binding in params {
            if parameters.iter().any(|(name, _)| name == &binding.name.name) {
                return Err(AstError::ParameterRedeclaration{ name: binding.name.name.clone(), subject: self.subject(binding.name.range) });
            }
            let ty: Type = self.check_type(&binding.formula)?;
            self.locals.push((binding.name.name.clone(), ty.clone()));
            parameters.push((binding.name.name.clone(), ty));
        }
        Ok(parameters)
    }

    /// Checks a struct's member list.
    fn check_members(&mut self, members: &[Binding]) -> Result<Vec<(String, Type)>, AstError> {
        let mut checked: Vec<(String, Type)> = Vec::with_capacity(members.len());
        for binding in members {
            if checked.iter().any(|(name, _)| name == &binding.name.name) {
                return Err(AstError::MemberRedeclaration{ name: binding.name.name.clone(), subject: self.subject(binding.name.range) });
            }
            let ty: Type = self.check_type(&binding.formula)?;
            checked.push((binding.name.name.clone(), ty));
        }
        Ok(checked)
    }

    /// Checks a type formula into a resolved type.
    ///
    /// Base mentions must resolve to type signatures; pointees go through the existence-only path
    /// (see [`Self::check_pointee()`]).
    fn check_type(&mut self, formula: &Formula) -> Result<Type, AstError> {
        match formula {
            Formula::Pointer{ pointee, .. } => Ok(Type::Pointer(Box::new(self.check_pointee(pointee)?))),
            Formula::Base(mention) => {
                let name: Name = self.resolve_mention(mention);
                let subject: Subject = self.subject(mention.range);
                let signature: Rc<Signature> = self.parent.access_signature(&name, &subject)?;
                match &*signature {
                    Signature::Type{ .. } => Ok(Type::Named(name)),
                    Signature::Procedure{ .. } => Err(AstError::NotAType{ name, subject }),
                }
            },
        }
    }

    /// Checks the pointee of a pointer formula.
    ///
    /// Same-package pointees are only checked for existence and type-ness against the raw
    /// declaration table, never forced through a cache, so two structs may point at each other
    /// without closing a cycle.
    fn check_pointee(&mut self, formula: &Formula) -> Result<Type, AstError> {
        match formula {
            Formula::Pointer{ pointee, .. } => Ok(Type::Pointer(Box::new(self.check_pointee(pointee)?))),
            Formula::Base(mention) => {
                let name: Name = self.resolve_mention(mention);
                let subject: Subject = self.subject(mention.range);
                if Primitive::from_name(&name).is_some() {
                    return Ok(Type::Named(name));
                }
                if name.scope().as_ref() == Some(self.parent.name()) {
                    match self.parent.declaration(name.identifier()) {
                        Some((_, decl)) => match decl.kind {
                            DeclarationKind::Struct{ .. } => Ok(Type::Named(name)),
                            _ => Err(AstError::NotAType{ name, subject }),
                        },
                        None => Err(AstError::UnknownSymbol{ name, subject }),
                    }
                } else {
                    let signature: Rc<Signature> = self.parent.access_signature(&name, &subject)?;
                    match &*signature {
                        Signature::Type{ .. } => Ok(Type::Named(name)),
                        Signature::Procedure{ .. } => Err(AstError::NotAType{ name, subject }),
                    }
                }
            },
        }
    }

    /// Checks a statement, producing its resolved form and how control leaves it.
    fn check_statement(&mut self, stmt: &parsed::Statement) -> Result<(Statement, Control), AstError> {
        use parsed::StatementKind;
        match &stmt.kind {
            StatementKind::Block(stmts) => {
                let scope: usize = self.locals.len();
                let mut control: Control = Control::Flows;
                let mut inner: Vec<Statement> = Vec::with_capacity(stmts.len());
                for stmt in stmts {
                    let (checked, stmt_control): (Statement, Control) = self.check_statement(stmt)?;
                    control = control.sequent(stmt_control);
                    inner.push(checked);
                }
                self.locals.truncate(scope);
                Ok((Statement::Block(inner), control))
            },

            StatementKind::If{ cond, true_branch, false_branch } => {
                let (condition, cond_ty): (Expression, Type) = self.check_expression(cond)?;
                if cond_ty != boolean() {
                    return Err(AstError::ConditionType{ found: cond_ty, subject: self.subject(cond.range) });
                }

                let scope: usize = self.locals.len();
                let (true_branch, true_control): (Statement, Control) = self.check_statement(true_branch)?;
                self.locals.truncate(scope);
                let (false_branch, false_control): (Option<Box<Statement>>, Control) = match false_branch {
                    Some(branch) => {
                        let (checked, control): (Statement, Control) = self.check_statement(branch)?;
                        self.locals.truncate(scope);
                        (Some(Box::new(checked)), control)
                    },
                    None => (None, Control::Flows),
                };

                Ok((
                    Statement::If{ condition, true_branch: Box::new(true_branch), false_branch },
                    true_control.branch(false_control),
                ))
            },

            StatementKind::Var{ name, annotation, value } => {
                let (value, ty): (Expression, Type) = self.check_expression(value)?;
                if let Some(formula) = annotation {
                    let annotated: Type = self.check_type(formula)?;
                    if annotated != ty {
                        let range: TextRange = formula.range().unwrap_or(stmt.range);
                        return Err(AstError::TypeMismatch{ expected: annotated, found: ty, subject: self.subject(range) });
                    }
                }
                if ty.is_noreturn() {
                    return Err(AstError::NoreturnVariable{ name: name.name.clone(), subject: self.subject(name.range) });
                }
                self.locals.push((name.name.clone(), ty.clone()));
                Ok((Statement::Declare{ name: name.name.clone(), ty, value }, Control::Flows))
            },

            StatementKind::Return(value) => match value {
                Some(value) => {
                    let (checked, ty): (Expression, Type) = self.check_expression(value)?;
                    if ty != self.return_type {
                        return Err(AstError::TypeMismatch{ expected: self.return_type.clone(), found: ty, subject: self.subject(value.range) });
                    }
                    Ok((Statement::Return(Some(checked)), Control::Returns))
                },
                None => {
                    if !self.return_type.is_unit() {
                        return Err(AstError::TypeMismatch{ expected: self.return_type.clone(), found: Type::unit(), subject: self.subject(stmt.range) });
                    }
                    Ok((Statement::Return(None), Control::Returns))
                },
            },

            StatementKind::Discard(expr) => {
                let (checked, ty): (Expression, Type) = self.check_expression(expr)?;
                let control: Control = if ty.is_noreturn() { Control::Sinks } else { Control::Flows };
                Ok((Statement::Discard(checked), control))
            },
        }
    }

    /// Checks an expression, producing its resolved form and type.
    fn check_expression(&mut self, expr: &parsed::Expression) -> Result<(Expression, Type), AstError> {
        use parsed::ExpressionKind;
        match &expr.kind {
            ExpressionKind::LessThan{ left, right } => {
                let (left_expr, left_ty): (Expression, Type) = self.check_expression(left)?;
                let (right_expr, right_ty): (Expression, Type) = self.check_expression(right)?;
                if !is_arithmetic(&left_ty) {
                    return Err(AstError::NotArithmetic{ found: left_ty, subject: self.subject(left.range) });
                }
                if !is_arithmetic(&right_ty) {
                    return Err(AstError::NotArithmetic{ found: right_ty, subject: self.subject(right.range) });
                }
                if left_ty != right_ty {
                    return Err(AstError::TypeMismatch{ expected: left_ty, found: right_ty, subject: self.subject(expr.range) });
                }
                Ok((Expression::LessThan{ left: Box::new(left_expr), right: Box::new(right_expr) }, boolean()))
            },

            ExpressionKind::Invocation{ callee, args } => {
                let name: Name = self.resolve_mention(callee);
                let subject: Subject = self.subject(callee.range);
                let signature: Rc<Signature> = self.parent.access_signature(&name, &subject)?;
                match &*signature {
                    Signature::Procedure{ parameters, ret, .. } => {
                        if args.len() != parameters.len() {
                            return Err(AstError::ArgumentCount{
                                name,
                                expected : parameters.len(),
                                found    : args.len(),
                                subject  : self.subject(expr.range),
                            });
                        }
                        let mut arguments: Vec<Expression> = Vec::with_capacity(args.len());
                        for (arg, param_ty) in args.iter().zip(parameters.iter()) {
                            let (checked, ty): (Expression, Type) = self.check_expression(arg)?;
                            if &ty != param_ty {
                                return Err(AstError::TypeMismatch{ expected: param_ty.clone(), found: ty, subject: self.subject(arg.range) });
                            }
                            arguments.push(checked);
                        }
                        let ret: Type = ret.clone();
                        Ok((Expression::Invocation{ callee: name, arguments }, ret))
                    },
                    Signature::Type{ .. } => Err(AstError::NotAProcedure{ name, subject }),
                }
            },

            ExpressionKind::Access(mention) => {
                if mention.segments.len() == 1 {
                    let accessed: &str = &mention.segments[0].name;
                    if let Some((name, ty)) = self.locals.iter().rev().find(|(name, _)| name == accessed) {
                        return Ok((Expression::LocalAccess(name.clone()), ty.clone()));
                    }
                }
                // A global in value position; resolve it so unknown names report as such
                let name: Name = self.resolve_mention(mention);
                let subject: Subject = self.subject(mention.range);
                self.parent.access_signature(&name, &subject)?;
                Err(AstError::NotAValue{ name, subject })
            },

            ExpressionKind::Natural(value) => {
                if *value <= u32::MAX as u64 {
                    Ok((Expression::Natural32(*value as u32), Type::Named(Primitive::Natural32.name())))
                } else {
                    Ok((Expression::Natural64(*value), Type::Named(Primitive::Natural64.name())))
                }
            },

            ExpressionKind::String(value) => {
                Ok((Expression::String(value.clone()), Type::Pointer(Box::new(Type::Named(Primitive::Byte.name())))))
            },
        }
    }
}


/***** HELPER FUNCTIONS *****/
/// Builds the error for an identifier that is not declared in the given package.
fn unknown_in_package(parent: &PackageChecker, identifier: &str) -> AstError {
    AstError::UnknownSymbol {
        name    : parent.name().sub(identifier),
        subject : Subject::new(PathBuf::new(), TextRange::new((0usize, 0usize), (0usize, 0usize))),
    }
}
