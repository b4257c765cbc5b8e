//! Understanding of constructor bodies.
//!
//! A constructor may only do two things: delegate to the constructor of a
//! direct parent, passing its own arguments through unchanged, and assign
//! its arguments to the properties of the same name, optionally falling
//! back to a default. This module maps each body to a sequence of
//! [`Statement`]s and rejects every other shape.
//!
//! Recognized statements:
//!
//! ```text
//! Parent.__init__(self, x, y=y)               # delegation
//! self.x = x                                  # assignment
//! self.x = x if x is not None else []         # assignment with default
//! self.kind = Kind.Default if kind is None else kind
//! ```

use crate::ast::{CompareOp, Expr, ExprKind, Identifier, Keyword, Span, Stmt, StmtKind};
use crate::diag::Diag;
pub use crate::ir::{AssignArgument, ConstructorDefault};
use crate::parsed::{Class, Constructor, SymbolId, SymbolTable};
use crate::semantic::diag::{SemanticDiagBuilder, SemanticDiagKind};
use std::collections::HashMap;

/// A statement of a constructor body, before inlining.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// Delegation to the constructor of a direct parent.
    CallSuperConstructor { super_class: SymbolId, span: Span },
    AssignArgument(AssignArgument),
}

/// Statements of every class, by symbol.
///
/// Classes without an explicit constructor map to an empty body.
#[derive(Debug, Clone, Default)]
pub struct ConstructorTable {
    bodies: HashMap<SymbolId, Vec<Statement>>,
}

impl ConstructorTable {
    pub fn statements(&self, id: SymbolId) -> &[Statement] {
        self.bodies.get(&id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn contains(&self, id: SymbolId) -> bool {
        self.bodies.contains_key(&id)
    }
}

/// Understands the constructors of all classes.
///
/// Errors are collected per class and then bundled under a single
/// "Failed to understand the constructors" diagnostic.
pub fn understand_all(table: &SymbolTable) -> Result<ConstructorTable, Diag> {
    let mut bodies = HashMap::new();
    let mut failures = Vec::new();

    for (id, class) in table.classes() {
        let statements = match &class.constructor {
            Some(constructor) if !constructor.is_implementation_specific => {
                match understand_constructor(table, class, constructor) {
                    Ok(statements) => statements,
                    Err(diagnostics) => {
                        failures.push(
                            Diag::composite(
                                format!(
                                    "Failed to understand the constructor of the class {}",
                                    class.name
                                ),
                                diagnostics,
                            )
                            .with_primary_label(constructor.span.clone(), ""),
                        );
                        continue;
                    }
                }
            }
            _ => Vec::new(),
        };

        bodies.insert(id, statements);
    }

    if !failures.is_empty() {
        return Err(Diag::composite(
            "Failed to understand the constructors",
            failures,
        ));
    }

    Ok(ConstructorTable { bodies })
}

/// Understands a single constructor body, collecting an error per
/// offending statement.
pub fn understand_constructor(
    table: &SymbolTable,
    class: &Class,
    constructor: &Constructor,
) -> Result<Vec<Statement>, Vec<Diag>> {
    let context = Context {
        table,
        class,
        constructor,
    };

    let mut statements = Vec::new();
    let mut diagnostics = Vec::new();

    for stmt in &constructor.body {
        let understood = match &stmt.node {
            StmtKind::Pass => continue,
            StmtKind::Expr(Expr {
                node: ExprKind::Call { func, args, keywords },
                span,
            }) => context.understand_super_call(func, args, keywords, span),
            StmtKind::Assign { targets, value } => context.understand_assignment(stmt, targets, value),
            StmtKind::Expr(_) | StmtKind::Return(_) | StmtKind::Opaque(_) => {
                Err(unexpected_statement(stmt))
            }
        };

        match understood {
            Ok(statement) => statements.push(statement),
            Err(diag) => diagnostics.push(diag),
        }
    }

    if diagnostics.is_empty() {
        Ok(statements)
    } else {
        Err(diagnostics)
    }
}

fn invalid(span: Span, message: impl Into<String>) -> Diag {
    SemanticDiagBuilder::at(SemanticDiagKind::InvalidConstructor, span, message).build()
}

fn unexpected_statement(stmt: &Stmt) -> Diag {
    invalid(
        stmt.span.clone(),
        format!(
            "Unexpected statement in the body of ``__init__``: {}; only calls to \
             super ``__init__``'s and property assignments expected",
            stmt.node
        ),
    )
}

struct Context<'a> {
    table: &'a SymbolTable,
    class: &'a Class,
    constructor: &'a Constructor,
}

impl Context<'_> {
    fn understand_super_call(
        &self,
        func: &Expr,
        args: &[Expr],
        keywords: &[Keyword],
        span: &Span,
    ) -> Result<Statement, Diag> {
        let ExprKind::Attribute { value, attr } = &func.node else {
            return Err(unexpected_call(func, span));
        };
        if attr != "__init__" {
            return Err(unexpected_call(func, span));
        }

        let Some(super_name) = value.as_name() else {
            return Err(invalid(
                value.span.clone(),
                format!(
                    "Expected a super class as a name for a call to super ``__init__``, \
                     but got: {}",
                    value.node
                ),
            ));
        };

        if !self.class.inheritances.contains(super_name) {
            return Err(invalid(
                value.span.clone(),
                format!(
                    "Expected a super class in the call to a super ``__init__``, \
                     but {} does not inherit from {super_name}",
                    self.class.name
                ),
            ));
        }

        let Some((super_id, super_class)) = self.table.find_class(super_name) else {
            return Err(invalid(
                value.span.clone(),
                format!("The super class {super_name} is not a class"),
            ));
        };

        let Some(super_init) = &super_class.constructor else {
            return Err(invalid(
                func.span.clone(),
                format!("The super class {super_name} does not define a ``__init__``"),
            ));
        };

        if let Some(double_star) = keywords.iter().find(|keyword| keyword.arg.is_none()) {
            return Err(invalid(
                double_star.span.clone(),
                "Expected a call to a super ``__init__`` to provide only explicit keyword \
                 arguments, but got a double-star keyword argument",
            ));
        }

        let failed = |underlying: Vec<Diag>| {
            Diag::composite(
                "Failed to parse the arguments to the super ``__init__``",
                underlying,
            )
            .with_primary_label(span.clone(), "")
        };

        let non_names: Vec<Diag> = args
            .iter()
            .chain(keywords.iter().map(|keyword| &keyword.value))
            .filter(|arg| arg.as_name().is_none())
            .map(|arg| {
                invalid(
                    arg.span.clone(),
                    format!(
                        "Expected only names in the arguments to super ``__init__``, \
                         but got: {}",
                        arg.node
                    ),
                )
            })
            .collect();
        if !non_names.is_empty() {
            return Err(failed(non_names));
        }

        if args.len() > super_init.arguments.len() {
            return Err(invalid(
                span.clone(),
                format!(
                    "The ``{super_name}.__init__`` expected {} argument(s), but the call \
                     provides {} positional argument(s)",
                    super_init.arguments.len(),
                    args.len()
                ),
            ));
        }

        // Parent argument -> name passed for it, in the order of binding.
        let mut resolved: Vec<(&Identifier, &Identifier)> = Vec::new();
        for (arg, parameter) in args.iter().zip(&super_init.arguments) {
            if let Some(name) = arg.as_name() {
                resolved.push((&parameter.name, name));
            }
        }

        let mut underlying = Vec::new();
        for keyword in keywords {
            let (Some(key), Some(name)) = (&keyword.arg, keyword.value.as_name()) else {
                continue;
            };
            if super_init.argument(key).is_none() {
                underlying.push(invalid(
                    keyword.span.clone(),
                    format!("The ``{super_name}.__init__`` does not expect the argument {key}"),
                ));
            } else if let Some(entry) = resolved.iter_mut().find(|(bound, _)| *bound == key) {
                entry.1 = name;
            } else {
                resolved.push((key, name));
            }
        }
        if !underlying.is_empty() {
            return Err(failed(underlying));
        }

        for (key, name) in &resolved {
            if self.constructor.argument(name).is_none() {
                underlying.push(invalid(
                    span.clone(),
                    format!(
                        "Expected all the arguments to ``{super_name}.__init__`` to be \
                         propagation of the original ``__init__`` arguments, but the name \
                         {name} is not an argument of ``{}.__init__``",
                        self.class.name
                    ),
                ));
            } else if key != name {
                underlying.push(invalid(
                    span.clone(),
                    format!(
                        "Expected the arguments to super ``__init__`` to be passed with \
                         the same names, but the argument {key} is passed as the name {name}"
                    ),
                ));
            }
        }

        let missing: Vec<&str> = super_init
            .arguments
            .iter()
            .filter(|parameter| !resolved.iter().any(|(key, _)| **key == parameter.name))
            .map(|parameter| parameter.name.as_str())
            .collect();
        if !missing.is_empty() {
            underlying.push(invalid(
                span.clone(),
                format!(
                    "The call to ``{super_name}.__init__`` is missing one or more arguments: {}",
                    missing.join(", ")
                ),
            ));
        }

        if !underlying.is_empty() {
            return Err(failed(underlying));
        }

        Ok(Statement::CallSuperConstructor {
            super_class: super_id,
            span: span.clone(),
        })
    }

    fn understand_assignment(
        &self,
        stmt: &Stmt,
        targets: &[Expr],
        value: &Expr,
    ) -> Result<Statement, Diag> {
        let [target] = targets else {
            return Err(invalid(
                stmt.span.clone(),
                format!(
                    "Expected only a single target for property assignment, but got {} targets",
                    targets.len()
                ),
            ));
        };

        let property = match target.as_qualified_name() {
            Some((receiver, attr)) if receiver == "self" => attr,
            _ => {
                return Err(invalid(
                    target.span.clone(),
                    format!(
                        "Expected a property as the target of an assignment, but got: {}",
                        target.node
                    ),
                ));
            }
        };

        if self.class.property(property).is_none() {
            return Err(invalid(
                target.span.clone(),
                format!(
                    "The property has not been previously defined in the class '{}': {property}",
                    self.class.name
                ),
            ));
        }

        match &value.node {
            ExprKind::Name(argument) => {
                if self.constructor.argument(argument).is_none() {
                    return Err(invalid(
                        value.span.clone(),
                        format!(
                            "Expected the property {property} to be assigned to an argument, \
                             but it was assigned to a non-argument variable: {argument}"
                        ),
                    ));
                }
                if argument != property {
                    return Err(invalid(
                        value.span.clone(),
                        format!(
                            "Expected the property {property} to be assigned exactly the \
                             argument with the same name, but got: {argument}"
                        ),
                    ));
                }

                Ok(Statement::AssignArgument(AssignArgument {
                    name: property.clone(),
                    argument: argument.clone(),
                    default: None,
                    span: stmt.span.clone(),
                }))
            }
            ExprKind::IfExp { test, body, orelse } => {
                let Some((argument, default)) = self.match_conditional_default(test, body, orelse)
                else {
                    return Err(unhandled_statement(stmt));
                };

                let Some(default) = self.understand_default(default) else {
                    return Err(SemanticDiagBuilder::at(
                        SemanticDiagKind::UnsupportedDefault,
                        default.span.clone(),
                        format!(
                            "The handling of this default value for the property '{property}' \
                             has not been implemented: {}",
                            default.node
                        ),
                    )
                    .build());
                };

                Ok(Statement::AssignArgument(AssignArgument {
                    name: property.clone(),
                    argument: argument.clone(),
                    default: Some(default),
                    span: stmt.span.clone(),
                }))
            }
            _ => Err(unhandled_statement(stmt)),
        }
    }

    /// Matches `x if x is not None else D` and `D if x is None else x`,
    /// where `x` is an argument, and returns `x` and `D`.
    fn match_conditional_default<'e>(
        &self,
        test: &'e Expr,
        body: &'e Expr,
        orelse: &'e Expr,
    ) -> Option<(&'e Identifier, &'e Expr)> {
        let ExprKind::Compare { left, op, right } = &test.node else {
            return None;
        };
        let argument = left.as_name()?;
        if self.constructor.argument(argument).is_none() || !right.is_none_constant() {
            return None;
        }

        match op {
            CompareOp::IsNot if body.as_name() == Some(argument) => Some((argument, orelse)),
            CompareOp::Is if orelse.as_name() == Some(argument) => Some((argument, body)),
            _ => None,
        }
    }

    fn understand_default(&self, default: &Expr) -> Option<ConstructorDefault> {
        match &default.node {
            ExprKind::List(items) if items.is_empty() => Some(ConstructorDefault::EmptyList),
            _ => {
                let (enumeration_name, literal) = default.as_qualified_name()?;
                let (enumeration, parsed) = self.table.find_enumeration(enumeration_name)?;
                parsed.literal(literal)?;
                Some(ConstructorDefault::EnumerationLiteral {
                    enumeration,
                    literal: literal.clone(),
                })
            }
        }
    }
}

fn unexpected_call(func: &Expr, span: &Span) -> Diag {
    invalid(
        span.clone(),
        format!(
            "Unexpected call in the body of ``__init__``: {}; only calls to super \
             ``__init__``'s are expected",
            func.node
        ),
    )
}

fn unhandled_statement(stmt: &Stmt) -> Diag {
    invalid(
        stmt.span.clone(),
        format!(
            "The handling of the constructor statement has not been implemented: {}",
            stmt.node
        ),
    )
}
