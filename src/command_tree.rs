//! Command trees: the root of a query or data-manipulation statement.
//!
//! A [`CommandTree`] owns one or more expression trees plus the parameters
//! they reference. Assembly collects parameter references, checks that each
//! name is used with a single type, and checks the statement-level shape
//! rules (Boolean predicates, DML targets bound over entity set scans, set
//! clauses that name writable properties).

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use indexmap::map::Entry;
use smol_str::SmolStr;
use tracing::debug;

use crate::error::{ConstructionError, Result};
use crate::expressions::{Expression, ExpressionBinding};
use crate::metadata::{EdmFunction, EdmProperty, EntitySetBase, TypeOracle, TypeUsageRef};
use crate::visit::visitors::ParameterCollector;

/// Returns true when `name` starts with an ASCII letter and continues with
/// ASCII letters, digits or underscores.
pub fn is_valid_parameter_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

// ============================================================================
// Options
// ============================================================================

/// Model space a tree's metadata comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DataSpace {
    #[default]
    Conceptual,
    Store,
}

/// Settings carried on every tree for the backend translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandTreeOptions {
    /// Model space of the metadata referenced by the tree.
    pub data_space: DataSpace,

    /// Compare nulls the way the target database does instead of with
    /// two-valued logic.
    pub use_database_null_semantics: bool,

    /// Keep filters above projections that call user-defined functions.
    pub disable_filter_over_projection_simplification_for_custom_functions: bool,
}

impl Default for CommandTreeOptions {
    fn default() -> Self {
        Self {
            data_space: DataSpace::Conceptual,
            use_database_null_semantics: true,
            disable_filter_over_projection_simplification_for_custom_functions: false,
        }
    }
}

impl CommandTreeOptions {
    pub fn with_data_space(mut self, data_space: DataSpace) -> Self {
        self.data_space = data_space;
        self
    }

    pub fn with_database_null_semantics(mut self, enabled: bool) -> Self {
        self.use_database_null_semantics = enabled;
        self
    }

    pub fn with_filter_over_projection_simplification_disabled(mut self, disabled: bool) -> Self {
        self.disable_filter_over_projection_simplification_for_custom_functions = disabled;
        self
    }
}

// ============================================================================
// Set clauses
// ============================================================================

/// Assignment of a value to one property of a DML target.
#[derive(Debug, Clone)]
pub struct SetClause {
    property: Arc<EdmProperty>,
    value: Expression,
}

impl SetClause {
    pub fn property(&self) -> &Arc<EdmProperty> {
        &self.property
    }

    pub fn value(&self) -> &Expression {
        &self.value
    }
}

// ============================================================================
// Trees
// ============================================================================

#[derive(Debug, Clone)]
pub enum CommandTreeKind {
    Query {
        query: Expression,
    },
    Insert {
        target: ExpressionBinding,
        set_clauses: Vec<SetClause>,
        returning: Option<Expression>,
    },
    Update {
        target: ExpressionBinding,
        predicate: Expression,
        set_clauses: Vec<SetClause>,
        returning: Option<Expression>,
    },
    Delete {
        target: ExpressionBinding,
        predicate: Expression,
    },
    Function {
        function: Arc<EdmFunction>,
        result_type: TypeUsageRef,
    },
}

impl CommandTreeKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Query { .. } => "Query",
            Self::Insert { .. } => "Insert",
            Self::Update { .. } => "Update",
            Self::Delete { .. } => "Delete",
            Self::Function { .. } => "Function",
        }
    }

    fn expressions(&self) -> Vec<&Expression> {
        match self {
            Self::Query { query } => vec![query],
            Self::Insert {
                target,
                set_clauses,
                returning,
            } => std::iter::once(target.expression())
                .chain(set_clauses.iter().map(SetClause::value))
                .chain(returning.as_ref())
                .collect(),
            Self::Update {
                target,
                predicate,
                set_clauses,
                returning,
            } => std::iter::once(target.expression())
                .chain(std::iter::once(predicate))
                .chain(set_clauses.iter().map(SetClause::value))
                .chain(returning.as_ref())
                .collect(),
            Self::Delete { target, predicate } => vec![target.expression(), predicate],
            Self::Function { .. } => Vec::new(),
        }
    }
}

impl fmt::Display for CommandTreeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A complete, validated statement ready for translation.
#[derive(Debug, Clone)]
pub struct CommandTree {
    kind: CommandTreeKind,
    parameters: IndexMap<SmolStr, TypeUsageRef>,
    options: CommandTreeOptions,
}

impl CommandTree {
    /// A read-only query.
    pub fn query(oracle: &dyn TypeOracle, query: Expression) -> Result<Self> {
        Self::assemble(oracle, CommandTreeKind::Query { query })
    }

    /// Inserts one row into the entity set scanned by `target`.
    pub fn insert<N: Into<SmolStr>>(
        oracle: &dyn TypeOracle,
        target: ExpressionBinding,
        set_clauses: impl IntoIterator<Item = (N, Expression)>,
        returning: Option<Expression>,
    ) -> Result<Self> {
        check_target(&target).map_err(|e| rejected("Insert", e))?;
        let set_clauses = resolve_set_clauses(oracle, &target, set_clauses)
            .map_err(|e| rejected("Insert", e))?;
        Self::assemble(
            oracle,
            CommandTreeKind::Insert {
                target,
                set_clauses,
                returning,
            },
        )
    }

    /// Updates the rows of `target` that satisfy `predicate`.
    pub fn update<N: Into<SmolStr>>(
        oracle: &dyn TypeOracle,
        target: ExpressionBinding,
        predicate: Expression,
        set_clauses: impl IntoIterator<Item = (N, Expression)>,
        returning: Option<Expression>,
    ) -> Result<Self> {
        check_target(&target)
            .and_then(|()| check_predicate(oracle, &predicate))
            .map_err(|e| rejected("Update", e))?;
        let set_clauses = resolve_set_clauses(oracle, &target, set_clauses)
            .map_err(|e| rejected("Update", e))?;
        Self::assemble(
            oracle,
            CommandTreeKind::Update {
                target,
                predicate,
                set_clauses,
                returning,
            },
        )
    }

    /// Deletes the rows of `target` that satisfy `predicate`.
    pub fn delete(
        oracle: &dyn TypeOracle,
        target: ExpressionBinding,
        predicate: Expression,
    ) -> Result<Self> {
        check_target(&target)
            .and_then(|()| check_predicate(oracle, &predicate))
            .map_err(|e| rejected("Delete", e))?;
        Self::assemble(oracle, CommandTreeKind::Delete { target, predicate })
    }

    /// Invokes a function directly. The function's parameters become the
    /// tree's parameters.
    pub fn function(oracle: &dyn TypeOracle, function: Arc<EdmFunction>) -> Result<Self> {
        let Some(result_type) = function.return_type().cloned() else {
            return Err(rejected(
                "Function",
                ConstructionError::UnexpectedType {
                    argument: "function",
                    expected: "a function with a declared return type",
                    found: function.full_name(),
                },
            ));
        };

        let mut parameters = IndexMap::new();
        for parameter in function.parameters() {
            declare_parameter(oracle, &mut parameters, &parameter.name, &parameter.type_usage)
                .map_err(|e| rejected("Function", e))?;
        }

        let tree = Self {
            kind: CommandTreeKind::Function {
                function,
                result_type,
            },
            parameters,
            options: CommandTreeOptions::default(),
        };
        debug!(kind = %tree.kind, parameters = tree.parameters.len(), "command tree assembled");
        Ok(tree)
    }

    fn assemble(oracle: &dyn TypeOracle, kind: CommandTreeKind) -> Result<Self> {
        let mut parameters = IndexMap::new();
        for expression in kind.expressions() {
            for reference in ParameterCollector::collect(expression) {
                declare_parameter(
                    oracle,
                    &mut parameters,
                    reference.parameter_name(),
                    reference.result_type(),
                )
                .map_err(|e| rejected(kind.name(), e))?;
            }
        }

        debug!(%kind, parameters = parameters.len(), "command tree assembled");
        Ok(Self {
            kind,
            parameters,
            options: CommandTreeOptions::default(),
        })
    }

    /// Replaces the default options.
    pub fn with_options(mut self, options: CommandTreeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn kind(&self) -> &CommandTreeKind {
        &self.kind
    }

    /// Parameters referenced by the tree, in first-seen order.
    pub fn parameters(&self) -> &IndexMap<SmolStr, TypeUsageRef> {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&TypeUsageRef> {
        self.parameters.get(name)
    }

    pub fn options(&self) -> &CommandTreeOptions {
        &self.options
    }

    pub fn data_space(&self) -> DataSpace {
        self.options.data_space
    }
}

fn rejected(kind: &'static str, error: ConstructionError) -> ConstructionError {
    debug!(kind, argument = ?error.argument(), %error, "command tree rejected");
    error
}

fn declare_parameter(
    oracle: &dyn TypeOracle,
    parameters: &mut IndexMap<SmolStr, TypeUsageRef>,
    name: &str,
    ty: &TypeUsageRef,
) -> Result<()> {
    if !is_valid_parameter_name(name) {
        return Err(ConstructionError::InvalidParameterName {
            name: SmolStr::new(name),
        });
    }
    match parameters.entry(SmolStr::new(name)) {
        Entry::Vacant(slot) => {
            slot.insert(Arc::clone(ty));
            Ok(())
        }
        Entry::Occupied(slot) if oracle.edm_equals(slot.get().edm_type(), ty.edm_type()) => Ok(()),
        Entry::Occupied(slot) => Err(ConstructionError::ParameterTypeConflict {
            name: slot.key().clone(),
            first: slot.get().to_string(),
            second: ty.to_string(),
        }),
    }
}

fn check_target(target: &ExpressionBinding) -> Result<()> {
    match target.expression() {
        Expression::Scan(scan) if matches!(scan.target(), EntitySetBase::Entity(_)) => Ok(()),
        other => Err(ConstructionError::UnexpectedType {
            argument: "target",
            expected: "a binding over a scan of an entity set",
            found: other.kind().to_string(),
        }),
    }
}

fn check_predicate(oracle: &dyn TypeOracle, predicate: &Expression) -> Result<()> {
    if oracle.is_boolean(predicate.result_type()) {
        Ok(())
    } else {
        Err(ConstructionError::UnexpectedType {
            argument: "predicate",
            expected: "a Boolean type",
            found: predicate.result_type().to_string(),
        })
    }
}

fn resolve_set_clauses<N: Into<SmolStr>>(
    oracle: &dyn TypeOracle,
    target: &ExpressionBinding,
    set_clauses: impl IntoIterator<Item = (N, Expression)>,
) -> Result<Vec<SetClause>> {
    let element_type = target.variable_type();
    set_clauses
        .into_iter()
        .map(|(name, value)| {
            let name = name.into();
            let Some(property) = element_type.edm_type().structural_property(&name) else {
                return Err(ConstructionError::UnknownMember {
                    type_name: element_type.to_string(),
                    member: name,
                });
            };
            if !oracle.is_equal_or_promotable(value.result_type(), property.type_usage()) {
                return Err(ConstructionError::ValueTypeMismatch {
                    argument: "set_clauses",
                    expected: property.type_usage().to_string(),
                    found: value.result_type().to_string(),
                });
            }
            Ok(SetClause { property, value })
        })
        .collect()
}
