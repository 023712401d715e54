//! Construction errors for expression nodes and command trees.
//!
//! Every invariant is checked once, when a node is built. A rejected
//! construction produces one of the variants below; there is no partially
//! valid node and no error is downgraded to a default value.

use miette::Diagnostic;
use smol_str::SmolStr;
use thiserror::Error;

/// Result alias used by every fallible constructor in this crate.
pub type Result<T> = std::result::Result<T, ConstructionError>;

/// Broad classification of construction failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// A required argument is absent or malformed at its call site.
    ArgumentValidity,
    /// A result type, reference or child does not satisfy a compatibility rule.
    TypeMismatch,
    /// Arity or multiplicity does not match what the node kind demands.
    ShapeMismatch,
}

/// A rejected node or command tree construction.
///
/// Each variant names the argument it is attributed to, so callers can tell
/// exactly which input to correct before reconstructing.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    #[error("argument '{argument}' must not be empty")]
    #[diagnostic(code(command_tree::argument::empty))]
    EmptyArgument { argument: &'static str },

    #[error("'{name}' is not a valid parameter name")]
    #[diagnostic(
        code(command_tree::argument::invalid_parameter_name),
        help("parameter names start with a letter and contain only letters, digits and '_'")
    )]
    InvalidParameterName { name: SmolStr },

    #[error("member '{member}' passed as '{argument}' is not a property, navigation property or relationship end")]
    #[diagnostic(code(command_tree::argument::invalid_member_kind))]
    InvalidMemberKind {
        argument: &'static str,
        member: SmolStr,
    },

    #[error("scale {scale} passed as '{argument}' exceeds the maximum decimal scale of {max}")]
    #[diagnostic(code(command_tree::argument::scale_out_of_range))]
    ScaleOutOfRange {
        argument: &'static str,
        scale: u32,
        max: u32,
    },

    #[error("type '{type_name}' has no member named '{member}'")]
    #[diagnostic(code(command_tree::argument::unknown_member))]
    UnknownMember { type_name: String, member: SmolStr },

    #[error("relationship end '{end}' passed as '{argument}' is not declared by relationship '{relationship}'")]
    #[diagnostic(code(command_tree::argument::end_not_in_relationship))]
    EndNotInRelationship {
        argument: &'static str,
        end: SmolStr,
        relationship: SmolStr,
    },

    #[error("lambda variable '{name}' is declared more than once")]
    #[diagnostic(code(command_tree::argument::duplicate_variable))]
    DuplicateVariable { name: SmolStr },

    #[error("the target end must be declared by the same relationship as the source end")]
    #[diagnostic(code(command_tree::related_entity::target_end_from_different_relationship))]
    TargetEndFromDifferentRelationship {
        argument: &'static str,
        source_relationship: SmolStr,
        target_relationship: SmolStr,
    },

    #[error("the target end '{end}' must differ from the source end")]
    #[diagnostic(code(command_tree::related_entity::target_end_same_as_source_end))]
    TargetEndSameAsSourceEnd { argument: &'static str, end: SmolStr },

    #[error("the target end '{end}' must have a multiplicity of one or zero-or-one, found {multiplicity}")]
    #[diagnostic(
        code(command_tree::related_entity::target_end_must_be_at_most_one),
        help("many-valued relationship ends cannot be wired up by a related entity reference")
    )]
    TargetEndMustBeAtMostOne {
        argument: &'static str,
        end: SmolStr,
        multiplicity: SmolStr,
    },

    #[error("the target entity reference must have a reference result type, found '{found}'")]
    #[diagnostic(code(command_tree::related_entity::target_entity_not_ref))]
    TargetEntityNotRef { argument: &'static str, found: String },

    #[error("the target entity type '{found}' is not compatible with the end type '{expected}'")]
    #[diagnostic(code(command_tree::related_entity::target_entity_not_compatible))]
    TargetEntityNotCompatible {
        argument: &'static str,
        expected: String,
        found: String,
    },

    #[error("value for '{argument}' does not match type '{expected}': found {found}")]
    #[diagnostic(code(command_tree::types::value_mismatch))]
    ValueTypeMismatch {
        argument: &'static str,
        expected: String,
        found: String,
    },

    #[error("result type for '{argument}' must be '{expected}', found '{found}'")]
    #[diagnostic(code(command_tree::types::result_type_mismatch))]
    ResultTypeMismatch {
        argument: &'static str,
        expected: String,
        found: String,
    },

    #[error("'{argument}' requires {expected}, found '{found}'")]
    #[diagnostic(code(command_tree::types::unexpected_type))]
    UnexpectedType {
        argument: &'static str,
        expected: &'static str,
        found: String,
    },

    #[error("types '{left}' and '{right}' are not compatible for '{argument}'")]
    #[diagnostic(code(command_tree::types::incompatible))]
    IncompatibleTypes {
        argument: &'static str,
        left: String,
        right: String,
    },

    #[error("parameter '{name}' is referenced with conflicting types '{first}' and '{second}'")]
    #[diagnostic(code(command_tree::types::parameter_type_conflict))]
    ParameterTypeConflict {
        name: SmolStr,
        first: String,
        second: String,
    },

    #[error("'{argument}' expects {expected} argument(s), found {found}")]
    #[diagnostic(code(command_tree::shape::argument_count))]
    ArgumentCountMismatch {
        argument: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("a new instance of non-collection type '{type_name}' needs at least one element")]
    #[diagnostic(
        code(command_tree::shape::empty_elements),
        help("only collection types may be constructed empty")
    )]
    EmptyElements { type_name: String },
}

impl ConstructionError {
    /// Returns the broad category this failure belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::EmptyArgument { .. }
            | Self::InvalidParameterName { .. }
            | Self::InvalidMemberKind { .. }
            | Self::ScaleOutOfRange { .. }
            | Self::UnknownMember { .. }
            | Self::EndNotInRelationship { .. }
            | Self::DuplicateVariable { .. }
            | Self::TargetEndFromDifferentRelationship { .. }
            | Self::TargetEndSameAsSourceEnd { .. } => ErrorCategory::ArgumentValidity,
            Self::TargetEntityNotRef { .. }
            | Self::TargetEntityNotCompatible { .. }
            | Self::ValueTypeMismatch { .. }
            | Self::ResultTypeMismatch { .. }
            | Self::UnexpectedType { .. }
            | Self::IncompatibleTypes { .. }
            | Self::ParameterTypeConflict { .. } => ErrorCategory::TypeMismatch,
            Self::TargetEndMustBeAtMostOne { .. }
            | Self::ArgumentCountMismatch { .. }
            | Self::EmptyElements { .. } => ErrorCategory::ShapeMismatch,
        }
    }

    /// Returns the name of the argument the failure is attributed to, if any.
    pub fn argument(&self) -> Option<&'static str> {
        match self {
            Self::EmptyArgument { argument }
            | Self::InvalidMemberKind { argument, .. }
            | Self::ScaleOutOfRange { argument, .. }
            | Self::EndNotInRelationship { argument, .. }
            | Self::TargetEndFromDifferentRelationship { argument, .. }
            | Self::TargetEndSameAsSourceEnd { argument, .. }
            | Self::TargetEndMustBeAtMostOne { argument, .. }
            | Self::TargetEntityNotRef { argument, .. }
            | Self::TargetEntityNotCompatible { argument, .. }
            | Self::ValueTypeMismatch { argument, .. }
            | Self::ResultTypeMismatch { argument, .. }
            | Self::UnexpectedType { argument, .. }
            | Self::IncompatibleTypes { argument, .. }
            | Self::ArgumentCountMismatch { argument, .. } => Some(*argument),
            Self::InvalidParameterName { .. } | Self::ParameterTypeConflict { .. } => Some("name"),
            Self::UnknownMember { .. } => Some("member"),
            Self::DuplicateVariable { .. } => Some("variables"),
            Self::EmptyElements { .. } => Some("elements"),
        }
    }
}
