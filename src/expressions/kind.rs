use std::fmt;

/// Tag identifying the concrete kind of an expression node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExpressionKind {
    Constant,
    Null,
    VariableReference,
    ParameterReference,
    Property,
    Function,
    Lambda,
    RelationshipNavigation,
    NewInstance,
    Ref,
    Deref,
    Scan,
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEquals,
    GreaterThan,
    GreaterThanOrEquals,
    And,
    Or,
    Not,
    IsNull,
    Filter,
    Project,
}

impl ExpressionKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Constant => "Constant",
            Self::Null => "Null",
            Self::VariableReference => "VariableReference",
            Self::ParameterReference => "ParameterReference",
            Self::Property => "Property",
            Self::Function => "Function",
            Self::Lambda => "Lambda",
            Self::RelationshipNavigation => "RelationshipNavigation",
            Self::NewInstance => "NewInstance",
            Self::Ref => "Ref",
            Self::Deref => "Deref",
            Self::Scan => "Scan",
            Self::Equals => "Equals",
            Self::NotEquals => "NotEquals",
            Self::LessThan => "LessThan",
            Self::LessThanOrEquals => "LessThanOrEquals",
            Self::GreaterThan => "GreaterThan",
            Self::GreaterThanOrEquals => "GreaterThanOrEquals",
            Self::And => "And",
            Self::Or => "Or",
            Self::Not => "Not",
            Self::IsNull => "IsNull",
            Self::Filter => "Filter",
            Self::Project => "Project",
        }
    }

    /// True for the six comparison kinds.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Equals
                | Self::NotEquals
                | Self::LessThan
                | Self::LessThanOrEquals
                | Self::GreaterThan
                | Self::GreaterThanOrEquals
        )
    }
}

impl fmt::Display for ExpressionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
