//! References to variables and command-tree parameters.

use smol_str::SmolStr;

use crate::command_tree::is_valid_parameter_name;
use crate::error::{ConstructionError, Result};
use crate::metadata::TypeUsageRef;

/// A reference to a variable that is currently in scope.
#[derive(Debug, Clone)]
pub struct VariableReferenceExpression {
    result_type: TypeUsageRef,
    name: SmolStr,
}

impl VariableReferenceExpression {
    pub fn new(result_type: TypeUsageRef, name: impl Into<SmolStr>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(ConstructionError::EmptyArgument { argument: "name" });
        }
        Ok(Self { result_type, name })
    }

    pub fn result_type(&self) -> &TypeUsageRef {
        &self.result_type
    }

    pub fn variable_name(&self) -> &str {
        &self.name
    }
}

/// A reference to a parameter declared on the enclosing command tree.
#[derive(Debug, Clone)]
pub struct ParameterReferenceExpression {
    result_type: TypeUsageRef,
    name: SmolStr,
}

impl ParameterReferenceExpression {
    /// Fails unless `name` satisfies [`is_valid_parameter_name`].
    pub fn new(result_type: TypeUsageRef, name: impl Into<SmolStr>) -> Result<Self> {
        let name = name.into();
        if !is_valid_parameter_name(&name) {
            return Err(ConstructionError::InvalidParameterName { name });
        }
        Ok(Self { result_type, name })
    }

    pub fn result_type(&self) -> &TypeUsageRef {
        &self.result_type
    }

    pub fn parameter_name(&self) -> &str {
        &self.name
    }
}
