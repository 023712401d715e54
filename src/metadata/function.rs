//! Function metadata.

use std::sync::Arc;

use smol_str::SmolStr;

use super::types::TypeUsageRef;

#[derive(Debug, Clone)]
pub struct FunctionParameter {
    pub name: SmolStr,
    pub type_usage: TypeUsageRef,
}

/// A function declared by the conceptual or store model.
#[derive(Debug)]
pub struct EdmFunction {
    namespace: SmolStr,
    name: SmolStr,
    parameters: Vec<FunctionParameter>,
    return_type: Option<TypeUsageRef>,
}

impl EdmFunction {
    pub fn new(namespace: impl Into<SmolStr>, name: impl Into<SmolStr>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            parameters: Vec::new(),
            return_type: None,
        }
    }

    pub fn with_parameter(mut self, name: impl Into<SmolStr>, type_usage: TypeUsageRef) -> Self {
        self.parameters.push(FunctionParameter {
            name: name.into(),
            type_usage,
        });
        self
    }

    pub fn with_return_type(mut self, return_type: TypeUsageRef) -> Self {
        self.return_type = Some(return_type);
        self
    }

    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_name(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }

    pub fn parameters(&self) -> &[FunctionParameter] {
        &self.parameters
    }

    /// The declared return type. Expressions invoking this function must use
    /// this exact handle as their result type.
    pub fn return_type(&self) -> Option<&TypeUsageRef> {
        self.return_type.as_ref()
    }
}
