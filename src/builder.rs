//! Expression factory that derives result types.
//!
//! Node constructors take an explicit result type and only check it. The
//! [`ExpressionBuilder`] computes the result type from the operands and the
//! metadata, performs the operand checks that need more context than a single
//! node (argument types against function parameters, element types against a
//! structural type's members), and then funnels into the node constructor.
//!
//! # Examples
//!
//! ```
//! use command_tree::builder::ExpressionBuilder;
//! use command_tree::expressions::ExpressionKind;
//!
//! let builder = ExpressionBuilder::new();
//! let five = builder.constant(5).unwrap();
//! let six = builder.constant(6i64).unwrap();
//! let check = builder.less_than(five, six).unwrap();
//!
//! assert_eq!(check.kind(), ExpressionKind::LessThan);
//! assert_eq!(check.result_type().to_string(), "Edm.Boolean");
//! ```

use std::sync::Arc;

use smol_str::SmolStr;
use tracing::{debug, trace};

use crate::error::{ConstructionError, Result};
use crate::expressions::{
    AndExpression, ComparisonExpression, ComparisonOperator, ConstantExpression, ConstantValue,
    DerefExpression, Expression, ExpressionBinding, FilterExpression, FunctionExpression,
    IsNullExpression, Lambda, LambdaExpression, NewInstanceExpression, NotExpression,
    NullExpression, OrExpression, ParameterReferenceExpression, ProjectExpression,
    PropertyExpression, RefExpression, RelatedEntityRef, RelationshipNavigationExpression,
    ScanExpression, VariableReferenceExpression,
};
use crate::metadata::{
    EdmFunction, EdmMember, EdmProperty, EdmType, EdmTypeSemantics, EntitySet, EntitySetBase,
    EntityType, NavigationProperty, RelationshipEndMember, RowType, TypeOracle, TypeUsage,
    TypeUsageRef,
};

/// Builds expressions bottom-up against a [`TypeOracle`].
#[derive(Debug, Clone, Default)]
pub struct ExpressionBuilder<O: TypeOracle = EdmTypeSemantics> {
    oracle: O,
}

impl ExpressionBuilder<EdmTypeSemantics> {
    /// Creates a builder over the default type semantics.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<O: TypeOracle> ExpressionBuilder<O> {
    pub fn with_oracle(oracle: O) -> Self {
        Self { oracle }
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    fn semantics(&self) -> &dyn TypeOracle {
        &self.oracle
    }

    fn finish<N: Into<Expression>>(&self, operation: &'static str, built: Result<N>) -> Result<Expression> {
        match built {
            Ok(node) => {
                let expression = node.into();
                trace!(
                    operation,
                    kind = %expression.kind(),
                    result_type = %expression.result_type(),
                    "expression built"
                );
                Ok(expression)
            }
            Err(error) => Err(Self::rejected(operation, error)),
        }
    }

    fn checked<T>(&self, operation: &'static str, built: Result<T>) -> Result<T> {
        built.map_err(|error| Self::rejected(operation, error))
    }

    fn rejected(operation: &'static str, error: ConstructionError) -> ConstructionError {
        debug!(operation, argument = ?error.argument(), %error, "construction rejected");
        error
    }

    fn require_assignable(
        &self,
        argument: &'static str,
        value: &Expression,
        expected: &TypeUsage,
    ) -> Result<()> {
        if self.oracle.is_equal_or_promotable(value.result_type(), expected) {
            Ok(())
        } else {
            Err(ConstructionError::ValueTypeMismatch {
                argument,
                expected: expected.to_string(),
                found: value.result_type().to_string(),
            })
        }
    }

    fn require_count(argument: &'static str, expected: usize, found: usize) -> Result<()> {
        if expected == found {
            Ok(())
        } else {
            Err(ConstructionError::ArgumentCountMismatch {
                argument,
                expected,
                found,
            })
        }
    }

    // ========================================================================
    // Leaves
    // ========================================================================

    /// A constant whose type is the primitive type of `value`.
    pub fn constant(&self, value: impl Into<ConstantValue>) -> Result<Expression> {
        let value = value.into();
        let result_type = TypeUsage::primitive(value.kind());
        self.finish(
            "constant",
            ConstantExpression::new(self.semantics(), result_type, value),
        )
    }

    /// A constant of an explicit scalar or enum type.
    pub fn constant_of(
        &self,
        result_type: TypeUsageRef,
        value: impl Into<ConstantValue>,
    ) -> Result<Expression> {
        self.finish(
            "constant_of",
            ConstantExpression::new(self.semantics(), result_type, value),
        )
    }

    pub fn null(&self, result_type: TypeUsageRef) -> Result<Expression> {
        self.finish("null", Ok(NullExpression::new(result_type)))
    }

    pub fn variable(&self, name: impl Into<SmolStr>, result_type: TypeUsageRef) -> Result<Expression> {
        self.finish(
            "variable",
            VariableReferenceExpression::new(result_type, name),
        )
    }

    pub fn parameter(&self, name: impl Into<SmolStr>, result_type: TypeUsageRef) -> Result<Expression> {
        self.finish(
            "parameter",
            ParameterReferenceExpression::new(result_type, name),
        )
    }

    // ========================================================================
    // Member access and navigation
    // ========================================================================

    /// Reads the member `name` off `instance`.
    ///
    /// Structural properties are looked up on the instance type and its base
    /// types; on a relationship-typed instance the name selects an end.
    pub fn property(&self, instance: Expression, name: &str) -> Result<Expression> {
        let member = match instance.result_type().edm_type() {
            EdmType::Relationship(relationship) => {
                relationship.end(name).cloned().map(EdmMember::RelationshipEnd)
            }
            other => other.structural_property(name).map(EdmMember::Property),
        };
        let Some(member) = member else {
            return Err(Self::rejected(
                "property",
                ConstructionError::UnknownMember {
                    type_name: instance.result_type().to_string(),
                    member: SmolStr::new(name),
                },
            ));
        };
        let Some(result_type) = member.type_usage().cloned() else {
            return Err(Self::rejected(
                "property",
                ConstructionError::InvalidMemberKind {
                    argument: "property",
                    member: SmolStr::new(name),
                },
            ));
        };
        self.finish("property", PropertyExpression::new(result_type, member, instance))
    }

    /// Reads a navigation property off an entity instance whose type is the
    /// property's source end type or derives from it.
    pub fn navigation_property(
        &self,
        instance: Expression,
        navigation: &Arc<NavigationProperty>,
    ) -> Result<Expression> {
        let source = EdmType::Entity(Arc::clone(navigation.from_end().entity_type()));
        let found = instance.result_type().edm_type();
        if !self.oracle.edm_equals(found, &source) && !self.oracle.is_subtype_of(found, &source) {
            return Err(Self::rejected(
                "navigation_property",
                ConstructionError::ValueTypeMismatch {
                    argument: "instance",
                    expected: source.to_string(),
                    found: found.to_string(),
                },
            ));
        }
        let result_type = Arc::clone(navigation.type_usage());
        self.finish(
            "navigation_property",
            PropertyExpression::new(
                result_type,
                EdmMember::NavigationProperty(Arc::clone(navigation)),
                instance,
            ),
        )
    }

    /// Navigates from a reference at `from_end` to the entities at `to_end`.
    ///
    /// The result is a reference when the target end is at most one,
    /// otherwise a collection of references.
    pub fn navigate(
        &self,
        source: Expression,
        from_end: &Arc<RelationshipEndMember>,
        to_end: &Arc<RelationshipEndMember>,
    ) -> Result<Expression> {
        let Some(relationship) = from_end.declaring_type() else {
            return Err(Self::rejected(
                "navigate",
                ConstructionError::EndNotInRelationship {
                    argument: "from_end",
                    end: SmolStr::new(from_end.name()),
                    relationship: from_end.declaring_name(),
                },
            ));
        };

        let expected = EdmType::Ref(Arc::clone(from_end.entity_type()));
        let found = source.result_type().edm_type();
        if !self.oracle.edm_equals(found, &expected) && !self.oracle.is_subtype_of(found, &expected) {
            return Err(Self::rejected(
                "navigate",
                ConstructionError::ValueTypeMismatch {
                    argument: "source",
                    expected: expected.to_string(),
                    found: found.to_string(),
                },
            ));
        }

        let target = Arc::clone(to_end.type_usage());
        let result_type = if to_end.multiplicity().is_at_most_one() {
            target
        } else {
            TypeUsage::collection(target)
        };
        self.finish(
            "navigate",
            RelationshipNavigationExpression::new(
                result_type,
                relationship,
                Arc::clone(from_end),
                Arc::clone(to_end),
                source,
            ),
        )
    }

    // ========================================================================
    // Functions and lambdas
    // ========================================================================

    /// Invokes `function`, checking arity and each argument against the
    /// declared parameter type.
    pub fn function(&self, function: &Arc<EdmFunction>, arguments: Vec<Expression>) -> Result<Expression> {
        let Some(result_type) = function.return_type().cloned() else {
            return Err(Self::rejected(
                "function",
                ConstructionError::UnexpectedType {
                    argument: "function",
                    expected: "a function with a declared return type",
                    found: function.full_name(),
                },
            ));
        };
        let checked = Self::require_count("arguments", function.parameters().len(), arguments.len())
            .and_then(|()| {
                function
                    .parameters()
                    .iter()
                    .zip(&arguments)
                    .try_for_each(|(parameter, argument)| {
                        self.require_assignable("arguments", argument, &parameter.type_usage)
                    })
            });
        self.checked("function", checked)?;
        self.finish(
            "function",
            FunctionExpression::new(result_type, Arc::clone(function), arguments),
        )
    }

    /// Declares a lambda over named, typed variables.
    pub fn lambda<N: Into<SmolStr>>(
        &self,
        variables: impl IntoIterator<Item = (N, TypeUsageRef)>,
        body: Expression,
    ) -> Result<Lambda> {
        let variables = variables
            .into_iter()
            .map(|(name, ty)| VariableReferenceExpression::new(ty, name))
            .collect::<Result<Vec<_>>>();
        let lambda = variables.and_then(|variables| Lambda::new(variables, body));
        self.checked("lambda", lambda)
    }

    /// Applies `lambda` to `arguments`, each assignable to its variable.
    pub fn invoke(&self, lambda: Lambda, arguments: Vec<Expression>) -> Result<Expression> {
        let checked = Self::require_count("arguments", lambda.variables().len(), arguments.len())
            .and_then(|()| {
                lambda
                    .variables()
                    .iter()
                    .zip(&arguments)
                    .try_for_each(|(variable, argument)| {
                        self.require_assignable("arguments", argument, variable.result_type())
                    })
            });
        self.checked("invoke", checked)?;
        let result_type = Arc::clone(lambda.body().result_type());
        self.finish("invoke", LambdaExpression::new(result_type, lambda, arguments))
    }

    // ========================================================================
    // Construction
    // ========================================================================

    /// Builds a row whose columns are named by the pairs' first elements.
    pub fn new_row<N: Into<SmolStr>>(
        &self,
        columns: impl IntoIterator<Item = (N, Expression)>,
    ) -> Result<Expression> {
        let (names, elements): (Vec<SmolStr>, Vec<Expression>) = columns
            .into_iter()
            .map(|(name, value)| (name.into(), value))
            .unzip();
        let row = RowType::new(
            names
                .into_iter()
                .zip(elements.iter().map(|e| Arc::clone(e.result_type()))),
        );
        self.finish(
            "new_row",
            NewInstanceExpression::new(self.semantics(), TypeUsage::row(row), elements),
        )
    }

    /// Builds an instance of a structural or collection type.
    ///
    /// Structural types take one element per property, in declaration order
    /// (inherited properties first); collections take any number of elements
    /// assignable to the element type.
    pub fn new_instance(&self, result_type: TypeUsageRef, elements: Vec<Expression>) -> Result<Expression> {
        let checked = self.check_elements(&result_type, &elements);
        self.checked("new_instance", checked)?;
        self.finish(
            "new_instance",
            NewInstanceExpression::new(self.semantics(), result_type, elements),
        )
    }

    /// Builds a non-empty collection typed by its first element.
    pub fn new_collection(&self, elements: Vec<Expression>) -> Result<Expression> {
        let Some(first) = elements.first() else {
            return Err(Self::rejected(
                "new_collection",
                ConstructionError::EmptyArgument {
                    argument: "elements",
                },
            ));
        };
        let result_type = TypeUsage::collection(Arc::clone(first.result_type()));
        self.new_instance(result_type, elements)
    }

    pub fn new_empty_collection(&self, element_type: TypeUsageRef) -> Result<Expression> {
        self.finish(
            "new_empty_collection",
            NewInstanceExpression::new(
                self.semantics(),
                TypeUsage::collection(element_type),
                Vec::new(),
            ),
        )
    }

    /// Builds an entity and declares its to-one relationships inline.
    pub fn new_entity_with_relationships(
        &self,
        entity_type: &Arc<EntityType>,
        elements: Vec<Expression>,
        related_entity_refs: Vec<RelatedEntityRef>,
    ) -> Result<Expression> {
        let result_type = TypeUsage::entity(entity_type);
        let checked = self.check_elements(&result_type, &elements);
        self.checked("new_entity_with_relationships", checked)?;
        self.finish(
            "new_entity_with_relationships",
            NewInstanceExpression::with_related_entity_refs(
                self.semantics(),
                result_type,
                elements,
                related_entity_refs,
            ),
        )
    }

    pub fn related_entity_ref(
        &self,
        source_end: &Arc<RelationshipEndMember>,
        target_end: &Arc<RelationshipEndMember>,
        target_entity_reference: Expression,
    ) -> Result<RelatedEntityRef> {
        self.checked(
            "related_entity_ref",
            RelatedEntityRef::new(
                self.semantics(),
                Arc::clone(source_end),
                Arc::clone(target_end),
                target_entity_reference,
            ),
        )
    }

    fn check_elements(&self, result_type: &TypeUsage, elements: &[Expression]) -> Result<()> {
        let properties: Vec<Arc<EdmProperty>> = match result_type.edm_type() {
            EdmType::Entity(entity) => entity.properties(),
            EdmType::Complex(complex) => complex.properties().to_vec(),
            EdmType::Row(row) => row.properties().to_vec(),
            EdmType::Collection(element_type) => {
                return elements
                    .iter()
                    .try_for_each(|e| self.require_assignable("elements", e, element_type));
            }
            _ => {
                return Err(ConstructionError::UnexpectedType {
                    argument: "result_type",
                    expected: "a structural or collection type",
                    found: result_type.to_string(),
                });
            }
        };
        Self::require_count("elements", properties.len(), elements.len())?;
        properties
            .iter()
            .zip(elements)
            .try_for_each(|(property, element)| {
                self.require_assignable("elements", element, property.type_usage())
            })
    }

    // ========================================================================
    // Sets and references
    // ========================================================================

    pub fn scan(&self, target: impl Into<EntitySetBase>) -> Result<Expression> {
        let target = target.into();
        let result_type = target.scan_type();
        self.finish(
            "scan",
            ScanExpression::new(self.semantics(), result_type, target),
        )
    }

    /// Builds a reference into `entity_set` from key values given in key
    /// member order.
    pub fn ref_(&self, entity_set: &Arc<EntitySet>, keys: Vec<Expression>) -> Result<Expression> {
        let entity_type = entity_set.element_type();
        let key_members = entity_type.key_members();
        self.checked(
            "ref",
            Self::require_count("keys", key_members.len(), keys.len()),
        )?;

        let mut columns = Vec::with_capacity(keys.len());
        for (name, key) in key_members.iter().zip(keys) {
            let Some(property) = entity_type.property(name) else {
                return Err(Self::rejected(
                    "ref",
                    ConstructionError::UnknownMember {
                        type_name: entity_type.full_name(),
                        member: name.clone(),
                    },
                ));
            };
            self.checked(
                "ref",
                self.require_assignable("keys", &key, property.type_usage()),
            )?;
            columns.push((name.clone(), key));
        }

        let key_row = self.new_row(columns)?;
        self.finish(
            "ref",
            RefExpression::new(
                self.semantics(),
                TypeUsage::reference(entity_type),
                Arc::clone(entity_set),
                key_row,
            ),
        )
    }

    /// Dereferences a reference-typed expression to its entity.
    pub fn deref(&self, reference: Expression) -> Result<Expression> {
        let Some(entity_type) = self.oracle.ref_element_type(reference.result_type()) else {
            return Err(Self::rejected(
                "deref",
                ConstructionError::UnexpectedType {
                    argument: "reference",
                    expected: "a reference type",
                    found: reference.result_type().to_string(),
                },
            ));
        };
        self.finish(
            "deref",
            DerefExpression::new(self.semantics(), TypeUsage::entity(&entity_type), reference),
        )
    }

    // ========================================================================
    // Predicates
    // ========================================================================

    pub fn compare(
        &self,
        operator: ComparisonOperator,
        left: Expression,
        right: Expression,
    ) -> Result<Expression> {
        self.finish(
            "compare",
            ComparisonExpression::new(self.semantics(), operator, left, right),
        )
    }

    pub fn equal(&self, left: Expression, right: Expression) -> Result<Expression> {
        self.compare(ComparisonOperator::Equals, left, right)
    }

    pub fn not_equal(&self, left: Expression, right: Expression) -> Result<Expression> {
        self.compare(ComparisonOperator::NotEquals, left, right)
    }

    pub fn less_than(&self, left: Expression, right: Expression) -> Result<Expression> {
        self.compare(ComparisonOperator::LessThan, left, right)
    }

    pub fn less_than_or_equal(&self, left: Expression, right: Expression) -> Result<Expression> {
        self.compare(ComparisonOperator::LessThanOrEquals, left, right)
    }

    pub fn greater_than(&self, left: Expression, right: Expression) -> Result<Expression> {
        self.compare(ComparisonOperator::GreaterThan, left, right)
    }

    pub fn greater_than_or_equal(&self, left: Expression, right: Expression) -> Result<Expression> {
        self.compare(ComparisonOperator::GreaterThanOrEquals, left, right)
    }

    pub fn and(&self, left: Expression, right: Expression) -> Result<Expression> {
        self.finish("and", AndExpression::new(self.semantics(), left, right))
    }

    pub fn or(&self, left: Expression, right: Expression) -> Result<Expression> {
        self.finish("or", OrExpression::new(self.semantics(), left, right))
    }

    pub fn not(&self, argument: Expression) -> Result<Expression> {
        self.finish("not", NotExpression::new(self.semantics(), argument))
    }

    pub fn is_null(&self, argument: Expression) -> Result<Expression> {
        self.finish("is_null", IsNullExpression::new(self.semantics(), argument))
    }

    // ========================================================================
    // Relational
    // ========================================================================

    /// Binds the elements of a collection-typed expression to `variable_name`.
    pub fn bind(&self, expression: Expression, variable_name: impl Into<SmolStr>) -> Result<ExpressionBinding> {
        self.checked(
            "bind",
            ExpressionBinding::new(self.semantics(), expression, variable_name),
        )
    }

    pub fn filter(&self, input: ExpressionBinding, predicate: Expression) -> Result<Expression> {
        self.finish(
            "filter",
            FilterExpression::new(self.semantics(), input, predicate),
        )
    }

    pub fn project(&self, input: ExpressionBinding, projection: Expression) -> Result<Expression> {
        self.finish("project", Ok(ProjectExpression::new(input, projection)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;
    use crate::expressions::ExpressionKind;
    use crate::metadata::{PrimitiveTypeKind, RelationshipMultiplicity};

    fn product() -> Arc<EntityType> {
        Arc::new(
            EntityType::new("Shop", "Product")
                .with_key("Id", TypeUsage::primitive(PrimitiveTypeKind::Int32))
                .with_property("Name", TypeUsage::primitive(PrimitiveTypeKind::String)),
        )
    }

    #[test]
    fn constant_infers_primitive_type() {
        let builder = ExpressionBuilder::new();
        let expr = builder.constant("widget").expect("valid constant");
        assert_eq!(expr.result_type().to_string(), "Edm.String");
        assert_eq!(expr.kind(), ExpressionKind::Constant);
    }

    #[test]
    fn property_is_looked_up_on_instance_type() {
        let builder = ExpressionBuilder::new();
        let product = product();
        let item = builder
            .variable("p", TypeUsage::entity(&product))
            .expect("valid variable");

        let name = builder.property(item.clone(), "Name").expect("declared property");
        assert_eq!(name.result_type().to_string(), "Edm.String");

        let err = builder.property(item, "Price").expect_err("undeclared property");
        assert!(matches!(err, ConstructionError::UnknownMember { .. }));
    }

    #[test]
    fn function_checks_argument_types_and_count() {
        let builder = ExpressionBuilder::new();
        let long = TypeUsage::primitive(PrimitiveTypeKind::Int64);
        let abs = EdmFunction::new("Edm", "Abs")
            .with_parameter("value", Arc::clone(&long))
            .with_return_type(long)
            .into_shared();

        let promoted = builder
            .function(&abs, vec![builder.constant(3).expect("constant")])
            .expect("Int32 promotes to Int64");
        assert!(Arc::ptr_eq(
            promoted.result_type(),
            abs.return_type().expect("declared")
        ));

        let err = builder
            .function(&abs, vec![builder.constant("x").expect("constant")])
            .expect_err("String does not promote to Int64");
        assert_eq!(err.argument(), Some("arguments"));

        let err = builder.function(&abs, Vec::new()).expect_err("missing argument");
        assert_eq!(err.category(), ErrorCategory::ShapeMismatch);
    }

    #[test]
    fn invoke_uses_body_type_and_checks_arity() {
        let builder = ExpressionBuilder::new();
        let int = TypeUsage::primitive(PrimitiveTypeKind::Int32);
        let body = builder.variable("x", Arc::clone(&int)).expect("variable");
        let lambda = builder.lambda([("x", int)], body).expect("lambda");

        let applied = builder
            .invoke(lambda.clone(), vec![builder.constant(1).expect("constant")])
            .expect("one argument for one variable");
        assert_eq!(applied.kind(), ExpressionKind::Lambda);

        let err = builder.invoke(lambda, Vec::new()).expect_err("arity mismatch");
        assert!(matches!(
            err,
            ConstructionError::ArgumentCountMismatch {
                expected: 1,
                found: 0,
                ..
            }
        ));
    }

    #[test]
    fn new_instance_checks_structural_elements() {
        let builder = ExpressionBuilder::new();
        let product = product();
        let ty = TypeUsage::entity(&product);

        builder
            .new_instance(
                Arc::clone(&ty),
                vec![
                    builder.constant(1).expect("constant"),
                    builder.constant("Lamp").expect("constant"),
                ],
            )
            .expect("one element per property");

        let err = builder
            .new_instance(ty, vec![builder.constant(1).expect("constant")])
            .expect_err("missing Name");
        assert_eq!(err.argument(), Some("elements"));
    }

    #[test]
    fn navigate_result_follows_target_multiplicity() {
        use crate::metadata::{EndDeclaration, RelationshipType};

        let builder = ExpressionBuilder::new();
        let product = product();
        let category = Arc::new(
            EntityType::new("Shop", "Category")
                .with_key("Id", TypeUsage::primitive(PrimitiveTypeKind::Int32)),
        );
        let relationship = RelationshipType::new(
            "Shop",
            "Category_Products",
            [
                EndDeclaration::new("Category", &category, RelationshipMultiplicity::ZeroOrOne),
                EndDeclaration::new("Products", &product, RelationshipMultiplicity::Many),
            ],
        );
        let category_end = relationship.end("Category").expect("declared");
        let products_end = relationship.end("Products").expect("declared");

        let category_ref = builder
            .variable("c", TypeUsage::reference(&category))
            .expect("variable");
        let products = builder
            .navigate(category_ref, category_end, products_end)
            .expect("valid navigation");
        assert_eq!(products.result_type().to_string(), "Collection(Ref(Shop.Product))");

        let product_ref = builder
            .variable("p", TypeUsage::reference(&product))
            .expect("variable");
        let owner = builder
            .navigate(product_ref, products_end, category_end)
            .expect("valid navigation");
        assert_eq!(owner.result_type().to_string(), "Ref(Shop.Category)");
    }
}
