//! Common test utilities
//!
//! Shared fixtures for the integration tests: a small sales model with
//! customers, orders, line items and products, plus helpers for the
//! primitive type usages the tests reach for most.
//!
//! # Model
//! - `Customer` (key `Id`), with subtype `PreferredCustomer`
//! - `Order` (key `Id`) with an `OrderStatus` enum property
//! - `LineItem` (key `Id`) and `Product` (key `Sku`)
//! - `Customer_Orders`: Customer `0..1` to Orders `*`
//! - `Order_LineItems`: Order `1` to LineItems `*`
//! - `LineItem_Product`: LineItems `*` to Product `1`

#![allow(dead_code)]

use std::sync::Arc;

use command_tree::ExpressionBuilder;
use command_tree::expressions::Expression;
use command_tree::metadata::{
    EdmFunction, EndDeclaration, EntitySet, EntityType, EnumType, NavigationProperty,
    PrimitiveTypeKind, RelationshipEndMember, RelationshipMultiplicity, RelationshipSet,
    RelationshipType, TypeUsage, TypeUsageRef,
};

// ============================================================================
// Type helpers
// ============================================================================

pub fn int32() -> TypeUsageRef {
    TypeUsage::primitive(PrimitiveTypeKind::Int32)
}

pub fn int64() -> TypeUsageRef {
    TypeUsage::primitive(PrimitiveTypeKind::Int64)
}

pub fn string() -> TypeUsageRef {
    TypeUsage::primitive(PrimitiveTypeKind::String)
}

pub fn decimal() -> TypeUsageRef {
    TypeUsage::primitive(PrimitiveTypeKind::Decimal)
}

pub fn binary() -> TypeUsageRef {
    TypeUsage::primitive(PrimitiveTypeKind::Binary)
}

// ============================================================================
// Sales model
// ============================================================================

pub struct SalesModel {
    pub order_status: Arc<EnumType>,
    pub customer: Arc<EntityType>,
    pub preferred_customer: Arc<EntityType>,
    pub order: Arc<EntityType>,
    pub line_item: Arc<EntityType>,
    pub product: Arc<EntityType>,
    pub customer_orders: Arc<RelationshipType>,
    pub order_line_items: Arc<RelationshipType>,
    pub line_item_product: Arc<RelationshipType>,
    pub customers: Arc<EntitySet>,
    pub orders: Arc<EntitySet>,
    pub line_items: Arc<EntitySet>,
    pub products: Arc<EntitySet>,
    pub order_line_items_set: Arc<RelationshipSet>,
    pub customer_orders_nav: Arc<NavigationProperty>,
    pub order_customer_nav: Arc<NavigationProperty>,
    pub order_total: Arc<EdmFunction>,
    pub discount: Arc<EdmFunction>,
}

impl SalesModel {
    pub fn new() -> Self {
        let order_status = Arc::new(
            EnumType::new("Sales", "OrderStatus", PrimitiveTypeKind::Int32)
                .expect("Int32 is integral")
                .with_member("Open", 0)
                .with_member("Shipped", 1)
                .with_member("Cancelled", 2),
        );
        let customer = Arc::new(
            EntityType::new("Sales", "Customer")
                .with_key("Id", int32())
                .with_property("Name", string()),
        );
        let preferred_customer = Arc::new(
            EntityType::new("Sales", "PreferredCustomer")
                .with_base_type(Arc::clone(&customer))
                .with_property("Tier", int32()),
        );
        let order = Arc::new(
            EntityType::new("Sales", "Order")
                .with_key("Id", int32())
                .with_property("Status", TypeUsage::enumeration(&order_status))
                .with_property("Total", decimal()),
        );
        let line_item = Arc::new(
            EntityType::new("Sales", "LineItem")
                .with_key("Id", int32())
                .with_property("Quantity", int32()),
        );
        let product = Arc::new(
            EntityType::new("Sales", "Product")
                .with_key("Sku", string())
                .with_property("Price", decimal()),
        );

        let customer_orders = RelationshipType::new(
            "Sales",
            "Customer_Orders",
            [
                EndDeclaration::new("Customer", &customer, RelationshipMultiplicity::ZeroOrOne),
                EndDeclaration::new("Orders", &order, RelationshipMultiplicity::Many),
            ],
        );
        let order_line_items = RelationshipType::new(
            "Sales",
            "Order_LineItems",
            [
                EndDeclaration::new("Order", &order, RelationshipMultiplicity::One),
                EndDeclaration::new("LineItems", &line_item, RelationshipMultiplicity::Many),
            ],
        );
        let line_item_product = RelationshipType::new(
            "Sales",
            "LineItem_Product",
            [
                EndDeclaration::new("LineItems", &line_item, RelationshipMultiplicity::Many),
                EndDeclaration::new("Product", &product, RelationshipMultiplicity::One),
            ],
        );

        let customer_orders_nav = Arc::new(
            NavigationProperty::new("Orders", &customer_orders, "Customer", "Orders")
                .expect("ends are declared"),
        );
        let order_customer_nav = Arc::new(
            NavigationProperty::new("Customer", &customer_orders, "Orders", "Customer")
                .expect("ends are declared"),
        );

        let order_total = EdmFunction::new("Sales", "OrderTotal")
            .with_parameter("orderId", int32())
            .with_return_type(decimal())
            .into_shared();
        let discount = EdmFunction::new("Sales", "Discount")
            .with_parameter("amount", decimal())
            .with_parameter("percent", int32())
            .with_return_type(decimal())
            .into_shared();

        Self {
            customers: EntitySet::new("SalesContainer", "Customers", &customer),
            orders: EntitySet::new("SalesContainer", "Orders", &order),
            line_items: EntitySet::new("SalesContainer", "LineItems", &line_item),
            products: EntitySet::new("SalesContainer", "Products", &product),
            order_line_items_set: RelationshipSet::new(
                "SalesContainer",
                "OrderLineItems",
                &order_line_items,
            ),
            order_status,
            customer,
            preferred_customer,
            order,
            line_item,
            product,
            customer_orders,
            order_line_items,
            line_item_product,
            customer_orders_nav,
            order_customer_nav,
            order_total,
            discount,
        }
    }

    pub fn end(relationship: &RelationshipType, name: &str) -> Arc<RelationshipEndMember> {
        Arc::clone(relationship.end(name).expect("end is declared"))
    }

    /// `Order` end of `Order_LineItems` (multiplicity one).
    pub fn order_end(&self) -> Arc<RelationshipEndMember> {
        Self::end(&self.order_line_items, "Order")
    }

    /// `LineItems` end of `Order_LineItems` (multiplicity many).
    pub fn line_items_end(&self) -> Arc<RelationshipEndMember> {
        Self::end(&self.order_line_items, "LineItems")
    }

    /// `Product` end of `LineItem_Product` (multiplicity one).
    pub fn product_end(&self) -> Arc<RelationshipEndMember> {
        Self::end(&self.line_item_product, "Product")
    }

    /// `Customer` end of `Customer_Orders` (multiplicity zero-or-one).
    pub fn customer_end(&self) -> Arc<RelationshipEndMember> {
        Self::end(&self.customer_orders, "Customer")
    }

    /// `Orders` end of `Customer_Orders` (multiplicity many).
    pub fn orders_end(&self) -> Arc<RelationshipEndMember> {
        Self::end(&self.customer_orders, "Orders")
    }
}

pub fn sales_model() -> SalesModel {
    SalesModel::new()
}

/// Builds `Ref(set, key)` or panics.
pub fn entity_ref(builder: &ExpressionBuilder, set: &Arc<EntitySet>, key: Expression) -> Expression {
    builder.ref_(set, vec![key]).expect("valid entity reference")
}
