//! Cart validation and order construction.

use courier_core::clock::Clock;
use courier_core::error::DomainError;
use courier_core::order::{Order, OrderItem, OrderStatus};
use courier_core::repository::ProductSnapshot;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default upper bound on the quantity of a single cart line.
pub const DEFAULT_MAX_QUANTITY: i32 = 100;

/// One requested line of a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Catalog product.
    pub product_id: Uuid,
    /// Requested units.
    pub quantity: i32,
}

/// Bounds applied to every cart before anything is read or written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLimits {
    /// Largest quantity accepted on one line.
    pub max_quantity: i32,
}

impl Default for CartLimits {
    fn default() -> Self {
        Self {
            max_quantity: DEFAULT_MAX_QUANTITY,
        }
    }
}

/// Rejects empty carts and out-of-range quantities.
///
/// # Errors
///
/// Returns `DomainError::Validation` naming the first offending line.
pub fn validate_cart(lines: &[CartLine], limits: CartLimits) -> Result<(), DomainError> {
    if lines.is_empty() {
        return Err(DomainError::Validation(
            "cart must contain at least one item".to_owned(),
        ));
    }
    for (index, line) in lines.iter().enumerate() {
        if line.quantity < 1 {
            return Err(DomainError::Validation(format!(
                "item {index}: quantity must be positive, got {}",
                line.quantity
            )));
        }
        if line.quantity > limits.max_quantity {
            return Err(DomainError::Validation(format!(
                "item {index}: quantity {} exceeds the maximum of {}",
                line.quantity, limits.max_quantity
            )));
        }
    }
    Ok(())
}

/// Materializes a pending order from cart lines paired with the catalog
/// snapshot read for each. Unit prices are copied, and the total is the
/// running sum of `price × quantity`.
#[must_use]
pub fn build_order(
    customer_id: Uuid,
    priced_lines: &[(CartLine, ProductSnapshot)],
    clock: &dyn Clock,
) -> Order {
    let order_id = Uuid::now_v7();
    let now = clock.now();

    let items = priced_lines
        .iter()
        .map(|(line, product)| OrderItem {
            id: Uuid::now_v7(),
            order_id,
            product_id: product.id,
            quantity: line.quantity,
            unit_price: product.price,
        })
        .collect();

    let mut order = Order {
        id: order_id,
        customer_id,
        delivery_agent_id: None,
        status: OrderStatus::Pending,
        total: Decimal::ZERO,
        items,
        version: 1,
        created_at: now,
        updated_at: now,
    };
    order.total = order.items_total();
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_test_support::FixedClock;

    fn line(quantity: i32) -> CartLine {
        CartLine {
            product_id: Uuid::new_v4(),
            quantity,
        }
    }

    #[test]
    fn test_validate_cart_rejects_empty_cart() {
        let result = validate_cart(&[], CartLimits::default());
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_validate_cart_rejects_non_positive_quantity() {
        for quantity in [0, -3] {
            let result = validate_cart(&[line(1), line(quantity)], CartLimits::default());
            match result {
                Err(DomainError::Validation(msg)) => assert!(msg.starts_with("item 1")),
                other => panic!("expected Validation, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_validate_cart_enforces_quantity_cap() {
        let limits = CartLimits { max_quantity: 100 };
        assert!(validate_cart(&[line(100)], limits).is_ok());
        assert!(matches!(
            validate_cart(&[line(101)], limits),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_build_order_computes_total_from_captured_prices() {
        // Arrange
        let clock = FixedClock::standard();
        let customer_id = Uuid::new_v4();
        let a = ProductSnapshot {
            id: Uuid::new_v4(),
            price: Decimal::new(850, 2),
        };
        let b = ProductSnapshot {
            id: Uuid::new_v4(),
            price: Decimal::new(700, 2),
        };
        let priced = [
            (
                CartLine {
                    product_id: a.id,
                    quantity: 2,
                },
                a,
            ),
            (
                CartLine {
                    product_id: b.id,
                    quantity: 1,
                },
                b,
            ),
        ];

        // Act
        let order = build_order(customer_id, &priced, &clock);

        // Assert
        assert_eq!(order.total, Decimal::new(2400, 2));
        assert_eq!(order.total, order.items_total());
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.customer_id, customer_id);
        assert_eq!(order.delivery_agent_id, None);
        assert_eq!(order.version, 1);
        assert_eq!(order.created_at, clock.0);
        assert_eq!(order.items.len(), 2);
        assert!(order.items.iter().all(|i| i.order_id == order.id));
        assert_eq!(order.items[0].unit_price, Decimal::new(850, 2));
        assert_eq!(order.items[1].quantity, 1);
    }
}
