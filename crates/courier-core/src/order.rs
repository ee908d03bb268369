//! Order records shared by the lifecycle, notification and storage layers.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Created, awaiting staff action.
    Pending,
    /// Acknowledged by an administrator.
    Confirmed,
    /// Being prepared.
    Preparing,
    /// Ready and available for a delivery agent to claim.
    Ready,
    /// Claimed and out for delivery.
    Delivering,
    /// Handed to the customer. Terminal.
    Delivered,
    /// Cancelled. Terminal.
    Cancelled,
}

impl OrderStatus {
    /// Every status, in forward order with `Cancelled` last.
    pub const ALL: [Self; 7] = [
        Self::Pending,
        Self::Confirmed,
        Self::Preparing,
        Self::Ready,
        Self::Delivering,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Returns the wire name of the status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Delivering => "delivering",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether no further transition is defined from this status.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Position along the forward path. `Cancelled` sits outside it.
    #[must_use]
    pub fn rank(self) -> Option<u8> {
        match self {
            Self::Pending => Some(0),
            Self::Confirmed => Some(1),
            Self::Preparing => Some(2),
            Self::Ready => Some(3),
            Self::Delivering => Some(4),
            Self::Delivered => Some(5),
            Self::Cancelled => None,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::Validation(format!("unknown order status '{s}'")))
    }
}

/// A line item whose unit price was captured when the order was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Item identifier.
    pub id: Uuid,
    /// Owning order.
    pub order_id: Uuid,
    /// Catalog product this line refers to.
    pub product_id: Uuid,
    /// Units ordered (always positive).
    pub quantity: i32,
    /// Catalog price at creation time. Never re-read from the catalog.
    pub unit_price: Decimal,
}

impl OrderItem {
    /// `unit_price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// An order together with its items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Order identifier.
    pub id: Uuid,
    /// Owning customer.
    pub customer_id: Uuid,
    /// Delivery agent who claimed the order, if any.
    pub delivery_agent_id: Option<Uuid>,
    /// Current status.
    pub status: OrderStatus,
    /// Sum of all line totals, computed at creation.
    pub total: Decimal,
    /// Items belonging to the order.
    pub items: Vec<OrderItem>,
    /// Optimistic concurrency counter, bumped on every persisted transition.
    pub version: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Short human-facing reference used in notification messages.
    #[must_use]
    pub fn reference(&self) -> String {
        let simple = self.id.simple().to_string();
        format!("#{}", simple[..8].to_uppercase())
    }

    /// Sum of the line totals of the items currently attached.
    #[must_use]
    pub fn items_total(&self) -> Decimal {
        self.items.iter().map(OrderItem::line_total).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parses_every_wire_name() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_status_parse_rejects_unknown_value() {
        match "shipped".parse::<OrderStatus>() {
            Err(DomainError::Validation(msg)) => assert!(msg.contains("shipped")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_terminal_statuses() {
        let terminal: Vec<_> = OrderStatus::ALL
            .into_iter()
            .filter(|s| s.is_terminal())
            .collect();
        assert_eq!(terminal, vec![OrderStatus::Delivered, OrderStatus::Cancelled]);
    }

    #[test]
    fn test_status_serializes_as_wire_name() {
        let json = serde_json::to_string(&OrderStatus::Delivering).unwrap();
        assert_eq!(json, "\"delivering\"");
    }

    #[test]
    fn test_reference_uses_first_eight_hex_digits() {
        let id = Uuid::parse_str("0192f0aa-bb12-7c00-8000-000000000001").unwrap();
        let order = Order {
            id,
            customer_id: Uuid::new_v4(),
            delivery_agent_id: None,
            status: OrderStatus::Pending,
            total: Decimal::ZERO,
            items: Vec::new(),
            version: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(order.reference(), "#0192F0AA");
    }

    #[test]
    fn test_line_total_multiplies_price_by_quantity() {
        let item = OrderItem {
            id: Uuid::new_v4(),
            order_id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            quantity: 3,
            unit_price: Decimal::new(850, 2),
        };
        assert_eq!(item.line_total(), Decimal::new(2550, 2));
    }
}
