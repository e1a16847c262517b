//! Order lifecycle status.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
///
/// Stored as lowercase text in the `orders.status` column. There is no
/// formal transition guard; admin updates may set any value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Placed but not yet paid (direct pay-on-delivery orders).
    #[default]
    Pending,
    /// Payment confirmed by the gateway.
    Completed,
    /// Dispatched to the customer.
    Shipped,
}

impl OrderStatus {
    /// The status as stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Shipped => "shipped",
        }
    }

    /// Whether the order counts toward realized revenue.
    #[must_use]
    pub const fn is_revenue(&self) -> bool {
        matches!(self, Self::Completed | Self::Shipped)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "shipped" => Ok(Self::Shipped),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}
