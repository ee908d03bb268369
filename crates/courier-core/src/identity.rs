//! Caller identity supplied by the external authentication layer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// The closed set of roles a user can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Places orders and receives order updates.
    Customer,
    /// Fleet member who claims and delivers ready orders.
    Delivery,
    /// Staff with full control over every order.
    Admin,
}

impl Role {
    /// Returns the wire name of the role.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Delivery => "delivery",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "delivery" => Ok(Self::Delivery),
            "admin" => Ok(Self::Admin),
            other => Err(DomainError::Unauthorized(format!("unknown role '{other}'"))),
        }
    }
}

/// An authenticated caller. The core trusts this unconditionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    /// The caller's user identifier.
    pub user_id: Uuid,
    /// The role the caller acts under.
    pub role: Role,
}

impl Caller {
    /// Creates a caller.
    #[must_use]
    pub fn new(user_id: Uuid, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Builds a caller from the raw identity values forwarded by the
    /// authentication layer.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Unauthorized` if either value is missing, the
    /// user id is not a UUID, or the role is not recognized.
    pub fn from_raw(user_id: Option<&str>, role: Option<&str>) -> Result<Self, DomainError> {
        let user_id = user_id
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| DomainError::Unauthorized("missing user identity".to_owned()))?;
        let user_id = Uuid::parse_str(user_id)
            .map_err(|_| DomainError::Unauthorized("malformed user identity".to_owned()))?;
        let role = role
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| DomainError::Unauthorized("missing user role".to_owned()))?
            .parse()?;
        Ok(Self { user_id, role })
    }
}
