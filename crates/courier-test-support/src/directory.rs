//! Test user directory.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use courier_core::error::DomainError;
use courier_core::identity::Role;
use courier_core::repository::UserDirectory;
use uuid::Uuid;

/// A user directory over a fixed set of `(user_id, role)` pairs. Lookups for
/// roles marked unavailable fail with an infrastructure error.
#[derive(Debug, Default)]
pub struct StaticUserDirectory {
    users: Mutex<Vec<(Uuid, Role)>>,
    unavailable: HashSet<Role>,
}

impl StaticUserDirectory {
    /// Creates a directory with the given users.
    #[must_use]
    pub fn new(users: impl IntoIterator<Item = (Uuid, Role)>) -> Self {
        Self {
            users: Mutex::new(users.into_iter().collect()),
            unavailable: HashSet::new(),
        }
    }

    /// Makes lookups for `role` fail.
    #[must_use]
    pub fn with_unavailable_role(mut self, role: Role) -> Self {
        self.unavailable.insert(role);
        self
    }

    /// Registers another user.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn register(&self, user_id: Uuid, role: Role) {
        self.users.lock().unwrap().push((user_id, role));
    }
}

#[async_trait]
impl UserDirectory for StaticUserDirectory {
    async fn users_with_role(&self, role: Role) -> Result<Vec<Uuid>, DomainError> {
        if self.unavailable.contains(&role) {
            return Err(DomainError::Infrastructure(format!(
                "user lookup for role {role} failed"
            )));
        }
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, r)| *r == role)
            .map(|(id, _)| *id)
            .collect())
    }
}
