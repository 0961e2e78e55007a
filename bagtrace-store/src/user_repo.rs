use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use bagtrace_core::models::{User, UserRole};
use bagtrace_core::repository::{RoleCounts, UserRepository};
use bagtrace_core::{TrackingError, TrackingResult};

/// Actor directory. Account management is an external collaborator; the
/// tracking core only needs actors resolvable by id/email and role counts
/// for the dashboard.
#[derive(Default)]
pub struct InMemoryUserRepository {
    inner: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> TrackingResult<std::sync::RwLockReadGuard<'_, HashMap<Uuid, User>>> {
        self.inner
            .read()
            .map_err(|_| TrackingError::StoreUnavailable("user table lock poisoned".into()))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: User) -> TrackingResult<()> {
        let mut table = self
            .inner
            .write()
            .map_err(|_| TrackingError::StoreUnavailable("user table lock poisoned".into()))?;
        if table.values().any(|u| u.email == user.email && u.id != user.id) {
            return Err(TrackingError::Conflict(format!(
                "email {} already registered",
                user.email
            )));
        }
        table.insert(user.id, user);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> TrackingResult<Option<User>> {
        Ok(self.read()?.get(&id).cloned())
    }

    async fn by_email(&self, email: &str) -> TrackingResult<Option<User>> {
        Ok(self.read()?.values().find(|u| u.email == email).cloned())
    }

    async fn count_by_role(&self) -> TrackingResult<RoleCounts> {
        let table = self.read()?;
        let mut counts = RoleCounts::default();
        for user in table.values() {
            match user.role {
                UserRole::User => counts.users += 1,
                UserRole::Admin => counts.admins += 1,
            }
        }
        Ok(counts)
    }
}
