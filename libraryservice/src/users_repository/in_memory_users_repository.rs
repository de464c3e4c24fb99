use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};

use crate::api::{User, UserDetails, UserId};
use crate::users_repository::{UserRepository, UserRepositoryError};

pub struct InMemoryUsersRepository {
    users: parking_lot::RwLock<HashMap<UserId, User>>,
    user_sequence_generator: AtomicI32,
}

impl Default for InMemoryUsersRepository {
    fn default() -> Self {
        Self {
            users: Default::default(),
            user_sequence_generator: AtomicI32::new(1),
        }
    }
}

#[async_trait::async_trait]
impl UserRepository for InMemoryUsersRepository {
    async fn add_user(&self, details: UserDetails) -> Result<User, UserRepositoryError> {
        let id = self.user_sequence_generator.fetch_add(1, Ordering::Relaxed);
        let user = User::new(id, details);
        self.users.write().insert(id, user.clone());
        Ok(user)
    }

    async fn update_user(
        &self,
        user_id: UserId,
        details: UserDetails,
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut locked_users = self.users.write();
        Ok(locked_users.get_mut(&user_id).map(|user| {
            *user = User::new(user_id, details);
            user.clone()
        }))
    }

    async fn get_user(&self, user_id: UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.users.read().get(&user_id).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, UserRepositoryError> {
        let mut users: Vec<User> = self.users.read().values().cloned().collect();
        users.sort_by_key(|user| user.id);
        Ok(users)
    }

    async fn delete_user(&self, user_id: UserId) -> Result<bool, UserRepositoryError> {
        Ok(self.users.write().remove(&user_id).is_some())
    }
}
