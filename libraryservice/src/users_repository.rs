pub use in_memory_users_repository::InMemoryUsersRepository;
pub use postgres_users_repository::PostgresUsersRepository;

use crate::api::{User, UserDetails, UserId};

mod in_memory_users_repository;
mod postgres_users_repository;

#[derive(thiserror::Error, Debug)]
pub enum UserRepositoryError {
    #[error("DatabaseFailure failure {0}")]
    DatabaseFailure(#[from] tokio_postgres::Error),

    #[error("Other error {0}")]
    Other(String),
}

#[async_trait::async_trait]
pub trait UserRepository: Send + Sync {
    /// Adds user to repository, returns the stored user with the id assigned to it
    async fn add_user(&self, details: UserDetails) -> Result<User, UserRepositoryError>;
    /// Overwrites all fields of the user, returns None if the user was not found
    async fn update_user(
        &self,
        user_id: UserId,
        details: UserDetails,
    ) -> Result<Option<User>, UserRepositoryError>;
    async fn get_user(&self, user_id: UserId) -> Result<Option<User>, UserRepositoryError>;
    async fn list_users(&self) -> Result<Vec<User>, UserRepositoryError>;
    /// Removes the user, returns false if it was not found
    async fn delete_user(&self, user_id: UserId) -> Result<bool, UserRepositoryError>;
}
