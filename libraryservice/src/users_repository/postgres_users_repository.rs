use tokio_postgres::{Client, Row, Statement};

use crate::api::{User, UserDetails, UserId};
use crate::postgres::PostgresConfig;
use crate::users_repository::{UserRepository, UserRepositoryError};

const USERS_SCHEMA: &str = "
        CREATE TABLE IF NOT EXISTS users (
            id              SERIAL PRIMARY KEY,
            first_name      TEXT NOT NULL,
            last_name       TEXT NOT NULL,
            address         TEXT NOT NULL,
            telephone       TEXT NOT NULL
            )
        ";

pub struct PostgresUsersRepository {
    client: Client,
}

impl PostgresUsersRepository {
    pub async fn init(config: PostgresConfig) -> anyhow::Result<Self> {
        let client = crate::postgres::connect(&config, USERS_SCHEMA).await?;
        Ok(Self { client })
    }
}

fn user_from_row(row: &Row) -> Result<User, UserRepositoryError> {
    Ok(User {
        id: row.try_get("id")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        address: row.try_get("address")?,
        telephone: row.try_get("telephone")?,
    })
}

#[async_trait::async_trait]
impl UserRepository for PostgresUsersRepository {
    async fn add_user(&self, details: UserDetails) -> Result<User, UserRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare(
                "INSERT INTO users (first_name, last_name, address, telephone) \
                 VALUES ($1, $2, $3, $4) RETURNING id",
            )
            .await?;

        let rows = self
            .client
            .query(
                &stmt,
                &[
                    &details.first_name,
                    &details.last_name,
                    &details.address,
                    &details.telephone,
                ],
            )
            .await?;

        let user_id: UserId = rows
            .first()
            .ok_or_else(|| UserRepositoryError::Other("Id not returned".to_string()))?
            .try_get(0)?;

        Ok(User::new(user_id, details))
    }

    async fn update_user(
        &self,
        user_id: UserId,
        details: UserDetails,
    ) -> Result<Option<User>, UserRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare(
                "UPDATE users SET first_name = $1, last_name = $2, address = $3, telephone = $4 \
                 WHERE id = $5",
            )
            .await?;

        let updated = self
            .client
            .execute(
                &stmt,
                &[
                    &details.first_name,
                    &details.last_name,
                    &details.address,
                    &details.telephone,
                    &user_id,
                ],
            )
            .await?;
        Ok((updated > 0).then(|| User::new(user_id, details)))
    }

    async fn get_user(&self, user_id: UserId) -> Result<Option<User>, UserRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare(
                "SELECT id, first_name, last_name, address, telephone FROM users WHERE id = ($1)",
            )
            .await?;

        let rows = self.client.query(&stmt, &[&user_id]).await?;
        rows.first().map(user_from_row).transpose()
    }

    async fn list_users(&self) -> Result<Vec<User>, UserRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare("SELECT id, first_name, last_name, address, telephone FROM users ORDER BY id")
            .await?;
        let rows = self.client.query(&stmt, &[]).await?;
        rows.iter().map(user_from_row).collect()
    }

    async fn delete_user(&self, user_id: UserId) -> Result<bool, UserRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare("DELETE FROM users WHERE id = ($1)")
            .await?;

        Ok(self.client.execute(&stmt, &[&user_id]).await? > 0)
    }
}
