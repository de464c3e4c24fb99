use chrono::NaiveDate;
use tokio_postgres::{Client, Row, Statement};

use crate::api::{BookId, Reservation, ReservationId, UserId};
use crate::postgres::PostgresConfig;
use crate::reservations_repository::{ReservationsRepository, ReservationsRepositoryError};

// No foreign keys, books and users can be removed while still reserved
const RESERVATIONS_SCHEMA: &str = "
        CREATE TABLE IF NOT EXISTS reservations (
            id                   SERIAL PRIMARY KEY,
            reservation_date     DATE NOT NULL,
            book_id              INTEGER NOT NULL,
            user_id              INTEGER NOT NULL
            )
        ";

pub struct PostgresReservationsRepository {
    client: Client,
}

impl PostgresReservationsRepository {
    pub async fn init(config: PostgresConfig) -> anyhow::Result<Self> {
        let client = crate::postgres::connect(&config, RESERVATIONS_SCHEMA).await?;
        Ok(Self { client })
    }
}

fn reservation_from_row(row: &Row) -> Result<Reservation, ReservationsRepositoryError> {
    Ok(Reservation {
        id: row.try_get("id")?,
        date: row.try_get("reservation_date")?,
        book_id: row.try_get("book_id")?,
        user_id: row.try_get("user_id")?,
    })
}

#[async_trait::async_trait]
impl ReservationsRepository for PostgresReservationsRepository {
    async fn add_reservation(
        &self,
        date: NaiveDate,
        book_id: BookId,
        user_id: UserId,
    ) -> Result<Reservation, ReservationsRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare(
                "INSERT INTO reservations (reservation_date, book_id, user_id) \
                 VALUES ($1, $2, $3) RETURNING id",
            )
            .await?;

        let rows = self
            .client
            .query(&stmt, &[&date, &book_id, &user_id])
            .await?;

        let id: ReservationId = rows
            .first()
            .ok_or_else(|| ReservationsRepositoryError::Other("Id not returned".to_string()))?
            .try_get(0)?;

        Ok(Reservation {
            id,
            date,
            book_id,
            user_id,
        })
    }

    async fn get_reservation(
        &self,
        reservation_id: ReservationId,
    ) -> Result<Option<Reservation>, ReservationsRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare(
                "SELECT id, reservation_date, book_id, user_id FROM reservations WHERE id = $1",
            )
            .await?;

        let rows = self.client.query(&stmt, &[&reservation_id]).await?;
        rows.first().map(reservation_from_row).transpose()
    }

    async fn list_reservations(&self) -> Result<Vec<Reservation>, ReservationsRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare("SELECT id, reservation_date, book_id, user_id FROM reservations ORDER BY id")
            .await?;
        let rows = self.client.query(&stmt, &[]).await?;
        rows.iter().map(reservation_from_row).collect()
    }

    async fn update_reservation(
        &self,
        reservation: &Reservation,
    ) -> Result<bool, ReservationsRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare(
                "UPDATE reservations SET reservation_date = $1, book_id = $2, user_id = $3 \
                 WHERE id = $4",
            )
            .await?;

        let updated = self
            .client
            .execute(
                &stmt,
                &[
                    &reservation.date,
                    &reservation.book_id,
                    &reservation.user_id,
                    &reservation.id,
                ],
            )
            .await?;
        Ok(updated > 0)
    }

    async fn delete_reservation(
        &self,
        reservation_id: ReservationId,
    ) -> Result<bool, ReservationsRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare("DELETE FROM reservations WHERE id = $1")
            .await?;

        Ok(self.client.execute(&stmt, &[&reservation_id]).await? > 0)
    }
}
