use chrono::NaiveDate;

pub use in_memory_reservations_repository::InMemoryReservationsRepository;
pub use postgres_reservations_repository::PostgresReservationsRepository;

use crate::api::{BookId, Reservation, ReservationId, UserId};

mod in_memory_reservations_repository;
mod postgres_reservations_repository;

#[derive(Debug, thiserror::Error)]
pub enum ReservationsRepositoryError {
    #[error("DatabaseFailure failure {0}")]
    DatabaseFailure(#[from] tokio_postgres::Error),

    #[error("Other error {0}")]
    Other(String),
}

/// Storage of reservation records only.
/// Keeping the number of available copies in line is the job of the reservation service
#[async_trait::async_trait]
pub trait ReservationsRepository: Send + Sync {
    async fn add_reservation(
        &self,
        date: NaiveDate,
        book_id: BookId,
        user_id: UserId,
    ) -> Result<Reservation, ReservationsRepositoryError>;

    async fn get_reservation(
        &self,
        reservation_id: ReservationId,
    ) -> Result<Option<Reservation>, ReservationsRepositoryError>;

    async fn list_reservations(&self) -> Result<Vec<Reservation>, ReservationsRepositoryError>;

    /// Overwrites date, book and user of the reservation, returns false if it was not found
    async fn update_reservation(
        &self,
        reservation: &Reservation,
    ) -> Result<bool, ReservationsRepositoryError>;

    /// Removes the reservation, returns false if it was not found
    async fn delete_reservation(
        &self,
        reservation_id: ReservationId,
    ) -> Result<bool, ReservationsRepositoryError>;
}
