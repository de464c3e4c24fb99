use std::sync::Arc;

use chrono::NaiveDate;

use crate::api::{BookId, Reservation, ReservationId, UserId};
use crate::books_repository::{BookRepository, BookRepositoryError};
use crate::reservations_repository::{ReservationsRepository, ReservationsRepositoryError};
use crate::users_repository::{UserRepository, UserRepositoryError};

#[derive(Debug, thiserror::Error)]
pub enum ReservationServiceError {
    #[error("Reservation {0} not found")]
    ReservationNotFound(ReservationId),

    #[error("User {0} not found")]
    UserNotFound(UserId),

    #[error("Book {0} not found")]
    BookNotFound(BookId),

    #[error("Book {0} has no copies available")]
    BookNotAvailable(BookId),

    #[error("Books repository failure: {0}")]
    BooksRepository(#[from] BookRepositoryError),

    #[error("Users repository failure: {0}")]
    UsersRepository(#[from] UserRepositoryError),

    #[error("Reservations repository failure: {0}")]
    ReservationsRepository(#[from] ReservationsRepositoryError),
}

/// Creates, moves and cancels reservations keeping number of available copies of books in line.
///
/// Copies are claimed with [`BookRepository::take_copy`], which checks and decrements in one step,
/// so a book can never be reserved more times than it has copies.
/// Writes to the different repositories are not transactional, when the second write fails
/// the first one is compensated on a best-effort basis.
#[derive(Clone)]
pub struct ReservationService {
    books_repository: Arc<dyn BookRepository>,
    users_repository: Arc<dyn UserRepository>,
    reservations_repository: Arc<dyn ReservationsRepository>,
}

impl ReservationService {
    pub fn new(
        books_repository: Arc<dyn BookRepository>,
        users_repository: Arc<dyn UserRepository>,
        reservations_repository: Arc<dyn ReservationsRepository>,
    ) -> Self {
        Self {
            books_repository,
            users_repository,
            reservations_repository,
        }
    }

    /// Reserves a copy of the book for the user, the reservation is dated today
    pub async fn create_reservation(
        &self,
        user_id: UserId,
        book_id: BookId,
    ) -> Result<Reservation, ReservationServiceError> {
        self.ensure_user_exists(user_id).await?;
        self.ensure_book_exists(book_id).await?;

        if !self.books_repository.take_copy(book_id).await? {
            tracing::info!("Book {} has no copies left for user {}", book_id, user_id);
            return Err(ReservationServiceError::BookNotAvailable(book_id));
        }

        let today = chrono::Local::now().date_naive();
        match self
            .reservations_repository
            .add_reservation(today, book_id, user_id)
            .await
        {
            Ok(reservation) => {
                tracing::info!(
                    "Reservation {} created for book {} and user {}",
                    reservation.id,
                    book_id,
                    user_id
                );
                Ok(reservation)
            }
            Err(err) => {
                self.give_back_copy(book_id).await;
                Err(err.into())
            }
        }
    }

    /// Moves the reservation to a new date, user and book.
    /// A copy moves from the previously reserved book to the new one in a single step,
    /// moving within the same book leaves the count untouched
    pub async fn update_reservation(
        &self,
        reservation_id: ReservationId,
        date: NaiveDate,
        user_id: UserId,
        book_id: BookId,
    ) -> Result<Reservation, ReservationServiceError> {
        let mut reservation = self
            .reservations_repository
            .get_reservation(reservation_id)
            .await?
            .ok_or(ReservationServiceError::ReservationNotFound(reservation_id))?;
        self.ensure_user_exists(user_id).await?;
        self.ensure_book_exists(book_id).await?;

        let previous_book_id = reservation.book_id;
        let book_changed = previous_book_id != book_id;

        if book_changed
            && !self
                .books_repository
                .move_copy(previous_book_id, book_id)
                .await?
        {
            tracing::info!(
                "Book {} has no copies left for reservation {}",
                book_id,
                reservation_id
            );
            return Err(ReservationServiceError::BookNotAvailable(book_id));
        }

        reservation.date = date;
        reservation.user_id = user_id;
        reservation.book_id = book_id;

        let update_result = self
            .reservations_repository
            .update_reservation(&reservation)
            .await;
        let error = match update_result {
            Ok(true) => {
                tracing::info!(
                    "Reservation {} moved from book {} to book {}",
                    reservation_id,
                    previous_book_id,
                    book_id
                );
                return Ok(reservation);
            }
            Ok(false) => ReservationServiceError::ReservationNotFound(reservation_id),
            Err(err) => err.into(),
        };
        if book_changed {
            self.move_back_copy(book_id, previous_book_id).await;
        }
        Err(error)
    }

    /// Cancels the reservation and returns its copy to the book
    pub async fn delete_reservation(
        &self,
        reservation_id: ReservationId,
    ) -> Result<(), ReservationServiceError> {
        let reservation = self
            .reservations_repository
            .get_reservation(reservation_id)
            .await?
            .ok_or(ReservationServiceError::ReservationNotFound(reservation_id))?;

        // only the caller that actually removed the record returns the copy
        if !self
            .reservations_repository
            .delete_reservation(reservation_id)
            .await?
        {
            return Err(ReservationServiceError::ReservationNotFound(reservation_id));
        }

        if !self
            .books_repository
            .return_copy(reservation.book_id)
            .await?
        {
            tracing::warn!(
                "Book {} of cancelled reservation {} no longer exists",
                reservation.book_id,
                reservation_id
            );
        }
        tracing::info!("Reservation {} cancelled", reservation_id);
        Ok(())
    }

    async fn ensure_user_exists(&self, user_id: UserId) -> Result<(), ReservationServiceError> {
        match self.users_repository.get_user(user_id).await? {
            Some(_) => Ok(()),
            None => Err(ReservationServiceError::UserNotFound(user_id)),
        }
    }

    async fn ensure_book_exists(&self, book_id: BookId) -> Result<(), ReservationServiceError> {
        match self.books_repository.get_book(book_id).await? {
            Some(_) => Ok(()),
            None => Err(ReservationServiceError::BookNotFound(book_id)),
        }
    }

    async fn give_back_copy(&self, book_id: BookId) {
        if let Err(err) = self.books_repository.return_copy(book_id).await {
            tracing::error!("Failed to return copy of book {}: {}", book_id, err);
        }
    }

    async fn move_back_copy(&self, from: BookId, to: BookId) {
        match self.books_repository.move_copy(from, to).await {
            Ok(true) => {}
            Ok(false) => tracing::warn!("Failed to move copy back from book {} to {}", from, to),
            Err(err) => tracing::error!(
                "Failed to move copy back from book {} to {}: {}",
                from,
                to,
                err
            ),
        }
    }
}
