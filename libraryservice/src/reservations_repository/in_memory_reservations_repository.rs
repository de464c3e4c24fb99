use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};

use chrono::NaiveDate;

use crate::api::{BookId, Reservation, ReservationId, UserId};
use crate::reservations_repository::{ReservationsRepository, ReservationsRepositoryError};

pub struct InMemoryReservationsRepository {
    reservations: parking_lot::RwLock<HashMap<ReservationId, Reservation>>,
    reservation_sequence_generator: AtomicI32,
}

impl Default for InMemoryReservationsRepository {
    fn default() -> Self {
        Self {
            reservations: Default::default(),
            reservation_sequence_generator: AtomicI32::new(1),
        }
    }
}

#[async_trait::async_trait]
impl ReservationsRepository for InMemoryReservationsRepository {
    async fn add_reservation(
        &self,
        date: NaiveDate,
        book_id: BookId,
        user_id: UserId,
    ) -> Result<Reservation, ReservationsRepositoryError> {
        let id = self
            .reservation_sequence_generator
            .fetch_add(1, Ordering::Relaxed);
        let reservation = Reservation {
            id,
            date,
            book_id,
            user_id,
        };
        self.reservations.write().insert(id, reservation.clone());
        Ok(reservation)
    }

    async fn get_reservation(
        &self,
        reservation_id: ReservationId,
    ) -> Result<Option<Reservation>, ReservationsRepositoryError> {
        Ok(self.reservations.read().get(&reservation_id).cloned())
    }

    async fn list_reservations(&self) -> Result<Vec<Reservation>, ReservationsRepositoryError> {
        let mut reservations: Vec<Reservation> =
            self.reservations.read().values().cloned().collect();
        reservations.sort_by_key(|reservation| reservation.id);
        Ok(reservations)
    }

    async fn update_reservation(
        &self,
        reservation: &Reservation,
    ) -> Result<bool, ReservationsRepositoryError> {
        let mut reservations_lock = self.reservations.write();

        match reservations_lock.entry(reservation.id) {
            Entry::Occupied(mut occupied) => {
                occupied.insert(reservation.clone());
                Ok(true)
            }
            Entry::Vacant(_) => Ok(false),
        }
    }

    async fn delete_reservation(
        &self,
        reservation_id: ReservationId,
    ) -> Result<bool, ReservationsRepositoryError> {
        Ok(self.reservations.write().remove(&reservation_id).is_some())
    }
}
