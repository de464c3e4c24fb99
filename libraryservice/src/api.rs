use chrono::NaiveDate;
use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

pub type BookId = i32;
pub type UserId = i32;
pub type ReservationId = i32;

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
/// Editable fields of the book, used as a body of create and update requests
pub struct BookDetails {
    pub description: String,
    pub title: String,
    pub author: String,
    pub copies_available: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
/// Book stored in the repository
pub struct Book {
    pub id: BookId,
    pub description: String,
    pub title: String,
    pub author: String,
    /// Number of copies that can still be reserved
    pub copies_available: i32,
}

impl Book {
    pub fn new(id: BookId, details: BookDetails) -> Self {
        Self {
            id,
            description: details.description,
            title: details.title,
            author: details.author,
            copies_available: details.copies_available,
        }
    }

    pub fn into_details(self) -> BookDetails {
        BookDetails {
            description: self.description,
            title: self.title,
            author: self.author,
            copies_available: self.copies_available,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
/// Editable fields of the user, used as a body of create and update requests
pub struct UserDetails {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub telephone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub telephone: String,
}

impl User {
    pub fn new(id: UserId, details: UserDetails) -> Self {
        Self {
            id,
            first_name: details.first_name,
            last_name: details.last_name,
            address: details.address,
            telephone: details.telephone,
        }
    }

    pub fn into_details(self) -> UserDetails {
        UserDetails {
            first_name: self.first_name,
            last_name: self.last_name,
            address: self.address,
            telephone: self.telephone,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
/// Reservation of a single copy of the book by the user.
/// Holds only ids of the book and the user, neither of them is owned by the reservation
pub struct Reservation {
    pub id: ReservationId,
    pub date: NaiveDate,
    pub book_id: BookId,
    pub user_id: UserId,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
/// Query of POST /apiReservation/createReservation
pub struct CreateReservationQuery {
    pub user_id: UserId,
    pub book_id: BookId,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
/// Query of PUT /apiReservation/putReservation/{id}
pub struct UpdateReservationQuery {
    pub date: NaiveDate,
    pub user_id: UserId,
    pub book_id: BookId,
}
