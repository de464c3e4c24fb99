use anyhow::{bail, Context};
use chrono::NaiveDate;
use reqwest::StatusCode;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use serde::de::DeserializeOwned;

use crate::api::{
    Book, BookDetails, BookId, Reservation, ReservationId, User, UserDetails, UserId,
};

/// Outcome of POST /apiReservation/createReservation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationOutcome {
    Booked,
    NotAvailable,
    NotFound,
}

pub struct LibraryServiceClient {
    url: String,
    client: ClientWithMiddleware,
}

impl LibraryServiceClient {
    pub fn new(url: &str) -> anyhow::Result<Self> {
        let reqwest_client = reqwest::Client::builder()
            .build()
            .context("Failed to build reqwest client")?;
        let client = ClientBuilder::new(reqwest_client)
            // Insert the tracing middleware
            .with(TracingMiddleware::default())
            .build();

        Ok(Self {
            url: url.to_string(),
            client,
        })
    }

    /// Calls POST /apiBook/createBook
    pub async fn add_book(&self, book_details: &BookDetails) -> anyhow::Result<Book> {
        let response = self
            .client
            .post(format!("{}/apiBook/createBook", self.url))
            .json(book_details)
            .send()
            .await?;

        if response.status() != StatusCode::CREATED {
            let error = response.text().await.unwrap_or_default();
            bail!("Failed to add book {}", error)
        }
        Ok(response.json().await?)
    }

    /// Calls GET /apiBook/getBook/{book_id}
    /// None if book was not in the repository
    pub async fn get_book(&self, book_id: BookId) -> anyhow::Result<Option<Book>> {
        self.get_optional(format!("{}/apiBook/getBook/{}", self.url, book_id))
            .await
    }

    /// Calls GET /apiBook/allBooks
    pub async fn list_books(&self) -> anyhow::Result<Vec<Book>> {
        self.get_list(format!("{}/apiBook/allBooks", self.url))
            .await
    }

    /// Calls PUT /apiBook/putBook/{book_id}
    /// None if book was not in the repository
    pub async fn update_book(
        &self,
        book_id: BookId,
        book_details: &BookDetails,
    ) -> anyhow::Result<Option<Book>> {
        let response = self
            .client
            .put(format!("{}/apiBook/putBook/{}", self.url, book_id))
            .json(book_details)
            .send()
            .await?;
        Self::optional_json(response).await
    }

    /// Calls DELETE /apiBook/deleteBook/{book_id}
    /// Returns false if book was not in the repository
    pub async fn delete_book(&self, book_id: BookId) -> anyhow::Result<bool> {
        let response = self
            .client
            .delete(format!("{}/apiBook/deleteBook/{}", self.url, book_id))
            .send()
            .await?;
        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => bail!("Failed to delete book, status {}", status),
        }
    }

    /// Calls GET /apiBook/getCopies/{book_id}
    /// Returns 0 for missing books as the endpoint does not tell them apart
    pub async fn get_copies(&self, book_id: BookId) -> anyhow::Result<i32> {
        let response = self
            .client
            .get(format!("{}/apiBook/getCopies/{}", self.url, book_id))
            .send()
            .await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(0),
            StatusCode::OK => response
                .text()
                .await?
                .strip_prefix("Copies available: ")
                .context("Invalid copies response")?
                .parse()
                .context("Failed to parse number of copies"),
            status => bail!("Failed to get copies, status {}", status),
        }
    }

    /// Calls POST /apiUser/createUser
    pub async fn add_user(&self, user_details: &UserDetails) -> anyhow::Result<User> {
        let response = self
            .client
            .post(format!("{}/apiUser/createUser", self.url))
            .json(user_details)
            .send()
            .await?;

        if response.status() != StatusCode::CREATED {
            let error = response.text().await.unwrap_or_default();
            bail!("Failed to add user {}", error)
        }
        Ok(response.json().await?)
    }

    /// Calls GET /apiUser/getUser/{user_id}
    pub async fn get_user(&self, user_id: UserId) -> anyhow::Result<Option<User>> {
        self.get_optional(format!("{}/apiUser/getUser/{}", self.url, user_id))
            .await
    }

    /// Calls GET /apiUser/allUsers
    pub async fn list_users(&self) -> anyhow::Result<Vec<User>> {
        self.get_list(format!("{}/apiUser/allUsers", self.url))
            .await
    }

    /// Calls PUT /apiUser/putUser/{user_id}
    pub async fn update_user(
        &self,
        user_id: UserId,
        user_details: &UserDetails,
    ) -> anyhow::Result<Option<User>> {
        let response = self
            .client
            .put(format!("{}/apiUser/putUser/{}", self.url, user_id))
            .json(user_details)
            .send()
            .await?;
        Self::optional_json(response).await
    }

    /// Calls DELETE /apiUser/deleteUser/{user_id}
    pub async fn delete_user(&self, user_id: UserId) -> anyhow::Result<bool> {
        let response = self
            .client
            .delete(format!("{}/apiUser/deleteUser/{}", self.url, user_id))
            .send()
            .await?;
        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => bail!("Failed to delete user, status {}", status),
        }
    }

    /// Calls POST /apiReservation/createReservation?userId=&bookId=
    pub async fn create_reservation(
        &self,
        user_id: UserId,
        book_id: BookId,
    ) -> anyhow::Result<ReservationOutcome> {
        let response = self
            .client
            .post(format!(
                "{}/apiReservation/createReservation?userId={}&bookId={}",
                self.url, user_id, book_id
            ))
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(ReservationOutcome::Booked),
            StatusCode::BAD_REQUEST => Ok(ReservationOutcome::NotAvailable),
            StatusCode::NOT_FOUND => Ok(ReservationOutcome::NotFound),
            _ => {
                let error = response.text().await.unwrap_or_default();
                bail!("Failed to create reservation {}", error)
            }
        }
    }

    /// Calls GET /apiReservation/getReservation/{reservation_id}
    pub async fn get_reservation(
        &self,
        reservation_id: ReservationId,
    ) -> anyhow::Result<Option<Reservation>> {
        self.get_optional(format!(
            "{}/apiReservation/getReservation/{}",
            self.url, reservation_id
        ))
        .await
    }

    /// Calls GET /apiReservation/allReservations
    pub async fn list_reservations(&self) -> anyhow::Result<Vec<Reservation>> {
        self.get_list(format!("{}/apiReservation/allReservations", self.url))
            .await
    }

    /// Calls PUT /apiReservation/putReservation/{reservation_id}?date=&userId=&bookId=
    /// Fails when any of the records is missing or the new book has no copies left
    pub async fn update_reservation(
        &self,
        reservation_id: ReservationId,
        date: NaiveDate,
        user_id: UserId,
        book_id: BookId,
    ) -> anyhow::Result<Reservation> {
        let response = self
            .client
            .put(format!(
                "{}/apiReservation/putReservation/{}?date={}&userId={}&bookId={}",
                self.url,
                reservation_id,
                date.format("%Y-%m-%d"),
                user_id,
                book_id
            ))
            .send()
            .await?;

        if !response.status().is_success() {
            let error = response.text().await.unwrap_or_default();
            bail!("Failed to update reservation {}", error)
        }
        Ok(response.json().await?)
    }

    /// Calls DELETE /apiReservation/deleteReservation/{reservation_id}
    /// Returns false if reservation did not exist
    pub async fn delete_reservation(&self, reservation_id: ReservationId) -> anyhow::Result<bool> {
        let response = self
            .client
            .delete(format!(
                "{}/apiReservation/deleteReservation/{}",
                self.url, reservation_id
            ))
            .send()
            .await?;
        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NO_CONTENT => Ok(false),
            status => bail!("Failed to delete reservation, status {}", status),
        }
    }

    async fn get_optional<T: DeserializeOwned>(&self, url: String) -> anyhow::Result<Option<T>> {
        let response = self.client.get(url).send().await?;
        Self::optional_json(response).await
    }

    async fn optional_json<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> anyhow::Result<Option<T>> {
        if response.status() == StatusCode::NOT_FOUND {
            Ok(None)
        } else if response.status().is_success() {
            Ok(Some(response.json().await?))
        } else {
            let error = response.text().await.unwrap_or_default();
            bail!("Request failed {}", error)
        }
    }

    /// Lists answer 204 when empty
    async fn get_list<T: DeserializeOwned>(&self, url: String) -> anyhow::Result<Vec<T>> {
        let response = self.client.get(url).send().await?;
        match response.status() {
            StatusCode::NO_CONTENT => Ok(vec![]),
            status if status.is_success() => Ok(response.json().await?),
            _ => {
                let error = response.text().await.unwrap_or_default();
                bail!("Failed to list {}", error)
            }
        }
    }
}
