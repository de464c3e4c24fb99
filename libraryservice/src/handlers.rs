use std::sync::Arc;

use actix_web::http::header::LOCATION;
use actix_web::web::Data;
use actix_web::Error;
use actix_web::HttpResponse;
use paperclip::actix::{
    api_v2_operation,
    web::{self},
};

use crate::api::{
    BookDetails, BookId, CreateReservationQuery, ReservationId, UpdateReservationQuery,
    UserDetails, UserId,
};
use crate::books_repository::BookRepository;
use crate::reservation_service::{ReservationService, ReservationServiceError};
use crate::reservations_repository::ReservationsRepository;
use crate::users_repository::UserRepository;

const BOOK_NOT_FOUND: &str = "Book not found";
const USER_NOT_FOUND: &str = "User not found";
const RESERVATION_NOT_FOUND: &str = "Reservation not found";
const BOOK_NOT_AVAILABLE: &str = "The book is not currently available for pre-order.";
/// Upper bound for copies of a book, leaves room for copies returned by outstanding reservations
pub const MAX_COPIES_AVAILABLE: i32 = 1_000_000;

/// 200 with the list, 204 when there is nothing to list
fn list_response<T: serde::Serialize>(items: Vec<T>) -> HttpResponse {
    if items.is_empty() {
        HttpResponse::NoContent().finish()
    } else {
        HttpResponse::Ok().json(items)
    }
}

fn invalid_copies_response(details: &BookDetails) -> Option<HttpResponse> {
    if details.copies_available < 0 {
        Some(HttpResponse::BadRequest().body("copiesAvailable must not be negative"))
    } else if details.copies_available > MAX_COPIES_AVAILABLE {
        Some(HttpResponse::BadRequest().body(format!(
            "copiesAvailable must not exceed {}",
            MAX_COPIES_AVAILABLE
        )))
    } else {
        None
    }
}

#[api_v2_operation]
pub async fn health() -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().finish())
}

#[api_v2_operation]
pub async fn get_all_books(
    books_repository: Data<Arc<dyn BookRepository>>,
) -> Result<HttpResponse, Error> {
    Ok(match books_repository.list_books().await {
        Ok(books) => list_response(books),
        Err(err) => {
            tracing::error!("Get all books failed {}", err);
            HttpResponse::InternalServerError().finish()
        }
    })
}

#[api_v2_operation]
pub async fn add_book(
    books_repository: Data<Arc<dyn BookRepository>>,
    details: web::Json<BookDetails>,
) -> Result<HttpResponse, Error> {
    if let Some(response) = invalid_copies_response(&details) {
        return Ok(response);
    }
    Ok(
        match books_repository.add_book(details.into_inner()).await {
            Ok(book) => HttpResponse::Created()
                .append_header((LOCATION, format!("/apiBook/getBook/{}", book.id)))
                .json(book),
            Err(err) => {
                tracing::error!("Add book failed {}", err);
                HttpResponse::InternalServerError().finish()
            }
        },
    )
}

#[api_v2_operation]
pub async fn get_book(
    books_repository: Data<Arc<dyn BookRepository>>,
    book_id: web::Path<BookId>,
) -> Result<HttpResponse, Error> {
    Ok(
        match books_repository.get_book(book_id.into_inner()).await {
            Ok(Some(book)) => HttpResponse::Ok().json(book),
            Ok(None) => HttpResponse::NotFound().body(BOOK_NOT_FOUND),
            Err(err) => {
                tracing::error!("Get book failed {}", err);
                HttpResponse::InternalServerError().finish()
            }
        },
    )
}

#[api_v2_operation]
pub async fn update_book(
    books_repository: Data<Arc<dyn BookRepository>>,
    book_id: web::Path<BookId>,
    details: web::Json<BookDetails>,
) -> Result<HttpResponse, Error> {
    if let Some(response) = invalid_copies_response(&details) {
        return Ok(response);
    }
    Ok(
        match books_repository
            .update_book(book_id.into_inner(), details.into_inner())
            .await
        {
            Ok(Some(book)) => HttpResponse::Ok().json(book),
            Ok(None) => HttpResponse::NotFound().body(BOOK_NOT_FOUND),
            Err(err) => {
                tracing::error!("Update book failed {}", err);
                HttpResponse::InternalServerError().finish()
            }
        },
    )
}

#[api_v2_operation]
pub async fn delete_book(
    books_repository: Data<Arc<dyn BookRepository>>,
    book_id: web::Path<BookId>,
) -> Result<HttpResponse, Error> {
    Ok(
        match books_repository.delete_book(book_id.into_inner()).await {
            Ok(true) => HttpResponse::Ok().finish(),
            Ok(false) => HttpResponse::NotFound().finish(),
            Err(err) => {
                tracing::error!("Delete book failed {}", err);
                HttpResponse::InternalServerError().finish()
            }
        },
    )
}

#[api_v2_operation]
/// Missing book and book without copies are both reported as 404
pub async fn get_copies(
    books_repository: Data<Arc<dyn BookRepository>>,
    book_id: web::Path<BookId>,
) -> Result<HttpResponse, Error> {
    let book_id = book_id.into_inner();
    Ok(match books_repository.copies_available(book_id).await {
        Ok(Some(copies)) if copies > 0 => {
            HttpResponse::Ok().body(format!("Copies available: {}", copies))
        }
        Ok(_) => HttpResponse::NotFound()
            .body(format!("Copies not available for book with ID: {}", book_id)),
        Err(err) => {
            tracing::error!("Get copies failed {}", err);
            HttpResponse::InternalServerError().finish()
        }
    })
}

#[api_v2_operation]
pub async fn get_all_users(
    users_repository: Data<Arc<dyn UserRepository>>,
) -> Result<HttpResponse, Error> {
    Ok(match users_repository.list_users().await {
        Ok(users) => list_response(users),
        Err(err) => {
            tracing::error!("Get all users failed {}", err);
            HttpResponse::InternalServerError().finish()
        }
    })
}

#[api_v2_operation]
pub async fn add_user(
    users_repository: Data<Arc<dyn UserRepository>>,
    details: web::Json<UserDetails>,
) -> Result<HttpResponse, Error> {
    Ok(
        match users_repository.add_user(details.into_inner()).await {
            Ok(user) => HttpResponse::Created()
                .append_header((LOCATION, format!("/apiUser/getUser/{}", user.id)))
                .json(user),
            Err(err) => {
                tracing::error!("Add user failed {}", err);
                HttpResponse::InternalServerError().finish()
            }
        },
    )
}

#[api_v2_operation]
pub async fn get_user(
    users_repository: Data<Arc<dyn UserRepository>>,
    user_id: web::Path<UserId>,
) -> Result<HttpResponse, Error> {
    Ok(
        match users_repository.get_user(user_id.into_inner()).await {
            Ok(Some(user)) => HttpResponse::Ok().json(user),
            Ok(None) => HttpResponse::NotFound().body(USER_NOT_FOUND),
            Err(err) => {
                tracing::error!("Get user failed {}", err);
                HttpResponse::InternalServerError().finish()
            }
        },
    )
}

#[api_v2_operation]
pub async fn update_user(
    users_repository: Data<Arc<dyn UserRepository>>,
    user_id: web::Path<UserId>,
    details: web::Json<UserDetails>,
) -> Result<HttpResponse, Error> {
    Ok(
        match users_repository
            .update_user(user_id.into_inner(), details.into_inner())
            .await
        {
            Ok(Some(user)) => HttpResponse::Ok().json(user),
            Ok(None) => HttpResponse::NotFound().body(USER_NOT_FOUND),
            Err(err) => {
                tracing::error!("Update user failed {}", err);
                HttpResponse::InternalServerError().finish()
            }
        },
    )
}

#[api_v2_operation]
pub async fn delete_user(
    users_repository: Data<Arc<dyn UserRepository>>,
    user_id: web::Path<UserId>,
) -> Result<HttpResponse, Error> {
    Ok(
        match users_repository.delete_user(user_id.into_inner()).await {
            Ok(true) => HttpResponse::Ok().finish(),
            Ok(false) => HttpResponse::NotFound().finish(),
            Err(err) => {
                tracing::error!("Delete user failed {}", err);
                HttpResponse::InternalServerError().finish()
            }
        },
    )
}

#[api_v2_operation]
pub async fn get_all_reservations(
    reservations_repository: Data<Arc<dyn ReservationsRepository>>,
) -> Result<HttpResponse, Error> {
    Ok(match reservations_repository.list_reservations().await {
        Ok(reservations) => list_response(reservations),
        Err(err) => {
            tracing::error!("Get all reservations failed {}", err);
            HttpResponse::InternalServerError().finish()
        }
    })
}

#[api_v2_operation]
pub async fn get_reservation(
    reservations_repository: Data<Arc<dyn ReservationsRepository>>,
    reservation_id: web::Path<ReservationId>,
) -> Result<HttpResponse, Error> {
    Ok(
        match reservations_repository
            .get_reservation(reservation_id.into_inner())
            .await
        {
            Ok(Some(reservation)) => HttpResponse::Ok().json(reservation),
            Ok(None) => HttpResponse::NotFound().body(RESERVATION_NOT_FOUND),
            Err(err) => {
                tracing::error!("Get reservation failed {}", err);
                HttpResponse::InternalServerError().finish()
            }
        },
    )
}

#[api_v2_operation]
pub async fn create_reservation(
    reservation_service: Data<ReservationService>,
    query: web::Query<CreateReservationQuery>,
) -> Result<HttpResponse, Error> {
    let CreateReservationQuery { user_id, book_id } = query.into_inner();
    Ok(
        match reservation_service
            .create_reservation(user_id, book_id)
            .await
        {
            Ok(_) => HttpResponse::Ok().body("Book booked successfully!"),
            Err(ReservationServiceError::BookNotAvailable(_)) => {
                HttpResponse::BadRequest().body(BOOK_NOT_AVAILABLE)
            }
            Err(
                ReservationServiceError::UserNotFound(_) | ReservationServiceError::BookNotFound(_),
            ) => HttpResponse::NotFound().finish(),
            Err(err) => {
                tracing::error!("Create reservation failed {}", err);
                HttpResponse::InternalServerError().finish()
            }
        },
    )
}

#[api_v2_operation]
pub async fn update_reservation(
    reservation_service: Data<ReservationService>,
    reservation_id: web::Path<ReservationId>,
    query: web::Query<UpdateReservationQuery>,
) -> Result<HttpResponse, Error> {
    let UpdateReservationQuery {
        date,
        user_id,
        book_id,
    } = query.into_inner();
    Ok(
        match reservation_service
            .update_reservation(reservation_id.into_inner(), date, user_id, book_id)
            .await
        {
            Ok(reservation) => HttpResponse::Ok().json(reservation),
            Err(ReservationServiceError::ReservationNotFound(_)) => {
                HttpResponse::NotFound().body(RESERVATION_NOT_FOUND)
            }
            Err(ReservationServiceError::UserNotFound(_)) => {
                HttpResponse::NotFound().body(USER_NOT_FOUND)
            }
            Err(ReservationServiceError::BookNotFound(_)) => {
                HttpResponse::NotFound().body(BOOK_NOT_FOUND)
            }
            Err(ReservationServiceError::BookNotAvailable(_)) => {
                HttpResponse::BadRequest().body(BOOK_NOT_AVAILABLE)
            }
            Err(err) => {
                tracing::error!("Update reservation failed {}", err);
                HttpResponse::InternalServerError().finish()
            }
        },
    )
}

#[api_v2_operation]
/// Missing reservation is answered with 204, unlike books and users
pub async fn delete_reservation(
    reservation_service: Data<ReservationService>,
    reservation_id: web::Path<ReservationId>,
) -> Result<HttpResponse, Error> {
    Ok(
        match reservation_service
            .delete_reservation(reservation_id.into_inner())
            .await
        {
            Ok(_) => HttpResponse::Ok().finish(),
            Err(ReservationServiceError::ReservationNotFound(_)) => {
                HttpResponse::NoContent().finish()
            }
            Err(err) => {
                tracing::error!("Delete reservation failed {}", err);
                HttpResponse::InternalServerError().finish()
            }
        },
    )
}
