use paperclip::actix::web;

use crate::handlers;

pub fn config_app(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/health").route(web::get().to(handlers::health)))
        .service(
            web::scope("/apiBook")
                .service(web::resource("/allBooks").route(web::get().to(handlers::get_all_books)))
                .service(web::resource("/createBook").route(web::post().to(handlers::add_book)))
                .service(
                    web::resource("/getBook/{book_id}").route(web::get().to(handlers::get_book)),
                )
                .service(
                    web::resource("/putBook/{book_id}").route(web::put().to(handlers::update_book)),
                )
                .service(
                    web::resource("/deleteBook/{book_id}")
                        .route(web::delete().to(handlers::delete_book)),
                )
                .service(
                    web::resource("/getCopies/{book_id}")
                        .route(web::get().to(handlers::get_copies)),
                ),
        )
        .service(
            web::scope("/apiUser")
                .service(web::resource("/allUsers").route(web::get().to(handlers::get_all_users)))
                .service(web::resource("/createUser").route(web::post().to(handlers::add_user)))
                .service(
                    web::resource("/getUser/{user_id}").route(web::get().to(handlers::get_user)),
                )
                .service(
                    web::resource("/putUser/{user_id}").route(web::put().to(handlers::update_user)),
                )
                .service(
                    web::resource("/deleteUser/{user_id}")
                        .route(web::delete().to(handlers::delete_user)),
                ),
        )
        .service(
            web::scope("/apiReservation")
                .service(
                    web::resource("/allReservations")
                        .route(web::get().to(handlers::get_all_reservations)),
                )
                .service(
                    web::resource("/getReservation/{reservation_id}")
                        .route(web::get().to(handlers::get_reservation)),
                )
                .service(
                    web::resource("/createReservation")
                        .route(web::post().to(handlers::create_reservation)),
                )
                .service(
                    web::resource("/putReservation/{reservation_id}")
                        .route(web::put().to(handlers::update_reservation)),
                )
                .service(
                    web::resource("/deleteReservation/{reservation_id}")
                        .route(web::delete().to(handlers::delete_reservation)),
                ),
        );
}

#[cfg(test)]
mod handler_tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::test;
    use actix_web::App;
    use paperclip::actix::OpenApiExt;

    use crate::api::{Book, BookDetails, Reservation, User, UserDetails};
    use crate::books_repository::{BookRepository, InMemoryBookRepository};
    use crate::handlers::MAX_COPIES_AVAILABLE;
    use crate::reservation_service::ReservationService;
    use crate::reservations_repository::{InMemoryReservationsRepository, ReservationsRepository};
    use crate::users_repository::{InMemoryUsersRepository, UserRepository};

    use super::config_app;

    struct Repositories {
        books: Arc<dyn BookRepository>,
        users: Arc<dyn UserRepository>,
        reservations: Arc<dyn ReservationsRepository>,
    }

    impl Repositories {
        fn in_memory() -> Self {
            Self {
                books: Arc::new(InMemoryBookRepository::default()),
                users: Arc::new(InMemoryUsersRepository::default()),
                reservations: Arc::new(InMemoryReservationsRepository::default()),
            }
        }
    }

    macro_rules! init_app {
        ($repositories:expr) => {{
            let repositories: &Repositories = &$repositories;
            let reservation_service = ReservationService::new(
                repositories.books.clone(),
                repositories.users.clone(),
                repositories.reservations.clone(),
            );
            test::init_service(
                App::new()
                    .wrap_api()
                    .app_data(actix_web::web::Data::new(repositories.books.clone()))
                    .app_data(actix_web::web::Data::new(repositories.users.clone()))
                    .app_data(actix_web::web::Data::new(repositories.reservations.clone()))
                    .app_data(actix_web::web::Data::new(reservation_service))
                    .configure(config_app)
                    .build(),
            )
            .await
        }};
    }

    fn book_details(copies_available: i32) -> BookDetails {
        BookDetails {
            description: "A novel".to_string(),
            title: "Il Gattopardo".to_string(),
            author: "Giuseppe Tomasi di Lampedusa".to_string(),
            copies_available,
        }
    }

    fn user_details() -> UserDetails {
        UserDetails {
            first_name: "Mario".to_string(),
            last_name: "Rossi".to_string(),
            address: "Via Roma 1".to_string(),
            telephone: "0123456789".to_string(),
        }
    }

    #[actix_web::test]
    async fn test_health() {
        let repositories = Repositories::in_memory();
        let app = init_app!(repositories);

        let response =
            test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[actix_web::test]
    /// Book endpoints
    /// 1. Empty list answers 204
    /// 2. Creates a book, gets it and lists it
    /// 3. Updates it
    /// 4. Rejects negative number of copies
    /// 5. Deletes it, second delete answers 404
    async fn test_book_endpoints() {
        let repositories = Repositories::in_memory();
        let app = init_app!(repositories);

        let response = test::call_service(
            &app,
            test::TestRequest::get().uri("/apiBook/allBooks").to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/apiBook/createBook")
                .set_json(book_details(2))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let book: Book = test::read_body_json(response).await;
        assert_eq!(book, Book::new(book.id, book_details(2)));

        let fetched: Book = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri(&format!("/apiBook/getBook/{}", book.id))
                .to_request(),
        )
        .await;
        assert_eq!(fetched, book);

        let listed: Vec<Book> = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/apiBook/allBooks").to_request(),
        )
        .await;
        assert_eq!(listed, vec![book.clone()]);

        let updated: Book = test::call_and_read_body_json(
            &app,
            test::TestRequest::put()
                .uri(&format!("/apiBook/putBook/{}", book.id))
                .set_json(book_details(5))
                .to_request(),
        )
        .await;
        assert_eq!(updated.copies_available, 5);

        let response = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/apiBook/putBook/{}", book.id))
                .set_json(book_details(-1))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/apiBook/putBook/{}", book.id))
                .set_json(book_details(i32::MAX))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            test::read_body(response).await,
            format!("copiesAvailable must not exceed {}", MAX_COPIES_AVAILABLE)
        );

        let response = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/apiBook/putBook/999")
                .set_json(book_details(1))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/apiBook/deleteBook/{}", book.id))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/apiBook/deleteBook/{}", book.id))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/apiBook/getBook/{}", book.id))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(test::read_body(response).await, "Book not found");
    }

    #[actix_web::test]
    async fn test_user_endpoints() {
        let repositories = Repositories::in_memory();
        let app = init_app!(repositories);

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/apiUser/createUser")
                .set_json(user_details())
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let user: User = test::read_body_json(response).await;

        let listed: Vec<User> = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/apiUser/allUsers").to_request(),
        )
        .await;
        assert_eq!(listed, vec![user.clone()]);

        let new_details = UserDetails {
            address: "Via Milano 2".to_string(),
            ..user_details()
        };
        let updated: User = test::call_and_read_body_json(
            &app,
            test::TestRequest::put()
                .uri(&format!("/apiUser/putUser/{}", user.id))
                .set_json(new_details.clone())
                .to_request(),
        )
        .await;
        assert_eq!(updated, User::new(user.id, new_details));

        let response = test::call_service(
            &app,
            test::TestRequest::get().uri("/apiUser/getUser/42").to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(test::read_body(response).await, "User not found");

        let response = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/apiUser/deleteUser/{}", user.id))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = test::call_service(
            &app,
            test::TestRequest::get().uri("/apiUser/allUsers").to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    /// Book with a single copy gets reserved, afterwards there are no copies left
    async fn test_reserve_last_copy() {
        let repositories = Repositories::in_memory();
        let book = repositories.books.add_book(book_details(1)).await.unwrap();
        let user = repositories.users.add_user(user_details()).await.unwrap();
        let app = init_app!(repositories);

        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/apiBook/getCopies/{}", book.id))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(test::read_body(response).await, "Copies available: 1");

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!(
                    "/apiReservation/createReservation?userId={}&bookId={}",
                    user.id, book.id
                ))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(test::read_body(response).await, "Book booked successfully!");

        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/apiBook/getCopies/{}", book.id))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            test::read_body(response).await,
            format!("Copies not available for book with ID: {}", book.id)
        );

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!(
                    "/apiReservation/createReservation?userId={}&bookId={}",
                    user.id, book.id
                ))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            test::read_body(response).await,
            "The book is not currently available for pre-order."
        );
    }

    #[actix_web::test]
    async fn test_reserve_for_missing_user() {
        let repositories = Repositories::in_memory();
        let book = repositories.books.add_book(book_details(1)).await.unwrap();
        let app = init_app!(repositories);

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!(
                    "/apiReservation/createReservation?userId=99&bookId={}",
                    book.id
                ))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(test::read_body(response).await.is_empty());
        assert_eq!(
            repositories.books.copies_available(book.id).await.unwrap(),
            Some(1)
        );
    }

    #[actix_web::test]
    /// Missing reservation is answered with 204 on delete, missing book with 404
    async fn test_delete_missing_records() {
        let repositories = Repositories::in_memory();
        let app = init_app!(repositories);

        let response = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri("/apiReservation/deleteReservation/12345")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(test::read_body(response).await.is_empty());

        let response = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri("/apiBook/deleteBook/12345")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(test::read_body(response).await.is_empty());
    }

    #[actix_web::test]
    /// 1. Reserves a book
    /// 2. Moves the reservation to another book and date
    /// 3. Gets and lists the reservation
    /// 4. Moving to a missing user answers 404
    /// 5. Cancels the reservation, copies are back
    async fn test_reservation_lifecycle() {
        let repositories = Repositories::in_memory();
        let first_book = repositories.books.add_book(book_details(1)).await.unwrap();
        let second_book = repositories.books.add_book(book_details(3)).await.unwrap();
        let user = repositories.users.add_user(user_details()).await.unwrap();
        let app = init_app!(repositories);

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!(
                    "/apiReservation/createReservation?userId={}&bookId={}",
                    user.id, first_book.id
                ))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let reservations: Vec<Reservation> = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/apiReservation/allReservations")
                .to_request(),
        )
        .await;
        assert_eq!(reservations.len(), 1);
        let reservation_id = reservations[0].id;

        let updated: Reservation = test::call_and_read_body_json(
            &app,
            test::TestRequest::put()
                .uri(&format!(
                    "/apiReservation/putReservation/{}?date=2024-05-20&userId={}&bookId={}",
                    reservation_id, user.id, second_book.id
                ))
                .to_request(),
        )
        .await;
        assert_eq!(updated.book_id, second_book.id);
        assert_eq!(updated.date.to_string(), "2024-05-20");
        assert_eq!(
            repositories
                .books
                .copies_available(first_book.id)
                .await
                .unwrap(),
            Some(1)
        );
        assert_eq!(
            repositories
                .books
                .copies_available(second_book.id)
                .await
                .unwrap(),
            Some(2)
        );

        let fetched: Reservation = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri(&format!("/apiReservation/getReservation/{}", reservation_id))
                .to_request(),
        )
        .await;
        assert_eq!(fetched, updated);

        let response = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!(
                    "/apiReservation/putReservation/{}?date=2024-05-20&userId=99&bookId={}",
                    reservation_id, second_book.id
                ))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(test::read_body(response).await, "User not found");

        let response = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!(
                    "/apiReservation/deleteReservation/{}",
                    reservation_id
                ))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            repositories
                .books
                .copies_available(second_book.id)
                .await
                .unwrap(),
            Some(3)
        );

        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/apiReservation/getReservation/{}", reservation_id))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(test::read_body(response).await, "Reservation not found");
    }

    #[actix_web::test]
    /// 1. Moving the reservation to a book without copies answers 400, nothing changes
    /// 2. Moving it to a new date within the same book succeeds with no copies left
    async fn test_update_reservation_availability() {
        let repositories = Repositories::in_memory();
        let book = repositories.books.add_book(book_details(1)).await.unwrap();
        let empty_book = repositories.books.add_book(book_details(0)).await.unwrap();
        let user = repositories.users.add_user(user_details()).await.unwrap();
        let app = init_app!(repositories);

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!(
                    "/apiReservation/createReservation?userId={}&bookId={}",
                    user.id, book.id
                ))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let reservation = repositories.reservations.list_reservations().await.unwrap()[0].clone();

        let response = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!(
                    "/apiReservation/putReservation/{}?date=2024-05-20&userId={}&bookId={}",
                    reservation.id, user.id, empty_book.id
                ))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            test::read_body(response).await,
            "The book is not currently available for pre-order."
        );
        assert_eq!(
            repositories.books.copies_available(book.id).await.unwrap(),
            Some(0)
        );
        assert_eq!(
            repositories
                .books
                .copies_available(empty_book.id)
                .await
                .unwrap(),
            Some(0)
        );
        assert_eq!(
            repositories
                .reservations
                .get_reservation(reservation.id)
                .await
                .unwrap(),
            Some(reservation.clone())
        );

        let updated: Reservation = test::call_and_read_body_json(
            &app,
            test::TestRequest::put()
                .uri(&format!(
                    "/apiReservation/putReservation/{}?date=2024-06-01&userId={}&bookId={}",
                    reservation.id, user.id, book.id
                ))
                .to_request(),
        )
        .await;
        assert_eq!(updated.book_id, book.id);
        assert_eq!(updated.date.to_string(), "2024-06-01");
        assert_eq!(
            repositories.books.copies_available(book.id).await.unwrap(),
            Some(0)
        );
    }
}
