pub use in_memory_books_repository::InMemoryBookRepository;
pub use postgres_books_repository::PostgresBooksRepository;

use crate::api::{Book, BookDetails, BookId};

mod in_memory_books_repository;
mod postgres_books_repository;

#[derive(thiserror::Error, Debug)]
pub enum BookRepositoryError {
    #[error("DatabaseFailure failure {0}")]
    DatabaseFailure(#[from] tokio_postgres::Error),

    #[error("Other error {0}")]
    Other(String),
}

#[async_trait::async_trait]
pub trait BookRepository: Send + Sync {
    /// Adds book to repository, returns the stored book with the id assigned to it
    async fn add_book(&self, details: BookDetails) -> Result<Book, BookRepositoryError>;
    /// Overwrites all fields of the book, returns None if the book was not found
    async fn update_book(
        &self,
        book_id: BookId,
        details: BookDetails,
    ) -> Result<Option<Book>, BookRepositoryError>;
    /// Retrieves the book from repository, None if it does not exist
    async fn get_book(&self, book_id: BookId) -> Result<Option<Book>, BookRepositoryError>;
    /// Lists all books in the repository
    async fn list_books(&self) -> Result<Vec<Book>, BookRepositoryError>;
    /// Removes the book, returns false if it was not found
    async fn delete_book(&self, book_id: BookId) -> Result<bool, BookRepositoryError>;
    /// Number of copies of the book that can still be reserved, None if the book does not exist
    async fn copies_available(&self, book_id: BookId) -> Result<Option<i32>, BookRepositoryError>;
    /// Atomically decrements number of available copies if at least one is left.
    /// Returns false when the book has no copies left or does not exist
    async fn take_copy(&self, book_id: BookId) -> Result<bool, BookRepositoryError>;
    /// Atomically increments number of available copies.
    /// Returns false when the book does not exist
    async fn return_copy(&self, book_id: BookId) -> Result<bool, BookRepositoryError>;
    /// Atomically returns a copy to `from` and takes one from `to`.
    /// Returns false, changing nothing, when `to` has no copies left or does not exist.
    /// A missing `from` book is skipped, moving within the same book changes nothing
    async fn move_copy(&self, from: BookId, to: BookId) -> Result<bool, BookRepositoryError>;
}
