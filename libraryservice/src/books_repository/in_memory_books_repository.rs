use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};

use crate::api::{Book, BookDetails, BookId};
use crate::books_repository::{BookRepository, BookRepositoryError};

pub struct InMemoryBookRepository {
    book_sequence_generator: AtomicI32,
    books: parking_lot::RwLock<HashMap<BookId, Book>>,
}

impl Default for InMemoryBookRepository {
    fn default() -> Self {
        Self {
            // ids start from 1 the same way as SERIAL columns do
            book_sequence_generator: AtomicI32::new(1),
            books: Default::default(),
        }
    }
}

#[async_trait::async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn add_book(&self, details: BookDetails) -> Result<Book, BookRepositoryError> {
        let id = self.book_sequence_generator.fetch_add(1, Ordering::Relaxed);
        let book = Book::new(id, details);
        self.books.write().insert(id, book.clone());
        Ok(book)
    }

    async fn update_book(
        &self,
        book_id: BookId,
        details: BookDetails,
    ) -> Result<Option<Book>, BookRepositoryError> {
        let mut locked_books = self.books.write();
        Ok(locked_books.get_mut(&book_id).map(|book| {
            *book = Book::new(book_id, details);
            book.clone()
        }))
    }

    async fn get_book(&self, book_id: BookId) -> Result<Option<Book>, BookRepositoryError> {
        Ok(self.books.read().get(&book_id).cloned())
    }

    async fn list_books(&self) -> Result<Vec<Book>, BookRepositoryError> {
        let mut books: Vec<Book> = self.books.read().values().cloned().collect();
        books.sort_by_key(|book| book.id);
        Ok(books)
    }

    async fn delete_book(&self, book_id: BookId) -> Result<bool, BookRepositoryError> {
        Ok(self.books.write().remove(&book_id).is_some())
    }

    async fn copies_available(&self, book_id: BookId) -> Result<Option<i32>, BookRepositoryError> {
        Ok(self
            .books
            .read()
            .get(&book_id)
            .map(|book| book.copies_available))
    }

    async fn take_copy(&self, book_id: BookId) -> Result<bool, BookRepositoryError> {
        let mut locked_books = self.books.write();
        match locked_books.get_mut(&book_id) {
            Some(book) if book.copies_available > 0 => {
                book.copies_available -= 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn return_copy(&self, book_id: BookId) -> Result<bool, BookRepositoryError> {
        let mut locked_books = self.books.write();
        if let Some(book) = locked_books.get_mut(&book_id) {
            book.copies_available = one_more_copy(book)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn move_copy(&self, from: BookId, to: BookId) -> Result<bool, BookRepositoryError> {
        let mut locked_books = self.books.write();
        if from == to {
            return Ok(locked_books.contains_key(&to));
        }
        match locked_books.get(&to) {
            Some(book) if book.copies_available > 0 => {}
            _ => return Ok(false),
        }
        if let Some(book) = locked_books.get_mut(&from) {
            book.copies_available = one_more_copy(book)?;
        }
        if let Some(book) = locked_books.get_mut(&to) {
            book.copies_available -= 1;
        }
        Ok(true)
    }
}

fn one_more_copy(book: &Book) -> Result<i32, BookRepositoryError> {
    book.copies_available.checked_add(1).ok_or_else(|| {
        BookRepositoryError::Other(format!("Book {} cannot hold more copies", book.id))
    })
}
