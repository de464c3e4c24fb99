use tokio_postgres::{Client, Row, Statement};

use crate::api::{Book, BookDetails, BookId};
use crate::books_repository::{BookRepository, BookRepositoryError};
use crate::postgres::PostgresConfig;

const BOOKS_SCHEMA: &str = "
        CREATE TABLE IF NOT EXISTS books (
            id                  SERIAL PRIMARY KEY,
            title               TEXT NOT NULL,
            author              TEXT NOT NULL,
            description         TEXT NOT NULL,
            copies_available    INTEGER NOT NULL
            )
        ";

pub struct PostgresBooksRepository {
    client: Client,
}

impl PostgresBooksRepository {
    pub async fn init(config: PostgresConfig) -> anyhow::Result<Self> {
        let client = crate::postgres::connect(&config, BOOKS_SCHEMA).await?;
        Ok(Self { client })
    }
}

fn book_from_row(row: &Row) -> Result<Book, BookRepositoryError> {
    Ok(Book {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        author: row.try_get("author")?,
        description: row.try_get("description")?,
        copies_available: row.try_get("copies_available")?,
    })
}

#[async_trait::async_trait]
impl BookRepository for PostgresBooksRepository {
    async fn add_book(&self, details: BookDetails) -> Result<Book, BookRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare(
                "INSERT INTO books (title, author, description, copies_available) \
                 VALUES ($1, $2, $3, $4) RETURNING id",
            )
            .await?;

        let rows = self
            .client
            .query(
                &stmt,
                &[
                    &details.title,
                    &details.author,
                    &details.description,
                    &details.copies_available,
                ],
            )
            .await?;

        let book_id: BookId = rows
            .first()
            .ok_or_else(|| BookRepositoryError::Other("Id not returned".to_string()))?
            .try_get(0)?;

        Ok(Book::new(book_id, details))
    }

    async fn update_book(
        &self,
        book_id: BookId,
        details: BookDetails,
    ) -> Result<Option<Book>, BookRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare(
                "UPDATE books SET title = $1, author = $2, description = $3, copies_available = $4 \
                 WHERE id = $5 RETURNING id",
            )
            .await?;

        let rows = self
            .client
            .query(
                &stmt,
                &[
                    &details.title,
                    &details.author,
                    &details.description,
                    &details.copies_available,
                    &book_id,
                ],
            )
            .await?;
        Ok((!rows.is_empty()).then(|| Book::new(book_id, details)))
    }

    async fn get_book(&self, book_id: BookId) -> Result<Option<Book>, BookRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare(
                "SELECT id, title, author, description, copies_available FROM books WHERE id = ($1)",
            )
            .await?;

        let rows = self.client.query(&stmt, &[&book_id]).await?;

        rows.first().map(book_from_row).transpose()
    }

    async fn list_books(&self) -> Result<Vec<Book>, BookRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare("SELECT id, title, author, description, copies_available FROM books ORDER BY id")
            .await?;

        let rows = self.client.query(&stmt, &[]).await?;

        rows.iter().map(book_from_row).collect()
    }

    async fn delete_book(&self, book_id: BookId) -> Result<bool, BookRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare("DELETE FROM books WHERE id = ($1)")
            .await?;

        Ok(self.client.execute(&stmt, &[&book_id]).await? > 0)
    }

    async fn copies_available(&self, book_id: BookId) -> Result<Option<i32>, BookRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare("SELECT copies_available FROM books WHERE id = ($1)")
            .await?;

        let rows = self.client.query(&stmt, &[&book_id]).await?;

        Ok(rows
            .first()
            .map(|row| row.try_get::<_, i32>(0))
            .transpose()?)
    }

    async fn take_copy(&self, book_id: BookId) -> Result<bool, BookRepositoryError> {
        // check and decrement in one statement, so the last copy cannot be taken twice
        let stmt: Statement = self
            .client
            .prepare(
                "UPDATE books SET copies_available = copies_available - 1 \
                 WHERE id = ($1) AND copies_available > 0",
            )
            .await?;

        Ok(self.client.execute(&stmt, &[&book_id]).await? > 0)
    }

    async fn return_copy(&self, book_id: BookId) -> Result<bool, BookRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare("UPDATE books SET copies_available = copies_available + 1 WHERE id = ($1)")
            .await?;

        Ok(self.client.execute(&stmt, &[&book_id]).await? > 0)
    }

    async fn move_copy(&self, from: BookId, to: BookId) -> Result<bool, BookRepositoryError> {
        if from == to {
            return Ok(self.copies_available(to).await?.is_some());
        }
        // both updates belong to one statement, either both apply or none
        let stmt: Statement = self
            .client
            .prepare(
                "WITH taken AS ( \
                     UPDATE books SET copies_available = copies_available - 1 \
                     WHERE id = $2 AND copies_available > 0 RETURNING id \
                 ), returned AS ( \
                     UPDATE books SET copies_available = copies_available + 1 \
                     WHERE id = $1 AND EXISTS (SELECT 1 FROM taken) RETURNING id \
                 ) \
                 SELECT EXISTS (SELECT 1 FROM taken)",
            )
            .await?;

        let row = self.client.query_one(&stmt, &[&from, &to]).await?;
        Ok(row.try_get::<_, bool>(0)?)
    }
}
