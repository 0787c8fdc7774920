//! Books repository for database operations

use sqlx::{Pool, Postgres, QueryBuilder};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID. Absence is a normal outcome, not an error.
    pub async fn get_by_id(&self, id: i32) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, isbn FROM books WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    /// Get book by isbn
    pub async fn get_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, isbn FROM books WHERE isbn = $1",
        )
        .bind(isbn)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    /// Check if a book with the given isbn already exists
    pub async fn isbn_exists(&self, isbn: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1)")
                .bind(isbn)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    /// Insert a new book, returning it with the storage-assigned id
    pub async fn create(&self, book: &Book) -> AppResult<Book> {
        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO books (title, author, isbn) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .fetch_one(&self.pool)
        .await?;

        Ok(Book {
            id: Some(id),
            title: book.title.clone(),
            author: book.author.clone(),
            isbn: book.isbn.clone(),
        })
    }

    /// Persist a full replacement of the book, returning it as read back
    /// from storage
    pub async fn update(&self, id: i32, book: &Book) -> AppResult<Book> {
        sqlx::query("UPDATE books SET title = $1, author = $2, isbn = $3 WHERE id = $4")
            .bind(&book.title)
            .bind(&book.author)
            .bind(&book.isbn)
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Delete a book by id
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Search books with pagination.
    ///
    /// Predicates are appended only for populated filter fields and are
    /// combined with AND.
    pub async fn search(&self, query: &BookQuery) -> AppResult<(Vec<Book>, i64)> {
        let page = query.page();
        let per_page = query.per_page();
        let offset = (page - 1).saturating_mul(per_page);

        let mut count_qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM books WHERE 1=1");
        push_filters(&mut count_qb, query);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT id, title, author, isbn FROM books WHERE 1=1");
        push_filters(&mut qb, query);
        qb.push(" ORDER BY id LIMIT ");
        qb.push_bind(per_page);
        qb.push(" OFFSET ");
        qb.push_bind(offset);

        let books = qb.build_query_as::<Book>().fetch_all(&self.pool).await?;

        Ok((books, total))
    }
}

/// Append one predicate per populated filter field (AND semantics)
fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &BookQuery) {
    if let Some(ref title) = query.title {
        qb.push(" AND title ILIKE ");
        qb.push_bind(format!("%{}%", title));
    }
    if let Some(ref author) = query.author {
        qb.push(" AND author ILIKE ");
        qb.push_bind(format!("%{}%", author));
    }
    if let Some(ref isbn) = query.isbn {
        qb.push(" AND isbn = ");
        qb.push_bind(isbn.clone());
    }
}
