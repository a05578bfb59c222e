use axum::extract::State;
use serde_json::{json, Value};

use crate::db::BookCatalog;
use crate::error::{AppError, AppResult};
use crate::models::book::{Book, BookQuery, CreateBookRequest, UpdateBookRequest};
use crate::repositories::books::BookRepository;
use crate::response::{ApiPath, ApiQuery, ApiResponse, ValidatedJson};
use crate::AppState;

fn not_found(catalog: BookCatalog) -> AppError {
    AppError::NotFound(format!("Book not found in {} catalog", catalog.as_str()))
}

pub async fn list_books(
    State(state): State<AppState>,
    ApiPath(catalog): ApiPath<BookCatalog>,
    ApiQuery(query): ApiQuery<BookQuery>,
) -> AppResult<ApiResponse<Vec<Book>>> {
    let books = BookRepository::new(&state.db, &state.tables, catalog)
        .list(&query)
        .await?;
    Ok(ApiResponse::ok(books))
}

pub async fn get_book(
    State(state): State<AppState>,
    ApiPath((catalog, book_id)): ApiPath<(BookCatalog, i64)>,
) -> AppResult<ApiResponse<Book>> {
    let book = BookRepository::new(&state.db, &state.tables, catalog)
        .find(book_id)
        .await?
        .ok_or_else(|| not_found(catalog))?;
    Ok(ApiResponse::ok(book))
}

pub async fn create_book(
    State(state): State<AppState>,
    ApiPath(catalog): ApiPath<BookCatalog>,
    ValidatedJson(body): ValidatedJson<CreateBookRequest>,
) -> AppResult<ApiResponse<Book>> {
    let book = BookRepository::new(&state.db, &state.tables, catalog)
        .create(&body)
        .await?;
    tracing::info!(catalog = catalog.as_str(), book_id = book.id, "Book created");
    Ok(ApiResponse::created(book).with_message("Libro creado"))
}

pub async fn update_book(
    State(state): State<AppState>,
    ApiPath((catalog, book_id)): ApiPath<(BookCatalog, i64)>,
    ValidatedJson(body): ValidatedJson<UpdateBookRequest>,
) -> AppResult<ApiResponse<Book>> {
    let book = BookRepository::new(&state.db, &state.tables, catalog)
        .update(book_id, &body)
        .await?
        .ok_or_else(|| not_found(catalog))?;
    Ok(ApiResponse::ok(book).with_message("Libro actualizado"))
}

pub async fn delete_book(
    State(state): State<AppState>,
    ApiPath((catalog, book_id)): ApiPath<(BookCatalog, i64)>,
) -> AppResult<ApiResponse<Value>> {
    let deleted = BookRepository::new(&state.db, &state.tables, catalog)
        .soft_delete(book_id)
        .await?;
    if !deleted {
        return Err(not_found(catalog));
    }
    tracing::info!(catalog = catalog.as_str(), book_id, "Book deactivated");
    Ok(ApiResponse::ok(json!({ "id": book_id })).with_message("Libro eliminado"))
}
