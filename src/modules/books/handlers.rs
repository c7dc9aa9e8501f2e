use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    Form,
};
use libris_db::{Filter, Query, Record, RecordId, Result as StoreResult};
use libris_http::{AppError, Page, Submission};
use serde::Serialize;
use serde_json::json;

use super::models::{book_url, Book, BOOK_RULES};
use crate::catalog::{mark_selected, Catalog, Choice, CATALOG_PATH};
use crate::modules::authors::models::Author;
use crate::modules::book_instances::models::BookInstance;
use crate::modules::genres::models::Genre;
use crate::validation::{validate, FieldError};

fn list_url() -> String {
    format!("{CATALOG_PATH}/books")
}

/// A book with its author and genres resolved for display. A dangling author
/// reference resolves to `None`; dangling genre ids are skipped.
#[derive(Debug, Serialize)]
struct PopulatedBook {
    book: Record<Book>,
    author: Option<Record<Author>>,
    genres: Vec<Record<Genre>>,
}

async fn populate(catalog: &Catalog, id: &RecordId) -> StoreResult<Option<PopulatedBook>> {
    let Some(book) = catalog.books.get(id).await? else {
        return Ok(None);
    };
    let (author, genres) = tokio::try_join!(
        catalog.authors.get(&book.data.author),
        catalog.genres.get_many(&book.data.genre),
    )?;
    Ok(Some(PopulatedBook {
        book,
        author,
        genres,
    }))
}

/// A populated book together with the copies that reference it.
async fn book_with_instances(
    catalog: &Catalog,
    id: &RecordId,
) -> StoreResult<(Option<PopulatedBook>, Vec<Record<BookInstance>>)> {
    let copies = Query::filtered(Filter::eq("book", id.as_str()));
    tokio::try_join!(populate(catalog, id), catalog.instances.find(&copies))
}

/// Every author and genre a book form can offer, in display order.
async fn candidates(catalog: &Catalog) -> StoreResult<(Vec<Record<Author>>, Vec<Record<Genre>>)> {
    let by_family_name = Query::all().sort_by("family_name");
    let by_name = Query::all().sort_by("name");
    tokio::try_join!(
        catalog.authors.find(&by_family_name),
        catalog.genres.find(&by_name),
    )
}

/// Form candidates with the book's current author and genres marked.
fn choices(
    (authors, genres): (Vec<Record<Author>>, Vec<Record<Genre>>),
    book: Option<&Book>,
) -> (Vec<Choice<Author>>, Vec<Choice<Genre>>) {
    let (author, genre) = match book {
        Some(book) => (std::slice::from_ref(&book.author), book.genre.as_slice()),
        None => (&[][..], &[][..]),
    };
    (mark_selected(authors, author), mark_selected(genres, genre))
}

async fn form_page(
    catalog: &Catalog,
    title: &str,
    book: Option<&Book>,
    shown: serde_json::Value,
    errors: &[FieldError],
) -> Result<Page, AppError> {
    let (authors, genres) = choices(candidates(catalog).await?, book);
    Ok(Page::render(
        "book_form.html",
        json!({
            "title": title,
            "book": shown,
            "authors": authors,
            "genres": genres,
            "errors": errors,
        }),
    ))
}

fn delete_page(book: &PopulatedBook, instances: &[Record<BookInstance>]) -> Page {
    Page::render(
        "book_delete.html",
        json!({
            "title": "Delete Book",
            "book": book,
            "book_instances": instances,
        }),
    )
}

/// Display list of all books, each with its author.
pub async fn book_list(State(catalog): State<Catalog>) -> Result<Page, AppError> {
    let by_title = Query::all().sort_by("title");
    let (books, authors) =
        tokio::try_join!(catalog.books.find(&by_title), catalog.authors.all())?;
    let authors: HashMap<RecordId, Record<Author>> = authors
        .into_iter()
        .map(|author| (author.id.clone(), author))
        .collect();

    let book_list: Vec<_> = books
        .iter()
        .map(|book| json!({ "book": book, "author": authors.get(&book.data.author) }))
        .collect();

    Ok(Page::render(
        "book_list.html",
        json!({
            "title": "Book List",
            "book_list": book_list,
        }),
    ))
}

/// Display detail page for a specific book.
pub async fn book_detail(
    State(catalog): State<Catalog>,
    Path(id): Path<RecordId>,
) -> Result<Page, AppError> {
    let (book, instances) = book_with_instances(&catalog, &id).await?;
    let book = book.ok_or_else(|| AppError::not_found("Book not found"))?;

    Ok(Page::render(
        "book_detail.html",
        json!({
            "title": book.book.data.title,
            "book": book,
            "book_instances": instances,
        }),
    ))
}

/// Display book create form.
pub async fn book_create_get(State(catalog): State<Catalog>) -> Result<Page, AppError> {
    form_page(&catalog, "Create Book", None, serde_json::Value::Null, &[]).await
}

/// Handle book create.
pub async fn book_create_post(
    State(catalog): State<Catalog>,
    Form(form): Form<Submission>,
) -> Result<Page, AppError> {
    let validated = validate(BOOK_RULES, form);
    let book = Book::from_submission(&validated.submission);

    if !validated.is_valid() {
        return form_page(
            &catalog,
            "Create Book",
            Some(&book),
            json!(book),
            &validated.errors,
        )
        .await;
    }

    let record = catalog.books.insert(book).await?;
    tracing::info!(module = "books", id = %record.id, "book created");
    Ok(Page::redirect(book_url(&record.id)))
}

/// Display book delete confirmation.
pub async fn book_delete_get(
    State(catalog): State<Catalog>,
    Path(id): Path<RecordId>,
) -> Result<Page, AppError> {
    match book_with_instances(&catalog, &id).await? {
        (Some(book), instances) => Ok(delete_page(&book, &instances)),
        (None, _) => Ok(Page::redirect(list_url())),
    }
}

/// Handle book delete. Refused while any copy of the book exists.
pub async fn book_delete_post(
    State(catalog): State<Catalog>,
    Path(path_id): Path<RecordId>,
    Form(form): Form<Submission>,
) -> Result<Page, AppError> {
    let id = form.get("bookid").map(RecordId::from).unwrap_or(path_id);
    let (book, instances) = book_with_instances(&catalog, &id).await?;

    if !instances.is_empty() {
        return Ok(match book {
            Some(book) => delete_page(&book, &instances),
            None => Page::redirect(list_url()),
        });
    }

    if catalog.books.delete(&id).await? {
        tracing::info!(module = "books", %id, "book deleted");
    }
    Ok(Page::redirect(list_url()))
}

/// Display book update form with the current author and genres marked.
pub async fn book_update_get(
    State(catalog): State<Catalog>,
    Path(id): Path<RecordId>,
) -> Result<Page, AppError> {
    let (book, options) = tokio::try_join!(catalog.books.get(&id), candidates(&catalog))?;
    let book = book.ok_or_else(|| AppError::not_found("Book not found"))?;
    let (authors, genres) = choices(options, Some(&book.data));

    Ok(Page::render(
        "book_form.html",
        json!({
            "title": "Update Book",
            "book": book,
            "authors": authors,
            "genres": genres,
            "errors": [],
        }),
    ))
}

/// Handle book update, keeping the book's identity.
pub async fn book_update_post(
    State(catalog): State<Catalog>,
    Path(id): Path<RecordId>,
    Form(form): Form<Submission>,
) -> Result<Page, AppError> {
    let validated = validate(BOOK_RULES, form);
    let book = Record::new(id, Book::from_submission(&validated.submission));

    if !validated.is_valid() {
        return form_page(
            &catalog,
            "Update Book",
            Some(&book.data),
            json!(book),
            &validated.errors,
        )
        .await;
    }

    let updated = catalog
        .books
        .update(&book.id, book.data)
        .await?
        .ok_or_else(|| AppError::not_found("Book not found"))?;
    tracing::info!(module = "books", id = %updated.id, "book updated");
    Ok(Page::redirect(book_url(&updated.id)))
}
