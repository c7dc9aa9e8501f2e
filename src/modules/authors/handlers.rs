use axum::{
    extract::{Path, State},
    Form,
};
use libris_db::{Filter, Query, Record, RecordId, Result as StoreResult};
use libris_http::{AppError, Page, Submission};
use serde_json::json;

use super::models::{author_url, Author, AUTHOR_RULES};
use crate::catalog::{Catalog, CATALOG_PATH};
use crate::modules::books::models::Book;
use crate::validation::{validate, FieldError};

fn list_url() -> String {
    format!("{CATALOG_PATH}/authors")
}

/// An author together with the books that reference it.
async fn author_with_books(
    catalog: &Catalog,
    id: &RecordId,
) -> StoreResult<(Option<Record<Author>>, Vec<Record<Book>>)> {
    let books_by_author = Query::filtered(Filter::eq("author", id.as_str())).sort_by("title");
    tokio::try_join!(catalog.authors.get(id), catalog.books.find(&books_by_author))
}

fn form_page(title: &str, author: serde_json::Value, errors: &[FieldError]) -> Page {
    Page::render(
        "author_form.html",
        json!({
            "title": title,
            "author": author,
            "errors": errors,
        }),
    )
}

fn delete_page(author: &Record<Author>, books: &[Record<Book>]) -> Page {
    Page::render(
        "author_delete.html",
        json!({
            "title": "Delete Author",
            "author": author,
            "author_books": books,
        }),
    )
}

/// Display list of all authors.
pub async fn author_list(State(catalog): State<Catalog>) -> Result<Page, AppError> {
    let authors = catalog
        .authors
        .find(&Query::all().sort_by("family_name"))
        .await?;

    Ok(Page::render(
        "author_list.html",
        json!({
            "title": "Author List",
            "author_list": authors,
        }),
    ))
}

/// Display detail page for a specific author.
pub async fn author_detail(
    State(catalog): State<Catalog>,
    Path(id): Path<RecordId>,
) -> Result<Page, AppError> {
    let (author, books) = author_with_books(&catalog, &id).await?;
    let author = author.ok_or_else(|| AppError::not_found("Author not found"))?;

    Ok(Page::render(
        "author_detail.html",
        json!({
            "title": "Author Detail",
            "author": author,
            "author_books": books,
        }),
    ))
}

/// Display author create form.
pub async fn author_create_get() -> Page {
    form_page("Create Author", serde_json::Value::Null, &[])
}

/// Handle author create.
pub async fn author_create_post(
    State(catalog): State<Catalog>,
    Form(form): Form<Submission>,
) -> Result<Page, AppError> {
    let validated = validate(AUTHOR_RULES, form);
    if !validated.is_valid() {
        let shown = validated.echo(AUTHOR_RULES);
        return Ok(form_page("Create Author", shown, &validated.errors));
    }

    let author = Author::from_submission(&validated.submission);
    let record = catalog.authors.insert(author).await?;
    tracing::info!(module = "authors", id = %record.id, "author created");
    Ok(Page::redirect(author_url(&record.id)))
}

/// Display author delete confirmation.
pub async fn author_delete_get(
    State(catalog): State<Catalog>,
    Path(id): Path<RecordId>,
) -> Result<Page, AppError> {
    match author_with_books(&catalog, &id).await? {
        (Some(author), books) => Ok(delete_page(&author, &books)),
        (None, _) => Ok(Page::redirect(list_url())),
    }
}

/// Handle author delete. Refused while any book references the author.
pub async fn author_delete_post(
    State(catalog): State<Catalog>,
    Path(path_id): Path<RecordId>,
    Form(form): Form<Submission>,
) -> Result<Page, AppError> {
    let id = form.get("authorid").map(RecordId::from).unwrap_or(path_id);
    let (author, books) = author_with_books(&catalog, &id).await?;

    if !books.is_empty() {
        return Ok(match author {
            Some(author) => delete_page(&author, &books),
            None => Page::redirect(list_url()),
        });
    }

    if catalog.authors.delete(&id).await? {
        tracing::info!(module = "authors", %id, "author deleted");
    }
    Ok(Page::redirect(list_url()))
}

/// Display author update form.
pub async fn author_update_get(
    State(catalog): State<Catalog>,
    Path(id): Path<RecordId>,
) -> Result<Page, AppError> {
    let author = catalog
        .authors
        .get(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Author not found"))?;

    Ok(form_page("Update Author", json!(author), &[]))
}

/// Handle author update, keeping the author's identity.
pub async fn author_update_post(
    State(catalog): State<Catalog>,
    Path(id): Path<RecordId>,
    Form(form): Form<Submission>,
) -> Result<Page, AppError> {
    let validated = validate(AUTHOR_RULES, form);
    if !validated.is_valid() {
        let mut shown = validated.echo(AUTHOR_RULES);
        shown["id"] = json!(id);
        return Ok(form_page("Update Author", shown, &validated.errors));
    }

    let author = Author::from_submission(&validated.submission);
    let updated = catalog
        .authors
        .update(&id, author)
        .await?
        .ok_or_else(|| AppError::not_found("Author not found"))?;
    tracing::info!(module = "authors", id = %updated.id, "author updated");
    Ok(Page::redirect(author_url(&updated.id)))
}
