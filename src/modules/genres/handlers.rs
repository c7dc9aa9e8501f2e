use axum::{
    extract::{Path, State},
    Form,
};
use libris_db::{Filter, Query, Record, RecordId, Result as StoreResult};
use libris_http::{AppError, Page, Submission};
use serde_json::json;

use super::models::{genre_url, Genre, GENRE_RULES};
use crate::catalog::{Catalog, CATALOG_PATH};
use crate::modules::books::models::Book;
use crate::validation::{validate, FieldError};

const DUPLICATE_GENRE: &str = "This genre already exists";

fn list_url() -> String {
    format!("{CATALOG_PATH}/genres")
}

async fn genre_with_books(
    catalog: &Catalog,
    id: &RecordId,
) -> StoreResult<(Option<Record<Genre>>, Vec<Record<Book>>)> {
    let tagged = Query::filtered(Filter::eq("genre", id.as_str())).sort_by("title");
    tokio::try_join!(catalog.genres.get(id), catalog.books.find(&tagged))
}

fn form_page(title: &str, genre: serde_json::Value, errors: &[FieldError]) -> Page {
    Page::render(
        "genre_form.html",
        json!({
            "title": title,
            "genre": genre,
            "errors": errors,
        }),
    )
}

fn delete_page(genre: &Record<Genre>, books: &[Record<Book>]) -> Page {
    Page::render(
        "genre_delete.html",
        json!({
            "title": "Delete Genre",
            "genre": genre,
            "genre_books": books,
        }),
    )
}

/// Display list of all genres.
pub async fn genre_list(State(catalog): State<Catalog>) -> Result<Page, AppError> {
    let genres = catalog.genres.find(&Query::all().sort_by("name")).await?;

    Ok(Page::render(
        "genre_list.html",
        json!({
            "title": "Genre List",
            "genre_list": genres,
        }),
    ))
}

/// Display detail page for a specific genre.
pub async fn genre_detail(
    State(catalog): State<Catalog>,
    Path(id): Path<RecordId>,
) -> Result<Page, AppError> {
    let (genre, books) = genre_with_books(&catalog, &id).await?;
    let genre = genre.ok_or_else(|| AppError::not_found("Genre not found"))?;

    Ok(Page::render(
        "genre_detail.html",
        json!({
            "title": "Genre Detail",
            "genre": genre,
            "genre_books": books,
        }),
    ))
}

/// Display genre create form.
pub async fn genre_create_get() -> Page {
    form_page("Create Genre", serde_json::Value::Null, &[])
}

/// Handle genre create.
///
/// A genre whose name is already taken is not created again; the client is
/// sent to the existing record instead. The lookup and the insert are not
/// atomic, so two concurrent creates of one name can both succeed.
pub async fn genre_create_post(
    State(catalog): State<Catalog>,
    Form(form): Form<Submission>,
) -> Result<Page, AppError> {
    let validated = validate(GENRE_RULES, form);
    let genre = Genre::from_submission(&validated.submission);

    if !validated.is_valid() {
        return Ok(form_page("Create Genre", json!(genre), &validated.errors));
    }

    if let Some(existing) = catalog
        .genres
        .find_one(&Filter::eq("name", genre.name.as_str()))
        .await?
    {
        tracing::debug!(module = "genres", id = %existing.id, "genre already exists");
        return Ok(Page::redirect(genre_url(&existing.id)));
    }

    let record = catalog.genres.insert(genre).await?;
    tracing::info!(module = "genres", id = %record.id, "genre created");
    Ok(Page::redirect(genre_url(&record.id)))
}

/// Display genre delete confirmation.
pub async fn genre_delete_get(
    State(catalog): State<Catalog>,
    Path(id): Path<RecordId>,
) -> Result<Page, AppError> {
    match genre_with_books(&catalog, &id).await? {
        (Some(genre), books) => Ok(delete_page(&genre, &books)),
        (None, _) => Ok(Page::redirect(list_url())),
    }
}

/// Handle genre delete. Refused while any book is tagged with the genre.
pub async fn genre_delete_post(
    State(catalog): State<Catalog>,
    Path(path_id): Path<RecordId>,
    Form(form): Form<Submission>,
) -> Result<Page, AppError> {
    let id = form.get("genreid").map(RecordId::from).unwrap_or(path_id);
    let (genre, books) = genre_with_books(&catalog, &id).await?;

    if !books.is_empty() {
        return Ok(match genre {
            Some(genre) => delete_page(&genre, &books),
            None => Page::redirect(list_url()),
        });
    }

    if catalog.genres.delete(&id).await? {
        tracing::info!(module = "genres", %id, "genre deleted");
    }
    Ok(Page::redirect(list_url()))
}

/// Display genre update form.
pub async fn genre_update_get(
    State(catalog): State<Catalog>,
    Path(id): Path<RecordId>,
) -> Result<Page, AppError> {
    let genre = catalog
        .genres
        .get(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Genre not found"))?;

    Ok(form_page("Update Genre", json!(genre), &[]))
}

/// Handle genre update. Renaming onto another genre's name is rejected with
/// a form error rather than a redirect.
pub async fn genre_update_post(
    State(catalog): State<Catalog>,
    Path(id): Path<RecordId>,
    Form(form): Form<Submission>,
) -> Result<Page, AppError> {
    let validated = validate(GENRE_RULES, form);
    let genre = Record::new(id, Genre::from_submission(&validated.submission));

    if !validated.is_valid() {
        return Ok(form_page("Update Genre", json!(genre), &validated.errors));
    }

    let taken = Query::filtered(Filter::eq("name", genre.data.name.as_str()));
    let duplicate = catalog
        .genres
        .find(&taken)
        .await?
        .into_iter()
        .any(|other| other.id != genre.id);
    if duplicate {
        let errors = [FieldError::new("name", DUPLICATE_GENRE, genre.data.name.as_str())];
        return Ok(form_page("Update Genre", json!(genre), &errors));
    }

    let updated = catalog
        .genres
        .update(&genre.id, genre.data)
        .await?
        .ok_or_else(|| AppError::not_found("Genre not found"))?;
    tracing::info!(module = "genres", id = %updated.id, "genre updated");
    Ok(Page::redirect(genre_url(&updated.id)))
}
