use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    Form,
};
use libris_db::{Query, Record, RecordId, Result as StoreResult};
use libris_http::{AppError, Page, Submission};
use serde_json::json;

use super::models::{book_instance_url, BookInstance, Status, BOOK_INSTANCE_RULES};
use crate::catalog::{mark_selected, Catalog, CATALOG_PATH};
use crate::modules::books::models::Book;
use crate::validation::{validate, Validated};

fn list_url() -> String {
    format!("{CATALOG_PATH}/bookinstances")
}

/// A copy with the book it belongs to, if that book still exists.
async fn instance_with_book(
    catalog: &Catalog,
    id: &RecordId,
) -> StoreResult<Option<(Record<BookInstance>, Option<Record<Book>>)>> {
    let Some(instance) = catalog.instances.get(id).await? else {
        return Ok(None);
    };
    let book = catalog.books.get(&instance.data.book).await?;
    Ok(Some((instance, book)))
}

fn status_options(current: Option<Status>) -> serde_json::Value {
    Status::ALL
        .iter()
        .map(|status| {
            json!({
                "value": status.as_str(),
                "selected": current == Some(*status),
            })
        })
        .collect()
}

/// Render the copy form. A rejected submission is shown as posted, with its
/// book and status reselected.
async fn form_page(
    catalog: &Catalog,
    title: &str,
    rejected: Option<(&Validated, Option<&RecordId>)>,
) -> Result<Page, AppError> {
    let books = catalog.books.find(&Query::all().sort_by("title")).await?;
    let Some((validated, id)) = rejected else {
        return Ok(Page::render(
            "bookinstance_form.html",
            json!({
                "title": title,
                "bookinstance": null,
                "book_list": mark_selected(books, &[]),
                "statuses": status_options(None),
                "errors": [],
            }),
        ));
    };

    let mut shown = validated.echo(BOOK_INSTANCE_RULES);
    if let Some(id) = id {
        shown["id"] = json!(id);
    }
    let book = RecordId::from(validated.submission.text("book"));
    let status = validated.submission.get("status").and_then(Status::parse);

    Ok(Page::render(
        "bookinstance_form.html",
        json!({
            "title": title,
            "bookinstance": shown,
            "book_list": mark_selected(books, std::slice::from_ref(&book)),
            "statuses": status_options(status),
            "errors": validated.errors,
        }),
    ))
}

/// Display list of all book copies, each with its book.
pub async fn bookinstance_list(State(catalog): State<Catalog>) -> Result<Page, AppError> {
    let (instances, books) = tokio::try_join!(catalog.instances.all(), catalog.books.all())?;
    let books: HashMap<RecordId, Record<Book>> = books
        .into_iter()
        .map(|book| (book.id.clone(), book))
        .collect();

    let bookinstance_list: Vec<_> = instances
        .iter()
        .map(|instance| {
            json!({ "bookinstance": instance, "book": books.get(&instance.data.book) })
        })
        .collect();

    Ok(Page::render(
        "bookinstance_list.html",
        json!({
            "title": "Book Instance List",
            "bookinstance_list": bookinstance_list,
        }),
    ))
}

/// Display detail page for a specific copy.
pub async fn bookinstance_detail(
    State(catalog): State<Catalog>,
    Path(id): Path<RecordId>,
) -> Result<Page, AppError> {
    let (instance, book) = instance_with_book(&catalog, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Book copy not found"))?;
    let title = book
        .as_ref()
        .map(|book| book.data.title.as_str())
        .unwrap_or_default();

    Ok(Page::render(
        "bookinstance_detail.html",
        json!({
            "title": format!("Copy: {title}"),
            "bookinstance": instance,
            "book": book,
        }),
    ))
}

/// Display copy create form.
pub async fn bookinstance_create_get(State(catalog): State<Catalog>) -> Result<Page, AppError> {
    form_page(&catalog, "Create BookInstance", None).await
}

/// Handle copy create.
pub async fn bookinstance_create_post(
    State(catalog): State<Catalog>,
    Form(form): Form<Submission>,
) -> Result<Page, AppError> {
    let validated = validate(BOOK_INSTANCE_RULES, form);
    if !validated.is_valid() {
        return form_page(&catalog, "Create BookInstance", Some((&validated, None))).await;
    }

    let instance = BookInstance::from_submission(&validated.submission);
    let record = catalog.instances.insert(instance).await?;
    tracing::info!(module = "book_instances", id = %record.id, "book instance created");
    Ok(Page::redirect(book_instance_url(&record.id)))
}

/// Display copy delete confirmation.
pub async fn bookinstance_delete_get(
    State(catalog): State<Catalog>,
    Path(id): Path<RecordId>,
) -> Result<Page, AppError> {
    let Some((instance, book)) = instance_with_book(&catalog, &id).await? else {
        return Ok(Page::redirect(list_url()));
    };

    Ok(Page::render(
        "bookinstance_delete.html",
        json!({
            "title": "Delete BookInstance",
            "bookinstance": instance,
            "book": book,
        }),
    ))
}

/// Handle copy delete. Nothing references a copy, so this never refuses.
pub async fn bookinstance_delete_post(
    State(catalog): State<Catalog>,
    Path(path_id): Path<RecordId>,
    Form(form): Form<Submission>,
) -> Result<Page, AppError> {
    let id = form
        .get("bookinstanceid")
        .map(RecordId::from)
        .unwrap_or(path_id);

    if catalog.instances.delete(&id).await? {
        tracing::info!(module = "book_instances", %id, "book instance deleted");
    }
    Ok(Page::redirect(list_url()))
}

/// Display copy update form with the current book and status selected.
pub async fn bookinstance_update_get(
    State(catalog): State<Catalog>,
    Path(id): Path<RecordId>,
) -> Result<Page, AppError> {
    let by_title = Query::all().sort_by("title");
    let (instance, books) =
        tokio::try_join!(catalog.instances.get(&id), catalog.books.find(&by_title))?;
    let instance = instance.ok_or_else(|| AppError::not_found("Book copy not found"))?;

    Ok(Page::render(
        "bookinstance_form.html",
        json!({
            "title": "Update BookInstance",
            "bookinstance": instance,
            "book_list": mark_selected(books, std::slice::from_ref(&instance.data.book)),
            "statuses": status_options(Some(instance.data.status)),
            "errors": [],
        }),
    ))
}

/// Handle copy update, keeping the copy's identity.
pub async fn bookinstance_update_post(
    State(catalog): State<Catalog>,
    Path(id): Path<RecordId>,
    Form(form): Form<Submission>,
) -> Result<Page, AppError> {
    let validated = validate(BOOK_INSTANCE_RULES, form);
    if !validated.is_valid() {
        let rejected = Some((&validated, Some(&id)));
        return form_page(&catalog, "Update BookInstance", rejected).await;
    }

    let instance = BookInstance::from_submission(&validated.submission);
    let updated = catalog
        .instances
        .update(&id, instance)
        .await?
        .ok_or_else(|| AppError::not_found("Book copy not found"))?;
    tracing::info!(
        module = "book_instances",
        id = %updated.id,
        status = updated.data.status.as_str(),
        "book instance updated"
    );
    Ok(Page::redirect(book_instance_url(&updated.id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testing::memory_catalog;
    use time::macros::date;

    async fn book(catalog: &Catalog, title: &str) -> RecordId {
        catalog
            .books
            .insert(Book {
                title: title.into(),
                summary: "s".into(),
                isbn: "i".into(),
                author: RecordId::generate(),
                genre: vec![],
            })
            .await
            .unwrap()
            .id
    }

    fn submission(book: &RecordId, status: &str, due_back: &str) -> Submission {
        Submission::new()
            .with("book", book.as_str())
            .with("imprint", "London Gollancz, 2014.")
            .with("status", status)
            .with("due_back", due_back)
    }

    async fn create(catalog: &Catalog, form: Submission) -> RecordId {
        let page = bookinstance_create_post(State(catalog.clone()), Form(form))
            .await
            .unwrap();
        RecordId::from(page.location().unwrap().rsplit('/').next().unwrap())
    }

    #[tokio::test]
    async fn loaned_copy_returns_to_available() {
        let catalog = memory_catalog();
        let book = book(&catalog, "The Wise Man's Fear").await;
        let id = create(&catalog, submission(&book, "Loaned", "2026-11-01")).await;

        let copy = catalog.instances.get(&id).await.unwrap().unwrap();
        assert_eq!(copy.data.status, Status::Loaned);
        assert_eq!(copy.data.due_back, Some(date!(2026 - 11 - 01)));

        let page = bookinstance_update_post(
            State(catalog.clone()),
            Path(id.clone()),
            Form(submission(&book, "Available", "")),
        )
        .await
        .unwrap();
        assert_eq!(page.location(), Some(book_instance_url(&id).as_str()));

        let copy = catalog.instances.get(&id).await.unwrap().unwrap();
        assert_eq!(copy.data.status, Status::Available);
        assert_eq!(copy.data.due_back, None);
    }

    #[tokio::test]
    async fn detail_is_titled_after_the_book() {
        let catalog = memory_catalog();
        let book = book(&catalog, "The Slow Regard of Silent Things").await;
        let id = create(&catalog, submission(&book, "Available", "")).await;

        let page = bookinstance_detail(State(catalog), Path(id)).await.unwrap();
        let context = &page.view().unwrap().context;
        assert_eq!(context["title"], "Copy: The Slow Regard of Silent Things");
        assert_eq!(context["bookinstance"]["status"], "Available");
    }

    #[tokio::test]
    async fn blank_status_is_stored_as_maintenance() {
        let catalog = memory_catalog();
        let book = book(&catalog, "Apes and Angels").await;
        let id = create(&catalog, submission(&book, "", "")).await;

        let copy = catalog.instances.get(&id).await.unwrap().unwrap();
        assert_eq!(copy.data.status, Status::Maintenance);
    }

    #[tokio::test]
    async fn invalid_create_reselects_book_and_status() {
        let catalog = memory_catalog();
        let first = book(&catalog, "Apes and Angels").await;
        let second = book(&catalog, "Death Wave").await;

        let form = submission(&second, "Reserved", "someday");
        let page = bookinstance_create_post(State(catalog.clone()), Form(form))
            .await
            .unwrap();
        let context = &page.view().unwrap().context;
        assert_eq!(context["errors"][0]["msg"], "Invalid date");
        assert_eq!(context["book_list"][0]["id"], first.as_str());
        assert_eq!(context["book_list"][0]["checked"], false);
        assert_eq!(context["book_list"][1]["checked"], true);
        let reserved = context["statuses"]
            .as_array()
            .unwrap()
            .iter()
            .find(|s| s["selected"] == true)
            .unwrap();
        assert_eq!(reserved["value"], "Reserved");
        assert!(catalog.instances.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_update_shows_due_date_as_posted() {
        let catalog = memory_catalog();
        let book = book(&catalog, "Death Wave").await;
        let id = create(&catalog, submission(&book, "Loaned", "2026-11-01")).await;

        let page = bookinstance_update_post(
            State(catalog.clone()),
            Path(id.clone()),
            Form(submission(&book, "Loaned", "2026-02-30")),
        )
        .await
        .unwrap();
        let context = &page.view().unwrap().context;
        assert_eq!(context["errors"][0]["msg"], "Invalid date");
        assert_eq!(context["bookinstance"]["id"], id.as_str());
        assert_eq!(context["bookinstance"]["due_back"], "2026-02-30");
        assert_eq!(context["bookinstance"]["imprint"], "London Gollancz, 2014.");
        assert_eq!(context["book_list"][0]["checked"], true);

        let copy = catalog.instances.get(&id).await.unwrap().unwrap();
        assert_eq!(copy.data.due_back, Some(date!(2026 - 11 - 01)));
    }

    #[tokio::test]
    async fn create_without_book_or_imprint_is_rejected() {
        let catalog = memory_catalog();
        let form = Submission::new()
            .with("book", "")
            .with("imprint", "  ")
            .with("status", "Available");

        let page = bookinstance_create_post(State(catalog.clone()), Form(form))
            .await
            .unwrap();
        let view = page.view().expect("form re-rendered");
        assert_eq!(view.template, "bookinstance_form.html");
        let messages: Vec<_> = view.context["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["msg"].as_str().unwrap())
            .collect();
        assert_eq!(messages, vec!["Book must be specified", "Imprint must be specified"]);
        assert_eq!(view.context["bookinstance"]["imprint"], "");
        assert!(catalog.instances.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_tolerates_missing_book() {
        let catalog = memory_catalog();
        let orphan = RecordId::generate();
        create(&catalog, submission(&orphan, "Available", "")).await;

        let page = bookinstance_list(State(catalog)).await.unwrap();
        let list = page.view().unwrap().context["bookinstance_list"].clone();
        assert_eq!(list.as_array().unwrap().len(), 1);
        assert!(list[0]["book"].is_null());
    }

    #[tokio::test]
    async fn delete_is_unconditional() {
        let catalog = memory_catalog();
        let book = book(&catalog, "Death Wave").await;
        let id = create(&catalog, submission(&book, "Available", "")).await;

        let page = bookinstance_delete_post(
            State(catalog.clone()),
            Path(RecordId::from("ignored")),
            Form(Submission::new().with("bookinstanceid", id.as_str())),
        )
        .await
        .unwrap();
        assert_eq!(page.location(), Some("/catalog/bookinstances"));

        let err = bookinstance_detail(State(catalog), Path(id)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn update_form_for_missing_copy_is_not_found() {
        let err = bookinstance_update_get(State(memory_catalog()), Path(RecordId::from("gone")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }
}
