//! A small demo catalog for local runs.

use libris_db::{RecordId, Result};
use time::macros::date;
use time::Date;

use crate::catalog::Catalog;
use crate::modules::authors::models::Author;
use crate::modules::book_instances::models::{BookInstance, Status};
use crate::modules::books::models::Book;
use crate::modules::genres::models::Genre;

/// Number of records written by [`seed`], per collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub authors: usize,
    pub genres: usize,
    pub books: usize,
    pub book_instances: usize,
}

const AUTHORS: &[(&str, &str, Option<Date>, Option<Date>)] = &[
    ("Patrick", "Rothfuss", Some(date!(1973 - 06 - 06)), None),
    ("Ben", "Bova", Some(date!(1932 - 11 - 08)), None),
    ("Isaac", "Asimov", Some(date!(1920 - 01 - 02)), Some(date!(1992 - 04 - 06))),
    ("Bob", "Billings", None, None),
    ("Jim", "Jones", Some(date!(1971 - 12 - 16)), None),
];

const GENRES: &[&str] = &["Fantasy", "Science Fiction", "French Poetry"];

/// (title, summary, isbn, author index, genre indexes)
const BOOKS: &[(&str, &str, &str, usize, &[usize])] = &[
    (
        "The Name of the Wind",
        "I have stolen princesses back from sleeping barrow kings. I burned down the town of Trebon.",
        "9781473211896",
        0,
        &[0],
    ),
    (
        "The Wise Man's Fear",
        "Picking up the tale of Kvothe Kingkiller once again, we follow him into exile.",
        "9788401352836",
        0,
        &[0],
    ),
    (
        "The Slow Regard of Silent Things",
        "Deep below the University, there is a dark place.",
        "9780756411336",
        0,
        &[0],
    ),
    (
        "Apes and Angels",
        "Humankind headed out to the stars not for conquest, nor exploration, nor even for curiosity.",
        "9780765379528",
        1,
        &[1],
    ),
    (
        "Death Wave",
        "In Ben Bova's previous novel New Earth, Jordan Kell led the first human mission beyond the solar system.",
        "9780765379504",
        1,
        &[1],
    ),
    ("Test Book 1", "Summary of test book 1", "ISBN111111", 3, &[0, 1]),
    ("Test Book 2", "Summary of test book 2", "ISBN222222", 3, &[]),
];

/// (book index, imprint, status, due back)
const COPIES: &[(usize, &str, Status, Option<Date>)] = &[
    (0, "London Gollancz, 2014.", Status::Available, None),
    (1, "Gollancz, 2011.", Status::Loaned, Some(date!(2026 - 11 - 01))),
    (2, "Gollancz, 2015.", Status::Available, None),
    (3, "New York Tom Doherty Associates, 2016.", Status::Available, None),
    (3, "New York Tom Doherty Associates, 2016.", Status::Available, None),
    (3, "New York Tom Doherty Associates, 2016.", Status::Available, None),
    (4, "New York, NY Tom Doherty Associates, LLC, 2015.", Status::Available, None),
    (4, "New York, NY Tom Doherty Associates, LLC, 2015.", Status::Maintenance, None),
    (4, "New York, NY Tom Doherty Associates, LLC, 2015.", Status::Loaned, None),
    (0, "Imprint XXX2", Status::Available, None),
    (1, "Imprint XXX3", Status::Available, None),
];

/// Write the demo catalog. Records are added alongside whatever is stored.
pub async fn seed(catalog: &Catalog) -> Result<SeedSummary> {
    let mut authors = Vec::with_capacity(AUTHORS.len());
    for &(first_name, family_name, date_of_birth, date_of_death) in AUTHORS {
        let author = Author {
            first_name: first_name.to_string(),
            family_name: family_name.to_string(),
            date_of_birth,
            date_of_death,
        };
        authors.push(catalog.authors.insert(author).await?.id);
    }

    let mut genres = Vec::with_capacity(GENRES.len());
    for &name in GENRES {
        let genre = Genre {
            name: name.to_string(),
        };
        genres.push(catalog.genres.insert(genre).await?.id);
    }

    let mut books = Vec::with_capacity(BOOKS.len());
    for &(title, summary, isbn, author, genre) in BOOKS {
        let book = Book {
            title: title.to_string(),
            summary: summary.to_string(),
            isbn: isbn.to_string(),
            author: authors[author].clone(),
            genre: genre.iter().map(|&g| genres[g].clone()).collect(),
        };
        books.push(catalog.books.insert(book).await?.id);
    }

    let mut copies: Vec<RecordId> = Vec::with_capacity(COPIES.len());
    for &(book, imprint, status, due_back) in COPIES {
        let copy = BookInstance {
            book: books[book].clone(),
            imprint: imprint.to_string(),
            status,
            due_back,
        };
        copies.push(catalog.instances.insert(copy).await?.id);
    }

    let summary = SeedSummary {
        authors: authors.len(),
        genres: genres.len(),
        books: books.len(),
        book_instances: copies.len(),
    };
    tracing::info!(
        authors = summary.authors,
        genres = summary.genres,
        books = summary.books,
        book_instances = summary.book_instances,
        "demo catalog seeded"
    );
    Ok(summary)
}
