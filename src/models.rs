//! Plain data holders mirroring the three SQLite tables. Field order follows
//! the column order declared in the schema so `cells()` can feed table views
//! directly.

use std::fmt;

use crate::db::LibraryTable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub genre: String,
    /// Free text, nominally `YYYY-MM-DD`.
    pub publication_date: String,
    pub isbn: String,
    pub available: bool,
}

impl Book {
    pub fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.title.clone(),
            self.author.clone(),
            self.genre.clone(),
            self.publication_date.clone(),
            self.isbn.clone(),
            if self.available { "Yes" } else { "No" }.to_string(),
        ]
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.author.trim().is_empty() {
            write!(f, "{}", self.title)
        } else {
            write!(f, "{} - {}", self.title, self.author)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Borrower {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl Borrower {
    pub fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.email.clone(),
            self.phone.clone(),
            self.address.clone(),
        ]
    }
}

impl fmt::Display for Borrower {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A loan of one book to one borrower. `book_id` and `borrower_id` are not
/// guaranteed to point at existing rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkout {
    pub id: String,
    pub book_id: String,
    pub borrower_id: String,
    pub checkout_date: String,
    pub due_date: String,
    /// `None` while the book is still out.
    pub return_date: Option<String>,
}

impl Checkout {
    pub fn is_open(&self) -> bool {
        self.return_date.is_none()
    }

    pub fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.book_id.clone(),
            self.borrower_id.clone(),
            self.checkout_date.clone(),
            self.due_date.clone(),
            self.return_date.clone().unwrap_or_default(),
        ]
    }
}

impl fmt::Display for Checkout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.book_id, self.borrower_id)
    }
}

/// One row from any of the three tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Book(Book),
    Borrower(Borrower),
    Checkout(Checkout),
}

impl Record {
    /// The table this row was read from.
    pub fn table(&self) -> LibraryTable {
        match self {
            Record::Book(_) => LibraryTable::Books,
            Record::Borrower(_) => LibraryTable::Borrowers,
            Record::Checkout(_) => LibraryTable::Checkouts,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Record::Book(book) => &book.id,
            Record::Borrower(borrower) => &borrower.id,
            Record::Checkout(checkout) => &checkout.id,
        }
    }

    pub fn cells(&self) -> Vec<String> {
        match self {
            Record::Book(book) => book.cells(),
            Record::Borrower(borrower) => borrower.cells(),
            Record::Checkout(checkout) => checkout.cells(),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Record::Book(book) => fmt::Display::fmt(book, f),
            Record::Borrower(borrower) => fmt::Display::fmt(borrower, f),
            Record::Checkout(checkout) => fmt::Display::fmt(checkout, f),
        }
    }
}
