//! Library catalog model: books and members.
//!
//! # Invariants
//! - Book title and author are fixed at creation; only `category` and the
//!   loan flag change afterwards.
//! - `Book::on_loan` is true iff exactly one member lists the ISBN in
//!   `Member::borrowed` (maintained by `LibraryService`).

use std::fmt::{Display, Formatter};

/// Catalog entry keyed by normalized ISBN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    isbn: String,
    title: String,
    author: String,
    pub(crate) category: String,
    pub(crate) on_loan: bool,
}

impl Book {
    pub(crate) fn new(isbn: String, title: String, author: String, category: String) -> Self {
        Self {
            isbn,
            title,
            author,
            category,
            on_loan: false,
        }
    }

    pub fn isbn(&self) -> &str {
        &self.isbn
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn is_on_loan(&self) -> bool {
        self.on_loan
    }
}

impl Display for Book {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let status = if self.on_loan { "on loan" } else { "available" };
        write!(
            f,
            "'{}' by {} - {} [{status}]",
            self.title, self.author, self.category
        )
    }
}

/// Registered library member and the ISBNs they currently hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    id: String,
    pub(crate) name: String,
    pub(crate) borrowed: Vec<String>,
}

impl Member {
    pub(crate) fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            borrowed: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// ISBNs in borrow order.
    pub fn borrowed(&self) -> &[String] {
        &self.borrowed
    }
}

impl Display for Member {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (ID: {}) - {} book(s)",
            self.name,
            self.id,
            self.borrowed.len()
        )
    }
}
