//! Library loan tracking service.
//!
//! # Responsibility
//! - Keep the book catalog and member registry (in memory).
//! - Track loans between books and members.
//!
//! # Invariants
//! - ISBNs and member ids are unique (trimmed, upper-cased).
//! - A book on loan is listed by exactly one member.
//! - Books on loan cannot be removed; members holding books cannot leave.
//! - A member never holds more than `loan_limit` books.
//! - `transfer` validates both sides before touching any state.

use crate::model::library::{Book, Member};
use crate::model::record::validate_name;
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type LibraryResult<T> = Result<T, LibraryError>;

/// Books a member may hold at once unless configured otherwise.
pub const DEFAULT_LOAN_LIMIT: usize = 3;

/// Error for library catalog and loan operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryError {
    DuplicateBook(String),
    BookNotFound(String),
    DuplicateMember(String),
    MemberNotFound(String),
    /// Book is already lent out.
    BookOnLoan(String),
    /// Book is not currently lent out.
    BookNotLoaned(String),
    /// Member still holds books.
    MemberHasLoans(String),
    NotBorrowedBy { isbn: String, member_id: String },
    /// Member already holds `limit` books.
    LoanLimitReached { member_id: String, limit: usize },
    /// Required text field is blank.
    EmptyField(&'static str),
}

impl Display for LibraryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateBook(isbn) => write!(f, "ISBN {isbn} already exists"),
            Self::BookNotFound(isbn) => write!(f, "book not found: {isbn}"),
            Self::DuplicateMember(id) => write!(f, "member id {id} already exists"),
            Self::MemberNotFound(id) => write!(f, "member not found: {id}"),
            Self::BookOnLoan(isbn) => write!(f, "book {isbn} is on loan"),
            Self::BookNotLoaned(isbn) => write!(f, "book {isbn} is not on loan"),
            Self::MemberHasLoans(id) => write!(f, "member {id} still holds books"),
            Self::NotBorrowedBy { isbn, member_id } => {
                write!(f, "member {member_id} does not hold book {isbn}")
            }
            Self::LoanLimitReached { member_id, limit } => {
                write!(f, "member {member_id} already holds {limit} books")
            }
            Self::EmptyField(field) => write!(f, "{field} cannot be empty"),
        }
    }
}

impl Error for LibraryError {}

/// Text field targeted by [`LibraryService::search`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookField {
    Title,
    Author,
    Category,
}

/// Catalog counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LibraryStats {
    pub books: usize,
    pub available: usize,
    pub on_loan: usize,
    pub members: usize,
}

/// Input for [`LibraryService::add_book`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub category: String,
}

/// In-memory book catalog with member loans.
#[derive(Debug, Clone)]
pub struct LibraryService {
    name: String,
    books: Vec<Book>,
    members: Vec<Member>,
    loan_limit: usize,
}

impl Default for LibraryService {
    fn default() -> Self {
        Self::new("Digital Library")
    }
}

impl LibraryService {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            books: Vec::new(),
            members: Vec::new(),
            loan_limit: DEFAULT_LOAN_LIMIT,
        }
    }

    /// Sets how many books one member may hold at once.
    pub fn with_loan_limit(mut self, limit: usize) -> Self {
        self.loan_limit = limit;
        self
    }

    pub fn loan_limit(&self) -> usize {
        self.loan_limit
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) -> LibraryResult<()> {
        self.name = required("library name", name)?;
        Ok(())
    }

    pub fn add_book(&mut self, book: NewBook) -> LibraryResult<String> {
        let isbn = normalize_key("isbn", &book.isbn)?;
        if self.book_index(&isbn).is_some() {
            return Err(LibraryError::DuplicateBook(isbn));
        }

        self.books.push(Book::new(
            isbn.clone(),
            required("title", &book.title)?,
            required("author", &book.author)?,
            required("category", &book.category)?,
        ));
        debug!("event=book_add module=library status=ok isbn={isbn}");
        Ok(isbn)
    }

    pub fn remove_book(&mut self, isbn: &str) -> LibraryResult<Book> {
        let index = self.require_book(isbn)?;
        if self.books[index].on_loan {
            return Err(LibraryError::BookOnLoan(self.books[index].isbn().to_string()));
        }
        Ok(self.books.remove(index))
    }

    pub fn set_category(&mut self, isbn: &str, category: &str) -> LibraryResult<()> {
        let index = self.require_book(isbn)?;
        self.books[index].category = required("category", category)?;
        Ok(())
    }

    pub fn register_member(&mut self, id: &str, name: &str) -> LibraryResult<String> {
        let id = normalize_key("member id", id)?;
        if self.member_index(&id).is_some() {
            return Err(LibraryError::DuplicateMember(id));
        }

        self.members
            .push(Member::new(id.clone(), required("member name", name)?));
        debug!("event=member_register module=library status=ok member={id}");
        Ok(id)
    }

    pub fn unregister_member(&mut self, id: &str) -> LibraryResult<Member> {
        let index = self.require_member(id)?;
        if !self.members[index].borrowed.is_empty() {
            return Err(LibraryError::MemberHasLoans(
                self.members[index].id().to_string(),
            ));
        }
        Ok(self.members.remove(index))
    }

    pub fn rename_member(&mut self, id: &str, name: &str) -> LibraryResult<()> {
        let index = self.require_member(id)?;
        self.members[index].name = required("member name", name)?;
        Ok(())
    }

    /// Lends an available book to a member below the loan limit.
    pub fn lend(&mut self, isbn: &str, member_id: &str) -> LibraryResult<()> {
        let book = self.require_book(isbn)?;
        let member = self.require_member(member_id)?;
        if self.books[book].on_loan {
            return Err(LibraryError::BookOnLoan(self.books[book].isbn().to_string()));
        }
        self.check_loan_limit(member)?;

        self.books[book].on_loan = true;
        let isbn = self.books[book].isbn().to_string();
        debug!(
            "event=book_lend module=library status=ok isbn={isbn} member={}",
            self.members[member].id()
        );
        self.members[member].borrowed.push(isbn);
        Ok(())
    }

    /// Returns a book held by `member_id`.
    pub fn give_back(&mut self, isbn: &str, member_id: &str) -> LibraryResult<()> {
        let (book, member, slot) = self.locate_loan(isbn, member_id)?;
        self.books[book].on_loan = false;
        self.members[member].borrowed.remove(slot);
        debug!(
            "event=book_return module=library status=ok isbn={} member={}",
            self.books[book].isbn(),
            self.members[member].id()
        );
        Ok(())
    }

    /// Moves a loan from one member to another in a single step.
    ///
    /// Fails without changes if the book is not held by `from`, `to` is
    /// unknown, or `to` is already at the loan limit.
    pub fn transfer(&mut self, isbn: &str, from: &str, to: &str) -> LibraryResult<()> {
        let (_, source, slot) = self.locate_loan(isbn, from)?;
        let target = self.require_member(to)?;
        if source == target {
            return Ok(());
        }
        self.check_loan_limit(target)?;

        let isbn = self.members[source].borrowed.remove(slot);
        self.members[target].borrowed.push(isbn);
        Ok(())
    }

    /// Case-insensitive substring search over one book field.
    pub fn search(&self, term: &str, field: BookField) -> Vec<Book> {
        let needle = term.to_lowercase();
        self.books
            .iter()
            .filter(|book| {
                let haystack = match field {
                    BookField::Title => book.title(),
                    BookField::Author => book.author(),
                    BookField::Category => book.category(),
                };
                haystack.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    pub fn get_book(&self, isbn: &str) -> Option<Book> {
        let isbn = normalize_key("isbn", isbn).ok()?;
        self.book_index(&isbn).map(|index| self.books[index].clone())
    }

    pub fn get_member(&self, id: &str) -> Option<Member> {
        let id = normalize_key("member id", id).ok()?;
        self.member_index(&id).map(|index| self.members[index].clone())
    }

    pub fn members(&self) -> Vec<Member> {
        self.members.clone()
    }

    /// Books currently held by a member, in borrow order.
    pub fn books_of(&self, member_id: &str) -> LibraryResult<Vec<Book>> {
        let member = &self.members[self.require_member(member_id)?];
        Ok(member
            .borrowed()
            .iter()
            .filter_map(|isbn| self.book_index(isbn).map(|index| self.books[index].clone()))
            .collect())
    }

    /// Lists books by loan status; `None` lists the whole catalog.
    pub fn books_by_status(&self, on_loan: Option<bool>) -> Vec<Book> {
        self.books
            .iter()
            .filter(|book| on_loan.map_or(true, |wanted| book.is_on_loan() == wanted))
            .cloned()
            .collect()
    }

    pub fn stats(&self) -> LibraryStats {
        let on_loan = self.books.iter().filter(|book| book.is_on_loan()).count();
        LibraryStats {
            books: self.books.len(),
            available: self.books.len() - on_loan,
            on_loan,
            members: self.members.len(),
        }
    }

    fn book_index(&self, isbn: &str) -> Option<usize> {
        self.books.iter().position(|book| book.isbn() == isbn)
    }

    fn member_index(&self, id: &str) -> Option<usize> {
        self.members.iter().position(|member| member.id() == id)
    }

    fn require_book(&self, isbn: &str) -> LibraryResult<usize> {
        let isbn = normalize_key("isbn", isbn)?;
        self.book_index(&isbn)
            .ok_or(LibraryError::BookNotFound(isbn))
    }

    fn require_member(&self, id: &str) -> LibraryResult<usize> {
        let id = normalize_key("member id", id)?;
        self.member_index(&id)
            .ok_or(LibraryError::MemberNotFound(id))
    }

    fn check_loan_limit(&self, member: usize) -> LibraryResult<()> {
        let member = &self.members[member];
        if member.borrowed().len() >= self.loan_limit {
            return Err(LibraryError::LoanLimitReached {
                member_id: member.id().to_string(),
                limit: self.loan_limit,
            });
        }
        Ok(())
    }

    /// Returns `(book index, member index, slot in member.borrowed)`.
    fn locate_loan(&self, isbn: &str, member_id: &str) -> LibraryResult<(usize, usize, usize)> {
        let book = self.require_book(isbn)?;
        let member = self.require_member(member_id)?;
        let isbn = self.books[book].isbn();
        if !self.books[book].on_loan {
            return Err(LibraryError::BookNotLoaned(isbn.to_string()));
        }

        let slot = self.members[member]
            .borrowed()
            .iter()
            .position(|held| held == isbn)
            .ok_or_else(|| LibraryError::NotBorrowedBy {
                isbn: isbn.to_string(),
                member_id: self.members[member].id().to_string(),
            })?;
        Ok((book, member, slot))
    }
}

fn normalize_key(field: &'static str, raw: &str) -> LibraryResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LibraryError::EmptyField(field));
    }
    Ok(trimmed.to_uppercase())
}

fn required(field: &'static str, raw: &str) -> LibraryResult<String> {
    validate_name(raw).map_err(|_| LibraryError::EmptyField(field))
}
