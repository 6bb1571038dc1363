use stockroom_core::{
    BookField, LibraryError, LibraryService, LibraryStats, NewBook, DEFAULT_LOAN_LIMIT,
};

fn book(isbn: &str, title: &str, author: &str, category: &str) -> NewBook {
    NewBook {
        isbn: isbn.to_string(),
        title: title.to_string(),
        author: author.to_string(),
        category: category.to_string(),
    }
}

fn library() -> LibraryService {
    let mut library = LibraryService::default();
    library
        .add_book(book("001", "1984", "George Orwell", "Dystopia"))
        .unwrap();
    library
        .add_book(book("002", "The Little Prince", "Saint-Exupery", "Philosophy"))
        .unwrap();
    library.register_member("u1", "Oscar").unwrap();
    library.register_member("u2", "Alejandro").unwrap();
    library
}

#[test]
fn duplicate_book_and_member_are_rejected() {
    let mut library = library();
    assert_eq!(
        library.add_book(book(" 001 ", "Copy", "Someone", "Misc")),
        Err(LibraryError::DuplicateBook("001".to_string()))
    );
    assert_eq!(
        library.register_member("U1", "Other"),
        Err(LibraryError::DuplicateMember("U1".to_string()))
    );
}

#[test]
fn blank_fields_are_rejected() {
    let mut library = library();
    assert_eq!(
        library.add_book(book("003", " ", "Author", "Misc")),
        Err(LibraryError::EmptyField("title"))
    );
    assert_eq!(
        library.register_member("", "Nobody"),
        Err(LibraryError::EmptyField("member id"))
    );
}

#[test]
fn lend_and_give_back_track_loan_state() {
    let mut library = library();
    library.lend("001", "u1").unwrap();

    assert!(library.get_book("001").unwrap().is_on_loan());
    assert_eq!(library.get_member("U1").unwrap().borrowed(), ["001"]);
    assert_eq!(
        library.lend("001", "u2"),
        Err(LibraryError::BookOnLoan("001".to_string()))
    );

    assert_eq!(
        library.give_back("001", "u2"),
        Err(LibraryError::NotBorrowedBy {
            isbn: "001".to_string(),
            member_id: "U2".to_string(),
        })
    );
    library.give_back("001", "u1").unwrap();
    assert!(!library.get_book("001").unwrap().is_on_loan());
    assert!(library.get_member("u1").unwrap().borrowed().is_empty());
    assert_eq!(
        library.give_back("001", "u1"),
        Err(LibraryError::BookNotLoaned("001".to_string()))
    );
}

#[test]
fn transfer_moves_loan_without_partial_changes() {
    let mut library = library();
    library.lend("002", "u1").unwrap();

    assert_eq!(
        library.transfer("002", "u1", "nobody"),
        Err(LibraryError::MemberNotFound("NOBODY".to_string()))
    );
    assert_eq!(library.get_member("u1").unwrap().borrowed(), ["002"]);

    library.transfer("002", "u1", "u2").unwrap();
    assert!(library.get_member("u1").unwrap().borrowed().is_empty());
    assert_eq!(library.books_of("u2").unwrap()[0].title(), "The Little Prince");
    assert!(library.get_book("002").unwrap().is_on_loan());
}

#[test]
fn loans_block_removal_and_unregistration() {
    let mut library = library();
    library.lend("001", "u1").unwrap();

    assert_eq!(
        library.remove_book("001"),
        Err(LibraryError::BookOnLoan("001".to_string()))
    );
    assert_eq!(
        library.unregister_member("u1"),
        Err(LibraryError::MemberHasLoans("U1".to_string()))
    );

    library.give_back("001", "u1").unwrap();
    library.remove_book("001").unwrap();
    library.unregister_member("u1").unwrap();
    assert!(library.get_book("001").is_none());
    assert!(library.get_member("u1").is_none());
}

#[test]
fn search_and_status_listing() {
    let mut library = library();
    library.set_category("002", "Classics").unwrap();
    library.lend("001", "u2").unwrap();

    let hits = library.search("ORWELL", BookField::Author);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].isbn(), "001");
    assert_eq!(library.search("class", BookField::Category).len(), 1);
    assert!(library.search("prince", BookField::Author).is_empty());

    assert_eq!(library.books_by_status(None).len(), 2);
    assert_eq!(library.books_by_status(Some(true))[0].isbn(), "001");
    assert_eq!(library.books_by_status(Some(false))[0].isbn(), "002");
}

#[test]
fn stats_count_books_and_members() {
    let mut library = library();
    library.lend("001", "u1").unwrap();
    library.rename_member("u1", "Oscar P.").unwrap();
    library.set_name("City Library").unwrap();

    assert_eq!(
        library.stats(),
        LibraryStats {
            books: 2,
            available: 1,
            on_loan: 1,
            members: 2,
        }
    );
    assert_eq!(library.name(), "City Library");
    assert_eq!(library.get_member("u1").unwrap().name(), "Oscar P.");
    assert!(matches!(
        library.books_of("ghost"),
        Err(LibraryError::MemberNotFound(_))
    ));
}

#[test]
fn lend_stops_at_default_loan_limit() {
    let mut library = library();
    for isbn in ["003", "004", "005"] {
        library
            .add_book(book(isbn, "Extra", "Author", "Misc"))
            .unwrap();
    }
    assert_eq!(library.loan_limit(), DEFAULT_LOAN_LIMIT);

    for isbn in ["001", "002", "003"] {
        library.lend(isbn, "u1").unwrap();
    }
    assert_eq!(
        library.lend("004", "u1"),
        Err(LibraryError::LoanLimitReached {
            member_id: "U1".to_string(),
            limit: 3,
        })
    );
    assert!(!library.get_book("004").unwrap().is_on_loan());
    assert_eq!(library.get_member("u1").unwrap().borrowed().len(), 3);

    library.give_back("002", "u1").unwrap();
    library.lend("004", "u1").unwrap();
}

#[test]
fn transfer_to_member_at_limit_changes_nothing() {
    let mut library = library().with_loan_limit(1);
    library.lend("001", "u1").unwrap();
    library.lend("002", "u2").unwrap();

    assert_eq!(
        library.transfer("001", "u1", "u2"),
        Err(LibraryError::LoanLimitReached {
            member_id: "U2".to_string(),
            limit: 1,
        })
    );
    assert_eq!(library.get_member("u1").unwrap().borrowed(), ["001"]);
    assert_eq!(library.get_member("u2").unwrap().borrowed(), ["002"]);

    // Transferring to the current holder is still a no-op.
    library.transfer("001", "u1", "U1").unwrap();
    assert_eq!(library.get_member("u1").unwrap().borrowed(), ["001"]);
}

#[test]
fn zero_loan_limit_blocks_every_loan() {
    let mut library = library().with_loan_limit(0);
    assert_eq!(
        library.lend("001", "u1"),
        Err(LibraryError::LoanLimitReached {
            member_id: "U1".to_string(),
            limit: 0,
        })
    );
    assert_eq!(library.stats().on_loan, 0);
}
