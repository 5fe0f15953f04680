use rusqlite::{params, Connection, Row};
use tracing::debug;

use crate::error::StoreResult;
use crate::models::Book;

use super::records::LibraryTable;

/// Map a `SELECT id, title, author, genre, publication_date, isbn, available`
/// row. `available` is stored as 0/1.
fn row_to_book(row: &Row) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get(0)?,
        title: row.get(1)?,
        author: row.get(2)?,
        genre: row.get(3)?,
        publication_date: row.get(4)?,
        isbn: row.get(5)?,
        available: row.get::<_, i64>(6)? != 0,
    })
}

/// Escape LIKE wildcards so the search term matches literally.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Every book in insertion order.
pub fn fetch_books(conn: &Connection) -> StoreResult<Vec<Book>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, author, genre, publication_date, isbn, available FROM books",
    )?;

    let books = stmt
        .query_map([], row_to_book)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(books)
}

/// Insert a book and return its freshly generated id. No field is validated;
/// empty strings are stored as-is.
pub fn insert_book(
    conn: &Connection,
    title: &str,
    author: &str,
    genre: &str,
    publication_date: &str,
    isbn: &str,
    available: bool,
) -> StoreResult<String> {
    let id = LibraryTable::Books.new_id();
    conn.execute(
        "INSERT INTO books (id, title, author, genre, publication_date, isbn, available)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            id,
            title,
            author,
            genre,
            publication_date,
            isbn,
            i64::from(available)
        ],
    )?;
    debug!(%id, title, "inserted book");
    Ok(id)
}

/// Case-insensitive substring search across title, author, genre and isbn.
/// A row qualifies when any one of the four columns contains `term`. An empty
/// term matches every book.
///
/// Case folding comes from SQLite's `LIKE`, which only folds ASCII letters:
/// `"émile"` does not match `"Émile"`.
pub fn search_books(conn: &Connection, term: &str) -> StoreResult<Vec<Book>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, author, genre, publication_date, isbn, available
         FROM books
         WHERE title LIKE ?1 ESCAPE '\\'
            OR author LIKE ?1 ESCAPE '\\'
            OR genre LIKE ?1 ESCAPE '\\'
            OR isbn LIKE ?1 ESCAPE '\\'",
    )?;

    let books = stmt
        .query_map([like_pattern(term)], row_to_book)?
        .collect::<Result<Vec<_>, _>>()?;

    debug!(term, matches = books.len(), "searched books");
    Ok(books)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::create_tables;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        insert_book(
            &conn,
            "Dune",
            "Frank Herbert",
            "Science fiction",
            "1965-08-01",
            "9780441013593",
            true,
        )
        .unwrap();
        insert_book(
            &conn,
            "Foundation",
            "Isaac Asimov",
            "Science fiction",
            "1951-06-01",
            "9780553293357",
            false,
        )
        .unwrap();
        conn
    }

    fn titles(books: &[Book]) -> Vec<&str> {
        books.iter().map(|book| book.title.as_str()).collect()
    }

    #[test]
    fn stores_available_flag_as_integer() {
        let conn = setup();
        let flags: Vec<i64> = conn
            .prepare("SELECT available FROM books")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(flags, vec![1, 0]);

        let books = fetch_books(&conn).unwrap();
        assert!(books[0].available);
        assert!(!books[1].available);
    }

    #[test]
    fn search_ignores_case() {
        let conn = setup();
        assert_eq!(titles(&search_books(&conn, "dUnE").unwrap()), vec!["Dune"]);
    }

    #[test]
    fn search_matches_any_column() {
        let conn = setup();
        assert_eq!(titles(&search_books(&conn, "asimov").unwrap()), vec!["Foundation"]);
        assert_eq!(titles(&search_books(&conn, "0441").unwrap()), vec!["Dune"]);
        assert_eq!(
            titles(&search_books(&conn, "fiction").unwrap()),
            vec!["Dune", "Foundation"]
        );
    }

    #[test]
    fn search_does_not_look_at_publication_date() {
        let conn = setup();
        assert!(search_books(&conn, "1965").unwrap().is_empty());
    }

    #[test]
    fn wildcards_match_literally() {
        let conn = setup();
        assert!(search_books(&conn, "%").unwrap().is_empty());
        assert!(search_books(&conn, "D_ne").unwrap().is_empty());

        insert_book(&conn, "100% Cotton", "", "", "", "", true).unwrap();
        assert_eq!(titles(&search_books(&conn, "0%").unwrap()), vec!["100% Cotton"]);
    }

    #[test]
    fn case_folding_is_ascii_only() {
        let conn = setup();
        insert_book(&conn, "Émile", "Rousseau", "", "", "", true).unwrap();
        assert!(search_books(&conn, "émile").unwrap().is_empty());
        assert_eq!(titles(&search_books(&conn, "ROUSSEAU").unwrap()), vec!["Émile"]);
    }

    #[test]
    fn empty_term_returns_everything() {
        let conn = setup();
        assert_eq!(search_books(&conn, "").unwrap().len(), 2);
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("a_b%c\\"), "%a\\_b\\%c\\\\%");
    }
}
