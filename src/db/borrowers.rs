use rusqlite::{params, Connection, Row};
use tracing::debug;

use crate::error::StoreResult;
use crate::models::Borrower;

use super::records::LibraryTable;

fn row_to_borrower(row: &Row) -> rusqlite::Result<Borrower> {
    Ok(Borrower {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        address: row.get(4)?,
    })
}

/// Every borrower in insertion order.
pub fn fetch_borrowers(conn: &Connection) -> StoreResult<Vec<Borrower>> {
    let mut stmt = conn.prepare("SELECT id, name, email, phone, address FROM borrowers")?;

    let borrowers = stmt
        .query_map([], row_to_borrower)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(borrowers)
}

/// Insert a borrower and return the generated `U…` id.
pub fn insert_borrower(
    conn: &Connection,
    name: &str,
    email: &str,
    phone: &str,
    address: &str,
) -> StoreResult<String> {
    let id = LibraryTable::Borrowers.new_id();
    conn.execute(
        "INSERT INTO borrowers (id, name, email, phone, address) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![id, name, email, phone, address],
    )?;
    debug!(%id, name, "inserted borrower");
    Ok(id)
}
