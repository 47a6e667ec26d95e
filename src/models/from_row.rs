use rusqlite::{Connection, Params, Row};

/// Decode a model from a `SELECT *` row (or a row carrying the same column names).
pub trait FromSqliteRow: Sized {
    fn from_row(row: &Row) -> rusqlite::Result<Self>;
}

/// Run a query and decode every row.
pub fn query_all<T: FromSqliteRow>(
    conn: &Connection,
    sql: &str,
    params: impl Params,
) -> rusqlite::Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, T::from_row)?;
    rows.collect()
}
