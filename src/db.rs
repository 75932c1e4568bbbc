use std::path::Path;

use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, Row};

use crate::{Joke, Result};

pub fn connect(path: impl AsRef<Path>) -> Result<Connection> {
    let conn = Connection::open(path)?;
    create_table(&conn)?;
    Ok(conn)
}

pub fn create_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS jokes (
            id    INTEGER,
            jokes TEXT,
            likes TEXT,
            date  TEXT
        );
        ",
    )?;
    Ok(())
}

/// Inserts all the jokes in a single transaction.
/// Rows are appended as they are, duplicate ids included.
pub fn insert_jokes(conn: &mut Connection, jokes: &[Joke]) -> Result<usize> {
    let tx = conn.transaction()?;
    {
        let mut stmt =
            tx.prepare("INSERT INTO jokes (id, jokes, likes, date) VALUES (?1, ?2, ?3, ?4)")?;
        for joke in jokes {
            stmt.execute(params![joke.id, joke.text, joke.likes, joke.date])?;
        }
    }
    tx.commit()?;
    Ok(jokes.len())
}

/// Reads back every stored joke in insertion order.
pub fn read_jokes(conn: &Connection) -> Result<Vec<Joke>> {
    let mut stmt = conn.prepare("SELECT id, jokes, likes, date FROM jokes ORDER BY rowid")?;
    let jokes = stmt
        .query_map([], |row| {
            Ok(Joke {
                id: text_column(row, 0)?,
                text: text_column(row, 1)?,
                likes: text_column(row, 2)?,
                date: text_column(row, 3)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(jokes)
}

/// The `id` column has integer affinity, so numeric ids come back as integers.
fn text_column(row: &Row, idx: usize) -> rusqlite::Result<String> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => String::new(),
        ValueRef::Integer(n) => n.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) | ValueRef::Blob(t) => String::from_utf8_lossy(t).into_owned(),
    })
}
