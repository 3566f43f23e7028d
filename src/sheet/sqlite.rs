use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};

use super::{pad_rows, schema, SheetError, Worksheet};

enum Location {
    File(PathBuf),
    #[cfg(test)]
    Memory,
}

/// A worksheet stored as individual cells in a SQLite database.
///
/// Several worksheets can share one database file. The connection is opened
/// on first use; if opening fails the next call tries again.
pub(crate) struct SqliteWorksheet {
    location: Location,
    title: String,
    conn: Option<Connection>,
}

impl SqliteWorksheet {
    pub(crate) fn new(path: &Path, title: &str) -> Self {
        Self {
            location: Location::File(path.to_path_buf()),
            title: title.to_string(),
            conn: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn in_memory(title: &str) -> Self {
        Self {
            location: Location::Memory,
            title: title.to_string(),
            conn: None,
        }
    }

    fn connection(&mut self) -> Result<&mut Connection, SheetError> {
        if self.conn.is_none() {
            let conn = open(&self.location)?;
            log::debug!("Opened worksheet store for '{}'", self.title);
            self.conn = Some(conn);
        }
        self.conn
            .as_mut()
            .ok_or_else(|| SheetError::Connection("connection not available".into()))
    }
}

fn open(location: &Location) -> Result<Connection, SheetError> {
    let conn = match location {
        Location::File(path) => {
            let conn = Connection::open(path).map_err(|e| {
                SheetError::Connection(format!("{}: {e}", path.display()))
            })?;
            conn.execute_batch("PRAGMA journal_mode=WAL;")
                .map_err(|e| SheetError::Connection(e.to_string()))?;
            conn
        }
        #[cfg(test)]
        Location::Memory => {
            Connection::open_in_memory().map_err(|e| SheetError::Connection(e.to_string()))?
        }
    };
    migrate(&conn).map_err(|e| SheetError::Connection(format!("migration failed: {e}")))?;
    Ok(conn)
}

fn migrate(conn: &Connection) -> rusqlite::Result<()> {
    let has_version_table: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| row.get(0),
    )?;

    if !has_version_table {
        // Fresh database - apply full schema
        conn.execute_batch(schema::SCHEMA_V1)?;
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            params![schema::CURRENT_VERSION],
        )?;
        return Ok(());
    }

    let current: i32 = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .unwrap_or(0);

    for &(from_version, sql) in schema::MIGRATIONS {
        if current <= from_version {
            conn.execute_batch(sql)?;
        }
    }

    if current < schema::CURRENT_VERSION {
        conn.execute(
            "UPDATE schema_version SET version = ?1",
            params![schema::CURRENT_VERSION],
        )?;
    }

    Ok(())
}

fn read_err(e: rusqlite::Error) -> SheetError {
    SheetError::Read(e.to_string())
}

fn write_err(e: rusqlite::Error) -> SheetError {
    SheetError::Write(e.to_string())
}

fn to_index(value: i64) -> Result<usize, SheetError> {
    usize::try_from(value).map_err(|_| SheetError::Read(format!("invalid cell index {value}")))
}

fn to_key(value: usize) -> Result<i64, SheetError> {
    i64::try_from(value).map_err(|_| SheetError::Write(format!("cell index {value} out of range")))
}

impl Worksheet for SqliteWorksheet {
    fn title(&self) -> &str {
        &self.title
    }

    fn get_all_values(&mut self) -> Result<Vec<Vec<String>>, SheetError> {
        let title = self.title.clone();
        let conn = self.connection()?;
        let mut stmt = conn
            .prepare(
                "SELECT row_idx, col_idx, value FROM cells
                 WHERE worksheet = ?1 ORDER BY row_idx, col_idx",
            )
            .map_err(read_err)?;
        let cells = stmt
            .query_map(params![title], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })
            .map_err(read_err)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(read_err)?;

        let mut rows: Vec<Vec<String>> = Vec::new();
        for (r, c, value) in cells {
            let (r, c) = (to_index(r)?, to_index(c)?);
            if rows.len() <= r {
                rows.resize_with(r + 1, Vec::new);
            }
            let row = &mut rows[r];
            if row.len() <= c {
                row.resize(c + 1, String::new());
            }
            row[c] = value;
        }
        pad_rows(&mut rows);
        Ok(rows)
    }

    fn header(&mut self) -> Result<Vec<String>, SheetError> {
        let title = self.title.clone();
        let conn = self.connection()?;
        let mut stmt = conn
            .prepare(
                "SELECT col_idx, value FROM cells
                 WHERE worksheet = ?1 AND row_idx = 0 ORDER BY col_idx",
            )
            .map_err(read_err)?;
        let cells = stmt
            .query_map(params![title], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(read_err)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(read_err)?;

        let mut header = Vec::new();
        for (c, value) in cells {
            let c = to_index(c)?;
            if header.len() <= c {
                header.resize(c + 1, String::new());
            }
            header[c] = value;
        }
        Ok(header)
    }

    fn append_row(&mut self, cells: &[String]) -> Result<(), SheetError> {
        let title = self.title.clone();
        let conn = self.connection()?;
        let tx = conn.transaction().map_err(write_err)?;
        let next_row: i64 = tx
            .query_row(
                "SELECT COALESCE(MAX(row_idx) + 1, 0) FROM cells
                 WHERE worksheet = ?1 AND value != ''",
                params![title],
                |row| row.get(0),
            )
            .map_err(write_err)?;
        for (c, value) in cells.iter().enumerate() {
            tx.execute(
                "INSERT OR REPLACE INTO cells (worksheet, row_idx, col_idx, value)
                 VALUES (?1, ?2, ?3, ?4)",
                params![title, next_row, to_key(c)?, value],
            )
            .map_err(write_err)?;
        }
        tx.commit().map_err(write_err)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SheetError> {
        let title = self.title.clone();
        let conn = self.connection()?;
        conn.execute("DELETE FROM cells WHERE worksheet = ?1", params![title])
            .map_err(write_err)?;
        Ok(())
    }

    fn update(&mut self, rows: &[Vec<String>]) -> Result<(), SheetError> {
        let title = self.title.clone();
        let conn = self.connection()?;
        let tx = conn.transaction().map_err(write_err)?;
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                tx.execute(
                    "INSERT OR REPLACE INTO cells (worksheet, row_idx, col_idx, value)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![title, to_key(r)?, to_key(c)?, value],
                )
                .map_err(write_err)?;
            }
        }
        tx.commit().map_err(write_err)?;
        Ok(())
    }
}
