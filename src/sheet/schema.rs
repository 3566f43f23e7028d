pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS cells (
    worksheet TEXT NOT NULL,
    row_idx   INTEGER NOT NULL,
    col_idx   INTEGER NOT NULL,
    value     TEXT NOT NULL DEFAULT '',
    PRIMARY KEY (worksheet, row_idx, col_idx)
);
"#;

pub(crate) const CURRENT_VERSION: i32 = 1;

/// Migrations from version N to N+1.
/// Each entry is (from_version, sql).
pub(crate) const MIGRATIONS: &[(i32, &str)] = &[];
