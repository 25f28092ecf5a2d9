use ::duckdb::Connection;

struct Migration {
    version: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "0001_dividend_tables",
        sql: r#"
CREATE TABLE IF NOT EXISTS dividend_data_table (
    "Symbol" TEXT PRIMARY KEY,
    "Company" TEXT,
    "Sector" TEXT,
    "No Years" DOUBLE,
    "Price" DOUBLE,
    "Div Yield" DOUBLE,
    "5Y Avg Yield" DOUBLE,
    "Current Div" DOUBLE,
    "Payouts/ Year" DOUBLE,
    "Annualized" DOUBLE,
    "Low" DOUBLE,
    "High" DOUBLE,
    "DGR 1Y" DOUBLE,
    "DGR 3Y" DOUBLE,
    "DGR 5Y" DOUBLE,
    "DGR 10Y" DOUBLE,
    "TTR 1Y" DOUBLE,
    "TTR 3Y" DOUBLE,
    "Fair Value" DOUBLE,
    "FV %" DOUBLE,
    "Chowder Number" DOUBLE,
    "EPS 1Y" DOUBLE,
    "Revenue 1Y" DOUBLE,
    "NPM" DOUBLE,
    "CF/Share" DOUBLE,
    "ROE" DOUBLE,
    "Debt/Capital" DOUBLE,
    "ROTC" DOUBLE,
    "P/E" DOUBLE,
    "P/BV" DOUBLE,
    "PEG" DOUBLE,
    "Industry" TEXT
);

CREATE TABLE IF NOT EXISTS dividend_update_times (
    name TEXT PRIMARY KEY,
    last_update_time TEXT NOT NULL
);
"#,
    },
];

/// Bring the schema up to date. Already-applied versions are skipped.
pub fn apply_migrations(connection: &Connection) -> Result<(), ::duckdb::Error> {
    connection.execute_batch(
        r#"
CREATE TABLE IF NOT EXISTS schema_migrations (
    version TEXT PRIMARY KEY,
    applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
"#,
    )?;

    for migration in MIGRATIONS {
        let applied_count: i64 = connection.query_row(
            "SELECT COUNT(*) FROM schema_migrations WHERE version = ?",
            [migration.version],
            |row| row.get(0),
        )?;

        if applied_count == 0 {
            tracing::debug!(version = migration.version, "applying warehouse migration");
            connection.execute_batch(migration.sql)?;
            connection.execute(
                "INSERT INTO schema_migrations (version) VALUES (?)",
                [migration.version],
            )?;
        }
    }

    Ok(())
}
