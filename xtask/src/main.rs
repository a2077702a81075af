// Copyright (C) 2024-2025 Fred Clausen and the ratatui project contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask - Project Automation and Local Development Host
//!
//! ### Development Commands
//!
//! - `cargo xtask dev`: Applies migrations to a file database and runs the server against it
//! - `cargo xtask migrate`: Applies migrations to a file database only
//! - `cargo xtask verify-schema`: Checks that the migrated schema has every
//!   expected table, column, cascading foreign key and index
//!
//! ### Quality Commands
//!
//! - `cargo xtask ci`: Lint, build, test, and schema verification
//! - `cargo xtask test`: Runs all tests against isolated in-memory `SQLite` databases

#![deny(
    clippy::pedantic,
    //clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::{io, process::Output};

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{eyre::Context, Result};
use diesel::sql_types::{Integer, Text};
use diesel::{Connection, QueryableByName, RunQueryDsl, SqliteConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use duct::cmd;
use pizzeria_persistence::Persistence;
use std::collections::{BTreeMap, BTreeSet};
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

const DEFAULT_DATABASE: &str = "pizzeria.db";

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../crates/persistence/migrations");

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<()> {
        self.command.run()
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run CI checks (lint, build, test, schema verification)
    CI,

    /// Build the project
    #[command(visible_alias = "b")]
    Build,

    /// Run cargo check
    #[command(visible_alias = "c")]
    Check,

    /// Lint formatting, clippy, and docs
    #[command(visible_alias = "l")]
    Lint,

    /// Run clippy on the project
    #[command(visible_alias = "cl")]
    LintClippy,

    /// Check documentation for errors and warnings
    #[command(visible_alias = "d")]
    LintDocs,

    /// Check for formatting issues in the project
    #[command(visible_alias = "lf")]
    LintFormatting,

    /// Fix clippy warnings in the project
    #[command(visible_alias = "fc")]
    FixClippy,

    /// Fix formatting issues in the project
    #[command(visible_alias = "fmt")]
    FixFormatting,

    /// Run tests
    #[command(visible_alias = "t")]
    Test,

    /// Apply migrations to a `SQLite` database file
    #[command(visible_alias = "m")]
    Migrate {
        /// Database file to migrate
        #[arg(long, default_value = DEFAULT_DATABASE)]
        database: String,
    },

    /// Verify the migrated schema against the expected layout
    #[command(visible_alias = "vs")]
    VerifySchema {
        /// Database file to verify. A fresh in-memory database when absent.
        #[arg(long)]
        database: Option<String>,
    },

    /// Migrate a database file and run the server against it
    Dev {
        /// Database file for the server
        #[arg(long, default_value = DEFAULT_DATABASE)]
        database: String,

        /// Port for the server
        #[arg(long, default_value_t = 3000)]
        port: u16,
    },
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Build => build(),
            Self::Check => check(),
            Self::Lint => lint(),
            Self::LintClippy => lint_clippy(),
            Self::LintDocs => lint_docs(),
            Self::LintFormatting => lint_format(),
            Self::FixClippy => fix_clippy(),
            Self::FixFormatting => fix_format(),
            Self::Test => test(),
            Self::Migrate { database } => migrate(&database),
            Self::VerifySchema { database } => verify_schema(database.as_deref()),
            Self::Dev { database, port } => dev(&database, port),
        }
    }
}

/// Run CI checks (lint, build, test, schema verification)
fn ci() -> Result<()> {
    lint()?;
    build()?;
    test()?;
    verify_schema(None)?;
    Ok(())
}

/// Build the project
fn build() -> Result<()> {
    run_cargo(vec!["build", "--all-targets", "--all-features"])
}

/// Run cargo check
fn check() -> Result<()> {
    run_cargo(vec!["check", "--all-targets", "--all-features"])
}

/// Lint formatting, clippy, and docs
fn lint() -> Result<()> {
    lint_clippy()?;
    lint_docs()?;
    lint_format()?;
    Ok(())
}

/// Run clippy on the project
fn lint_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ])
}

/// Fix clippy warnings in the project
fn fix_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--fix",
        "--allow-dirty",
        "--allow-staged",
        "--",
        "-D",
        "warnings",
    ])
}

/// Check that docs build without errors using docs.rs-equivalent flags
fn lint_docs() -> Result<()> {
    let meta = cargo_metadata::MetadataCommand::new()
        .exec()
        .wrap_err("failed to get cargo metadata")?;

    for package in meta.workspace_default_packages() {
        cmd(
            "cargo",
            [
                "doc",
                "--no-deps",
                "--all-features",
                "--package",
                &package.name,
            ],
        )
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .env("RUSTDOCFLAGS", "--cfg docsrs -D warnings")
        .run_with_trace()?;
    }

    Ok(())
}

/// Lint formatting issues in the project
fn lint_format() -> Result<()> {
    run_cargo_nightly(vec!["fmt", "--all", "--check"])
}

/// Fix formatting issues in the project
fn fix_format() -> Result<()> {
    run_cargo_nightly(vec!["fmt", "--all"])
}

/// Run all workspace tests
fn test() -> Result<()> {
    run_cargo(vec!["test", "--all-targets", "--all-features"])
}

/// Run a cargo subcommand with the default toolchain
fn run_cargo(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

/// Run a cargo subcommand with the nightly toolchain
fn run_cargo_nightly(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args)
        // CARGO env var is set because we're running in a cargo subcommand
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .run_with_trace()?;
    Ok(())
}

/// Apply migrations to a database file
///
/// Opening the database through the persistence layer runs every pending
/// migration, enables WAL mode and checks foreign key enforcement.
fn migrate(database: &str) -> Result<()> {
    tracing::info!("Migrating database at {database}");
    Persistence::new_with_file(database)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to migrate {database}: {e}"))?;
    tracing::info!("Database at {database} is up to date");
    Ok(())
}

/// Migrate a database file, verify it, then run the server against it
///
/// The server seeds the menu itself on startup.
fn dev(database: &str, port: u16) -> Result<()> {
    migrate(database)?;
    verify_schema(Some(database))?;

    let port = port.to_string();
    cmd!(
        "cargo",
        "run",
        "--package",
        "pizzeria-server",
        "--",
        "--database",
        database,
        "--port",
        &port
    )
    .env("RUST_LOG", std::env::var("RUST_LOG").unwrap_or_else(|_| String::from("info")))
    .run_with_trace()
    .wrap_err("pizzeria-server exited with an error")?;
    Ok(())
}

/// Verify the migrated schema
///
/// With no database the embedded migrations are applied to a fresh
/// in-memory database first.
fn verify_schema(database: Option<&str>) -> Result<()> {
    let mut conn = if let Some(path) = database {
        tracing::info!("Verifying schema of {path}");
        SqliteConnection::establish(path).wrap_err(format!("Failed to open {path}"))?
    } else {
        tracing::info!("Verifying schema of freshly migrated in-memory database");
        let mut conn = SqliteConnection::establish(":memory:")
            .wrap_err("Failed to create SQLite in-memory database")?;
        diesel::sql_query("PRAGMA foreign_keys = ON")
            .execute(&mut conn)
            .wrap_err("Failed to enable foreign keys on SQLite")?;
        conn.run_pending_migrations(MIGRATIONS)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to apply SQLite migrations: {}", e))?;
        conn
    };

    let schema = introspect_sqlite_schema(&mut conn)?;
    compare_with_expected(&schema, &expected_schema())?;

    tracing::info!("✅ Schema verification PASSED");
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Schema {
    tables: BTreeMap<String, Table>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Table {
    columns: BTreeMap<String, Column>,
    primary_keys: BTreeSet<String>,
    foreign_keys: BTreeSet<ForeignKey>,
    indexes: BTreeSet<Index>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Column {
    name: String,
    normalized_type: String,
    nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ForeignKey {
    from_column: String,
    to_table: String,
    to_column: String,
    on_delete: String,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Index {
    name: String,
    columns: Vec<String>,
}

/// Introspect `SQLite` schema
#[allow(clippy::too_many_lines)]
fn introspect_sqlite_schema(conn: &mut SqliteConnection) -> Result<Schema> {
    #[derive(QueryableByName)]
    struct TableName {
        #[diesel(sql_type = Text)]
        name: String,
    }

    #[derive(QueryableByName)]
    struct ColumnInfo {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Text)]
        r#type: String,
        #[diesel(sql_type = Integer)]
        notnull: i32,
        #[diesel(sql_type = Integer)]
        pk: i32,
    }

    #[derive(QueryableByName)]
    struct ForeignKeyInfo {
        #[diesel(sql_type = Text)]
        table: String,
        #[diesel(sql_type = Text)]
        from: String,
        #[diesel(sql_type = Text)]
        to: String,
        #[diesel(sql_type = Text)]
        on_delete: String,
    }

    #[derive(QueryableByName)]
    struct IndexInfo {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Text)]
        origin: String,
    }

    #[derive(QueryableByName)]
    struct IndexColumnInfo {
        #[diesel(sql_type = Text)]
        name: String,
    }

    let mut schema = Schema {
        tables: BTreeMap::new(),
    };

    let tables: Vec<TableName> = diesel::sql_query(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name != '__diesel_schema_migrations' ORDER BY name"
    )
    .load(conn)
    .wrap_err("Failed to query SQLite tables")?;

    for table in tables {
        let mut table_info = Table {
            columns: BTreeMap::new(),
            primary_keys: BTreeSet::new(),
            foreign_keys: BTreeSet::new(),
            indexes: BTreeSet::new(),
        };

        let columns: Vec<ColumnInfo> =
            diesel::sql_query(format!("PRAGMA table_info({})", table.name))
                .load(conn)
                .wrap_err(format!("Failed to get columns for table {}", table.name))?;

        for col in columns {
            let normalized_type = normalize_sqlite_type(&col.r#type);
            table_info.columns.insert(
                col.name.clone(),
                Column {
                    name: col.name.clone(),
                    normalized_type,
                    nullable: col.notnull == 0,
                },
            );

            if col.pk > 0 {
                table_info.primary_keys.insert(col.name);
            }
        }

        let fks: Vec<ForeignKeyInfo> =
            diesel::sql_query(format!("PRAGMA foreign_key_list({})", table.name))
                .load(conn)
                .wrap_err(format!(
                    "Failed to get foreign keys for table {}",
                    table.name
                ))?;

        for fk in fks {
            table_info.foreign_keys.insert(ForeignKey {
                from_column: fk.from,
                to_table: fk.table,
                to_column: fk.to,
                on_delete: fk.on_delete.to_uppercase(),
            });
        }

        let indexes: Vec<IndexInfo> =
            diesel::sql_query(format!("PRAGMA index_list({})", table.name))
                .load(conn)
                .wrap_err(format!("Failed to get indexes for table {}", table.name))?;

        // Only explicitly created indexes; primary key autoindexes are covered by `primary_keys`
        for idx in indexes.into_iter().filter(|idx| idx.origin == "c") {
            let index_columns: Vec<IndexColumnInfo> =
                diesel::sql_query(format!("PRAGMA index_info({})", idx.name))
                    .load(conn)
                    .wrap_err(format!("Failed to get index columns for {}", idx.name))?;

            table_info.indexes.insert(Index {
                name: idx.name,
                columns: index_columns.into_iter().map(|c| c.name).collect(),
            });
        }

        schema.tables.insert(table.name, table_info);
    }

    Ok(schema)
}

fn normalize_sqlite_type(sqlite_type: &str) -> String {
    let upper = sqlite_type.to_uppercase();
    if upper.contains("INT") {
        String::from("INTEGER")
    } else if upper.contains("BOOL") {
        String::from("BOOLEAN")
    } else if upper.contains("CHAR") || upper.contains("TEXT") {
        String::from("TEXT")
    } else {
        upper
    }
}

/// The layout the persistence layer's row types and queries depend on.
fn expected_schema() -> Schema {
    fn column(name: &str, normalized_type: &str, nullable: bool) -> (String, Column) {
        (
            name.to_string(),
            Column {
                name: name.to_string(),
                normalized_type: normalized_type.to_string(),
                nullable,
            },
        )
    }

    fn audit_columns() -> Vec<(String, Column)> {
        vec![
            column("created_by", "TEXT", false),
            column("created_at_utc", "TEXT", false),
            column("modified_by", "TEXT", false),
            column("modified_at_utc", "TEXT", false),
            column("is_deleted", "BOOLEAN", false),
        ]
    }

    fn cascade(from_column: &str, to_table: &str) -> ForeignKey {
        ForeignKey {
            from_column: from_column.to_string(),
            to_table: to_table.to_string(),
            to_column: String::from("id"),
            on_delete: String::from("CASCADE"),
        }
    }

    fn index(name: &str, columns: &[&str]) -> Index {
        Index {
            name: name.to_string(),
            columns: columns.iter().map(ToString::to_string).collect(),
        }
    }

    let primary_keys: BTreeSet<String> = BTreeSet::from([String::from("id")]);

    let mut pizzas: Vec<(String, Column)> = vec![
        column("id", "TEXT", false),
        column("name", "TEXT", false),
        column("description", "TEXT", false),
        column("price_cents", "INTEGER", false),
        column("version", "INTEGER", false),
    ];
    pizzas.extend(audit_columns());

    let mut orders: Vec<(String, Column)> = vec![
        column("id", "TEXT", false),
        column("user_id", "TEXT", false),
        column("delivery_address", "TEXT", true),
        column("started_at_utc", "TEXT", false),
        column("submitted_at_utc", "TEXT", true),
        column("prepared_at_utc", "TEXT", true),
        column("completed_at_utc", "TEXT", true),
        column("version", "INTEGER", false),
    ];
    orders.extend(audit_columns());

    let mut order_pizzas: Vec<(String, Column)> = vec![
        column("id", "TEXT", false),
        column("order_id", "TEXT", false),
        column("pizza_id", "TEXT", false),
        column("quantity", "INTEGER", false),
    ];
    order_pizzas.extend(audit_columns());

    Schema {
        tables: BTreeMap::from([
            (
                String::from("pizzas"),
                Table {
                    columns: pizzas.into_iter().collect(),
                    primary_keys: primary_keys.clone(),
                    foreign_keys: BTreeSet::new(),
                    indexes: BTreeSet::new(),
                },
            ),
            (
                String::from("orders"),
                Table {
                    columns: orders.into_iter().collect(),
                    primary_keys: primary_keys.clone(),
                    foreign_keys: BTreeSet::new(),
                    indexes: BTreeSet::from([index(
                        "idx_orders_started_at_utc",
                        &["started_at_utc"],
                    )]),
                },
            ),
            (
                String::from("order_pizzas"),
                Table {
                    columns: order_pizzas.into_iter().collect(),
                    primary_keys,
                    foreign_keys: BTreeSet::from([
                        cascade("order_id", "orders"),
                        cascade("pizza_id", "pizzas"),
                    ]),
                    indexes: BTreeSet::from([
                        index("idx_order_pizzas_order_id", &["order_id"]),
                        index("idx_order_pizzas_pizza_id", &["pizza_id"]),
                    ]),
                },
            ),
        ]),
    }
}

/// Compare an introspected schema against the expected layout
///
/// Extra columns or indexes are allowed; anything missing or different fails.
fn compare_with_expected(actual: &Schema, expected: &Schema) -> Result<()> {
    for (table_name, expected_table) in &expected.tables {
        let Some(actual_table) = actual.tables.get(table_name) else {
            return Err(color_eyre::eyre::eyre!(
                "❌ Schema verification FAILED: Table '{}' is missing",
                table_name
            ));
        };

        for (column_name, expected_column) in &expected_table.columns {
            match actual_table.columns.get(column_name) {
                None => {
                    return Err(color_eyre::eyre::eyre!(
                        "❌ Schema verification FAILED: Column '{}.{}' is missing",
                        table_name,
                        column_name
                    ));
                }
                Some(actual_column) if actual_column != expected_column => {
                    return Err(color_eyre::eyre::eyre!(
                        "❌ Schema verification FAILED: Column '{}.{}' differs\n  Expected: {:?}\n  Found: {:?}",
                        table_name,
                        column_name,
                        expected_column,
                        actual_column
                    ));
                }
                Some(_) => {}
            }
        }

        if actual_table.primary_keys != expected_table.primary_keys {
            return Err(color_eyre::eyre::eyre!(
                "❌ Schema verification FAILED: Primary key mismatch for table '{}'\n  Expected: {:?}\n  Found: {:?}",
                table_name,
                expected_table.primary_keys,
                actual_table.primary_keys
            ));
        }

        for expected_fk in &expected_table.foreign_keys {
            if !actual_table.foreign_keys.contains(expected_fk) {
                return Err(color_eyre::eyre::eyre!(
                    "❌ Schema verification FAILED: Foreign key missing on table '{}'\n  Expected: {:?}",
                    table_name,
                    expected_fk
                ));
            }
        }

        for expected_index in &expected_table.indexes {
            if !actual_table.indexes.contains(expected_index) {
                return Err(color_eyre::eyre::eyre!(
                    "❌ Schema verification FAILED: Index '{}' missing on table '{}'",
                    expected_index.name,
                    table_name
                ));
            }
        }

        tracing::debug!("Table '{}' matches", table_name);
    }

    Ok(())
}

/// An extension trait for `duct::Expression` that logs the command being run
/// before running it.
trait ExpressionExt {
    /// Run the command and log the command being run
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            // The command that was run may have scrolled off the screen, so repeat it here
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}
