//! `dotpath` CLI — flatten, inflate, query, and index JSON documents from the
//! command line.
//!
//! ## Usage
//!
//! ```sh
//! # Flatten nested JSON (stdin → stdout)
//! echo '{"a":{"b":1}}' | dotpath flatten
//!
//! # Inflate from file to file with a custom delimiter
//! dotpath -i flat.json -o nested.json inflate --delimiter /
//!
//! # Read one or more dot-paths
//! dotpath -i user.json read --path profile.name --path profile.role --default '"n/a"'
//!
//! # Filter a collection (OR across a list of criteria objects)
//! dotpath -i users.json filter --where '[{"role":"admin"},{"team":"ops"}]' --match ci
//!
//! # Index a collection
//! dotpath -i users.json key-by --property id --meta
//! dotpath -i users.json group-by --property team --property role
//!
//! # Logs go to stderr; raise verbosity with -v or RUST_LOG
//! RUST_LOG=dotpath_core=trace dotpath -i flat.json inflate
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotpath_core::{
    asort_by_property, filter_where, filter_where_not, find_first_where, find_first_where_not,
    flatten, group_by_property, inflate, keep_keys_in_collection, key_by_property,
    key_by_property_with_meta, pluck, read, read_many, remove_keys_in_collection,
    sort_by_property, Criteria, Levels, MatchType, RemovalAction, Sequence, SortMode, SortOrder,
    Value,
};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "dotpath",
    version,
    about = "Dot-path transforms over JSON documents"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Input file (reads from stdin if omitted)
    #[arg(short, long, global = true)]
    input: Option<String>,

    /// Output file (writes to stdout if omitted)
    #[arg(short, long, global = true)]
    output: Option<String>,

    /// Increase log verbosity on stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Flatten nested objects into delimiter-joined keys
    Flatten {
        /// Key delimiter
        #[arg(long, default_value = dotpath_core::DEFAULT_DELIMITER)]
        delimiter: String,
        /// Levels to flatten (negative or omitted means unlimited)
        #[arg(long, allow_negative_numbers = true)]
        levels: Option<i64>,
    },
    /// Inflate delimiter-joined keys back into nested objects
    Inflate {
        /// Key delimiter
        #[arg(long, default_value = dotpath_core::DEFAULT_DELIMITER)]
        delimiter: String,
        /// Levels to inflate (negative or omitted means unlimited)
        #[arg(long, allow_negative_numbers = true)]
        levels: Option<i64>,
    },
    /// Read values at dot-paths
    Read {
        /// Dot-path to read; several paths produce an object keyed by path
        #[arg(long = "path", required = true, num_args = 1..)]
        paths: Vec<String>,
        /// JSON value returned for missing or null paths
        #[arg(long)]
        default: Option<String>,
    },
    /// Select the entries of a collection that match criteria
    Filter {
        /// Criteria as JSON: one object (AND) or a list of objects (OR)
        #[arg(long = "where")]
        criteria: String,
        /// Comparison: loose, strict, or ci
        #[arg(long = "match", default_value = "loose")]
        match_type: MatchType,
        /// Select the entries that do not match
        #[arg(long)]
        not: bool,
        /// Keep the original keys even for a list
        #[arg(long)]
        preserve_keys: bool,
        /// Output only the first selected entry (or null)
        #[arg(long)]
        first: bool,
    },
    /// Key a collection by composite property value
    KeyBy {
        /// Property dot-path; several are joined with "."
        #[arg(long = "property", required = true, num_args = 1..)]
        properties: Vec<String>,
        /// Also report overwritten and invalid entries
        #[arg(long)]
        meta: bool,
    },
    /// Group a collection by composite property value
    GroupBy {
        /// Property dot-path; several are joined with "."
        #[arg(long = "property", required = true, num_args = 1..)]
        properties: Vec<String>,
    },
    /// Read one dot-path from every entry of a collection
    Pluck {
        /// Property dot-path
        #[arg(long)]
        property: String,
    },
    /// Keep only the named keys on every entry
    KeepKeys {
        /// Key to keep
        #[arg(long = "key", required = true, num_args = 1..)]
        keys: Vec<String>,
        /// What to do with other keys: delete or nullify
        #[arg(long, default_value = "delete")]
        action: RemovalAction,
    },
    /// Remove the named keys from every entry
    RemoveKeys {
        /// Key to remove
        #[arg(long = "key", required = true, num_args = 1..)]
        keys: Vec<String>,
        /// What to do with the named keys: delete or nullify
        #[arg(long, default_value = "delete")]
        action: RemovalAction,
    },
    /// Sort a collection by a property
    Sort {
        /// Property dot-path
        #[arg(long)]
        property: String,
        /// Sort in descending order
        #[arg(long)]
        descending: bool,
        /// Comparison: regular, numeric, or string-ci
        #[arg(long, default_value = "regular")]
        mode: SortMode,
        /// Keep the original keys instead of renumbering
        #[arg(long)]
        keep_keys: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let raw = read_input(cli.input.as_deref())?;
    let document = Value::from_json_str(&raw).context("Failed to parse input JSON")?;
    tracing::debug!(bytes = raw.len(), "read input document");

    let result = run(cli.command, document)?;
    let pretty = serde_json::to_string_pretty(&result).context("Failed to serialize output")?;
    write_output(cli.output.as_deref(), &pretty)?;

    Ok(())
}

fn run(command: Commands, document: Value) -> Result<Value> {
    let value = match command {
        Commands::Flatten { delimiter, levels } => {
            flatten(&document, &delimiter, levels_from(levels))
        }
        Commands::Inflate { delimiter, levels } => {
            inflate(&document, &delimiter, levels_from(levels))
        }
        Commands::Read { paths, default } => {
            let default = default
                .as_deref()
                .map(Value::from_json_str)
                .transpose()
                .context("Failed to parse --default as JSON")?;
            match paths.as_slice() {
                [path] => read(&document, path, default.as_ref()),
                _ => Value::Sequence(read_many(&document, &paths, default.as_ref())),
            }
        }
        Commands::Filter {
            criteria,
            match_type,
            not,
            preserve_keys,
            first,
        } => {
            let criteria = Value::from_json_str(&criteria)
                .map(Criteria::from)
                .context("Failed to parse --where as JSON")?;
            let collection = collection(document)?;
            match (first, not) {
                (true, false) => first_value(find_first_where(&collection, &criteria, match_type)),
                (true, true) => {
                    first_value(find_first_where_not(&collection, &criteria, match_type))
                }
                (false, false) => Value::Sequence(filter_where(
                    &collection,
                    &criteria,
                    match_type,
                    preserve_keys,
                )),
                (false, true) => Value::Sequence(filter_where_not(
                    &collection,
                    &criteria,
                    match_type,
                    preserve_keys,
                )),
            }
        }
        Commands::KeyBy { properties, meta } => {
            let collection = collection(document)?;
            if meta {
                Value::from(key_by_property_with_meta(&collection, &properties))
            } else {
                Value::Sequence(key_by_property(&collection, &properties))
            }
        }
        Commands::GroupBy { properties } => {
            Value::Sequence(group_by_property(&collection(document)?, &properties))
        }
        Commands::Pluck { property } => Value::Sequence(pluck(&collection(document)?, &property)),
        Commands::KeepKeys { keys, action } => {
            Value::Sequence(keep_keys_in_collection(&collection(document)?, &keys, action))
        }
        Commands::RemoveKeys { keys, action } => {
            Value::Sequence(remove_keys_in_collection(&collection(document)?, &keys, action))
        }
        Commands::Sort {
            property,
            descending,
            mode,
            keep_keys,
        } => {
            let collection = collection(document)?;
            let order = if descending {
                SortOrder::Descending
            } else {
                SortOrder::Ascending
            };
            if keep_keys {
                Value::Sequence(asort_by_property(&collection, &property, order, mode))
            } else {
                Value::Sequence(sort_by_property(&collection, &property, order, mode))
            }
        }
    };
    Ok(value)
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `-v`.
fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("dotpath={level},dotpath_core={level}").into()),
        )
        .with_writer(io::stderr)
        .init();
}

fn levels_from(levels: Option<i64>) -> Levels {
    levels.map_or(Levels::Unlimited, Levels::from)
}

fn collection(document: Value) -> Result<Sequence> {
    document
        .into_sequence()
        .context("Input must be a JSON array or object for collection commands")
}

fn first_value(found: Option<(&dotpath_core::Key, &Value)>) -> Value {
    found.map_or(Value::NULL, |(_, value)| value.clone())
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
