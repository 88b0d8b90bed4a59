//! FetchXML command-line interface

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;
use fauxcrm_eval::QueryEngine;
use fauxcrm_fetchxml::parse_fetch;
use fauxcrm_metadata::MetadataRegistry;
use fauxcrm_store::RecordStore;
use fauxcrm_types::{AttributeValue, Entity, parse_loose};
use uuid::Uuid;

/// FetchXML command-line tool
#[derive(Parser)]
#[command(name = "fauxcrm")]
#[command(author, version, about = "FetchXML query tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a FetchXML file and print the query tree
    Parse {
        /// FetchXML file to parse
        file: PathBuf,
    },
    /// Validate FetchXML documents
    Validate {
        /// FetchXML files to validate
        files: Vec<PathBuf>,
    },
    /// Run a FetchXML query against a JSON data file
    Query {
        /// FetchXML file to execute
        file: PathBuf,
        /// JSON data file: an object mapping entity names to record arrays
        #[arg(short, long)]
        data: PathBuf,
        /// Caller id used by eq-userid / ne-userid conditions
        #[arg(long)]
        caller: Option<Uuid>,
    },
}

fn main() -> Result<()> {
    human_panic::setup_panic!();

    let cli = Cli::parse();

    match cli.command {
        Commands::Parse { file } => {
            let source = fs::read_to_string(&file)
                .with_context(|| format!("cannot read {}", file.display()))?;
            let query = parse_fetch(&source)?;
            println!("{}", serde_json::to_string_pretty(&query)?);
        }
        Commands::Validate { files } => {
            if files.is_empty() {
                bail!("no files given");
            }
            let mut failures = 0usize;
            for file in &files {
                match validate_file(file) {
                    Ok(()) => println!("{} {}", "ok".green(), file.display()),
                    Err(err) => {
                        failures += 1;
                        println!("{} {}: {err:#}", "error".red().bold(), file.display());
                    }
                }
            }
            if failures > 0 {
                bail!("{failures} of {} file(s) failed validation", files.len());
            }
        }
        Commands::Query { file, data, caller } => {
            let source = fs::read_to_string(&file)
                .with_context(|| format!("cannot read {}", file.display()))?;
            let query = parse_fetch(&source)?;
            let store = load_data(&data)?;
            let mut engine = QueryEngine::new(store, MetadataRegistry::new());
            if let Some(caller) = caller {
                engine = engine.with_caller_id(caller);
            }
            let collection = engine.execute(&query)?;
            println!("{}", serde_json::to_string_pretty(&collection)?);
        }
    }

    Ok(())
}

fn validate_file(file: &Path) -> Result<()> {
    let source =
        fs::read_to_string(file).with_context(|| format!("cannot read {}", file.display()))?;
    parse_fetch(&source)?;
    Ok(())
}

/// Loads a JSON data file shaped as `{"entity": [{"attr": value, ...}, ...]}`.
///
/// String values go through the same loose-typing rules as untyped condition
/// literals, so guids, numbers, and RFC 3339 timestamps come out typed.
fn load_data(path: &Path) -> Result<RecordStore> {
    let text =
        fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    let document: serde_json::Value =
        serde_json::from_str(&text).with_context(|| format!("invalid JSON in {}", path.display()))?;
    let serde_json::Value::Object(tables) = document else {
        bail!("{}: top level must be an object of entity arrays", path.display());
    };

    let store = RecordStore::new();
    for (entity_name, rows) in tables {
        let serde_json::Value::Array(rows) = rows else {
            bail!("{}: entry '{entity_name}' must be an array", path.display());
        };
        for row in rows {
            let serde_json::Value::Object(fields) = row else {
                bail!("{}: records of '{entity_name}' must be objects", path.display());
            };
            let mut entity = Entity::new(&entity_name);
            let id_attribute = format!("{entity_name}id");
            for (name, value) in fields {
                // The "<entity>id" column doubles as the record id.
                if name.eq_ignore_ascii_case(&id_attribute)
                    && let Some(text) = value.as_str()
                    && let Ok(id) = Uuid::parse_str(text)
                {
                    entity.id = id;
                    continue;
                }
                entity.set(&name, json_to_value(&value));
            }
            store.create(entity)?;
        }
    }
    Ok(store)
}

fn json_to_value(value: &serde_json::Value) -> Option<AttributeValue> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::Bool(b) => Some(AttributeValue::Boolean(*b)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                if let Ok(small) = i32::try_from(i) {
                    Some(AttributeValue::Integer(small))
                } else {
                    Some(AttributeValue::Long(i))
                }
            } else {
                n.as_f64().map(AttributeValue::Double)
            }
        }
        serde_json::Value::String(s) => Some(parse_loose(s)),
        // Nested structures have no attribute-value analogue.
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn loads_typed_rows_from_json() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{
                "person": [
                    {{"personid": "11111111-1111-1111-1111-111111111111",
                      "firstname": "Ann", "age": 34, "active": true}}
                ]
            }}"#
        )
        .expect("write data");

        let store = load_data(file.path()).expect("load");
        let id = Uuid::parse_str("11111111-1111-1111-1111-111111111111").unwrap();
        let row = store.get("person", id).expect("row");
        assert_eq!(row.get("firstname"), Some(&AttributeValue::String("Ann".into())));
        assert_eq!(row.get("age"), Some(&AttributeValue::Integer(34)));
        assert_eq!(row.get("active"), Some(&AttributeValue::Boolean(true)));
    }

    #[test]
    fn rejects_non_object_documents() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "[1, 2, 3]").expect("write data");
        assert!(load_data(file.path()).is_err());
    }
}
