//! Minimal CLI: infer fields from cached records → (json | selection), parse keys, alias keys
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;

use field_infer::{Config, FieldDescriptor, FieldInference};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// infer field selections from cached JSON records and generate storage aliases for field keys
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// infer the field tree that could have fetched each input record
    Fields(FieldsOut),
    /// decode data keys into field name + calls
    Parse(KeysIn),
    /// print the storage alias of each key
    Alias(KeysIn),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select the record in each document (e.g. /data/viewer)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JSON config overriding interface names and metadata keys
    #[arg(long)]
    config: Option<PathBuf>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum OutputFormat {
    /// descriptor trees as JSON
    Json,
    /// GraphQL-like selection text
    Selection,
}

#[derive(clap::Parser, Debug)]
struct FieldsOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct KeysIn {
    /// raw data keys, e.g. 'friends(first:10)' or 'friends.first(10)'
    #[arg(required = true)]
    keys: Vec<String>,
}

#[derive(Serialize, Debug)]
struct DocumentFields {
    source: String,
    fields: Vec<FieldDescriptor>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_config(&self) -> Result<Config> {
        match self.config.as_ref() {
            Some(path) => Config::load(path),
            None => Ok(Config::default()),
        }
    }

    /// Infer every document of every input. Files run in parallel; output keeps
    /// input order.
    fn infer_all(&self, config: &Config) -> Result<Vec<DocumentFields>> {
        let source_paths = resolve_file_path_patterns(&self.input)?;
        let per_file = source_paths
            .par_iter()
            .map(|path| self.infer_file(path, config))
            .collect::<Result<Vec<_>>>()?;
        Ok(per_file.into_iter().flatten().collect())
    }

    fn infer_file(&self, source_path: &Path, config: &Config) -> Result<Vec<DocumentFields>> {
        let source_path_str = source_path.to_string_lossy().to_string();
        let source = std::fs::read_to_string(source_path)
            .with_context(|| format!("failed to read source file {source_path_str}"))?;

        let documents: Vec<(String, Value)> = if self.ndjson {
            source
                .lines()
                .enumerate()
                .filter(|(_, line)| !line.trim().is_empty())
                .map(|(i, line)| {
                    let label = format!("{source_path_str}:{}", i + 1);
                    serde_json::from_str::<Value>(line)
                        .with_context(|| format!("failed to parse JSON line ({label})"))
                        .map(|v| (label, v))
                })
                .collect::<Result<_>>()?
        } else {
            let value = serde_json::from_str::<Value>(&source)
                .with_context(|| format!("failed to parse JSON source file ({source_path_str})"))?;
            vec![(source_path_str, value)]
        };

        let inference = FieldInference::new(&config.interface, &config.metadata_keys);
        documents
            .into_iter()
            .map(|(label, value)| -> Result<DocumentFields> {
                let record = self.select(&value, &label)?;
                let fields = inference
                    .infer(record)
                    .with_context(|| format!("failed to infer fields ({label})"))?;
                Ok(DocumentFields { source: label, fields })
            })
            .collect()
    }

    fn select<'v>(&self, value: &'v Value, label: &str) -> Result<&'v serde_json::Map<String, Value>> {
        let selected = match self.json_pointer.as_deref() {
            None => value,
            Some(pointer) => value
                .pointer(pointer)
                .with_context(|| format!("JSON pointer {pointer} selects nothing ({label})"))?,
        };
        match selected.as_object() {
            Some(record) => Ok(record),
            None => bail!("expected a JSON object record ({label})"),
        }
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Fields(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }
                let config = target.input_settings.load_config()?;
                let documents = target.input_settings.infer_all(&config)?;
                let rendered = match target.format {
                    OutputFormat::Json => serde_json::to_string_pretty(&documents)?,
                    OutputFormat::Selection => render_selections(&documents),
                };
                write_output(target.out.as_deref(), &rendered)
            }
            Command::Parse(target) => {
                let parsed = target
                    .keys
                    .iter()
                    .map(|key| -> Result<Value> {
                        let parsed = field_infer::parse_field_key(key)?;
                        Ok(serde_json::json!({
                            "key": key,
                            "name": parsed.name,
                            "calls": parsed.calls,
                        }))
                    })
                    .collect::<Result<Vec<_>>>()?;
                println!("{}", serde_json::to_string_pretty(&parsed)?);
                Ok(())
            }
            Command::Alias(target) => {
                for key in &target.keys {
                    println!("{key}\t{}", field_infer::generate_alias(key));
                }
                Ok(())
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn render_selections(documents: &[DocumentFields]) -> String {
    let mut out = String::new();
    for doc in documents {
        out.push_str(&format!("# {}\n", doc.source));
        for field in &doc.fields {
            out.push_str(&format!("{field}\n"));
        }
    }
    out
}

fn write_output(out: Option<&Path>, text: &str) -> Result<()> {
    match out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(out, text).with_context(|| format!("failed to write {}", out.display()))
        }
        None => {
            println!("{text}");
            Ok(())
        }
    }
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();
    for raw in patterns {
        let pattern = raw.as_ref();
        if !has_glob_chars(pattern) {
            out.push(PathBuf::from(pattern));
            continue;
        }
        let before = out.len();
        for entry in glob::glob(pattern).with_context(|| format!("invalid glob pattern {pattern}"))? {
            out.push(entry?);
        }
        if out.len() == before {
            bail!("glob pattern matched no files: {pattern}");
        }
    }
    Ok(out)
}
