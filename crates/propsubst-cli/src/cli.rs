//! propsubst CLI - resolve `${key}` placeholders from the command line
//!
//! Usage:
//!   propsubst get --set FOO=foo --set 'BAZ=${FOO}!' BAZ
//!   propsubst dump --set FOO=foo --set 'BAZ=${FOO}!' --format json
//!   propsubst refs --set 'BAZ=${FOO} is ${BAR}' BAZ

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indexmap::IndexMap;
use propsubst_core::{interpolation, MissingKeyPolicy, Resolver, ResolverOptions};
use std::process::ExitCode;
use thiserror::Error;

/// propsubst - Placeholder substitution for key-value configuration
#[derive(Parser)]
#[command(name = "propsubst")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a single key
    Get {
        #[command(flatten)]
        store: StoreArgs,

        /// Key to resolve
        key: String,

        /// Value to print if the key is not defined
        #[arg(short, long)]
        default: Option<String>,

        /// Output format: text, json, yaml
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Resolve every entry
    Dump {
        #[command(flatten)]
        store: StoreArgs,

        /// Output format: text, json, yaml
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List the keys referenced by a raw value
    Refs {
        #[command(flatten)]
        store: StoreArgs,

        /// Key whose raw value is inspected
        key: String,
    },
}

/// Entries and resolution options shared by every command
#[derive(Args)]
struct StoreArgs {
    /// Raw entry as KEY=VALUE (repeatable; later entries win)
    #[arg(short = 's', long = "set", value_name = "KEY=VALUE")]
    entries: Vec<String>,

    /// Handling of placeholders whose key is not defined
    #[arg(short, long, value_enum, default_value_t = MissingArg::Empty)]
    missing: MissingArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum MissingArg {
    /// Substitute an empty string
    Empty,
    /// Keep the `${key}` token
    Keep,
    /// Fail
    Error,
}

impl From<MissingArg> for MissingKeyPolicy {
    fn from(arg: MissingArg) -> Self {
        match arg {
            MissingArg::Empty => MissingKeyPolicy::Empty,
            MissingArg::Keep => MissingKeyPolicy::Keep,
            MissingArg::Error => MissingKeyPolicy::Error,
        }
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error("Invalid entry '{0}': expected KEY=VALUE")]
    InvalidEntry(String),

    #[error(transparent)]
    Resolve(#[from] propsubst_core::Error),

    #[error("Unsupported format: {0}. Use text, json, or yaml.")]
    UnsupportedFormat(String),

    #[error("Failed to serialize output: {0}")]
    Serialize(String),
}

/// Run the CLI with the process arguments
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Get {
            store,
            key,
            default,
            format,
        } => cmd_get(&store, &key, default.as_deref(), &format),

        Commands::Dump { store, format } => cmd_dump(&store, &format),

        Commands::Refs { store, key } => cmd_refs(&store, &key),
    }
}

fn parse_entry(entry: &str) -> Result<(String, String), CliError> {
    entry
        .split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| CliError::InvalidEntry(entry.to_string()))
}

fn build_resolver(store: &StoreArgs) -> Result<Resolver, CliError> {
    let pairs = store
        .entries
        .iter()
        .map(String::as_str)
        .map(parse_entry)
        .collect::<Result<Vec<_>, _>>()?;
    let options = ResolverOptions::default().with_missing_key(store.missing.into());
    Ok(Resolver::from_source_with_options(&pairs[..], options))
}

fn render_value(value: &str, format: &str) -> Result<String, CliError> {
    match format {
        "text" => Ok(format!("{}\n", value)),
        "json" => serde_json::to_string(value)
            .map(|s| format!("{}\n", s))
            .map_err(|e| CliError::Serialize(e.to_string())),
        "yaml" => serde_yaml::to_string(value).map_err(|e| CliError::Serialize(e.to_string())),
        other => Err(CliError::UnsupportedFormat(other.to_string())),
    }
}

fn render_entries(entries: &IndexMap<String, String>, format: &str) -> Result<String, CliError> {
    match format {
        "text" => Ok(entries
            .iter()
            .map(|(k, v)| format!("{}={}\n", k, v))
            .collect()),
        "json" => serde_json::to_string_pretty(entries)
            .map(|s| format!("{}\n", s))
            .map_err(|e| CliError::Serialize(e.to_string())),
        "yaml" => serde_yaml::to_string(entries).map_err(|e| CliError::Serialize(e.to_string())),
        other => Err(CliError::UnsupportedFormat(other.to_string())),
    }
}

fn fail(err: CliError) -> ExitCode {
    eprintln!("{}: {}", "Error".red(), err);
    ExitCode::from(2)
}

fn cmd_get(store: &StoreArgs, key: &str, default: Option<&str>, format: &str) -> ExitCode {
    let resolver = match build_resolver(store) {
        Ok(r) => r,
        Err(e) => return fail(e),
    };

    let result = match default {
        Some(default) => resolver.get_or_default(key, default).map(Some),
        None => resolver.get(key),
    };

    match result {
        Ok(Some(value)) => match render_value(&value, format) {
            Ok(out) => {
                print!("{}", out);
                ExitCode::SUCCESS
            }
            Err(e) => fail(e),
        },
        Ok(None) => {
            eprintln!("{}: Key '{}' not found", "Error".red(), key);
            ExitCode::from(1)
        }
        Err(e) => fail(e.into()),
    }
}

fn cmd_dump(store: &StoreArgs, format: &str) -> ExitCode {
    let resolver = match build_resolver(store) {
        Ok(r) => r,
        Err(e) => return fail(e),
    };

    let output = resolver
        .resolve_all()
        .map_err(CliError::from)
        .and_then(|entries| render_entries(&entries, format));

    match output {
        Ok(content) => {
            print!("{}", content);
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn cmd_refs(store: &StoreArgs, key: &str) -> ExitCode {
    let resolver = match build_resolver(store) {
        Ok(r) => r,
        Err(e) => return fail(e),
    };

    let Some(raw) = resolver.get_raw(key) else {
        eprintln!("{}: Key '{}' not found", "Error".red(), key);
        return ExitCode::from(1);
    };

    for referenced in interpolation::placeholder_keys(raw) {
        let marker = if resolver.contains_key(referenced) {
            "✓".green()
        } else {
            "✗".red()
        };
        println!("{} {}", marker, referenced);
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn store(entries: &[&str], missing: MissingArg) -> StoreArgs {
        StoreArgs {
            entries: entries.iter().map(|e| e.to_string()).collect(),
            missing,
        }
    }

    #[test]
    fn test_parse_entry_splits_on_first_equals() {
        let (k, v) = parse_entry("url=a=b").unwrap();
        assert_eq!(k, "url");
        assert_eq!(v, "a=b");
    }

    #[test]
    fn test_parse_entry_empty_value() {
        assert_eq!(parse_entry("k=").unwrap(), ("k".to_string(), String::new()));
    }

    #[test]
    fn test_parse_entry_rejects_missing_equals() {
        let err = parse_entry("novalue").unwrap_err();
        assert!(err.to_string().contains("expected KEY=VALUE"));
    }

    #[test]
    fn test_build_resolver_last_entry_wins() {
        let resolver =
            build_resolver(&store(&["a=1", "b=${a}", "a=2"], MissingArg::Empty)).unwrap();
        assert_eq!(resolver.len(), 2);
        assert_eq!(resolver.get("b").unwrap(), Some("2".into()));
    }

    #[test]
    fn test_build_resolver_applies_missing_policy() {
        let resolver = build_resolver(&store(&["a=${x}"], MissingArg::Keep)).unwrap();
        assert_eq!(resolver.options().missing_key, MissingKeyPolicy::Keep);
        assert_eq!(resolver.get("a").unwrap(), Some("${x}".into()));
    }

    #[test]
    fn test_render_entries_text() {
        let mut entries = IndexMap::new();
        entries.insert("b".to_string(), "2".to_string());
        entries.insert("a".to_string(), "1".to_string());

        assert_eq!(render_entries(&entries, "text").unwrap(), "b=2\na=1\n");
    }

    #[test]
    fn test_render_entries_json_keeps_order() {
        let mut entries = IndexMap::new();
        entries.insert("b".to_string(), "2".to_string());
        entries.insert("a".to_string(), "1".to_string());

        let json = render_entries(&entries, "json").unwrap();
        assert!(json.find("\"b\"").unwrap() < json.find("\"a\"").unwrap());
    }

    #[test]
    fn test_render_value_formats() {
        assert_eq!(render_value("x y", "text").unwrap(), "x y\n");
        assert_eq!(render_value("x \"y\"", "json").unwrap(), "\"x \\\"y\\\"\"\n");
        assert!(matches!(
            render_value("x", "toml"),
            Err(CliError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
