use std::{
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use indexmap::IndexMap;
use methodcheck_engine::{Arguments, InMemoryObjects, ManagerError, MethodManager, ObjectInfoLookup, WorkspaceLookup};
use methodcheck_registry::{MethodCheckConfig, SpecStore, source_from_config};
use methodcheck_types::{ParamValue, ReleaseTag};
use tracing::{Level, debug};

#[derive(Debug, Parser)]
#[command(name = "methodcheck", version, about = "Validate method parameters against published method specifications")]
struct Cli {
    /// Configuration file (defaults to methodcheck/config.json in the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the methods published under a tag
    List {
        #[arg(long, default_value = "release")]
        tag: String,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show how to call a method
    Usage {
        method: String,
        #[arg(long, default_value = "release")]
        tag: String,
        #[arg(long)]
        json: bool,
    },
    /// Print a method's long-form description
    Describe {
        method: String,
        #[arg(long, default_value = "release")]
        tag: String,
    },
    /// Validate arguments for a method and report every problem
    Validate {
        method: String,
        #[arg(long, default_value = "release")]
        tag: String,
        /// Version constraint; only valid with the release tag
        #[arg(long)]
        version: Option<String>,
        /// Argument as id=value; values are read as JSON when they parse,
        /// otherwise as text. Repeat an id to supply a list.
        #[arg(long = "param", value_name = "ID=VALUE")]
        params: Vec<String>,
        /// JSON object of arguments, overridden by --param
        #[arg(long)]
        params_file: Option<PathBuf>,
        /// Workspace input objects are looked up in
        #[arg(long)]
        workspace: Option<String>,
        /// JSON object of object name to type, used instead of the
        /// workspace service
        #[arg(long)]
        objects: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {:#}", error);
            ExitCode::from(2)
        }
    }
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => MethodCheckConfig::load_from(path),
        None => MethodCheckConfig::load(),
    };
    let store = SpecStore::load(source_from_config(&config)?).context("failed to load method specifications")?;

    match cli.command {
        Command::List { tag, json } => {
            let manager = MethodManager::new(store.snapshot(), Arc::new(InMemoryObjects::new()));
            let methods = manager.list_methods(&tag)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&methods)?);
            } else {
                for spec in methods {
                    if spec.info.subtitle.is_empty() {
                        println!("{} - {}", spec.info.id, spec.info.name);
                    } else {
                        println!("{} - {}: {}", spec.info.id, spec.info.name, spec.info.subtitle);
                    }
                }
                let tag: ReleaseTag = tag.parse()?;
                for malformed in manager.snapshot().malformed(tag) {
                    eprintln!("warning: {}", malformed);
                }
            }
        }
        Command::Usage { method, tag, json } => {
            let manager = MethodManager::new(store.snapshot(), Arc::new(InMemoryObjects::new()));
            let usage = manager.method_usage(&method, &tag)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&usage)?);
            } else {
                println!("{}", usage);
            }
        }
        Command::Describe { method, tag } => {
            let tag: ReleaseTag = tag.parse()?;
            println!("{}", store.source().method_description(&method, tag)?);
        }
        Command::Validate {
            method,
            tag,
            version,
            params,
            params_file,
            workspace,
            objects,
        } => {
            let lookup: Arc<dyn ObjectInfoLookup> = match &objects {
                Some(path) => Arc::new(InMemoryObjects::from_json_file(path)?),
                None => Arc::new(WorkspaceLookup::new(&config.workspace_url)?),
            };
            let mut manager = MethodManager::new(store.snapshot(), lookup);
            if let Some(workspace) = workspace.or_else(|| config.workspace.clone()) {
                manager = manager.with_workspace(workspace);
            }

            let arguments = collect_arguments(params_file.as_deref(), &params)?;
            debug!(method = %method, count = arguments.len(), "collected arguments");
            return Ok(report_validation(manager.validate_parameters(&method, &tag, version.as_deref(), &arguments)));
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Prints the outcome of a validation. Parameter problems exit with 1,
/// failed preconditions with 2.
fn report_validation(outcome: Result<(), ManagerError>) -> ExitCode {
    match outcome {
        Ok(()) => {
            println!("ok");
            ExitCode::SUCCESS
        }
        Err(error @ ManagerError::Parameters { .. }) => {
            for message in error.messages() {
                println!("{}", message);
            }
            ExitCode::FAILURE
        }
        Err(error) => {
            eprintln!("error: {}", error);
            ExitCode::from(2)
        }
    }
}

fn collect_arguments(params_file: Option<&Path>, params: &[String]) -> Result<Arguments> {
    let mut arguments = match params_file {
        Some(path) => {
            let content =
                std::fs::read_to_string(path).with_context(|| format!("Failed to read params file: {}", path.display()))?;
            let value: serde_json::Value =
                serde_json::from_str(&content).with_context(|| format!("Invalid params file: {}", path.display()))?;
            let map = value
                .as_object()
                .ok_or_else(|| anyhow!("params file must hold a JSON object: {}", path.display()))?;
            Arguments::from_json_map(map)
        }
        None => Arguments::new(),
    };

    for (id, value) in parse_params(params)? {
        arguments.insert(id, value);
    }
    Ok(arguments)
}

/// Parses `id=value` pairs. Repeated ids are gathered into a list in the
/// order given.
fn parse_params(params: &[String]) -> Result<IndexMap<String, ParamValue>> {
    let mut parsed: IndexMap<String, ParamValue> = IndexMap::new();
    for param in params {
        let (id, raw) = param
            .split_once('=')
            .ok_or_else(|| anyhow!("invalid --param '{}': expected ID=VALUE", param))?;
        let id = id.trim();
        if id.is_empty() {
            bail!("invalid --param '{}': empty id", param);
        }

        let value = ParamValue::parse_cli(raw);
        match parsed.get_mut(id) {
            Some(ParamValue::List(items)) => items.push(value),
            Some(existing) => {
                let first = std::mem::replace(existing, ParamValue::List(Vec::new()));
                *existing = ParamValue::List(vec![first, value]);
            }
            None => {
                parsed.insert(id.to_string(), value);
            }
        }
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn params_parse_json_or_fall_back_to_text() {
        let parsed = parse_params(&strings(&["k=21", "ratio=0.5", "name=contigs", "kmers=[21,33]", "quoted=\"7\""])).expect("parse");
        assert_eq!(parsed["k"], ParamValue::Int(21));
        assert_eq!(parsed["ratio"], ParamValue::Float(0.5));
        assert_eq!(parsed["name"], ParamValue::Text("contigs".into()));
        assert_eq!(parsed["kmers"], ParamValue::List(vec![ParamValue::Int(21), ParamValue::Int(33)]));
        assert_eq!(parsed["quoted"], ParamValue::Text("7".into()));
    }

    #[test]
    fn value_may_contain_equals_signs() {
        let parsed = parse_params(&strings(&["expr=a=b"])).expect("parse");
        assert_eq!(parsed["expr"], ParamValue::Text("a=b".into()));
    }

    #[test]
    fn repeated_ids_become_a_list() {
        let parsed = parse_params(&strings(&["k=21", "k=33", "k=55"])).expect("parse");
        assert_eq!(
            parsed["k"],
            ParamValue::List(vec![ParamValue::Int(21), ParamValue::Int(33), ParamValue::Int(55)])
        );
    }

    #[test]
    fn malformed_params_are_rejected() {
        assert!(parse_params(&strings(&["novalue"])).is_err());
        assert!(parse_params(&strings(&["=5"])).is_err());
    }

    #[test]
    fn command_line_params_override_the_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("params.json");
        fs::write(&path, r#"{ "reads": "lib1", "threshold": 0.2, "unused": null }"#).expect("write params");

        let arguments = collect_arguments(Some(&path), &strings(&["threshold=0.9"])).expect("collect");
        assert_eq!(arguments.len(), 3);
        assert!(arguments.contains("reads"));
        assert!(arguments.contains("unused"));
        assert!(!arguments.is_supplied("unused"));
        let Some(methodcheck_engine::SuppliedValue::Value(threshold)) = arguments.get("threshold") else {
            panic!("threshold missing");
        };
        assert_eq!(*threshold, ParamValue::Float(0.9));
    }

    #[test]
    fn params_file_must_be_an_object() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("params.json");
        fs::write(&path, "[1, 2]").expect("write params");
        assert!(collect_arguments(Some(&path), &[]).is_err());
    }

    #[test]
    fn cli_accepts_repeated_params() {
        let cli = Cli::try_parse_from([
            "methodcheck",
            "validate",
            "MegaHit/run_megahit",
            "--param",
            "reads=lib1",
            "--param",
            "output_name=out",
            "--objects",
            "objects.json",
        ])
        .expect("parse cli");
        let Command::Validate { params, tag, objects, .. } = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(params, strings(&["reads=lib1", "output_name=out"]));
        assert_eq!(tag, "release");
        assert_eq!(objects, Some(PathBuf::from("objects.json")));
    }
}
