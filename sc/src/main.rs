//! sc - school/grade/class scope tool
//!
//! CLI entry point for inspecting the scope tree and normalizing selections.

use std::sync::Arc;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use schoolscope::autorun::{summarize_content, tasks_from_payload};
use schoolscope::cli::{Cli, Command, OutputFormat};
use schoolscope::config::Config;
use schoolscope::scope::{self, ScopeLevel, ScopeNode};
use schoolscope::source::{FileMenuSource, HttpMenuSource, MenuSource};
use schoolscope::ScopeService;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Priority: CLI --log-level > config file > default (INFO)
    let level_str = cli_log_level.or(config_log_level).unwrap_or("INFO");
    let level = match level_str.to_uppercase().as_str() {
        "TRACE" => tracing::Level::TRACE,
        "DEBUG" => tracing::Level::DEBUG,
        "INFO" => tracing::Level::INFO,
        "WARN" | "WARNING" => tracing::Level::WARN,
        "ERROR" => tracing::Level::ERROR,
        _ => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", level_str);
            tracing::Level::INFO
        }
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .try_init()
        .map_err(|e| eyre::eyre!("Failed to initialize logging: {}", e))?;

    debug!(?level, "Logging initialized");
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_values(values: &[String], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&values),
        OutputFormat::Text => {
            for value in values {
                println!("{}", value);
            }
            Ok(())
        }
    }
}

fn print_tree(nodes: &[ScopeNode], depth: usize) {
    for node in nodes {
        println!("{}{} {}", "  ".repeat(depth), node.label, node.value.dimmed());
        print_tree(&node.children, depth + 1);
    }
}

fn menu_source(cli: &Cli, config: &Config) -> Result<Arc<dyn MenuSource>> {
    if let Some(path) = &cli.menu_file {
        debug!(path = %path.display(), "menu_source: using menu file");
        return Ok(Arc::new(FileMenuSource::new(path)));
    }
    config.validate().context("Invalid configuration")?;
    let source = HttpMenuSource::from_config(config).context("Failed to create HTTP client")?;
    debug!(url = %source.url(), "menu_source: using backend");
    Ok(Arc::new(source))
}

fn cmd_encode(level: ScopeLevel, school: &str, grade: Option<&str>, class: Option<&str>) -> Result<()> {
    let value = scope::encode(level, school, grade, class)?;
    println!("{}", value);
    Ok(())
}

fn cmd_decode(value: &str, format: OutputFormat) -> Result<()> {
    let parsed = scope::decode(value);
    match format {
        OutputFormat::Json => print_json(&parsed),
        OutputFormat::Text => {
            println!("level:  {}", parsed.level.to_string().cyan());
            println!("school: {}", parsed.school.as_deref().unwrap_or("-"));
            println!("grade:  {}", parsed.grade.as_deref().unwrap_or("-"));
            println!("class:  {}", parsed.class.as_deref().unwrap_or("-"));
            Ok(())
        }
    }
}

async fn cmd_tree(service: &ScopeService, format: OutputFormat) -> Result<()> {
    let tree = service.build_tree().await.context("Failed to build scope tree")?;
    let nodes: &[ScopeNode] = &tree;
    match format {
        OutputFormat::Json => print_json(&nodes),
        OutputFormat::Text => {
            if nodes.is_empty() {
                println!("No scopes found");
            }
            print_tree(nodes, 0);
            Ok(())
        }
    }
}

async fn cmd_find(service: &ScopeService, value: &str, format: OutputFormat) -> Result<()> {
    let node = service.find(value).await.context("Failed to build scope tree")?;
    match (node, format) {
        (Some(node), OutputFormat::Json) => print_json(&node),
        (Some(node), OutputFormat::Text) => {
            println!("{} {}", node.label, node.value.dimmed());
            Ok(())
        }
        (None, _) => Err(eyre::eyre!("No scope with value '{}'", value)),
    }
}

async fn cmd_options(service: &ScopeService, selected: &[String], format: OutputFormat) -> Result<()> {
    let options = service.options(selected).await.context("Failed to build scope tree")?;
    match format {
        OutputFormat::Json => print_json(&options),
        OutputFormat::Text => {
            for option in options {
                let mark = if selected.contains(&option.value) {
                    "✓".green()
                } else if option.disabled {
                    "-".dimmed()
                } else {
                    " ".normal()
                };
                let label = if option.disabled {
                    option.label.dimmed()
                } else {
                    option.label.normal()
                };
                println!("{} {} {}", mark, label, option.value.dimmed());
            }
            Ok(())
        }
    }
}

fn cmd_grades(values: &[String], format: OutputFormat) -> Result<()> {
    let pairs = scope::grade_pairs(values);
    match format {
        OutputFormat::Json => print_json(&pairs),
        OutputFormat::Text => {
            for pair in pairs {
                println!("{}\t{}", pair.school, pair.grade);
            }
            Ok(())
        }
    }
}

fn cmd_summary(path: &std::path::Path, format: OutputFormat) -> Result<()> {
    let content = std::fs::read_to_string(path).context(format!("Failed to read {}", path.display()))?;
    let payload: Value = serde_json::from_str(&content).context("Failed to parse task JSON")?;
    let tasks = tasks_from_payload(payload);

    match format {
        OutputFormat::Json => {
            let rows: Vec<Value> = tasks
                .iter()
                .map(|t| {
                    serde_json::json!({
                        "id": t.id,
                        "type": t.kind.label(),
                        "scope": t.normalized_scope(),
                        "summary": summarize_content(t),
                        "priority": t.priority,
                        "status": t.status.label(),
                    })
                })
                .collect();
            print_json(&rows)
        }
        OutputFormat::Text => {
            for task in &tasks {
                println!(
                    "{} [{}] {} ({}) {}",
                    task.id.yellow(),
                    task.kind,
                    summarize_content(task),
                    task.status,
                    task.normalized_scope().join(", ").dimmed()
                );
            }
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    debug!(api_server = %config.api_server, "main: loaded config");

    let format = cli.format;
    debug!(command = ?cli.command, "main: dispatching command");
    match &cli.command {
        Command::Encode {
            level,
            school,
            grade,
            class,
        } => cmd_encode(*level, school, grade.as_deref(), class.as_deref()),
        Command::Decode { value } => cmd_decode(value, format),
        Command::Normalize { values } => print_values(&scope::normalize(values.as_slice()), format),
        Command::Grades { values } => cmd_grades(values, format),
        Command::Summary { path } => cmd_summary(path, format),
        Command::Tree => {
            let service = ScopeService::new(menu_source(&cli, &config)?);
            cmd_tree(&service, format).await
        }
        Command::Find { value } => {
            let service = ScopeService::new(menu_source(&cli, &config)?);
            cmd_find(&service, value, format).await
        }
        Command::Options { selected } => {
            let service = ScopeService::new(menu_source(&cli, &config)?);
            cmd_options(&service, selected, format).await
        }
    }
}
