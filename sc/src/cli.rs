//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::scope::ScopeLevel;

/// schoolscope - school/grade/class scope tool
#[derive(Parser, Debug)]
#[command(name = "sc")]
#[command(author, version, about = "Inspect and normalize school/grade/class scopes", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    /// Read the menu from a JSON file instead of the backend
    #[arg(short, long, global = true, value_name = "PATH")]
    pub menu_file: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode identifiers into a scope string
    Encode {
        /// Scope level (school, grade, class)
        level: ScopeLevel,

        /// School identifier
        school: String,

        /// Grade identifier
        grade: Option<String>,

        /// Class identifier
        class: Option<String>,
    },

    /// Decode a scope string
    Decode {
        /// Scope string, e.g. 39/2023/1
        value: String,
    },

    /// Show the scope tree built from the menu
    Tree,

    /// Find a tree node by scope string
    Find {
        /// Scope string to look up
        value: String,
    },

    /// Drop duplicate and redundant scopes from a selection
    Normalize {
        /// Selected scope strings
        #[arg(required = true)]
        values: Vec<String>,
    },

    /// List selectable options, marking those covered by the selection
    Options {
        /// Currently selected scope strings
        #[arg(short, long = "selected", value_name = "SCOPE")]
        selected: Vec<String>,
    },

    /// List distinct (school, grade) pairs referenced by scopes
    Grades {
        /// Scope strings
        #[arg(required = true)]
        values: Vec<String>,
    },

    /// Summarize autorun tasks from a JSON file
    Summary {
        /// File holding a task array or a `{ "data": [...] }` envelope
        #[arg(required = true)]
        path: PathBuf,
    },
}

/// Output format for command results
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_encode() {
        let cli = Cli::try_parse_from(["sc", "encode", "class", "39", "2023", "1"]).unwrap();
        match cli.command {
            Command::Encode {
                level,
                school,
                grade,
                class,
            } => {
                assert_eq!(level, ScopeLevel::Class);
                assert_eq!(school, "39");
                assert_eq!(grade.as_deref(), Some("2023"));
                assert_eq!(class.as_deref(), Some("1"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["sc", "options", "-s", "39", "--menu-file", "menu.json", "--format", "json"])
            .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.menu_file, Some(PathBuf::from("menu.json")));
        assert!(matches!(cli.command, Command::Options { ref selected } if selected == &["39"]));
    }

    #[test]
    fn test_normalize_requires_values() {
        assert!(Cli::try_parse_from(["sc", "normalize"]).is_err());
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("table".parse::<OutputFormat>().is_err());
    }
}
