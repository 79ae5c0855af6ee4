use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "remend")]
#[command(author, version, about = "Self-validating dependency cleanup for JS/TS projects")]
#[command(after_help = "Examples:
  remend                         Analyze current directory
  remend ./path/to/project       Analyze a specific project
  remend --fix                   Trial-remove unused dependencies on git branches
  remend --format json           Output as JSON")]
pub struct Cli {
    #[arg(default_value = ".")]
    pub path: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(long)]
    pub fix: bool,

    #[arg(long, short, default_value = "pretty")]
    pub format: OutputFormat,

    #[arg(long, short)]
    pub config: Option<PathBuf>,

    #[arg(long, value_delimiter = ' ')]
    pub serve_command: Option<Vec<String>>,

    #[arg(long)]
    pub grace_secs: Option<u64>,

    #[arg(long)]
    pub branch_prefix: Option<String>,

    #[arg(long)]
    pub no_report: bool,

    #[arg(long)]
    pub no_exit_code: bool,

    #[arg(long, short)]
    pub watch: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    Init {
        #[arg(long, default_value = "json")]
        format: ConfigFormat,
    },
    Organize {
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

#[derive(ValueEnum, Clone, Debug, Default, Copy)]
pub enum ConfigFormat {
    #[default]
    Json,
    Jsonc,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_path() {
        let cli = Cli::parse_from(["remend"]);
        assert_eq!(cli.path, PathBuf::from("."));
    }

    #[test]
    fn test_custom_path() {
        let cli = Cli::parse_from(["remend", "./my-project"]);
        assert_eq!(cli.path, PathBuf::from("./my-project"));
    }

    #[test]
    fn test_fix_flag() {
        let cli = Cli::parse_from(["remend", "--fix"]);
        assert!(cli.fix);
    }

    #[test]
    fn test_format_json() {
        let cli = Cli::parse_from(["remend", "--format", "json"]);
        assert!(matches!(cli.format, OutputFormat::Json));
    }

    #[test]
    fn test_serve_command_is_split_on_spaces() {
        let cli = Cli::parse_from(["remend", "--serve-command", "yarn start"]);
        assert_eq!(cli.serve_command.unwrap(), vec!["yarn", "start"]);
    }

    #[test]
    fn test_organize_subcommand() {
        let cli = Cli::parse_from(["remend", "organize", "./demo"]);
        match cli.command {
            Some(Commands::Organize { path }) => assert_eq!(path, PathBuf::from("./demo")),
            other => panic!("expected organize subcommand, got {:?}", other),
        }
    }
}
