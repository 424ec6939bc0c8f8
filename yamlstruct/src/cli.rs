//! Command-line interface definitions for yamlstruct.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// yamlstruct - Go structs, JSON templates and validation snippets from table schema YAML
#[derive(Parser, Debug)]
#[command(name = "yamlstruct")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to yamlstruct.toml configuration file
    #[arg(short, long, global = true, env = "YAMLSTRUCT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output (-v, -vv for increasing verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Directory reports are appended in (overrides config file)
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a schema file, or every schema file directly inside a directory
    Convert(ConvertArgs),

    /// Parse a schema file and print its table definition without writing anything
    Inspect(InspectArgs),

    /// Initialize a new yamlstruct.toml configuration file
    Init(InitArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ConvertArgs {
    /// Schema file or directory of schema files
    pub path: PathBuf,

    /// Convert the files of a directory concurrently (overrides config)
    #[arg(long)]
    pub parallel: bool,
}

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Schema file
    pub path: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "pretty")]
    pub format: InspectFormat,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum InspectFormat {
    Pretty,
    Json,
}

#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Overwrite existing yamlstruct.toml if present
    #[arg(short, long)]
    pub force: bool,
}

impl Cli {
    /// Log filter used when `RUST_LOG` is not set.
    pub fn default_log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_level() {
        let level = |args: &[&str]| {
            let mut argv = vec!["yamlstruct"];
            argv.extend_from_slice(args);
            argv.extend_from_slice(&["init"]);
            Cli::try_parse_from(argv).unwrap().default_log_level()
        };
        assert_eq!(level(&[]), "info");
        assert_eq!(level(&["-v"]), "debug");
        assert_eq!(level(&["-vvv"]), "trace");
        assert_eq!(level(&["-q", "-vv"]), "error");
    }

    #[test]
    fn test_parse_convert() {
        let cli = Cli::try_parse_from(["yamlstruct", "convert", "schemas/user.yaml"]).unwrap();
        match cli.command {
            Commands::Convert(args) => {
                assert_eq!(args.path, PathBuf::from("schemas/user.yaml"));
                assert!(!args.parallel);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "yamlstruct",
            "convert",
            "schemas",
            "--parallel",
            "-vv",
            "-o",
            "out",
            "-c",
            "custom.toml",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.output, Some(PathBuf::from("out")));
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert!(matches!(cli.command, Commands::Convert(ConvertArgs { parallel: true, .. })));
    }

    #[test]
    fn test_parse_inspect_format() {
        let cli = Cli::try_parse_from(["yamlstruct", "inspect", "a.yaml", "--format", "json"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Inspect(InspectArgs {
                format: InspectFormat::Json,
                ..
            })
        ));

        let cli = Cli::try_parse_from(["yamlstruct", "inspect", "a.yaml"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Inspect(InspectArgs {
                format: InspectFormat::Pretty,
                ..
            })
        ));
    }

    #[test]
    fn test_parse_init_force() {
        let cli = Cli::try_parse_from(["yamlstruct", "init", "--force", "-q"]).unwrap();
        assert!(matches!(cli.command, Commands::Init(InitArgs { force: true })));
        assert!(cli.quiet);
    }

    #[test]
    fn test_convert_requires_path() {
        assert!(Cli::try_parse_from(["yamlstruct", "convert"]).is_err());
    }

    #[test]
    fn test_subcommand_is_required() {
        assert!(Cli::try_parse_from(["yamlstruct"]).is_err());
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["yamlstruct", "inspect", "a.yaml", "--format", "yaml"]).is_err());
    }
}
