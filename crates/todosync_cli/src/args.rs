//! Command-line flags.

use clap::Parser;
use std::path::PathBuf;

/// Interactive to-do list over an in-process document store.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "todosync", version, after_help = crate::command::HELP)]
pub struct CliArgs {
    /// JSON config file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Use the in-memory list instead of the store-backed one.
    #[arg(long)]
    pub local: bool,

    /// Seed the in-memory list from a JSON file.
    #[arg(long, value_name = "PATH", requires = "local", conflicts_with = "seed_url")]
    pub seed_file: Option<PathBuf>,

    /// Seed the in-memory list from this URL instead of the configured one.
    #[arg(long, value_name = "URL", requires = "local")]
    pub seed_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::CliArgs;
    use clap::{CommandFactory, Parser};
    use std::path::PathBuf;

    fn parse(args: &[&str]) -> Result<CliArgs, clap::Error> {
        CliArgs::try_parse_from(std::iter::once("todosync").chain(args.iter().copied()))
    }

    #[test]
    fn definition_is_consistent() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn no_flags_select_remote_mode() {
        let args = parse(&[]).expect("parse");
        assert!(!args.local);
        assert_eq!(args.config, None);
        assert_eq!(args.seed_file, None);
        assert_eq!(args.seed_url, None);
    }

    #[test]
    fn parses_local_mode_with_seed_file() {
        let args = parse(&["--local", "--seed-file", "/tmp/seed.json", "--config", "c.json"])
            .expect("parse");
        assert!(args.local);
        assert_eq!(args.seed_file, Some(PathBuf::from("/tmp/seed.json")));
        assert_eq!(args.config, Some(PathBuf::from("c.json")));
    }

    #[test]
    fn rejects_missing_values_and_unknown_flags() {
        assert!(parse(&["--config"]).is_err());
        assert!(parse(&["--verbose"]).is_err());
    }

    #[test]
    fn seed_flags_require_local_mode() {
        assert!(parse(&["--seed-file", "x.json"]).is_err());
        assert!(parse(&["--seed-url", "http://h"]).is_err());
        assert!(parse(&["--local", "--seed-file", "x", "--seed-url", "http://h"]).is_err());
    }
}
