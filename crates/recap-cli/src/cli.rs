use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "recap")]
#[command(about = "V-ARCHIVE yearly recap", version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Config file (defaults to <config dir>/recap/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Archive API base URL
    #[arg(long, global = true, env = "RECAP_API_BASE_URL")]
    pub base_url: Option<String>,

    /// Maximum number of board requests in flight
    #[arg(long, global = true, env = "RECAP_CONCURRENCY")]
    pub concurrency: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check whether a nickname exists
    Check {
        /// V-ARCHIVE nickname
        nickname: String,
    },
    /// Build the recap of a player
    Run {
        /// V-ARCHIVE nickname
        nickname: String,

        /// Range start, RFC 3339 or YYYY-MM-DD (midnight KST)
        #[arg(long)]
        from: Option<String>,

        /// Range end (exclusive), RFC 3339 or YYYY-MM-DD (midnight KST)
        #[arg(long)]
        to: Option<String>,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_with_global_options() {
        let cli = Cli::try_parse_from([
            "recap",
            "run",
            "player",
            "--from",
            "2025-03-01",
            "--json",
            "--concurrency",
            "2",
        ])
        .unwrap();

        assert_eq!(cli.global.concurrency, Some(2));
        match cli.command {
            Command::Run {
                nickname,
                from,
                to,
                json,
                output,
            } => {
                assert_eq!(nickname, "player");
                assert_eq!(from.as_deref(), Some("2025-03-01"));
                assert_eq!(to, None);
                assert!(json);
                assert_eq!(output, None);
            }
            Command::Check { .. } => panic!("expected run"),
        }
    }

    #[test]
    fn test_parse_check() {
        let cli = Cli::try_parse_from(["recap", "-v", "check", "player"]).unwrap();
        assert!(cli.global.verbose);
        assert!(matches!(cli.command, Command::Check { nickname } if nickname == "player"));
    }
}
