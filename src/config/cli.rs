use crate::config::{BaudRate, DEFAULT_CONFIG_FILE};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Relay newline-delimited text between a serial device and stdin/stdout
#[derive(Parser, Debug)]
#[command(name = "chessbridge")]
#[command(version)]
#[command(about = "Relay newline-delimited text between a serial device and stdin/stdout")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Config file (default: ./chessbridge.json when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Serial port, e.g. COM15 or /dev/ttyACM0
    #[arg(short, long)]
    pub port: Option<String>,

    /// Baud rate
    #[arg(short, long, value_name = "RATE")]
    pub baud: Option<BaudRate>,

    /// Serial read timeout in milliseconds
    #[arg(short, long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Echo relayed lines to stderr (same as CHESSBRIDGE_DEBUG=1)
    #[arg(short, long)]
    pub debug: bool,

    /// Directory for the timestamped traffic log
    #[arg(short, long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List available serial ports
    Ports,

    /// Interactively create a config file
    Setup {
        /// Where to write the config
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        output: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_runs_the_relay() {
        let cli = Cli::try_parse_from(["chessbridge"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.run.debug);
        assert!(cli.run.port.is_none());
    }

    #[test]
    fn run_overrides_parse() {
        let cli = Cli::try_parse_from([
            "chessbridge",
            "-p",
            "/dev/ttyACM0",
            "--baud",
            "9600",
            "-t",
            "250",
            "-d",
            "--log-dir",
            "logs",
        ])
        .unwrap();
        assert_eq!(cli.run.port.as_deref(), Some("/dev/ttyACM0"));
        assert_eq!(cli.run.baud, Some(9600));
        assert_eq!(cli.run.timeout_ms, Some(250));
        assert!(cli.run.debug);
        assert_eq!(cli.run.log_dir, Some(PathBuf::from("logs")));
    }

    #[test]
    fn setup_defaults_output() {
        let cli = Cli::try_parse_from(["chessbridge", "setup"]).unwrap();
        match cli.command {
            Some(Commands::Setup { output }) => assert_eq!(output, PathBuf::from(DEFAULT_CONFIG_FILE)),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn rejects_non_numeric_baud() {
        assert!(Cli::try_parse_from(["chessbridge", "-b", "fast"]).is_err());
    }
}
