// Default serial settings match the Pi Pico board controller:
// COM15 (or /dev/ttyACM0 on Linux) at 115200 baud, 8N1.
// `chessbridge ports` lists what is attached.

use chessbridge::{
    config::{
        cli::{Cli, Commands},
        custom_config::print_available_ports,
        Config,
    },
    threads::main_task,
    utils::{error::Result, logger::init_logger},
};
use clap::Parser;
use std::process::ExitCode;

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Ports) => print_available_ports(),
        Some(Commands::Setup { output }) => Config::user_create_custom(&output).map(|_| ()),
        None => {
            let cfg = Config::resolve(&cli.run)?;
            init_logger(cfg.debug.is_enabled());
            main_task(cfg)
        }
    }
}

pub fn main() -> ExitCode {
    match run(Cli::parse()) {
        Err(e) => {
            eprintln!("> [main] error {}", e);
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}
