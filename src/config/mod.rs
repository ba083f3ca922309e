pub mod cli;
pub mod custom_config;
pub mod read_config;

use crate::{
    config::{cli::RunArgs, read_config::ConfigDto},
    utils::error::{RelayError, Result},
};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

pub type BaudRate = u32;
pub const DEFAULT_PORT_NAME: &'static str = "COM15";
pub const DEFAULT_BAUD_RATE: BaudRate = 115_200;
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(1);
pub const DEFAULT_CONFIG_FILE: &'static str = "chessbridge.json";
pub const DEBUG_ENV_VAR: &'static str = "CHESSBRIDGE_DEBUG";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DebugFlag(bool);

impl DebugFlag {
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var(DEBUG_ENV_VAR).ok().as_deref())
    }

    pub fn from_env_value(value: Option<&str>) -> Self {
        DebugFlag(value == Some("1"))
    }

    pub fn enabled() -> Self {
        DebugFlag(true)
    }

    pub fn is_enabled(self) -> bool {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port_name: String,
    pub baud_rate: BaudRate,
    pub read_timeout: Duration,
    pub debug: DebugFlag,
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port_name: DEFAULT_PORT_NAME.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout: DEFAULT_READ_TIMEOUT,
            debug: DebugFlag::default(),
            log_dir: None,
        }
    }
}

impl Config {
    pub fn resolve(args: &RunArgs) -> Result<Self> {
        Self::resolve_with(args, Path::new(DEFAULT_CONFIG_FILE), DebugFlag::from_env())
    }

    // defaults < config file < flags; the environment can only enable debug
    pub fn resolve_with(args: &RunArgs, default_config: &Path, env_debug: DebugFlag) -> Result<Self> {
        let mut cfg = Config::default();

        let dto = match &args.config {
            Some(path) => Some(ConfigDto::read_config_file(path)?),
            None => ConfigDto::read_optional_config_file(default_config)?,
        };
        if let Some(dto) = dto {
            cfg.apply_dto(dto);
        }
        cfg.apply_args(args);
        if env_debug.is_enabled() {
            cfg.debug = env_debug;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    fn apply_dto(&mut self, dto: ConfigDto) {
        if let Some(port_name) = dto.port_name {
            self.port_name = port_name;
        }
        if let Some(baud_rate) = dto.baud_rate {
            self.baud_rate = baud_rate;
        }
        if let Some(ms) = dto.read_timeout_ms {
            self.read_timeout = Duration::from_millis(ms);
        }
        if let Some(debug) = dto.debug {
            self.debug = DebugFlag(debug);
        }
        if dto.log_dir.is_some() {
            self.log_dir = dto.log_dir;
        }
    }

    fn apply_args(&mut self, args: &RunArgs) {
        if let Some(port_name) = &args.port {
            self.port_name = port_name.clone();
        }
        if let Some(baud_rate) = args.baud {
            self.baud_rate = baud_rate;
        }
        if let Some(ms) = args.timeout_ms {
            self.read_timeout = Duration::from_millis(ms);
        }
        if args.debug {
            self.debug = DebugFlag::enabled();
        }
        if args.log_dir.is_some() {
            self.log_dir = args.log_dir.clone();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.port_name.trim().is_empty() {
            return Err(RelayError::config("empty serial port name"));
        }
        if self.baud_rate == 0 {
            return Err(RelayError::config("baud rate must be positive"));
        }
        if self.read_timeout.is_zero() {
            return Err(RelayError::config("read timeout must be positive"));
        }
        Ok(())
    }
}
