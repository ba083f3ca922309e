use crate::{
    config::{BaudRate, Config},
    utils::error::{RelayError, Result},
};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::{self, BufReader},
    path::{Path, PathBuf},
};

#[derive(Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(default)]
pub struct ConfigDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baud_rate: Option<BaudRate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_timeout_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

impl Config {
    pub fn to_dto(&self) -> ConfigDto {
        ConfigDto {
            port_name: Some(self.port_name.clone()),
            baud_rate: Some(self.baud_rate),
            read_timeout_ms: Some(self.read_timeout.as_millis() as u64),
            debug: Some(self.debug.is_enabled()),
            log_dir: self.log_dir.clone(),
        }
    }

    pub fn save_config_file(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(&self.to_dto()).map_err(|source| {
            RelayError::ConfigFile {
                path: path.to_path_buf(),
                source,
            }
        })?;
        fs::write(path, contents)?;
        Ok(())
    }
}

impl ConfigDto {
    pub fn read_config_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| RelayError::config(format!("cannot open {:?}: {}", path, e)))?;
        Self::from_file(path, file)
    }

    pub fn read_optional_config_file(path: &Path) -> Result<Option<Self>> {
        match File::open(path) {
            Ok(file) => Self::from_file(path, file).map(Some),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RelayError::config(format!("cannot open {:?}: {}", path, e))),
        }
    }

    fn from_file(path: &Path, file: File) -> Result<Self> {
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).map_err(|source| RelayError::ConfigFile {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DebugFlag;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn saved_config_reads_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bridge.json");
        let cfg = Config {
            port_name: "/dev/ttyUSB1".to_string(),
            baud_rate: 3_000_000,
            read_timeout: Duration::from_millis(500),
            debug: DebugFlag::enabled(),
            log_dir: Some(PathBuf::from("traffic")),
        };
        cfg.save_config_file(&path).unwrap();

        let dto = ConfigDto::read_config_file(&path).unwrap();
        assert_eq!(dto, cfg.to_dto());
    }

    #[test]
    fn missing_optional_file_is_none() {
        let dir = tempdir().unwrap();
        let dto = ConfigDto::read_optional_config_file(&dir.path().join("absent.json")).unwrap();
        assert!(dto.is_none());
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ port_name = COM3 }").unwrap();
        match ConfigDto::read_config_file(&path) {
            Err(RelayError::ConfigFile { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn absent_log_dir_is_not_written() {
        let cfg = Config::default();
        let json = serde_json::to_string(&cfg.to_dto()).unwrap();
        assert!(!json.contains("log_dir"));
        assert!(json.contains("\"port_name\":\"COM15\""));
    }
}
