use std::{
    fs::{create_dir_all, File, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
    sync::mpsc::{Receiver, RecvTimeoutError},
    thread::{self, JoinHandle},
    time::Duration,
};

use chrono::Utc;
use tracing::{error, info};

use crate::{
    threads::{set_thread_priority, FILE_LOGGER_THREAD_PRIORITY},
    utils::{
        error::Result,
        sync_flag::{new_run_flag, RunFlag, RunFlagStopper},
    },
};

/// Appends traffic records to `<log_dir>/chessbridge_<yymmdd_HHMMSS>.log`.
pub struct FileLoggerThread {
    stopper: RunFlagStopper,
    file_path: PathBuf,
    join_handle: JoinHandle<io::Result<()>>,
}

impl FileLoggerThread {
    pub fn spawn(log_dir: &Path, line_receiver: Receiver<String>) -> Result<Self> {
        create_dir_all(log_dir)?;

        let fmt = "%y%m%d_%H%M%S";
        let now = Utc::now();
        let file_name = format!("chessbridge_{}.log", now.format(fmt));
        let file_path = log_dir.join(file_name);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file_path)?;
        info!("[file_logger_task] opened {:?}", file_path);

        let (flag, stopper) = new_run_flag();
        let join_handle = thread::Builder::new()
            .name("file-logger".to_string())
            .spawn(move || {
                set_thread_priority::<FILE_LOGGER_THREAD_PRIORITY>();
                file_logger_task(flag, file, line_receiver)
            })?;
        Ok(Self {
            stopper,
            file_path,
            join_handle,
        })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn join(self) -> io::Result<()> {
        self.stopper.stop();
        match self.join_handle.join() {
            Ok(res) => res,
            Err(_) => Err(io::Error::new(io::ErrorKind::Other, "file logger panicked")),
        }
    }
}

fn file_logger_task(flag: RunFlag, mut file: File, line_receiver: Receiver<String>) -> io::Result<()> {
    let mut synced = true;
    while flag.is_running() {
        let duration = Duration::from_millis(100);
        match line_receiver.recv_timeout(duration) {
            Ok(line) => {
                write_line(&mut file, line)?;
                synced = false;
            }
            Err(RecvTimeoutError::Timeout) => {
                if !synced {
                    sync(&file)?;
                    synced = true;
                }
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    for line in line_receiver.try_iter() {
        write_line(&mut file, line)?;
    }
    sync(&file)
}

fn write_line(file: &mut File, mut line: String) -> io::Result<()> {
    line.push('\n');
    file.write_all(line.as_bytes()).map_err(|e| {
        error!("[file_logger_task] write error {:#?}", e);
        e
    })
}

fn sync(file: &File) -> io::Result<()> {
    file.sync_all().map_err(|e| {
        error!("[file_logger_task] sync error {:#?}", e);
        e
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, sync::mpsc::channel};
    use tempfile::tempdir;

    #[test]
    fn records_are_drained_on_join() {
        let dir = tempdir().unwrap();
        let log_dir = dir.path().join("traffic");
        let (line_sender, line_receiver) = channel();
        let logger = FileLoggerThread::spawn(&log_dir, line_receiver).unwrap();
        let file_path = logger.file_path().to_path_buf();

        line_sender.send("24-01-01 00:00:00.000 w uci".to_string()).unwrap();
        line_sender.send("24-01-01 00:00:00.010 r uciok".to_string()).unwrap();
        logger.join().unwrap();

        let contents = fs::read_to_string(&file_path).unwrap();
        assert_eq!(
            contents,
            "24-01-01 00:00:00.000 w uci\n24-01-01 00:00:00.010 r uciok\n"
        );
        assert!(file_path.starts_with(&log_dir));
        let name = file_path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("chessbridge_") && name.ends_with(".log"));
    }

    #[test]
    fn logger_stops_when_senders_are_gone() {
        let dir = tempdir().unwrap();
        let (line_sender, line_receiver) = channel::<String>();
        let logger = FileLoggerThread::spawn(dir.path(), line_receiver).unwrap();
        drop(line_sender);
        logger.join().unwrap();
    }
}
