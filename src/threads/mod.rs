use crate::{
    config::Config,
    serial_console_thread::{open_serial_port, SerialConsoleThread},
    threads::file_logger_thread::FileLoggerThread,
    user_console_thread::user_console_task,
    utils::{
        error::{RelayError, Result},
        line_printer::{Direction, LinePrinter},
    },
};
use std::{
    io::{stderr, stdin},
    process,
    sync::{mpsc::channel, Arc, Mutex, PoisonError},
};
use thread_priority::{set_current_thread_priority, ThreadPriority};
use tracing::{debug, info, warn};

pub mod file_logger_thread;

pub const SERIAL_CONSOLE_THREAD_PRIORITY: u8 = 1;
pub const FILE_LOGGER_THREAD_PRIORITY: u8 = 0;

pub fn set_thread_priority<const PRIORITY: u8>() {
    let priority = match PRIORITY.try_into() {
        Ok(value) => ThreadPriority::Crossplatform(value),
        Err(e) => return debug!("[set_thread_priority] invalid priority {}: {:?}", PRIORITY, e),
    };
    if let Err(e) = set_current_thread_priority(priority) {
        debug!("[set_thread_priority] {} => {:?}", PRIORITY, e);
    }
}

type TrafficLogSlot = Arc<Mutex<Option<FileLoggerThread>>>;

// The lock is held through the join so an interrupt arriving during a normal
// shutdown waits for the drain to finish.
fn finish_traffic_log(slot: &Mutex<Option<FileLoggerThread>>) {
    let mut slot_guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(file_logger_thread) = slot_guard.take() {
        if let Err(e) = file_logger_thread.join() {
            warn!("[main_task] traffic log incomplete: {}", e);
        }
    }
}

fn install_interrupt_handler(traffic_log: TrafficLogSlot) -> Result<()> {
    ctrlc::set_handler(move || {
        info!("[main_task] interrupted");
        finish_traffic_log(&traffic_log);
        process::exit(0);
    })
    .map_err(RelayError::from)
}

pub fn main_task(cfg: Config) -> Result<()> {
    let debug = cfg.debug.is_enabled();
    if debug {
        colored::control::set_override(true);
    }

    let serial_port = open_serial_port(&cfg)?;
    info!(
        "[main_task] opened {} at {} baud (timeout {:?})",
        cfg.port_name, cfg.baud_rate, cfg.read_timeout
    );
    let mut port_writer = serial_port.try_clone().map_err(|source| RelayError::SerialOpen {
        port_name: cfg.port_name.clone(),
        source,
    })?;

    let (line_sender, file_logger_thread) = match &cfg.log_dir {
        Some(log_dir) => {
            let (line_sender, line_receiver) = channel();
            let file_logger_thread = FileLoggerThread::spawn(log_dir, line_receiver)?;
            (Some(line_sender), Some(file_logger_thread))
        }
        None => (None, None),
    };

    let traffic_log: TrafficLogSlot = Arc::new(Mutex::new(file_logger_thread));
    install_interrupt_handler(Arc::clone(&traffic_log))?;

    SerialConsoleThread::spawn(
        serial_port,
        LinePrinter::new(Direction::DeviceToHost, debug, stderr(), line_sender.clone()),
    )?
    .detach();

    let mut line_printer = LinePrinter::new(Direction::HostToDevice, debug, stderr(), line_sender);
    let stdin = stdin();
    let res = user_console_task(stdin.lock(), &mut port_writer, &mut line_printer);
    drop(line_printer);

    finish_traffic_log(&traffic_log);

    res?;
    Ok(info!("[main_task] end"))
}
