use crate::{
    config::Config,
    threads::{set_thread_priority, SERIAL_CONSOLE_THREAD_PRIORITY},
    utils::{
        error::{RelayError, Result},
        line_printer::LinePrinter,
    },
};
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::{
    io::{self, BufRead, BufReader, Write},
    process,
    thread::{self, JoinHandle},
};
use tracing::{debug, error, info, warn};

pub fn open_serial_port(config: &Config) -> Result<Box<dyn SerialPort>> {
    serialport::new(&config.port_name, config.baud_rate)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .flow_control(FlowControl::None)
        .timeout(config.read_timeout)
        .open()
        .map_err(|source| RelayError::SerialOpen {
            port_name: config.port_name.clone(),
            source,
        })
}

fn is_timeout(e: &io::Error) -> bool {
    matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
}

/// Returns `Ok` only when the device stream reports end of file.
pub fn serial_console_task<R, W, E>(
    mut device: R,
    output: &mut W,
    line_printer: &mut LinePrinter<E>,
) -> Result<()>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    let mut read_buf = Vec::new();
    loop {
        match device.read_until(b'\n', &mut read_buf) {
            Ok(0) => return Ok(()),
            Ok(_) => {}
            Err(ref e) if is_timeout(e) => {
                if read_buf.is_empty() {
                    continue;
                }
            }
            Err(e) => return Err(RelayError::SerialRead(e)),
        }
        forward_line(&read_buf, output, line_printer)?;
        read_buf.clear();
    }
}

/// Undecodable lines are dropped and reported to the traffic log.
fn forward_line<W, E>(bytes: &[u8], output: &mut W, line_printer: &mut LinePrinter<E>) -> Result<()>
where
    W: Write,
    E: Write,
{
    let text = match std::str::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!(
                "[serial_console_task] dropped undecodable line ({}): {}",
                e,
                bytes.escape_ascii()
            );
            line_printer.report_dropped(bytes);
            return Ok(());
        }
    };

    let line = text.trim_end();
    if line.is_empty() {
        return Ok(());
    }

    output
        .write_all(format!("{}\n", line).as_bytes())
        .and_then(|_| output.flush())
        .map_err(RelayError::Output)?;
    line_printer.print_line(line).map_err(RelayError::Output)
}

/// Background reader for the device to host direction. Never joined: the
/// process exits from the main thread and the reader goes with it.
pub struct SerialConsoleThread {
    join_handle: JoinHandle<()>,
}

impl SerialConsoleThread {
    pub fn spawn<E>(serial_port: Box<dyn SerialPort>, line_printer: LinePrinter<E>) -> Result<Self>
    where
        E: Write + Send + 'static,
    {
        let join_handle = thread::Builder::new()
            .name("serial-console".to_string())
            .spawn(move || {
                set_thread_priority::<SERIAL_CONSOLE_THREAD_PRIORITY>();
                run_detached(serial_port, line_printer)
            })?;
        Ok(Self { join_handle })
    }

    pub fn detach(self) {
        debug!(
            "[serial_console_thread] detached (finished: {})",
            self.join_handle.is_finished()
        );
    }
}

fn run_detached<E: Write>(serial_port: Box<dyn SerialPort>, mut line_printer: LinePrinter<E>) {
    info!("[serial_console_task] start");
    let device = BufReader::new(serial_port);
    let mut output = io::stdout();
    match serial_console_task(device, &mut output, &mut line_printer) {
        Ok(()) => warn!("[serial_console_task] device stream ended"),
        Err(e) => {
            error!("[serial_console_task] {}", e);
            eprintln!("> [serial_console_task] error {}", e);
            process::exit(1);
        }
    }
}
