use crate::utils::{
    error::{RelayError, Result},
    line_printer::LinePrinter,
};
use std::io::{BufRead, Write};
use tracing::info;

pub fn user_console_task<R, W, E>(
    mut input: R,
    serial_port: &mut W,
    line_printer: &mut LinePrinter<E>,
) -> Result<()>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    let mut line = Vec::new();
    loop {
        line.clear();
        let count = input.read_until(b'\n', &mut line).map_err(RelayError::Input)?;
        if count == 0 {
            break;
        }

        let echo = String::from_utf8_lossy(&line);
        line_printer
            .print_line(echo.trim_end())
            .map_err(RelayError::Output)?;

        serial_port
            .write_all(&line)
            .and_then(|_| serial_port.flush())
            .map_err(RelayError::SerialWrite)?;
    }
    Ok(info!("[user_console_task] end of input"))
}
