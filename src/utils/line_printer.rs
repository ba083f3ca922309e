use chrono::Utc;
use colored::{Color, Colorize};
use std::{
    io::{self, Write},
    sync::mpsc::Sender,
};

pub const DATE_TIME_FMT: &'static str = "%y-%m-%d %H:%M:%S%.3f";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    DeviceToHost,
    HostToDevice,
}

impl Direction {
    pub fn tag(self) -> &'static str {
        match self {
            Direction::DeviceToHost => "Pico → GUI",
            Direction::HostToDevice => "GUI → Pico",
        }
    }

    fn color(self) -> Color {
        match self {
            Direction::DeviceToHost => Color::Green,
            Direction::HostToDevice => Color::Red,
        }
    }

    fn log_code(self) -> &'static str {
        match self {
            Direction::DeviceToHost => "r",
            Direction::HostToDevice => "w",
        }
    }
}

pub struct LinePrinter<W: Write> {
    direction: Direction,
    debug: bool,
    writer: W,
    line_sender: Option<Sender<String>>,
}

impl<W: Write> LinePrinter<W> {
    pub fn new(
        direction: Direction,
        debug: bool,
        writer: W,
        line_sender: Option<Sender<String>>,
    ) -> Self {
        Self {
            direction,
            debug,
            writer,
            line_sender,
        }
    }

    pub fn print_line(&mut self, line: &str) -> io::Result<()> {
        if self.debug {
            let echo = format!("{}: {}", self.direction.tag(), line);
            let echo = echo.as_str().color(self.direction.color());
            // one write per record so the two directions never interleave mid-line
            self.writer.write_all(format!("{}\n", echo).as_bytes())?;
            self.writer.flush()?;
        }
        self.send_log(self.direction.log_code(), line);
        Ok(())
    }

    pub fn report_dropped(&mut self, bytes: &[u8]) {
        let code = format!("{}!", self.direction.log_code());
        self.send_log(&code, &bytes.escape_ascii().to_string());
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn send_log(&self, code: &str, line: &str) {
        if let Some(line_sender) = &self.line_sender {
            let now = Utc::now();
            let _ = line_sender.send(format!("{} {} {}", now.format(DATE_TIME_FMT), code, line));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;

    #[test]
    fn silent_without_debug() {
        let mut printer = LinePrinter::new(Direction::DeviceToHost, false, Vec::<u8>::new(), None);
        printer.print_line("ok").unwrap();
        assert!(printer.into_inner().is_empty());
    }

    #[test]
    fn device_echo_is_green_and_reset() {
        colored::control::set_override(true);
        let mut printer = LinePrinter::new(Direction::DeviceToHost, true, Vec::<u8>::new(), None);
        printer.print_line("bestmove e7e5").unwrap();
        let out = String::from_utf8(printer.into_inner()).unwrap();
        assert_eq!(out, "\x1b[32mPico → GUI: bestmove e7e5\x1b[0m\n");
    }

    #[test]
    fn host_echo_is_red() {
        colored::control::set_override(true);
        let mut printer = LinePrinter::new(Direction::HostToDevice, true, Vec::<u8>::new(), None);
        printer.print_line("e2e4").unwrap();
        let out = String::from_utf8(printer.into_inner()).unwrap();
        assert_eq!(out, "\x1b[31mGUI → Pico: e2e4\x1b[0m\n");
    }

    #[test]
    fn traffic_log_gets_every_line() {
        let (line_sender, line_receiver) = channel();
        let mut printer =
            LinePrinter::new(Direction::HostToDevice, false, Vec::<u8>::new(), Some(line_sender));
        printer.print_line("uci").unwrap();
        printer.print_line("isready").unwrap();
        drop(printer);

        let records: Vec<String> = line_receiver.iter().collect();
        assert_eq!(records.len(), 2);
        assert!(records[0].ends_with(" w uci"));
        assert!(records[1].ends_with(" w isready"));
    }

    #[test]
    fn dropped_bytes_are_escaped() {
        let (line_sender, line_receiver) = channel();
        let mut printer =
            LinePrinter::new(Direction::DeviceToHost, false, Vec::<u8>::new(), Some(line_sender));
        printer.report_dropped(&[0xff, b'a', b'\n']);
        drop(printer);

        let record = line_receiver.recv().unwrap();
        assert!(record.ends_with(" r! \\xffa\\n"), "{}", record);
    }
}
