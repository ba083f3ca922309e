use crate::{
    config::{BaudRate, Config, DebugFlag, DEFAULT_BAUD_RATE},
    utils::{
        error::{RelayError, Result},
        user_io::{read_and_parse_user_entry, ReadAndParseUserEntryRes},
    },
};
use rustyline::{error::ReadlineError, Editor};
use serialport::{available_ports, SerialPortType, UsbPortInfo};
use std::{
    io,
    num::ParseIntError,
    path::{Path, PathBuf},
};

pub struct PortInfo {
    pub port_name: String,
    pub usb_port_info: Option<UsbPortInfo>,
}

impl PortInfo {
    pub fn available() -> Result<Vec<PortInfo>> {
        let ports = available_ports().map_err(io::Error::from)?;
        Ok(ports
            .into_iter()
            .map(|serial_port_info| PortInfo {
                port_name: serial_port_info.port_name,
                usb_port_info: match serial_port_info.port_type {
                    SerialPortType::UsbPort(usb_port_info) => Some(usb_port_info),
                    _ => None,
                },
            })
            .collect())
    }

    pub fn describe(&self) -> String {
        match &self.usb_port_info {
            Some(inf) => usb_description(&self.port_name, inf.vid, inf.pid, inf.product.as_deref()),
            None => self.port_name.clone(),
        }
    }
}

fn usb_description(port_name: &str, vid: u16, pid: u16, product: Option<&str>) -> String {
    match product {
        Some(product) => format!("{} vid{:04x}:pid{:04x} {}", port_name, vid, pid, product),
        None => format!("{} vid{:04x}:pid{:04x}", port_name, vid, pid),
    }
}

pub fn print_available_ports() -> Result<()> {
    let ports = PortInfo::available()?;
    if ports.is_empty() {
        println!("> No serial ports found");
    }
    for (idx, p) in ports.iter().enumerate() {
        println!("{}) {}", idx + 1, p.describe());
    }
    Ok(())
}

pub fn baud_rate_from_choice(choice: BaudRate) -> Option<BaudRate> {
    match choice {
        0 => None,
        1 => Some(115_200),
        2 => Some(3_000_000),
        baud_rate => Some(baud_rate),
    }
}

pub enum UserSelectPortRes {
    Port(String),
    EntryOutOfRange,
    ParseErr {
        e: ParseIntError,
        user_entry: String,
    },
    ReadErr(ReadlineError),
}

fn user_select_port(editor: &mut Editor<()>, ports: &[PortInfo]) -> UserSelectPortRes {
    println!("Serial Ports to select from:");
    for (idx, p) in ports.iter().enumerate() {
        println!("{}) {}", idx + 1, p.describe());
    }

    let msg = "Enter index of port (or enter to type a port name)";
    match read_and_parse_user_entry::<usize>(editor, msg) {
        ReadAndParseUserEntryRes::Ok(entered_idx) => {
            if 1 > entered_idx || entered_idx > ports.len() {
                UserSelectPortRes::EntryOutOfRange
            } else {
                UserSelectPortRes::Port(ports[entered_idx - 1].port_name.clone())
            }
        }
        ReadAndParseUserEntryRes::EmptyEntry => match user_enter_port_name(editor) {
            Ok(port_name) => UserSelectPortRes::Port(port_name),
            Err(e) => UserSelectPortRes::ReadErr(e),
        },
        ReadAndParseUserEntryRes::ParseErr { e, user_entry } => {
            UserSelectPortRes::ParseErr { e, user_entry }
        }
        ReadAndParseUserEntryRes::ReadErr(e) => UserSelectPortRes::ReadErr(e),
    }
}

fn user_enter_port_name(editor: &mut Editor<()>) -> std::result::Result<String, ReadlineError> {
    loop {
        let port_name = editor.readline("Enter serial port name: ")?;
        let port_name = port_name.trim();
        if port_name.is_empty() {
            println!("> Empty port name. Try again");
        } else {
            break Ok(port_name.to_string());
        }
    }
}

fn user_select_baud_rate(editor: &mut Editor<()>, port_name: &str) -> Result<BaudRate> {
    loop {
        println!("Baud rates options for port {:?}:", port_name);
        println!("1) 115200");
        println!("2) 3000000");
        println!("_) custom value");

        match read_and_parse_user_entry::<BaudRate>(editor, "Enter 1, 2, or a custom value (enter for 115200)") {
            ReadAndParseUserEntryRes::Ok(choice) => match baud_rate_from_choice(choice) {
                Some(baud_rate) => break Ok(baud_rate),
                None => println!("> Invalid Entry, try again\n"),
            },
            ReadAndParseUserEntryRes::EmptyEntry => break Ok(DEFAULT_BAUD_RATE),
            ReadAndParseUserEntryRes::ParseErr { e, user_entry } => {
                println!("> Invalid Entry {:?} {:?}\n", user_entry, e);
            }
            ReadAndParseUserEntryRes::ReadErr(e) => return Err(RelayError::Readline(e)),
        }
    }
}

fn user_select_debug(editor: &mut Editor<()>) -> Result<DebugFlag> {
    loop {
        let entry = editor.readline("Echo relayed lines to stderr? [y/N]: ")?;
        match entry.trim() {
            "y" | "Y" | "yes" => break Ok(DebugFlag::enabled()),
            "" | "n" | "N" | "no" => break Ok(DebugFlag::default()),
            other => println!("> Invalid Entry {:?}\n", other),
        }
    }
}

fn user_enter_log_dir(editor: &mut Editor<()>) -> Result<Option<PathBuf>> {
    let entry = editor.readline("Traffic log directory (enter for none): ")?;
    let entry = entry.trim();
    Ok(if entry.is_empty() {
        None
    } else {
        Some(PathBuf::from(entry))
    })
}

impl Config {
    pub fn user_create_custom(output: &Path) -> Result<Self> {
        let ports = PortInfo::available()?;
        if ports.is_empty() {
            println!("> No serial ports found\n");
        }

        let mut editor = Editor::<()>::new();
        let port_name = loop {
            match user_select_port(&mut editor, &ports) {
                UserSelectPortRes::Port(port_name) => break port_name,
                UserSelectPortRes::EntryOutOfRange => println!("> Entry Out of Range\n"),
                UserSelectPortRes::ParseErr { e, user_entry } => {
                    println!("> Invalid Entry {:?} {:?}\n", user_entry, e);
                }
                UserSelectPortRes::ReadErr(e) => return Err(RelayError::Readline(e)),
            }
        };
        println!("> Selected {}\n", port_name);

        let baud_rate = user_select_baud_rate(&mut editor, &port_name)?;
        println!("> Set baud rate of {:?} as {}\n", port_name, baud_rate);

        let cfg = Config {
            port_name,
            baud_rate,
            debug: user_select_debug(&mut editor)?,
            log_dir: user_enter_log_dir(&mut editor)?,
            ..Config::default()
        };
        cfg.validate()?;
        cfg.save_config_file(output)?;
        println!("> Saved config to {:?}", output);
        Ok(cfg)
    }
}
