use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use log::{info, warn};
use serial_upload::{
    install_interrupt_handler, CancelToken, Outcome, SerialConnector, UploadSettings, Uploader,
    DEFAULT_BAUD_RATE,
};

const EXIT_CANCELLED: u8 = 130;

/// Send a binary to a microcontroller over a serial port, one paced byte at a time.
#[derive(Debug, Parser)]
#[clap(version, about)]
struct Cli {
    /// Serial device the microcontroller is attached to
    #[clap(default_value = "/dev/ttyUSB0")]
    port: String,
    /// File to upload
    #[clap(default_value = "guest.o")]
    file: PathBuf,
    /// Baud rate, must match the receiver
    #[clap(long, default_value_t = DEFAULT_BAUD_RATE)]
    baud: u32,
    /// Pause after every byte, in milliseconds
    #[clap(long, default_value_t = 2)]
    byte_delay_ms: u64,
    /// List the serial ports found on this system and exit
    #[clap(long)]
    list: bool,
}

fn list_ports() -> ExitCode {
    match serialport::available_ports() {
        Ok(ports) if ports.is_empty() => println!("No ports found."),
        Ok(ports) => {
            for port in ports {
                println!("{}", port.port_name);
            }
        }
        Err(e) => {
            println!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    if cli.list {
        return list_ports();
    }

    let cancel = install_interrupt_handler().unwrap_or_else(|e| {
        warn!("Ctrl-C will abort without cleanup: {}", e);
        CancelToken::new()
    });

    let settings = UploadSettings::new(cli.port, cli.baud)
        .payload(&cli.file)
        .byte_delay(Duration::from_millis(cli.byte_delay_ms));
    let uploader = Uploader::new(settings, SerialConnector);

    let mut stdout = io::stdout();
    match uploader.run(&cancel, &mut stdout) {
        Ok(Outcome::Completed { bytes }) => {
            info!("upload of {} bytes complete", bytes);
            ExitCode::SUCCESS
        }
        Ok(Outcome::Cancelled { sent, total }) => {
            info!("upload cancelled after {} of {} bytes", sent, total);
            ExitCode::from(EXIT_CANCELLED)
        }
        Err(e) => {
            let _ = writeln!(stdout, "Error: {}", e);
            ExitCode::from(e.kind().exit_code())
        }
    }
}
