//! serial-upload pushes a binary payload to a microcontroller over a serial port, one byte at a
//! time.
//!
//! The receiving side is assumed to run a plain byte-by-byte receive loop without flow control,
//! framing or acknowledgements. The only thing keeping the transfer intact is pacing: the host
//! waits a short settle delay after opening the port and then a fixed delay after every single
//! byte.
//!
//! The whole upload is driven by an [`Uploader`]:
//!
//! ```no_run
//! use serial_upload::{CancelToken, SerialConnector, Uploader, UploadSettings};
//!
//! let settings = UploadSettings::new("/dev/ttyUSB0", 115_200).payload("guest.o");
//! let outcome = Uploader::new(settings, SerialConnector)
//!     .run(&CancelToken::new(), &mut std::io::stdout())?;
//! println!("{:?}", outcome);
//! # Ok::<(), serial_upload::Error>(())
//! ```

#![deny(
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    unused
)]
// Don't worry about needing to `unwrap()` or otherwise handle some results in
// doc tests.
#![doc(test(attr(allow(unused_must_use))))]

use std::error::Error as StdError;
use std::fmt;
use std::io;

mod cancel;
mod link;
mod payload;
mod settings;
mod transfer;

pub use crate::cancel::{install_interrupt_handler, CancelToken};
pub use crate::link::{Connector, SerialConnector};
pub use crate::payload::Payload;
pub use crate::settings::{
    UploadSettings, DEFAULT_BAUD_RATE, DEFAULT_BYTE_DELAY, READ_TIMEOUT, RECEIVER_CAPACITY,
    SETTLE_DELAY,
};
pub use crate::transfer::{Outcome, Uploader};

/// A type for results generated by an upload
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of errors that can end an upload
///
/// An interrupted upload is not an error and is reported through
/// [`Outcome::Cancelled`] instead.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The serial port could not be opened or configured.
    ///
    /// Raised for a missing device, a device already in use or an unsupported baud rate.
    Connection,

    /// The payload file is missing or could not be read.
    Payload,

    /// Writing to the open port failed mid-transfer.
    ///
    /// Some prefix of the payload may already be on the wire.
    Transmission,
}

impl ErrorKind {
    /// The process exit code used when an upload ends with this kind of error.
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Connection => 2,
            ErrorKind::Payload => 3,
            ErrorKind::Transmission => 4,
        }
    }
}

/// An error type for upload operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    /// The kind of error this is
    pub kind: ErrorKind,
    /// A description of the error suitable for end-users
    pub description: String,
}

impl Error {
    /// Instantiates a new error
    pub fn new<T: Into<String>>(kind: ErrorKind, description: T) -> Self {
        Error {
            kind,
            description: description.into(),
        }
    }

    /// Returns the corresponding `ErrorKind` for this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub(crate) fn payload(err: io::Error, path: &std::path::Path) -> Self {
        Error::new(
            ErrorKind::Payload,
            format!("cannot read payload `{}`: {}", path.display(), err),
        )
    }

    pub(crate) fn transmission(err: io::Error, sent: usize, total: usize) -> Self {
        Error::new(
            ErrorKind::Transmission,
            format!("write failed after {} of {} bytes: {}", sent, total, err),
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> std::result::Result<(), fmt::Error> {
        fmt.write_str(&self.description)
    }
}

impl StdError for Error {}

impl From<serialport::Error> for Error {
    fn from(err: serialport::Error) -> Error {
        Error::new(ErrorKind::Connection, err.description)
    }
}
