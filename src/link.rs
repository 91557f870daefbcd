use std::io;

use log::debug;
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};

use crate::settings::{UploadSettings, READ_TIMEOUT};
use crate::Result;

/// Opens the channel an upload is written to
///
/// [`SerialConnector`] is the real implementation. Anything that accepts bytes through
/// [`io::Write`] can stand in for a serial port.
pub trait Connector {
    /// The open channel
    type Port: io::Write;

    /// Open the channel described by `settings`.
    ///
    /// Failing to open must yield an error of kind [`ErrorKind::Connection`].
    ///
    /// [`ErrorKind::Connection`]: crate::ErrorKind::Connection
    fn connect(&self, settings: &UploadSettings) -> Result<Self::Port>;
}

/// Opens a serial port through the `serialport` crate
///
/// The port is configured as 8N1 without flow control, which is what the receiver expects.
#[derive(Debug, Default, Clone, Copy)]
pub struct SerialConnector;

impl Connector for SerialConnector {
    type Port = Box<dyn SerialPort>;

    fn connect(&self, settings: &UploadSettings) -> Result<Self::Port> {
        debug!(
            "opening {} at {} baud, 8N1, no flow control",
            settings.path, settings.baud_rate
        );
        let port = serialport::new(settings.path.as_str(), settings.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(READ_TIMEOUT)
            .open()?;
        Ok(port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn missing_device_is_a_connection_error() {
        let settings = UploadSettings::new("/dev/serial-upload-does-not-exist", 115_200);
        match SerialConnector.connect(&settings) {
            Ok(_) => panic!("opened a device that does not exist"),
            Err(err) => assert_eq!(err.kind(), ErrorKind::Connection),
        }
    }
}
