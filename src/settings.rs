use std::path::{Path, PathBuf};
use std::time::Duration;

/// Baud rate the receiver configures its UART with.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Pause after every single byte handed to the port.
pub const DEFAULT_BYTE_DELAY: Duration = Duration::from_millis(2);

/// Pause between opening the port and sending the first byte.
///
/// Opening the port may reset the device, so its receiver needs a moment before it listens.
pub const SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Read timeout of the opened port. Nothing is read during an upload.
pub const READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Number of bytes the receiver buffers before it reports an overflow.
pub const RECEIVER_CAPACITY: usize = 32 * 1024;

const DEFAULT_PAYLOAD: &str = "guest.o";

/// A builder for the parameters of a single upload
///
/// Only the device path and baud rate are required, everything else has a default matching the
/// receiver firmware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSettings {
    /// The device path of the serial port
    pub(crate) path: String,
    /// The baud rate in symbols-per-second
    pub(crate) baud_rate: u32,
    /// The file whose contents are sent
    pub(crate) payload: PathBuf,
    /// Pause after every byte
    pub(crate) byte_delay: Duration,
}

impl UploadSettings {
    /// Construct settings for an upload to the device at `path`.
    pub fn new<'a>(path: impl Into<std::borrow::Cow<'a, str>>, baud_rate: u32) -> Self {
        UploadSettings {
            path: path.into().into_owned(),
            baud_rate,
            payload: PathBuf::from(DEFAULT_PAYLOAD),
            byte_delay: DEFAULT_BYTE_DELAY,
        }
    }

    /// Set the path to the serial port
    #[must_use]
    pub fn path<'a>(mut self, path: impl Into<std::borrow::Cow<'a, str>>) -> Self {
        self.path = path.into().as_ref().to_owned();
        self
    }

    /// Set the baud rate in symbols-per-second
    #[must_use]
    pub fn baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Set the file to upload
    #[must_use]
    pub fn payload(mut self, payload: impl AsRef<Path>) -> Self {
        self.payload = payload.as_ref().to_owned();
        self
    }

    /// Set the pause taken after every byte
    #[must_use]
    pub fn byte_delay(mut self, byte_delay: Duration) -> Self {
        self.byte_delay = byte_delay;
        self
    }

    /// The device path of the serial port
    pub fn device(&self) -> &str {
        &self.path
    }

    /// The configured baud rate
    pub fn baud(&self) -> u32 {
        self.baud_rate
    }

    /// The file to upload
    pub fn payload_path(&self) -> &Path {
        &self.payload
    }

    /// The pause taken after every byte
    pub fn per_byte_delay(&self) -> Duration {
        self.byte_delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_receiver() {
        let settings = UploadSettings::new("/dev/ttyUSB0", DEFAULT_BAUD_RATE);
        assert_eq!(settings.device(), "/dev/ttyUSB0");
        assert_eq!(settings.baud(), 115_200);
        assert_eq!(settings.payload_path(), Path::new("guest.o"));
        assert_eq!(settings.per_byte_delay(), Duration::from_millis(2));
    }

    #[test]
    fn builder_overrides() {
        let settings = UploadSettings::new("COM1", 9600)
            .path("/dev/ttyACM0")
            .baud_rate(57_600)
            .payload("firmware.bin")
            .byte_delay(Duration::from_millis(5));
        assert_eq!(settings.device(), "/dev/ttyACM0");
        assert_eq!(settings.baud(), 57_600);
        assert_eq!(settings.payload_path(), Path::new("firmware.bin"));
        assert_eq!(settings.per_byte_delay(), Duration::from_millis(5));
    }
}
