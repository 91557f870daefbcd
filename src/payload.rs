use std::fs;
use std::ops::Deref;
use std::path::Path;

use log::debug;

use crate::{Error, Result};

/// The complete contents of the file being uploaded
///
/// The file is read in full before any byte is sent. Changes made to the file afterwards do not
/// reach an upload in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    bytes: Box<[u8]>,
}

impl Payload {
    /// Read the whole file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| Error::payload(e, path))?;
        debug!("loaded {} bytes from {}", bytes.len(), path.display());
        Ok(Payload::from(bytes))
    }

    /// The payload as a byte slice
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Payload {
            bytes: bytes.into_boxed_slice(),
        }
    }
}

impl Deref for Payload {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes
    }
}
