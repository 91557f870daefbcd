use std::io::Write;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, trace, warn};

use crate::cancel::CancelToken;
use crate::link::Connector;
use crate::payload::Payload;
use crate::settings::{UploadSettings, RECEIVER_CAPACITY, SETTLE_DELAY};
use crate::{Error, Result};

// Longest uninterrupted sleep, bounds how late a cancellation is noticed.
const PAUSE_SLICE: Duration = Duration::from_millis(10);

/// How an upload ended, short of an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every byte was handed to the port, in order.
    Completed {
        /// Number of bytes sent
        bytes: usize,
    },
    /// The upload was cancelled, the bytes from `sent` onwards were never written.
    Cancelled {
        /// Number of bytes written before cancellation
        sent: usize,
        /// Size of the payload, zero if cancelled before it was loaded
        total: usize,
    },
}

/// Runs a single upload from start to finish
#[derive(Debug)]
pub struct Uploader<C> {
    settings: UploadSettings,
    connector: C,
}

impl<C: Connector> Uploader<C> {
    /// Prepare an upload of `settings` through `connector`.
    pub fn new(settings: UploadSettings, connector: C) -> Self {
        Uploader {
            settings,
            connector,
        }
    }

    /// Connect, settle, load the payload and send it byte by byte.
    ///
    /// Progress lines go to `status`. On success the final line is `Done!`, on cancellation it is
    /// `Exiting...`. Errors are returned without printing anything, the caller decides how to
    /// present them.
    pub fn run<W: Write>(&self, cancel: &CancelToken, status: &mut W) -> Result<Outcome> {
        if cancel.is_cancelled() {
            return Ok(cancelled(status, 0, 0));
        }
        let mut port = self.connector.connect(&self.settings)?;
        report(status, &format!("Waiting for device on {}...", self.settings.path));

        debug!("settling for {:?}", SETTLE_DELAY);
        if !pause(SETTLE_DELAY, cancel) {
            return Ok(cancelled(status, 0, 0));
        }

        let payload = Payload::load(&self.settings.payload)?;
        if cancel.is_cancelled() {
            return Ok(cancelled(status, 0, payload.len()));
        }
        report(status, &format!("Sending {} bytes...", payload.len()));
        if payload.len() > RECEIVER_CAPACITY {
            warn!(
                "payload of {} bytes exceeds the receiver buffer of {} bytes",
                payload.len(),
                RECEIVER_CAPACITY
            );
        }

        let sent = transmit(&mut port, &payload, self.settings.byte_delay, cancel)?;
        if sent < payload.len() || cancel.is_cancelled() {
            return Ok(cancelled(status, sent, payload.len()));
        }

        report(status, "Done!");
        Ok(Outcome::Completed { bytes: sent })
    }
}

/// Write `payload` one byte per write, pausing `byte_delay` after each.
///
/// Returns the number of bytes written, which is short of the payload length only if `cancel`
/// fired.
fn transmit<P: Write>(
    port: &mut P,
    payload: &[u8],
    byte_delay: Duration,
    cancel: &CancelToken,
) -> Result<usize> {
    let total = payload.len();
    for (sent, byte) in payload.iter().enumerate() {
        if cancel.is_cancelled() {
            debug!("cancelled after {} of {} bytes", sent, total);
            return Ok(sent);
        }
        trace!("byte {:#04x} at offset {}", byte, sent);
        port.write_all(std::slice::from_ref(byte))
            .and_then(|()| port.flush())
            .map_err(|e| Error::transmission(e, sent, total))?;
        if !pause(byte_delay, cancel) {
            return Ok(sent + 1);
        }
    }
    Ok(total)
}

/// Sleep for at least `duration`. Returns `false` as soon as `cancel` fires.
///
/// A `duration` too long to represent as an `Instant` sleeps until cancelled.
fn pause(duration: Duration, cancel: &CancelToken) -> bool {
    let deadline = Instant::now().checked_add(duration);
    loop {
        if cancel.is_cancelled() {
            return false;
        }
        let slice = match deadline {
            Some(deadline) => {
                let now = Instant::now();
                if now >= deadline {
                    return true;
                }
                (deadline - now).min(PAUSE_SLICE)
            }
            None => PAUSE_SLICE,
        };
        thread::sleep(slice);
    }
}

fn cancelled<W: Write>(status: &mut W, sent: usize, total: usize) -> Outcome {
    report(status, "Exiting...");
    Outcome::Cancelled { sent, total }
}

fn report<W: Write>(status: &mut W, line: &str) {
    if let Err(e) = writeln!(status, "{}", line).and_then(|()| status.flush()) {
        warn!("cannot write status line: {}", e);
    }
}
