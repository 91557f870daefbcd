use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// A shared flag that asks a running upload to stop
///
/// Clones observe the same flag. The upload checks it between steps and before every byte, so
/// stopping never tears a byte in half.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

static INTERRUPT_TOKEN: OnceLock<CancelToken> = OnceLock::new();

/// Route the interrupt signal (Ctrl-C) to a [`CancelToken`].
///
/// Calling this more than once returns the token installed by the first call. On platforms
/// without POSIX signals the default interrupt behaviour is left in place and the returned token
/// is only cancelled manually.
pub fn install_interrupt_handler() -> io::Result<CancelToken> {
    if let Some(token) = INTERRUPT_TOKEN.get() {
        return Ok(token.clone());
    }
    let token = INTERRUPT_TOKEN.get_or_init(CancelToken::new).clone();
    platform::install()?;
    Ok(token)
}

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        mod platform {
            use std::io;

            use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};

            // Only an atomic store happens here, which is async-signal-safe.
            extern "C" fn on_interrupt(_: nix::libc::c_int) {
                if let Some(token) = super::INTERRUPT_TOKEN.get() {
                    token.cancel();
                }
            }

            pub(super) fn install() -> io::Result<()> {
                let action = SigAction::new(
                    SigHandler::Handler(on_interrupt),
                    SaFlags::SA_RESTART,
                    SigSet::empty(),
                );
                unsafe { sigaction(Signal::SIGINT, &action) }
                    .map(|_| ())
                    .map_err(io::Error::from)
            }
        }
    } else {
        mod platform {
            use std::io;

            pub(super) fn install() -> io::Result<()> {
                log::debug!("interrupt signal is not routed to the upload on this platform");
                Ok(())
            }
        }
    }
}
