use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

fn wait_for_file<P: AsRef<Path>>(path: P, timeout: Duration) -> Result<(), ()> {
    let end = SystemTime::now() + timeout;

    loop {
        if path.as_ref().exists() {
            return Ok(());
        }

        if SystemTime::now() > end {
            return Err(());
        }

        std::thread::sleep(Duration::from_millis(100));
    }
}

/// A pair of connected pseudo terminals, alive as long as this value.
pub struct PtyPair {
    socat: Child,
    pub ours: PathBuf,
    pub theirs: PathBuf,
    _dir: TempDir,
}

impl PtyPair {
    /// Create a pseudo terminal pair with socat. Returns `None` if socat is not available.
    pub fn spawn() -> Option<PtyPair> {
        let dir = TempDir::new().unwrap();
        let ours = dir.path().join("ttyV0");
        let theirs = dir.path().join("ttyV1");

        let socat = Command::new("socat")
            .args([
                format!("PTY,link={},raw,echo=0,mode=700", ours.to_str().unwrap()),
                format!("PTY,link={},raw,echo=0,mode=700", theirs.to_str().unwrap()),
            ])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        let socat = match socat {
            Ok(socat) => socat,
            Err(e) => {
                eprintln!("skipping, cannot run socat: {}", e);
                return None;
            }
        };

        let mut pair = PtyPair {
            socat,
            ours,
            theirs,
            _dir: dir,
        };
        if wait_for_file(&pair.ours, Duration::from_millis(1000)).is_err()
            || wait_for_file(&pair.theirs, Duration::from_millis(1000)).is_err()
        {
            pair.kill();
            eprintln!("skipping, socat did not create the pseudo terminals");
            return None;
        }
        Some(pair)
    }

    fn kill(&mut self) {
        let _ = self.socat.kill();
        let _ = self.socat.wait();
    }
}

impl Drop for PtyPair {
    fn drop(&mut self) {
        self.kill();
    }
}
