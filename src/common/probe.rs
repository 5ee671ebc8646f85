// Probe window capture
//
// Reads the fixed-size header prefix that signatures are compared against.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Serialize, Serializer};
use tracing::trace;

use crate::common::hex::format_hex_string;
use crate::error::{Result, WtError};

/// Number of leading bytes captured from every target file
pub const PROBE_WINDOW_LEN: usize = 64;

/// The first `PROBE_WINDOW_LEN` bytes of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeWindow {
    bytes: [u8; PROBE_WINDOW_LEN],
}

impl ProbeWindow {
    /// Build a window from an in-memory prefix.
    ///
    /// Only the first `PROBE_WINDOW_LEN` bytes are kept; `None` when `data` is
    /// shorter than the window.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        let prefix = data.get(..PROBE_WINDOW_LEN)?;
        let mut bytes = [0u8; PROBE_WINDOW_LEN];
        bytes.copy_from_slice(prefix);
        Some(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Lowercase contiguous hex of the whole window (128 characters)
    pub fn to_hex(&self) -> String {
        format_hex_string(&self.bytes, false)
    }
}

impl AsRef<[u8]> for ProbeWindow {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl Serialize for ProbeWindow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Read the probe window from the start of `path`
///
/// Fails with `InsufficientBytes` when the file holds fewer than
/// `PROBE_WINDOW_LEN` bytes. The handle is closed before returning.
pub fn read_probe_window(path: &Path) -> Result<ProbeWindow> {
    let file = File::open(path).map_err(|e| WtError::from_io(path, e))?;

    let mut buf = Vec::with_capacity(PROBE_WINDOW_LEN);
    file.take(PROBE_WINDOW_LEN as u64)
        .read_to_end(&mut buf)
        .map_err(|e| WtError::from_io(path, e))?;

    trace!(path = %path.display(), read = buf.len(), "Probe window read");

    ProbeWindow::from_bytes(&buf).ok_or_else(|| WtError::InsufficientBytes {
        path: path.to_path_buf(),
        actual: buf.len(),
    })
}
