use std::{
    io::{self, Write},
    path::Path,
};

use crate::{constants::EXIT_CANCELLED, ui::Outcome};

/// Writes the outcome for the calling process and returns the exit status.
///
/// A selection prints exactly one line with the path; a cancellation prints nothing.
pub fn emit<W: Write>(
    outcome: &Outcome,
    out: &mut W,
) -> io::Result<u8> {
    match outcome {
        Outcome::Selected(path) => {
            write_path(out, path)?;
            out.write_all(b"\n")?;
            out.flush()?;
            Ok(0)
        }
        Outcome::Cancelled => Ok(EXIT_CANCELLED),
    }
}

/// Raw bytes, so a non-UTF-8 name still names the real file.
#[cfg(unix)]
fn write_path<W: Write>(
    out: &mut W,
    path: &Path,
) -> io::Result<()> {
    use std::os::unix::ffi::OsStrExt;
    out.write_all(path.as_os_str().as_bytes())
}

#[cfg(not(unix))]
fn write_path<W: Write>(
    out: &mut W,
    path: &Path,
) -> io::Result<()> {
    write!(out, "{}", path.display())
}
