//! Raw terminal helpers

use crate::Result;
use nix::sys::termios::{self, SetArg, Termios};
use std::os::fd::BorrowedFd;
use std::os::unix::io::RawFd;

/// Get (cols, rows) for the given terminal, 80x24 when unknown
pub fn get_terminal_size(fd: RawFd) -> Result<(u16, u16)> {
    let mut ws: nix::libc::winsize = unsafe { std::mem::zeroed() };

    let result = unsafe { nix::libc::ioctl(fd, nix::libc::TIOCGWINSZ, &mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Ok((ws.ws_col, ws.ws_row))
    } else {
        Ok((80, 24))
    }
}

/// Put the terminal into raw mode, returning the previous attributes
///
/// Raw mode delivers Alt-key escape sequences and control keys to us
/// unprocessed.
pub fn set_raw_mode(fd: RawFd) -> Result<Termios> {
    let fd = unsafe { BorrowedFd::borrow_raw(fd) };
    let original = termios::tcgetattr(fd)?;

    let mut raw = original.clone();
    termios::cfmakeraw(&mut raw);
    termios::tcsetattr(fd, SetArg::TCSANOW, &raw)?;

    Ok(original)
}

/// Restore terminal attributes saved by `set_raw_mode`
pub fn restore_termios(fd: RawFd, original: &Termios) {
    let fd = unsafe { BorrowedFd::borrow_raw(fd) };
    let _ = termios::tcsetattr(fd, SetArg::TCSANOW, original);
}
