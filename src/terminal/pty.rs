//! Pseudo-terminal hosting
//!
//! The user's shell runs inside a PTY we own. Its foreground process group
//! is what the user is interacting with, which makes the group leader the
//! focused process for every report.

use crate::resources::ProbeError;
use crate::{ReporterError, Result};
use log::{debug, info};
use nix::errno::Errno;
use nix::unistd::{dup, tcgetpgrp};
use portable_pty::{native_pty_system, Child, CommandBuilder, MasterPty, PtySize};
use std::io::{Read, Write};
use std::os::fd::AsRawFd;
use std::os::unix::io::{FromRawFd, OwnedFd, RawFd};

pub struct Pty {
    reader: Box<dyn Read + Send>,

    writer: Box<dyn Write + Send>,

    /// Kept so the PTY can be resized
    master: Box<dyn MasterPty + Send>,

    child: Box<dyn Child + Send + Sync>,

    /// Our own copy of the master fd for polling and `tcgetpgrp`
    fd_owner: OwnedFd,
}

impl Pty {
    /// Spawn `program`, or `$SHELL` when none is given, inside a new PTY
    pub fn new(program: Option<Vec<String>>, rows: u16, cols: u16) -> Result<Self> {
        let size = PtySize {
            rows,
            cols,
            pixel_width: 0,
            pixel_height: 0,
        };
        debug!("Creating PTY with size {}x{}", rows, cols);

        let pair = native_pty_system()
            .openpty(size)
            .map_err(|e| ReporterError::Pty(format!("Failed to open PTY: {}", e)))?;

        let cmd = match program {
            Some(prog) if !prog.is_empty() => {
                info!("Spawning specified program: {:?}", prog);
                let mut cmd = CommandBuilder::new(&prog[0]);
                cmd.args(&prog[1..]);
                cmd
            }
            _ => {
                let shell = std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string());
                info!("Spawning default shell: {}", shell);
                CommandBuilder::new(shell)
            }
        };

        let child = pair
            .slave
            .spawn_command(cmd)
            .map_err(|e| ReporterError::Pty(format!("Failed to spawn child: {}", e)))?;

        let master_fd = pair
            .master
            .as_raw_fd()
            .ok_or_else(|| ReporterError::Pty("Failed to get PTY file descriptor".to_string()))?;
        let dup_fd =
            dup(master_fd).map_err(|e| ReporterError::Pty(format!("Failed to duplicate fd: {}", e)))?;
        let fd_owner = unsafe { OwnedFd::from_raw_fd(dup_fd) };

        let reader = pair
            .master
            .try_clone_reader()
            .map_err(|e| ReporterError::Pty(format!("Failed to get PTY reader: {}", e)))?;
        let writer = pair
            .master
            .take_writer()
            .map_err(|e| ReporterError::Pty(format!("Failed to get PTY writer: {}", e)))?;

        debug!("PTY created with fd {}", fd_owner.as_raw_fd());

        Ok(Self {
            reader,
            writer,
            master: pair.master,
            child,
            fd_owner,
        })
    }

    /// File descriptor for the event loop
    pub fn as_raw_fd(&self) -> RawFd {
        self.fd_owner.as_raw_fd()
    }

    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.reader.read(buf).map_err(ReporterError::Io)
    }

    /// Write user keystrokes to the hosted program
    pub fn write(&mut self, buf: &[u8]) -> Result<()> {
        self.writer.write_all(buf)?;
        self.writer.flush().map_err(ReporterError::Io)
    }

    pub fn resize(&mut self, rows: u16, cols: u16) -> Result<()> {
        debug!("Resizing PTY to {}x{}", cols, rows);
        self.master
            .resize(PtySize {
                rows,
                cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| ReporterError::Pty(format!("Failed to resize PTY: {}", e)))
    }

    /// PID of the shell or program we spawned
    pub fn child_pid(&self) -> Option<u32> {
        self.child.process_id()
    }

    /// Leader of the PTY's foreground process group
    ///
    /// `Ok(None)` when the terminal has no foreground group, e.g. after the
    /// shell exited.
    pub fn foreground_pid(&self) -> std::result::Result<Option<u32>, ProbeError> {
        match tcgetpgrp(&self.fd_owner) {
            Ok(pgrp) if pgrp.as_raw() > 0 => Ok(Some(pgrp.as_raw() as u32)),
            Ok(_) => Ok(None),
            Err(Errno::EACCES) | Err(Errno::EPERM) => Err(ProbeError::AccessDenied(
                "terminal foreground process group".to_string(),
            )),
            Err(Errno::ENOTTY) | Err(Errno::EIO) => Ok(None),
            Err(e) => Err(ProbeError::Other(format!(
                "Failed to read foreground process group: {}",
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_foreground_is_spawned_program() {
        // `sleep` becomes the session leader and foreground group of its PTY
        let pty = match Pty::new(Some(vec!["sleep".into(), "2".into()]), 24, 80) {
            Ok(pty) => pty,
            Err(e) => {
                println!("⚠ PTY unavailable (may be expected in sandboxes): {}", e);
                return;
            }
        };

        let child = pty.child_pid().expect("child pid");
        // The child may not have called setsid/tcsetpgrp yet; give it a moment
        let mut fg = None;
        for _ in 0..50 {
            fg = pty.foreground_pid().ok().flatten();
            if fg == Some(child) {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(20));
        }
        assert_eq!(fg, Some(child));
    }
}
