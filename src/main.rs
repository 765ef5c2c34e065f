//! resreport main entry point
//!
//! The event loop monitors three sources:
//! 1. stdin (user keyboard input) - gestures are handled, the rest goes to the shell
//! 2. PTY output (shell output) - copied to the real terminal unchanged
//! 3. Signals (SIGWINCH for resize) - forwarded to the PTY

use log::{debug, error, info};
use mio::{Events, Interest, Poll, Token};
use nix::libc;
use nix::sys::signal::{self, SigHandler, Signal};
use nix::sys::termios::Termios;
use resreport::platform::is_wsl;
use resreport::input::{create_keymap, GestureHandler, HandlerAction};
use resreport::state::State;
use resreport::terminal::{get_terminal_size, restore_termios, set_raw_mode, Pty};
use resreport::{ReporterError, Result};
use std::io::{self, IsTerminal, Read, Write};
use std::os::unix::io::{AsRawFd, RawFd};
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

const STDIN: Token = Token(0);
const PTY: Token = Token(1);

const POLL_TIMEOUT: Duration = Duration::from_millis(100);

static RESIZE_PENDING: AtomicBool = AtomicBool::new(false);

extern "C" fn handle_sigwinch(_: libc::c_int) {
    RESIZE_PENDING.store(true, Ordering::Relaxed);
}

/// Outcome of servicing one ready source
enum Flow {
    Continue,
    Exit,
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let debug_mode = args.iter().any(|arg| arg == "--debug" || arg == "-d");

    if debug_mode {
        use std::fs::OpenOptions;
        match OpenOptions::new()
            .create(true)
            .append(true)
            .open("resreport.log")
        {
            Ok(log_file) => {
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Debug)
                    .target(env_logger::Target::Pipe(Box::new(log_file)))
                    .init();
            }
            Err(e) => {
                eprintln!("Warning: Failed to open resreport.log for debug logging: {}", e);
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Warn)
                    .init();
            }
        }
        info!(
            "resreport {} starting (debug mode, logging to resreport.log)",
            resreport::VERSION
        );
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Error)
            .init();
    }

    if let Err(e) = run() {
        error!("Fatal error: {}", e);
        eprintln!("resreport: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        eprintln!("Error: resreport requires an interactive terminal (stdin is not a TTY)");
        process::exit(1);
    }
    let stdin_fd = stdin.as_raw_fd();

    let args: Vec<String> = std::env::args()
        .skip(1)
        .filter(|arg| arg != "--debug" && arg != "-d")
        .collect();
    let program = if args.is_empty() { None } else { Some(args) };

    // Load everything that can fail before touching terminal modes
    let mut state = State::new()?;
    let keymap = create_keymap(&state.config);
    info!("Gesture handler initialized with {} bindings", keymap.len());
    let mut gestures = GestureHandler::new(keymap);

    let (cols, rows) = get_terminal_size(stdin_fd)?;
    info!("Terminal size: {}x{}", cols, rows);
    let mut pty = Pty::new(program, rows, cols)?;
    info!("PTY created, child pid {:?}", pty.child_pid());

    let original_termios = set_raw_mode(stdin_fd)?;
    let _guard = TermiosGuard {
        fd: stdin_fd,
        termios: original_termios,
    };

    unsafe {
        signal::signal(Signal::SIGWINCH, SigHandler::Handler(handle_sigwinch))
            .map_err(|e| ReporterError::Terminal(format!("Failed to set SIGWINCH handler: {}", e)))?;
    }

    let pty_fd = pty.as_raw_fd();

    // WSL doesn't support epoll on TTY file descriptors
    let mut mio_poll = if !is_wsl() {
        let poll = Poll::new()?;
        poll.registry()
            .register(&mut mio::unix::SourceFd(&stdin_fd), STDIN, Interest::READABLE)?;
        poll.registry()
            .register(&mut mio::unix::SourceFd(&pty_fd), PTY, Interest::READABLE)?;
        debug!("Using mio::Poll for event loop");
        Some((poll, Events::with_capacity(128)))
    } else {
        debug!("Using select() for event loop (WSL mode)");
        None
    };

    info!("resreport ready - entering event loop");

    loop {
        if RESIZE_PENDING.swap(false, Ordering::Relaxed) {
            let (new_cols, new_rows) = get_terminal_size(stdin_fd)?;
            info!("Terminal resized to {}x{}", new_cols, new_rows);
            pty.resize(new_rows, new_cols)?;
        }

        let (stdin_ready, pty_ready) = match mio_poll {
            Some((ref mut poll, ref mut events)) => {
                match poll.poll(events, Some(POLL_TIMEOUT)) {
                    Ok(()) => {}
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e.into()),
                }
                let mut ready = (false, false);
                for event in events.iter() {
                    match event.token() {
                        STDIN => ready.0 = true,
                        PTY => ready.1 = true,
                        _ => {}
                    }
                }
                ready
            }
            None => match select_ready(stdin_fd, pty_fd)? {
                Some(ready) => ready,
                None => continue,
            },
        };

        if stdin_ready {
            if let Flow::Exit = handle_stdin(&mut pty, &mut state, &mut gestures)? {
                return Ok(());
            }
        }
        if pty_ready {
            if let Flow::Exit = handle_pty_output(&mut pty)? {
                info!("PTY closed (program exited)");
                return Ok(());
            }
        }
    }
}

/// Wait for input with select(); `None` when interrupted by a signal
fn select_ready(stdin_fd: RawFd, pty_fd: RawFd) -> Result<Option<(bool, bool)>> {
    use nix::sys::select::{select, FdSet};
    use nix::sys::time::{TimeVal, TimeValLike};
    use std::os::unix::io::BorrowedFd;

    let stdin_borrowed = unsafe { BorrowedFd::borrow_raw(stdin_fd) };
    let pty_borrowed = unsafe { BorrowedFd::borrow_raw(pty_fd) };

    let mut read_fds = FdSet::new();
    read_fds.insert(stdin_borrowed);
    read_fds.insert(pty_borrowed);
    let mut timeout = TimeVal::milliseconds(POLL_TIMEOUT.as_millis() as i64);

    match select(None, Some(&mut read_fds), None, None, Some(&mut timeout)) {
        Ok(_) => Ok(Some((
            read_fds.contains(stdin_borrowed),
            read_fds.contains(pty_borrowed),
        ))),
        Err(nix::errno::Errno::EINTR) => {
            debug!("select() interrupted by signal");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Gestures are handled here; everything else is forwarded to the PTY
fn handle_stdin(pty: &mut Pty, state: &mut State, gestures: &mut GestureHandler) -> Result<Flow> {
    let mut buf = [0u8; 4096];

    let n = io::stdin().read(&mut buf)?;
    if n == 0 {
        return Ok(Flow::Exit);
    }
    let input = &buf[..n];

    // A failed report must never take the user's shell down with it
    let action = match gestures.process_key(input, state, || pty.foreground_pid()) {
        Ok(action) => action,
        Err(e) => {
            error!("Gesture failed: {}", e);
            HandlerAction::Handled
        }
    };

    if action == HandlerAction::Passthrough {
        pty.write(input)?;
    }
    Ok(Flow::Continue)
}

/// Copy program output to the user's terminal
fn handle_pty_output(pty: &mut Pty) -> Result<Flow> {
    let mut buf = [0u8; 4096];

    let n = match pty.read(&mut buf) {
        Ok(0) => return Ok(Flow::Exit),
        Ok(n) => n,
        // Linux reports EIO on the master once the slave side is closed
        Err(ReporterError::Io(e)) if e.raw_os_error() == Some(libc::EIO) => {
            return Ok(Flow::Exit)
        }
        Err(e) => return Err(e),
    };

    let mut stdout = io::stdout();
    stdout.write_all(&buf[..n])?;
    stdout.flush()?;
    Ok(Flow::Continue)
}

/// Restores the user's terminal on every exit path
struct TermiosGuard {
    fd: RawFd,
    termios: Termios,
}

impl Drop for TermiosGuard {
    fn drop(&mut self) {
        restore_termios(self.fd, &self.termios);
        debug!("Terminal attributes restored");
    }
}
