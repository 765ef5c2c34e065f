//! PTY hosting and raw terminal handling

pub mod pty;
pub mod util;

pub use pty::Pty;
pub use util::{get_terminal_size, restore_termios, set_raw_mode};
