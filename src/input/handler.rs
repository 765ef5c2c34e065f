//! Key handler outcome

/// Action to take after processing a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerAction {
    /// Pass the key through to the PTY
    Passthrough,
    /// Key was a gesture and has been handled
    Handled,
}
