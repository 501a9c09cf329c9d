use crossterm::event::KeyEvent;
use importdash_core::AttemptAssembly;
use importdash_protocol::{ProgressLog, SystemRun};

/// Events handled by the single app event loop.
///
/// Loader tasks never touch view state directly; they settle by sending one
/// of the data-arrival variants back here. Errors cross the channel as
/// strings so events stay `Send + 'static` without dragging error types
/// through every layer.
#[derive(Debug)]
pub enum AppEvent {
    /// Key input from the terminal.
    Key(KeyEvent),
    /// The terminal was resized; redraw on the next loop turn.
    Resize,
    /// Exit the main loop.
    ExitRequest,

    /// The run listing settled.
    RunsLoaded(Result<Vec<SystemRun>, String>),
    /// A run row's own logs settled.
    RunLogsLoaded {
        run_id: String,
        result: Result<Vec<ProgressLog>, String>,
    },
    /// A run row's attempt fan-out settled (possibly partially).
    AttemptsAssembled {
        run_id: String,
        assembly: AttemptAssembly,
    },
    /// An attempt row's logs settled.
    AttemptLogsLoaded {
        attempt_id: String,
        result: Result<Vec<ProgressLog>, String>,
    },
}
