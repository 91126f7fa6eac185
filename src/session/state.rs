use tungstenite::protocol::CloseFrame;

use crate::types::constants::{CLOSE_GOING_AWAY, CLOSE_NORMAL};

/// Lifecycle of one channel session.
///
/// `Closed -> Connecting -> {Open, Closed}`; an open session never
/// re-enters `Connecting` without passing through `Closed` first. There is
/// no terminal state while subscribers remain: an abnormally closed session
/// keeps re-entering `Connecting` until it is explicitly torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Closed,
    Connecting,
    Open,
}

/// Why a connection ended, as far as reconnection policy cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ClosureKind {
    /// Normal closure (1000) or endpoint going away (1001): the peer meant
    /// it, do not fight it.
    Clean,
    /// Everything else, including a dropped socket with no close frame.
    Abnormal,
}

impl ClosureKind {
    pub(crate) fn from_close_frame(frame: Option<&CloseFrame>) -> Self {
        match frame {
            Some(frame) => {
                let code = u16::from(frame.code);
                if code == CLOSE_NORMAL || code == CLOSE_GOING_AWAY {
                    Self::Clean
                } else {
                    Self::Abnormal
                }
            }
            None => Self::Abnormal,
        }
    }

    pub(crate) fn is_abnormal(&self) -> bool {
        matches!(self, Self::Abnormal)
    }
}
