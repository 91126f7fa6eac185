use std::fmt;

/// Identifier of one logical conversation channel.
///
/// Channels are addressed by the integer id assigned by the channel
/// directory. At most one live transport session exists per id,
/// process-wide, no matter how many surfaces subscribe to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelId(pub u64);

impl ChannelId {
    /// The zero id is reserved for "channel not yet known" (e.g. a surface
    /// rendered before the directory lookup completes). Subscribing with it
    /// yields an inert handle instead of a connection attempt.
    pub fn is_unassigned(&self) -> bool {
        self.0 == 0
    }
}

impl From<u64> for ChannelId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
