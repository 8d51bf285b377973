use std::fmt;

/// Protocol phase used to select packet IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Handshaking,
    Status,
    Login,
    Play,
}

impl Phase {
    /// Phases in `next_state` index order.
    pub const ORDER: [Phase; 4] = [Phase::Handshaking, Phase::Status, Phase::Login, Phase::Play];

    #[must_use]
    pub const fn index(self) -> i32 {
        match self {
            Phase::Handshaking => 0,
            Phase::Status => 1,
            Phase::Login => 2,
            Phase::Play => 3,
        }
    }

    #[must_use]
    pub fn from_index(index: i32) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|idx| Self::ORDER.get(idx).copied())
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Handshaking => "handshaking",
            Phase::Status => "status",
            Phase::Login => "login",
            Phase::Play => "play",
        };
        f.write_str(name)
    }
}

/// Which side sends a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Serverbound,
    Clientbound,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Serverbound => f.write_str("serverbound"),
            Direction::Clientbound => f.write_str("clientbound"),
        }
    }
}
