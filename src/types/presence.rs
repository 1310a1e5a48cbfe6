use serde::{Deserialize, Serialize};

/// The per-row presence state of a CIF value.
///
/// The discriminants double as the mask codes stored on the wire.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ValuePresence {
    #[default]
    Present = 0,
    /// Written as `.` in CIF text.
    NotSpecified = 1,
    /// Written as `?` in CIF text.
    Unknown = 2,
}

impl ValuePresence {
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Maps a mask code back to a presence state; codes outside `0..=2` are `None`.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Present),
            1 => Some(Self::NotSpecified),
            2 => Some(Self::Unknown),
            _ => None,
        }
    }

    pub fn is_present(self) -> bool {
        self == Self::Present
    }
}
