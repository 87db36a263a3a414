use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum DrawState {
    #[default]
    Idle,
    Rolling,
    Revealed,
}

impl DrawState {
    pub fn is_rolling(self) -> bool {
        matches!(self, Self::Rolling)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Rolling => "rolling",
            Self::Revealed => "revealed",
        }
    }
}
