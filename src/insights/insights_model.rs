use std::fmt;

use serde::{Deserialize, Serialize};

/// Display classification for a budget health score. Thresholds are fixed
/// constants shared with the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoreBand {
    Excellent,
    VeryGood,
    Good,
    Fair,
    NeedsAttention,
    Critical,
}

impl ScoreBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => ScoreBand::Excellent,
            70..=79 => ScoreBand::VeryGood,
            60..=69 => ScoreBand::Good,
            50..=59 => ScoreBand::Fair,
            40..=49 => ScoreBand::NeedsAttention,
            _ => ScoreBand::Critical,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent",
            ScoreBand::VeryGood => "Very Good",
            ScoreBand::Good => "Good",
            ScoreBand::Fair => "Fair",
            ScoreBand::NeedsAttention => "Needs Attention",
            ScoreBand::Critical => "Critical",
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
