use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Physics,
    Chemistry,
    #[serde(alias = "mathematics", alias = "math")]
    Maths,
    Biology,
}

impl Subject {
    pub const ALL: [Subject; 4] =
        [Subject::Physics, Subject::Chemistry, Subject::Maths, Subject::Biology];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Physics => "physics",
            Self::Chemistry => "chemistry",
            Self::Maths => "maths",
            Self::Biology => "biology",
        }
    }

    /// Maths is the heavier subject.
    pub fn default_marks_per_question(self) -> u32 {
        match self {
            Self::Maths => 2,
            Self::Physics | Self::Chemistry | Self::Biology => 1,
        }
    }

    /// Mandatory phase-one subjects of a mock test. The remaining subjects are
    /// phase-two candidates, exactly one of which a mock test carries.
    pub fn is_phase_one(self) -> bool {
        matches!(self, Self::Physics | Self::Chemistry)
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSubject(pub String);

impl fmt::Display for UnknownSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown subject '{}'", self.0)
    }
}

impl std::error::Error for UnknownSubject {}

impl FromStr for Subject {
    type Err = UnknownSubject;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "physics" => Ok(Self::Physics),
            "chemistry" => Ok(Self::Chemistry),
            "maths" | "mathematics" | "math" => Ok(Self::Maths),
            "biology" => Ok(Self::Biology),
            _ => Err(UnknownSubject(value.to_string())),
        }
    }
}
