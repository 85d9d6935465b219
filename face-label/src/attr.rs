use crate::common::*;

/// The mask wearing state determined by the image file stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskState {
    Worn = 0,
    Incorrect = 1,
    NotWorn = 2,
}

impl MaskState {
    pub const ALL: [Self; 3] = [Self::Worn, Self::Incorrect, Self::NotWorn];

    /// Looks up the mask state for a file stem, or returns `None` if the
    /// stem does not belong to the labeling convention.
    pub fn from_stem(stem: &str) -> Option<Self> {
        let state = match stem {
            "mask1" | "mask2" | "mask3" | "mask4" | "mask5" => Self::Worn,
            "incorrect_mask" => Self::Incorrect,
            "normal" => Self::NotWorn,
            _ => return None,
        };
        Some(state)
    }

    pub fn from_index(index: u32) -> Result<Self> {
        let state = match index {
            0 => Self::Worn,
            1 => Self::Incorrect,
            2 => Self::NotWorn,
            _ => bail!("invalid mask state index {}", index),
        };
        Ok(state)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Worn => "worn",
            Self::Incorrect => "incorrect",
            Self::NotWorn => "not_worn",
        }
    }
}

/// The gender label of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male = 0,
    Female = 1,
}

impl Gender {
    pub const ALL: [Self; 2] = [Self::Male, Self::Female];

    pub fn from_index(index: u32) -> Result<Self> {
        let gender = match index {
            0 => Self::Male,
            1 => Self::Female,
            _ => bail!("invalid gender index {}", index),
        };
        Ok(gender)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl FromStr for Gender {
    type Err = Error;

    /// Parses a gender token. The parsing is case-insensitive.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let gender = match text.to_lowercase().as_str() {
            "male" => Self::Male,
            "female" => Self::Female,
            _ => bail!("gender must be either 'male' or 'female', but get '{}'", text),
        };
        Ok(gender)
    }
}

/// The age band a numeric age falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeBand {
    Young = 0,
    Middle = 1,
    Old = 2,
}

impl AgeBand {
    pub const ALL: [Self; 3] = [Self::Young, Self::Middle, Self::Old];

    /// Maps an age in years to its band. Ages below 30 are young,
    /// ages from 30 to 59 are middle, and ages of 60 and above are old.
    pub fn from_age(age: u32) -> Self {
        if age < 30 {
            Self::Young
        } else if age < 60 {
            Self::Middle
        } else {
            Self::Old
        }
    }

    pub fn from_index(index: u32) -> Result<Self> {
        let band = match index {
            0 => Self::Young,
            1 => Self::Middle,
            2 => Self::Old,
            _ => bail!("invalid age band index {}", index),
        };
        Ok(band)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Young => "young",
            Self::Middle => "middle",
            Self::Old => "old",
        }
    }
}

/// The complete set of attributes labeled on one face image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FaceAttrs {
    pub mask: MaskState,
    pub gender: Gender,
    pub age: AgeBand,
}
