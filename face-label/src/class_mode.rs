use crate::{
    attr::{AgeBand, FaceAttrs, Gender, MaskState},
    common::*,
};

/// The attribute combination that a class id encodes.
///
/// Every mode maps its attribute tuple to a contiguous range of ids
/// starting at zero, so the id can be used directly as a target index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassMode {
    /// Mask state, gender and age band combined, 18 classes.
    Full,
    /// Mask state alone, 3 classes.
    Mask,
    /// Gender alone, 2 classes.
    Gender,
    /// Age band alone, 3 classes.
    Age,
    /// Mask state and gender combined, 6 classes.
    MaskGender,
}

/// The attributes recovered from a class id. Attributes that the
/// originating [ClassMode] does not encode are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PartialFaceAttrs {
    pub mask: Option<MaskState>,
    pub gender: Option<Gender>,
    pub age: Option<AgeBand>,
}

impl ClassMode {
    pub fn num_classes(&self) -> usize {
        match self {
            Self::Full => 18,
            Self::Mask => 3,
            Self::Gender => 2,
            Self::Age => 3,
            Self::MaskGender => 6,
        }
    }

    /// Packs a full attribute tuple into the class id of this mode.
    pub fn encode(&self, attrs: FaceAttrs) -> u32 {
        let FaceAttrs { mask, gender, age } = attrs;
        match self {
            Self::Full => mask as u32 * 6 + gender as u32 * 3 + age as u32,
            Self::Mask => mask as u32,
            Self::Gender => gender as u32,
            Self::Age => age as u32,
            Self::MaskGender => mask as u32 * 2 + gender as u32,
        }
    }

    /// Recovers the encoded attributes from a class id. Ids outside of
    /// `0..num_classes()` are rejected.
    pub fn decode(&self, class: u32) -> Result<PartialFaceAttrs> {
        ensure!(
            (class as usize) < self.num_classes(),
            "class id {} is out of range for mode {:?} with {} classes",
            class,
            self,
            self.num_classes()
        );

        let attrs = match self {
            Self::Full => PartialFaceAttrs {
                mask: Some(MaskState::from_index(class / 6 % 3)?),
                gender: Some(Gender::from_index(class / 3 % 2)?),
                age: Some(AgeBand::from_index(class % 3)?),
            },
            Self::Mask => PartialFaceAttrs {
                mask: Some(MaskState::from_index(class)?),
                gender: None,
                age: None,
            },
            Self::Gender => PartialFaceAttrs {
                mask: None,
                gender: Some(Gender::from_index(class)?),
                age: None,
            },
            Self::Age => PartialFaceAttrs {
                mask: None,
                gender: None,
                age: Some(AgeBand::from_index(class)?),
            },
            Self::MaskGender => PartialFaceAttrs {
                mask: Some(MaskState::from_index(class / 2)?),
                gender: Some(Gender::from_index(class % 2)?),
                age: None,
            },
        };
        Ok(attrs)
    }

    /// The human readable name of a class id, for example
    /// "worn_male_young" in [Full](Self::Full) mode.
    pub fn class_name(&self, class: u32) -> Result<String> {
        let PartialFaceAttrs { mask, gender, age } = self.decode(class)?;
        let tokens: Vec<_> = [
            mask.map(|value| value.as_str()),
            gender.map(|value| value.as_str()),
            age.map(|value| value.as_str()),
        ]
        .into_iter()
        .flatten()
        .collect();
        Ok(tokens.join("_"))
    }

    /// The class names of this mode in ascending id order.
    pub fn class_names(&self) -> Vec<String> {
        match self {
            Self::Full => MaskState::ALL
                .iter()
                .flat_map(|&mask| {
                    Gender::ALL.iter().flat_map(move |&gender| {
                        AgeBand::ALL.iter().map(move |&age| {
                            [mask.as_str(), gender.as_str(), age.as_str()].join("_")
                        })
                    })
                })
                .collect(),
            Self::Mask => MaskState::ALL
                .iter()
                .map(|state| state.as_str().to_owned())
                .collect(),
            Self::Gender => Gender::ALL
                .iter()
                .map(|gender| gender.as_str().to_owned())
                .collect(),
            Self::Age => AgeBand::ALL
                .iter()
                .map(|band| band.as_str().to_owned())
                .collect(),
            Self::MaskGender => MaskState::ALL
                .iter()
                .flat_map(|&mask| {
                    Gender::ALL
                        .iter()
                        .map(move |&gender| [mask.as_str(), gender.as_str()].join("_"))
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const MODES: [ClassMode; 5] = [
        ClassMode::Full,
        ClassMode::Mask,
        ClassMode::Gender,
        ClassMode::Age,
        ClassMode::MaskGender,
    ];

    fn all_attrs() -> Vec<FaceAttrs> {
        MaskState::ALL
            .iter()
            .flat_map(|&mask| {
                Gender::ALL.iter().flat_map(move |&gender| {
                    AgeBand::ALL
                        .iter()
                        .map(move |&age| FaceAttrs { mask, gender, age })
                })
            })
            .collect()
    }

    #[test]
    fn full_mode_formula() {
        let attrs = FaceAttrs {
            mask: MaskState::Worn,
            gender: Gender::Male,
            age: AgeBand::Young,
        };
        assert_eq!(ClassMode::Full.encode(attrs), 0);

        let attrs = FaceAttrs {
            mask: MaskState::NotWorn,
            gender: Gender::Female,
            age: AgeBand::Old,
        };
        assert_eq!(ClassMode::Full.encode(attrs), 17);

        let attrs = FaceAttrs {
            mask: MaskState::Incorrect,
            gender: Gender::Female,
            age: AgeBand::Middle,
        };
        assert_eq!(ClassMode::Full.encode(attrs), 1 * 6 + 1 * 3 + 1);
    }

    #[test]
    fn encoding_is_contiguous() {
        let attrs = all_attrs();

        MODES.iter().for_each(|mode| {
            let ids: HashSet<u32> = attrs.iter().map(|&attrs| mode.encode(attrs)).collect();
            let expect: HashSet<u32> = (0..mode.num_classes() as u32).collect();
            assert_eq!(ids, expect, "mode {:?} does not cover its id range", mode);
        });
    }

    #[test]
    fn decode_round_trip() -> Result<()> {
        for &attrs in &all_attrs() {
            let FaceAttrs { mask, gender, age } = attrs;

            let decoded = ClassMode::Full.decode(ClassMode::Full.encode(attrs))?;
            assert_eq!(decoded.mask, Some(mask));
            assert_eq!(decoded.gender, Some(gender));
            assert_eq!(decoded.age, Some(age));

            let decoded = ClassMode::Mask.decode(ClassMode::Mask.encode(attrs))?;
            assert_eq!(decoded.mask, Some(mask));
            assert_eq!(decoded.gender, None);
            assert_eq!(decoded.age, None);

            let decoded = ClassMode::MaskGender.decode(ClassMode::MaskGender.encode(attrs))?;
            assert_eq!(decoded.mask, Some(mask));
            assert_eq!(decoded.gender, Some(gender));
            assert_eq!(decoded.age, None);
        }
        Ok(())
    }

    #[test]
    fn decode_rejects_out_of_range() {
        MODES.iter().for_each(|mode| {
            assert!(mode.decode(mode.num_classes() as u32).is_err());
            assert!(mode.decode(u32::MAX).is_err());
        });
    }

    #[test]
    fn class_names_match_encoding() -> Result<()> {
        for mode in MODES {
            let names = mode.class_names();
            assert_eq!(names.len(), mode.num_classes());

            let unique: HashSet<_> = names.iter().collect();
            assert_eq!(unique.len(), names.len());

            for (class, name) in names.iter().enumerate() {
                assert_eq!(mode.class_name(class as u32)?, *name);
            }
        }
        Ok(())
    }

    #[test]
    fn full_mode_names() {
        let names = ClassMode::Full.class_names();
        assert_eq!(names[0], "worn_male_young");
        assert_eq!(names[17], "not_worn_female_old");

        let names = ClassMode::MaskGender.class_names();
        assert_eq!(
            names,
            vec![
                "worn_male",
                "worn_female",
                "incorrect_male",
                "incorrect_female",
                "not_worn_male",
                "not_worn_female"
            ]
        );
    }
}
