//! The closed set of disease and health categories the classifier reports.
//!
//! Positions in [`DiseaseClass::ALL`] match the output positions of the
//! classification model, so index `i` of a probability vector always scores
//! `DiseaseClass::ALL[i]`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

macro_rules! disease_classes {
    ($($variant:ident => $label:literal),+ $(,)?) => {
        /// One disease or health category of a supported plant species.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum DiseaseClass {
            $($variant),+
        }

        impl DiseaseClass {
            /// Every class, in model output order.
            pub const ALL: &'static [DiseaseClass] = &[$(DiseaseClass::$variant),+];

            /// The label string the model was trained with.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(DiseaseClass::$variant => $label),+
                }
            }
        }

        impl FromStr for DiseaseClass {
            type Err = UnknownLabel;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok(DiseaseClass::$variant),)+
                    _ => Err(UnknownLabel(s.to_string())),
                }
            }
        }
    };
}

disease_classes! {
    AppleScab => "Apple___Apple_scab",
    AppleBlackRot => "Apple___Black_rot",
    AppleCedarRust => "Apple___Cedar_apple_rust",
    AppleHealthy => "Apple___healthy",
    BlueberryHealthy => "Blueberry___healthy",
    CherryPowderyMildew => "Cherry___Powdery_mildew",
    CherryHealthy => "Cherry___healthy",
    CornGrayLeafSpot => "Corn___Cercospora_leaf_spot Gray_leaf_spot",
    CornCommonRust => "Corn___Common_rust",
    CornNorthernLeafBlight => "Corn___Northern_Leaf_Blight",
    CornHealthy => "Corn___healthy",
    GrapeBlackRot => "Grape___Black_rot",
    GrapeEsca => "Grape___Esca_(Black_Measles)",
    GrapeLeafBlight => "Grape___Leaf_blight_(Isariopsis_Leaf_Spot)",
    GrapeHealthy => "Grape___healthy",
    OrangeCitrusGreening => "Orange___Haunglongbing_(Citrus_greening)",
    PeachBacterialSpot => "Peach___Bacterial_spot",
    PeachHealthy => "Peach___healthy",
    BellPepperBacterialSpot => "Pepper,_bell___Bacterial_spot",
    BellPepperHealthy => "Pepper,_bell___healthy",
    PotatoEarlyBlight => "Potato___Early_blight",
    PotatoLateBlight => "Potato___Late_blight",
    PotatoHealthy => "Potato___healthy",
    RaspberryHealthy => "Raspberry___healthy",
    SoybeanSeptoriaBrownSpot => "Soybean___Septoria_brown_spot",
    SoybeanHealthy => "Soybean___healthy",
    SquashPowderyMildew => "Squash___Powdery_mildew",
    StrawberryLeafScorch => "Strawberry___Leaf_scorch",
    StrawberryHealthy => "Strawberry___healthy",
    TomatoBacterialSpot => "Tomato___Bacterial_spot",
    TomatoEarlyBlight => "Tomato___Early_blight",
    TomatoLateBlight => "Tomato___Late_blight",
    TomatoLeafMold => "Tomato___Leaf_Mold",
    TomatoSeptoriaLeafSpot => "Tomato___Septoria_leaf_spot",
    TomatoSpiderMites => "Tomato___Spider_mites Two-spotted_spider_mite",
    TomatoTargetSpot => "Tomato___Target_Spot",
    TomatoYellowLeafCurlVirus => "Tomato___Tomato_Yellow_Leaf_Curl_Virus",
    TomatoMosaicVirus => "Tomato___Tomato_mosaic_virus",
    TomatoHealthy => "Tomato___healthy",
}

/// Separator between the species and the condition in a label.
const SPECIES_SEPARATOR: &str = "___";

impl DiseaseClass {
    /// Number of classes the model distinguishes.
    pub const COUNT: usize = Self::ALL.len();

    /// Position of this class in the model output.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Class at the given model output position.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The plant species part of the label, e.g. `Tomato` or `Pepper,_bell`.
    pub fn species(self) -> &'static str {
        let label = self.as_str();
        label
            .split_once(SPECIES_SEPARATOR)
            .map_or(label, |(species, _)| species)
    }

    /// The condition part of the label, e.g. `Early_blight` or `healthy`.
    pub fn condition(self) -> &'static str {
        let label = self.as_str();
        label
            .split_once(SPECIES_SEPARATOR)
            .map_or(label, |(_, condition)| condition)
    }

    /// Whether this class reports a healthy plant.
    pub fn is_healthy(self) -> bool {
        self.condition() == "healthy"
    }
}

impl fmt::Display for DiseaseClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DiseaseClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DiseaseClass {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}

/// Returned when a string is not one of the known class labels.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown disease label: {0}")]
pub struct UnknownLabel(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_count_matches_model_head() {
        assert_eq!(DiseaseClass::COUNT, 39);
    }

    #[test]
    fn test_index_round_trips_through_position() {
        for (i, class) in DiseaseClass::ALL.iter().enumerate() {
            assert_eq!(class.index(), i);
            assert_eq!(DiseaseClass::from_index(i), Some(*class));
        }
        assert_eq!(DiseaseClass::from_index(DiseaseClass::COUNT), None);
    }

    #[test]
    fn test_parse_known_and_unknown_labels() {
        assert_eq!(
            "Tomato___Early_blight".parse::<DiseaseClass>(),
            Ok(DiseaseClass::TomatoEarlyBlight)
        );
        assert_eq!(
            "Banana___healthy".parse::<DiseaseClass>(),
            Err(UnknownLabel("Banana___healthy".to_string()))
        );
    }

    #[test]
    fn test_species_and_condition_split() {
        let class = DiseaseClass::BellPepperBacterialSpot;
        assert_eq!(class.species(), "Pepper,_bell");
        assert_eq!(class.condition(), "Bacterial_spot");
        assert!(!class.is_healthy());
        assert!(DiseaseClass::TomatoHealthy.is_healthy());
    }

    #[test]
    fn test_every_species_has_a_healthy_class() {
        for class in DiseaseClass::ALL {
            let species = class.species();
            let has_healthy = DiseaseClass::ALL
                .iter()
                .any(|c| c.species() == species && c.is_healthy());
            // Squash and Orange only ship disease classes in the training set.
            if species != "Squash" && species != "Orange" {
                assert!(has_healthy, "{species} has no healthy class");
            }
        }
    }

    #[test]
    fn test_serde_uses_label_strings() {
        let json = serde_json::to_string(&DiseaseClass::AppleHealthy).unwrap();
        assert_eq!(json, "\"Apple___healthy\"");
        let back: DiseaseClass = serde_json::from_str(&json).unwrap();
        assert_eq!(back, DiseaseClass::AppleHealthy);
        assert!(serde_json::from_str::<DiseaseClass>("\"nope\"").is_err());
    }
}
