//! Static advisory text for each disease class.

use crate::core::constants::FALLBACK_ADVISORY;
use crate::domain::labels::DiseaseClass;
use once_cell::sync::Lazy;
use std::collections::HashMap;

static GLOBAL_TABLE: Lazy<RemediationTable> = Lazy::new(RemediationTable::build);

/// Advisory shown for a class. The match is exhaustive, so adding a class
/// without advice fails to compile.
const fn advisory_for(class: DiseaseClass) -> &'static str {
    use DiseaseClass::*;
    match class {
        AppleScab => "Apply fungicide spray. Remove infected leaves. Improve air circulation.",
        AppleBlackRot => {
            "Prune affected branches. Apply copper-based fungicide. Maintain sanitation."
        }
        AppleCedarRust => "Remove cedar trees nearby. Apply sulfur spray. Prune affected areas.",
        AppleHealthy => "No disease detected. Maintain regular care and monitoring.",
        BlueberryHealthy => "Plant is healthy. Continue regular maintenance.",
        CherryPowderyMildew => {
            "Apply sulfur or potassium bicarbonate. Improve air circulation. Reduce humidity."
        }
        CherryHealthy => "Plant is in good health. Maintain care routine.",
        CornGrayLeafSpot => "Apply fungicide. Remove affected leaves. Plant resistant varieties.",
        CornCommonRust => "Use resistant hybrid varieties. Apply fungicide if necessary.",
        CornNorthernLeafBlight => {
            "Plant resistant varieties. Apply fungicide. Improve drainage."
        }
        CornHealthy => "Corn plant is healthy. Continue monitoring.",
        GrapeBlackRot => "Remove affected berries. Apply fungicide. Improve pruning.",
        GrapeEsca => "Prune infected vines. Remove dead wood. Apply copper fungicide.",
        GrapeLeafBlight => "Apply fungicide. Remove infected leaves. Improve air flow.",
        GrapeHealthy => "Grapes are healthy. Maintain regular care.",
        OrangeCitrusGreening => {
            "Remove infected trees. Control insect vectors. Plant disease-free trees."
        }
        PeachBacterialSpot => {
            "Apply copper bactericide. Prune infected branches. Improve sanitation."
        }
        PeachHealthy => "Peach tree is healthy.",
        BellPepperBacterialSpot => {
            "Apply copper spray. Remove infected leaves. Improve air circulation."
        }
        BellPepperHealthy => "Pepper plant is healthy.",
        PotatoEarlyBlight => {
            "Remove lower infected leaves. Apply fungicide. Improve air circulation."
        }
        PotatoLateBlight => {
            "Apply fungicide immediately. Remove infected plants. Improve drainage."
        }
        PotatoHealthy => "Potato plant is healthy.",
        RaspberryHealthy => "Raspberry is healthy.",
        SoybeanSeptoriaBrownSpot => "Apply fungicide. Remove infected leaves. Crop rotation.",
        SoybeanHealthy => "Soybean is healthy.",
        SquashPowderyMildew => {
            "Apply sulfur spray. Improve air circulation. Remove affected leaves."
        }
        StrawberryLeafScorch => "Remove infected leaves. Apply fungicide. Improve drainage.",
        StrawberryHealthy => "Strawberry is healthy.",
        TomatoBacterialSpot => {
            "Apply copper bactericide. Remove infected leaves. Sanitize tools."
        }
        TomatoEarlyBlight => "Remove lower leaves. Apply fungicide. Improve air circulation.",
        TomatoLateBlight => {
            "Apply fungicide immediately. Remove infected plants. Improve air flow."
        }
        TomatoLeafMold => "Reduce humidity. Improve air circulation. Apply fungicide.",
        TomatoSeptoriaLeafSpot => {
            "Remove infected leaves. Apply fungicide. Sanitize tools between plants."
        }
        TomatoSpiderMites => {
            "Spray with neem oil. Increase humidity. Remove heavily infected leaves."
        }
        TomatoTargetSpot => "Remove infected leaves. Apply fungicide. Improve air circulation.",
        TomatoYellowLeafCurlVirus => {
            "Remove infected plants. Control whiteflies. Use resistant varieties."
        }
        TomatoMosaicVirus => "Remove infected plants. Sanitize tools. Plant resistant varieties.",
        TomatoHealthy => "Tomato plant is healthy. Continue monitoring.",
    }
}

/// Maps class labels to advisory strings.
///
/// Built once per process and read-only afterwards; use
/// [`RemediationTable::global`] to share it.
#[derive(Debug)]
pub struct RemediationTable {
    entries: HashMap<&'static str, &'static str>,
}

impl RemediationTable {
    fn build() -> Self {
        let entries = DiseaseClass::ALL
            .iter()
            .map(|&class| (class.as_str(), advisory_for(class)))
            .collect();
        Self { entries }
    }

    /// The process-wide table.
    pub fn global() -> &'static RemediationTable {
        &GLOBAL_TABLE
    }

    /// Returns the advisory for `label`, or the generic fallback for labels
    /// the table does not know. Never fails.
    pub fn resolve(&self, label: &str) -> &'static str {
        self.entries
            .get(label)
            .copied()
            .unwrap_or(FALLBACK_ADVISORY)
    }

    /// Returns the advisory for a known class.
    pub fn resolve_class(&self, class: DiseaseClass) -> &'static str {
        self.resolve(class.as_str())
    }

    /// Number of labels with a dedicated advisory.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
