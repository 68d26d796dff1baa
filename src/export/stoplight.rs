// src/export/stoplight.rs
//
// Illustrative class-year dataset for the stoplight front-end. The source
// feeds carry no Freshman/Sophomore/Junior/Senior breakdown, so every count
// and rate here is an authored literal, NOT a measurement; the only derived
// value is each post-era entry's percentage change from its pre-era
// counterpart. Keep it labeled as illustrative wherever it surfaces.
use serde::Serialize;

/// Full document written to `stoplight_class_year_data.json`. Field
/// declaration order is the JSON key order.
#[derive(Debug, Serialize)]
pub struct StoplightData {
    pub pre_nil: Era,
    pub post_nil: Era,
}

#[derive(Debug, Serialize)]
pub struct Era {
    pub era: &'static str,
    pub total_transfers: u32,
    pub lights: Vec<Light>,
}

/// One lamp of the stoplight, top (Freshman) to bottom (Senior).
#[derive(Debug, Serialize)]
pub struct Light {
    pub class_year: &'static str,
    pub position: u8,
    pub base_color: &'static str,
    pub count: u32,
    pub rate: f64,
    /// 0-1 opacity scale for the front-end; mirrors `rate`.
    pub intensity: f64,
    pub description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_from_pre: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<bool>,
}

struct ClassYearFigures {
    class_year: &'static str,
    base_color: &'static str,
    count: u32,
    rate: f64,
    description: &'static str,
    highlight: bool,
}

// Pre-NIL: transfers concentrated in the Junior/Senior years.
const PRE_NIL: [ClassYearFigures; 4] = [
    ClassYearFigures {
        class_year: "Freshman",
        base_color: "#dc3545",
        count: 180,
        rate: 0.12,
        description: "Rare transfers - adjustment period",
        highlight: false,
    },
    ClassYearFigures {
        class_year: "Sophomore",
        base_color: "#fd7e14",
        count: 350,
        rate: 0.23,
        description: "Limited transfers - building experience",
        highlight: false,
    },
    ClassYearFigures {
        class_year: "Junior",
        base_color: "#ffc107",
        count: 520,
        rate: 0.35,
        description: "Peak transfer year - seeking playing time",
        highlight: false,
    },
    ClassYearFigures {
        class_year: "Senior",
        base_color: "#28a745",
        count: 450,
        rate: 0.30,
        description: "Graduate transfers for final season",
        highlight: false,
    },
];

// Post-NIL: volume shifts earlier; the sophomore spike is the key insight.
const POST_NIL: [ClassYearFigures; 4] = [
    ClassYearFigures {
        class_year: "Freshman",
        base_color: "#dc3545",
        count: 420,
        rate: 0.18,
        description: "NIL allows earlier career mobility",
        highlight: false,
    },
    ClassYearFigures {
        class_year: "Sophomore",
        base_color: "#fd7e14",
        count: 890,
        rate: 0.38,
        description: "Significant jump - prime NIL opportunity",
        highlight: true,
    },
    ClassYearFigures {
        class_year: "Junior",
        base_color: "#ffc107",
        count: 680,
        rate: 0.29,
        description: "High transfers but overshadowed by sophomores",
        highlight: true,
    },
    ClassYearFigures {
        class_year: "Senior",
        base_color: "#28a745",
        count: 350,
        rate: 0.15,
        description: "Reduced - most transfers happen earlier now",
        highlight: false,
    },
];

/// Assemble the fixed document. Deterministic: same literals in, same
/// document out.
pub fn build() -> StoplightData {
    StoplightData {
        pre_nil: era("Pre-NIL (2019-2021)", &PRE_NIL, None),
        post_nil: era("Post-NIL (2021-2024)", &POST_NIL, Some(&PRE_NIL)),
    }
}

fn era(
    label: &'static str,
    figures: &[ClassYearFigures; 4],
    baseline: Option<&[ClassYearFigures; 4]>,
) -> Era {
    let total_transfers = figures.iter().map(|f| f.count).sum();
    let lights = figures
        .iter()
        .enumerate()
        .map(|(i, f)| Light {
            class_year: f.class_year,
            position: i as u8,
            base_color: f.base_color,
            count: f.count,
            rate: f.rate,
            intensity: f.rate,
            description: f.description,
            change_from_pre: baseline
                .map(|b| (f.count as f64 / b[i].count as f64 - 1.0) * 100.0),
            highlight: f.highlight.then_some(true),
        })
        .collect();
    Era {
        era: label,
        total_transfers,
        lights,
    }
}
