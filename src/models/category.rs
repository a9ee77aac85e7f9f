use serde::{Deserialize, Serialize};

/// Fixed set of bookable service categories. Each category maps to one
/// inventory table in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
    Jet,
    Helicopter,
    Yacht,
    Car,
    EmptyLeg,
    Adventure,
}

impl ServiceCategory {
    pub const ALL: [ServiceCategory; 6] = [
        ServiceCategory::Jet,
        ServiceCategory::Helicopter,
        ServiceCategory::Yacht,
        ServiceCategory::Car,
        ServiceCategory::EmptyLeg,
        ServiceCategory::Adventure,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceCategory::Jet => "jet",
            ServiceCategory::Helicopter => "helicopter",
            ServiceCategory::Yacht => "yacht",
            ServiceCategory::Car => "car",
            ServiceCategory::EmptyLeg => "empty_leg",
            ServiceCategory::Adventure => "adventure",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "jet" => Some(ServiceCategory::Jet),
            "helicopter" => Some(ServiceCategory::Helicopter),
            "yacht" => Some(ServiceCategory::Yacht),
            "car" => Some(ServiceCategory::Car),
            "empty_leg" => Some(ServiceCategory::EmptyLeg),
            "adventure" => Some(ServiceCategory::Adventure),
            _ => None,
        }
    }

    /// Human-facing label used in chat replies.
    pub fn label(&self) -> &'static str {
        match self {
            ServiceCategory::Jet => "private jet",
            ServiceCategory::Helicopter => "helicopter",
            ServiceCategory::Yacht => "yacht",
            ServiceCategory::Car => "luxury car",
            ServiceCategory::EmptyLeg => "empty leg flight",
            ServiceCategory::Adventure => "adventure package",
        }
    }
}
