// 📝 Form input
// Typed house details as collected by the TUI form, the CLI flags and the
// web form, with the same option domains on every surface

use crate::error::{Error, Result};
use crate::record::RawRecord;
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};

pub const AREA_MIN: f64 = 100.0;
pub const AREA_MAX: f64 = 10000.0;
pub const AREA_STEP: f64 = 10.0;

pub const BEDROOM_OPTIONS: [u32; 5] = [1, 2, 3, 4, 5];
pub const BATHROOM_OPTIONS: [u32; 4] = [1, 2, 3, 4];
pub const STORY_OPTIONS: [u32; 4] = [1, 2, 3, 4];
pub const PARKING_OPTIONS: [u32; 4] = [0, 1, 2, 3];

// ============================================================================
// CATEGORICAL DOMAINS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub fn as_str(&self) -> &'static str {
        match self {
            YesNo::Yes => "yes",
            YesNo::No => "no",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            YesNo::Yes => YesNo::No,
            YesNo::No => YesNo::Yes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FurnishingStatus {
    Furnished,
    SemiFurnished,
    Unfurnished,
}

impl FurnishingStatus {
    pub const ALL: [FurnishingStatus; 3] = [
        FurnishingStatus::Furnished,
        FurnishingStatus::SemiFurnished,
        FurnishingStatus::Unfurnished,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FurnishingStatus::Furnished => "furnished",
            FurnishingStatus::SemiFurnished => "semi-furnished",
            FurnishingStatus::Unfurnished => "unfurnished",
        }
    }
}

// ============================================================================
// HOUSE INPUT
// ============================================================================

/// One house as entered by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Args)]
pub struct HouseInput {
    /// Total area (sq ft)
    #[arg(long, default_value_t = AREA_MIN)]
    pub area: f64,
    #[arg(long, default_value_t = 1)]
    pub bedrooms: u32,
    #[arg(long, default_value_t = 1)]
    pub bathrooms: u32,
    #[arg(long, default_value_t = 1)]
    pub stories: u32,
    #[arg(long, default_value_t = 0)]
    pub parking: u32,

    /// Main road access
    #[arg(long, value_enum, default_value_t = YesNo::Yes)]
    pub mainroad: YesNo,
    #[arg(long, value_enum, default_value_t = YesNo::Yes)]
    pub guestroom: YesNo,
    #[arg(long, value_enum, default_value_t = YesNo::Yes)]
    pub basement: YesNo,
    #[arg(long, value_enum, default_value_t = YesNo::Yes)]
    pub hotwaterheating: YesNo,
    #[arg(long, value_enum, default_value_t = YesNo::Yes)]
    pub airconditioning: YesNo,
    /// Preferred area
    #[arg(long, value_enum, default_value_t = YesNo::Yes)]
    pub prefarea: YesNo,
    #[arg(long, value_enum, default_value_t = FurnishingStatus::Furnished)]
    pub furnishingstatus: FurnishingStatus,
}

impl Default for HouseInput {
    fn default() -> Self {
        HouseInput {
            area: AREA_MIN,
            bedrooms: 1,
            bathrooms: 1,
            stories: 1,
            parking: 0,
            mainroad: YesNo::Yes,
            guestroom: YesNo::Yes,
            basement: YesNo::Yes,
            hotwaterheating: YesNo::Yes,
            airconditioning: YesNo::Yes,
            prefarea: YesNo::Yes,
            furnishingstatus: FurnishingStatus::Furnished,
        }
    }
}

impl HouseInput {
    /// Check every value against the form's option domains
    pub fn validate(&self) -> Result<()> {
        if !self.area.is_finite() || self.area < AREA_MIN || self.area > AREA_MAX {
            return Err(invalid(
                "area",
                format!("must be between {} and {}, got {}", AREA_MIN, AREA_MAX, self.area),
            ));
        }

        let choices = [
            ("bedrooms", self.bedrooms, &BEDROOM_OPTIONS[..]),
            ("bathrooms", self.bathrooms, &BATHROOM_OPTIONS[..]),
            ("stories", self.stories, &STORY_OPTIONS[..]),
            ("parking", self.parking, &PARKING_OPTIONS[..]),
        ];
        for (field, value, options) in choices {
            if !options.contains(&value) {
                return Err(invalid(field, format!("must be one of {:?}, got {}", options, value)));
            }
        }

        Ok(())
    }

    /// Raw record with exactly the housing fields
    pub fn to_record(&self) -> RawRecord {
        RawRecord::new()
            .with("area", self.area)
            .with("bedrooms", self.bedrooms)
            .with("bathrooms", self.bathrooms)
            .with("stories", self.stories)
            .with("parking", self.parking)
            .with("mainroad", self.mainroad.as_str())
            .with("guestroom", self.guestroom.as_str())
            .with("basement", self.basement.as_str())
            .with("hotwaterheating", self.hotwaterheating.as_str())
            .with("airconditioning", self.airconditioning.as_str())
            .with("prefarea", self.prefarea.as_str())
            .with("furnishingstatus", self.furnishingstatus.as_str())
    }
}

fn invalid(field: &str, reason: String) -> Error {
    Error::InvalidInput {
        field: field.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{CATEGORICAL_FIELDS, NUMERIC_FIELDS};

    #[test]
    fn test_default_input_is_valid() {
        assert!(HouseInput::default().validate().is_ok());
    }

    #[test]
    fn test_area_out_of_range() {
        let input = HouseInput { area: 50.0, ..HouseInput::default() };
        match input.validate() {
            Err(Error::InvalidInput { field, .. }) => assert_eq!(field, "area"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_option_outside_domain() {
        let input = HouseInput { parking: 4, ..HouseInput::default() };
        match input.validate() {
            Err(Error::InvalidInput { field, .. }) => assert_eq!(field, "parking"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_record_has_exactly_housing_fields() {
        let record = HouseInput::default().to_record();

        assert_eq!(record.len(), NUMERIC_FIELDS.len() + CATEGORICAL_FIELDS.len());
        for field in NUMERIC_FIELDS {
            assert!(record.number(field).is_some(), "{} should be numeric", field);
        }
        for field in CATEGORICAL_FIELDS {
            assert!(record.category(field).is_some(), "{} should be categorical", field);
        }
    }

    #[test]
    fn test_json_uses_dataset_levels() {
        let input = HouseInput {
            furnishingstatus: FurnishingStatus::SemiFurnished,
            mainroad: YesNo::No,
            ..HouseInput::default()
        };
        let json = serde_json::to_value(&input).unwrap();

        assert_eq!(json["furnishingstatus"], "semi-furnished");
        assert_eq!(json["mainroad"], "no");
        assert_eq!(input.to_record().category("furnishingstatus"), Some("semi-furnished"));
    }
}
