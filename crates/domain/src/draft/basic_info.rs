//! Identity and appearance of the child.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::common::lenient_date;
use crate::error::DomainError;

/// Either one of the offered presets or a free-text value typed by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PresetOrCustom {
    Preset(String),
    Custom(String),
}

impl PresetOrCustom {
    pub fn preset(value: impl Into<String>) -> Self {
        Self::Preset(value.into())
    }

    pub fn custom(value: impl Into<String>) -> Self {
        Self::Custom(value.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Preset(v) | Self::Custom(v) => v,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChildGender {
    Girl,
    Boy,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeightBracket {
    Small,
    Medium,
    Tall,
}

/// Age bracket derived from the birth date. Never set directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeBracket {
    #[serde(rename = "0-2")]
    ZeroToTwo,
    #[serde(rename = "3-5")]
    ThreeToFive,
    #[serde(rename = "6-7")]
    SixToSeven,
    #[serde(rename = "8-10")]
    EightToTen,
}

impl AgeBracket {
    /// Buckets a child's age in whole years on `today`.
    ///
    /// Children older than ten stay in the oldest bracket.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for a birth date after `today`.
    pub fn from_birth_date(birth_date: NaiveDate, today: NaiveDate) -> Result<Self, DomainError> {
        let years = today
            .years_since(birth_date)
            .ok_or_else(|| DomainError::validation("Birth date cannot be in the future"))?;
        Ok(match years {
            0..=2 => Self::ZeroToTwo,
            3..=5 => Self::ThreeToFive,
            6..=7 => Self::SixToSeven,
            _ => Self::EightToTen,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ZeroToTwo => "0-2",
            Self::ThreeToFive => "3-5",
            Self::SixToSeven => "6-7",
            Self::EightToTen => "8-10",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicInfo {
    pub first_name: String,
    pub gender: Option<ChildGender>,
    #[serde(with = "lenient_date")]
    birth_date: Option<NaiveDate>,
    age: Option<AgeBracket>,
    pub nickname: Option<PresetOrCustom>,
    pub skin_color: Option<PresetOrCustom>,
    pub eye_color: Option<PresetOrCustom>,
    pub hair_color: Option<PresetOrCustom>,
    pub hair_type: Option<PresetOrCustom>,
    pub has_glasses: bool,
    pub height: Option<HeightBracket>,
}

impl BasicInfo {
    pub fn birth_date(&self) -> Option<NaiveDate> {
        self.birth_date
    }

    pub fn age(&self) -> Option<AgeBracket> {
        self.age
    }

    /// Sets the birth date and recomputes the age bracket against `today`.
    ///
    /// A future date is rejected and leaves the previous values untouched.
    pub fn set_birth_date(
        &mut self,
        birth_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<(), DomainError> {
        let age = birth_date
            .map(|d| AgeBracket::from_birth_date(d, today))
            .transpose()?;
        self.birth_date = birth_date;
        self.age = age;
        Ok(())
    }

    /// Re-derives the age bracket, e.g. after restoring a cached draft on a later day.
    pub fn refresh_age(&mut self, today: NaiveDate) {
        self.age = self
            .birth_date
            .and_then(|d| AgeBracket::from_birth_date(d, today).ok());
    }

    /// Birth year, used to name a freshly created family.
    pub fn birth_year(&self) -> Option<i32> {
        use chrono::Datelike;
        self.birth_date.map(|d| d.year())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn age_brackets_follow_whole_years() {
        let today = date(2026, 6, 15);
        let cases = [
            (date(2026, 1, 1), AgeBracket::ZeroToTwo),
            (date(2023, 6, 16), AgeBracket::ZeroToTwo),
            (date(2023, 6, 15), AgeBracket::ThreeToFive),
            (date(2020, 6, 16), AgeBracket::ThreeToFive),
            (date(2020, 6, 15), AgeBracket::SixToSeven),
            (date(2018, 6, 15), AgeBracket::EightToTen),
            (date(2012, 1, 1), AgeBracket::EightToTen),
        ];
        for (birth, expected) in cases {
            assert_eq!(AgeBracket::from_birth_date(birth, today), Ok(expected), "{birth}");
        }
    }

    #[test]
    fn future_birth_date_is_rejected() {
        let mut info = BasicInfo::default();
        info.set_birth_date(Some(date(2020, 1, 1)), date(2026, 1, 1))
            .expect("past date");
        let err = info
            .set_birth_date(Some(date(2027, 1, 1)), date(2026, 1, 1))
            .expect_err("expected an error");
        assert!(err.is_validation());
        assert_eq!(info.birth_date(), Some(date(2020, 1, 1)));
        assert_eq!(info.age(), Some(AgeBracket::SixToSeven));
    }

    #[test]
    fn clearing_birth_date_clears_age() {
        let mut info = BasicInfo::default();
        info.set_birth_date(Some(date(2022, 3, 3)), date(2026, 1, 1))
            .expect("past date");
        info.set_birth_date(None, date(2026, 1, 1)).expect("clear");
        assert_eq!(info.age(), None);
    }

    #[test]
    fn age_serializes_as_bracket_label() {
        let json = serde_json::to_string(&AgeBracket::SixToSeven).expect("serialize");
        assert_eq!(json, "\"6-7\"");
    }

    #[test]
    fn preset_or_custom_round_trips_through_tagged_json() {
        let v = PresetOrCustom::custom("strawberry blond");
        let json = serde_json::to_value(&v).expect("serialize");
        assert_eq!(json["kind"], "custom");
        assert_eq!(json["value"], "strawberry blond");
    }
}
