use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::RunError;

pub const SHIFT_MIN: u8 = 0;
pub const SHIFT_MAX: u8 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Encode,
    Decode,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Encode => "encode",
            Mode::Decode => "decode",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageVariant {
    Cipher,
    Binary,
    Morse,
}

impl PageVariant {
    pub const ALL: [PageVariant; 3] = [PageVariant::Cipher, PageVariant::Binary, PageVariant::Morse];

    pub fn label(self) -> &'static str {
        match self {
            PageVariant::Cipher => "Caesar cipher",
            PageVariant::Binary => "Binary",
            PageVariant::Morse => "Morse code",
        }
    }
}

impl FromStr for PageVariant {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "cipher" | "caesar" => Ok(PageVariant::Cipher),
            "binary" => Ok(PageVariant::Binary),
            "morse" => Ok(PageVariant::Morse),
            other => Err(format!("unknown page variant '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Interprets a persisted value. Anything other than `light` is dark.
    pub fn from_persisted(value: Option<&str>) -> Self {
        match value {
            Some("light") => Theme::Light,
            _ => Theme::Dark,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// Label of the button that switches away from this theme.
    pub fn toggle_label(self) -> &'static str {
        match self {
            Theme::Dark => "Light mode",
            Theme::Light => "Dark mode",
        }
    }
}

/// Caesar shift, always within `SHIFT_MIN..=SHIFT_MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8")]
pub struct ShiftAmount(u8);

impl ShiftAmount {
    pub const INVALID_MESSAGE: &'static str = "Enter a valid shift (0 to 25).";

    pub fn new(value: u8) -> Option<Self> {
        (value <= SHIFT_MAX).then_some(Self(value))
    }

    /// Parses user input: finite numbers are truncated toward zero and must
    /// then land in range. Blank input reads as zero.
    pub fn parse(raw: &str) -> Result<Self, RunError> {
        let invalid = || RunError::Validation(Self::INVALID_MESSAGE.to_string());
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self(SHIFT_MIN));
        }
        let value = trimmed.parse::<f64>().map_err(|_| invalid())?;
        if !value.is_finite() {
            return Err(invalid());
        }
        let truncated = value.trunc();
        if truncated < f64::from(SHIFT_MIN) || truncated > f64::from(SHIFT_MAX) {
            return Err(invalid());
        }
        Ok(Self(truncated as u8))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for ShiftAmount {
    type Error = RunError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| RunError::Validation(Self::INVALID_MESSAGE.to_string()))
    }
}

impl fmt::Display for ShiftAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_accepts_upper_bound_and_truncates_fractions() {
        assert_eq!(ShiftAmount::parse("25").expect("25").get(), 25);
        assert_eq!(ShiftAmount::parse("3.9").expect("3.9").get(), 3);
        assert_eq!(ShiftAmount::parse(" 7 ").expect("padded").get(), 7);
        assert_eq!(ShiftAmount::parse("0").expect("zero").get(), 0);
    }

    #[test]
    fn blank_shift_reads_as_zero() {
        assert_eq!(ShiftAmount::parse("").expect("empty").get(), 0);
        assert_eq!(ShiftAmount::parse("   ").expect("spaces").get(), 0);
    }

    #[test]
    fn deserializing_checks_the_range() {
        let shift: ShiftAmount = serde_json::from_str("25").expect("in range");
        assert_eq!(shift.get(), 25);
        assert!(serde_json::from_str::<ShiftAmount>("200").is_err());
        assert!(serde_json::from_str::<ShiftAmount>("26").is_err());
        assert_eq!(serde_json::to_string(&shift).expect("serialize"), "25");
    }

    #[test]
    fn shift_rejects_out_of_range_and_garbage() {
        for raw in ["26", "-1", "abc", "inf", "NaN", "25.5.1"] {
            let err = ShiftAmount::parse(raw).expect_err(raw);
            assert_eq!(err.to_string(), ShiftAmount::INVALID_MESSAGE);
        }
    }

    #[test]
    fn theme_falls_back_to_dark_for_unknown_values() {
        assert_eq!(Theme::from_persisted(None), Theme::Dark);
        assert_eq!(Theme::from_persisted(Some("solarized")), Theme::Dark);
        assert_eq!(Theme::from_persisted(Some("light")), Theme::Light);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggle_label(), "Dark mode");
    }

    #[test]
    fn page_variant_parses_cli_names() {
        assert_eq!("Caesar".parse::<PageVariant>(), Ok(PageVariant::Cipher));
        assert_eq!("morse".parse::<PageVariant>(), Ok(PageVariant::Morse));
        assert!("hex".parse::<PageVariant>().is_err());
    }
}
