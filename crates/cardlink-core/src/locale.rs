//! Frontend locale preferences.
//!
//! Mirrors the user's locale profile as the home-automation frontend stores
//! it. Turning dates and numbers into text is left to the host through
//! [`LocaleFormatter`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberFormat {
    Language,
    #[default]
    System,
    CommaDecimal,
    DecimalComma,
    SpaceComma,
    None,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeFormat {
    #[serde(rename = "language")]
    Language,
    #[serde(rename = "system")]
    System,
    #[serde(rename = "12")]
    AmPm,
    #[serde(rename = "24")]
    TwentyFour,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateFormat {
    #[serde(rename = "language")]
    Language,
    #[serde(rename = "system")]
    System,
    #[serde(rename = "DMY")]
    Dmy,
    #[serde(rename = "MDY")]
    Mdy,
    #[serde(rename = "YMD")]
    Ymd,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirstWeekday {
    Language,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeZone {
    Local,
    Server,
}

/// The user's locale profile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontendLocale {
    pub language: String,
    pub number_format: NumberFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_format: Option<TimeFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_format: Option<DateFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_weekday: Option<FirstWeekday>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<TimeZone>,
}

impl FrontendLocale {
    /// Locale for a bare language tag with system number formatting.
    pub fn for_language(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            number_format: NumberFormat::System,
            time_format: None,
            date_format: None,
            first_weekday: None,
            time_zone: None,
        }
    }
}

/// Pick the backend's locale profile, or build one from its language.
pub fn resolve_locale(locale: Option<&FrontendLocale>, language: &str) -> FrontendLocale {
    match locale {
        Some(locale) => locale.clone(),
        None => FrontendLocale::for_language(language),
    }
}

/// Host capability that renders dates and times for a locale.
pub trait LocaleFormatter: Send + Sync {
    /// Long date, e.g. "19 October 2026".
    fn format_date(&self, at: &DateTime<Utc>, locale: &FrontendLocale) -> String;

    /// Hour and two-digit minute.
    fn format_time(&self, at: &DateTime<Utc>, locale: &FrontendLocale) -> String;

    fn format_date_time(&self, at: &DateTime<Utc>, locale: &FrontendLocale) -> String {
        format!(
            "{}, {}",
            self.format_date(at, locale),
            self.format_time(at, locale)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone as _;
    use serde_json::json;

    struct IsoFormatter;

    impl LocaleFormatter for IsoFormatter {
        fn format_date(&self, at: &DateTime<Utc>, locale: &FrontendLocale) -> String {
            format!("{} [{}]", at.format("%Y-%m-%d"), locale.language)
        }

        fn format_time(&self, at: &DateTime<Utc>, locale: &FrontendLocale) -> String {
            match locale.time_format {
                Some(TimeFormat::AmPm) => at.format("%-I:%M %p").to_string(),
                _ => at.format("%H:%M").to_string(),
            }
        }
    }

    #[test]
    fn test_resolve_locale_prefers_profile() {
        let profile = FrontendLocale {
            time_format: Some(TimeFormat::TwentyFour),
            ..FrontendLocale::for_language("de")
        };
        let resolved = resolve_locale(Some(&profile), "en");
        assert_eq!(resolved, profile);
    }

    #[test]
    fn test_resolve_locale_falls_back_to_language() {
        let resolved = resolve_locale(None, "fr");
        assert_eq!(resolved.language, "fr");
        assert_eq!(resolved.number_format, NumberFormat::System);
        assert!(resolved.time_format.is_none());
    }

    #[test]
    fn test_locale_wire_names() {
        let locale: FrontendLocale = serde_json::from_value(json!({
            "language": "en-GB",
            "number_format": "decimal_comma",
            "time_format": "12",
            "date_format": "DMY",
            "first_weekday": "monday",
            "time_zone": "server",
        }))
        .unwrap();
        assert_eq!(locale.number_format, NumberFormat::DecimalComma);
        assert_eq!(locale.time_format, Some(TimeFormat::AmPm));
        assert_eq!(locale.date_format, Some(DateFormat::Dmy));
        assert_eq!(locale.first_weekday, Some(FirstWeekday::Monday));
        assert_eq!(locale.time_zone, Some(TimeZone::Server));
    }

    #[test]
    fn test_formatter_default_date_time() {
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 14, 5, 0).unwrap();
        let locale = FrontendLocale {
            time_format: Some(TimeFormat::AmPm),
            ..FrontendLocale::for_language("en")
        };
        assert_eq!(
            IsoFormatter.format_date_time(&at, &locale),
            "2026-10-19 [en], 2:05 PM"
        );
    }
}
