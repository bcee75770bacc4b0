//! Locales

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

/// Locales a staged description is drafted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locale {
    /// English (United States)
    EnUs,

    /// English (Great Britain)
    EnGb,

    /// German (Germany)
    DeDe,
}

impl Locale {
    /// Every supported locale, in display order.
    pub const ALL: [Locale; 3] = [Self::EnUs, Self::EnGb, Self::DeDe];

    /// BCP 47 tag used in the platform's localized strings.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::EnUs => "en-US",
            Self::EnGb => "en-GB",
            Self::DeDe => "de-DE",
        }
    }

    /// Short label shown to moderators.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::EnUs => "US",
            Self::EnGb => "GB",
            Self::DeDe => "DE",
        }
    }
}

impl Display for Locale {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.tag())
    }
}

/// Draft description text per locale.
///
/// A locale stays `None` until the generation pipeline supplies text for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LocalizedDescriptions {
    /// `en-US` draft
    pub us_description: Option<String>,

    /// `en-GB` draft
    pub gb_description: Option<String>,

    /// `de-DE` draft
    pub de_description: Option<String>,
}

impl LocalizedDescriptions {
    /// Draft text for the given locale, if any.
    #[must_use]
    pub fn get(&self, locale: Locale) -> Option<&str> {
        match locale {
            Locale::EnUs => self.us_description.as_deref(),
            Locale::EnGb => self.gb_description.as_deref(),
            Locale::DeDe => self.de_description.as_deref(),
        }
    }

    /// Set the draft text for a locale.
    pub fn set(&mut self, locale: Locale, text: impl Into<String>) {
        let slot = match locale {
            Locale::EnUs => &mut self.us_description,
            Locale::EnGb => &mut self.gb_description,
            Locale::DeDe => &mut self.de_description,
        };

        *slot = Some(text.into());
    }

    /// Builder-style variant of [`LocalizedDescriptions::set`].
    #[must_use]
    pub fn with(mut self, locale: Locale, text: impl Into<String>) -> Self {
        self.set(locale, text);
        self
    }

    /// `true` when no locale has been drafted yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        Locale::ALL.iter().all(|locale| self.get(*locale).is_none())
    }

    /// Text to apply to the live product. Unset locales become empty strings.
    #[must_use]
    pub fn to_live(&self) -> LiveDescriptions {
        LiveDescriptions {
            en_us: self.get(Locale::EnUs).unwrap_or_default().to_string(),
            en_gb: self.get(Locale::EnGb).unwrap_or_default().to_string(),
            de_de: self.get(Locale::DeDe).unwrap_or_default().to_string(),
        }
    }
}

/// Description text applied to a live product on accept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveDescriptions {
    /// `en-US` text
    pub en_us: String,

    /// `en-GB` text
    pub en_gb: String,

    /// `de-DE` text
    pub de_de: String,
}

impl LiveDescriptions {
    /// Text for the given locale.
    #[must_use]
    pub fn get(&self, locale: Locale) -> &str {
        match locale {
            Locale::EnUs => &self.en_us,
            Locale::EnGb => &self.en_gb,
            Locale::DeDe => &self.de_de,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn unset_locales_serialize_as_null() -> TestResult {
        let value = serde_json::to_value(LocalizedDescriptions::default())?;

        assert_eq!(
            value,
            json!({
                "usDescription": null,
                "gbDescription": null,
                "deDescription": null,
            })
        );

        Ok(())
    }

    #[test]
    fn missing_fields_deserialize_as_unset() -> TestResult {
        let descriptions: LocalizedDescriptions =
            serde_json::from_value(json!({ "gbDescription": "Lovely" }))?;

        assert_eq!(descriptions.get(Locale::EnGb), Some("Lovely"));
        assert_eq!(descriptions.get(Locale::EnUs), None);
        assert_eq!(descriptions.get(Locale::DeDe), None);

        Ok(())
    }

    #[test]
    fn to_live_substitutes_empty_strings() {
        let live = LocalizedDescriptions::default()
            .with(Locale::EnUs, "A great widget")
            .to_live();

        assert_eq!(live.en_us, "A great widget");
        assert_eq!(live.en_gb, "");
        assert_eq!(live.de_de, "");
    }

    #[test]
    fn is_empty_until_a_locale_is_set() {
        let mut descriptions = LocalizedDescriptions::default();

        assert!(descriptions.is_empty());

        descriptions.set(Locale::DeDe, "Ein tolles Ding");

        assert!(!descriptions.is_empty());
    }
}
