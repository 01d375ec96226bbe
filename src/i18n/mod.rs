//! Internationalization module
//!
//! Provides the dashboard labels for English (en) and Estonian (et).
//! The table is fixed at compile time. The active language can be held
//! either by an [`I18n`] value owned by the caller, or by the process-wide
//! selection behind [`set_language`] and [`lang`].

mod en;
mod et;

use serde::{Deserialize, Serialize};
use std::sync::{OnceLock, RwLock};

/// Languages present in the localization table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Et,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Et];

    /// Language code used by the frontend and the config file
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Et => "et",
        }
    }

    /// Look up a language by its code. Only exact table keys match.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.code() == code)
    }

    /// Native display name
    pub fn display_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Et => "Eesti",
        }
    }

    pub fn strings(self) -> &'static StringSet {
        match self {
            Language::En => &en::STRINGS,
            Language::Et => &et::STRINGS,
        }
    }

    /// Detect the language from the system locale, English if unsupported
    pub fn detect_system() -> Self {
        let lang_env = std::env::var("LANG")
            .or_else(|_| std::env::var("LC_ALL"))
            .or_else(|_| std::env::var("LC_MESSAGES"))
            .unwrap_or_default();
        Self::from_locale(&lang_env)
    }

    /// Extract the language part of a locale such as "et_EE.UTF-8"
    fn from_locale(locale: &str) -> Self {
        let lang_code = locale
            .split('_')
            .next()
            .unwrap_or_default()
            .split('.')
            .next()
            .unwrap_or_default();

        Self::from_code(lang_code).unwrap_or_default()
    }
}

/// The fixed set of labels shown on the dashboard, in one language
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct StringSet {
    pub title: &'static str,
    pub plot_title: &'static str,
    pub x_axis: &'static str,
    pub y_axis: &'static str,
    pub legend_total: &'static str,
    pub summary_total: &'static str,
    pub summary_avg: &'static str,
    pub summary_min: &'static str,
    pub summary_max: &'static str,
    pub summary_today: &'static str,
    pub data_updated: &'static str,
}

impl StringSet {
    /// Field names as the page template refers to them
    pub const FIELDS: [&'static str; 11] = [
        "TITLE",
        "PLOT_TITLE",
        "X_AXIS",
        "Y_AXIS",
        "LEGEND_TOTAL",
        "SUMMARY_TOTAL",
        "SUMMARY_AVG",
        "SUMMARY_MIN",
        "SUMMARY_MAX",
        "SUMMARY_TODAY",
        "DATA_UPDATED",
    ];

    /// Get a label by its template field name
    pub fn get(&self, field: &str) -> Option<&'static str> {
        let value = match field {
            "TITLE" => self.title,
            "PLOT_TITLE" => self.plot_title,
            "X_AXIS" => self.x_axis,
            "Y_AXIS" => self.y_axis,
            "LEGEND_TOTAL" => self.legend_total,
            "SUMMARY_TOTAL" => self.summary_total,
            "SUMMARY_AVG" => self.summary_avg,
            "SUMMARY_MIN" => self.summary_min,
            "SUMMARY_MAX" => self.summary_max,
            "SUMMARY_TODAY" => self.summary_today,
            "DATA_UPDATED" => self.data_updated,
            _ => return None,
        };
        Some(value)
    }

    /// All (field name, label) pairs
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        Self::FIELDS
            .into_iter()
            .filter_map(move |field| self.get(field).map(|value| (field, value)))
    }
}

/// Labels registered for a language code, if the code is in the table
pub fn strings_for(code: &str) -> Option<&'static StringSet> {
    Language::from_code(code).map(Language::strings)
}

/// Get available languages as (code, display name)
pub fn available_languages() -> Vec<(&'static str, &'static str)> {
    Language::ALL
        .into_iter()
        .map(|lang| (lang.code(), lang.display_name()))
        .collect()
}

/// Internationalization manager owned by a rendering context
#[derive(Debug, Clone, Default)]
pub struct I18n {
    current_lang: Language,
}

impl I18n {
    /// Create a new I18n instance. "auto" selects the system language,
    /// an unknown code leaves the default (English) active.
    pub fn new(lang: &str) -> Self {
        let mut i18n = Self::default();
        if lang == "auto" {
            i18n.current_lang = Language::detect_system();
        } else {
            i18n.set_language(lang);
        }
        i18n
    }

    /// Set the current language. Codes missing from the table are ignored.
    pub fn set_language(&mut self, code: &str) {
        match Language::from_code(code) {
            Some(lang) => {
                self.current_lang = lang;
                log::info!("Language set to: {}", lang.code());
            }
            None => log::debug!("Ignoring unknown language code: {:?}", code),
        }
    }

    /// Labels for the current language
    pub fn strings(&self) -> &'static StringSet {
        self.current_lang.strings()
    }

    /// Get a label by field name, falling back to the name itself
    pub fn get(&self, field: &str) -> String {
        self.strings()
            .get(field)
            .map(str::to_string)
            .unwrap_or_else(|| field.to_string())
    }

    /// Get the current language
    pub fn current_language(&self) -> Language {
        self.current_lang
    }
}

struct GlobalLang {
    active: RwLock<Language>,
    snapshot: &'static StringSet,
}

static GLOBAL: OnceLock<GlobalLang> = OnceLock::new();

fn global() -> &'static GlobalLang {
    GLOBAL.get_or_init(|| {
        let active = Language::default();
        GlobalLang {
            active: RwLock::new(active),
            snapshot: active.strings(),
        }
    })
}

/// Set the process-wide language. Codes missing from the table are ignored.
pub fn set_language(code: &str) {
    let Some(lang) = Language::from_code(code) else {
        log::debug!("Ignoring unknown language code: {:?}", code);
        return;
    };

    let mut active = global()
        .active
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *active = lang;
    log::info!("Language set to: {}", lang.code());
}

/// Get the process-wide language
pub fn current_language() -> Language {
    *global()
        .active
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Labels for the process-wide language
pub fn lang() -> &'static StringSet {
    current_language().strings()
}

/// Labels captured when the process-wide selection was first initialized.
/// Later calls to [`set_language`] do not change this.
pub fn legacy_lang() -> &'static StringSet {
    global().snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_default_is_english() {
        let i18n = I18n::default();
        assert_eq!(i18n.current_language(), Language::En);
        assert_eq!(i18n.strings().title, "Energy Daily Visualization");
    }

    #[test]
    fn test_set_language_selects_registered_strings() {
        let mut i18n = I18n::default();
        for lang in Language::ALL {
            i18n.set_language(lang.code());
            assert_eq!(i18n.strings(), lang.strings());
        }
    }

    #[test]
    fn test_unknown_code_is_ignored() {
        let mut i18n = I18n::new("et");
        i18n.set_language("fr");
        i18n.set_language("");
        i18n.set_language("EN");
        assert_eq!(i18n.current_language(), Language::Et);
    }

    #[test]
    fn test_switch_back_to_english() {
        let mut i18n = I18n::default();
        i18n.set_language("et");
        i18n.set_language("en");
        assert_eq!(i18n.strings(), &en::STRINGS);
    }

    #[test]
    fn test_all_languages_share_fields() {
        let expected: BTreeSet<_> = StringSet::FIELDS.into_iter().collect();
        for lang in Language::ALL {
            let fields: BTreeSet<_> = lang.strings().entries().map(|(k, _)| k).collect();
            assert_eq!(fields, expected, "field mismatch for {}", lang.code());

            let json = serde_json::to_value(lang.strings()).unwrap();
            let keys: BTreeSet<_> = json.as_object().unwrap().keys().cloned().collect();
            let expected_keys: BTreeSet<_> = expected.iter().map(|k| k.to_string()).collect();
            assert_eq!(keys, expected_keys);
        }
    }

    #[test]
    fn test_get_by_field_name() {
        let i18n = I18n::new("et");
        assert_eq!(i18n.get("TITLE"), "Energia p\u{00E4}evane visualiseerimine");
        assert_eq!(i18n.get("DATA_UPDATED"), "Andmed uuendatud:");
        assert_eq!(i18n.get("NOT_A_FIELD"), "NOT_A_FIELD");
        assert_eq!(i18n.strings().get("title"), None);
    }

    #[test]
    fn test_table_lookup() {
        assert_eq!(strings_for("en").map(|s| s.x_axis), Some("Date"));
        assert_eq!(strings_for("et").map(|s| s.x_axis), Some("Kuup\u{00E4}ev"));
        assert!(strings_for("fr").is_none());
        assert_eq!(available_languages(), vec![("en", "English"), ("et", "Eesti")]);
    }

    #[test]
    fn test_auto_uses_system_language() {
        let i18n = I18n::new("auto");
        assert_eq!(i18n.current_language(), Language::detect_system());
        assert_eq!(i18n.strings(), Language::detect_system().strings());
    }

    #[test]
    fn test_locale_detection() {
        assert_eq!(Language::from_locale("et_EE.UTF-8"), Language::Et);
        assert_eq!(Language::from_locale("en_US.UTF-8"), Language::En);
        assert_eq!(Language::from_locale("fr_FR.UTF-8"), Language::En);
        assert_eq!(Language::from_locale(""), Language::En);
    }

    // The process-wide selection is shared by every test thread, so all
    // assertions on it live in this one test.
    #[test]
    fn test_process_wide_language() {
        assert_eq!(lang().title, "Energy Daily Visualization");
        assert_eq!(legacy_lang(), &en::STRINGS);

        set_language("et");
        assert_eq!(lang().title, "Energia p\u{00E4}evane visualiseerimine");

        set_language("fr");
        assert_eq!(lang().title, "Energia p\u{00E4}evane visualiseerimine");
        assert_eq!(current_language(), Language::Et);

        // snapshot stays on the language active at initialization
        assert_eq!(legacy_lang().title, "Energy Daily Visualization");

        set_language("en");
        assert_eq!(lang(), &en::STRINGS);
    }
}
