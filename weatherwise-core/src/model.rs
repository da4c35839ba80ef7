use serde::{Deserialize, Serialize};

/// Display-ready current conditions for one city.
///
/// Built once per successful fetch. `temperature_kelvin` is the source of
/// truth; the display strings are projections of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub city: String,
    pub country: String,
    pub temperature_display: String,
    pub feels_like_display: String,
    pub temperature_kelvin: f64,
    pub feels_like_kelvin: f64,
    pub description: String,
    pub icon_code: String,
    pub humidity_percent: i64,
    pub pressure_hpa: i64,
    pub wind_speed_mps: f64,
    pub observed_at: String,
}

impl WeatherReport {
    pub fn condition(&self) -> WeatherCondition {
        WeatherCondition::classify(&self.description)
    }

    /// Night observation, per the trailing `n` of the upstream icon code.
    pub fn is_night(&self) -> bool {
        self.icon_code.ends_with('n')
    }

    /// Description with every word capitalised, e.g. "Clear Sky".
    pub fn title_description(&self) -> String {
        title_case(&self.description)
    }
}

/// Broad condition category used to pick an icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Clear,
    Cloud,
    Rain,
    Snow,
    Other,
}

/// Keyword rules, first match wins.
const CONDITION_RULES: &[(&str, WeatherCondition)] = &[
    ("clear", WeatherCondition::Clear),
    ("cloud", WeatherCondition::Cloud),
    ("rain", WeatherCondition::Rain),
    ("snow", WeatherCondition::Snow),
];

impl WeatherCondition {
    pub fn classify(description: &str) -> Self {
        let lower = description.to_lowercase();

        CONDITION_RULES
            .iter()
            .find(|(keyword, _)| lower.contains(keyword))
            .map(|(_, condition)| *condition)
            .unwrap_or(WeatherCondition::Other)
    }
}

fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;

    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }

    out
}
