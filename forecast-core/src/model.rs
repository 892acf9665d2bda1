use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A place returned by the location search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationCandidate {
    pub name: String,
    pub country: String,
    pub region: Option<String>,
}

impl LocationCandidate {
    /// Label shown in the candidate list, e.g. "London, United Kingdom".
    pub fn label(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationInfo {
    pub name: String,
    pub region: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_c: f64,
    pub condition: String,
    pub icon: ConditionIcon,
    pub wind_kph: f64,
    pub humidity_pct: u8,
    pub feels_like_c: f64,
    pub visibility_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayForecast {
    pub date: NaiveDate,
    pub max_temp_c: f64,
    pub avg_temp_c: f64,
    pub total_precip_mm: f64,
    pub condition: String,
    /// Local sunrise as the provider formats it, e.g. "06:42 AM".
    pub sunrise: String,
    pub icon: ConditionIcon,
}

impl DayForecast {
    /// Full English weekday name, e.g. "Monday".
    pub fn weekday(&self) -> String {
        self.date.format("%A").to_string()
    }
}

/// Everything the screen shows for one city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastBundle {
    pub current: CurrentConditions,
    pub location: LocationInfo,
    /// Chronological, one entry per requested day.
    pub days: Vec<DayForecast>,
}

impl ForecastBundle {
    /// The first forecast day, which carries today's sunrise, rain and average.
    pub fn today(&self) -> Option<&DayForecast> {
        self.days.first()
    }
}

/// Icon key derived from the provider's condition text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionIcon {
    PartlyCloudy,
    Cloudy,
    Sun,
    Mist,
    ModerateRain,
    HeavyRain,
    Thunder,
    Other,
}

impl ConditionIcon {
    pub fn from_condition(text: &str) -> Self {
        match text.trim().to_lowercase().as_str() {
            "partly cloudy" => ConditionIcon::PartlyCloudy,
            "cloudy" | "overcast" => ConditionIcon::Cloudy,
            "sunny" | "clear" => ConditionIcon::Sun,
            "mist" => ConditionIcon::Mist,
            "moderate rain" | "patchy rain possible" | "patchy rain nearby" | "light rain"
            | "moderate rain at times" => ConditionIcon::ModerateRain,
            "heavy rain"
            | "heavy rain at times"
            | "moderate or heavy freezing rain"
            | "moderate or heavy rain shower" => ConditionIcon::HeavyRain,
            "moderate or heavy rain with thunder" => ConditionIcon::Thunder,
            _ => ConditionIcon::Other,
        }
    }

    /// Terminal glyph standing in for the icon image.
    pub fn glyph(&self) -> &'static str {
        match self {
            ConditionIcon::PartlyCloudy => "⛅",
            ConditionIcon::Cloudy => "☁",
            ConditionIcon::Sun => "☀",
            ConditionIcon::Mist => "🌫",
            ConditionIcon::ModerateRain => "🌦",
            ConditionIcon::HeavyRain => "🌧",
            ConditionIcon::Thunder => "⛈",
            ConditionIcon::Other => "•",
        }
    }
}
