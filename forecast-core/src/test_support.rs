//! Shared fixtures for unit tests.

use chrono::NaiveDate;

use crate::model::{
    ConditionIcon, CurrentConditions, DayForecast, ForecastBundle, LocationCandidate, LocationInfo,
};

pub fn bundle(city: &str) -> ForecastBundle {
    ForecastBundle {
        current: CurrentConditions {
            temperature_c: 12.0,
            condition: "Sunny".into(),
            icon: ConditionIcon::Sun,
            wind_kph: 9.0,
            humidity_pct: 60,
            feels_like_c: 11.0,
            visibility_km: 10.0,
        },
        location: LocationInfo {
            name: city.into(),
            region: String::new(),
            country: "Somewhere".into(),
        },
        days: vec![DayForecast {
            date: NaiveDate::from_ymd_opt(2024, 3, 4).expect("valid date"),
            max_temp_c: 14.0,
            avg_temp_c: 10.0,
            total_precip_mm: 0.0,
            condition: "Sunny".into(),
            sunrise: "07:00 AM".into(),
            icon: ConditionIcon::Sun,
        }],
    }
}

pub fn candidate(name: &str) -> LocationCandidate {
    LocationCandidate { name: name.into(), country: "Country".into(), region: None }
}
