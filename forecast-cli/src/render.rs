//! Plain-text rendering of the weather screen.
//!
//! Everything here returns lines rather than writing to the terminal, so the
//! interactive screen and the one-shot `show` command share one layout.

use forecast_core::{ForecastBundle, LocationCandidate, ScreenState};

const STRIP_COLUMNS: usize = 7;

/// Transient input state owned by the terminal front end.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputView {
    pub query: String,
    pub highlighted: usize,
}

pub fn render_screen(state: &ScreenState, input: &InputView) -> Vec<String> {
    if state.is_loading() {
        return render_loading(state);
    }

    let mut lines = Vec::new();

    if state.search_open() {
        lines.push(format!("Search city: {}_", input.query));
        lines.extend(render_candidates(state.visible_candidates(), input.highlighted));
    } else if let Some(bundle) = state.forecast() {
        lines.push(header(bundle));
    }

    if let Some(err) = state.error() {
        lines.push(format!("! {err}"));
    }
    lines.push(String::new());

    if let Some(bundle) = state.forecast() {
        lines.extend(render_forecast(bundle));
    }

    lines.push(String::new());
    lines.push(key_hints(state).to_string());
    lines
}

fn render_loading(state: &ScreenState) -> Vec<String> {
    let mut lines = vec!["Loading...".to_string()];
    if let Some(city) = state.pending_city() {
        lines.push(format!("  {city}"));
    }
    if let Some(err) = state.error() {
        lines.push(String::new());
        lines.push(format!("! {err}"));
    }
    lines.push(String::new());
    lines.push(key_hints(state).to_string());
    lines
}

fn render_candidates(candidates: &[LocationCandidate], highlighted: usize) -> Vec<String> {
    candidates
        .iter()
        .enumerate()
        .map(|(idx, loc)| {
            let marker = if idx == highlighted { '>' } else { ' ' };
            format!("  {marker} 📍 {}", loc.label())
        })
        .collect()
}

fn key_hints(state: &ScreenState) -> &'static str {
    if state.can_retry() {
        "[r] retry  [q] quit"
    } else if state.is_loading() {
        "[q] quit"
    } else if state.search_open() {
        "[↑/↓] choose  [enter] select  [esc] close"
    } else {
        "[/] search  [q] quit"
    }
}

pub fn header(bundle: &ForecastBundle) -> String {
    format!("{}, {}", bundle.location.name, bundle.location.country)
}

/// Current conditions, the daily strip and the detail panel.
pub fn render_forecast(bundle: &ForecastBundle) -> Vec<String> {
    let current = &bundle.current;
    let today = bundle.today();
    let mut lines = vec![
        format!("        {}", current.icon.glyph()),
        format!("      {}°", current.temperature_c),
        format!("      {}", current.condition),
        String::new(),
        "📅 Daily forecast".to_string(),
    ];

    for row in bundle.days.chunks(STRIP_COLUMNS) {
        let cells: Vec<String> = row
            .iter()
            .map(|day| format!("{} {} {}°", day.icon.glyph(), day.weekday(), day.max_temp_c))
            .collect();
        lines.push(format!("  {}", cells.join("  |  ")));
    }

    lines.push(String::new());
    lines.push(format!(
        "💨 {}km/h   💧 {}%   ☀ {}",
        current.wind_kph,
        current.humidity_pct,
        today.map(|d| d.sunrise.as_str()).unwrap_or("-"),
    ));

    lines.push(String::new());
    lines.push("Other data".to_string());
    lines.push(format!(
        "  {:<22}{}",
        format!("FEELS LIKE {}°", current.feels_like_c),
        match today {
            Some(d) => format!("EXPECTED RAIN {} mm", d.total_precip_mm),
            None => "EXPECTED RAIN -".to_string(),
        }
    ));
    lines.push(format!(
        "  {:<22}VISIBILITY {} km",
        match today {
            Some(d) => format!("AVERAGE TEMP {}°", d.avg_temp_c),
            None => "AVERAGE TEMP -".to_string(),
        },
        current.visibility_km
    ));

    lines
}

pub fn render_candidate_list(candidates: &[LocationCandidate]) -> Vec<String> {
    candidates
        .iter()
        .map(|loc| match &loc.region {
            Some(region) => format!("{} ({region})", loc.label()),
            None => loc.label(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use forecast_core::{
        ConditionIcon, CurrentConditions, DayForecast, LocationInfo,
        screen::{Effect, Event},
    };

    fn bundle() -> ForecastBundle {
        let day = |d: u32, max: f64| DayForecast {
            date: NaiveDate::from_ymd_opt(2024, 3, d).expect("valid date"),
            max_temp_c: max,
            avg_temp_c: 7.1,
            total_precip_mm: 0.3,
            condition: "Sunny".into(),
            sunrise: "07:18 AM".into(),
            icon: ConditionIcon::Sun,
        };

        ForecastBundle {
            current: CurrentConditions {
                temperature_c: 8.0,
                condition: "Partly cloudy".into(),
                icon: ConditionIcon::PartlyCloudy,
                wind_kph: 19.1,
                humidity_pct: 76,
                feels_like_c: 5.2,
                visibility_km: 10.0,
            },
            location: LocationInfo {
                name: "Amsterdam".into(),
                region: "North Holland".into(),
                country: "Netherlands".into(),
            },
            days: (4..=13).map(|d| day(d, 10.4)).collect(),
        }
    }

    fn ready_state() -> ScreenState {
        let mut state = ScreenState::new();
        let effects = state.apply(Event::Mounted { stored_city: None });
        let Some(Effect::FetchForecast { generation, .. }) = effects.into_iter().next() else {
            panic!("mount must request a forecast");
        };
        state.apply(Event::ForecastCompleted { generation, result: Ok(bundle()) });
        state
    }

    #[test]
    fn loading_screen_names_pending_city() {
        let mut state = ScreenState::new();
        state.apply(Event::Mounted { stored_city: Some("Paris".into()) });

        let lines = render_screen(&state, &InputView::default());
        assert_eq!(lines[0], "Loading...");
        assert_eq!(lines[1], "  Paris");
        assert_eq!(lines.last().map(String::as_str), Some("[q] quit"));
    }

    #[test]
    fn ready_screen_shows_header_and_details() {
        let lines = render_screen(&ready_state(), &InputView::default());
        let text = lines.join("\n");

        assert_eq!(lines[0], "Amsterdam, Netherlands");
        assert!(text.contains("8°"));
        assert!(text.contains("Partly cloudy"));
        assert!(text.contains("19.1km/h"));
        assert!(text.contains("76%"));
        assert!(text.contains("07:18 AM"));
        assert!(text.contains("FEELS LIKE 5.2°"));
        assert!(text.contains("EXPECTED RAIN 0.3 mm"));
        assert!(text.contains("AVERAGE TEMP 7.1°"));
        assert!(text.contains("VISIBILITY 10 km"));
    }

    #[test]
    fn forecast_strip_wraps_after_a_week() {
        let lines = render_forecast(&bundle());
        let strip: Vec<_> = lines.iter().filter(|l| l.contains("10.4°")).collect();

        assert_eq!(strip.len(), 2);
        assert!(strip[0].starts_with("  ☀ Monday 10.4°"));
        assert_eq!(strip[0].matches('|').count(), STRIP_COLUMNS - 1);
        assert!(strip[1].contains("Wednesday"));
    }

    #[test]
    fn open_search_replaces_header_with_input() {
        let mut state = ready_state();
        state.apply(Event::ToggleSearch);
        let input = InputView { query: "Lon".into(), highlighted: 0 };

        let lines = render_screen(&state, &input);
        assert_eq!(lines[0], "Search city: Lon_");
        assert!(!lines.iter().any(|l| l == "Amsterdam, Netherlands"));
        assert!(lines.last().is_some_and(|l| l.contains("[esc] close")));
    }

    #[test]
    fn candidate_list_marks_highlighted_row() {
        let candidates = vec![
            LocationCandidate { name: "London".into(), country: "UK".into(), region: None },
            LocationCandidate {
                name: "London".into(),
                country: "Canada".into(),
                region: Some("Ontario".into()),
            },
        ];

        let rows = render_candidates(&candidates, 1);
        assert_eq!(rows, ["    📍 London, UK", "  > 📍 London, Canada"]);

        let plain = render_candidate_list(&candidates);
        assert_eq!(plain, ["London, UK", "London, Canada (Ontario)"]);
    }
}
