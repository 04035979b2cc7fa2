//! Weather context for outdoor habits.

use serde::{Deserialize, Serialize};

use crate::habit::{Habit, HabitCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    Sunny,
    PartlyCloudy,
    Cloudy,
    Rainy,
    Stormy,
    Snowy,
    Windy,
}

impl Weather {
    fn is_dry(&self) -> bool {
        matches!(self, Weather::Sunny | Weather::PartlyCloudy | Weather::Cloudy)
    }
}

/// Conditions outside right now, as reported by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalContext {
    pub weather: Weather,
    #[serde(default)]
    pub temperature_c: Option<f64>,
}

impl EnvironmentalContext {
    /// Dry weather and, when known, a temperature between 5 and 30 °C.
    pub fn is_good_for_outdoors(&self) -> bool {
        self.weather.is_dry()
            && self
                .temperature_c
                .map_or(true, |t| (5.0..=30.0).contains(&t))
    }
}

/// Fitness habits and titles that mention an outdoor activity.
pub(crate) fn is_outdoor(habit: &Habit) -> bool {
    const KEYWORDS: [&str; 7] = ["walk", "run", "hike", "bike", "cycle", "jog", "outdoor"];
    if habit.category == HabitCategory::Fitness {
        return true;
    }
    let title = habit.title.to_lowercase();
    KEYWORDS.iter().any(|k| title.contains(k))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habit::HabitFrequency;

    fn habit(title: &str, category: HabitCategory) -> Habit {
        Habit {
            id: "h".to_string(),
            title: title.to_string(),
            category,
            frequency: HabitFrequency::Daily,
            target_value: 1.0,
            unit: "times".to_string(),
            is_active: true,
        }
    }

    #[test]
    fn outdoor_detection() {
        assert!(is_outdoor(&habit("Push-ups", HabitCategory::Fitness)));
        assert!(is_outdoor(&habit("Evening Walk", HabitCategory::MentalHealth)));
        assert!(!is_outdoor(&habit("Read a chapter", HabitCategory::Learning)));
    }

    #[test]
    fn good_weather_needs_dry_and_mild() {
        let sunny = EnvironmentalContext { weather: Weather::Sunny, temperature_c: Some(18.0) };
        let hot = EnvironmentalContext { weather: Weather::Sunny, temperature_c: Some(36.0) };
        let rain = EnvironmentalContext { weather: Weather::Rainy, temperature_c: None };
        let unknown_temp = EnvironmentalContext { weather: Weather::Cloudy, temperature_c: None };

        assert!(sunny.is_good_for_outdoors());
        assert!(!hot.is_good_for_outdoors());
        assert!(!rain.is_good_for_outdoors());
        assert!(unknown_temp.is_good_for_outdoors());
    }
}
