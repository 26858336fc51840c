//! Preference filtering and activity matching for forecast entries.

use crate::models::{ActivityRule, ForecastEntry, OptimalSlot, Preference};

/// Select forecast entries satisfying the preference, in input order, and
/// attach the activities whose temperature range contains each entry.
pub fn find_optimal_slots(
    entries: &[ForecastEntry],
    preference: &Preference,
    activities: &[ActivityRule],
) -> Vec<OptimalSlot> {
    entries
        .iter()
        .filter(|entry| preference.admits(entry))
        .map(|entry| OptimalSlot {
            entry: entry.clone(),
            activities: suitable_activities(entry.temperature, activities),
        })
        .collect()
}

/// Names of activities suited to a temperature, in rule order
pub fn suitable_activities(temperature: f64, activities: &[ActivityRule]) -> Vec<String> {
    activities
        .iter()
        .filter(|rule| rule.suits(temperature))
        .map(|rule| rule.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn forecast(samples: &[(f64, u8, &str)]) -> Vec<ForecastEntry> {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        samples
            .iter()
            .enumerate()
            .map(|(i, (temperature, humidity, condition))| ForecastEntry {
                timestamp: start + Duration::hours(3 * i as i64),
                temperature: *temperature,
                humidity: *humidity,
                condition: condition.to_string(),
            })
            .collect()
    }

    fn rules() -> Vec<ActivityRule> {
        vec![
            ActivityRule::new("Hiking", 50.0, 70.0),
            ActivityRule::new("Swimming", 68.0, 95.0),
        ]
    }

    #[test]
    fn test_all_three_conditions_must_hold() {
        let entries = forecast(&[
            (60.0, 50, "Clear"),  // matches
            (90.0, 50, "Clear"),  // too hot
            (60.0, 95, "Clear"),  // too humid
            (60.0, 50, "Snow"),   // wrong condition
            (65.0, 40, "Clouds"), // matches
        ]);
        let preference = Preference::new((50.0, 75.0), (30, 70), ["Clear", "Clouds"]).unwrap();

        let slots = find_optimal_slots(&entries, &preference, &rules());

        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].entry, entries[0]);
        assert_eq!(slots[1].entry, entries[4]);
    }

    #[test]
    fn test_order_is_preserved() {
        let entries = forecast(&[(55.0, 40, "Clear"), (52.0, 40, "Clear"), (58.0, 40, "Clear")]);
        let preference = Preference::new((50.0, 60.0), (0, 100), ["Clear"]).unwrap();

        let slots = find_optimal_slots(&entries, &preference, &rules());
        let temps: Vec<f64> = slots.iter().map(|s| s.entry.temperature).collect();
        assert_eq!(temps, vec![55.0, 52.0, 58.0]);
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let entries = forecast(&[(50.0, 30, "Rain"), (75.0, 70, "Rain")]);
        let preference = Preference::new((50.0, 75.0), (30, 70), ["Rain"]).unwrap();

        assert_eq!(find_optimal_slots(&entries, &preference, &[]).len(), 2);
    }

    #[test]
    fn test_empty_condition_set_matches_nothing() {
        let entries = forecast(&[(60.0, 50, "Clear")]);
        let preference =
            Preference::new((0.0, 100.0), (0, 100), Vec::<String>::new()).unwrap();

        assert!(find_optimal_slots(&entries, &preference, &rules()).is_empty());
    }

    #[test]
    fn test_activities_match_inclusive_ranges() {
        assert_eq!(suitable_activities(50.0, &rules()), vec!["Hiking"]);
        assert_eq!(suitable_activities(69.0, &rules()), vec!["Hiking", "Swimming"]);
        assert_eq!(suitable_activities(95.0, &rules()), vec!["Swimming"]);
        assert!(suitable_activities(40.0, &rules()).is_empty());
    }

    #[test]
    fn test_slot_carries_its_activities() {
        let entries = forecast(&[(45.0, 50, "Clear"), (62.0, 50, "Clear")]);
        let preference = Preference::new((40.0, 70.0), (0, 100), ["Clear"]).unwrap();

        let slots = find_optimal_slots(&entries, &preference, &rules());
        assert!(slots[0].activities.is_empty());
        assert_eq!(slots[1].activities, vec!["Hiking"]);
    }
}
