use chrono::{Datelike, Duration, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{SearchFilter, ServiceCategory};

/// Ranked classification rules, evaluated top to bottom; the first match
/// wins. The order is load-bearing: a message naming several services
/// always resolves to the highest-ranked one (e.g. "helicopter" beats
/// "jet" even when both appear).
pub static SERVICE_RULES: &[(&str, ServiceCategory)] = &[
    (r"\bempty[ -]?legs?\b", ServiceCategory::EmptyLeg),
    (r"\b(?:helicopters?|heli|chopper)\b", ServiceCategory::Helicopter),
    (
        r"\b(?:jets?|flights?|planes?|fly(?:ing)?)\b",
        ServiceCategory::Jet,
    ),
    (r"\b(?:yachts?|boats?|catamaran)\b", ServiceCategory::Yacht),
    (
        r"\b(?:cars?|limousines?|limo|chauffeur)\b",
        ServiceCategory::Car,
    ),
    (
        r"\b(?:adventures?|experiences?|safari)\b",
        ServiceCategory::Adventure,
    ),
];

static COMPILED_RULES: Lazy<Vec<(Regex, ServiceCategory)>> = Lazy::new(|| {
    SERVICE_RULES
        .iter()
        .map(|(pattern, category)| (Regex::new(pattern).expect("invalid service rule"), *category))
        .collect()
});

static FROM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bfrom\s+([a-z][a-z ]*?)(?:\s+(?:to|for)\b|\s*,|$)").unwrap()
});
static TO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bto\s+([a-z][a-z ]*?)(?:\s+for\b|\s*,|$)").unwrap());
static ROUTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([a-z][a-z ]*?)\s+to\s+([a-z][a-z ]*?)(?:\s+for\b|\s*,|$)").unwrap()
});
static PASSENGERS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d+)\s*(?:passengers?|persons?|people|pax)\b").unwrap()
});

/// Best-effort extraction of a structured filter from one chat message.
/// Never fails: anything that doesn't match is simply left unset. `now`
/// anchors relative date phrases.
pub fn extract(message: &str, now: NaiveDate) -> SearchFilter {
    let text = message.to_lowercase();
    let mut filter = SearchFilter::default();

    filter.service = COMPILED_RULES
        .iter()
        .find(|(re, _)| re.is_match(&text))
        .map(|(_, category)| *category);

    // The only relative date phrase understood: the following Monday
    // through Sunday. Everything else stays unparsed.
    if text.contains("next week") {
        let days_ahead = 7 - i64::from(now.weekday().num_days_from_monday());
        let monday = now + Duration::days(days_ahead);
        filter.date_from = Some(monday);
        filter.date_to = Some(monday + Duration::days(6));
    }

    // Scrubbed so the phrase cannot leak into a location capture.
    let text = text.replace("next week", " ");

    filter.from = FROM_RE
        .captures(&text)
        .and_then(|c| clean_location(&c[1]));
    filter.to = TO_RE.captures(&text).and_then(|c| clean_location(&c[1]));

    // Combined "X to Y" is only a fallback for when the explicit markers
    // did not fire.
    if filter.from.is_none() {
        if let Some(caps) = ROUTE_RE.captures(&text) {
            filter.from = clean_location(&caps[1]);
            if filter.to.is_none() {
                filter.to = clean_location(&caps[2]);
            }
        }
    }

    filter.passengers = PASSENGERS_RE
        .captures(&text)
        .and_then(|c| c[1].parse().ok());

    filter
}

/// Normalizes a bare location answer ("zurich", "from zurich") the same
/// way extracted captures are cleaned. Used when a message is the direct
/// answer to a slot prompt.
pub fn normalize_location(raw: &str) -> Option<String> {
    let text = raw.to_lowercase();
    let text = text.trim().trim_start_matches("from ").trim_start_matches("to ");
    clean_location(text)
}

/// Words that leak into location captures when the combined route pattern
/// fires mid-sentence.
const LOCATION_STOPWORDS: &[&str] = &[
    "i", "we", "a", "an", "the", "need", "want", "book", "like", "me", "us", "please", "go",
    "travel", "get",
];

fn clean_location(raw: &str) -> Option<String> {
    // Scrub service keywords first so multiword ones ("empty legs") go
    // whole, then drop filler words.
    let mut text = raw.to_string();
    for (re, _) in COMPILED_RULES.iter() {
        text = re.replace_all(&text, " ").into_owned();
    }

    let words: Vec<&str> = text
        .split_whitespace()
        .filter(|w| !LOCATION_STOPWORDS.contains(w))
        .collect();

    if words.is_empty() {
        return None;
    }
    Some(
        words
            .iter()
            .map(|w| title_case(w))
            .collect::<Vec<_>>()
            .join(" "),
    )
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().to_string() + chars.as_str(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wed() -> NaiveDate {
        // 2025-06-18 is a Wednesday
        NaiveDate::from_ymd_opt(2025, 6, 18).unwrap()
    }

    #[test]
    fn test_full_request_extracts_all_fields() {
        let filter = extract("Helicopter from Zurich to Milan for 4 passengers", wed());
        assert_eq!(filter.service, Some(ServiceCategory::Helicopter));
        assert_eq!(filter.from.as_deref(), Some("Zurich"));
        assert_eq!(filter.to.as_deref(), Some("Milan"));
        assert_eq!(filter.passengers, Some(4));
    }

    #[test]
    fn test_helicopter_outranks_jet() {
        let filter = extract("book a jet, and also need a helicopter transfer", wed());
        assert_eq!(filter.service, Some(ServiceCategory::Helicopter));

        let filter = extract("helicopter or jet, whichever is cheaper", wed());
        assert_eq!(filter.service, Some(ServiceCategory::Helicopter));
    }

    #[test]
    fn test_empty_leg_outranks_everything() {
        let filter = extract("any empty leg flights on a jet or helicopter?", wed());
        assert_eq!(filter.service, Some(ServiceCategory::EmptyLeg));
    }

    #[test]
    fn test_empty_legs_to_dubai() {
        let filter = extract("empty legs to Dubai", wed());
        assert_eq!(filter.service, Some(ServiceCategory::EmptyLeg));
        assert_eq!(filter.to.as_deref(), Some("Dubai"));
        assert_eq!(filter.from, None);
        assert_eq!(filter.passengers, None);
    }

    #[test]
    fn test_route_fallback_without_markers() {
        let filter = extract("Zurich to Milan", wed());
        assert_eq!(filter.from.as_deref(), Some("Zurich"));
        assert_eq!(filter.to.as_deref(), Some("Milan"));
    }

    #[test]
    fn test_from_with_comma_terminator() {
        let filter = extract("flying from Geneva, 6 people", wed());
        assert_eq!(filter.service, Some(ServiceCategory::Jet));
        assert_eq!(filter.from.as_deref(), Some("Geneva"));
        assert_eq!(filter.passengers, Some(6));
    }

    #[test]
    fn test_pax_keyword() {
        let filter = extract("yacht in Ibiza for 8 pax", wed());
        assert_eq!(filter.service, Some(ServiceCategory::Yacht));
        assert_eq!(filter.passengers, Some(8));
    }

    #[test]
    fn test_next_week_spans_following_monday_to_sunday() {
        let filter = extract("jet to Nice next week", wed());
        assert_eq!(filter.date_from, NaiveDate::from_ymd_opt(2025, 6, 23));
        assert_eq!(filter.date_to, NaiveDate::from_ymd_opt(2025, 6, 29));
    }

    #[test]
    fn test_next_week_from_a_monday() {
        let monday = NaiveDate::from_ymd_opt(2025, 6, 16).unwrap();
        let filter = extract("next week", monday);
        // "next week" on a Monday means the week after, not today
        assert_eq!(filter.date_from, NaiveDate::from_ymd_opt(2025, 6, 23));
        assert_eq!(filter.date_to, NaiveDate::from_ymd_opt(2025, 6, 29));
    }

    #[test]
    fn test_other_date_phrases_stay_unparsed() {
        let filter = extract("jet to Nice tomorrow", wed());
        assert_eq!(filter.date_from, None);
        assert_eq!(filter.date_to, None);
    }

    #[test]
    fn test_unrelated_message_extracts_nothing() {
        let filter = extract("hello there, what can you do?", wed());
        assert!(filter.is_empty());
    }

    #[test]
    fn test_multiword_location() {
        let filter = extract("car in abu dhabi, from new york to abu dhabi", wed());
        assert_eq!(filter.from.as_deref(), Some("New York"));
        assert_eq!(filter.to.as_deref(), Some("Abu Dhabi"));
    }

    #[test]
    fn test_filler_words_are_stripped_from_route_capture() {
        let filter = extract("i want a jet zurich to milan", wed());
        assert_eq!(filter.from.as_deref(), Some("Zurich"));
        assert_eq!(filter.to.as_deref(), Some("Milan"));
    }
}
