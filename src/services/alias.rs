/// Fixed alias table broadening ambiguous location abbreviations before
/// they hit the catalog's literal-text matching. A lookup table, not a
/// geocoder: unknown inputs pass through unchanged.
static LOCATION_ALIASES: &[(&str, &[&str])] = &[
    (
        "uk",
        &[
            "United Kingdom",
            "Great Britain",
            "England",
            "Scotland",
            "Wales",
        ],
    ),
    (
        "usa",
        &["United States", "USA", "America"],
    ),
    ("us", &["United States", "USA"]),
    (
        "uae",
        &["United Arab Emirates", "Dubai", "Abu Dhabi"],
    ),
    ("nyc", &["New York"]),
    ("la", &["Los Angeles"]),
];

/// Returns the input itself plus any broadened spellings.
pub fn expand(location: &str) -> Vec<String> {
    let trimmed = location.trim();
    if trimmed.is_empty() {
        return vec![];
    }

    let mut terms = vec![trimmed.to_string()];
    let key = trimmed.to_lowercase();
    if let Some((_, aliases)) = LOCATION_ALIASES.iter().find(|(k, _)| *k == key) {
        for alias in *aliases {
            if !alias.eq_ignore_ascii_case(trimmed) {
                terms.push(alias.to_string());
            }
        }
    }
    terms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uk_expands_to_full_spellings() {
        let terms = expand("UK");
        assert!(terms.contains(&"UK".to_string()));
        assert!(terms.contains(&"United Kingdom".to_string()));
        assert!(terms.contains(&"Great Britain".to_string()));
    }

    #[test]
    fn test_unknown_location_passes_through() {
        assert_eq!(expand("Zurich"), vec!["Zurich".to_string()]);
    }

    #[test]
    fn test_expansion_is_case_insensitive_and_deduped() {
        let terms = expand("usa");
        assert_eq!(terms[0], "usa");
        // "USA" alias differs only by case from the input, so it is skipped
        assert!(!terms.iter().skip(1).any(|t| t.eq_ignore_ascii_case("usa")));
        assert!(terms.contains(&"United States".to_string()));
    }

    #[test]
    fn test_empty_input_yields_no_terms() {
        assert!(expand("   ").is_empty());
    }
}
