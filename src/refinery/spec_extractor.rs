// * Specification String Extraction
// * Turns free-text spec lines such as "8 GB RAM" into numeric hardware features.

use regex::Regex;
use std::sync::LazyLock;

use crate::persistence::schema::{Feature, ParsedSpecs};

// * Unit patterns: a number, optional whitespace, then the unit (case-insensitive)
static UNIT_GB: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([0-9]+\.?[0-9]*)\s*GB").expect("Invalid GB regex"));

static UNIT_MAH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([0-9]+\.?[0-9]*)\s*mAh").expect("Invalid mAh regex"));

static UNIT_MP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([0-9]+\.?[0-9]*)\s*MP").expect("Invalid MP regex"));

static UNIT_INCH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([0-9]+\.?[0-9]*)\s*inch").expect("Invalid inch regex"));

/// How a rule decides that a spec line belongs to it
#[derive(Debug, Clone, Copy)]
enum Trigger {
    /// Any keyword is a substring of the lower-cased line
    AnyOf(&'static [&'static str]),
    /// Every keyword is a substring of the lower-cased line
    AllOf(&'static [&'static str]),
}

impl Trigger {
    fn matches(&self, lowered: &str) -> bool {
        match self {
            Trigger::AnyOf(keywords) => keywords.iter().any(|k| lowered.contains(k)),
            Trigger::AllOf(keywords) => keywords.iter().all(|k| lowered.contains(k)),
        }
    }
}

/// One classification rule: trigger keywords, target feature and unit pattern
struct SpecRule {
    trigger: Trigger,
    feature: Feature,
    unit: &'static LazyLock<Regex>,
}

// ! Order matters: the first matching rule claims the line.
static RULES: [SpecRule; 5] = [
    SpecRule {
        trigger: Trigger::AnyOf(&["ram"]),
        feature: Feature::RamGb,
        unit: &UNIT_GB,
    },
    SpecRule {
        trigger: Trigger::AnyOf(&["storage", "rom"]),
        feature: Feature::StorageGb,
        unit: &UNIT_GB,
    },
    SpecRule {
        trigger: Trigger::AnyOf(&["battery", "mah"]),
        feature: Feature::BatteryMah,
        unit: &UNIT_MAH,
    },
    SpecRule {
        trigger: Trigger::AllOf(&["camera", "mp"]),
        feature: Feature::CameraMp,
        unit: &UNIT_MP,
    },
    SpecRule {
        trigger: Trigger::AnyOf(&["inch"]),
        feature: Feature::DisplayInch,
        unit: &UNIT_INCH,
    },
];

fn claiming_rule(spec: &str) -> Option<&'static SpecRule> {
    let lowered = spec.to_lowercase();
    RULES.iter().find(|rule| rule.trigger.matches(&lowered))
}

/// Returns the feature a spec line belongs to, if any rule claims it
pub fn classify(spec: &str) -> Option<Feature> {
    claiming_rule(spec).map(|rule| rule.feature)
}

/// Extracts the first `<number><ws>*<unit>` occurrence as a float
fn extract_numeric(pattern: &Regex, text: &str) -> Option<f64> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Parses a listing's spec lines into features.
///
/// Lines claimed by no rule are ignored. When several lines are claimed by the
/// same rule the last one wins, including when it carries no number: a later
/// "RAM: LPDDR5" clears an earlier "8 GB RAM".
pub fn extract_specs<I, S>(specs: I) -> ParsedSpecs
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parsed = ParsedSpecs::default();

    for spec in specs {
        let spec = spec.as_ref().trim();
        if let Some(rule) = claiming_rule(spec) {
            parsed.set(rule.feature, extract_numeric(rule.unit, spec));
        }
    }

    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_full_listing() {
        let parsed = extract_specs([
            "8 GB RAM",
            "128 GB Storage",
            "5000 mAh Battery",
            "50 MP Camera",
            "6.5 inch Display",
        ]);

        assert_eq!(parsed.ram_gb, Some(8.0));
        assert_eq!(parsed.storage_gb, Some(128.0));
        assert_eq!(parsed.battery_mah, Some(5000.0));
        assert_eq!(parsed.camera_mp, Some(50.0));
        assert_eq!(parsed.display_inch, Some(6.5));
    }

    #[test]
    fn test_ram_rule_claims_combined_line() {
        // * "ram" is checked first, so the storage figure on the same line is never seen
        let parsed = extract_specs(["8 GB RAM | 128 GB ROM"]);
        assert_eq!(parsed.ram_gb, Some(8.0));
        assert_eq!(parsed.storage_gb, None);
    }

    #[test]
    fn test_rom_keyword_and_case_insensitive_unit() {
        let parsed = extract_specs(["256gb rom"]);
        assert_eq!(parsed.storage_gb, Some(256.0));
    }

    #[test]
    fn test_camera_requires_mp_keyword() {
        assert_eq!(classify("Triple Camera Setup"), None);
        assert_eq!(classify("48MP Rear Camera"), Some(Feature::CameraMp));

        let parsed = extract_specs(["48MP + 8MP Rear Camera"]);
        assert_eq!(parsed.camera_mp, Some(48.0));
    }

    #[test]
    fn test_mah_without_battery_keyword() {
        let parsed = extract_specs(["4500mAh"]);
        assert_eq!(parsed.battery_mah, Some(4500.0));
    }

    #[test]
    fn test_missing_unit_is_absent_not_zero() {
        let parsed = extract_specs(["RAM: LPDDR5", "Display 6.7 cm"]);
        assert_eq!(parsed.ram_gb, None);
        assert_eq!(parsed.display_inch, None);
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_last_matching_line_wins() {
        let parsed = extract_specs(["6 GB RAM", "8 GB RAM"]);
        assert_eq!(parsed.ram_gb, Some(8.0));

        // * A later claimed line without a number clears the earlier value
        let parsed = extract_specs(["8 GB RAM", "RAM: LPDDR5"]);
        assert_eq!(parsed.ram_gb, None);
    }

    #[test]
    fn test_unrelated_lines_ignored() {
        let parsed = extract_specs(["Snapdragon 8 Gen 2", "Android 14", ""]);
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_decimal_and_whitespace_before_unit() {
        let parsed = extract_specs(["6.67   inch AMOLED"]);
        assert_eq!(parsed.display_inch, Some(6.67));
    }
}
