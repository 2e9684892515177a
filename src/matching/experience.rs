use std::sync::LazyLock;

use regex::Regex;

/// Experience signal extracted from a posting. Numeric statements
/// ("3+ years") are stronger evidence than seniority words, so parsing
/// prefers them when both appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExperienceRequirement {
    Years(u32),
    Band(SeniorityBand),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeniorityBand {
    Junior,
    Mid,
    Senior,
}

impl SeniorityBand {
    pub fn label(&self) -> &'static str {
        match self {
            SeniorityBand::Junior => "junior",
            SeniorityBand::Mid => "mid-level",
            SeniorityBand::Senior => "senior",
        }
    }

    fn ordinal(&self) -> u32 {
        match self {
            SeniorityBand::Junior => 0,
            SeniorityBand::Mid => 1,
            SeniorityBand::Senior => 2,
        }
    }
}

static YEARS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2})\s*\+?\s*(?:years?|yrs?)\b").expect("years pattern compiles")
});

/// Seniority keyword ladder. Numeric anchors for the bands come from common
/// posting phrasing: entry ~1y, mid ~3y, senior ~5y, principal/staff ~8y.
const BAND_KEYWORDS: &[(&str, SeniorityBand)] = &[
    ("entry level", SeniorityBand::Junior),
    ("entry-level", SeniorityBand::Junior),
    ("junior", SeniorityBand::Junior),
    ("graduate", SeniorityBand::Junior),
    ("mid level", SeniorityBand::Mid),
    ("mid-level", SeniorityBand::Mid),
    ("intermediate", SeniorityBand::Mid),
    ("senior", SeniorityBand::Senior),
    ("staff", SeniorityBand::Senior),
    ("principal", SeniorityBand::Senior),
    ("lead", SeniorityBand::Senior),
];

/// Parse the experience requirement out of posting text, if any is stated.
pub fn parse_requirement(text: &str) -> Option<ExperienceRequirement> {
    let lowered = text.to_lowercase();

    if let Some(captures) = YEARS_PATTERN.captures(&lowered) {
        if let Ok(years) = captures[1].parse::<u32>() {
            return Some(ExperienceRequirement::Years(years));
        }
    }

    BAND_KEYWORDS
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, band)| ExperienceRequirement::Band(*band))
}

/// Map experience years onto the same three bands postings use:
/// junior < 3, mid 3..=5, senior > 5.
pub fn band_for_years(years: u32) -> SeniorityBand {
    if years < 3 {
        SeniorityBand::Junior
    } else if years <= 5 {
        SeniorityBand::Mid
    } else {
        SeniorityBand::Senior
    }
}

/// Number of band steps between two seniority levels.
pub fn band_distance(a: SeniorityBand, b: SeniorityBand) -> u32 {
    a.ordinal().abs_diff(b.ordinal())
}
