//! Tuition pricing rules.
//!
//! All amounts are in minor currency units (cents). This module is the single
//! authoritative pricing source: the intake wizard's running totals, the
//! enrolment fallback, and the checkout total all call into it, so the three
//! call sites can never disagree.

// ---------------------------------------------------------------------------
// Price points
// ---------------------------------------------------------------------------

/// Per-subject price for junior courses (years 7-10), in cents.
pub const JUNIOR_UNIT_PRICE: i64 = 45_000;

/// Per-subject price for senior courses (years 11-12), in cents.
pub const SENIOR_UNIT_PRICE: i64 = 75_000;

/// Junior year-level substrings matched against course and class names.
const JUNIOR_YEAR_MARKERS: [&str; 4] = ["year 7", "year 8", "year 9", "year 10"];

/// Senior course names that are nonetheless priced at the junior rate.
const SENIOR_STANDARD_EXCEPTIONS: [&str; 2] = ["year 11 standard", "year 12 standard 1"];

// ---------------------------------------------------------------------------
// Granular rule (itemized selections)
// ---------------------------------------------------------------------------

/// Price a single subject from its course or class name.
///
/// Names containing "year 7" through "year 10" are junior-priced, as are the
/// "year 11 standard" and "year 12 standard 1" courses. Everything else,
/// including unrecognized names, is senior-priced. Never fails.
pub fn granular_unit_price(course_or_class_name: &str) -> i64 {
    let name = course_or_class_name.to_lowercase();

    if JUNIOR_YEAR_MARKERS.iter().any(|m| name.contains(m)) {
        return JUNIOR_UNIT_PRICE;
    }
    if SENIOR_STANDARD_EXCEPTIONS.iter().any(|m| name.contains(m)) {
        return JUNIOR_UNIT_PRICE;
    }
    SENIOR_UNIT_PRICE
}

/// Total an itemized list of course/class names with the granular rule.
pub fn granular_total<S: AsRef<str>>(course_names: &[S]) -> i64 {
    course_names
        .iter()
        .map(|name| granular_unit_price(name.as_ref()))
        .sum()
}

// ---------------------------------------------------------------------------
// Coarse rule (year level + count fallback)
// ---------------------------------------------------------------------------

/// Price a subject from a bare year level.
///
/// Years 7-10 are junior-priced, 11-12 senior-priced. Anything outside that
/// range falls through to the junior default rather than erroring.
pub fn coarse_unit_price(year_level: i32) -> i64 {
    match year_level {
        7..=10 => JUNIOR_UNIT_PRICE,
        11 | 12 => SENIOR_UNIT_PRICE,
        _ => JUNIOR_UNIT_PRICE,
    }
}

/// Total for `subject_count` subjects at the coarse per-year rate.
pub fn coarse_total(year_level: i32, subject_count: u32) -> i64 {
    coarse_unit_price(year_level) * i64::from(subject_count)
}

/// Naive subject count derived from a concatenated course-name string.
///
/// Used only when the caller supplies neither an itemized selection list nor
/// an explicit count: "Maths, Physics" counts as 2. An empty string still
/// counts as 1, matching the comma-count fallback it replaces.
pub fn subject_count_from_course_names(course_names: &str) -> u32 {
    course_names.split(',').count() as u32
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- granular rule --

    #[test]
    fn junior_years_are_junior_priced() {
        for name in [
            "Year 7 English",
            "year 8 mathematics",
            "Year 9 Mathematics Advanced",
            "YEAR 10 Science",
        ] {
            assert_eq!(granular_unit_price(name), JUNIOR_UNIT_PRICE, "{name}");
        }
    }

    #[test]
    fn senior_years_are_senior_priced() {
        for name in [
            "Year 11 Mathematics Advanced",
            "Year 12 Physics",
            "year 11 chemistry",
        ] {
            assert_eq!(granular_unit_price(name), SENIOR_UNIT_PRICE, "{name}");
        }
    }

    #[test]
    fn senior_standard_exceptions_are_junior_priced() {
        assert_eq!(
            granular_unit_price("Year 11 Standard Mathematics"),
            JUNIOR_UNIT_PRICE
        );
        assert_eq!(
            granular_unit_price("Year 12 Standard 1 Mathematics"),
            JUNIOR_UNIT_PRICE
        );
    }

    #[test]
    fn year_12_standard_2_is_not_an_exception() {
        // Only "standard 1" is discounted in year 12.
        assert_eq!(
            granular_unit_price("Year 12 Standard 2 Mathematics"),
            SENIOR_UNIT_PRICE
        );
    }

    #[test]
    fn unrecognized_names_default_to_senior() {
        assert_eq!(granular_unit_price("Trial Exam Workshop"), SENIOR_UNIT_PRICE);
        assert_eq!(granular_unit_price(""), SENIOR_UNIT_PRICE);
    }

    #[test]
    fn granular_total_sums_mixed_selections() {
        let names = ["Year 9 Mathematics", "Year 12 Physics"];
        assert_eq!(granular_total(&names), 45_000 + 75_000);
    }

    // -- coarse rule --

    #[test]
    fn coarse_junior_range() {
        for year in 7..=10 {
            assert_eq!(coarse_unit_price(year), JUNIOR_UNIT_PRICE);
        }
    }

    #[test]
    fn coarse_senior_range() {
        assert_eq!(coarse_unit_price(11), SENIOR_UNIT_PRICE);
        assert_eq!(coarse_unit_price(12), SENIOR_UNIT_PRICE);
    }

    #[test]
    fn coarse_out_of_range_defaults_to_junior() {
        for year in [0, 1, 6, 13, -3] {
            assert_eq!(coarse_unit_price(year), JUNIOR_UNIT_PRICE, "year {year}");
        }
    }

    #[test]
    fn coarse_total_multiplies_by_count() {
        assert_eq!(coarse_total(9, 3), 3 * JUNIOR_UNIT_PRICE);
        assert_eq!(coarse_total(12, 2), 2 * SENIOR_UNIT_PRICE);
        assert_eq!(coarse_total(4, 2), 2 * JUNIOR_UNIT_PRICE);
        assert_eq!(coarse_total(11, 0), 0);
    }

    // -- comma-count fallback --

    #[test]
    fn comma_count_fallback() {
        assert_eq!(subject_count_from_course_names("Maths"), 1);
        assert_eq!(subject_count_from_course_names("Maths, Physics"), 2);
        assert_eq!(
            subject_count_from_course_names("Maths,Physics,Chemistry"),
            3
        );
        // The naive count never returns zero, even for an empty string.
        assert_eq!(subject_count_from_course_names(""), 1);
    }
}
