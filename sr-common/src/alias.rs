//! Identity normalization
//!
//! Alias keys are the lower-cased, whitespace-free form of a name. They are
//! stored on every write and matched (case-insensitive substring) on reads,
//! so "Jane Doe", "jane  doe" and "JaneDoe" all resolve to `janedoe`.

/// Canonical alias key for a free-form name
///
/// Total and pure: lower-cases the input and drops every whitespace character.
pub fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// First/last name pair detected in a "Last, First" name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitName {
    pub first: String,
    pub last: String,
}

impl SplitName {
    /// "First Last" display form
    pub fn display(&self) -> String {
        format!("{} {}", self.first, self.last)
    }
}

/// Detect the "Last, First" convention
///
/// Splits on the first comma. Returns `None` when there is no comma or either
/// side is blank, in which case the raw name should be left untouched.
pub fn split_name(raw: &str) -> Option<SplitName> {
    let (last, first) = raw.split_once(',')?;
    let first = first.trim();
    let last = last.trim();

    if first.is_empty() || last.is_empty() {
        return None;
    }

    Some(SplitName {
        first: first.to_string(),
        last: last.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_whitespace_and_case() {
        assert_eq!(normalize("Jane Doe"), "janedoe");
        assert_eq!(normalize("  SV Blau-Weiß \tErfurt "), "svblau-weißerfurt");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize("SG Neukölln Berlin");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_split_last_first() {
        let split = split_name("Doe, Jane").expect("comma form should split");
        assert_eq!(split.first, "Jane");
        assert_eq!(split.last, "Doe");
        assert_eq!(split.display(), "Jane Doe");
    }

    #[test]
    fn test_split_keeps_compound_first_names() {
        let split = split_name("Müller-Lüdenscheidt,  Anna Lena ").unwrap();
        assert_eq!(split.first, "Anna Lena");
        assert_eq!(split.last, "Müller-Lüdenscheidt");
    }

    #[test]
    fn test_no_split_without_comma() {
        assert_eq!(split_name("Jane Doe"), None);
    }

    #[test]
    fn test_no_split_with_blank_side() {
        assert_eq!(split_name("Doe,"), None);
        assert_eq!(split_name(" , Jane"), None);
    }
}
