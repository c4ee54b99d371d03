use crate::models::{ClassroomRecord, FavoriteSet};
use std::collections::HashSet;

/// Lower-case and keep only ASCII letters and digits
///
/// Lower-casing happens before filtering, so characters whose lower-case
/// form is ASCII (e.g. the Kelvin sign) survive as their ASCII letter.
/// Accented letters are dropped rather than folded.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Split a query on whitespace, then normalize each token
///
/// Tokens that normalize to nothing are kept as empty strings so that
/// they can never be satisfied.
pub fn tokenize(query: &str) -> Vec<String> {
    query.split_whitespace().map(normalize).collect()
}

/// Check whether every token matches the record's id or building
#[inline]
pub fn record_matches(record: &ClassroomRecord, tokens: &[String]) -> bool {
    if tokens.is_empty() {
        return false;
    }

    let id = normalize(&record.id);
    let building = record.building.as_deref().map(normalize).unwrap_or_default();

    tokens
        .iter()
        .all(|token| !token.is_empty() && (id.contains(token.as_str()) || building.contains(token.as_str())))
}

/// Stable partition: favorites first, then the rest, each id at most once
pub fn order_favorites_first(
    records: impl IntoIterator<Item = ClassroomRecord>,
    favorites: &FavoriteSet,
) -> Vec<ClassroomRecord> {
    let mut seen = HashSet::new();
    let (favored, rest): (Vec<_>, Vec<_>) = records
        .into_iter()
        .filter(|record| seen.insert(record.id.clone()))
        .partition(|record| favorites.contains(&record.id));

    favored.into_iter().chain(rest).collect()
}

/// Find the classrooms matching a free-text query
///
/// A blank query lists the whole directory. Otherwise a record matches when
/// every whitespace-separated token is a substring of its normalized id or
/// its normalized building name. Favorites are listed first in both cases;
/// directory order is kept within each group.
pub fn match_classrooms(
    query: &str,
    directory: &[ClassroomRecord],
    favorites: &FavoriteSet,
) -> Vec<ClassroomRecord> {
    if query.trim().is_empty() {
        return order_favorites_first(directory.iter().cloned(), favorites);
    }

    let tokens = tokenize(query);

    let matches = directory
        .iter()
        .filter(|record| record_matches(record, &tokens))
        .cloned();

    order_favorites_first(matches, favorites)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinate;

    fn classroom(id: &str, building: Option<&str>) -> ClassroomRecord {
        let record = ClassroomRecord::new(id, Coordinate::new(43.65, -79.38));
        match building {
            Some(b) => record.with_building(b),
            None => record,
        }
    }

    fn ids(records: &[ClassroomRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("KHE-123"), "khe123");
        assert_eq!(normalize("Kerr Hall East"), "kerrhalleast");
        assert_eq!(normalize("!!!"), "");
        assert_eq!(normalize("Café"), "caf");
    }

    #[test]
    fn test_tokens_split_before_normalizing() {
        assert_eq!(tokenize("  KHE   1 "), vec!["khe", "1"]);
        assert_eq!(tokenize("khe -"), vec!["khe", ""]);
    }

    #[test]
    fn test_token_may_match_building() {
        let directory = vec![
            classroom("KHE-123", Some("Kerr Hall East")),
            classroom("ENG-101", Some("Engineering Building")),
        ];

        let result = match_classrooms("kerr 123", &directory, &FavoriteSet::new());
        assert_eq!(ids(&result), vec!["KHE-123"]);

        let result = match_classrooms("building", &directory, &FavoriteSet::new());
        assert_eq!(ids(&result), vec!["ENG-101"]);
    }

    #[test]
    fn test_empty_token_never_matches() {
        let directory = vec![classroom("KHE-123", Some("Kerr Hall East"))];

        assert!(match_classrooms("khe !!", &directory, &FavoriteSet::new()).is_empty());
    }

    #[test]
    fn test_missing_building_only_matches_id() {
        let directory = vec![classroom("LIB-001", None)];

        assert_eq!(match_classrooms("lib", &directory, &FavoriteSet::new()).len(), 1);
        assert!(match_classrooms("library", &directory, &FavoriteSet::new()).is_empty());
    }

    #[test]
    fn test_duplicate_ids_listed_once() {
        let directory = vec![
            classroom("KHE-123", Some("Kerr Hall East")),
            classroom("KHE-123", Some("Kerr Hall East")),
        ];
        let favorites: FavoriteSet = ["KHE-123"].into_iter().collect();

        let result = match_classrooms("", &directory, &favorites);
        assert_eq!(ids(&result), vec!["KHE-123"]);
    }

    #[test]
    fn test_favorites_keep_directory_order() {
        let directory = vec![
            classroom("A-1", None),
            classroom("B-1", None),
            classroom("C-1", None),
            classroom("D-1", None),
        ];
        // Favorite order does not matter, directory order does
        let favorites: FavoriteSet = ["D-1", "B-1"].into_iter().collect();

        let result = match_classrooms("1", &directory, &favorites);
        assert_eq!(ids(&result), vec!["B-1", "D-1", "A-1", "C-1"]);
    }
}
