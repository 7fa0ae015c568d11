//! Search and sort helpers for list pages.
//!
//! Filtering runs over lists already fetched from the backend. Search is
//! case-insensitive and ignores Vietnamese tone marks, so `ao thun` finds
//! `Áo thun` and `dong ho` finds `Đồng hồ`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Sort direction from a `?dir=` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// The opposite direction, for clickable column headers.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Apply the direction to an ascending comparison.
    #[must_use]
    pub const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = std::convert::Infallible;

    /// Anything other than `desc` sorts ascending.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s.eq_ignore_ascii_case("desc") {
            Self::Desc
        } else {
            Self::Asc
        })
    }
}

/// Lowercase and strip Vietnamese diacritics, precomposed or combining.
#[must_use]
pub fn fold(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .filter(|c| !is_combining_mark(*c))
        .map(base_char)
        .collect()
}

/// Combining Diacritical Marks block.
const fn is_combining_mark(c: char) -> bool {
    matches!(c, '\u{0300}'..='\u{036F}')
}

fn base_char(c: char) -> char {
    match c {
        'à' | 'á' | 'ả' | 'ã' | 'ạ' | 'ă' | 'ằ' | 'ắ' | 'ẳ' | 'ẵ' | 'ặ' | 'â' | 'ầ' | 'ấ' | 'ẩ'
        | 'ẫ' | 'ậ' => 'a',
        'è' | 'é' | 'ẻ' | 'ẽ' | 'ẹ' | 'ê' | 'ề' | 'ế' | 'ể' | 'ễ' | 'ệ' => 'e',
        'ì' | 'í' | 'ỉ' | 'ĩ' | 'ị' => 'i',
        'ò' | 'ó' | 'ỏ' | 'õ' | 'ọ' | 'ô' | 'ồ' | 'ố' | 'ổ' | 'ỗ' | 'ộ' | 'ơ' | 'ờ' | 'ớ' | 'ở'
        | 'ỡ' | 'ợ' => 'o',
        'ù' | 'ú' | 'ủ' | 'ũ' | 'ụ' | 'ư' | 'ừ' | 'ứ' | 'ử' | 'ữ' | 'ự' => 'u',
        'ỳ' | 'ý' | 'ỷ' | 'ỹ' | 'ỵ' => 'y',
        'đ' => 'd',
        other => other,
    }
}

/// Whether any of `fields` contains `query` after folding.
///
/// A blank query matches everything.
#[must_use]
pub fn matches_query<'a>(query: &str, fields: impl IntoIterator<Item = &'a str>) -> bool {
    let needle = fold(query.trim());
    if needle.is_empty() {
        return true;
    }
    fields.into_iter().any(|field| fold(field).contains(&needle))
}

/// Keep items whose fields match `query`.
pub fn filter_by_query<T, F>(items: &mut Vec<T>, query: &str, fields: F)
where
    F: Fn(&T) -> Vec<&str>,
{
    if query.trim().is_empty() {
        return;
    }
    items.retain(|item| matches_query(query, fields(item)));
}

/// Stable sort by `key` in `direction`.
pub fn sort_by_key<T, K, F>(items: &mut [T], direction: SortDirection, mut key: F)
where
    K: Ord,
    F: FnMut(&T) -> K,
{
    items.sort_by(|a, b| direction.apply(key(a).cmp(&key(b))));
}

/// Normalize an optional query parameter: trimmed, `None` when blank.
#[must_use]
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_strips_tone_marks() {
        assert_eq!(fold("Đồng Hồ Nữ"), "dong ho nu");
        assert_eq!(fold("ÁO THUN"), "ao thun");
        assert_eq!(fold("Giày thể thao"), "giay the thao");
    }

    #[test]
    fn test_fold_strips_combining_marks() {
        // "Áo" and "Đồng hồ" typed with combining accents.
        assert_eq!(fold("A\u{0301}o"), "ao");
        assert_eq!(fold("Đo\u{0302}\u{0300}ng ho\u{0302}\u{0300}"), "dong ho");
        assert!(matches_query("ao", ["A\u{0301}o khoa\u{0301}c"]));
    }

    #[test]
    fn test_matches_query_any_field() {
        assert!(matches_query("ao thun", ["Áo thun cổ tròn", "Zeal"]));
        assert!(matches_query("ZEAL", ["Áo thun", "zeal basics"]));
        assert!(!matches_query("quan", ["Áo thun"]));
        assert!(matches_query("   ", ["anything"]));
    }

    #[test]
    fn test_filter_and_sort() {
        let mut names = vec!["Mũ lưỡi trai", "Áo khoác", "Áo thun", "Quần jean"];
        filter_by_query(&mut names, "áo", |n| vec![*n]);
        assert_eq!(names, vec!["Áo khoác", "Áo thun"]);

        let mut prices = vec![300, 100, 200];
        sort_by_key(&mut prices, SortDirection::Desc, |p| *p);
        assert_eq!(prices, vec![300, 200, 100]);
        sort_by_key(&mut prices, "asc".parse().unwrap_or_default(), |p| *p);
        assert_eq!(prices, vec![100, 200, 300]);
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!("DESC".parse::<SortDirection>(), Ok(SortDirection::Desc));
        assert_eq!("bogus".parse::<SortDirection>(), Ok(SortDirection::Asc));
        assert_eq!(SortDirection::Asc.toggled(), SortDirection::Desc);
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  áo ")), Some("áo"));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }
}
