use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::models::Detection;

#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Display, AsRefStr, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SortKey {
    Class,
    Confidence,
    Box,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Active column and direction of the results table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortState {
    /// Header click: the active column flips direction, another column starts ascending.
    pub fn toggle(current: Option<SortState>, key: SortKey) -> SortState {
        match current {
            Some(state) if state.key == key => SortState { key, direction: state.direction.flipped() },
            _ => SortState { key, direction: SortDirection::Asc },
        }
    }

    pub fn apply(&self, detections: &[Detection]) -> Vec<Detection> {
        sort_detections(detections, self.key, self.direction)
    }
}

/// Leading integer of a percentage string, `"87%"` and `"87.5%"` both give 87.
pub fn confidence_value(confidence: &str) -> Option<i64> {
    let trimmed = confidence.replace('%', "");
    let trimmed = trimmed.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|v| sign * v)
}

fn compare(a: &Detection, b: &Detection, key: SortKey) -> Ordering {
    match key {
        // None sorts before every parsed value
        SortKey::Confidence => confidence_value(&a.confidence).cmp(&confidence_value(&b.confidence)),
        SortKey::Class => locale_cmp(&a.class, &b.class),
        SortKey::Box => locale_cmp(&a.box_label(), &b.box_label()),
    }
}

/// Browser-style collation: letters compare case-insensitively first, and only
/// strings equal ignoring case are told apart, lowercase first.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| {
            a.chars()
                .zip(b.chars())
                .map(|(x, y)| case_rank(x).cmp(&case_rank(y)))
                .find(|ord| ord.is_ne())
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| a.cmp(b))
}

fn case_rank(c: char) -> u8 {
    if c.is_uppercase() { 1 } else { 0 }
}

/// Stable ordering of `detections`; equal elements keep their input order in
/// both directions.
pub fn sort_detections(detections: &[Detection], key: SortKey, direction: SortDirection) -> Vec<Detection> {
    let mut sorted = detections.to_vec();
    match direction {
        SortDirection::Asc => sorted.sort_by(|a, b| compare(a, b, key)),
        SortDirection::Desc => sorted.sort_by(|a, b| compare(b, a, key)),
    }
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn det(class: &str, confidence: &str) -> Detection {
        Detection { class: class.into(), confidence: confidence.into(), bbox: vec![] }
    }

    fn classes(list: &[Detection]) -> Vec<&str> {
        list.iter().map(|d| d.class.as_str()).collect()
    }

    #[test]
    fn confidence_sort_toggles() {
        let list = vec![det("dog", "75%"), det("cat", "90%")];

        let state = SortState::toggle(None, SortKey::Confidence);
        assert_eq!(state.direction, SortDirection::Asc);
        assert_eq!(classes(&state.apply(&list)), ["dog", "cat"]);

        let state = SortState::toggle(Some(state), SortKey::Confidence);
        assert_eq!(state.direction, SortDirection::Desc);
        assert_eq!(classes(&state.apply(&list)), ["cat", "dog"]);
    }

    #[test]
    fn switching_key_resets_to_ascending() {
        let desc = SortState { key: SortKey::Confidence, direction: SortDirection::Desc };
        let next = SortState::toggle(Some(desc), SortKey::Class);
        assert_eq!(next, SortState { key: SortKey::Class, direction: SortDirection::Asc });
    }

    #[test]
    fn confidence_compares_numerically() {
        let list = vec![det("a", "9%"), det("b", "100%"), det("c", "10%")];
        let sorted = sort_detections(&list, SortKey::Confidence, SortDirection::Asc);
        assert_eq!(classes(&sorted), ["a", "c", "b"]);
    }

    #[test]
    fn ties_keep_input_order_both_ways() {
        let list = vec![det("first", "50%"), det("top", "80%"), det("second", "50%")];
        let asc = sort_detections(&list, SortKey::Confidence, SortDirection::Asc);
        assert_eq!(classes(&asc), ["first", "second", "top"]);
        let desc = sort_detections(&asc, SortKey::Confidence, SortDirection::Desc);
        assert_eq!(classes(&desc), ["top", "first", "second"]);
    }

    #[test]
    fn sorting_is_idempotent() {
        let list = vec![det("zebra", "10%"), det("Ant", "60%"), det("bee", "60%")];
        for key in [SortKey::Class, SortKey::Confidence, SortKey::Box] {
            let once = sort_detections(&list, key, SortDirection::Asc);
            let twice = sort_detections(&once, key, SortDirection::Asc);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn class_order_ignores_case_before_breaking_ties() {
        let list = vec![det("bee", "1%"), det("Ant", "1%"), det("ant", "1%")];
        let sorted = sort_detections(&list, SortKey::Class, SortDirection::Asc);
        assert_eq!(classes(&sorted), ["ant", "Ant", "bee"]);
    }

    #[test]
    fn capitalized_label_does_not_jump_ahead() {
        let list = vec![det("Zebra", "1%"), det("apple", "1%")];
        let asc = sort_detections(&list, SortKey::Class, SortDirection::Asc);
        assert_eq!(classes(&asc), ["apple", "Zebra"]);
        let desc = sort_detections(&list, SortKey::Class, SortDirection::Desc);
        assert_eq!(classes(&desc), ["Zebra", "apple"]);
    }

    #[test]
    fn locale_cmp_orders_like_a_browser() {
        assert_eq!(locale_cmp("apple", "Zebra"), Ordering::Less);
        assert_eq!(locale_cmp("a", "A"), Ordering::Less);
        assert_eq!(locale_cmp("Cat", "cat"), Ordering::Greater);
        assert_eq!(locale_cmp("dog", "dog"), Ordering::Equal);
    }

    #[test]
    fn box_sorts_by_joined_coordinates() {
        let mut a = det("a", "1%");
        a.bbox = vec![20.0, 5.0];
        let mut b = det("b", "1%");
        b.bbox = vec![100.0, 5.0];
        let sorted = sort_detections(&[a, b], SortKey::Box, SortDirection::Asc);
        assert_eq!(classes(&sorted), ["b", "a"]);
    }

    #[test]
    fn unparseable_confidence_sorts_first() {
        let list = vec![det("ok", "5%"), det("bad", "n/a")];
        let sorted = sort_detections(&list, SortKey::Confidence, SortDirection::Asc);
        assert_eq!(classes(&sorted), ["bad", "ok"]);
    }

    #[test]
    fn confidence_parsing() {
        assert_eq!(confidence_value("87%"), Some(87));
        assert_eq!(confidence_value("87.5%"), Some(87));
        assert_eq!(confidence_value(" 3%"), Some(3));
        assert_eq!(confidence_value("%"), None);
    }

    #[test]
    fn sort_key_parses_column_names() {
        assert_eq!(SortKey::from_str("confidence").unwrap(), SortKey::Confidence);
        assert_eq!(SortKey::Box.as_ref(), "box");
    }

    #[test]
    fn sorting_leaves_input_untouched() {
        let list = vec![det("b", "2%"), det("a", "1%")];
        let _ = sort_detections(&list, SortKey::Class, SortDirection::Asc);
        assert_eq!(classes(&list), ["b", "a"]);
    }
}
