//! Role segmentation of a normalized transcript
//!
//! A transcript like `gunner aim loader ap load driver forward` is cut at each
//! role marker; the text between one marker and the next belongs to the first
//! marker's role.

use crate::lexicon::Lexicon;
use crate::matcher::KeywordMatcher;
use crate::types::CrewRole;
use std::collections::BTreeMap;

/// A role keyword found in the text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleMark {
    pub start: usize,
    pub len: usize,
    pub role: CrewRole,
}

/// Slice of the transcript addressed to one role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub role: CrewRole,
    pub text: &'a str,
}

/// Find all role marks, keeping the longest keyword where several start at the
/// same offset. Returned sorted by offset.
pub fn find_role_marks(text: &str, lexicon: &Lexicon, matcher: &KeywordMatcher) -> Vec<RoleMark> {
    let mut by_offset: BTreeMap<usize, RoleMark> = BTreeMap::new();

    let roles = [
        (CrewRole::Driver, &lexicon.roles.driver),
        (CrewRole::Gunner, &lexicon.roles.gunner),
        (CrewRole::Loader, &lexicon.roles.loader),
    ];

    for (role, keys) in roles {
        for key in keys {
            for start in matcher.occurrences(text, key) {
                let mark = RoleMark {
                    start,
                    len: key.len(),
                    role,
                };
                by_offset
                    .entry(start)
                    .and_modify(|kept| {
                        if mark.len > kept.len {
                            *kept = mark;
                        }
                    })
                    .or_insert(mark);
            }
        }
    }

    by_offset.into_values().collect()
}

/// Guess the addressee of an utterance that names no role.
pub fn infer_role(text: &str, lexicon: &Lexicon, matcher: &KeywordMatcher) -> CrewRole {
    let d = &lexicon.driver;
    if matcher.contains_any(text, &d.stop)
        || matcher.contains_any(text, &d.forward)
        || matcher.contains_any(text, &d.backward)
    {
        return CrewRole::Driver;
    }

    let l = &lexicon.loader;
    if matcher.contains_any(text, &l.ap)
        || matcher.contains_any(text, &l.he)
        || matcher.contains_any(text, &l.load)
    {
        return CrewRole::Loader;
    }

    let g = &lexicon.gunner;
    if matcher.contains_any(text, &g.fire)
        || matcher.contains_any(text, &g.aim)
        || matcher.contains_any(text, &g.align)
        || matcher.contains_any(text, &g.range)
    {
        return CrewRole::Gunner;
    }

    CrewRole::Driver
}

/// Cut normalized text into role segments. Empty segments are dropped.
pub fn segment<'a>(text: &'a str, lexicon: &Lexicon, matcher: &KeywordMatcher) -> Vec<Segment<'a>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let marks = find_role_marks(text, lexicon, matcher);
    if marks.is_empty() {
        let role = infer_role(trimmed, lexicon, matcher);
        tracing::debug!(%role, "no role marker, inferred addressee");
        return vec![Segment { role, text: trimmed }];
    }

    let mut segments = Vec::with_capacity(marks.len());
    for (i, mark) in marks.iter().enumerate() {
        let seg_start = mark.start + mark.len;
        let seg_end = marks.get(i + 1).map_or(text.len(), |next| next.start);
        // marks overlapping at different offsets leave nothing between them
        if seg_start >= seg_end {
            continue;
        }
        let seg = text[seg_start..seg_end].trim();
        if seg.is_empty() {
            continue;
        }
        segments.push(Segment {
            role: mark.role,
            text: seg,
        });
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::MatchMode;
    use proptest::prelude::*;

    fn english() -> (Lexicon, KeywordMatcher) {
        let lexicon = Lexicon::english();
        let matcher = KeywordMatcher::new(lexicon.match_mode);
        (lexicon, matcher)
    }

    #[test]
    fn test_three_roles_in_order() {
        let (lexicon, matcher) = english();
        let segs = segment("gunner aim loader ap ammo load driver forward", &lexicon, &matcher);
        assert_eq!(
            segs,
            vec![
                Segment { role: CrewRole::Gunner, text: "aim" },
                Segment { role: CrewRole::Loader, text: "ap ammo load" },
                Segment { role: CrewRole::Driver, text: "forward" },
            ]
        );
    }

    #[test]
    fn test_longest_keyword_wins_at_same_offset() {
        let (mut lexicon, _) = english();
        lexicon.roles.driver.push("loader-chief".to_string());
        let matcher = KeywordMatcher::new(lexicon.match_mode);

        let marks = find_role_marks("loader-chief forward", &lexicon, &matcher);
        assert_eq!(marks.len(), 1);
        assert_eq!(marks[0].role, CrewRole::Driver);
        assert_eq!(marks[0].len, "loader-chief".len());

        let segs = segment("loader-chief forward", &lexicon, &matcher);
        assert_eq!(segs, vec![Segment { role: CrewRole::Driver, text: "forward" }]);
    }

    #[test]
    fn test_repeated_marker_opens_new_segment() {
        let (lexicon, matcher) = english();
        let segs = segment("gunner aim gunner fire", &lexicon, &matcher);
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].text, "aim");
        assert_eq!(segs[1].text, "fire");
    }

    #[test]
    fn test_empty_segments_dropped() {
        let (lexicon, matcher) = english();
        let segs = segment("driver gunner fire", &lexicon, &matcher);
        assert_eq!(segs, vec![Segment { role: CrewRole::Gunner, text: "fire" }]);
    }

    #[test]
    fn test_text_before_first_marker_is_ignored() {
        let (lexicon, matcher) = english();
        let segs = segment("hey you gunner fire", &lexicon, &matcher);
        assert_eq!(segs, vec![Segment { role: CrewRole::Gunner, text: "fire" }]);
    }

    #[test]
    fn test_overlapping_marks_do_not_panic() {
        let mut lexicon = Lexicon::english();
        lexicon.match_mode = MatchMode::Substring;
        lexicon.roles.gunner = vec!["abc".to_string()];
        lexicon.roles.loader = vec!["bcd".to_string()];
        let matcher = KeywordMatcher::new(lexicon.match_mode);
        let segs = segment("abcd fire", &lexicon, &matcher);
        assert_eq!(segs, vec![Segment { role: CrewRole::Loader, text: "fire" }]);
    }

    #[test]
    fn test_inference_priority() {
        let (lexicon, matcher) = english();
        assert_eq!(infer_role("forward and fire", &lexicon, &matcher), CrewRole::Driver);
        assert_eq!(infer_role("load he then fire", &lexicon, &matcher), CrewRole::Loader);
        assert_eq!(infer_role("fire", &lexicon, &matcher), CrewRole::Gunner);
        assert_eq!(infer_role("range 800", &lexicon, &matcher), CrewRole::Gunner);
        assert_eq!(infer_role("hello there", &lexicon, &matcher), CrewRole::Driver);
    }

    #[test]
    fn test_unmarked_text_is_single_segment() {
        let (lexicon, matcher) = english();
        let segs = segment("fire", &lexicon, &matcher);
        assert_eq!(segs, vec![Segment { role: CrewRole::Gunner, text: "fire" }]);
        assert!(segment("", &lexicon, &matcher).is_empty());
    }

    #[test]
    fn test_korean_markers() {
        let lexicon = Lexicon::korean();
        let matcher = KeywordMatcher::new(lexicon.match_mode);
        let segs = segment("포수 발사 장전수 철갑탄", &lexicon, &matcher);
        assert_eq!(
            segs,
            vec![
                Segment { role: CrewRole::Gunner, text: "발사" },
                Segment { role: CrewRole::Loader, text: "철갑탄" },
            ]
        );
    }

    fn role_word() -> impl Strategy<Value = (&'static str, CrewRole)> {
        prop_oneof![
            Just(("driver", CrewRole::Driver)),
            Just(("gunner", CrewRole::Gunner)),
            Just(("loader", CrewRole::Loader)),
        ]
    }

    proptest! {
        #[test]
        fn prop_segments_follow_marks(parts in prop::collection::vec((role_word(), "[xyz]{1,6}( [xyz]{1,6}){0,2}"), 1..6)) {
            let (lexicon, matcher) = english();
            let text = parts
                .iter()
                .map(|((kw, _), body)| format!("{kw} {body}"))
                .collect::<Vec<_>>()
                .join(" ");

            let segs = segment(&text, &lexicon, &matcher);
            prop_assert_eq!(segs.len(), parts.len());
            for (seg, ((_, role), body)) in segs.iter().zip(parts.iter()) {
                prop_assert_eq!(seg.role, *role);
                prop_assert_eq!(seg.text, body.as_str());
            }
        }
    }
}
