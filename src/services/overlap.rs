use chrono::{DateTime, Utc};

/// Shape of the conflict between a candidate interval and an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapKind {
    /// Candidate starts inside the existing interval
    Start,
    /// Candidate ends inside the existing interval
    End,
    /// Candidate fully contains the existing interval
    Full,
}

/// Classifies a candidate `[cs, ce)` against an existing `[es, ee)`.
///
/// The three checks run in a fixed order and the first match wins, so a
/// given pair of intervals always reports a single deterministic shape.
/// Half-open semantics: touching endpoints (back-to-back showtimes) are
/// not a conflict. `None` means no conflict.
pub fn classify(
    cs: DateTime<Utc>,
    ce: DateTime<Utc>,
    es: DateTime<Utc>,
    ee: DateTime<Utc>,
) -> Option<OverlapKind> {
    if cs >= es && cs < ee {
        Some(OverlapKind::Start)
    } else if ce > es && ce <= ee {
        Some(OverlapKind::End)
    } else if cs <= es && ce >= ee {
        Some(OverlapKind::Full)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ts(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn disjoint_intervals_do_not_conflict() {
        assert_eq!(classify(ts(0), ts(100), ts(200), ts(300)), None);
        assert_eq!(classify(ts(400), ts(500), ts(200), ts(300)), None);
    }

    #[test]
    fn back_to_back_showtimes_do_not_conflict() {
        // Candidate ends exactly when the existing one begins, and the
        // other way around: half-open intervals, no conflict.
        assert_eq!(classify(ts(0), ts(100), ts(100), ts(200)), None);
        assert_eq!(classify(ts(200), ts(300), ts(100), ts(200)), None);
    }

    #[test]
    fn candidate_starting_inside_reports_start() {
        assert_eq!(
            classify(ts(150), ts(400), ts(100), ts(200)),
            Some(OverlapKind::Start)
        );
        // Starting exactly at the existing start counts as Start
        assert_eq!(
            classify(ts(100), ts(400), ts(100), ts(200)),
            Some(OverlapKind::Start)
        );
    }

    #[test]
    fn candidate_ending_inside_reports_end() {
        assert_eq!(
            classify(ts(0), ts(150), ts(100), ts(200)),
            Some(OverlapKind::End)
        );
        // Ending exactly at the existing end counts as End
        assert_eq!(
            classify(ts(0), ts(200), ts(100), ts(200)),
            Some(OverlapKind::End)
        );
    }

    #[test]
    fn candidate_containing_existing_reports_full() {
        assert_eq!(
            classify(ts(0), ts(300), ts(100), ts(200)),
            Some(OverlapKind::Full)
        );
    }

    #[test]
    fn identical_intervals_report_start_first() {
        // Satisfies all three checks; the fixed order picks Start.
        assert_eq!(
            classify(ts(100), ts(200), ts(100), ts(200)),
            Some(OverlapKind::Start)
        );
    }

    proptest! {
        // The decomposed classification must agree with the plain
        // interval-intersection test.
        #[test]
        fn classification_matches_intersection(
            cs in 0i64..1000,
            len_c in 1i64..1000,
            es in 0i64..1000,
            len_e in 1i64..1000,
        ) {
            let (ce, ee) = (cs + len_c, es + len_e);
            let intersects = cs < ee && ce > es;
            prop_assert_eq!(
                classify(ts(cs), ts(ce), ts(es), ts(ee)).is_some(),
                intersects
            );
        }
    }
}
