//! Property-based tests for the label grammar.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::label::{DoubleLabel, RoleLabel, SingleLabel, TripleLabel};

    /// Strategy generating valid single-label segments.
    fn segment_strategy() -> impl Strategy<Value = String> {
        "[a-z_0-9]{1,16}"
    }

    proptest! {
        #[test]
        fn test_single_parses_iff_it_matches_the_grammar(s in "\\PC{0,20}") {
            let matches = !s.is_empty()
                && s.len() <= 128
                && s.bytes().all(|b| matches!(b, b'a'..=b'z' | b'0'..=b'9' | b'_'));
            prop_assert_eq!(SingleLabel::new(s.as_str()).is_ok(), matches, "input: {:?}", s);
        }

        #[test]
        fn test_valid_single_round_trips(s in segment_strategy()) {
            let label = SingleLabel::new(s.as_str()).unwrap();
            prop_assert_eq!(label.as_str(), s.as_str());
            prop_assert_eq!(label.to_string(), s);
        }

        #[test]
        fn test_valid_double_round_trips(a in segment_strategy(), b in segment_strategy()) {
            let input = format!("{a}.{b}");
            let label = DoubleLabel::new(input.as_str()).unwrap();
            prop_assert_eq!(label.group(), a.as_str());
            prop_assert_eq!(label.resource(), b.as_str());
            prop_assert_eq!(label.to_string(), input);
        }

        #[test]
        fn test_valid_triple_round_trips(
            a in segment_strategy(),
            b in segment_strategy(),
            c in segment_strategy(),
        ) {
            let input = format!("{a}.{b}.{c}");
            let label = TripleLabel::new(input.as_str()).unwrap();
            prop_assert_eq!(label.organization(), a.as_str());
            prop_assert_eq!(label.group(), b.as_str());
            prop_assert_eq!(label.resource(), c.as_str());
            let double = label.to_double();
            let expected_double = format!("{b}.{c}");
            prop_assert_eq!(double.as_str(), expected_double.as_str());
        }

        #[test]
        fn test_single_never_parses_as_double_or_triple(s in segment_strategy()) {
            prop_assert!(DoubleLabel::new(s.as_str()).is_err());
            prop_assert!(TripleLabel::new(s.as_str()).is_err());
        }

        #[test]
        fn test_double_never_parses_as_single_or_triple(a in segment_strategy(), b in segment_strategy()) {
            let input = format!("{a}.{b}");
            prop_assert!(SingleLabel::new(input.as_str()).is_err());
            prop_assert!(TripleLabel::new(input.as_str()).is_err());
        }

        #[test]
        fn test_role_label_splits_where_triple_rejects(a in segment_strategy(), b in segment_strategy()) {
            let input = format!("{a}.{b}");
            let role = RoleLabel::new(input.as_str()).unwrap();
            prop_assert_eq!(role.organization(), a.as_str());
            prop_assert_eq!(role.role(), b.as_str());
            prop_assert!(TripleLabel::new(input.as_str()).is_err());
        }

        #[test]
        fn test_uppercase_anywhere_is_rejected(
            a in segment_strategy(),
            b in segment_strategy(),
            upper in "[A-Z]{1,4}",
        ) {
            let input = format!("{a}{upper}.{b}");
            prop_assert!(DoubleLabel::new(input.as_str()).is_err());
        }
    }
}
