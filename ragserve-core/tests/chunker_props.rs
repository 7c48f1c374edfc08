//! Property tests for sliding-window chunk arithmetic.

use proptest::prelude::*;
use ragserve_core::chunk;

/// Window parameters with `overlap < size`.
fn arb_params() -> impl Strategy<Value = (usize, usize)> {
    (2usize..600).prop_flat_map(|size| (Just(size), 0..size))
}

/// *For any* text and valid `(size, overlap)`, the chunk count follows the
/// sliding-window formula, consecutive chunks overlap by exactly `overlap`
/// characters, and the spans cover `[0, L)` with no gaps.
mod prop_chunk_arithmetic {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn count_matches_formula(
            text in "[a-zA-Z0-9 .,]{0,1500}",
            (size, overlap) in arb_params(),
        ) {
            let spans = chunk(&text, size, overlap).unwrap();
            let len = text.chars().count();
            let expected = if len == 0 {
                0
            } else if len <= overlap {
                1
            } else {
                (len - overlap).div_ceil(size - overlap)
            };
            prop_assert_eq!(spans.len(), expected);
        }

        #[test]
        fn spans_overlap_exactly_and_cover_range(
            text in "[a-zA-Z0-9 .,]{1,1500}",
            (size, overlap) in arb_params(),
        ) {
            let spans = chunk(&text, size, overlap).unwrap();
            let len = text.chars().count();

            prop_assert_eq!(spans.first().unwrap().start, 0);
            prop_assert_eq!(spans.last().unwrap().end, len);

            for window in spans.windows(2) {
                // Every non-final window is full-size, so the step between
                // starts implies exactly `overlap` shared characters.
                prop_assert_eq!(window[0].end - window[0].start, size);
                prop_assert_eq!(window[0].end - window[1].start, overlap);
            }

            for span in &spans {
                prop_assert_eq!(span.text.chars().count(), span.end - span.start);
            }
        }

        #[test]
        fn chunking_is_pure(
            text in "[a-z ]{0,800}",
            (size, overlap) in arb_params(),
        ) {
            let first = chunk(&text, size, overlap).unwrap();
            let second = chunk(&text, size, overlap).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
