use proptest::prelude::*;

use csvcmp_map::score::{build_recommendations, normalize_header};
use csvcmp_model::MappingSummary;

fn arb_columns() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[A-Za-z0-9 _-]{0,12}", 0..8)
}

proptest! {
    #[test]
    fn normalize_is_idempotent_and_alphanumeric(name in ".{0,24}") {
        let once = normalize_header(&name);
        prop_assert_eq!(&once, &normalize_header(&once));
        prop_assert!(once.chars().all(|ch| ch.is_ascii_alphanumeric()));
    }

    #[test]
    fn scores_stay_in_percent_range_and_sorted(
        left_cols in arb_columns(),
        right_cols in arb_columns(),
        declared in prop::collection::vec(arb_columns(), 0..5),
    ) {
        let summaries: Vec<MappingSummary> = declared
            .into_iter()
            .enumerate()
            .map(|(idx, columns)| MappingSummary {
                name: format!("mapping-{idx}"),
                field_count: columns.len(),
                left_columns: columns,
                ..MappingSummary::default()
            })
            .collect();
        let recs = build_recommendations(&summaries, &left_cols, &right_cols);
        for pair in recs.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
        for rec in &recs {
            prop_assert!(rec.score >= 1 && rec.score <= 100);
        }
    }
}
