//! Property-based tests for the aggregation engine.

use bigdecimal::{BigDecimal, Zero};
use proptest::prelude::*;

use crate::domain::{aggregate, test_gens, test_prelude, ExpenseStatus};

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: status counts partition the input
    #[test]
    fn prop_counts_partition_input(records in test_gens::records()) {
        let report = aggregate(&records);
        prop_assert_eq!(report.stats.record_count(), records.len());
        for status in ExpenseStatus::ALL {
            let expected = records.iter().filter(|r| r.status == status).count();
            prop_assert_eq!(report.stats.count_for(status), expected);
        }
    }

    /// Property: breakdown amounts sum to the total, one entry per distinct label
    #[test]
    fn prop_breakdown_sums_to_total(records in test_gens::records()) {
        let report = aggregate(&records);
        let mut sum = BigDecimal::zero();
        for entry in report.breakdown.entries() {
            sum += &entry.amount;
        }
        prop_assert_eq!(&sum, &report.stats.total_amount);

        let mut labels: Vec<&str> = records.iter().map(|r| r.category.as_str()).collect();
        labels.sort_unstable();
        labels.dedup();
        prop_assert_eq!(report.breakdown.len(), labels.len());
    }

    /// Property: aggregation is idempotent and totals ignore input order
    #[test]
    fn prop_totals_are_order_independent(
        (records, shuffled) in test_gens::records()
            .prop_flat_map(|records| (Just(records.clone()), Just(records).prop_shuffle()))
    ) {
        let first = aggregate(&records);
        let again = aggregate(&records);
        prop_assert_eq!(&first, &again);

        let reordered = aggregate(&shuffled);
        prop_assert_eq!(&first.stats, &reordered.stats);
        prop_assert_eq!(first.breakdown.len(), reordered.breakdown.len());
        for entry in first.breakdown.entries() {
            prop_assert_eq!(reordered.breakdown.get(&entry.category), Some(&entry.amount));
        }
    }
}
