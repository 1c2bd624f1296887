//! Property-based tests for the Auditor

use arztbrief_auditor::Auditor;
use arztbrief_domain::{Dataset, Field, PatientRecord, RecordBuilder};
use proptest::prelude::*;

fn arb_record() -> impl Strategy<Value = PatientRecord> {
    (
        "[a-z]{1,8}\\.txt",
        proptest::option::of("[A-Z][a-z]{2,6} [A-Z][a-z]{2,6}"),
        proptest::option::of(prop_oneof![Just(""), Just("nan"), Just("1"), Just("2-3")]),
        proptest::option::of(prop_oneof![Just("female"), Just("male"), Just("unknown")]),
    )
        .prop_map(|(source, name, ecog, gender)| {
            let mut builder = RecordBuilder::new();
            if let Some(name) = name {
                builder.set(Field::Name, name);
            }
            if let Some(ecog) = ecog {
                builder.set(Field::Ecog, ecog);
            }
            if let Some(gender) = gender {
                builder.set(Field::Gender, gender);
            }
            builder.build(source)
        })
}

proptest! {
    /// Property: Adding a record without a name raises the name gap by one
    /// and puts its source in the gap's source set
    #[test]
    fn prop_adding_missing_record_is_monotonic(
        records in prop::collection::vec(arb_record(), 0..12),
        source in "[A-Z]{1,8}\\.txt",
    ) {
        let auditor = Auditor::default_config();
        let mut dataset: Dataset = records.into();
        let before = auditor.audit(&dataset);

        dataset.push(RecordBuilder::new().with(Field::Ecog, "1").build(source.clone()));
        let after = auditor.audit(&dataset);

        let gap_before = before.gap("name").unwrap();
        let gap_after = after.gap("name").unwrap();
        prop_assert_eq!(gap_after.missing, gap_before.missing + 1);
        prop_assert!(gap_after.sources.contains(&source));
        prop_assert_eq!(after.gap("ecog").unwrap().missing, before.gap("ecog").unwrap().missing);
    }

    /// Property: Removing the record added above restores the report exactly
    #[test]
    fn prop_removing_record_reverses_change(
        records in prop::collection::vec(arb_record(), 0..12),
        source in "[A-Z]{1,8}\\.txt",
    ) {
        let auditor = Auditor::default_config();
        let mut dataset: Dataset = records.into();
        let before = auditor.audit(&dataset);

        dataset.push(RecordBuilder::new().build(source));
        let last = dataset.len() - 1;
        dataset.remove(last);

        prop_assert_eq!(auditor.audit(&dataset), before);
    }

    /// Property: Missing counts never exceed the record count and
    /// percentages stay within 0-100
    #[test]
    fn prop_gap_bounds(records in prop::collection::vec(arb_record(), 0..20)) {
        let dataset: Dataset = records.into();
        let report = Auditor::default_config().audit(&dataset);

        for gap in &report.gaps {
            prop_assert!(gap.missing <= report.total_records);
            prop_assert!(gap.sources.len() <= gap.missing);
            prop_assert!((0.0..=100.0).contains(&gap.percentage));
        }
    }
}
