//! Expectation behavior on realistic roster columns.

use memsynth_model::{ParameterKind, ParameterSpec};
use memsynth_validate::{Expectation, Failure, FormationError};
use polars::prelude::*;
use proptest::prelude::*;

const ADDRESSES: [&str; 6] = [
    "6123 NOBLE AVE",
    "444 S BUM AVE APT D",
    "4932 Data Dr",
    "4444 Fake Way, Apt.4",
    "87 Nope Ln #32",
    "P.O. Box 7621",
];

fn address_params(mode: &str) -> Vec<ParameterSpec> {
    vec![
        ParameterSpec::new("data_type", "string"),
        ParameterSpec::new("regex", "[0-9]+ [A-Za-z ]+")
            .with_match(mode)
            .soft(),
        ParameterSpec::new("nullable", false),
    ]
}

fn column(values: &[Option<&str>]) -> Column {
    Series::new("Address".into(), values).into()
}

#[test]
fn soft_full_match_over_addresses() {
    let mut exp = Expectation::new("Address", &address_params("full"), true).unwrap();
    let values: Vec<Option<&str>> = ADDRESSES.iter().copied().map(Some).collect();

    assert!(exp.check(&column(&values)));
    assert_eq!(exp.fails().count(), 0);
    let soft: Vec<usize> = exp.soft_fails().map(|f| f.line).collect();
    assert_eq!(soft, vec![3, 4, 5]);
}

#[test]
fn soft_partial_match_only_rejects_po_box() {
    let mut exp = Expectation::new("Address", &address_params("partial"), true).unwrap();
    let values: Vec<Option<&str>> = ADDRESSES.iter().copied().map(Some).collect();

    assert!(exp.check(&column(&values)));
    let soft: Vec<Option<&str>> = exp.soft_fails().map(|f| f.data.as_deref()).collect();
    assert_eq!(soft, vec![Some("P.O. Box 7621")]);
}

#[test]
fn nulls_add_hard_failures_next_to_soft_ones() {
    let mut exp = Expectation::new("Address", &address_params("full"), true).unwrap();
    let mut values: Vec<Option<&str>> = ADDRESSES.iter().copied().map(Some).collect();
    values.push(None);
    values.push(None);

    assert!(!exp.check(&column(&values)));
    assert_eq!(exp.soft_fails().count(), 3);
    let hard: Vec<&Failure> = exp.fails().collect();
    assert_eq!(hard.len(), 2);
    assert!(hard.iter().all(|f| f.data.is_none()));
    assert!(
        hard.iter()
            .all(|f| f.parameters[0].kind() == ParameterKind::Nullable)
    );
}

#[test]
fn us_states_column() {
    let params = vec![
        ParameterSpec::new("data_type", "string"),
        ParameterSpec::new("regex", "").with_match("us_states"),
    ];
    let mut exp = Expectation::new("State", &params, true).unwrap();
    let col = column(&[Some("FL"), Some("ny"), Some("Florida"), None, Some("GU")]);
    assert!(!exp.check(&col));
    let lines: Vec<usize> = exp.fails().map(|f| f.line).collect();
    assert_eq!(lines, vec![2]);
}

#[test]
fn relative_to_and_data_type_never_fail_cells() {
    let params = vec![
        ParameterSpec::new("data_type", "integer"),
        ParameterSpec::new("relative_to", "AK_ID"),
    ];
    let mut exp = Expectation::new("Spouse_ID", &params, true).unwrap();
    assert!(exp.check(&column(&[Some("abc"), None])));
    assert!(exp.failures().is_empty());
    assert_eq!(exp.relative_to().len(), 1);
}

#[test]
fn bad_parameter_name() {
    let params = vec![
        ParameterSpec::new("data_type", "string"),
        ParameterSpec::new("bad_param", "not_good"),
    ];
    let err = Expectation::new("AK_ID", &params, true).unwrap_err();
    assert!(matches!(err, FormationError::UnknownParameter { .. }));
}

fn cell() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        1 => Just(None),
        4 => "[0-9A-Za-z ]{0,8}".prop_map(Some),
    ]
}

proptest! {
    #[test]
    fn fails_and_soft_fails_partition_failures(
        cells in prop::collection::vec(cell(), 0..40),
        soft_regex in any::<bool>(),
        soft_nullable in any::<bool>(),
    ) {
        let mut regex = ParameterSpec::new("regex", "[0-9]+");
        if soft_regex {
            regex = regex.soft();
        }
        let mut nullable = ParameterSpec::new("nullable", false);
        if soft_nullable {
            nullable = nullable.soft();
        }
        let params = vec![ParameterSpec::new("data_type", "string"), regex, nullable];
        let mut exp = Expectation::new("c", &params, true).unwrap();

        let values: Vec<Option<&str>> = cells.iter().map(|c| c.as_deref()).collect();
        let verdict = exp.check(&column(&values));

        let hard = exp.fails().count();
        let soft = exp.soft_fails().count();
        prop_assert_eq!(hard + soft, exp.failures().len());
        prop_assert!(exp.fails().all(|f| !f.is_soft()));
        prop_assert!(exp.soft_fails().all(Failure::is_soft));
        prop_assert_eq!(verdict, hard == 0);

        let mut lines: Vec<usize> = exp.failures().iter().map(|f| f.line).collect();
        let before = lines.len();
        lines.dedup();
        prop_assert_eq!(lines.len(), before);
    }
}
