mod common;

use common::{float, frame, int, int_column, people, text, text_column};
use csv_scrub::{
    ErrorKind, FillMethod, FillStrategy, MutationEngine,
    data::Value,
    mutation::Operation,
    schema::ColumnType,
};

#[test]
fn mean_fill_rounds_to_two_places() {
    let mut table = people();
    let record = MutationEngine::new(&mut table)
        .fill_missing("n", &FillStrategy::Mean)
        .expect("mean fill");

    assert_eq!(record.fill_value, Some(Value::Float(2.33)));
    let column = table.column("n").unwrap();
    assert_eq!(column.cells, vec![float(1.0), float(2.0), float(2.33), float(4.0)]);
    assert_eq!(column.datatype, ColumnType::Float);
    assert_eq!(
        record.summary(),
        "Missing values filled in 'n' using Mean = 2.33"
    );
}

#[test]
fn mode_fill_on_categorical_column() {
    let mut table = people();
    let record = MutationEngine::new(&mut table)
        .fill_missing("city", &FillStrategy::Mode)
        .expect("mode fill");

    assert_eq!(record.fill_value, text("a"));
    assert_eq!(
        table.column("city").unwrap().cells,
        vec![text("a"), text("b"), text("a"), text("a")]
    );
    assert_eq!(
        record.operation,
        Operation::FillMissing {
            column: "city".into(),
            method: FillMethod::Mode
        }
    );
}

#[test]
fn median_fill_keeps_integer_when_whole() {
    let mut table = frame(vec![int_column("n", &[Some(1), None, Some(3), Some(5)])]);
    let record = MutationEngine::new(&mut table)
        .fill_missing("n", &FillStrategy::Median)
        .expect("median fill");

    assert_eq!(record.fill_value, Some(Value::Float(3.0)));
    let column = table.column("n").unwrap();
    assert_eq!(column.datatype, ColumnType::Integer);
    assert_eq!(column.cells[1], int(3));
}

#[test]
fn forward_and_backward_fill_propagate_neighbours() {
    let cells = [None, Some(1), None, None, Some(4), None];

    let mut forward = frame(vec![int_column("n", &cells)]);
    let record = MutationEngine::new(&mut forward)
        .fill_missing("n", &FillStrategy::ForwardFill)
        .expect("ffill");
    assert_eq!(record.fill_value, None);
    assert_eq!(
        forward.column("n").unwrap().cells,
        vec![None, int(1), int(1), int(1), int(4), int(4)]
    );
    assert_eq!(record.code(), "df['n'] = df['n'].ffill()");

    let mut backward = frame(vec![int_column("n", &cells)]);
    MutationEngine::new(&mut backward)
        .fill_missing("n", &FillStrategy::BackwardFill)
        .expect("bfill");
    assert_eq!(
        backward.column("n").unwrap().cells,
        vec![int(1), int(1), int(4), int(4), int(4), None]
    );
}

#[test]
fn custom_fill_parses_against_column_type() {
    let mut table = people();
    let record = MutationEngine::new(&mut table)
        .fill_missing("n", &FillStrategy::Custom("0".into()))
        .expect("custom fill");
    assert_eq!(record.fill_value, int(0));
    assert_eq!(table.column("n").unwrap().cells[2], int(0));
    assert!(record.code().starts_with("# Using custom value = 0"));

    let before = table.clone();
    let err = MutationEngine::new(&mut table)
        .fill_missing("city", &FillStrategy::Custom(String::new()))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IllegalStrategy);
    assert_eq!(table, before);
}

#[test]
fn custom_fill_rejects_value_of_wrong_type() {
    let mut table = people();
    let before = table.clone();
    let err = MutationEngine::new(&mut table)
        .fill_missing("n", &FillStrategy::Custom("lots".into()))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IllegalStrategy);
    assert!(err.to_string().contains("'lots' is not a valid Integer"));
    assert_eq!(table, before);
}

#[test]
fn numeric_only_strategies_are_rejected_for_text() {
    let mut table = people();
    let before = table.clone();
    for strategy in [FillStrategy::Mean, FillStrategy::Median] {
        let err = MutationEngine::new(&mut table)
            .fill_missing("city", &strategy)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IllegalStrategy);
    }
    assert_eq!(table, before);
}

#[test]
fn fill_without_missing_values_is_an_empty_operand() {
    let mut table = frame(vec![int_column("n", &[Some(1), Some(2)])]);
    let before = table.clone();
    let err = MutationEngine::new(&mut table)
        .fill_missing("n", &FillStrategy::Mean)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyOperand);
    assert_eq!(table, before);
}

#[test]
fn fill_over_all_missing_column_is_a_computation_failure() {
    let mut table = frame(vec![text_column("x", &[None, None])]);
    let err = MutationEngine::new(&mut table)
        .fill_missing("x", &FillStrategy::Mode)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ComputationFailure);
    assert_eq!(table.column("x").unwrap().missing_count(), 2);
}

#[test]
fn fill_unknown_column_is_invalid() {
    let mut table = people();
    let err = MutationEngine::new(&mut table)
        .fill_missing("zip", &FillStrategy::Mode)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidColumn);
    assert_eq!(err.to_string(), "Column 'zip' not found in table");
}

#[test]
fn rename_keeps_data_and_position() {
    let mut table = people();
    let original = table.column("n").unwrap().cells.clone();
    let record = MutationEngine::new(&mut table)
        .rename_column("n", "count")
        .expect("rename");

    assert_eq!(table.column_names(), vec!["count", "city"]);
    assert!(table.column("n").is_none());
    assert_eq!(table.column("count").unwrap().cells, original);
    assert_eq!(
        record.code(),
        "df.rename(columns={'n': 'count'}, inplace=True)"
    );
}

#[test]
fn rename_rejects_collisions_and_blank_names() {
    let mut table = people();
    let before = table.clone();
    let mut engine = MutationEngine::new(&mut table);
    assert_eq!(
        engine.rename_column("n", "city").unwrap_err().kind(),
        ErrorKind::InvalidColumn
    );
    assert_eq!(
        engine.rename_column("n", "  ").unwrap_err().kind(),
        ErrorKind::EmptyOperand
    );
    assert_eq!(
        engine.rename_column("zip", "code").unwrap_err().kind(),
        ErrorKind::InvalidColumn
    );
    assert_eq!(table, before);
}

#[test]
fn rename_to_same_name_succeeds() {
    let mut table = people();
    let before = table.clone();
    MutationEngine::new(&mut table)
        .rename_column("n", "n")
        .expect("self rename");
    assert_eq!(table, before);
}

#[test]
fn drop_columns_preserves_rows_and_order() {
    let mut table = frame(vec![
        int_column("x", &[Some(1), Some(2)]),
        int_column("y", &[Some(3), Some(4)]),
        int_column("z", &[Some(5), Some(6)]),
    ]);
    let record = MutationEngine::new(&mut table)
        .drop_columns(&["x", "z"])
        .expect("drop");
    assert_eq!(table.column_names(), vec!["y"]);
    assert_eq!(table.row_count(), 2);
    assert_eq!(record.code(), "df.drop(columns=['x', 'z'], inplace=True)");
}

#[test]
fn drop_columns_is_all_or_nothing() {
    let mut table = people();
    let before = table.clone();
    let err = MutationEngine::new(&mut table)
        .drop_columns(&["n", "zip"])
        .unwrap_err();
    assert_eq!(err, csv_scrub::EditError::ColumnNotFound("zip".into()));
    assert_eq!(table, before);

    let none: [&str; 0] = [];
    let err = MutationEngine::new(&mut table).drop_columns(&none).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyOperand);
}

#[test]
fn drop_duplicate_rows_keeps_first_occurrence() {
    let mut table = frame(vec![
        int_column("n", &[Some(1), Some(2), Some(1)]),
        text_column("c", &[Some("a"), Some("b"), Some("a")]),
    ]);
    let record = MutationEngine::new(&mut table)
        .drop_duplicate_rows()
        .expect("dedupe");
    assert_eq!(record.removed_rows, Some(1));
    assert_eq!(table.column("n").unwrap().cells, vec![int(1), int(2)]);
    assert_eq!(table.column("c").unwrap().cells, vec![text("a"), text("b")]);

    let again = MutationEngine::new(&mut table)
        .drop_duplicate_rows()
        .expect("second dedupe");
    assert_eq!(again.removed_rows, Some(0));
    assert_eq!(again.summary(), "No duplicate rows found");
    assert!(!again.changed_table());
}

#[test]
fn rows_that_differ_only_around_separators_are_kept() {
    let mut table = frame(vec![
        text_column("a", &[Some("a\u{1f}s:b"), Some("a")]),
        text_column("b", &[Some("c"), Some("b\u{1f}s:c")]),
    ]);
    let before = table.clone();
    let record = MutationEngine::new(&mut table)
        .drop_duplicate_rows()
        .expect("dedupe");
    assert_eq!(record.removed_rows, Some(0));
    assert_eq!(table, before);
}

#[test]
fn dedupe_merges_signed_zero() {
    let mut table = frame(vec![csv_scrub::Column::new(
        "x",
        ColumnType::Float,
        vec![float(0.0), float(-0.0), float(1.0)],
    )]);
    let record = MutationEngine::new(&mut table)
        .drop_duplicate_rows()
        .expect("dedupe");
    assert_eq!(record.removed_rows, Some(1));
    assert_eq!(table.row_count(), 2);
}

#[test]
fn dedupe_after_dropping_every_column_keeps_counts_consistent() {
    let mut table = frame(vec![int_column("a", &[Some(1), Some(2), Some(3)])]);
    MutationEngine::new(&mut table)
        .drop_columns(&["a"])
        .expect("drop");
    assert_eq!(table.column_count(), 0);
    assert_eq!(table.row_count(), 3);

    let record = MutationEngine::new(&mut table)
        .drop_duplicate_rows()
        .expect("dedupe");
    let removed = record.removed_rows.expect("removed count");
    assert_eq!(removed + table.row_count(), 3);
    assert_eq!(table.row_count(), 1);
}
