use super::*;

/// Builds a match-output table with `top_n` candidate columns, a correct-map
/// column and an optional group column.
fn output_table(top_n: usize, grouped: bool) -> Table {
    let mut headers = vec!["name".to_string(), "loinc_code".to_string()];
    if grouped {
        headers.push("cl".to_string());
    }
    for rank in 1..=top_n {
        headers.push(format!("{rank:02}_code"));
    }
    Table::new(headers)
}

fn push_row(table: &mut Table, correct: &str, group: Option<&str>, candidates: &[&str]) {
    let mut row = vec!["term".to_string(), correct.to_string()];
    if let Some(group) = group {
        row.push(group.to_string());
    }
    row.extend(candidates.iter().map(|c| c.to_string()));
    table.push_row(row);
}

fn options(top_n: usize) -> EvalOptions {
    EvalOptions {
        correct_map_column: "loinc_code".into(),
        top_n,
        groupby: None,
    }
}

#[test]
fn test_hit_at_position_counts_cumulatively() {
    let mut table = output_table(5, false);
    // Correct value sits in the second candidate slot.
    push_row(
        &mut table,
        "4544-3",
        None,
        &["718-7", "4544-3", "751-8", "", ""],
    );

    let evaluation = evaluate_table(&table, "sample.csv", &options(5)).unwrap();
    let summary = &evaluation.overall;

    assert_eq!(summary.hits(), &[0, 1, 1, 1, 1]);
    assert_eq!(summary.proportions(), vec![0.0, 1.0, 1.0, 1.0, 1.0]);
}

#[test]
fn test_proportions_monotone() {
    let mut table = output_table(5, false);
    push_row(&mut table, "1", None, &["1", "", "", "", ""]);
    push_row(&mut table, "2", None, &["x", "2", "", "", ""]);
    push_row(&mut table, "3", None, &["x", "y", "z", "w", "3"]);
    push_row(&mut table, "4", None, &["x", "y", "z", "w", "v"]);

    let evaluation = evaluate_table(&table, "sample.csv", &options(5)).unwrap();
    let proportions = evaluation.overall.proportions();

    for pair in proportions.windows(2) {
        assert!(pair[0] <= pair[1]);
    }
    assert_eq!(proportions[0], 0.25);
    assert_eq!(proportions[4], 0.75);
}

#[test]
fn test_row_triage() {
    let mut table = output_table(2, false);
    push_row(&mut table, "718-7", None, &["718-7", ""]);
    push_row(&mut table, "", None, &["718-7", ""]);
    push_row(&mut table, "  ", None, &["718-7", ""]);
    push_row(&mut table, "New", None, &["718-7", ""]);
    push_row(&mut table, "NEW", None, &["718-7", ""]);
    push_row(&mut table, "9999-9", None, &["718-7", ""]);

    let summary = evaluate_table(&table, "sample.csv", &options(2))
        .unwrap()
        .overall;

    assert_eq!(summary.total_rows, 6);
    assert_eq!(summary.valid_rows, 2);
    assert_eq!(summary.excluded_rows, 2);
    assert_eq!(summary.skipped_rows, 2);
    assert_eq!(
        summary.valid_rows + summary.excluded_rows + summary.skipped_rows,
        summary.total_rows
    );
    assert_eq!(summary.hits(), &[1, 1]);
}

#[test]
fn test_candidate_values_trimmed() {
    let mut table = output_table(2, false);
    push_row(&mut table, " 718-7 ", None, &[" 718-7", ""]);

    let summary = evaluate_table(&table, "sample.csv", &options(2))
        .unwrap()
        .overall;
    assert_eq!(summary.hits(), &[1, 1]);
}

#[test]
fn test_no_valid_rows_is_error_not_division() {
    let mut table = output_table(2, false);
    push_row(&mut table, "", None, &["718-7", ""]);
    push_row(&mut table, "new", None, &["718-7", ""]);

    let result = evaluate_table(&table, "sample.csv", &options(2));
    assert!(matches!(result, Err(EvalError::NoValidRows)));
}

#[test]
fn test_missing_correct_column() {
    let table = output_table(2, false);
    let result = evaluate_table(
        &table,
        "sample.csv",
        &EvalOptions {
            correct_map_column: "absent".into(),
            top_n: 2,
            groupby: None,
        },
    );
    assert!(matches!(
        result,
        Err(EvalError::MissingCorrectColumn { .. })
    ));
}

#[test]
fn test_missing_candidate_columns() {
    let mut table = output_table(2, false);
    push_row(&mut table, "718-7", None, &["718-7", ""]);

    // Ask for more cutoffs than the table carries.
    let result = evaluate_table(&table, "sample.csv", &options(5));
    match result {
        Err(EvalError::MissingCandidateColumns { columns }) => {
            assert_eq!(columns, vec!["03_code", "04_code", "05_code"]);
        }
        other => panic!("expected MissingCandidateColumns, got {other:?}"),
    }
}

#[test]
fn test_grouping_partitions_independently() {
    let mut table = output_table(1, true);
    // Group "Test": 2 rows, 1 hit. Group "Finding": 3 rows, 1 hit.
    push_row(&mut table, "1", Some("Test"), &["1"]);
    push_row(&mut table, "2", Some("Test"), &["x"]);
    push_row(&mut table, "3", Some("Finding"), &["3"]);
    push_row(&mut table, "4", Some("Finding"), &["x"]);
    push_row(&mut table, "5", Some("Finding"), &["x"]);
    // Missing group value: counted overall, in no group.
    push_row(&mut table, "6", Some(""), &["6"]);

    let evaluation = evaluate_table(
        &table,
        "sample.csv",
        &EvalOptions {
            correct_map_column: "loinc_code".into(),
            top_n: 1,
            groupby: Some("cl".into()),
        },
    )
    .unwrap();

    assert_eq!(evaluation.overall.valid_rows, 6);
    assert_eq!(evaluation.overall.proportions(), vec![0.5]);

    // Sorted by group value.
    assert_eq!(evaluation.groups.len(), 2);
    assert_eq!(evaluation.groups[0].0, "Finding");
    assert_eq!(evaluation.groups[0].1.valid_rows, 3);
    assert!((evaluation.groups[0].1.proportions()[0] - 1.0 / 3.0).abs() < 1e-9);
    assert_eq!(evaluation.groups[1].0, "Test");
    assert_eq!(evaluation.groups[1].1.proportions(), vec![0.5]);
}

#[test]
fn test_grouping_is_case_sensitive() {
    let mut table = output_table(1, true);
    push_row(&mut table, "1", Some("Test"), &["1"]);
    push_row(&mut table, "2", Some("test"), &["2"]);

    let evaluation = evaluate_table(
        &table,
        "sample.csv",
        &EvalOptions {
            correct_map_column: "loinc_code".into(),
            top_n: 1,
            groupby: Some("cl".into()),
        },
    )
    .unwrap();

    assert_eq!(evaluation.groups.len(), 2);
}

#[test]
fn test_missing_groupby_column_falls_back_to_overall() {
    let mut table = output_table(1, false);
    push_row(&mut table, "1", None, &["1"]);

    let evaluation = evaluate_table(
        &table,
        "sample.csv",
        &EvalOptions {
            correct_map_column: "loinc_code".into(),
            top_n: 1,
            groupby: Some("absent".into()),
        },
    )
    .unwrap();

    assert!(evaluation.groups.is_empty());
    assert_eq!(evaluation.overall.valid_rows, 1);
}

#[test]
fn test_group_without_valid_rows_omitted() {
    let mut table = output_table(1, true);
    push_row(&mut table, "1", Some("Test"), &["1"]);
    push_row(&mut table, "new", Some("Finding"), &["x"]);

    let evaluation = evaluate_table(
        &table,
        "sample.csv",
        &EvalOptions {
            correct_map_column: "loinc_code".into(),
            top_n: 1,
            groupby: Some("cl".into()),
        },
    )
    .unwrap();

    assert_eq!(evaluation.groups.len(), 1);
    assert_eq!(evaluation.groups[0].0, "Test");
}

#[test]
fn test_summary_table_without_groups() {
    let mut table = output_table(2, false);
    push_row(&mut table, "718-7", None, &["718-7", ""]);
    push_row(&mut table, "4544-3", None, &["x", "4544-3"]);

    let evaluation = evaluate_table(&table, "results.csv", &options(2)).unwrap();
    let summary = summary_table(&[evaluation], 2, false);

    let mut buffer = Vec::new();
    summary.write_csv(&mut buffer).unwrap();
    let text = String::from_utf8(buffer).unwrap();

    assert_eq!(
        text,
        "filename,rowcount,top-1,top-2\nresults.csv,2,0.5000,1.0000\n"
    );
}

#[test]
fn test_summary_table_with_groups_uses_star_for_overall() {
    let mut table = output_table(1, true);
    push_row(&mut table, "1", Some("Test"), &["1"]);
    push_row(&mut table, "2", Some("Finding"), &["x"]);

    let evaluation = evaluate_table(
        &table,
        "results.csv",
        &EvalOptions {
            correct_map_column: "loinc_code".into(),
            top_n: 1,
            groupby: Some("cl".into()),
        },
    )
    .unwrap();
    let summary = summary_table(&[evaluation], 1, true);

    let mut buffer = Vec::new();
    summary.write_csv(&mut buffer).unwrap();
    let text = String::from_utf8(buffer).unwrap();

    assert_eq!(
        text,
        "filename,group,rowcount,top-1\n\
         results.csv,*,2,0.5000\n\
         results.csv,Finding,1,0.0000\n\
         results.csv,Test,1,1.0000\n"
    );
}
