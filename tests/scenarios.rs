use chrono::NaiveDate;
use roster_availability_lib::{
    match_name, AvailabilityRow, Diagnostic, GridShape, MatchTier, NameIndex, ReconcileConfig,
    Reconciler, Roster, RosterRow,
};

fn reconciler(days: usize, slots_per_day: usize) -> Reconciler {
    Reconciler::new(ReconcileConfig {
        days,
        slots_per_day,
        start_date: Some("2025-03-03".into()),
        ..ReconcileConfig::default()
    })
    .with_today(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
}

fn roster(names: &[&str]) -> Roster {
    Roster::from_rows(names.iter().map(|name| RosterRow::new(*name)).collect())
}

fn alternating(len: usize) -> Vec<u8> {
    (0..len).map(|i| u8::from(i % 2 == 0)).collect()
}

#[test]
fn merged_supervisor_cells_are_forward_filled() {
    let report = reconciler(9, 7).reconcile(roster(&["Dr. Ahmad Santoso", "", ""]), &[]);
    assert!(report
        .roster
        .rows
        .iter()
        .all(|row| row.supervisor == "Dr. Ahmad Santoso"));
    assert_eq!(report.matrix.supervisors, vec!["Dr. Ahmad Santoso"]);
    assert_eq!(report.supervisors[0].index, 0);
}

#[test]
fn same_grid_availability_is_copied_unchanged() {
    let values = alternating(63);
    let rows = vec![AvailabilityRow::new("Ahmad Santoso", values.clone())];
    let report = reconciler(9, 7).reconcile(roster(&["Dr. Ahmad Santoso", ""]), &rows);

    assert_eq!(report.matrix.preferences[0], values);
    assert_eq!(report.matches.len(), 1);
    assert_eq!(report.matches[0].tier, MatchTier::Token);
    assert_eq!(report.matches[0].source_grid, GridShape::new(9, 7));
    assert!(report.diagnostics.is_empty());
}

#[test]
fn seven_day_availability_fills_the_first_seven_of_nine_days() {
    let rows = vec![AvailabilityRow::new("Santoso", vec![1; 49])];
    let report = reconciler(9, 7).reconcile(roster(&["Dr. Ahmad Santoso"]), &rows);

    let row = &report.matrix.preferences[0];
    assert_eq!(row.len(), 63);
    assert!(row[..49].iter().all(|value| *value == 1));
    assert!(row[49..].iter().all(|value| *value == 0));
    assert_eq!(report.matches[0].source_grid, GridShape::new(7, 7));
    assert!(matches!(
        report.diagnostics.as_slice(),
        [Diagnostic::GridConverted { from_days: 7, from_slots_per_day: 7, .. }]
    ));
}

#[test]
fn unknown_supervisors_leave_the_matrix_untouched() {
    let rows = vec![
        AvailabilityRow::new("Budi Hartono", vec![1; 63]),
        AvailabilityRow::new("Dr. X Y", vec![1, 1]),
    ];
    let report = reconciler(9, 7).reconcile(roster(&["Dr. Ahmad Santoso", "Ir. Budi Hartono"]), &rows);

    assert_eq!(report.matrix.available_slots(0), 0);
    assert_eq!(report.matrix.available_slots(1), 63);
    assert_eq!(
        report.diagnostics,
        vec![Diagnostic::UnmatchedSupervisor {
            row: 2,
            raw_name: "Dr. X Y".into()
        }]
    );
}

#[test]
fn three_word_names_resolve_through_their_trigram() {
    let index = NameIndex::build(&["Prof. Dr. Jap Tji Beng, M.Sc.", "Dr. Beng Hartono"]);
    assert_eq!(index.lookup("jap tji beng"), Some(0));

    let tokens = vec!["jap".to_string(), "tji".to_string(), "beng".to_string()];
    assert_eq!(MatchTier::Trigram.resolve("Jap Tji Beng", &tokens, &index), Some(0));

    let found = match_name("Jap Tji Beng", &index).unwrap();
    assert_eq!(found.name, "Prof. Dr. Jap Tji Beng, M.Sc.");
}

#[test]
fn every_row_has_full_width_and_binary_values() {
    let rows = vec![
        AvailabilityRow::new("Ahmad", alternating(72)),
        AvailabilityRow::new("Budi", alternating(13)),
        AvailabilityRow::new("Citra", vec![2, 1, 9, 1]),
    ];
    let report = reconciler(5, 6).reconcile(roster(&["Ahmad", "Budi", "", "Citra"]), &rows);

    assert_eq!(report.matrix.preferences.len(), 3);
    for row in &report.matrix.preferences {
        assert_eq!(row.len(), 30);
        assert!(row.iter().all(|value| *value <= 1));
    }
    assert_eq!(report.matrix.days.len(), 5);
    assert_eq!(report.matrix.slots.len(), 6);
}

#[test]
fn canonical_names_match_themselves() {
    let names = [
        "Dr. Ahmad Santoso",
        "Ahmad Santoso Putra",
        "Prof. Dr. Ir.",
        "Sri Wahyuni, S.Kom., M.Kom.",
    ];
    let index = NameIndex::build(&names);
    for (position, name) in names.iter().enumerate() {
        let found = match_name(name, &index).unwrap();
        assert_eq!(found.position, position, "{name}");
        assert_eq!(found.tier, MatchTier::Exact);
    }
}
