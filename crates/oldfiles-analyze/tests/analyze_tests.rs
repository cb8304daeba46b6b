use chrono::{Duration, NaiveDate, NaiveDateTime};
use oldfiles_analyze::{
    RetentionAnalyzer, RetentionPolicy, State, extract, group_records, scope_units,
};
use oldfiles_core::{
    DirListing, FileRecord, Group, GroupScope, ProblemLog, RetentionConfig, SpacingEntry,
    SpacingFunction, TimestampPattern, user_regex,
};
use proptest::prelude::*;
use std::path::PathBuf;

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Paths named `<stem>-YYYY-MM-DD.bak` for files `ages` days old.
fn backups(dir: &str, stem: &str, ages: &[i64]) -> Vec<PathBuf> {
    ages.iter()
        .map(|&age| {
            let date = (now() - Duration::days(age)).date();
            PathBuf::from(dir).join(format!("{stem}-{}.bak", date.format("%Y-%m-%d")))
        })
        .collect()
}

fn analyzer(spacing: SpacingFunction) -> RetentionAnalyzer {
    let config = RetentionConfig::builder().spacing(spacing).build().unwrap();
    RetentionAnalyzer::new(config, now())
}

fn states_by_age(group: &Group) -> Vec<(i64, State)> {
    let mut out: Vec<(i64, State)> = group
        .records
        .iter()
        .map(|r| (r.age.round() as i64, r.state))
        .collect();
    out.sort_by_key(|&(age, _)| age);
    out
}

#[test]
fn test_two_files_both_kept() {
    let problems = ProblemLog::new();
    let groups = analyzer(SpacingFunction::fixed(10.0))
        .analyze(&backups("/b", "db", &[24, 26]), &problems);

    assert_eq!(groups.len(), 1);
    assert_eq!(
        states_by_age(&groups[0]),
        vec![(24, State::Keep), (26, State::Keep)]
    );
    assert!(problems.is_empty());
}

#[test]
fn test_fixed_spacing_drops_middle_files() {
    let problems = ProblemLog::new();
    let groups = analyzer(SpacingFunction::fixed(10.0))
        .analyze(&backups("/b", "db", &[26, 21, 29, 24]), &problems);

    assert_eq!(
        states_by_age(&groups[0]),
        vec![
            (21, State::Keep),
            (24, State::Old),
            (26, State::Old),
            (29, State::Keep),
        ]
    );
}

#[test]
fn test_timestamp_with_time_of_day() {
    let extraction = extract("backup-2023-04-05.12-30-00.zip", &TimestampPattern::default())
        .unwrap()
        .unwrap();

    assert_eq!(
        extraction.timestamp,
        NaiveDate::from_ymd_opt(2023, 4, 5)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap()
    );
    assert_eq!(extraction.bare_name, "backup-.zip");
}

#[test]
fn test_singleton_group_is_kept() {
    let problems = ProblemLog::new();
    let groups = analyzer(SpacingFunction::fixed(100.0))
        .analyze(&backups("/b", "only", &[3]), &problems);

    assert_eq!(groups[0].records[0].state, State::Keep);
}

#[test]
fn test_groups_are_split_by_bare_name() {
    let problems = ProblemLog::new();
    let mut files = backups("/b", "db", &[1, 2]);
    files.extend(backups("/b", "www", &[1]));

    let groups = analyzer(SpacingFunction::None).analyze(&files, &problems);

    let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
    assert_eq!(keys, vec!["db-.bak", "www-.bak"]);
    assert!(groups.iter().all(|g| g.is_decided()));
}

#[test]
fn test_scope_controls_grouping() {
    let listings = || {
        let mut a = DirListing::new("/a");
        a.files = backups("/a", "db", &[1, 2, 3]);
        let mut b = DirListing::new("/b");
        b.files = backups("/b", "db", &[1, 2]);
        vec![a, b]
    };
    let analyzer = analyzer(SpacingFunction::fixed(10.0));
    let problems = ProblemLog::new();

    let per_dir: Vec<Group> = scope_units(listings(), GroupScope::PerDirectory)
        .iter()
        .flat_map(|unit| analyzer.analyze(unit, &problems))
        .collect();
    assert_eq!(per_dir.len(), 2);

    let unified: Vec<Group> = scope_units(listings(), GroupScope::Unified)
        .iter()
        .flat_map(|unit| analyzer.analyze(unit, &problems))
        .collect();
    assert_eq!(unified.len(), 1);
    assert_eq!(unified[0].len(), 5);
}

#[test]
fn test_max_age_and_always_keep() {
    let config = RetentionConfig::builder()
        .max_age(30.0)
        .always_keep(user_regex("always_keep", r"-01-01\.").unwrap())
        .build()
        .unwrap();
    let analyzer = RetentionAnalyzer::new(config, now());
    let problems = ProblemLog::new();

    // 2024-01-01 and 2023-12-31 are both past the maximum age
    let files = vec![
        PathBuf::from("/b/db-2024-01-01.bak"),
        PathBuf::from("/b/db-2023-12-31.bak"),
        PathBuf::from("/b/db-2024-02-28.bak"),
    ];
    let groups = analyzer.analyze(&files, &problems);
    let records = &groups[0].records;

    assert_eq!(records[0].state, State::Keep);
    assert!(records[0].always_keep);
    assert_eq!(records[1].state, State::Old);
    assert_eq!(records[2].state, State::Keep);
    assert!(!records[2].always_keep);
}

#[test]
fn test_extraction_errors_are_problems() {
    let problems = ProblemLog::new();
    let files = vec![
        PathBuf::from("/b/db-2024-02-30.bak"),
        PathBuf::from("/b/db-2024-02-01.bak"),
        PathBuf::from("/b/README"),
    ];

    let groups = analyzer(SpacingFunction::None).analyze(&files, &problems);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 1);
    assert_eq!(problems.len(), 1);
    assert!(problems.snapshot()[0].message.contains("d 30"));
}

#[test]
fn test_reclassification_is_a_no_op() {
    let problems = ProblemLog::new();
    let analyzer = analyzer(SpacingFunction::fixed(4.0));
    let mut groups = analyzer.analyze(&backups("/b", "db", &[0, 1, 2, 3, 5, 8, 13, 21]), &problems);
    let before: Vec<State> = groups[0].records.iter().map(|r| r.state).collect();

    analyzer.policy().classify_all(&mut groups);

    let after: Vec<State> = groups[0].records.iter().map(|r| r.state).collect();
    assert_eq!(before, after);
}

/// Ages of up to 40 records in one group, in minutes, within 200 days.
fn arb_ages() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(0i64..200 * 24 * 60, 1..=40)
}

/// Tables whose spacing never shrinks with age: fixed steps from age 0,
/// optionally followed by a relative tail that starts at or above the last step.
fn arb_monotonic_table() -> impl Strategy<Value = SpacingFunction> {
    (
        prop::collection::vec((1u32..60, 0u32..8), 0..5),
        0.0f64..2.0,
        any::<bool>(),
    )
        .prop_map(|(steps, first, relative_tail)| {
            let mut limit = 0.0;
            let mut value = first;
            let mut entries = vec![SpacingEntry::fixed(limit, value)];
            for (limit_step, value_step) in steps {
                limit += f64::from(limit_step);
                value += f64::from(value_step) * 0.5;
                entries.push(SpacingEntry::fixed(limit, value));
            }
            if relative_tail {
                limit += 30.0;
                entries.push(SpacingEntry::relative(limit, value / limit + 0.05));
            }
            SpacingFunction::table(entries)
        })
}

fn arb_spacing() -> impl Strategy<Value = SpacingFunction> {
    prop_oneof![
        (0.0f64..10.0).prop_map(SpacingFunction::fixed),
        arb_monotonic_table(),
        Just("list:[0,1][5,2][30,0.25age]".parse::<SpacingFunction>().unwrap()),
    ]
}

fn group_of_ages(minutes: &[i64]) -> Group {
    let records: Vec<FileRecord> = minutes
        .iter()
        .enumerate()
        .map(|(i, &m)| {
            let ts = now() - Duration::minutes(m);
            FileRecord::new(format!("/r/{i}"), format!("{i}"), ts, "k", now())
        })
        .collect();
    group_records(records).remove(0)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn test_dropped_records_sit_between_close_keeps(
        minutes in arb_ages(),
        spacing in arb_spacing(),
    ) {
        let policy = RetentionPolicy::new(
            RetentionConfig::builder()
                .spacing(spacing.clone())
                .build()
                .unwrap(),
        );
        let mut group = group_of_ages(&minutes);
        policy.classify(&mut group);

        let mut order: Vec<&FileRecord> = group.records.iter().collect();
        order.sort_by(|a, b| a.age.total_cmp(&b.age));

        prop_assert!(order.iter().all(|r| r.state.is_terminal()));
        prop_assert_eq!(order[0].state, State::Keep);
        prop_assert_eq!(order[order.len() - 1].state, State::Keep);

        for (i, record) in order.iter().enumerate() {
            if record.state != State::Old {
                continue;
            }
            let younger = order[..i].iter().rev().find(|r| r.state == State::Keep);
            let older = order[i + 1..].iter().find(|r| r.state == State::Keep);
            let (Some(younger), Some(older)) = (younger, older) else {
                return Err(TestCaseError::fail("old record without kept neighbours"));
            };
            let gap = older.age - younger.age;
            prop_assert!(gap <= spacing.spacing_at(younger.age));
            prop_assert!(gap <= spacing.spacing_at(older.age));
        }
    }
}

#[test]
fn test_decreasing_table_keeps_where_spacing_drops() {
    let spacing = "list:[0,10][4,1]".parse::<SpacingFunction>().unwrap();
    let policy = RetentionPolicy::new(RetentionConfig::builder().spacing(spacing).build().unwrap());
    let mut group = group_of_ages(&[0, 2 * 24 * 60, 3 * 24 * 60, 5 * 24 * 60]);

    policy.classify(&mut group);

    let mut decided: Vec<(f64, State)> = group.records.iter().map(|r| (r.age, r.state)).collect();
    decided.sort_by(|a, b| a.0.total_cmp(&b.0));
    assert_eq!(
        decided,
        vec![
            (0.0, State::Keep),
            (2.0, State::Old),
            (3.0, State::Keep),
            (5.0, State::Keep),
        ]
    );
}

#[test]
fn test_time_of_day_names_share_a_group_with_date_only_names() {
    let files = vec![
        PathBuf::from("/b/db-2024-01-01.sql"),
        PathBuf::from("/b/db-2024-01-02.10-00.sql"),
    ];

    let groups = analyzer(SpacingFunction::None).analyze(&files, &ProblemLog::new());

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].key.as_str(), "db-.sql");
    assert_eq!(groups[0].records.len(), 2);
}
