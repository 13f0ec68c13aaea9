use super::*;

fn page(names: &[&str], next: Option<&str>) -> DriveFileList {
    DriveFileList {
        files: names
            .iter()
            .enumerate()
            .map(|(i, name)| AudioFile::new(format!("id-{name}-{i}"), *name))
            .collect(),
        next_page_token: next.map(str::to_string),
    }
}

fn table(rows: &[(&str, &str)]) -> RatingTable {
    RatingTable::from_rows(
        rows.iter()
            .map(|(name, rating)| vec![name.to_string(), rating.to_string()])
            .collect(),
    )
}

#[test]
fn fresh_session_expects_a_first_page() {
    let state = SessionState::new();

    assert!(state.has_more_pages());
    assert!(state.files().is_empty());
    assert!(state.next_page_token().is_none());
}

#[test]
fn pages_accumulate_and_cursor_advances() {
    let mut state = SessionState::new();

    assert_eq!(state.append_page(page(&["a.mp3", "b.mp3"], Some("t2"))), 2);
    assert_eq!(state.next_page_token(), Some("t2"));
    assert!(state.has_more_pages());

    assert_eq!(state.append_page(page(&["c.mp3"], None)), 1);
    let names: Vec<_> = state.files().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["a.mp3", "b.mp3", "c.mp3"]);
    assert!(!state.has_more_pages());
}

#[test]
fn selecting_shows_matching_rating_or_clears_field() {
    let mut state = SessionState::new();
    state.append_page(page(&["a.mp3", "b.mp3"], None));
    state.replace_ratings(table(&[("b.mp3", "5")]));

    state.select(1).expect("select b");
    assert_eq!(state.rating_field(), "5");

    state.select(0).expect("select a");
    assert_eq!(state.rating_field(), "");
}

#[test]
fn selecting_from_empty_list_is_rejected() {
    let mut state = SessionState::new();

    let err = state.select(0).expect_err("must fail");

    assert!(err.is(FailureKind::Selection));
    assert_eq!(state.current_index(), 0);
}

#[test]
fn out_of_range_selection_keeps_current_index() {
    let mut state = SessionState::new();
    state.append_page(page(&["a.mp3", "b.mp3"], None));
    state.select(1).expect("select");

    let err = state.select(5).expect_err("must fail");

    assert!(err.message.contains("out of range"));
    assert_eq!(state.current_index(), 1);
}

#[test]
fn editing_shows_save_affordance_without_touching_table() {
    let mut state = SessionState::new();
    state.append_page(page(&["a.mp3"], None));
    state.replace_ratings(table(&[("a.mp3", "3")]));
    state.select(0).expect("select");

    state.edit_rating("4");

    assert!(state.save_pending());
    assert_eq!(state.rating_field(), "4");
    assert_eq!(state.ratings().lookup("a.mp3").map(|e| e.rating.as_str()), Some("3"));
}

#[test]
fn merged_ratings_leaves_session_untouched_until_commit() {
    let mut state = SessionState::new();
    state.append_page(page(&["a.mp3"], None));
    state.select(0).expect("select");
    state.edit_rating("2");

    let (merged, change) = state.merged_ratings().expect("merge");
    assert_eq!(change, RatingChange::Appended { row: 0 });
    assert!(state.ratings().is_empty());
    assert!(state.save_pending());

    state.commit_save(merged);
    assert_eq!(state.ratings().len(), 1);
    assert!(!state.save_pending());
}

#[test]
fn view_reports_status_and_one_based_selection() {
    let mut state = SessionState::new();
    state.append_page(page(&["a.mp3", "b.mp3"], Some("t2")));
    state.replace_ratings(table(&[("a.mp3", "3")]));
    state.select(1).expect("select");

    let view = state.view();

    assert_eq!(view.loading_status, "Loaded 2 audio files.");
    assert_eq!(view.current_label, "Currently selected audio: 2");
    assert!(view.has_more);
    assert!(!view.save_visible);
    assert_eq!(
        view.entries,
        vec![
            ListEntry {
                name: "a.mp3".to_string(),
                rating: Some("3".to_string()),
                selected: false,
            },
            ListEntry {
                name: "b.mp3".to_string(),
                rating: None,
                selected: true,
            },
        ]
    );
}
