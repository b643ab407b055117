//! Integration tests for bibr
//!
//! These tests verify end-to-end behavior by building temporary libraries
//! on disk and driving the engine components the way the shell does:
//! load records, filter them through the query engine, and navigate the
//! browse pane.

use std::fs;

use tempfile::TempDir;

use bibr::query::Query;
use bibr::store::Library;
use bibr::ui::{BrowseAction, BrowsePane, CommandPane, EditorAction, Flow, ModalState, Outcome};
use bibr::input::Key;

const SAMPLE: &str = r#"
@article{a,
  author = {Doe, Jane},
  title = {Maps of Nothing},
  year = {2019},
}

@article{b,
  author = {Roe, Richard},
  title = {Graphs All The Way Down},
  year = {2021},
}

@book{c,
  author = {Poe, Edgar},
  title = {Sets Considered Harmful},
  year = {2021},
  tags = {foo,bar},
}
"#;

/// Helper: a library seeded with the sample bibliography.
fn setup_library(dir: &TempDir) -> Library {
    fs::write(dir.path().join("references.bib"), SAMPLE).unwrap();
    Library::open(dir.path(), 0, None).unwrap()
}

/// Helper: a browse pane holding the sample library.
fn setup_pane(library: &Library) -> BrowsePane {
    let mut pane = BrowsePane::new("{index:<4}[{pdf}] {ID}", 10);
    pane.set_records(library.load().unwrap());
    pane.set_viewport(10);
    pane
}

#[test]
fn test_load_then_tag_search_selects_tagged_entry() {
    let dir = TempDir::new().unwrap();
    let library = setup_library(&dir);
    let mut pane = setup_pane(&library);

    let query = Query::parse("--tag foo").unwrap();
    let subset = query.filter(pane.records());
    assert_eq!(subset, vec![2]);

    pane.set_subset(subset);
    assert_eq!(pane.selected().unwrap().key(), "Poe2021");
}

#[test]
fn test_filter_navigate_then_reset() {
    let dir = TempDir::new().unwrap();
    let library = setup_library(&dir);
    let mut pane = setup_pane(&library);

    let query = Query::parse("year=2021").unwrap();
    pane.set_subset(query.filter(pane.records()));
    assert_eq!(pane.subset(), &[1, 2]);

    pane.apply(BrowseAction::Down);
    assert_eq!(pane.selected().unwrap().key(), "Poe2021");

    // An empty query puts every record back, in original order.
    let query = Query::parse("").unwrap();
    pane.set_subset(query.filter(pane.records()));
    assert_eq!(pane.subset(), &[0, 1, 2]);
    assert_eq!(pane.index(), 0);
}

#[test]
fn test_bad_query_leaves_subset_alone() {
    let dir = TempDir::new().unwrap();
    let library = setup_library(&dir);
    let mut pane = setup_pane(&library);

    let query = Query::parse("year=2019").unwrap();
    pane.set_subset(query.filter(pane.records()));
    assert_eq!(pane.subset(), &[0]);

    // The shell only replaces the subset after a successful parse.
    assert!(Query::parse("title=\"open").is_err());
    assert_eq!(pane.subset(), &[0]);
}

#[test]
fn test_attachment_flag_follows_papers_folder() {
    let dir = TempDir::new().unwrap();
    let library = setup_library(&dir);
    fs::write(dir.path().join("PAPERS/Roe2021.pdf"), "%PDF").unwrap();

    let records = library.load().unwrap();
    let query = Query::parse("--pdf").unwrap();
    assert_eq!(query.filter(&records), vec![1]);
}

#[test]
fn test_save_then_reload_preserves_filterable_fields() {
    let dir = TempDir::new().unwrap();
    let library = setup_library(&dir);
    let records = library.load().unwrap();

    library.save(&records).unwrap();
    let reloaded = library.load().unwrap();

    let query = Query::parse("--tag bar").unwrap();
    assert_eq!(query.filter(&reloaded), query.filter(&records));
}

#[test]
fn test_command_line_session() {
    let mut editor = CommandPane::new(": ", None);

    // Type and submit a search the way the key loop would.
    for c in "search year=2021".chars() {
        editor.handle_key(&Key::plain(c.to_string()));
    }
    let flow = editor.handle_key(&Key::special(Key::RETURN));
    assert_eq!(
        flow,
        Flow::Stop(Outcome::Command("search year=2021".to_string()))
    );

    // History brings the line back for editing.
    editor.handle_key(&Key::special(Key::UP));
    assert_eq!(editor.buffer(), "search year=2021");

    // Escape cancels with an empty command.
    let flow = editor.handle_key(&Key::special(Key::ESCAPE));
    assert_eq!(flow, Flow::Stop(Outcome::Command(String::new())));
}

#[test]
fn test_interrupt_is_an_exit_everywhere() {
    let dir = TempDir::new().unwrap();
    let library = setup_library(&dir);
    let mut pane = setup_pane(&library);
    let mut editor = CommandPane::new(": ", None);

    assert_eq!(
        pane.handle_key(&Key::interrupt()),
        Flow::Stop(Outcome::Exit)
    );
    assert_eq!(
        editor.handle_key(&Key::interrupt()),
        Flow::Stop(Outcome::Exit)
    );
}

#[test]
fn test_pickup_grows_library_on_disk() {
    let dir = TempDir::new().unwrap();
    let library = setup_library(&dir);
    let mut records = library.load().unwrap();

    fs::write(
        dir.path().join("PICKUP/new.bib"),
        r#"
@article{incoming,
  author = {New, Nancy},
  title = {Entirely Fresh Results},
  year = {2024},
}
"#,
    )
    .unwrap();

    let report = library.pickup(&mut records).unwrap();
    assert_eq!(report.added, 1);
    library.save(&records).unwrap();

    let reloaded = library.load().unwrap();
    assert_eq!(reloaded.len(), 4);
    let query = Query::parse("author=Nancy").unwrap();
    assert_eq!(query.filter(&reloaded), vec![3]);
}
