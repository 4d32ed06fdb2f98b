use crate::*;

use paged_virtualizer::{
    AttachError, BoxError, DataSource, DatasetLength, PageRequest, PageResult, PageSource, Range,
    ScrollConfig, ScrollState, SettleOutcome, StickyBand, StickyHost, StickyState,
};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::vec::Vec;

#[derive(Debug, Default)]
struct Api {
    pending: Vec<PageRequest>,
}

impl PageSource for Api {
    fn fetch_page(&mut self, request: PageRequest) {
        self.pending.push(request);
    }
}

impl DataSource for Api {
    fn page_source(&mut self) -> Option<&mut dyn PageSource> {
        Some(self)
    }
}

#[derive(Debug, Default)]
struct Table {
    header_defs: Vec<bool>,
    header_rows: Vec<(u32, f64)>,
    top: BTreeMap<u32, f64>,
}

impl StickyHost for Table {
    type RowId = u32;

    fn for_each_row_def(&self, band: StickyBand, f: &mut dyn FnMut(bool)) {
        if band == StickyBand::Header {
            self.header_defs.iter().for_each(|&sticky| f(sticky));
        }
    }

    fn measure_sticky_rows(&self, band: StickyBand, f: &mut dyn FnMut(&u32, f64)) {
        if band == StickyBand::Header {
            for (id, natural) in &self.header_rows {
                f(id, *natural);
            }
        }
    }

    fn update_sticky_rows(&mut self, band: StickyBand, f: &mut dyn FnMut(&u32) -> f64) {
        if band == StickyBand::Header {
            for (id, _) in &self.header_rows {
                self.top.insert(*id, f(id));
            }
        }
    }
}

fn table() -> Table {
    Table {
        header_defs: std::vec![true],
        header_rows: std::vec![(0, 0.0)],
        ..Table::default()
    }
}

type Controller = TableController<usize, Api, u32>;

fn controller(page_size: usize) -> Controller {
    let mut c = Controller::new(ScrollConfig::default().with_page_size(page_size));
    c.attach(Api::default()).unwrap();
    c
}

/// Oldest request the attached source has seen.
fn next_request(c: &Controller) -> Option<PageRequest> {
    let pending = &c.pagination().source()?.pending;
    pending.first().copied()
}

fn pending(c: &Controller) -> Vec<usize> {
    c.pagination()
        .source()
        .map(|api| api.pending.iter().map(|r| r.page).collect())
        .unwrap_or_default()
}

fn serve(total: usize, request: &PageRequest) -> PageResult<usize> {
    let start = request.start_index().min(total);
    let end = (start + request.page_size).min(total);
    PageResult::new((start..end).collect(), request.page_size)
}

#[test]
fn nothing_is_fetched_before_layout() {
    let mut c = controller(50);
    let mut host = table();
    assert_eq!(c.on_scroll(&mut host, 0.0), Range::EMPTY);
    assert!(pending(&c).is_empty());

    c.on_viewport_resized(500.0);
    assert_eq!(c.range(), Range::new(0, 16));
    assert_eq!(pending(&c), [1]);
}

#[test]
fn scrolling_through_134_rows() {
    let mut c = controller(50);
    let mut host = table();
    c.on_viewport_resized(500.0);

    let p1 = next_request(&c).unwrap();
    c.settle(p1.ticket, Ok::<_, BoxError>(serve(134, &p1)))
        .unwrap();

    // The frontier reaches page 2 once end >= 100.
    let range = c.on_scroll(&mut host, 52.0 * 85.0);
    assert!(range.end >= 100);
    assert_eq!(pending(&c), [1, 2]);
    let p2 = c.pagination().in_flight().unwrap();
    c.settle(p2.ticket, Ok::<_, BoxError>(serve(134, &p2)))
        .unwrap();

    c.on_scroll(&mut host, 52.0 * 135.0);
    let p3 = c.pagination().in_flight().unwrap();
    assert_eq!(p3.page, 3);
    c.settle(p3.ticket, Ok::<_, BoxError>(serve(134, &p3)))
        .unwrap();

    assert_eq!(c.dataset_length(), DatasetLength::Known(134));
    assert!(c.range().end <= 134);

    // Further scrolling is clamped and never fetches.
    c.on_scroll(&mut host, 52.0 * 500.0);
    assert_eq!(c.range(), Range::new(134, 134));
    c.on_scroll(&mut host, 52.0 * 125.0);
    assert!(c.range().end <= 134);
    assert_eq!(pending(&c), [1, 2, 3]);
    assert_eq!(c.state().loaded_rows, 134);
}

#[test]
fn range_listener_sees_changes_only() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut c = Controller::new(ScrollConfig::default()).with_on_range_change(Some({
        let seen = Arc::clone(&seen);
        move |r: Range| seen.lock().unwrap().push(r)
    }));
    c.attach(Api::default()).unwrap();
    let mut host = table();

    c.on_viewport_resized(500.0);
    c.on_scroll(&mut host, 0.0);
    c.on_scroll(&mut host, 10.0);
    c.on_scroll(&mut host, 520.0);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.first(), Some(&Range::new(0, 16)));
    assert!(seen.windows(2).all(|w| w[0] != w[1]));
    assert_eq!(seen.last(), Some(&c.range()));
}

#[test]
fn failed_fetch_is_reported_and_retried() {
    let failures = Arc::new(Mutex::new(Vec::new()));
    let mut c = Controller::new(ScrollConfig::default().with_page_size(50)).with_on_fetch_error(
        Some({
            let failures = Arc::clone(&failures);
            move |err: &paged_virtualizer::FetchError| failures.lock().unwrap().push(err.page())
        }),
    );
    c.attach(Api::default()).unwrap();
    let mut host = table();
    c.on_viewport_resized(500.0);

    let p1 = next_request(&c).unwrap();
    let err = c
        .settle(p1.ticket, Err::<PageResult<usize>, _>("timeout"))
        .unwrap_err();
    assert_eq!(err.page(), 1);
    assert_eq!(*failures.lock().unwrap(), [1]);
    assert!(c.buffer().is_empty());

    // The next scroll tick retries the same page.
    c.on_scroll(&mut host, 5.0);
    assert_eq!(pending(&c), [1, 1]);
}

#[test]
fn superseded_page_is_dropped() {
    let mut c = controller(50);
    let mut host = table();
    c.on_viewport_resized(500.0);
    let p1 = c.pagination().in_flight().unwrap();

    // Jump far before page 1 arrives.
    c.on_scroll(&mut host, 52.0 * 300.0);
    let jumped = c.pagination().in_flight().unwrap();
    assert_ne!(jumped.page, p1.page);

    let outcome = c
        .settle(p1.ticket, Ok::<_, BoxError>(serve(1_000, &p1)))
        .unwrap();
    assert_eq!(outcome, SettleOutcome::Discarded);
    assert_eq!(c.buffer().loaded(), 0);
}

#[test]
fn rows_outside_the_buffer_are_placeholders() {
    let mut c = controller(10);
    c.on_viewport_resized(500.0);
    let p1 = c.pagination().in_flight().unwrap();
    c.settle(p1.ticket, Ok::<_, BoxError>(serve(1_000, &p1)))
        .unwrap();

    let mut loaded = 0;
    let mut placeholders = 0;
    c.for_each_row(|_, row| match row {
        Some(_) => loaded += 1,
        None => placeholders += 1,
    });
    assert_eq!(loaded, 10);
    assert_eq!(placeholders, c.range().len() - 10);
    assert_eq!(c.row(3), Some(&3));
}

#[test]
fn switching_source_resets_state_and_sticky_cache() {
    let mut c = controller(10);
    let mut host = table();
    c.on_viewport_resized(500.0);
    c.on_scroll(&mut host, 0.0);
    assert_eq!(c.sticky().state(), StickyState::Built);
    let p1 = c.pagination().in_flight().unwrap();
    c.settle(p1.ticket, Ok::<_, BoxError>(serve(5, &p1)))
        .unwrap();
    assert_eq!(c.dataset_length(), DatasetLength::Known(5));

    let previous = c.on_data_source_switched(Api::default()).unwrap();
    assert_eq!(previous.map(|api| api.pending.len()), Some(1));
    assert_eq!(c.dataset_length(), DatasetLength::Unknown);
    assert!(c.buffer().is_empty());
    assert_eq!(c.sticky().state(), StickyState::Invalid);
    // The new source is asked for the first page right away.
    assert_eq!(pending(&c), [1]);

    host.header_rows[0].1 = 12.0;
    assert!(c.on_quiescent(&mut host));
    assert_eq!(c.sticky().state(), StickyState::Built);
    assert_eq!(host.top[&0], 12.0);
}

#[test]
fn structural_change_defers_sticky_rebuild() {
    let mut c = controller(10);
    let mut host = table();
    c.on_viewport_resized(500.0);
    c.on_scroll(&mut host, 30.0);
    assert_eq!(host.top[&0], -30.0);

    c.on_structural_change();
    host.header_defs = std::vec![true, false];
    c.on_scroll(&mut host, 40.0);
    assert_eq!(host.top[&0], -40.0);

    host.top.clear();
    assert!(c.on_quiescent(&mut host));
    assert!(!c.sticky().pinned().header);
    c.on_scroll(&mut host, 50.0);
    assert!(host.top.is_empty());
}

#[test]
fn unpaged_source_is_rejected() {
    struct Static;
    impl DataSource for Static {
        fn page_source(&mut self) -> Option<&mut dyn PageSource> {
            None
        }
    }

    let mut c = TableController::<usize, Box<dyn DataSource>, u32>::new(ScrollConfig::default());
    assert!(matches!(
        c.attach(Box::new(Static)),
        Err(AttachError::MissingPageSource)
    ));
    assert!(!c.pagination().is_attached());
}

#[test]
fn config_change_recomputes_range_and_page_size() {
    let mut c = controller(10);
    c.on_viewport_resized(500.0);
    let range = c.set_config(
        ScrollConfig::default()
            .with_page_size(25)
            .with_row_height(26.0),
    );
    assert_eq!(c.pagination().page_size(), 25);
    assert_eq!(range, c.range());
    assert_eq!(range.end, 31);
}

#[test]
fn teardown_releases_source_and_listeners() {
    let seen = Arc::new(Mutex::new(0usize));
    let mut c = Controller::new(ScrollConfig::default()).with_on_range_change(Some({
        let seen = Arc::clone(&seen);
        move |_: Range| *seen.lock().unwrap() += 1
    }));
    c.attach(Api::default()).unwrap();
    c.on_viewport_resized(500.0);
    assert_eq!(Arc::strong_count(&seen), 2);

    let source = c.teardown();
    assert_eq!(source.map(|api| api.pending.len()), Some(1));
    assert_eq!(Arc::strong_count(&seen), 1);
}

#[test]
fn state_snapshot_restores_scroll() {
    let mut c = controller(10);
    c.on_viewport_resized(500.0);
    let mut host = table();
    c.on_scroll(&mut host, 2_000.0);
    let state = c.state();
    assert_eq!(
        state.scroll,
        ScrollState {
            offset: 2_000.0,
            extent: 500.0
        }
    );

    let mut restored = controller(10);
    let range = restored.restore_scroll_state(state.scroll);
    assert_eq!(range, state.range);
    assert_eq!(restored.rendered_offset(), range.start as f64 * 52.0);
}
