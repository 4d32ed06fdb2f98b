use alloc::sync::Arc;

use paged_virtualizer::{
    AttachError, BoxError, DataBuffer, DataSource, DatasetLength, FetchError, FetchTicket,
    PageRequest, PageResult, PaginationCoordinator, Range, RangeStrategy, RowKey, ScrollConfig,
    ScrollState, SettleOutcome, StickyHost, StickyOffsetEngine,
};

use crate::ControllerState;

/// A callback fired when the rendered range changes.
pub type OnRangeChange = Arc<dyn Fn(Range) + Send + Sync>;

/// A callback fired when a page fetch fails. Failures are recoverable: the page is requested
/// again on the next qualifying scroll tick.
pub type OnFetchError = Arc<dyn Fn(&FetchError) + Send + Sync>;

/// A framework-neutral controller that wires a [`RangeStrategy`], a [`PaginationCoordinator`] and
/// a [`StickyOffsetEngine`] into one event flow.
///
/// This type does not hold any UI objects. The host drives it by calling:
/// - `on_scroll` / `on_viewport_resized` when the viewport changes
/// - `settle` when a page fetch started through its [`paged_virtualizer::PageSource`] completes
/// - `on_structural_change` / `on_quiescent` around its own render passes
/// - `on_data_source_switched` when the table gets a new data source
///
/// Every call is processed to completion before returning; the only work that outlives a call is
/// an outstanding page fetch, whose result is accepted only if no newer fetch superseded it.
pub struct TableController<T, S, K> {
    strategy: RangeStrategy,
    pagination: PaginationCoordinator<T, S>,
    sticky: StickyOffsetEngine<K>,
    emitted: Range,
    on_range_change: Option<OnRangeChange>,
    on_fetch_error: Option<OnFetchError>,
}

impl<T, S: DataSource, K: RowKey + Clone> TableController<T, S, K> {
    pub fn new(config: ScrollConfig) -> Self {
        let strategy = RangeStrategy::new(config);
        let page_size = strategy.config().page_size;
        Self {
            strategy,
            pagination: PaginationCoordinator::new(page_size),
            sticky: StickyOffsetEngine::new(),
            emitted: Range::EMPTY,
            on_range_change: None,
            on_fetch_error: None,
        }
    }

    pub fn with_on_range_change(
        mut self,
        on_range_change: Option<impl Fn(Range) + Send + Sync + 'static>,
    ) -> Self {
        self.set_on_range_change(on_range_change);
        self
    }

    pub fn set_on_range_change(
        &mut self,
        on_range_change: Option<impl Fn(Range) + Send + Sync + 'static>,
    ) {
        self.on_range_change = on_range_change.map(|f| Arc::new(f) as _);
    }

    pub fn with_on_fetch_error(
        mut self,
        on_fetch_error: Option<impl Fn(&FetchError) + Send + Sync + 'static>,
    ) -> Self {
        self.set_on_fetch_error(on_fetch_error);
        self
    }

    pub fn set_on_fetch_error(
        &mut self,
        on_fetch_error: Option<impl Fn(&FetchError) + Send + Sync + 'static>,
    ) {
        self.on_fetch_error = on_fetch_error.map(|f| Arc::new(f) as _);
    }

    pub fn strategy(&self) -> &RangeStrategy {
        &self.strategy
    }

    pub fn pagination(&self) -> &PaginationCoordinator<T, S> {
        &self.pagination
    }

    pub fn sticky(&self) -> &StickyOffsetEngine<K> {
        &self.sticky
    }

    pub fn config(&self) -> &ScrollConfig {
        self.strategy.config()
    }

    /// Applies a new configuration. It takes effect with this recomputation.
    pub fn set_config(&mut self, config: ScrollConfig) -> Range {
        let range = self.strategy.set_config(config);
        self.pagination
            .set_page_size(self.strategy.config().page_size);
        self.drive(range);
        range
    }

    /// Attaches a data source, replacing the current one.
    ///
    /// Fails immediately when the source does not declare the paging capability. On success the
    /// dataset length and buffer reset, the sticky cache is invalidated, and the current range is
    /// re-evaluated (which fetches the first page once the viewport is laid out).
    pub fn attach(&mut self, source: S) -> Result<Option<S>, AttachError> {
        let previous = self.pagination.attach(source)?;
        vdebug!(replaced = previous.is_some(), "TableController::attach");
        self.sticky.structural_change();
        let range = self.strategy.set_dataset_length(DatasetLength::Unknown);
        self.drive(range);
        Ok(previous)
    }

    /// Host notification: the table switched to a new data source.
    pub fn on_data_source_switched(&mut self, source: S) -> Result<Option<S>, AttachError> {
        self.attach(source)
    }

    /// Detaches the current source and resets all pagination state.
    pub fn detach(&mut self) -> Option<S> {
        let source = self.pagination.detach();
        self.sticky.structural_change();
        let range = self.strategy.set_dataset_length(DatasetLength::Unknown);
        self.drive(range);
        source
    }

    /// Host notification: the scroll offset changed.
    ///
    /// Recomputes the range, fetches the frontier page if needed, and repositions sticky rows
    /// with the same offset.
    pub fn on_scroll<H>(&mut self, host: &mut H, offset: f64) -> Range
    where
        H: StickyHost<RowId = K> + ?Sized,
    {
        let range = self.strategy.on_scroll(offset);
        self.drive(range);
        self.sticky.apply_offset(host, offset);
        range
    }

    /// Host notification: the viewport extent changed.
    pub fn on_viewport_resized(&mut self, extent: f64) -> Range {
        let range = self.strategy.on_viewport_resized(extent);
        self.drive(range);
        range
    }

    /// Restores scroll geometry from a snapshot, e.g. when a table is re-mounted.
    pub fn restore_scroll_state(&mut self, state: ScrollState) -> Range {
        let range = self.strategy.restore_scroll_state(state);
        self.drive(range);
        range
    }

    /// Host notification: row definitions or sticky flags changed.
    pub fn on_structural_change(&mut self) {
        self.sticky.structural_change();
    }

    /// Host notification: the render pass finished. Returns `true` when sticky positions were
    /// rebuilt.
    pub fn on_quiescent<H>(&mut self, host: &mut H) -> bool
    where
        H: StickyHost<RowId = K> + ?Sized,
    {
        self.sticky.quiescent(host)
    }

    /// Delivers the outcome of a page fetch.
    ///
    /// Applied pages update the dataset length, which re-clamps the range (and may start the next
    /// fetch). Failures are reported to the fetch-error listener and returned.
    pub fn settle<E: Into<BoxError>>(
        &mut self,
        ticket: FetchTicket,
        result: Result<PageResult<T>, E>,
    ) -> Result<SettleOutcome, FetchError> {
        match self.pagination.settle(ticket, result) {
            Ok(SettleOutcome::Applied(applied)) => {
                let range = self.strategy.set_dataset_length(applied.length);
                self.drive(range);
                Ok(SettleOutcome::Applied(applied))
            }
            Ok(SettleOutcome::Discarded) => Ok(SettleOutcome::Discarded),
            Err(err) => {
                vwarn!(page = err.page(), "TableController: page fetch failed");
                if let Some(cb) = &self.on_fetch_error {
                    cb(&err);
                }
                Err(err)
            }
        }
    }

    pub fn range(&self) -> Range {
        self.strategy.range()
    }

    pub fn dataset_length(&self) -> DatasetLength {
        self.pagination.dataset_length()
    }

    pub fn buffer(&self) -> &DataBuffer<T> {
        self.pagination.buffer()
    }

    pub fn row(&self, index: usize) -> Option<&T> {
        self.pagination.row(index)
    }

    /// Offset at which the host places the first rendered row.
    pub fn rendered_offset(&self) -> f64 {
        self.strategy.rendered_offset()
    }

    /// Visits every index of the current range with its row, or `None` for rows that still need
    /// a placeholder.
    pub fn for_each_row(&self, mut f: impl FnMut(usize, Option<&T>)) {
        let range = self.strategy.range();
        for index in range.start..range.end {
            f(index, self.pagination.row(index));
        }
    }

    /// Returns a lightweight snapshot of the controller.
    pub fn state(&self) -> ControllerState {
        ControllerState {
            scroll: self.strategy.scroll_state(),
            range: self.strategy.range(),
            dataset_length: self.pagination.dataset_length(),
            loaded_rows: self.pagination.buffer().loaded(),
        }
    }

    /// Tears the controller down.
    ///
    /// Outstanding fetch interest is released and listeners are dropped; the detached source is
    /// returned. Results that arrive afterwards have nowhere to go.
    pub fn teardown(mut self) -> Option<S> {
        vdebug!("TableController::teardown");
        self.on_range_change = None;
        self.on_fetch_error = None;
        self.pagination.detach()
    }

    fn drive(&mut self, range: Range) -> Option<PageRequest> {
        if range != self.emitted {
            self.emitted = range;
            vtrace!(start = range.start, end = range.end, "TableController: range changed");
            if let Some(cb) = &self.on_range_change {
                cb(range);
            }
        }
        if !self.strategy.is_laid_out() {
            return None;
        }
        self.pagination.on_range(range)
    }
}

impl<T, S, K> core::fmt::Debug for TableController<T, S, K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TableController")
            .field("strategy", &self.strategy)
            .field("emitted", &self.emitted)
            .finish_non_exhaustive()
    }
}
