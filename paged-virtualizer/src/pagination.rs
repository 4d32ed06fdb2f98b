use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use crate::length::DatasetLengthTracker;
use crate::options::{page_for_index, page_start};
use crate::{AttachError, BoxError, DataBuffer, DataSource, DatasetLength, FetchError, Range};

/// Identifies one issued fetch. Only the ticket of the most recent fetch is accepted by
/// [`PaginationCoordinator::settle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FetchTicket {
    pub page: usize,
    pub generation: u64,
}

/// A request for one page, handed to [`crate::PageSource::fetch_page`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageRequest {
    /// 1-based page number.
    pub page: usize,
    pub page_size: usize,
    pub ticket: FetchTicket,
}

impl PageRequest {
    /// Index of the first row covered by this page.
    pub fn start_index(&self) -> usize {
        page_start(self.page, self.page_size)
    }
}

/// One page returned by a provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    /// `true` when this is the last page of the dataset.
    pub terminal: bool,
    /// Total row count, when the provider knows it. Only read for terminal pages.
    pub total: Option<usize>,
}

impl<T> PageResult<T> {
    /// A page whose terminal flag follows the provider contract: fewer than `page_size` items
    /// means there is no more data.
    pub fn new(items: Vec<T>, page_size: usize) -> Self {
        let terminal = items.len() < page_size;
        Self {
            items,
            terminal,
            total: None,
        }
    }

    /// A terminal page with an explicit dataset total.
    pub fn last(items: Vec<T>, total: usize) -> Self {
        Self {
            items,
            terminal: true,
            total: Some(total),
        }
    }
}

/// Summary of a page that was written into the buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageApplied {
    pub page: usize,
    /// Number of buffer slots that went from empty to loaded.
    pub inserted: usize,
    pub terminal: bool,
    /// Dataset length after the page was applied.
    pub length: DatasetLength,
}

/// Outcome of a successful [`PaginationCoordinator::settle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettleOutcome {
    Applied(PageApplied),
    /// The ticket was superseded by a newer fetch or belongs to a previous attachment.
    Discarded,
}

/// Turns range changes into deduplicated, supersession-aware page fetches.
///
/// The coordinator owns the attached data source, the dataset length and the row buffer. All
/// of it is per-attachment state: [`PaginationCoordinator::attach`] and
/// [`PaginationCoordinator::detach`] reset it wholesale.
///
/// Fetches are asynchronous. [`PaginationCoordinator::on_range`] starts one through the
/// source's [`crate::PageSource`], and the host later hands the outcome to
/// [`PaginationCoordinator::settle`]. A newer fetch supersedes an outstanding one; the old result
/// is dropped when it arrives ("latest wins"). Generations keep increasing across attachments,
/// so results from a previous source can never be applied.
#[derive(Debug)]
pub struct PaginationCoordinator<T, S> {
    page_size: usize,
    source: Option<S>,
    generation: u64,
    last_requested: Option<usize>,
    in_flight: Option<PageRequest>,
    loaded_pages: BTreeSet<usize>,
    length: DatasetLengthTracker,
    buffer: DataBuffer<T>,
}

impl<T, S: DataSource> PaginationCoordinator<T, S> {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            source: None,
            generation: 0,
            last_requested: None,
            in_flight: None,
            loaded_pages: BTreeSet::new(),
            length: DatasetLengthTracker::new(),
            buffer: DataBuffer::new(),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Changes the page size used for future requests.
    ///
    /// Rows already in the buffer stay where they are. Page bookkeeping is forgotten because page
    /// numbers no longer map to the same rows; an outstanding fetch still lands at the position
    /// it was requested for.
    pub fn set_page_size(&mut self, page_size: usize) {
        let page_size = page_size.max(1);
        if self.page_size == page_size {
            return;
        }
        vdebug!(
            from = self.page_size,
            to = page_size,
            "PaginationCoordinator::set_page_size"
        );
        self.page_size = page_size;
        self.last_requested = None;
        self.loaded_pages.clear();
    }

    /// Attaches `source`, replacing the current attachment.
    ///
    /// Fails without side effects when the source does not declare the paging capability.
    /// Otherwise the previous source is returned, its in-flight fetch is abandoned, the dataset
    /// length resets to unknown and the buffer is cleared.
    pub fn attach(&mut self, mut source: S) -> Result<Option<S>, AttachError> {
        if source.page_source().is_none() {
            vwarn!("PaginationCoordinator::attach: data source is not paginated");
            return Err(AttachError::MissingPageSource);
        }
        let previous = self.detach();
        self.source = Some(source);
        vdebug!(
            page_size = self.page_size,
            replaced = previous.is_some(),
            "PaginationCoordinator::attach"
        );
        Ok(previous)
    }

    /// Detaches the current source and resets all per-attachment state.
    pub fn detach(&mut self) -> Option<S> {
        if self.in_flight.take().is_some() {
            vdebug!("PaginationCoordinator: dropping interest in in-flight fetch");
        }
        self.last_requested = None;
        self.loaded_pages.clear();
        self.length.reset();
        self.buffer.clear();
        self.source.take()
    }

    pub fn is_attached(&self) -> bool {
        self.source.is_some()
    }

    pub fn source(&self) -> Option<&S> {
        self.source.as_ref()
    }

    pub fn source_mut(&mut self) -> Option<&mut S> {
        self.source.as_mut()
    }

    pub fn dataset_length(&self) -> DatasetLength {
        self.length.get()
    }

    /// Upper bound on the dataset length, learned from an empty page, while the length
    /// itself is still unknown.
    pub fn length_upper_bound(&self) -> Option<usize> {
        self.length.upper_bound()
    }

    pub fn buffer(&self) -> &DataBuffer<T> {
        &self.buffer
    }

    pub fn row(&self, index: usize) -> Option<&T> {
        self.buffer.get(index)
    }

    pub fn last_requested_page(&self) -> Option<usize> {
        self.last_requested
    }

    pub fn in_flight(&self) -> Option<PageRequest> {
        self.in_flight
    }

    pub fn is_page_loaded(&self, page: usize) -> bool {
        self.loaded_pages.contains(&page)
    }

    /// `max(1, floor(index / page_size))`.
    pub fn page_for_index(&self, index: usize) -> usize {
        page_for_index(index, self.page_size)
    }

    /// Reacts to a range emission. Returns the request that was issued, if any.
    ///
    /// Nothing is fetched when no source is attached, when `range.end` is `0`, when the dataset
    /// is known and already exhausted at the frontier, when the frontier page was the last one
    /// requested, or when that page is already loaded.
    ///
    /// A frontier page that starts at or past a known upper bound holds no rows; the last page
    /// below the bound is requested instead.
    pub fn on_range(&mut self, range: Range) -> Option<PageRequest> {
        if self.source.is_none() || range.end == 0 {
            return None;
        }
        if self.length.get().is_exhausted_at(range.end) {
            return None;
        }

        let mut page = self.page_for_index(range.end);
        if let Some(bound) = self.length.upper_bound() {
            if page_start(page, self.page_size) >= bound {
                page = bound.div_ceil(self.page_size).max(1);
            }
        }
        if self.last_requested == Some(page) {
            vtrace!(page, "PaginationCoordinator: page already requested");
            return None;
        }
        if self.loaded_pages.contains(&page) {
            vtrace!(page, "PaginationCoordinator: page already loaded");
            return None;
        }

        self.generation = self.generation.wrapping_add(1);
        let request = PageRequest {
            page,
            page_size: self.page_size,
            ticket: FetchTicket {
                page,
                generation: self.generation,
            },
        };

        let page_source = self.source.as_mut().and_then(|s| s.page_source());
        let Some(page_source) = page_source else {
            vwarn!(page, "PaginationCoordinator: data source lost its page source");
            return None;
        };

        if self.in_flight.replace(request).is_some() {
            vdebug!(page, "PaginationCoordinator: superseding in-flight fetch");
        }
        self.last_requested = Some(page);
        vdebug!(
            page,
            generation = self.generation,
            "PaginationCoordinator: fetching page"
        );
        page_source.fetch_page(request);
        Some(request)
    }

    /// Delivers the outcome of a fetch.
    ///
    /// Results for anything but the current in-flight ticket are discarded without touching
    /// state. A failure clears the deduplication key so the page can be requested again, and is
    /// returned as a recoverable [`FetchError`].
    pub fn settle<E: Into<BoxError>>(
        &mut self,
        ticket: FetchTicket,
        result: Result<PageResult<T>, E>,
    ) -> Result<SettleOutcome, FetchError> {
        let request = match self.in_flight {
            Some(request) if request.ticket == ticket => request,
            _ => {
                vdebug!(
                    page = ticket.page,
                    generation = ticket.generation,
                    "PaginationCoordinator: discarding stale result"
                );
                return Ok(SettleOutcome::Discarded);
            }
        };
        self.in_flight = None;

        match result {
            Ok(page_result) => Ok(SettleOutcome::Applied(self.apply(request, page_result))),
            Err(err) => {
                if self.last_requested == Some(request.page) {
                    self.last_requested = None;
                }
                vwarn!(page = request.page, "PaginationCoordinator: fetch failed");
                Err(FetchError::Provider {
                    page: request.page,
                    source: err.into(),
                })
            }
        }
    }

    fn apply(&mut self, request: PageRequest, result: PageResult<T>) -> PageApplied {
        let PageResult {
            mut items,
            terminal,
            total,
        } = result;
        let start = request.start_index();
        let terminal = terminal || items.len() < request.page_size;
        let end = start.saturating_add(items.len());
        // An empty page only proves where the data ends when the row before it exists.
        let ends_here = !items.is_empty() || start == 0 || self.buffer.is_loaded(start - 1);

        // A known length is final; rows past it are never stored.
        if let DatasetLength::Known(n) = self.length.get() {
            items.truncate(n.saturating_sub(start));
        }

        let inserted = self.buffer.write(start, items);
        // Page numbers from before a page-size change describe different rows.
        if request.page_size == self.page_size {
            self.loaded_pages.insert(request.page);
        }
        match (terminal, total) {
            (true, Some(total)) => {
                self.length.finalize(total);
            }
            (true, None) if ends_here => {
                self.length.finalize(end);
            }
            (true, None) => self.length.limit(start),
            (false, _) => {
                self.length.observe_rows(end);
            }
        }

        vdebug!(
            page = request.page,
            inserted,
            terminal,
            "PaginationCoordinator: page applied"
        );
        PageApplied {
            page: request.page,
            inserted,
            terminal,
            length: self.length.get(),
        }
    }
}
