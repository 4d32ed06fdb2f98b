use crate::StickyBand;
use crate::key::{KeyOffsetMap, RowKey};

/// The rendering engine as seen by the [`StickyOffsetEngine`].
///
/// Row identities only need to be stable within one cache lifetime; the cache is rebuilt from
/// scratch after every structural change.
pub trait StickyHost {
    type RowId: RowKey + Clone;

    /// Reports the `sticky` flag of every row definition in `band`.
    fn for_each_row_def(&self, band: StickyBand, f: &mut dyn FnMut(bool));

    /// Reports every currently rendered sticky row in `band` with its natural offset from the
    /// container top at a resting scroll position.
    fn measure_sticky_rows(&self, band: StickyBand, f: &mut dyn FnMut(&Self::RowId, f64));

    /// Visits every currently rendered sticky row in `band` and writes the visual offset returned
    /// by `f` (the `top` offset for headers, the `bottom` offset for footers).
    fn update_sticky_rows(&mut self, band: StickyBand, f: &mut dyn FnMut(&Self::RowId) -> f64);
}

/// Lifecycle of the [`StickyOffsetEngine`] position cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StickyState {
    /// No positions have been sampled yet.
    Uninitialized,
    Built,
    /// A structural change arrived; the cache is rebuilt on the next quiescent signal.
    Invalid,
}

/// Which bands are pinned. A band is pinned only when all of its row definitions are sticky.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PinnedBands {
    pub header: bool,
    pub footer: bool,
}

impl PinnedBands {
    pub fn is_pinned(&self, band: StickyBand) -> bool {
        match band {
            StickyBand::Header => self.header,
            StickyBand::Footer => self.footer,
        }
    }
}

/// Keeps header/footer rows visually pinned while virtualization keeps rebuilding the rendered
/// rows underneath them.
///
/// Natural offsets are sampled once per cache lifetime and stored per row identity: header rows
/// store their offset from the top, footer rows store it negated so both bands share the same
/// arithmetic. On every scroll offset the engine rewrites
/// - header `top = base - offset`
/// - footer `bottom = offset - base`
///
/// Structural changes only mark the cache invalid. The rebuild waits for
/// [`StickyOffsetEngine::quiescent`], so offsets are never sampled mid-layout, and any number of
/// invalidations before that point coalesce into a single rebuild.
#[derive(Clone, Debug)]
pub struct StickyOffsetEngine<K> {
    state: StickyState,
    positions: KeyOffsetMap<K>,
    pinned: PinnedBands,
    last_offset: Option<f64>,
}

impl<K: RowKey + Clone> Default for StickyOffsetEngine<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: RowKey + Clone> StickyOffsetEngine<K> {
    pub fn new() -> Self {
        Self {
            state: StickyState::Uninitialized,
            positions: KeyOffsetMap::<K>::new(),
            pinned: PinnedBands::default(),
            last_offset: None,
        }
    }

    pub fn state(&self) -> StickyState {
        self.state
    }

    pub fn pinned(&self) -> PinnedBands {
        self.pinned
    }

    /// Cached base offset for `row` (negated for footer rows).
    pub fn base_offset(&self, row: &K) -> Option<f64> {
        self.positions.get(row).copied()
    }

    pub fn cached_rows(&self) -> usize {
        self.positions.len()
    }

    pub fn last_offset(&self) -> Option<f64> {
        self.last_offset
    }

    /// Row definitions, sticky flags or the data source changed.
    pub fn structural_change(&mut self) {
        if self.state == StickyState::Built {
            vdebug!("StickyOffsetEngine: cache invalidated");
            self.state = StickyState::Invalid;
        }
    }

    /// The host finished its render pass. Rebuilds a pending invalid cache and re-applies the last
    /// offset. Returns `true` when a rebuild happened.
    pub fn quiescent<H>(&mut self, host: &mut H) -> bool
    where
        H: StickyHost<RowId = K> + ?Sized,
    {
        if self.state != StickyState::Invalid {
            return false;
        }
        self.rebuild(host);
        if let Some(offset) = self.last_offset {
            self.write(host, offset);
        }
        true
    }

    /// Applies a scroll offset to every pinned row. Returns the number of rows written.
    ///
    /// The first call builds the cache. While the cache is invalid, the previous positions stay in
    /// use until the host reaches quiescence.
    pub fn apply_offset<H>(&mut self, host: &mut H, offset: f64) -> usize
    where
        H: StickyHost<RowId = K> + ?Sized,
    {
        self.last_offset = Some(offset);
        if self.state == StickyState::Uninitialized {
            self.rebuild(host);
        }
        self.write(host, offset)
    }

    /// Forgets everything, as if freshly created.
    pub fn reset(&mut self) {
        self.state = StickyState::Uninitialized;
        self.positions.clear();
        self.pinned = PinnedBands::default();
        self.last_offset = None;
    }

    fn rebuild<H>(&mut self, host: &H)
    where
        H: StickyHost<RowId = K> + ?Sized,
    {
        self.positions.clear();
        self.pinned = PinnedBands {
            header: band_is_pinned(host, StickyBand::Header),
            footer: band_is_pinned(host, StickyBand::Footer),
        };

        let positions = &mut self.positions;
        if self.pinned.header {
            host.measure_sticky_rows(StickyBand::Header, &mut |row, natural| {
                positions.entry(row.clone()).or_insert(natural);
            });
        }
        if self.pinned.footer {
            host.measure_sticky_rows(StickyBand::Footer, &mut |row, natural| {
                positions.entry(row.clone()).or_insert(-natural);
            });
        }

        self.state = StickyState::Built;
        vdebug!(
            header = self.pinned.header,
            footer = self.pinned.footer,
            rows = self.positions.len(),
            "StickyOffsetEngine: cache built"
        );
    }

    fn write<H>(&self, host: &mut H, offset: f64) -> usize
    where
        H: StickyHost<RowId = K> + ?Sized,
    {
        let mut written = 0usize;
        if self.pinned.header {
            host.update_sticky_rows(StickyBand::Header, &mut |row| {
                written += 1;
                self.base_or_zero(row) - offset
            });
        }
        if self.pinned.footer {
            host.update_sticky_rows(StickyBand::Footer, &mut |row| {
                written += 1;
                offset - self.base_or_zero(row)
            });
        }
        written
    }

    // Rows rendered after the cache was built have no entry yet.
    fn base_or_zero(&self, row: &K) -> f64 {
        self.positions.get(row).copied().unwrap_or(0.0)
    }
}

fn band_is_pinned<H: StickyHost + ?Sized>(host: &H, band: StickyBand) -> bool {
    let mut all_sticky = true;
    host.for_each_row_def(band, &mut |sticky| all_sticky &= sticky);
    all_sticky
}
