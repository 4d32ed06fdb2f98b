use crate::DatasetLength;

/// Outcome of [`DatasetLengthTracker::finalize`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LengthUpdate {
    /// The length went from unknown to known.
    Finalized,
    /// The length was already known with the same value.
    Unchanged,
    /// The length was already known with a different value; the new value was ignored.
    Rejected,
}

/// Single source of truth for the dataset length of one attachment.
///
/// The length starts `Unknown`, becomes `Known` at most once, and only returns to `Unknown`
/// through [`DatasetLengthTracker::reset`] (when the data source is swapped).
///
/// While the length is unknown the tracker may also hold an upper bound: an empty page proves
/// that no row exists at or past its start, but not where the data actually ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DatasetLengthTracker {
    length: DatasetLength,
    upper_bound: Option<usize>,
}

impl DatasetLengthTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> DatasetLength {
        self.length
    }

    pub fn is_known(&self) -> bool {
        self.length.is_known()
    }

    pub fn reset(&mut self) {
        self.length = DatasetLength::Unknown;
        self.upper_bound = None;
    }

    /// Largest length still possible while the length is unknown.
    pub fn upper_bound(&self) -> Option<usize> {
        match self.length {
            DatasetLength::Unknown => self.upper_bound,
            DatasetLength::Known(_) => None,
        }
    }

    /// Records that the dataset holds at most `bound` rows. Only ever tightens.
    pub fn limit(&mut self, bound: usize) {
        if self.length.is_known() {
            return;
        }
        let bound = self.upper_bound.map_or(bound, |b| b.min(bound));
        vdebug!(bound, "DatasetLengthTracker: length bounded");
        self.upper_bound = Some(bound);
    }

    /// Records that rows exist up to `end` (exclusive).
    ///
    /// Reaching the upper bound exactly makes the length known. Rows past the bound contradict
    /// it, so the bound is dropped.
    pub fn observe_rows(&mut self, end: usize) -> Option<LengthUpdate> {
        let bound = self.upper_bound()?;
        if end == bound {
            return Some(self.finalize(end));
        }
        if end > bound {
            vwarn!(bound, end, "DatasetLengthTracker: rows past the bound, dropping it");
            self.upper_bound = None;
        }
        None
    }

    /// Records the total announced by a terminal page.
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    pub fn finalize(&mut self, total: usize) -> LengthUpdate {
        match self.length {
            DatasetLength::Unknown => {
                vdebug!(total, "DatasetLengthTracker: length finalized");
                self.length = DatasetLength::Known(total);
                LengthUpdate::Finalized
            }
            DatasetLength::Known(n) if n == total => LengthUpdate::Unchanged,
            DatasetLength::Known(n) => {
                vwarn!(
                    known = n,
                    rejected = total,
                    "DatasetLengthTracker: ignoring contradicting terminal length"
                );
                LengthUpdate::Rejected
            }
        }
    }
}
