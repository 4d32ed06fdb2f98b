use alloc::boxed::Box;

/// Type-erased error reported by a page provider.
pub type BoxError = Box<dyn core::error::Error + Send + Sync + 'static>;

/// Returned by `attach` when the data source cannot be paginated.
///
/// This is an integration error: the source was wired up without declaring the paging
/// capability. The previous attachment, if any, is left untouched.
#[derive(Debug, thiserror::Error)]
pub enum AttachError {
    #[error("data source does not provide a page source")]
    MissingPageSource,
}

/// A page fetch that failed.
///
/// Failures never mutate the dataset length or the buffer. The same page is requested again on
/// the next range change that reaches it.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to fetch page {page}")]
    Provider {
        page: usize,
        #[source]
        source: BoxError,
    },
}

impl FetchError {
    pub fn page(&self) -> usize {
        match self {
            Self::Provider { page, .. } => *page,
        }
    }
}
