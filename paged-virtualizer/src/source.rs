use crate::PageRequest;

/// Incremental page loading.
///
/// `fetch_page` only starts the load. The host delivers the outcome later through
/// [`crate::PaginationCoordinator::settle`], passing back `request.ticket`.
///
/// Implementations must tolerate repeated requests for the same page (retries happen after
/// failures and re-attachment), and must return fewer than `request.page_size` items exactly when
/// no more data exists.
pub trait PageSource {
    fn fetch_page(&mut self, request: PageRequest);
}

/// A data source that can be attached to a table.
///
/// Sources declare the paging capability by returning `Some` from `page_source`. Attaching a
/// source that returns `None` fails with [`crate::AttachError::MissingPageSource`].
pub trait DataSource {
    fn page_source(&mut self) -> Option<&mut dyn PageSource>;
}

impl<S: DataSource + ?Sized> DataSource for alloc::boxed::Box<S> {
    fn page_source(&mut self) -> Option<&mut dyn PageSource> {
        (**self).page_source()
    }
}
