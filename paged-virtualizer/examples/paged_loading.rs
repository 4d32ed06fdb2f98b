// Example: page fetches driven by range changes, served by an in-memory "backend".
use paged_virtualizer::{
    BoxError, DataSource, PageRequest, PageResult, PageSource, PaginationCoordinator,
    RangeStrategy, ScrollConfig, SettleOutcome,
};

const ROWS: usize = 134;

#[derive(Default)]
struct Backend {
    queue: Vec<PageRequest>,
}

impl PageSource for Backend {
    fn fetch_page(&mut self, request: PageRequest) {
        println!("fetch page={} size={}", request.page, request.page_size);
        self.queue.push(request);
    }
}

impl DataSource for Backend {
    fn page_source(&mut self) -> Option<&mut dyn PageSource> {
        Some(self)
    }
}

fn respond(request: &PageRequest) -> PageResult<String> {
    let start = request.start_index().min(ROWS);
    let end = (start + request.page_size).min(ROWS);
    PageResult::new(
        (start..end).map(|i| format!("row {i}")).collect(),
        request.page_size,
    )
}

fn main() -> Result<(), BoxError> {
    let config = ScrollConfig::default().with_page_size(50);
    let mut strategy = RangeStrategy::new(config);
    let mut pages = PaginationCoordinator::<String, Backend>::new(config.page_size);
    pages.attach(Backend::default())?;

    strategy.on_viewport_resized(500.0);
    let mut offset = 0.0;
    while !pages.dataset_length().is_exhausted_at(strategy.range().end) {
        let range = strategy.on_scroll(offset);
        pages.on_range(range);

        // Serve whatever was requested, one at a time.
        let pending = pages
            .source_mut()
            .map(|b| core::mem::take(&mut b.queue))
            .unwrap_or_default();
        for request in pending {
            let outcome = pages.settle(request.ticket, Ok::<_, BoxError>(respond(&request)))?;
            if let SettleOutcome::Applied(applied) = outcome {
                strategy.set_dataset_length(applied.length);
                println!(
                    "applied page={} inserted={} length={:?}",
                    applied.page, applied.inserted, applied.length
                );
            }
        }
        offset += 520.0;
    }

    println!(
        "final range={:?} loaded={} row[133]={:?}",
        strategy.range(),
        pages.buffer().loaded(),
        pages.row(133)
    );
    Ok(())
}
