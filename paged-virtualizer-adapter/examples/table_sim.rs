use paged_virtualizer::{
    BoxError, DataSource, PageRequest, PageResult, PageSource, Range, ScrollConfig, StickyBand,
    StickyHost,
};
use paged_virtualizer_adapter::TableController;

#[derive(Default)]
struct Remote {
    queue: Vec<PageRequest>,
}

impl PageSource for Remote {
    fn fetch_page(&mut self, request: PageRequest) {
        self.queue.push(request);
    }
}

impl DataSource for Remote {
    fn page_source(&mut self) -> Option<&mut dyn PageSource> {
        Some(self)
    }
}

/// A header row and a footer row, both sticky.
#[derive(Debug, Default)]
struct Dom {
    header_top: f64,
    footer_bottom: f64,
}

impl StickyHost for Dom {
    type RowId = u8;

    fn for_each_row_def(&self, _band: StickyBand, f: &mut dyn FnMut(bool)) {
        f(true);
    }

    fn measure_sticky_rows(&self, band: StickyBand, f: &mut dyn FnMut(&u8, f64)) {
        match band {
            StickyBand::Header => f(&0, 0.0),
            StickyBand::Footer => f(&1, 548.0),
        }
    }

    fn update_sticky_rows(&mut self, band: StickyBand, f: &mut dyn FnMut(&u8) -> f64) {
        match band {
            StickyBand::Header => self.header_top = f(&0),
            StickyBand::Footer => self.footer_bottom = f(&1),
        }
    }
}

fn main() -> Result<(), BoxError> {
    // Example: a host driving the controller the way a table component would.
    //
    // A host would:
    // - forward scroll and resize events
    // - run page requests against its backend and settle the results
    // - render `for_each_row`, with placeholders for rows still loading
    // - signal structural changes and the end of each render pass
    let config = ScrollConfig::default()
        .with_page_size(20)
        .with_footer_enabled(true);
    let mut c = TableController::<u32, Remote, u8>::new(config).with_on_range_change(Some(
        |r: Range| println!("range -> {}..{}", r.start, r.end),
    ));
    c.attach(Remote::default())?;

    let mut dom = Dom::default();
    c.on_viewport_resized(600.0);

    for step in 0..6 {
        c.on_scroll(&mut dom, step as f64 * 400.0);

        let requests = c
            .pagination()
            .source()
            .map(|r| r.queue.clone())
            .unwrap_or_default();
        if let Some(request) = requests.last() {
            let start = request.start_index() as u32;
            let rows = (start..start + request.page_size as u32).collect();
            c.settle(
                request.ticket,
                Ok::<_, BoxError>(PageResult::new(rows, request.page_size)),
            )?;
        }

        let mut placeholders = 0;
        c.for_each_row(|_, row| placeholders += usize::from(row.is_none()));
        println!(
            "step={step} state={:?} placeholders={placeholders} dom={dom:?}",
            c.state()
        );
        c.on_quiescent(&mut dom);
    }

    let _remote = c.teardown();
    Ok(())
}
