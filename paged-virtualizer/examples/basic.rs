// Example: mapping scroll offsets to rendered row windows.
use paged_virtualizer::{DatasetLength, RangeStrategy, ScrollConfig, compute_range};

fn main() {
    let config = ScrollConfig::default();
    let r = compute_range(&config, DatasetLength::Unknown, 0.0, 500.0);
    println!("initial range={r:?}");

    let mut s = RangeStrategy::new(config.with_buffer_multiplier(0.0));
    s.on_viewport_resized(500.0);
    for offset in [0.0, 1_000.0, 5_000.0] {
        let r = s.on_scroll(offset);
        println!(
            "offset={offset} range={r:?} rendered_offset={}",
            s.rendered_offset()
        );
    }

    // Once the length is known the window stops at the last row.
    let r = s.set_dataset_length(DatasetLength::Known(100));
    println!("clamped range={r:?} total_extent={:?}", s.total_extent());
}
