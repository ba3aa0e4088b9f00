//! Progress-callback trait for per-page conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the pipeline walks each page.
//!
//! # Example
//!
//! ```rust
//! use edgequake_pdf2xml::{ConversionProgressCallback, ConversionConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct ItemCounter {
//!     items: AtomicUsize,
//! }
//!
//! impl ConversionProgressCallback for ItemCounter {
//!     fn on_page_complete(&self, _page_num: usize, _total_pages: usize, item_count: usize) {
//!         self.items.fetch_add(item_count, Ordering::SeqCst);
//!     }
//! }
//!
//! let counter = Arc::new(ItemCounter { items: AtomicUsize::new(0) });
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the conversion pipeline as it processes each page.
///
/// Pages are extracted on a blocking worker thread, so implementations must
/// be `Send + Sync`. Events arrive in page order. All methods default to
/// no-ops so callers only override what they care about.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once the page count is known, before the first page.
    ///
    /// # Arguments
    /// * `total_pages` — number of pages that will be converted
    fn on_conversion_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called before a page's text layer is loaded.
    ///
    /// # Arguments
    /// * `page_num`    — 1-indexed page number
    /// * `total_pages` — number of pages being converted
    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called after a page's text items were collected.
    ///
    /// # Arguments
    /// * `page_num`    — 1-indexed page number
    /// * `total_pages` — number of pages being converted
    /// * `item_count`  — text items extracted from the page
    fn on_page_complete(&self, page_num: usize, total_pages: usize, item_count: usize) {
        let _ = (page_num, total_pages, item_count);
    }

    /// Called once after the XML document has been rendered.
    fn on_conversion_complete(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called when the conversion aborts. No further events follow.
    fn on_conversion_failed(&self, error: &str) {
        let _ = error;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct TrackingCallback {
        started_total: AtomicUsize,
        pages: Mutex<Vec<usize>>,
        items: AtomicUsize,
        failures: Mutex<Vec<String>>,
    }

    impl ConversionProgressCallback for TrackingCallback {
        fn on_conversion_start(&self, total_pages: usize) {
            self.started_total.store(total_pages, Ordering::SeqCst);
        }

        fn on_page_complete(&self, page_num: usize, _total_pages: usize, item_count: usize) {
            self.pages.lock().unwrap().push(page_num);
            self.items.fetch_add(item_count, Ordering::SeqCst);
        }

        fn on_conversion_failed(&self, error: &str) {
            self.failures.lock().unwrap().push(error.to_string());
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_conversion_start(5);
        cb.on_page_start(1, 5);
        cb.on_page_complete(1, 5, 42);
        cb.on_conversion_complete(5);
        cb.on_conversion_failed("boom");
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();

        tracker.on_conversion_start(2);
        tracker.on_page_start(1, 2);
        tracker.on_page_complete(1, 2, 10);
        tracker.on_page_start(2, 2);
        tracker.on_page_complete(2, 2, 5);

        assert_eq!(tracker.started_total.load(Ordering::SeqCst), 2);
        assert_eq!(*tracker.pages.lock().unwrap(), vec![1, 2]);
        assert_eq!(tracker.items.load(Ordering::SeqCst), 15);

        tracker.on_conversion_failed("corrupt xref");
        assert_eq!(tracker.failures.lock().unwrap().len(), 1);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_conversion_start(10);
        cb.on_page_start(1, 10);
        cb.on_page_complete(1, 10, 512);
    }
}
