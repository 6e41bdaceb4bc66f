//! The `Date` header value, refreshed in the background.
//!
//! Formatting an HTTP date on every response is wasted work when thousands of
//! responses share the same second, so a task rewrites the cached value every
//! 700ms and responses only load it.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use arc_swap::ArcSwap;
use http::HeaderValue;
use httpdate::fmt_http_date;
use tokio::task::JoinHandle;

pub(crate) struct DateService {
    current: Arc<ArcSwap<String>>,
    handle: JoinHandle<()>,
}

impl DateService {
    /// Starts the refresh task; must be called inside a tokio runtime.
    pub(crate) fn new() -> Self {
        let current = Arc::new(ArcSwap::from_pointee(fmt_http_date(SystemTime::now())));
        let current_arc = Arc::clone(&current);

        let handle = tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_millis(700)).await;
                current_arc.store(Arc::new(fmt_http_date(SystemTime::now())));
            }
        });

        DateService { current, handle }
    }

    pub(crate) fn header_value(&self) -> Option<HeaderValue> {
        HeaderValue::from_str(self.current.load().as_str()).ok()
    }
}

impl Drop for DateService {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
