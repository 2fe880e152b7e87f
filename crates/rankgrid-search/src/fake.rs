//! In-memory `RankedSearch` used by tracker and orchestrator tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::client::RankedSearch;
use crate::error::SearchError;
use crate::types::{SearchPage, SearchRequest, SearchResultItem};

pub(crate) enum FakePage {
    Items(Vec<SearchResultItem>),
    Fail(u16),
}

#[derive(Default)]
pub(crate) struct FakeSearch {
    pages: Vec<FakePage>,
    failing_latitudes: Vec<f64>,
    panicking_latitudes: Vec<f64>,
    delay: Duration,
    unconfigured: bool,
    calls: Mutex<Vec<SearchRequest>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    in_flight_at_call: Mutex<Vec<usize>>,
    started_at: Mutex<Vec<tokio::time::Instant>>,
}

pub(crate) fn item(title: &str, link: &str) -> SearchResultItem {
    SearchResultItem {
        title: title.to_owned(),
        link: Some(link.to_owned()),
        address: None,
        rating: None,
        review_count: None,
        phone_number: None,
        position: 0,
    }
}

/// A page of `https://<domain>/` results with page positions filled in.
pub(crate) fn page_of(domains: &[&str]) -> FakePage {
    FakePage::Items(
        domains
            .iter()
            .enumerate()
            .map(|(i, d)| {
                let mut it = item(&format!("Result {d}"), &format!("https://{d}/"));
                it.position = u32::try_from(i + 1).unwrap();
                it
            })
            .collect(),
    )
}

/// `n` filler results that never match `example.com`.
pub(crate) fn filler_page(n: usize) -> FakePage {
    let names: Vec<String> = (0..n).map(|i| format!("filler{i}.org")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    page_of(&refs)
}

impl FakeSearch {
    pub(crate) fn with_pages(pages: Vec<FakePage>) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }

    pub(crate) fn failing_at(mut self, latitude: f64) -> Self {
        self.failing_latitudes.push(latitude);
        self
    }

    pub(crate) fn panicking_at(mut self, latitude: f64) -> Self {
        self.panicking_latitudes.push(latitude);
        self
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn unconfigured(mut self) -> Self {
        self.unconfigured = true;
        self
    }

    pub(crate) fn calls(&self) -> Vec<SearchRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn requested_pages(&self) -> Vec<u32> {
        self.calls().iter().map(|r| r.page).collect()
    }

    pub(crate) fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Number of calls that started while nothing else was in flight; with a
    /// per-call delay this is the number of batches the caller issued.
    pub(crate) fn batches_observed(&self) -> usize {
        self.in_flight_at_call
            .lock()
            .unwrap()
            .iter()
            .filter(|&&n| n == 1)
            .count()
    }

    /// Tokio clock reading at the start of each call, in call order.
    pub(crate) fn call_starts(&self) -> Vec<tokio::time::Instant> {
        self.started_at.lock().unwrap().clone()
    }

    fn latitude_in(list: &[f64], request: &SearchRequest) -> bool {
        request
            .location
            .is_some_and(|at| list.iter().any(|lat| (lat - at.latitude).abs() < 1e-12))
    }
}

impl RankedSearch for FakeSearch {
    fn ensure_configured(&self) -> Result<(), SearchError> {
        if self.unconfigured {
            return Err(SearchError::MissingApiKey);
        }
        Ok(())
    }

    async fn fetch_page(&self, request: &SearchRequest) -> Result<SearchPage, SearchError> {
        self.calls.lock().unwrap().push(request.clone());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        self.in_flight_at_call.lock().unwrap().push(now);
        self.started_at
            .lock()
            .unwrap()
            .push(tokio::time::Instant::now());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if Self::latitude_in(&self.panicking_latitudes, request) {
            panic!("fake provider blew up");
        }

        let result = if Self::latitude_in(&self.failing_latitudes, request) {
            Err(SearchError::UnexpectedStatus {
                status: 500,
                url: "fake://places".to_owned(),
                body: "boom".to_owned(),
            })
        } else {
            let index = usize::try_from(request.page).unwrap() - 1;
            match self.pages.get(index) {
                Some(FakePage::Items(items)) => Ok(SearchPage {
                    items: items.clone(),
                }),
                Some(FakePage::Fail(status)) => Err(SearchError::UnexpectedStatus {
                    status: *status,
                    url: "fake://search".to_owned(),
                    body: "provider says no".to_owned(),
                }),
                None => Ok(SearchPage::default()),
            }
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
