use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    ingest_requests: AtomicU64,
    ingest_records: AtomicU64,
    ingest_rejected: AtomicU64,
    ingest_unauthorized: AtomicU64,
    storage_errors: AtomicU64,
}

impl Metrics {
    pub fn record_request(&self) {
        self.ingest_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ingest(&self, record_count: usize) {
        self.ingest_records
            .fetch_add(record_count as u64, Ordering::Relaxed);
    }

    pub fn record_rejected(&self) {
        self.ingest_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_unauthorized(&self) {
        self.ingest_unauthorized.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_storage_error(&self) {
        self.storage_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn render_prometheus(&self) -> String {
        let requests = self.ingest_requests.load(Ordering::Relaxed);
        let records = self.ingest_records.load(Ordering::Relaxed);
        let rejected = self.ingest_rejected.load(Ordering::Relaxed);
        let unauthorized = self.ingest_unauthorized.load(Ordering::Relaxed);
        let storage_errors = self.storage_errors.load(Ordering::Relaxed);

        format!(
            "# TYPE ingesta_raw_requests_total counter\n\
ingesta_raw_requests_total {}\n\
# TYPE ingesta_raw_records_total counter\n\
ingesta_raw_records_total {}\n\
# TYPE ingesta_raw_rejected_total counter\n\
ingesta_raw_rejected_total {}\n\
# TYPE ingesta_raw_unauthorized_total counter\n\
ingesta_raw_unauthorized_total {}\n\
# TYPE ingesta_raw_storage_errors_total counter\n\
ingesta_raw_storage_errors_total {}\n",
            requests, records, rejected, unauthorized, storage_errors
        )
    }
}
