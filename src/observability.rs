use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("vtwo.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("vtwo.client.request_errors");
pub(crate) static CLIENT_REQUEST_RETRIES: Counter = Counter::new("vtwo.client.retries");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("vtwo.client.request_duration_seconds");
pub(crate) static CLIENT_RETRY_BACKOFF: Moments = Moments::new("vtwo.client.retry_backoff_seconds");

pub(crate) static STREAM_CHUNKS: Counter = Counter::new("vtwo.stream.chunks");
pub(crate) static STREAM_ERRORS: Counter = Counter::new("vtwo.stream.errors");
pub(crate) static STREAM_BYTES: Counter = Counter::new("vtwo.stream.bytes");
pub(crate) static STREAM_INTERRUPTS: Counter = Counter::new("vtwo.stream.interrupts");

pub(crate) static NOTES_FILES: Counter = Counter::new("vtwo.notes.files");
pub(crate) static NOTES_SKIPPED: Counter = Counter::new("vtwo.notes.skipped");
pub(crate) static NOTES_SECTIONS: Counter = Counter::new("vtwo.notes.sections");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_counter(&CLIENT_REQUEST_RETRIES);
    collector.register_moments(&CLIENT_REQUEST_DURATION);
    collector.register_moments(&CLIENT_RETRY_BACKOFF);

    collector.register_counter(&STREAM_CHUNKS);
    collector.register_counter(&STREAM_ERRORS);
    collector.register_counter(&STREAM_BYTES);
    collector.register_counter(&STREAM_INTERRUPTS);

    collector.register_counter(&NOTES_FILES);
    collector.register_counter(&NOTES_SKIPPED);
    collector.register_counter(&NOTES_SECTIONS);
}

#[cfg(test)]
mod tests {
    use super::*;
    use biometrics::Sensor;

    #[test]
    fn register_all() {
        register_biometrics(Collector::new());
    }

    #[test]
    fn counters_advance() {
        let before = NOTES_SKIPPED.read();
        NOTES_SKIPPED.click();
        assert!(NOTES_SKIPPED.read() > before);
    }
}
