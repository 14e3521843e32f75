use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("edu_assistant.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter =
    Counter::new("edu_assistant.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("edu_assistant.client.request_duration_seconds");

pub(crate) static STREAM_CHUNKS: Counter = Counter::new("edu_assistant.stream.chunks");
pub(crate) static STREAM_ERRORS: Counter = Counter::new("edu_assistant.stream.errors");
pub(crate) static STREAM_BYTES: Counter = Counter::new("edu_assistant.stream.bytes");
pub(crate) static STREAM_TTFB: Moments = Moments::new("edu_assistant.stream.ttfb_seconds");
pub(crate) static STREAM_DURATION: Moments =
    Moments::new("edu_assistant.stream.duration_seconds");

pub(crate) static CHAT_SESSION_INITS: Counter = Counter::new("edu_assistant.chat.session_inits");
pub(crate) static CHAT_SESSION_INIT_FAILURES: Counter =
    Counter::new("edu_assistant.chat.session_init_failures");
pub(crate) static CHAT_TURNS: Counter = Counter::new("edu_assistant.chat.turns");
pub(crate) static CHAT_TURN_FAILURES: Counter = Counter::new("edu_assistant.chat.turn_failures");
pub(crate) static CHAT_SUBMITS_REJECTED: Counter =
    Counter::new("edu_assistant.chat.submits_rejected");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&STREAM_CHUNKS);
    collector.register_counter(&STREAM_ERRORS);
    collector.register_counter(&STREAM_BYTES);
    collector.register_moments(&STREAM_TTFB);
    collector.register_moments(&STREAM_DURATION);

    collector.register_counter(&CHAT_SESSION_INITS);
    collector.register_counter(&CHAT_SESSION_INIT_FAILURES);
    collector.register_counter(&CHAT_TURNS);
    collector.register_counter(&CHAT_TURN_FAILURES);
    collector.register_counter(&CHAT_SUBMITS_REJECTED);
}
