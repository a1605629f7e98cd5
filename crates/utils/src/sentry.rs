use std::sync::OnceLock;

use sentry_tracing::{EventFilter, SentryLayer};
use tracing::Level;

static INIT_GUARD: OnceLock<Option<sentry::ClientInitGuard>> = OnceLock::new();

/// Initialise the Sentry client once per process. Does nothing unless `SENTRY_DSN` is set.
pub fn init_once(environment: &str) {
    INIT_GUARD.get_or_init(|| {
        let dsn = std::env::var("SENTRY_DSN").ok().filter(|dsn| !dsn.trim().is_empty())?;
        Some(sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                environment: Some(environment.to_string().into()),
                ..Default::default()
            },
        )))
    });
}

pub fn sentry_layer<S>() -> SentryLayer<S>
where
    S: tracing::Subscriber,
    S: for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    SentryLayer::default()
        .span_filter(|meta| {
            matches!(
                *meta.level(),
                Level::DEBUG | Level::INFO | Level::WARN | Level::ERROR
            )
        })
        .event_filter(|meta| match *meta.level() {
            Level::ERROR => EventFilter::Event,
            Level::DEBUG | Level::INFO | Level::WARN => EventFilter::Breadcrumb,
            Level::TRACE => EventFilter::Ignore,
        })
}
