use std::any::Any;
use std::backtrace::Backtrace;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. Logs go to stderr; stdout carries the protocol.
///
/// `RUST_LOG` overrides the default `info` level.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(std::io::stderr);

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

/// Route panics through `tracing` so they land in the client's server log
/// instead of vanishing with the stdio transport.
pub fn setup_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "<unknown>".to_string());
        tracing::error!(
            %location,
            backtrace = %Backtrace::capture(),
            "server panicked: {}",
            panic_message(info.payload())
        );
    }));
}

/// Text of a panic payload; `panic!` produces either `&str` or `String`.
fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_panic_messages() {
        assert_eq!(panic_message(&"boom"), "boom");
        assert_eq!(panic_message(&String::from("lost ticket")), "lost ticket");
        assert_eq!(panic_message(&42_u32), "non-string panic payload");
    }

    #[test]
    fn init_twice_is_harmless() {
        init();
        init();
    }
}
