//! Logging setup.

use tracing::Subscriber;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{reload, EnvFilter, Registry};

/// Handle on the installed filter.
pub struct Logging {
    handle: reload::Handle<EnvFilter, Registry>,
    directives: String,
}

/// Silences logging until dropped.
pub struct Quiet<'a>(&'a Logging);

impl Logging {
    /// Turn logging off while a full-screen view owns the terminal.
    ///
    /// stderr shares the terminal with the alternate screen, so any line
    /// written there would be drawn over the form.
    pub fn quiet(&self) -> Quiet<'_> {
        if let Err(e) = self.handle.modify(|f| *f = EnvFilter::new("off")) {
            tracing::warn!(error = %e, "could not silence logging");
        }
        Quiet(self)
    }
}

impl Drop for Quiet<'_> {
    fn drop(&mut self) {
        let directives = &self.0.directives;
        // Nothing to report to if the subscriber is gone
        let _ = self.0.handle.modify(|f| *f = EnvFilter::new(directives));
    }
}

/// Install the global subscriber.
///
/// Honors `RUST_LOG` and defaults to `info`. Output goes to stderr so it
/// stays out of stdout reports.
pub fn init_logging(verbose: bool) -> anyhow::Result<Logging> {
    let default = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let (subscriber, logging) = build(env_filter);
    subscriber.try_init()?;

    Ok(logging)
}

fn build(env_filter: EnvFilter) -> (impl Subscriber + Send + Sync + 'static, Logging) {
    let directives = env_filter.to_string();
    let (filter, handle) = reload::Layer::new(env_filter);

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    let subscriber = tracing_subscriber::registry().with(filter).with(fmt_layer);
    (subscriber, Logging { handle, directives })
}
