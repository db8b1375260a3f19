use anyhow::Result;
use chrono::Local;
use tracing::{Event, Subscriber};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use crate::report::{ForwarderLayer, ForwarderSlot};

/// Console line format: `LEVEL [HH:MM:SS] target: message`
pub struct CustomFormatter;

impl<S, N> FormatEvent<S, N> for CustomFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        let timestamp = Local::now().format("%H:%M:%S");

        write!(
            writer,
            "{:<5} [{}] {}: ",
            metadata.level().as_str(),
            timestamp,
            metadata.target()
        )?;

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// Install the global subscriber.
///
/// Console output follows `RUST_LOG`, falling back to warnings only (debug
/// for this crate when `verbose`). Records of every level are also handed
/// to `slot`, which ships them while a leaf is running.
pub fn init(slot: ForwarderSlot, verbose: bool) -> Result<()> {
    let default_filter = if verbose {
        "reportportal_adapter=debug,warn"
    } else {
        "warn"
    };

    let console = tracing_subscriber::fmt::layer()
        .event_format(CustomFormatter)
        .with_writer(std::io::stderr)
        .with_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        );

    tracing_subscriber::registry()
        .with(console)
        .with(ForwarderLayer::new(slot).with_filter(LevelFilter::TRACE))
        .try_init()?;

    Ok(())
}
