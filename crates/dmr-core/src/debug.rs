use core::fmt;
use std::sync::Once;
use std::fs::OpenOptions;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt as tracingfmt, EnvFilter};
use tracing_subscriber::prelude::*;
use tracing_subscriber::fmt::format::{self, FormatEvent, FormatFields};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::registry::LookupSpan;


/// If `cond` is false, logs a warning with your message instead of panicking.
#[macro_export]
macro_rules! assert_warn {
    ($cond:expr, $($arg:tt)+) => {{
        if !$cond {
            tracing::warn!(
                target: module_path!(),
                "assertion warning: `{}` failed: {} at {}:{}",
                stringify!($cond),
                format_args!($($arg)+),
                file!(),
                line!(),
            );
        }
    }};
}

/// Event formatter printing "LEVEL t=<ms> [crate/module] file:line: message", message column aligned.
struct AlignedFormatter;

/// Pulls the optional `t` field (stream time in ms) out of an event
struct StreamTimeVisitor {
    t: Option<String>,
}

impl tracing::field::Visit for StreamTimeVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        if field.name() == "t" {
            self.t = Some(format!("{:?}", value));
        }
    }
}

/// "crates/dmr-decoder/src/sync/correlator.rs" becomes "[decoder/sync] correlator.rs"
fn short_source_path(file_path: &str) -> String {
    let Some(src_idx) = file_path.find("/src/") else {
        return file_path.to_string();
    };
    let before_src = &file_path[..src_idx];
    let after_src = &file_path[src_idx + 5..];

    let crate_name = match before_src.rfind("dmr-") {
        Some(idx) => &before_src[idx + 4..],
        None => before_src.rsplit('/').next().unwrap_or("unknown"),
    };

    match after_src.rfind('/') {
        Some(last_slash) => {
            let first_module = after_src[..last_slash].split('/').next().unwrap_or("");
            format!("[{}/{}] {}", crate_name, first_module, &after_src[last_slash + 1..])
        }
        None => format!("[{}] {}", crate_name, after_src),
    }
}

impl<S, N> FormatEvent<S, N> for AlignedFormatter
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();

        let mut visitor = StreamTimeVisitor { t: None };
        event.record(&mut visitor);
        let time_col = match &visitor.t {
            Some(t) => format!("t={:>9}", t),
            None => " ".repeat(11),
        };

        let color = match *metadata.level() {
            tracing::Level::ERROR => "\x1b[31m",
            tracing::Level::WARN => "\x1b[33m",
            tracing::Level::INFO => "\x1b[32m",
            tracing::Level::DEBUG => "\x1b[34m",
            tracing::Level::TRACE => "\x1b[35m",
        };

        let location = format!(
            "{}{:<5}\x1b[0m {} {}:{}:",
            color,
            metadata.level(),
            time_col,
            short_source_path(metadata.file().unwrap_or("unknown")),
            metadata.line().unwrap_or(0)
        );

        let mut message_buf = String::new();
        ctx.field_format().format_fields(format::Writer::new(&mut message_buf), event)?;

        // The time field is already shown in its own column
        if visitor.t.is_some() {
            if let Some(t_idx) = message_buf.find(" t=") {
                match message_buf[t_idx + 1..].find(' ') {
                    Some(end) => message_buf.replace_range(t_idx..t_idx + 1 + end, ""),
                    None => message_buf.truncate(t_idx),
                }
            } else if message_buf.starts_with("t=") {
                match message_buf.find(' ') {
                    Some(end) => message_buf.replace_range(..end + 1, ""),
                    None => message_buf.clear(),
                }
            }
        }

        write!(writer, "{:<width$} {}", location, message_buf, width = 72)?;
        writeln!(writer)
    }
}

static INIT_LOG: Once = Once::new();

/// Sets up logging with maximum verbosity (trace level)
/// Mainly for unit tests
pub fn setup_logging_verbose() {
    setup_logging(EnvFilter::new("trace"), None);
}

/// Sets up default logging to stdout and optionally, a verbose log file
/// Returns a guard, that needs to be kept alive for logging to file to work
pub fn setup_logging_default(verbose_logfile: Option<String>) -> Option<WorkerGuard> {
    let logfile_and_filter = verbose_logfile.map(|file| (file, get_default_logfile_filter()));
    setup_logging(get_default_stdout_filter(), logfile_and_filter)
}

pub fn get_default_stdout_filter() -> EnvFilter {
    let directives = [
        // Per-symbol and per-bit noise
        "dmr_core::bitbuffer=warn",
        "dmr_core::edac=info",
        "dmr_decoder::sync=info",

        // Detection and assembly
        "dmr_decoder::detector=debug",
        "dmr_decoder::packet=debug",
        "dmr_pdus=info",
    ];
    directives.iter().fold(EnvFilter::new("info"), |filter, d| match d.parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    })
}

fn get_default_logfile_filter() -> EnvFilter {
    EnvFilter::new("debug")
}

/// Sets up logging to stdout and optionally, a verbose log file
/// If an output file is requested and can be opened, returns Some<WorkerGuard>. Keep this
/// value alive or logging to file may cease working.
fn setup_logging(stdout_filter: EnvFilter, outfile: Option<(String, EnvFilter)>) -> Option<WorkerGuard> {
    let file = outfile.and_then(|(path, filter)| {
        match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(f) => Some((f, filter)),
            Err(e) => {
                eprintln!("cannot open log file {}: {}", path, e);
                None
            }
        }
    });

    match file {
        Some((file, outfile_filter)) => {
            let (file_writer, guard) = tracing_appender::non_blocking(file);
            INIT_LOG.call_once(|| {
                let file_layer = tracingfmt::layer()
                    .event_format(AlignedFormatter)
                    .with_writer(file_writer)
                    .with_ansi(false);
                let stdout_layer = tracingfmt::layer()
                    .event_format(AlignedFormatter)
                    .with_writer(std::io::stderr);

                tracing_subscriber::registry()
                    .with(file_layer.with_filter(outfile_filter))
                    .with(stdout_layer.with_filter(stdout_filter))
                    .init();
            });
            Some(guard)
        }
        None => {
            INIT_LOG.call_once(|| {
                let stdout_layer = tracingfmt::layer()
                    .event_format(AlignedFormatter)
                    .with_writer(std::io::stderr);

                tracing_subscriber::registry()
                    .with(stdout_layer.with_filter(stdout_filter))
                    .init();
            });
            None
        }
    }
}
