use crate::error::{CliError, Result};
use std::fs::File;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::Subscriber;
use tracing_subscriber::{
    Layer,
    filter::LevelFilter,
    fmt::{self, MakeWriter, format::FmtSpan},
    prelude::*,
    registry::LookupSpan,
};

/// `-vvv`: everything, including solver iterations and span timings.
const TRACE_VERBOSITY: u8 = 3;

pub fn level_filter(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::OFF
    } else {
        match verbosity {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}

/// Console output. Module targets and the close events of the solver task and
/// workflow spans (with their busy time) are only shown at trace verbosity.
fn console_layer<S, W>(verbosity: u8, writer: W, ansi: bool) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + 'static,
{
    let detailed = verbosity >= TRACE_VERBOSITY;
    fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(detailed)
        .with_span_events(if detailed {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        })
        .compact()
}

/// Plain-text log file; always records how long each solve took.
fn file_layer<S>(file: File) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
}

pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<PathBuf>) -> Result<()> {
    let subscriber = tracing_subscriber::registry()
        .with(level_filter(verbosity, quiet))
        .with(console_layer(
            verbosity,
            std::io::stderr,
            std::io::stderr().is_terminal(),
        ));

    match log_file {
        Some(path) => {
            let file = File::create(&path).map_err(CliError::Io)?;
            subscriber.with(file_layer(file)).init();
        }
        None => subscriber.init(),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::sync::Once;
    use tracing::{debug, error, info, trace, warn};

    static INIT: Once = Once::new();

    fn ensure_global_logger_is_set() {
        INIT.call_once(|| {
            setup_logging(3, false, None).expect("Failed to set up global logger for tests");
        });
    }

    #[test]
    fn verbosity_maps_to_level_filter() {
        assert_eq!(level_filter(0, false), LevelFilter::WARN);
        assert_eq!(level_filter(1, false), LevelFilter::INFO);
        assert_eq!(level_filter(2, false), LevelFilter::DEBUG);
        assert_eq!(level_filter(5, false), LevelFilter::TRACE);
        assert_eq!(level_filter(2, true), LevelFilter::OFF);
    }

    #[test]
    #[serial]
    fn initialization_and_macros_work() {
        ensure_global_logger_is_set();

        error!("This is an error");
        warn!("This is a warning");
        info!("This is info");
        debug!("This is debug");
        trace!("This is trace");
    }

    #[test]
    #[serial]
    fn file_layer_records_solver_events() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("test.log");

        let file = File::create(&log_path).unwrap();
        let subscriber = tracing_subscriber::registry().with(file_layer(file));

        tracing::subscriber::with_default(subscriber, || {
            wlc::workflows::cavity::cavity_elongation(1.0, 1.0, 0.5).unwrap();
            debug!("Message for file-only test.");
        });

        let content = std::fs::read_to_string(log_path).unwrap();
        assert!(content.contains("Message for file-only test."));
        assert!(content.contains("Cavity elongation complete."));
        assert!(content.contains("ThreadId"));
        assert!(content.contains("marginal_task"));
        assert!(content.contains("time.busy"));
    }

    fn console_output(verbosity: u8) -> String {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("console.log");
        let file = File::create(&log_path).unwrap();
        let subscriber = tracing_subscriber::registry()
            .with(level_filter(verbosity, false))
            .with(console_layer(verbosity, file, false));

        tracing::subscriber::with_default(subscriber, || {
            wlc::workflows::cavity::cavity_elongation(1.0, 1.0, 0.0).unwrap();
        });
        std::fs::read_to_string(log_path).unwrap()
    }

    #[test]
    #[serial]
    fn trace_verbosity_adds_targets_and_span_timings_to_console_output() {
        let content = console_output(TRACE_VERBOSITY);
        assert!(content.contains("wlc::engine::tasks::marginal"));
        assert!(content.contains("time.busy"));
    }

    #[test]
    #[serial]
    fn info_verbosity_keeps_console_output_compact() {
        let content = console_output(1);
        assert!(content.contains("Cavity elongation complete."));
        assert!(!content.contains("wlc::"));
        assert!(!content.contains("time.busy"));
    }

    #[test]
    #[serial]
    fn invalid_log_file_path_propagates_error() {
        let invalid_path = PathBuf::from("/");

        if cfg!(unix) && invalid_path.is_dir() {
            let result = setup_logging(0, false, Some(invalid_path));
            assert!(matches!(result, Err(CliError::Io(_))));
        }
    }
}
