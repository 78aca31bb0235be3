//! Best-effort delivery of progress notifications.

use std::panic::{AssertUnwindSafe, catch_unwind};

use equity_core::{ProgressSink, Result};
use tracing::{debug, info};

/// Delivers `stage` to `sink`, discarding any failure.
///
/// Neither an error returned by the sink nor a panic inside it reaches the
/// caller.
pub fn notify_best_effort(sink: Option<&dyn ProgressSink>, stage: &str) {
    let Some(sink) = sink else {
        return;
    };

    match catch_unwind(AssertUnwindSafe(|| sink.notify(stage))) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => debug!(stage, error = %e, "Progress notification failed"),
        Err(_) => debug!(stage, "Progress sink panicked"),
    }
}

/// Progress sink that logs each stage through `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingProgressSink;

impl ProgressSink for TracingProgressSink {
    fn notify(&self, stage: &str) -> Result<()> {
        info!("{}", stage);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use equity_core::ProfileError;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink(Mutex<Vec<String>>);

    impl ProgressSink for RecordingSink {
        fn notify(&self, stage: &str) -> Result<()> {
            self.0.lock().unwrap().push(stage.to_string());
            Ok(())
        }
    }

    struct FailingSink;

    impl ProgressSink for FailingSink {
        fn notify(&self, _stage: &str) -> Result<()> {
            Err(ProfileError::Other("sink closed".to_string()))
        }
    }

    struct PanickingSink;

    impl ProgressSink for PanickingSink {
        fn notify(&self, _stage: &str) -> Result<()> {
            panic!("sink exploded");
        }
    }

    #[test]
    fn test_delivers_stage() {
        let sink = RecordingSink::default();
        notify_best_effort(Some(&sink), "Downloading quote summary");
        assert_eq!(*sink.0.lock().unwrap(), vec!["Downloading quote summary"]);
    }

    #[test]
    fn test_no_sink() {
        notify_best_effort(None, "ignored");
    }

    #[test]
    fn test_error_is_swallowed() {
        notify_best_effort(Some(&FailingSink), "stage");
    }

    #[test]
    fn test_panic_is_swallowed() {
        notify_best_effort(Some(&PanickingSink), "stage");
    }

    #[test]
    fn test_tracing_sink_never_fails() {
        assert!(TracingProgressSink.notify("stage").is_ok());
    }
}
