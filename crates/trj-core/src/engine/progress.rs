#[derive(Debug, Clone)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,

    TaskStart { total_steps: u64 },
    TaskIncrement,
    TaskFinish,

    Message(String),
    /// A non-fatal anomaly worth surfacing to the user.
    Warning(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }

    /// Whether a callback is attached; lets callers skip building costly messages.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.callback.is_some()
    }

    pub fn message(&self, text: impl Into<String>) {
        if self.is_active() {
            self.report(Progress::Message(text.into()));
        }
    }

    pub fn warning(&self, text: impl Into<String>) {
        if self.is_active() {
            self.report(Progress::Warning(text.into()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn reporter_without_callback_is_silent() {
        let reporter = ProgressReporter::new();
        assert!(!reporter.is_active());
        reporter.report(Progress::TaskIncrement);
        reporter.warning("ignored");
    }

    #[test]
    fn reporter_forwards_events_to_callback() {
        let seen = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            seen.lock().unwrap().push(format!("{:?}", event));
        }));

        reporter.report(Progress::PhaseStart { name: "Scanning" });
        reporter.message("hello");
        reporter.warning("drift");
        drop(reporter);

        let seen = seen.into_inner().unwrap();
        assert_eq!(seen.len(), 3);
        assert!(seen[0].contains("Scanning"));
        assert!(seen[1].starts_with("Message") && seen[1].contains("hello"));
        assert!(seen[2].starts_with("Warning") && seen[2].contains("drift"));
    }
}
