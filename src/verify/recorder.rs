//! Predicate recorders.

/// Sink for predicate outcomes. Implementations must keep the aggregate
/// failure flag sticky: once any predicate fails, `all_passed` stays
/// false.
pub trait Recorder {
    fn record(&mut self, status: bool, context: &[String], name: &str, title: &str);
    fn all_passed(&self) -> bool;
}

/// Prints one audit-trail line per predicate.
#[derive(Default)]
pub struct CliRecorder {
    failed: bool,
}

impl CliRecorder {
    pub fn new() -> Self {
        CliRecorder::default()
    }
}

impl Recorder for CliRecorder {
    fn record(&mut self, status: bool, context: &[String], name: &str, title: &str) {
        let prefix = if status { "OK:  " } else { "FAIL:" };
        println!("{prefix} {} | {name}: {title}", context.join(" / "));
        if !status {
            self.failed = true;
        }
    }

    fn all_passed(&self) -> bool {
        !self.failed
    }
}

/// A failed predicate with its flattened context path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub context: String,
    pub name: String,
    pub title: String,
}

/// Collects failing predicates in emission order; the test-facing
/// recorder.
#[derive(Default)]
pub struct CollectingRecorder {
    failed: bool,
    failures: Vec<Failure>,
}

impl CollectingRecorder {
    pub fn new() -> Self {
        CollectingRecorder::default()
    }

    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }
}

impl Recorder for CollectingRecorder {
    fn record(&mut self, status: bool, context: &[String], name: &str, title: &str) {
        if !status {
            self.failed = true;
            self.failures.push(Failure {
                context: context.join(" / "),
                name: name.to_string(),
                title: title.to_string(),
            });
        }
    }

    fn all_passed(&self) -> bool {
        !self.failed
    }
}
