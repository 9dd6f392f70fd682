use tracing::debug;

pub fn report_progress_starting(task: &'static str) {
    debug!(report = "progress", phase = "starting", task);
}

pub fn report_progress_ending(task: &'static str) {
    debug!(report = "progress", phase = "ending", task);
}
