use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use reqdb::{storage::Reporter, FileStatus};

/// Shows a validation pass as a progress bar on stderr.
///
/// The bar is hidden when stderr is not a terminal.
pub struct IndicatifReporter {
    bar: ProgressBar,
}

impl IndicatifReporter {
    pub fn new(label: &'static str) -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr());
        if let Ok(style) =
            ProgressStyle::with_template("{prefix:>12} [{bar:30}] {pos}/{len} {wide_msg}")
        {
            bar.set_style(style.progress_chars("=> "));
        }
        bar.set_prefix(label);
        Self { bar }
    }
}

impl Reporter for IndicatifReporter {
    fn started(&self, total: usize) {
        self.bar.reset();
        self.bar.set_length(total as u64);
    }

    fn file_checked(&self, status: &FileStatus) {
        if let Some(name) = status.path().file_name() {
            self.bar.set_message(name.to_string_lossy().into_owned());
        }
        self.bar.inc(1);
    }

    fn finished(&self) {
        self.bar.finish_and_clear();
    }
}
