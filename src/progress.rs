//! Optional progress reporting for long screening runs.
//!
//! With the `progress` feature, [`ScreeningProgress`] drives an `indicatif` bar that
//! counts the rows of the pair loop (one row per outer object index). Without the
//! feature only the closing `debug!` record remains, so the screener calls it
//! unconditionally.
use std::time::Duration;

#[cfg(feature = "progress")]
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};

pub(crate) struct ScreeningProgress {
    #[cfg(feature = "progress")]
    bar: ProgressBar,
}

impl ScreeningProgress {
    #[cfg(feature = "progress")]
    pub(crate) fn new(rows: usize) -> Self {
        let bar = ProgressBar::new(rows.max(1) as u64);
        let style = ProgressStyle::with_template(
            "{bar:40.cyan/blue} {pos}/{len} ({percent:>3}%) | {per_sec} | ETA {eta_precise} | {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(200));
        ScreeningProgress { bar }
    }

    #[cfg(not(feature = "progress"))]
    pub(crate) fn new(_rows: usize) -> Self {
        ScreeningProgress {}
    }

    #[inline]
    pub(crate) fn row_done(&self) {
        #[cfg(feature = "progress")]
        self.bar.inc(1);
    }

    pub(crate) fn finish(&self, elapsed: Duration) {
        #[cfg(feature = "progress")]
        {
            self.bar
                .set_message(format!("done in {}", HumanDuration(elapsed)));
            self.bar.disable_steady_tick();
            self.bar.finish_and_clear();
        }
        log::debug!("Pair loop finished in {elapsed:.3?}");
    }
}
