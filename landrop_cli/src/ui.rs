use indicatif::{ProgressBar, ProgressStyle};
use landrop_core::{Band, ProgressSink};

/// Terminal progress bar that changes color as the transfer advances:
/// red below a third, yellow below two thirds, green after that.
pub struct TermProgress {
    bar: ProgressBar,
    band: Option<Band>,
}

impl TermProgress {
    pub fn new() -> Self {
        TermProgress {
            bar: ProgressBar::new(0),
            band: None,
        }
    }
}

impl Default for TermProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for TermProgress {
    fn update(&mut self, done: u64, total: u64) {
        if self.bar.length() != Some(total) {
            self.bar.set_length(total);
        }

        let band = Band::of(done, total);
        if self.band != Some(band) {
            self.bar.set_style(band_style(band));
            self.band = Some(band);
        }

        self.bar.set_position(done);
        if landrop_core::progress::is_complete(done, total) && !self.bar.is_finished() {
            self.bar.finish_with_message("done ✔");
        }
    }
}

fn band_style(band: Band) -> ProgressStyle {
    let color = match band {
        Band::Low => "red",
        Band::Mid => "yellow",
        Band::High => "green",
    };
    ProgressStyle::with_template(&format!(
        "[{{elapsed_precise}}] [{{bar:40.{color}}}] {{bytes}}/{{total_bytes}} ({{bytes_per_sec}}) {{msg}}"
    ))
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("=>-")
}
