//! Progress display for resolution and install stages

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Byte-level progress sink handed to backend transfers
pub trait ProgressSink: Send + Sync {
    /// Called once when the transfer starts, with the total size if known
    fn begin(&self, total_bytes: Option<u64>);
    /// Called as bytes are written
    fn advance(&self, bytes: u64);
}

/// Sink that discards all progress events
pub struct NullSink;

impl ProgressSink for NullSink {
    fn begin(&self, _total_bytes: Option<u64>) {}
    fn advance(&self, _bytes: u64) {}
}

/// Progress display for one orchestration stage
pub struct StageProgress {
    multi: MultiProgress,
    stage_pb: ProgressBar,
}

impl StageProgress {
    /// Create a stage bar with the total number of work units
    pub fn new(stage: &str, total_items: u64) -> Self {
        let style = ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        let multi = MultiProgress::new();
        let stage_pb = multi.add(ProgressBar::new(total_items));
        stage_pb.set_style(style);
        stage_pb.set_message(stage.to_string());

        Self { multi, stage_pb }
    }

    /// Hidden display for quiet or scripted runs
    pub fn hidden(total_items: u64) -> Self {
        let multi = MultiProgress::with_draw_target(indicatif::ProgressDrawTarget::hidden());
        let stage_pb = multi.add(ProgressBar::new(total_items));
        Self { multi, stage_pb }
    }

    /// Record one completed work unit
    pub fn item_done(&self, name: &str) {
        self.stage_pb.set_message(truncate_message(name));
        self.stage_pb.inc(1);
    }

    /// Create a byte-transfer sink drawn below the stage bar
    pub fn transfer_sink(&self) -> TransferSink {
        let pb = self.multi.add(ProgressBar::no_length());
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  [{bar:40.green/yellow}] {bytes}/{total_bytes}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        TransferSink { pb }
    }

    /// Finish the stage bar
    pub fn finish(&self) {
        self.stage_pb.finish_and_clear();
    }
}

/// Shorten long names to their trailing 47 characters. Display names and
/// URLs are arbitrary UTF-8, so the cut lands on a char boundary, never a
/// byte offset.
fn truncate_message(name: &str) -> String {
    if name.chars().count() <= 50 {
        return name.to_string();
    }

    let tail_start = name
        .char_indices()
        .rev()
        .nth(46)
        .map_or(0, |(index, _)| index);
    format!("...{}", &name[tail_start..])
}

/// Indicatif-backed byte sink for a single transfer
pub struct TransferSink {
    pb: ProgressBar,
}

impl ProgressSink for TransferSink {
    fn begin(&self, total_bytes: Option<u64>) {
        if let Some(total) = total_bytes {
            self.pb.set_length(total);
        }
    }

    fn advance(&self, bytes: u64) {
        self.pb.inc(bytes);
    }
}

impl Drop for TransferSink {
    fn drop(&mut self) {
        self.pb.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_sink_is_inert() {
        let sink = NullSink;
        sink.begin(Some(100));
        sink.advance(50);
    }

    #[test]
    fn test_hidden_stage_progress() {
        let progress = StageProgress::hidden(2);
        progress.item_done("a.jar");
        progress.item_done("b.jar");
        progress.finish();
    }

    #[test]
    fn test_truncate_message_keeps_short_names() {
        assert_eq!(truncate_message("short.jar"), "short.jar");
        // 30 two-byte chars exceed 50 bytes but not 50 chars
        let accented = "é".repeat(30);
        assert_eq!(truncate_message(&accented), accented);
    }

    #[test]
    fn test_truncate_message_cuts_on_char_boundary() {
        let long = "a".repeat(60);
        let truncated = truncate_message(&long);
        assert_eq!(truncated, format!("...{}", "a".repeat(47)));

        let multibyte = "é".repeat(60);
        let truncated = truncate_message(&multibyte);
        assert_eq!(truncated, format!("...{}", "é".repeat(47)));
    }

    #[test]
    fn test_long_multibyte_name_does_not_panic() {
        let progress = StageProgress::hidden(1);
        progress.item_done(&"名前が長いモッドファイル".repeat(8));
        progress.finish();
    }
}
