//! Run counters and the end-of-run summary.

use std::time::Duration;

/// Per-pair reconciliation counts, folded into [`SyncStats`] by the runner.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PairOutcome {
    pub total_tracks: u64,
    pub already_synced: u64,
    pub newly_added: u64,
    pub not_found: u64,
    pub errors: u64,
}

/// Aggregate counters for one sync run.
#[derive(Debug, Default, Clone, Copy)]
pub struct SyncStats {
    pub playlists_processed: u64,
    pub playlists_failed: u64,
    pub total_tracks: u64,
    pub already_synced: u64,
    pub newly_added: u64,
    pub not_found: u64,
    pub errors: u64,
}

impl SyncStats {
    pub fn absorb(&mut self, outcome: PairOutcome) {
        self.playlists_processed += 1;
        self.total_tracks += outcome.total_tracks;
        self.already_synced += outcome.already_synced;
        self.newly_added += outcome.newly_added;
        self.not_found += outcome.not_found;
        self.errors += outcome.errors;
    }

    /// Summary lines for the log and stdout. Always emitted, even after
    /// partial failure, so the user can tell a partial success from a total
    /// one.
    pub fn summary_lines(&self, elapsed: Duration, dry_run: bool) -> Vec<String> {
        let mode = if dry_run { " (dry run)" } else { "" };
        vec![
            format!("Sync complete{}", mode),
            format!(
                "  Playlists processed: {} ({} failed)",
                self.playlists_processed, self.playlists_failed
            ),
            format!("  Tracks seen:         {}", self.total_tracks),
            format!("  Already synced:      {}", self.already_synced),
            format!(
                "  {} {}",
                if dry_run {
                    "Would add:          "
                } else {
                    "Newly added:        "
                },
                self.newly_added
            ),
            format!("  Not found:           {}", self.not_found),
            format!("  Errors:              {}", self.errors),
            format!("  Elapsed:             {}", format_elapsed(elapsed)),
        ]
    }
}

pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    format!("{}m {}s", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absorb_accumulates_counts() {
        let mut stats = SyncStats::default();
        stats.absorb(PairOutcome {
            total_tracks: 10,
            already_synced: 7,
            newly_added: 2,
            not_found: 1,
            errors: 0,
        });
        stats.absorb(PairOutcome {
            total_tracks: 5,
            already_synced: 5,
            ..Default::default()
        });

        assert_eq!(stats.playlists_processed, 2);
        assert_eq!(stats.total_tracks, 15);
        assert_eq!(stats.already_synced, 12);
        assert_eq!(stats.newly_added, 2);
    }

    #[test]
    fn formats_elapsed_as_minutes_and_seconds() {
        assert_eq!(format_elapsed(Duration::from_secs(0)), "0m 0s");
        assert_eq!(format_elapsed(Duration::from_secs(59)), "0m 59s");
        assert_eq!(format_elapsed(Duration::from_secs(125)), "2m 5s");
    }
}
