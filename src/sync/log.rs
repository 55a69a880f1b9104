//! Append-only run log.
//!
//! Every progress line goes to stdout and to `sync_log.txt` in the data
//! directory so past runs stay inspectable. Logging is best-effort: a write
//! failure never interrupts a sync.

use std::{fs::OpenOptions, io::Write, path::PathBuf};

use chrono::Local;

pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    pub fn new() -> Self {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("plsyncli/sync_log.txt");
        RunLog { path }
    }

    /// Writes one timestamped line to the log file and stdout.
    pub fn line(&self, message: &str) {
        let stamped = format!("[{}] {}", Local::now().format("%Y-%m-%d %H:%M:%S"), message);
        println!("{}", stamped);

        if let Ok(mut file) = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
        {
            let _ = writeln!(file, "{}", stamped);
        }
    }
}

impl Default for RunLog {
    fn default() -> Self {
        Self::new()
    }
}
