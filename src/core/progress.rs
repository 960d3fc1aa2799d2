//! Progress checkpoints for in-flight requests

use std::time::{Duration, Instant};

/// Progress information for a response body being received
#[derive(Debug, Clone)]
pub struct Progress {
    /// Expected body size in bytes, 0 when unknown
    pub total_size: u64,
    /// Number of bytes received
    pub received_size: u64,
    /// Progress as a percentage (0.0 to 100.0)
    pub percent: f64,
    /// Time when the request was started
    pub start_time: Instant,
}

/// What the transport should do after a progress checkpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
    /// Keep driving the operation
    Continue,
    /// Abort the operation; it resolves to [`crate::ScopeError::Cancelled`]
    Abort,
}

impl Progress {
    /// Create a new progress tracker
    pub fn new(total_size: u64) -> Self {
        Self {
            total_size,
            received_size: 0,
            percent: 0.0,
            start_time: Instant::now(),
        }
    }

    /// Set the expected body size once headers are known
    pub fn set_total(&mut self, total_size: u64) {
        self.total_size = total_size;
        self.update(self.received_size);
    }

    /// Update progress with new received size
    pub fn update(&mut self, received_size: u64) {
        self.received_size = received_size;
        self.percent = if self.total_size > 0 {
            (received_size as f64 / self.total_size as f64) * 100.0
        } else {
            0.0
        };
    }

    /// Check if the whole body has arrived
    pub fn is_complete(&self) -> bool {
        self.total_size > 0 && self.received_size >= self.total_size
    }

    /// Time since the request was started
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Format bytes as human-readable string
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes == 0 {
        return "0 B".to_string();
    }

    let bytes_f64 = bytes as f64;
    let exp = (bytes_f64.ln() / THRESHOLD.ln()).floor() as usize;
    let exp = exp.min(UNITS.len() - 1);

    let value = bytes_f64 / THRESHOLD.powi(exp as i32);

    if exp == 0 {
        format!("{} {}", bytes, UNITS[exp])
    } else {
        format!("{:.1} {}", value, UNITS[exp])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_creation() {
        let progress = Progress::new(1000);
        assert_eq!(progress.total_size, 1000);
        assert_eq!(progress.received_size, 0);
        assert_eq!(progress.percent, 0.0);
        assert!(!progress.is_complete());
    }

    #[test]
    fn test_progress_update() {
        let mut progress = Progress::new(1000);

        progress.update(500);
        assert_eq!(progress.received_size, 500);
        assert_eq!(progress.percent, 50.0);
        assert!(!progress.is_complete());

        progress.update(1000);
        assert_eq!(progress.percent, 100.0);
        assert!(progress.is_complete());
    }

    #[test]
    fn test_progress_unknown_total() {
        let mut progress = Progress::new(0);
        progress.update(4096);
        assert_eq!(progress.percent, 0.0);
        assert!(!progress.is_complete());

        progress.set_total(8192);
        assert_eq!(progress.percent, 50.0);
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1024), "1.0 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1048576), "1.0 MB");
    }
}
