use std::time::{Duration, Instant};

/// Status line message that disappears after a while
pub struct TimedString {
    content: String,
    timestamp: Instant,
    duration: Duration,
}

impl TimedString {
    pub fn new(content: &str, duration: Duration) -> Self {
        Self {
            content: content.to_string(),
            duration,
            timestamp: Instant::now(),
        }
    }

    fn is_expired(&self) -> bool {
        self.timestamp.elapsed() > self.duration
    }
}

impl AsRef<str> for TimedString {
    fn as_ref(&self) -> &str {
        if self.is_expired() { "" } else { &self.content }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry() {
        let msg = TimedString::new("Command completed.", Duration::from_secs(60));
        assert_eq!(msg.as_ref(), "Command completed.");

        let msg = TimedString::new("gone", Duration::ZERO);
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(msg.as_ref(), "");
    }
}
