use std::time::{SystemTime, UNIX_EPOCH};

pub(crate) fn unix_millis(time: SystemTime) -> Option<u64> {
    time.duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|d| u64::try_from(d.as_millis()).ok())
}

pub(crate) fn now_unix_ms() -> u64 {
    unix_millis(SystemTime::now()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn unix_millis_handles_before_and_after_epoch() {
        assert_eq!(unix_millis(UNIX_EPOCH), Some(0));
        assert_eq!(
            unix_millis(UNIX_EPOCH + Duration::from_millis(1500)),
            Some(1500)
        );
        assert_eq!(unix_millis(UNIX_EPOCH - Duration::from_secs(1)), None);
    }
}
