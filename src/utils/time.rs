use std::time::SystemTime;

pub const SEC_AS_MILI: u64 = 1000;
pub const MIN_AS_MILI: u64 = SEC_AS_MILI * 60;
pub const HOUR_AS_MILI: u64 = MIN_AS_MILI * 60;

/// Generates a current timestamp in milliseconds since the UNIX epoch.
pub fn generate_ts() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_millis() as u64
}

/// Current time as whole seconds since the UNIX epoch, for the health endpoint.
pub fn unix_seconds() -> u64 {
    generate_ts() / SEC_AS_MILI
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_ts_is_millisecond_scale() {
        let ts = generate_ts();
        // anything after ~2001 in ms-since-epoch has 13 digits
        assert!(ts > 1_000_000_000_000);
    }

    #[test]
    fn unix_seconds_is_ts_over_1000() {
        let ts = generate_ts();
        let secs = unix_seconds();
        assert_eq!(secs, ts / SEC_AS_MILI);
    }
}
