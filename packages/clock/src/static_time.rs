//! The time the application started, captured once and shared across clocks.
//!
//! The [`Stopped`](crate::clock::Stopped) clock resets to this value rather than to
//! the Unix Epoch in production, so that a freshly booted tracker's "stopped" time
//! (used before the first real announce) still reads as "now" instead of 1970.
use std::time::SystemTime;

lazy_static! {
    /// The time this process started, sampled once on first access.
    ///
    /// The binary calls [`lazy_static::initialize`] on this at startup so the sample
    /// is taken as early as possible rather than lazily on first clock read.
    pub static ref TIME_AT_APP_START: SystemTime = SystemTime::now();
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use super::TIME_AT_APP_START;

    #[test]
    fn it_should_be_in_the_past_or_now() {
        assert!(*TIME_AT_APP_START <= SystemTime::now());
    }
}
