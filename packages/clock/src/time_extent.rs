//! Time extents are used to represent a duration of time which contains
//! N time intervals of the same duration.
//!
//! Given a duration of: 60 seconds.
//!
//! ```text
//! |------------------------------------------------------------|
//! ```
//!
//! If we define a **base** duration of `10` seconds, we would have `6` intervals.
//!
//! ```text
//! |----------|----------|----------|----------|----------|----------|
//!            ^--- 10 seconds
//! ```
//!
//! Then, you can represent half of the duration (`30` seconds) as `3` times
//! (**multiplier**) the **base** interval (3*10 = 30 seconds):
//!
//! ```text
//! |----------|----------|----------|----------|----------|----------|
//!                                  ^--- 30 seconds (3 units of 10 seconds)
//! ```
//!
//! Time extents are not clocks in the sense that they do not have a start time.
//! They are not synchronized with the real time. In order to measure time, you
//! need to define a start time for the intervals.
//!
//! Practically, time extents are used to represent a number of time intervals
//! since the Unix Epoch, typically in seconds, which is useful for bucketing
//! timestamps: dividing the current timestamp by a base duration gives a
//! bucket number that stays constant for the whole interval and changes on
//! the next one. The UDP tracker's connection id and the peer cleanup sweep
//! both key off this.
use std::num::{IntErrorKind, TryFromIntError};
use std::time::Duration;

use crate::clock::{Stopped, Time, Working};

/// This trait defines the operations that can be performed on a `TimeExtent`.
pub trait Extent: Sized + Default {
    type Base;
    type Multiplier;
    type Product;

    /// It creates a new `TimeExtent`.
    fn new(unit: &Self::Base, count: &Self::Multiplier) -> Self;

    /// It increases the `TimeExtent` by a multiplier.
    ///
    /// # Errors
    ///
    /// Will return `IntErrorKind` if `add` would overflow the internal `Duration`.
    fn increase(&self, add: Self::Multiplier) -> Result<Self, IntErrorKind>;

    /// It decreases the `TimeExtent` by a multiplier.
    ///
    /// # Errors
    ///
    /// Will return `IntErrorKind` if `sub` would underflow the internal `Duration`.
    fn decrease(&self, sub: Self::Multiplier) -> Result<Self, IntErrorKind>;

    /// It returns the total `Duration` of the `TimeExtent`.
    fn total(&self) -> Option<Result<Self::Product, TryFromIntError>>;

    /// It returns the total `Duration` of the `TimeExtent` plus one increment.
    fn total_next(&self) -> Option<Result<Self::Product, TryFromIntError>>;
}

/// The `TimeExtent` base `Duration`, which is the duration of a single interval.
pub type Base = Duration;
/// The `TimeExtent` `Multiplier`, which is the number of `Base` duration intervals.
pub type Multiplier = u64;
/// The `TimeExtent` product, which is the total duration of the `TimeExtent`.
pub type Product = Base;

/// A `TimeExtent` is a duration of time which contains N time intervals of the
/// same duration.
#[derive(Debug, Default, Hash, PartialEq, Eq, Clone, Copy)]
pub struct TimeExtent {
    pub increment: Base,
    pub amount: Multiplier,
}

/// A zero time extent. It's the additive identity for a `TimeExtent`.
pub const ZERO: TimeExtent = TimeExtent {
    increment: Base::ZERO,
    amount: Multiplier::MIN,
};

/// The maximum value for a `TimeExtent`.
pub const MAX: TimeExtent = TimeExtent {
    increment: Base::MAX,
    amount: Multiplier::MAX,
};

impl TimeExtent {
    #[must_use]
    pub const fn from_sec(seconds: u64, amount: &Multiplier) -> Self {
        Self {
            increment: Base::from_secs(seconds),
            amount: *amount,
        }
    }
}

fn checked_duration_from_nanos(time: u128) -> Result<Duration, TryFromIntError> {
    const NANOS_PER_SEC: u32 = 1_000_000_000;

    let secs = time.div_euclid(u128::from(NANOS_PER_SEC));
    let nanos = time.rem_euclid(u128::from(NANOS_PER_SEC));

    assert!(nanos < u128::from(NANOS_PER_SEC));

    match u64::try_from(secs) {
        Err(error) => Err(error),
        Ok(secs) => Ok(Duration::new(secs, nanos.try_into().unwrap())),
    }
}

impl Extent for TimeExtent {
    type Base = Base;
    type Multiplier = Multiplier;
    type Product = Product;

    fn new(increment: &Self::Base, amount: &Self::Multiplier) -> Self {
        Self {
            increment: *increment,
            amount: *amount,
        }
    }

    fn increase(&self, add: Self::Multiplier) -> Result<Self, IntErrorKind> {
        match self.amount.checked_add(add) {
            None => Err(IntErrorKind::PosOverflow),
            Some(amount) => Ok(Self {
                increment: self.increment,
                amount,
            }),
        }
    }

    fn decrease(&self, sub: Self::Multiplier) -> Result<Self, IntErrorKind> {
        match self.amount.checked_sub(sub) {
            None => Err(IntErrorKind::NegOverflow),
            Some(amount) => Ok(Self {
                increment: self.increment,
                amount,
            }),
        }
    }

    fn total(&self) -> Option<Result<Self::Product, TryFromIntError>> {
        self.increment
            .as_nanos()
            .checked_mul(u128::from(self.amount))
            .map(checked_duration_from_nanos)
    }

    fn total_next(&self) -> Option<Result<Self::Product, TryFromIntError>> {
        self.increment
            .as_nanos()
            .checked_mul(u128::from(self.amount) + 1)
            .map(checked_duration_from_nanos)
    }
}

/// A `TimeExtent` maker. It's a clock based on time extents: it gives you the
/// current time bucketed into intervals of a given `Base` duration.
pub trait Make<C>: Sized
where
    C: Time,
{
    /// It gives you the current time extent for a given base increment,
    /// reading the current timestamp from the `C` clock.
    ///
    /// For example:
    ///
    /// - If the base increment is `1` second, it will return a time extent
    ///   whose duration is `1 second` and whose multiplier is the number of
    ///   seconds since the Unix Epoch.
    /// - If the base increment is `1` minute, it will return a time extent
    ///   whose duration is `60 seconds` and whose multiplier is the number of
    ///   minutes since the Unix Epoch.
    #[must_use]
    fn now(increment: &Base) -> Option<Result<TimeExtent, TryFromIntError>> {
        C::now()
            .as_nanos()
            .checked_div((*increment).as_nanos())
            .map(|amount| match Multiplier::try_from(amount) {
                Err(error) => Err(error),
                Ok(amount) => Ok(TimeExtent::new(increment, &amount)),
            })
    }

    /// Same as [`now`](Make::now), but adds an extra duration to the current
    /// time before bucketing it. Gives you a time extent for a time in the
    /// future.
    #[must_use]
    fn now_after(increment: &Base, add_time: &Duration) -> Option<Result<TimeExtent, TryFromIntError>> {
        match C::now_add(add_time) {
            None => None,
            Some(time) => time
                .as_nanos()
                .checked_div(increment.as_nanos())
                .map(|amount| match Multiplier::try_from(amount) {
                    Err(error) => Err(error),
                    Ok(amount) => Ok(TimeExtent::new(increment, &amount)),
                }),
        }
    }

    /// Same as [`now`](Make::now), but subtracts a duration from the current
    /// time before bucketing it. Gives you a time extent for a time in the
    /// past.
    #[must_use]
    fn now_before(increment: &Base, sub_time: &Duration) -> Option<Result<TimeExtent, TryFromIntError>> {
        match C::now_sub(sub_time) {
            None => None,
            Some(time) => time
                .as_nanos()
                .checked_div(increment.as_nanos())
                .map(|amount| match Multiplier::try_from(amount) {
                    Err(error) => Err(error),
                    Ok(amount) => Ok(TimeExtent::new(increment, &amount)),
                }),
        }
    }
}

/// A `TimeExtent` maker generic over the clock `C` it reads from.
#[derive(Debug)]
pub struct Maker<C> {
    clock: std::marker::PhantomData<C>,
}

/// A `TimeExtent` maker which reads from the `Working` clock.
pub type WorkingTimeExtentMaker = Maker<Working>;

/// A `TimeExtent` maker which reads from the `Stopped` clock.
pub type StoppedTimeExtentMaker = Maker<Stopped>;

impl Make<Working> for WorkingTimeExtentMaker {}
impl Make<Stopped> for StoppedTimeExtentMaker {}

/// The default `TimeExtent` maker. It is `WorkingTimeExtentMaker` in production
/// and `StoppedTimeExtentMaker` in tests.
#[cfg(not(test))]
pub type DefaultTimeExtentMaker = WorkingTimeExtentMaker;

/// The default `TimeExtent` maker. It is `WorkingTimeExtentMaker` in production
/// and `StoppedTimeExtentMaker` in tests.
#[cfg(test)]
pub type DefaultTimeExtentMaker = StoppedTimeExtentMaker;

#[cfg(test)]
mod tests {
    use std::num::TryFromIntError;
    use std::time::Duration;

    use super::{checked_duration_from_nanos, Base, DefaultTimeExtentMaker, Extent, Make, Multiplier, Product, TimeExtent, MAX, ZERO};
    use crate::clock::stopped::Stopped as _;
    use crate::clock::Stopped;

    #[test]
    fn it_should_default_to_zero() {
        assert_eq!(TimeExtent::default(), ZERO);
    }

    #[test]
    fn it_should_make_a_new_time_extent() {
        let time_extent = TimeExtent::new(&Duration::from_secs(2), &5);
        assert_eq!(time_extent.increment, Duration::from_secs(2));
        assert_eq!(time_extent.amount, 5);
    }

    #[test]
    fn it_should_increase_the_amount() {
        let time_extent = TimeExtent::from_sec(2, &5);
        let increased = time_extent.increase(5).unwrap();
        assert_eq!(increased.amount, 10);
    }

    #[test]
    fn it_should_fail_to_increase_past_the_maximum() {
        assert!(MAX.increase(1).is_err());
    }

    #[test]
    fn it_should_decrease_the_amount() {
        let time_extent = TimeExtent::from_sec(2, &5);
        let decreased = time_extent.decrease(5).unwrap();
        assert_eq!(decreased.amount, 0);
    }

    #[test]
    fn it_should_fail_to_decrease_past_zero() {
        assert!(ZERO.decrease(1).is_err());
    }

    #[test]
    fn it_should_calculate_the_total_duration() {
        let time_extent = TimeExtent::from_sec(2, &5);
        assert_eq!(time_extent.total().unwrap().unwrap(), Duration::from_secs(10));
    }

    #[test]
    fn it_should_calculate_the_total_duration_of_the_next_increment() {
        let time_extent = TimeExtent::from_sec(2, &5);
        assert_eq!(time_extent.total_next().unwrap().unwrap(), Duration::from_secs(12));
    }

    #[test]
    fn it_should_make_the_current_time_extent_for_the_stopped_clock() {
        Stopped::local_set(&Duration::from_secs(100));

        let time_extent = DefaultTimeExtentMaker::now(&Duration::from_secs(10)).unwrap().unwrap();

        assert_eq!(time_extent.increment, Duration::from_secs(10));
        assert_eq!(time_extent.amount, 10);

        Stopped::local_reset();
    }

    #[test]
    fn it_should_make_a_time_extent_for_a_time_in_the_future() {
        Stopped::local_set(&Duration::from_secs(100));

        let time_extent = DefaultTimeExtentMaker::now_after(&Duration::from_secs(10), &Duration::from_secs(50))
            .unwrap()
            .unwrap();

        assert_eq!(time_extent.amount, 15);

        Stopped::local_reset();
    }

    #[test]
    fn it_should_make_a_time_extent_for_a_time_in_the_past() {
        Stopped::local_set(&Duration::from_secs(100));

        let time_extent = DefaultTimeExtentMaker::now_before(&Duration::from_secs(10), &Duration::from_secs(50))
            .unwrap()
            .unwrap();

        assert_eq!(time_extent.amount, 5);

        Stopped::local_reset();
    }

    #[test]
    fn it_should_convert_nanos_into_a_duration() {
        let nanos: u128 = 1_500_000_000;
        assert_eq!(checked_duration_from_nanos(nanos).unwrap(), Duration::new(1, 500_000_000));
    }

    #[test]
    fn it_should_fail_to_convert_nanos_that_overflow_a_u64_of_seconds() {
        let too_many_nanos: u128 = u128::from(u64::MAX) * 1_000_000_000 + 1_000_000_000;
        let result: Result<Duration, TryFromIntError> = checked_duration_from_nanos(too_many_nanos);
        assert!(result.is_err());
    }

    #[allow(dead_code)]
    fn assert_types_line_up(_base: Base, _multiplier: Multiplier, _product: Product) {}
}
