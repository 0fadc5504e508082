//! Connection cookies used to authorize UDP announce/scrape requests.
//!
//! A cookie is derived from the requester's socket address and a time slot
//! rather than stored server-side, so issuing and verifying one costs a hash
//! instead of a table lookup. BEP 15 recommends a two-minute validity window;
//! `check` accepts a cookie built from any slot within that window, which
//! means a cookie issued at the very start of a slot stays valid for up to
//! twice the window.
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::net::SocketAddr;
use std::panic::Location;

use aquatic_udp_protocol::ConnectionId;
use zerocopy::network_endian::I64;
use zerocopy::AsBytes;

use super::error::Error;
use crate::shared::clock::time_extent::{Extent, TimeExtent};
use crate::shared::crypto::keys::seeds::{Current, Keeper};
use crate::DefaultTimeExtentMaker;

pub type Cookie = [u8; 8];

pub type SinceUnixEpochTimeExtent = TimeExtent;

pub const COOKIE_LIFETIME: TimeExtent = TimeExtent::from_sec(2, &60);

#[must_use]
pub fn from_connection_id(connection_id: &ConnectionId) -> Cookie {
    let mut cookie = [0u8; 8];
    connection_id.write_to(&mut cookie);
    cookie
}

#[must_use]
pub fn into_connection_id(connection_cookie: &Cookie) -> ConnectionId {
    ConnectionId(I64::new(i64::from_be_bytes(*connection_cookie)))
}

#[must_use]
pub fn make(remote_address: &SocketAddr) -> Cookie {
    let time_extent = current_time_extent();
    build(remote_address, &time_extent)
}

/// Verifies a cookie against every time slot within [`COOKIE_LIFETIME`], oldest first.
pub fn check(remote_address: &SocketAddr, connection_cookie: &Cookie) -> Result<SinceUnixEpochTimeExtent, Error> {
    for offset in 0..=COOKIE_LIFETIME.amount {
        let candidate_extent = current_time_extent()
            .decrease(offset)
            .expect("a time extent older than the current one should always be representable");
        if *connection_cookie == build(remote_address, &candidate_extent) {
            return Ok(candidate_extent);
        }
    }
    Err(Error::InvalidConnectionId { location: Location::caller() })
}

fn current_time_extent() -> SinceUnixEpochTimeExtent {
    DefaultTimeExtentMaker::now(&COOKIE_LIFETIME.increment)
        .expect("the clock should be running")
        .expect("the current time should fit a time extent")
        .increase(COOKIE_LIFETIME.amount)
        .expect("the cookie lifetime should fit within a time extent")
}

fn build(remote_address: &SocketAddr, time_extent: &TimeExtent) -> Cookie {
    let seed = Current::get_seed();

    let mut hasher = DefaultHasher::new();
    remote_address.hash(&mut hasher);
    time_extent.hash(&mut hasher);
    seed.hash(&mut hasher);

    hasher.finish().to_le_bytes()
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

    use super::{build, check, make, COOKIE_LIFETIME};
    use crate::shared::clock::time_extent::Extent;

    fn unspecified_v4() -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0)
    }

    #[test]
    fn a_cookie_verifies_for_the_address_that_requested_it() {
        let remote_address = unspecified_v4();
        let cookie = make(&remote_address);

        check(&remote_address, &cookie).expect("freshly issued cookie should verify");
    }

    #[test]
    fn a_cookie_does_not_verify_for_a_different_address() {
        let cookie = make(&unspecified_v4());
        let other_address = SocketAddr::new(IpAddr::V4(Ipv4Addr::BROADCAST), 0);

        assert!(check(&other_address, &cookie).is_err());
    }

    #[test]
    fn building_is_deterministic_for_the_same_inputs() {
        let remote_address = unspecified_v4();
        let time_extent = COOKIE_LIFETIME;

        assert_eq!(build(&remote_address, &time_extent), build(&remote_address, &time_extent));
    }

    #[test]
    fn ip_version_changes_the_cookie() {
        let time_extent = COOKIE_LIFETIME;
        let v4 = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0);
        let v6 = SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0);

        assert_ne!(build(&v4, &time_extent), build(&v6, &time_extent));
    }

    #[test]
    fn port_changes_the_cookie() {
        let time_extent = COOKIE_LIFETIME;
        let low_port = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0);
        let high_port = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 1);

        assert_ne!(build(&low_port, &time_extent), build(&high_port, &time_extent));
    }
}
