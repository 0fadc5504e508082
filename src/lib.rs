//! A `BitTorrent` tracker service: peers announce their participation in a swarm and the
//! tracker answers with a list of other peers to connect to.
//!
//! [`BitTorrent`](https://en.wikipedia.org/wiki/BitTorrent) is a protocol for distributing files using a peer-to-peer network.
//!
//! Peers in the networks need to know where they can find other peers with the files they are looking for.
//!
//! Trackers are services that allow peers to quickly find other peers. Client peers announce their existence to a tracker,
//! and the tracker responds to the peer with a list of other peers in the swarm.
//!
//! You can learn more about `BitTorrent` and `BitTorrent` Trackers on these sites:
//!
//! - <https://www.bittorrent.org/>
//! - <https://en.wikipedia.org/wiki/BitTorrent>
//! - <https://en.wikipedia.org/wiki/BitTorrent_tracker>
//!
//! # Table of contents
//!
//! - [Features](#features)
//! - [Services](#services)
//! - [Configuration](#configuration)
//! - [Usage](#usage)
//!     - [HTTP Tracker](#http-tracker)
//!     - [UDP Tracker](#udp-tracker)
//!     - [WebSocket Tracker](#websocket-tracker)
//! - [Components](#components)
//! - [Implemented BEPs](#implemented-beps)
//! - [Documentation](#documentation)
//!
//! # Features
//!
//! - Multiple UDP server and HTTP(S) server blocks for socket binding
//! - Full IPv4 and IPv6 support for both UDP and HTTP(S)
//! - Public, listed, and private modes
//! - Peer authentication using time-bound keys
//! - A credit-accounting engine that diffs upload/download deltas between announces
//! - A `/stats` endpoint with a running JSON/plaintext snapshot of swarm counters
//! - `WebTorrent` signaling over WebSocket
//!
//! All state the tracker holds for peer coordination lives in memory and is rebuilt from
//! client announces on restart. Users, torrent metadata, and credit ledgers are owned by
//! external repositories the tracker only reads from and writes through; see
//! [`core::external`] for those contracts.
//!
//! # Services
//!
//! From the end-user perspective the tracker exposes three transports that all speak the
//! same announce/scrape contract, plus a stats endpoint served alongside the HTTP transport.
//!
//! - One or more [`UDP`](crate::servers::udp) trackers
//! - One or more [`HTTP`](crate::servers::http) trackers, which also serve `/stats`
//! - One or more [`WebTorrent`](crate::servers::webtorrent) signaling endpoints over WebSocket
//!
//! # Configuration
//!
//! In order to run the tracker you need to provide the configuration. If you run the tracker without providing the configuration,
//! the tracker will generate the default configuration the first time you run it. It will generate a `tracker.toml` file
//! in the root directory.
//!
//! The default configuration is:
//!
//! ```toml
//! announce_interval = 120
//! external_ip = "0.0.0.0"
//! inactive_peer_cleanup_interval = 600
//! trace_level = "info"
//! max_peer_timeout = 900
//! min_announce_interval = 120
//! mode = "public"
//! on_reverse_proxy = false
//! remove_peerless_torrents = true
//! tracker_usage_statistics = true
//!
//! [[udp_trackers]]
//! bind_address = "0.0.0.0:6969"
//! enabled = false
//!
//! [[http_trackers]]
//! bind_address = "0.0.0.0:7070"
//! enabled = false
//! ssl_cert_path = ""
//! ssl_enabled = false
//! ssl_key_path = ""
//!
//! [health_check_api]
//! bind_address = "127.0.0.1:1313"
//!```
//!
//! The default configuration includes one disabled UDP server and one disabled HTTP server; the health check
//! API is always enabled.
//!
//! For more information about each service and option you can visit the documentation for the
//! `torrust-tracker-configuration` package in this workspace.
//!
//! Alternatively to the `tracker.toml` file you can use one environment variable `TORRUST_TRACKER_CONFIG` to pass the configuration to the tracker:
//!
//! ```text
//! TORRUST_TRACKER_CONFIG=$(cat tracker.toml)
//! cargo run
//! ```
//!
//! In the previous example you are just setting the env var with the contents of the `tracker.toml` file.
//!
//! > NOTE: The `TORRUST_TRACKER_CONFIG` env var has priority over the `tracker.toml` file.
//!
//! # Usage
//!
//! Running the tracker with the default configuration and enabling the UDP and HTTP trackers will expose the services on these URLs:
//!
//! - UDP tracker: <udp://localhost:6969>
//! - HTTP tracker: <http://localhost:7070>
//!
//! ## HTTP tracker
//!
//! The HTTP tracker implements three types of requests:
//!
//! - Announce: <http://127.0.0.1:7070/announce>
//! - Scrape: <http://127.0.0.1:7070/scrape>
//! - Stats: <http://127.0.0.1:7070/stats>
//!
//! If you are using the tracker in `private` or `private_listed` mode you will need to append the authentication key:
//!
//! - Announce: <http://127.0.0.1:7070/announce/key>
//! - Scrape: <http://127.0.0.1:7070/scrape/key>
//!
//! In order to use the HTTP tracker you need to enable at least one server in the configuration:
//!
//! ```toml
//! [[http_trackers]]
//! enabled = true
//! bind_address = "0.0.0.0:7070"
//! ```
//!
//! Refer to the [`HTTP`](crate::servers::http) documentation for more information about the HTTP tracker.
//!
//! ### Announce
//!
//! The `announce` request allows a peer to announce itself and obtain a list of peers for a specific torrent.
//!
//! A sample `announce` request:
//!
//! <http://0.0.0.0:7070/announce?info_hash=%81%00%00%00%00%00%00%00%00%00%00%00%00%00%00%00%00%00%00%00&peer_addr=2.137.87.41&downloaded=0&uploaded=0&peer_id=-qB00000000000000001&port=17548&left=0&event=completed&compact=0>
//!
//! If you want to know more about the `announce` request:
//!
//! - [BEP 03. The `BitTorrent` Protocol Specification](https://www.bittorrent.org/beps/bep_0003.html)
//! - [BEP 23. Tracker Returns Compact Peer Lists](https://www.bittorrent.org/beps/bep_0023.html)
//! - [Vuze announce docs](https://wiki.vuze.com/w/Announce)
//!
//! ### Scrape
//!
//! The `scrape` request allows a peer to get swarm metadata for multiple torrents at the same time.
//!
//! A sample `scrape` request for only one torrent:
//!
//! <http://0.0.0.0:7070/scrape?info_hash=%81%00%00%00%00%00%00%00%00%00%00%00%00%00%00%00%00%00%00%00>
//!
//! The response contains the swarm metadata for that torrent:
//!
//! - `complete`: the number of active peers that have completed downloading, also known as seeders. Peers from which other peers can get a full copy of the torrent.
//! - `downloaded`: the number of peers that have ever completed downloading.
//! - `incomplete`: the number of active peers that have not completed downloading, also known as leechers.
//!
//! The `scrape` response is a bencoded byte array like the following:
//!
//! ```text
//! d5:filesd20:xxxxxxxxxxxxxxxxxxxxd8:completei11e10:downloadedi13772e10:incompletei19e20:yyyyyyyyyyyyyyyyyyyyd8:completei21e10:downloadedi206e10:incompletei20eee
//! ```
//!
//! If you save the response as a file and you open it with a program that can handle binary data you would see:
//!
//! ```text
//! 00000000: 6435 3a66 696c 6573 6432 303a 8100 0000  d5:filesd20:....
//! 00000010: 0000 0000 0000 0000 0000 0000 0000 0000  ................
//! 00000020: 6438 3a63 6f6d 706c 6574 6569 3165 3130  d8:completei1e10
//! 00000030: 3a64 6f77 6e6c 6f61 6465 6469 3065 3130  :downloadedi0e10
//! 00000040: 3a69 6e63 6f6d 706c 6574 6569 3065 6565  :incompletei0eee
//! 00000050: 65                                       e
//! ```
//!
//! `BitTorrent` uses a data formatting specification called [Bencode](https://en.wikipedia.org/wiki/Bencode).
//!
//! If you want to know more about the `scrape` request:
//!
//! - [BEP 48. Tracker Protocol Extension: Scrape](https://www.bittorrent.org/beps/bep_0048.html)
//! - [Vuze scrape docs](https://wiki.vuze.com/w/Scrape)
//!
//! ### Stats
//!
//! The `stats` endpoint exposes the aggregate swarm counters tracked by
//! [`core::statistics`]: total torrents, active torrents, total peers, total seeders, and
//! total leechers. It returns `application/json` by default, and a plaintext rendering
//! when the request's `Accept` header prefers `text/plain`:
//!
//! ```text
//! $ curl -H "Accept: text/plain" http://127.0.0.1:7070/stats
//! total_torrents: 3
//! active_torrents: 2
//! total_peers: 7
//! total_seeders: 3
//! total_leechers: 4
//! ```
//!
//! ### Authentication keys
//!
//! If the tracker is running in `private` or `private_listed` mode you will need to provide a valid authentication key
//! on every announce and scrape request, issued out-of-band by the user repository described in [`core::external`].
//!
//! ## UDP tracker
//!
//! The UDP tracker also implements announce and scrape, framed per BEP 15:
//!
//! - Announce: <udp://127.0.0.1:6969>
//! - Scrape: <udp://127.0.0.1:6969>
//!
//! In order to use the UDP tracker you need to enable at least one server in the configuration:
//!
//! ```toml
//! [[udp_trackers]]
//! enabled = true
//! bind_address = "0.0.0.0:6969"
//! ```
//!
//! Refer to the [`UDP`](crate::servers::udp) documentation for more information about the UDP tracker.
//!
//! If you want to know more about the UDP tracker protocol:
//!
//! - [BEP 15. UDP Tracker Protocol for `BitTorrent`](https://www.bittorrent.org/beps/bep_0015.html)
//!
//! ## WebSocket tracker
//!
//! The [`WebTorrent`](crate::servers::webtorrent) signaling endpoint upgrades a `GET /announce`
//! request to a WebSocket and relays WebRTC `offers`/`answer` messages between peers by
//! `peer_id`, without inspecting the SDP payload it carries.
//!
//! # Components
//!
//! The tracker has three main components:
//!
//! - The core tracker [`core`]
//! - The [`UDP`](crate::servers::udp) tracker
//! - The [`HTTP`](crate::servers::http) tracker, which also serves `/stats`
//!
//! ## Core tracker
//!
//! The core tracker contains the generic tracker logic shared by every transport.
//!
//! The core tracker handles:
//!
//! - Authentication with keys
//! - Authorization using a torrent whitelist
//! - Swarm registry mutation and peer selection
//! - Credit accounting
//! - Statistics
//!
//! See [`core`] for more details.
//!
//! ## UDP tracker
//!
//! UDP trackers focus on performance. Using UDP instead of HTTP removes the overhead
//! of opening and closing TCP connections and reduces response size.
//!
//! You can find more information about UDP trackers on:
//!
//! - [Wikipedia: UDP tracker](https://en.wikipedia.org/wiki/UDP_tracker)
//! - [BEP 15: UDP Tracker Protocol for `BitTorrent`](https://www.bittorrent.org/beps/bep_0015.html)
//!
//! See [`UDP`](crate::servers::udp) for more details on the UDP tracker.
//!
//! ## HTTP tracker
//!
//! The HTTP tracker was the original tracker transport, defined by [BEP 3](https://www.bittorrent.org/beps/bep_0003.html).
//!
//! See [`HTTP`](crate::servers::http) for more details on the HTTP tracker.
//!
//! You can find more information about `BitTorrent` trackers on:
//!
//! - [Wikipedia: `BitTorrent` tracker](https://en.wikipedia.org/wiki/BitTorrent_tracker)
//! - [BEP 3: The `BitTorrent` Protocol Specification](https://www.bittorrent.org/beps/bep_0003.html)
//!
//! # Implemented BEPs
//!
//! BEP stands for `BitTorrent` Enhancement Proposal. BEPs are documents providing information to the `BitTorrent`
//! community or describing a new feature for the `BitTorrent` protocols.
//!
//! You can find all BEPs on <https://www.bittorrent.org/>
//!
//! This tracker implements these BEPs:
//!
//! - [BEP 3](https://www.bittorrent.org/beps/bep_0003.html): The `BitTorrent` Protocol
//! - [BEP 7](https://www.bittorrent.org/beps/bep_0007.html): IPv6 Support
//! - [BEP 15](https://www.bittorrent.org/beps/bep_0015.html): UDP Tracker Protocol for `BitTorrent`
//! - [BEP 23](https://www.bittorrent.org/beps/bep_0023.html): Tracker Returns Compact Peer Lists
//! - [BEP 27](https://www.bittorrent.org/beps/bep_0027.html): Private Torrents
//! - [BEP 48](https://www.bittorrent.org/beps/bep_0048.html): Tracker Protocol Extension: Scrape
//!
//! # Documentation
//!
//! In addition to this documentation you can find a lot of examples in the integration and unit tests.

use torrust_tracker_clock::{clock, time_extent};

pub mod app;
pub mod bootstrap;
pub mod core;
pub mod servers;
pub mod shared;

#[macro_use]
extern crate lazy_static;

/// This code needs to be copied into each crate.
/// Working version, for production.
#[cfg(not(test))]
#[allow(dead_code)]
pub(crate) type CurrentClock = clock::Working;

/// Stopped version, for testing.
#[cfg(test)]
#[allow(dead_code)]
pub(crate) type CurrentClock = clock::Stopped;

/// Working version, for production.
#[cfg(not(test))]
#[allow(dead_code)]
pub(crate) type DefaultTimeExtentMaker = time_extent::WorkingTimeExtentMaker;

/// Stopped version, for testing.
#[cfg(test)]
#[allow(dead_code)]
pub(crate) type DefaultTimeExtentMaker = time_extent::StoppedTimeExtentMaker;
