pub mod announce;
pub mod scrape;

use derive_more::{Display, From, Into};

#[derive(Debug, Display, From, Into, PartialEq, Eq, Clone, Copy)]
#[display("{query}")]
pub struct Announce {
    query: announce::Query,
}

#[derive(Debug, Display, From, Into, PartialEq, Eq, Clone)]
#[display("{query}")]
pub struct Scrape {
    query: scrape::Query,
}
