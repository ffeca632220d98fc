//! Read-side projections fed by committed access records.

mod access_feed;

pub use access_feed::AccessFeed;
