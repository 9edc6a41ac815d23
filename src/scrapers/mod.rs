pub mod booli;
pub mod collector;
pub mod images;

pub use booli::listing_collector;
pub use collector::{Collector, PageFragment};
