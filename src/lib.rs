//! Extracts structured listing data from Booli apartment pages and
//! archives each record plus its images, skipping work a previous run
//! already did.

pub mod fetch;
pub mod models;
pub mod parsers;
pub mod scrapers;
pub mod storage;
