//! Address registry.
//!
//! A registry is built once from loader rows and then only read: city
//! names map to streets, streets to sorted house number ranges.

mod alternates;
mod book;
mod city;
mod street;

pub use alternates::AlternateNames;
pub use book::Registry;
pub use city::CityIndex;
pub use street::{ParityMode, StreetIndex};
