//! A local, watch-fed view of the resources that garden objects reference.
//!
//! Each indexed kind is fed by its own watch. The index only records the namespace, name, UID and
//! resource version of each resource, so secret data is never retained.
//!
//! Lookups may lag behind the API server: a resource that was just created may not be visible
//! yet, and a resource that was just deleted may still be found. The index is not considered
//! ready until every kind has completed its initial listing; see [`Synced`].

#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod index;
mod lookup;
pub mod metrics;
mod synced;

#[cfg(test)]
mod tests;

pub use self::{
    index::{Entry, Index, SharedIndex},
    lookup::Reader,
    synced::Synced,
};
