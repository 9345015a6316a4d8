#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod garden;

pub use k8s_openapi::api::{self, core::v1::Secret};
pub use kube::{
    api::{Api, ObjectMeta, ResourceExt},
    Client, Error, Resource,
};
