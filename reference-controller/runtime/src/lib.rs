#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub use reference_controller_core as core;
pub use reference_controller_k8s_api as k8s;
pub use reference_controller_k8s_index as index;

pub mod admission;
mod args;
mod authorizer;
mod metrics;

pub use self::{
    admission::Admission, args::Args, authorizer::SubjectAccessReviews, metrics::AdmissionMetrics,
};
