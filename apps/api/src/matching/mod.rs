//! Job Matcher: profile assembly, per-job scoring and tiered selection.

pub mod profile;
pub mod scoring;
pub mod selection;
pub mod service;

pub use service::{JobMatcher, MatchOptions, ResumeMatchOptions};
