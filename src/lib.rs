//! s3unzip - extract ZIP archives from S3 into a destination bucket.
//!
//! When an archive object lands in a bucket, one invocation extracts every
//! entry, uploads the non-empty ones under a derived folder path, and emails
//! a summary report built from the invocation's informational log lines.

pub mod config;
pub mod extract;
pub mod handler;
pub mod keepalive;
pub mod notify;
pub mod report;
pub mod store;
