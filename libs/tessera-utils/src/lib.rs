#![forbid(unsafe_code)]

pub mod humantime_serde;
