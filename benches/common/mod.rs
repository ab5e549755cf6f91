#![allow(dead_code)]

pub mod patch;
pub mod samples;
