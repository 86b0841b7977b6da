//! A two-pass linker for a toy MARIE-derived assembly dialect.

pub mod linker;
