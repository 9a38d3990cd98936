//! Domain types, the question catalog and storage traits for carcheck.
//!
//! Everything in this crate is free of I/O: storage backends live in the
//! `carcheck` crate and implement the traits in [`storage`].

pub mod checklist;
pub mod storage;
