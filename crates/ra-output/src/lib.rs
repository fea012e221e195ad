//! `ra-output` — delivery-report writer for the `relay_alloc` solver.
//!
//! # Report format
//!
//! One block per flow, ordered by ascending external flow id:
//!
//! ```text
//! f count
//! t x y amount      × count, ascending by (t, x, y)
//! ```
//!
//! Schedule items for the same `(t, x, y)` slot are merged before printing;
//! `count` is the number of merged non-zero entries.  Amounts are printed as
//! integers when within tolerance of their rounded value, otherwise with six
//! fractional digits.
//!
//! The writer is generic over `io::Write`; the binary drives it with a
//! buffered stdout handle, tests with a `Vec<u8>` sink.

pub mod error;
pub mod report;


pub use error::{OutputError, OutputResult};
pub use report::{format_amount, write_report};
