//! Input of measured force-extension curves.

pub mod columns;
