//! Reusable rendering helpers.

pub mod histogram;
pub mod sub_tabs;
