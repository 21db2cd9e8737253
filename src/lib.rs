//! Recit command line toolkit
//!
//! Front end over `recit-common`: loads project exports and manuscripts,
//! runs character detection in batch, drives the suggestion review and
//! prints statistics and counts.

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod report;
pub mod review;
pub mod scanner;
