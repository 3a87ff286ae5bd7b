pub mod app;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod error;
pub mod input;
pub mod interrupt;
pub mod output;
pub mod prompt;
pub mod pubchem;
pub mod report;
pub mod stats;
pub mod style;
pub mod xref;
