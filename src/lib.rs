//! Exploratory statistics for a tabular dataset.
//!
//! One run loads a table, drops incomplete rows, keeps the numeric columns,
//! draws three summary charts, and reports the mean, standard deviation,
//! skewness and excess kurtosis of a chosen attribute together with a
//! distribution-shape label.
//!
//! - [`data`]: table model, file loading, preprocessing
//! - [`stats`]: moments, shape labels, describe and correlation
//! - [`report`]: plain-text rendering of summaries and the moment report
//! - [`plot`]: chart requests, the [`plot::PlotRenderer`] trait, PNG output
//! - [`pipeline`]: the single-pass run over one [`pipeline::Session`]
//! - [`config`]: run settings with serde-backed overrides

pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod plot;
pub mod report;
pub mod stats;
