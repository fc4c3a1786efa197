//! redditshelf library - keeps a shelf of serialized reddit stories and the
//! ebooks generated from them.
//!
//! This library provides the core functionality for the `redditshelf` CLI tool.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod service;
pub mod shelf;
pub mod story;
pub mod templates;
