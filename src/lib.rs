// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Wellness journal: typed client for the journal's document store
//!
//! This crate provides the data-access layer for the wellness/journaling
//! app (user profiles and journal entries in Firestore, sessions from
//! Firebase Authentication), the screen and navigation boundary the app
//! drives it through, and the diagnostics used to verify a deployment.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod navigation;
pub mod screens;
pub mod services;
pub mod time_utils;

pub use db::{DocumentStore, SharedStore};
pub use error::AppError;
