// Copyright 2026 Formfill Contributors
// SPDX-License-Identifier: Apache-2.0

//! Formfill library — semantic job-application form filler.
//!
//! Drives a headless Chromium over CDP, discovers form controls by
//! attribute-synonym matching, and fills them from a stored candidate
//! profile. Decision logic (field resolution, widget classification,
//! option scoring) is pure Rust over JSON probe output; the browser is
//! only ever touched through the [`driver::PageDriver`] trait.

pub mod cli;
pub mod driver;
pub mod engine;
pub mod profile;
pub mod rest;
pub mod store;
