// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Storage layer (in-memory dataset and comment store).

pub mod store;

pub use store::{ActiveDataset, DatasetStore};
