// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod autosave;
pub mod bus;
pub mod cli;
pub mod commands;
pub mod db;
pub mod derive;
pub mod editor;
pub mod errors;
pub mod models;
pub mod session;
pub mod store;
pub mod utils;
