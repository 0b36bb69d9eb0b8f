// SPDX-License-Identifier: MIT

pub mod condition;
pub mod config;
pub mod error;
pub mod loader;
