// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod password;
pub mod seed;
pub mod tokens;

pub use password::{hash_password, verify_password};
pub use seed::{seed_defaults, SeedReport};
pub use tokens::{create_access_token, decode_access_token, hash_refresh_token, issue_refresh_token, Claims};
