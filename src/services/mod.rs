// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod password;
pub mod ws_service;

pub use password::{hash_password, verify_password, DUMMY_PASSWORD_HASH};
pub use ws_service::{UpstreamResponse, WsServiceClient};
