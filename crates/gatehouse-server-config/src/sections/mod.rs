// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections for gatehouse-server.

pub mod backend;
pub mod cors;
pub mod http;
pub mod logging;

pub use backend::{BackendConfig, BackendConfigLayer};
pub use cors::{CorsConfig, CorsConfigLayer, ANY_ORIGIN};
pub use http::{HttpConfig, HttpConfigLayer};
pub use logging::{LogFormat, LoggingConfig, LoggingConfigLayer};
