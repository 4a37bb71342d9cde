// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

mod database;
mod encryption;
mod logging;
mod runtime;

pub use database::{DatabaseConfig, DatabaseConfigLayer};
pub use encryption::{EncryptionConfig, EncryptionConfigLayer, DEVELOPMENT_ENCRYPTION_KEY};
pub use logging::{LoggingConfig, LoggingConfigLayer};
pub use runtime::{RuntimeConfig, RuntimeConfigLayer};
