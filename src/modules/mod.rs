// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

pub mod batch;
pub mod common;
pub mod dispatch;
pub mod error;
pub mod logger;
pub mod message;
pub mod metrics;
pub mod recipient;
pub mod settings;
pub mod template;
pub mod transport;
pub mod utils;
