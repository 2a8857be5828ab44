// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ErrorCode {
    // Request validation errors (10000–10999)
    // These invalidate the whole batch before any send is attempted.
    InvalidParameter = 10000,
    UnsupportedFileFormat = 10010,
    RecipientFileParseError = 10020,
    MissingEmailColumn = 10030,
    MissingConfiguration = 10040,

    // Per-recipient errors (20000–20999)
    // Captured as a failed outcome for that recipient; the batch continues.
    MissingAddress = 20000,

    // Mail service errors (50000–50999)
    SmtpCommandFailed = 50030,
    SmtpConnectionFailed = 50040,

    // Internal system errors (70000–70999)
    InternalError = 70000,
}
