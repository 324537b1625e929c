// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services: API access, QR lifecycle, reports, scans and sessions.

pub mod api;
pub mod live_qr;
pub mod qr;
pub mod report;
pub mod scan;
pub mod session;

pub use api::ApiClient;
pub use live_qr::{LiveQrHandle, LiveQrOptions, QrBackend, QrCommand, QrSnapshot};
pub use qr::QrController;
pub use report::{aggregate, ReportLoader};
pub use scan::{handle_scan, ScanOutcome};
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionStore};
