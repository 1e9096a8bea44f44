//! Google Drive service handle
//!
//! `DriveService` is the entry point the filesystem layer talks to. It owns
//! an `AuthenticatedClient` from `drive-auth` and builds Drive v3 requests
//! on top of it. Only the identity probe (`about`) is implemented here; the
//! filesystem operations live with their callers.

pub mod error;
pub mod service;

pub use error::{Error, Result};
pub use service::{About, DRIVE_API_BASE, DriveService, StorageQuota, User};
