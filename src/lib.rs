// Library root
// -----------
// Sync localized string tables with OneSky. Two binaries sit on top of it:
// `translations-upload` publishes the extracted source strings and
// `translations-download` pulls translations back into the locale bundles.
//
// Module responsibilities:
// - `auth`: request signing (timestamp + MD5 digest).
// - `api`: blocking HTTP client for the upload and download endpoints.
// - `config`: the static project/locale list loaded at startup.
// - `paths`: where each locale's string table lives on disk.
// - `extract`: producing the string table from the source tree.
// - `sync`: the upload and download flows, independent of the terminal.
// - `ui`: terminal prompt, spinner and report lines.
// - `cli`: flags shared by both binaries and logging setup.
pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod paths;
pub mod sync;
pub mod ui;

pub use error::SyncError;
