//! Hostname rule table loaded from hosts or dnsmasq style files.
//!
//! A [`rules::RuleStore`] owns the published table, a single background
//! worker ([`rules::worker::run`]) parses the requested file and swaps the
//! table in once the parse succeeds. Lookups never wait for a reload.

pub mod config;
pub mod error;
pub mod logger;
pub mod metrics;
pub mod rules;
pub mod runtime;

pub use error::RulesError;
pub use rules::{LoadStatus, Mode, RuleStore, RuleTable};
