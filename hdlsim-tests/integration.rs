//! Integration tests for Hdlsim
//!
//! These tests drive the full path from command-line plusargs through
//! configuration, scenario construction, the event loop and the report.

#[path = "integration/driver_loop.rs"]
mod driver_loop;

#[path = "integration/command_args.rs"]
mod command_args;

#[path = "integration/properties.rs"]
mod properties;
