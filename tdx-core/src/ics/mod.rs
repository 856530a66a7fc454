//! ICS file generation and parsing.
//!
//! This module handles reading and writing .ics files according to RFC 5545.

mod generate;
mod model;
mod parse;
pub mod value;

pub use generate::generate_ics;
pub use model::{CalendarObject, Component, Property, PropertyBag, PropertyKind, ValueKind, VTODO};
pub use parse::parse_todo_calendar;
