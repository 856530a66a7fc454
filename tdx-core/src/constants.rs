//! Fixed values shared across the crate.

/// PRODID written to calendars that don't carry one.
pub const DEFAULT_PRODID: &str = "-//KKGA.ME//NONSGML tdx//EN";

/// VERSION written to calendars that don't carry one.
pub const DEFAULT_ICAL_VERSION: &str = "2.0";

/// Extension of item files inside a collection directory.
pub const ICS_EXTENSION: &str = "ics";

/// Sidecar file holding a collection's display name.
pub const META_DISPLAYNAME: &str = "displayname";

/// Sidecar file holding a collection's color.
pub const META_COLOR: &str = "color";

pub const PRIORITY_HIGH: u8 = 1;
pub const PRIORITY_MEDIUM: u8 = 5;
pub const PRIORITY_LOW: u8 = 6;
