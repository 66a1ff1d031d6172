//! Shared primitive types used across the whole desk.

use std::collections::BTreeMap;

use crate::model::Role;

/// A stable, unique identifier for any stored record.
pub type EntityId = String;

/// Headcount per role. Used for both theoretical and manually reported staffing.
pub type StaffingMap = BTreeMap<Role, u32>;

/// ISO calendar date format used for every persisted date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
