//! Column definitions for the users table.

use egui_extras::Column;

/// Fixed column widths for consistent table layout
pub const ROLE_WIDTH: f32 = 100.0;
pub const STATUS_WIDTH: f32 = 90.0;
pub const CREATED_WIDTH: f32 = 110.0;
pub const ACTIONS_WIDTH: f32 = 150.0;
pub const ROW_HEIGHT: f32 = 30.0;
pub const HEADER_HEIGHT: f32 = 24.0;

/// Table column configuration for the users table.
///
/// Returns a vector of column definitions in order:
/// - Username (flexible, fills remaining space)
/// - Email (flexible, wider floor for long addresses)
/// - Role (fixed)
/// - Status (fixed)
/// - Created (fixed)
/// - Actions (fixed)
#[inline]
pub fn table_columns() -> Vec<Column> {
    vec![
        Column::remainder().at_least(120.0), // Username - flexible
        Column::remainder().at_least(180.0), // Email - flexible
        Column::exact(ROLE_WIDTH),           // Role - fixed
        Column::exact(STATUS_WIDTH),         // Status - fixed
        Column::exact(CREATED_WIDTH),        // Created - fixed
        Column::exact(ACTIONS_WIDTH),        // Actions - fixed
    ]
}
