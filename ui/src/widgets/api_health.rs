use chrono::{DateTime, Utc};
use egui::{Color32, Response, Ui};
use roster_business::{ApiAvailability, ApiHealth};
use roster_states::StateCtx;

use crate::utils::colors::{COLOR_AMBER, COLOR_GREEN, COLOR_RED};

/// Radius of the status indicator circle (in pixels)
const STATUS_DOT_RADIUS: f32 = 5.0;

/// Cached UI version string to avoid repeated computation
fn ui_version() -> &'static str {
    use std::sync::OnceLock;
    static UI_VERSION: OnceLock<String> = OnceLock::new();
    UI_VERSION.get_or_init(roster_business::version_info::format_env_version)
}

fn format_tooltip(status: &str, checked_at: Option<DateTime<Utc>>) -> String {
    let ui_ver = ui_version();

    match checked_at {
        Some(at) => format!(
            "UI: {ui_ver}\nDirectory: {status} (checked {} UTC)",
            at.format("%H:%M:%S")
        ),
        None => format!("UI: {ui_ver}\nDirectory: {status}"),
    }
}

/// Renders a single status dot with tooltip using a drawn circle
fn status_dot(ui: &mut Ui, tooltip_text: String, dot_color: Color32) -> Response {
    // Allocate space for the circle
    let (rect, response) = ui.allocate_exact_size(
        egui::vec2(STATUS_DOT_RADIUS * 2.0, STATUS_DOT_RADIUS * 2.0),
        egui::Sense::hover(),
    );

    // Draw the circle
    let center = rect.center();
    ui.painter()
        .circle(center, STATUS_DOT_RADIUS, dot_color, egui::Stroke::NONE);

    response.on_hover_text(tooltip_text)
}

/// Get the directory health dot info (tooltip and color)
fn get_api_health_info(state_ctx: &StateCtx) -> (String, Color32) {
    match state_ctx
        .cached::<ApiHealth>()
        .map(|health| health.api_availability())
    {
        Some(ApiAvailability::Available(at)) => (format_tooltip("healthy", Some(at)), COLOR_GREEN),
        Some(ApiAvailability::Unavailable((at, err))) => (format_tooltip(err, Some(at)), COLOR_RED),
        _ => (format_tooltip("checking", None), COLOR_AMBER),
    }
}

/// Displays the directory API health indicator centered in the current row.
///
/// The dot has a tooltip showing the probe outcome and version information.
pub fn api_health(state_ctx: &StateCtx, ui: &mut Ui) -> Response {
    let (tooltip, color) = get_api_health_info(state_ctx);

    ui.horizontal(|ui| status_dot(ui, tooltip, color)).inner
}
