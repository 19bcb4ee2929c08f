//! Canonical status tokens and their chart colors
//!
//! Status is an open set: the spreadsheet may introduce new labels at any time.
//! Only the tokens below get special treatment in KPIs; everything else is
//! carried through untouched and painted with the fallback color.

/// Order finished
pub const COMPLETED: &str = "CONCLUÍDO";

/// Order cancelled
pub const CANCELLED: &str = "CANCELADO";

/// Order waiting for a budget
pub const TO_BUDGET: &str = "ORÇAR";

/// Placeholder for a blank status cell
pub const UNSET: &str = "S/S";

/// Fallback color for statuses without an entry in the map
pub const FALLBACK_COLOR: &str = "#94a3b8";

const STATUS_COLORS: &[(&str, &str)] = &[
    (TO_BUDGET, "#f59e0b"),    // Amber
    ("EXECUTANDO", "#3b82f6"), // Blue
    ("FINALIZADO", "#10b981"), // Emerald
    (CANCELLED, "#ef4444"),    // Red
    ("AGUARDANDO", "#8b5cf6"), // Violet
    ("IND REC", "#64748b"),    // Slate
];

/// Hex color for a status label
pub fn status_color(status: &str) -> &'static str {
    STATUS_COLORS
        .iter()
        .find(|(name, _)| *name == status)
        .map(|(_, color)| *color)
        .unwrap_or(FALLBACK_COLOR)
}
