//! Keyword routing table.

use switchboard_core::{RoutingEntry, SectorProfile};

/// Tool every unmatched intent falls back to.
pub const DEFAULT_TOOL: &str = "help";

/// Ordered intent-to-tool matching over a sector's routing entries.
///
/// Resolution runs in passes, first match wins:
/// 1. exact keyword membership, in table order;
/// 2. keyword contained in the lowercased intent, in table order;
/// 3. the intent names one of the table's tools directly;
/// 4. the default tool.
#[derive(Debug, Clone)]
pub struct RoutingTable {
    entries: Vec<RoutingEntry>,
}

impl RoutingTable {
    pub fn new(entries: Vec<RoutingEntry>) -> Self {
        Self { entries }
    }

    pub fn from_sector(profile: &SectorProfile) -> Self {
        Self::new(profile.intent_mapping.clone())
    }

    /// Resolve an intent to a tool name.
    pub fn resolve(&self, intent: &str) -> &str {
        let lowered = intent.to_lowercase();

        for entry in &self.entries {
            if entry.keywords.iter().any(|k| k == intent) {
                return &entry.tool;
            }
        }

        for entry in &self.entries {
            if entry.keywords.iter().any(|k| lowered.contains(k.as_str())) {
                return &entry.tool;
            }
        }

        if let Some(entry) = self.entries.iter().find(|e| e.tool == intent) {
            return &entry.tool;
        }

        DEFAULT_TOOL
    }

    pub fn entries(&self) -> &[RoutingEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generic_table() -> RoutingTable {
        RoutingTable::from_sector(&SectorProfile::generic())
    }

    #[test]
    fn exact_keyword_match() {
        let table = generic_table();
        assert_eq!(table.resolve("book"), "booking");
        assert_eq!(table.resolve("goodbye"), "goodbye");
    }

    #[test]
    fn substring_match_catches_compound_intents() {
        let table = generic_table();
        assert_eq!(table.resolve("room_booking"), "booking");
        // First entry wins: booking's "appointment" keyword outranks the
        // reminder entry further down.
        assert_eq!(table.resolve("appointment_reminder"), "booking");
    }

    #[test]
    fn exact_pass_runs_before_substring_pass() {
        // "help" is an exact keyword of the support entry, which precedes
        // the help entry in table order.
        let table = generic_table();
        assert_eq!(table.resolve("help"), "support");
    }

    #[test]
    fn intent_naming_a_tool_resolves_to_it() {
        // No greeting keyword appears inside "greeting" itself, so only
        // the tool-name pass routes it.
        let table = generic_table();
        assert_eq!(table.resolve("greeting"), "greeting");
        assert_eq!(table.resolve("notification"), "notification");
    }

    #[test]
    fn unmatched_intent_falls_back_to_help() {
        let table = generic_table();
        assert_eq!(table.resolve("xyz123"), DEFAULT_TOOL);
    }

    #[test]
    fn matching_lowercases_the_intent() {
        let table = generic_table();
        assert_eq!(table.resolve("ROOM_BOOKING"), "booking");
    }

    #[test]
    fn hotel_table_routes_hotel_vocabulary() {
        let table = RoutingTable::from_sector(&SectorProfile::hotel());
        assert_eq!(table.resolve("wifi_info"), "information");
        assert_eq!(table.resolve("housekeeping"), "housekeeping");
        assert_eq!(table.resolve("wake_up_call"), "reminder");
    }
}
