use serde::{Deserialize, Serialize};

// =============================================================================
// Sector Routing Profiles
// =============================================================================

/// One routing table row: a tool and the keywords that select it.
///
/// Entries are an ordered list rather than a map so that matching is
/// deterministic when several tools share a keyword.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingEntry {
    /// Tool name the entry routes to.
    pub tool: String,
    /// Keywords matched against classified intents.
    pub keywords: Vec<String>,
}

/// Deployment profile for one sector: which tools exist and how intents
/// map onto them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorProfile {
    /// Sector name (e.g. "generic", "hotel", "hospital").
    pub sector: String,
    /// Tools the sector exposes.
    pub available_tools: Vec<String>,
    /// Ordered intent-to-tool routing table.
    pub intent_mapping: Vec<RoutingEntry>,
}

fn entry(tool: &str, keywords: &[&str]) -> RoutingEntry {
    RoutingEntry {
        tool: tool.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
    }
}

fn tools(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

impl SectorProfile {
    /// Built-in profile by name, if one exists.
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "generic" => Some(Self::generic()),
            "hotel" => Some(Self::hotel()),
            "hospital" => Some(Self::hospital()),
            _ => None,
        }
    }

    /// Sector-agnostic default profile.
    pub fn generic() -> Self {
        Self {
            sector: "generic".to_string(),
            available_tools: tools(&[
                "booking",
                "information",
                "reminder",
                "support",
                "notification",
                "search",
                "help",
                "greeting",
                "goodbye",
            ]),
            intent_mapping: vec![
                entry("booking", &["book", "reserve", "schedule", "appointment"]),
                entry(
                    "information",
                    &["info", "details", "hours", "location", "contact"],
                ),
                entry("reminder", &["remind", "reminder", "alert", "notify"]),
                entry("support", &["help", "support", "assist", "issue"]),
                entry("notification", &["notify", "alert", "message", "sms"]),
                entry("search", &["find", "search", "lookup", "locate"]),
                entry("help", &["help", "assist", "guide", "support"]),
                entry(
                    "greeting",
                    &["hello", "hi", "good morning", "good afternoon"],
                ),
                entry("goodbye", &["bye", "goodbye", "see you", "thank you"]),
            ],
        }
    }

    /// Hotel deployment profile.
    pub fn hotel() -> Self {
        Self {
            sector: "hotel".to_string(),
            available_tools: tools(&[
                "booking",
                "information",
                "reminder",
                "support",
                "notification",
                "search",
                "help",
                "greeting",
                "goodbye",
                "room_service",
                "housekeeping",
                "concierge",
            ]),
            intent_mapping: vec![
                entry("booking", &["book", "reserve", "room", "check-in", "check-out"]),
                entry(
                    "information",
                    &["info", "details", "wifi", "amenities", "hours"],
                ),
                entry("room_service", &["food", "order", "room service", "dining"]),
                entry(
                    "housekeeping",
                    &["clean", "towel", "housekeeping", "maintenance"],
                ),
                entry("concierge", &["concierge", "assist", "recommendation"]),
                entry("reminder", &["remind", "reminder", "wake-up", "call"]),
                entry("support", &["help", "support", "assist", "issue"]),
                entry("notification", &["notify", "alert", "message", "sms"]),
                entry("search", &["find", "search", "lookup", "locate"]),
                entry("help", &["help", "assist", "guide", "support"]),
                entry(
                    "greeting",
                    &["hello", "hi", "good morning", "good afternoon"],
                ),
                entry("goodbye", &["bye", "goodbye", "see you", "thank you"]),
            ],
        }
    }

    /// Hospital deployment profile.
    pub fn hospital() -> Self {
        Self {
            sector: "hospital".to_string(),
            available_tools: tools(&[
                "booking",
                "information",
                "reminder",
                "support",
                "notification",
                "search",
                "help",
                "greeting",
                "goodbye",
                "appointment",
                "triage",
                "emergency",
            ]),
            intent_mapping: vec![
                entry("booking", &["book", "schedule", "appointment", "visit"]),
                entry(
                    "information",
                    &["info", "details", "hours", "department", "location"],
                ),
                entry("appointment", &["appointment", "schedule", "doctor", "visit"]),
                entry("triage", &["symptom", "health", "assessment", "triage"]),
                entry(
                    "emergency",
                    &["emergency", "urgent", "critical", "ambulance"],
                ),
                entry("reminder", &["remind", "reminder", "appointment", "follow-up"]),
                entry("support", &["help", "support", "assist", "issue"]),
                entry("notification", &["notify", "alert", "message", "sms"]),
                entry("search", &["find", "search", "lookup", "locate"]),
                entry("help", &["help", "assist", "guide", "support"]),
                entry(
                    "greeting",
                    &["hello", "hi", "good morning", "good afternoon"],
                ),
                entry("goodbye", &["bye", "goodbye", "see you", "thank you"]),
            ],
        }
    }
}

impl Default for SectorProfile {
    fn default() -> Self {
        Self::generic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_profiles_resolve_by_name() {
        assert_eq!(SectorProfile::by_name("generic").unwrap().sector, "generic");
        assert_eq!(SectorProfile::by_name("hotel").unwrap().sector, "hotel");
        assert_eq!(
            SectorProfile::by_name("hospital").unwrap().sector,
            "hospital"
        );
        assert!(SectorProfile::by_name("bank").is_none());
    }

    #[test]
    fn sector_tools_extend_generic_set() {
        let hotel = SectorProfile::hotel();
        assert!(hotel.available_tools.contains(&"room_service".to_string()));
        assert!(hotel.available_tools.contains(&"help".to_string()));

        let hospital = SectorProfile::hospital();
        assert!(hospital.available_tools.contains(&"triage".to_string()));
        assert!(hospital.available_tools.contains(&"booking".to_string()));
    }
}
