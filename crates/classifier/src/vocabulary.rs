//! The closed intent taxonomy, grouped by domain.

/// Intent vocabulary the classifier is allowed to emit, grouped by
/// domain. Group order is preserved so prompt text stays stable.
#[derive(Debug, Clone)]
pub struct IntentVocabulary {
    groups: Vec<(String, Vec<String>)>,
}

fn group(domain: &str, intents: &[&str]) -> (String, Vec<String>) {
    (
        domain.to_string(),
        intents.iter().map(|i| i.to_string()).collect(),
    )
}

impl IntentVocabulary {
    /// Build a vocabulary from explicit domain groups.
    pub fn new(groups: Vec<(String, Vec<String>)>) -> Self {
        Self { groups }
    }

    /// The built-in taxonomy: hotel and hospital services plus general
    /// intents.
    pub fn builtin() -> Self {
        Self {
            groups: vec![
                group(
                    "hotel",
                    &[
                        "room_booking",
                        "check_in",
                        "check_out",
                        "room_service",
                        "laundry_service",
                        "wake_up_call",
                        "wifi_info",
                        "amenities_info",
                        "dining_hours",
                        "concierge_service",
                        "housekeeping",
                    ],
                ),
                group(
                    "hospital",
                    &[
                        "appointment_booking",
                        "appointment_reminder",
                        "directions",
                        "department_info",
                        "triage_assistant",
                        "patient_history",
                        "emergency_info",
                        "visiting_hours",
                        "insurance_info",
                    ],
                ),
                group(
                    "general",
                    &[
                        "greeting",
                        "goodbye",
                        "help",
                        "general_inquiry",
                        "unknown",
                        "fallback",
                    ],
                ),
            ],
        }
    }

    /// Flattened list of all intents, in group order.
    pub fn all_intents(&self) -> Vec<&str> {
        self.groups
            .iter()
            .flat_map(|(_, intents)| intents.iter().map(String::as_str))
            .collect()
    }

    /// Whether an intent is part of the vocabulary.
    pub fn contains(&self, intent: &str) -> bool {
        self.groups
            .iter()
            .any(|(_, intents)| intents.iter().any(|i| i == intent))
    }

    /// Domain groups, for suggestion prompts.
    pub fn groups(&self) -> &[(String, Vec<String>)] {
        &self.groups
    }

    /// Comma-separated intent list for the classifier system prompt.
    pub fn prompt_list(&self) -> String {
        self.all_intents().join(", ")
    }

    /// Human-readable description of a vocabulary intent.
    pub fn describe(intent: &str) -> &'static str {
        match intent {
            "room_booking" => "Book hotel rooms and check availability",
            "check_in" => "Hotel check-in process and procedures",
            "check_out" => "Hotel check-out process and procedures",
            "room_service" => "Order food and beverages to your room",
            "laundry_service" => "Laundry and dry cleaning services",
            "wake_up_call" => "Schedule wake-up calls",
            "wifi_info" => "WiFi password and connection information",
            "amenities_info" => "Hotel facilities and services information",
            "dining_hours" => "Restaurant and dining hours",
            "concierge_service" => "Concierge assistance and services",
            "housekeeping" => "Room cleaning and maintenance requests",
            "appointment_booking" => "Schedule medical appointments",
            "appointment_reminder" => "Appointment reminders and confirmations",
            "directions" => "Hospital navigation and directions",
            "department_info" => "Information about hospital departments",
            "triage_assistant" => "Basic health assessment and triage",
            "patient_history" => "Access patient medical history",
            "emergency_info" => "Emergency services information",
            "visiting_hours" => "Hospital visiting hours",
            "insurance_info" => "Insurance and billing information",
            "greeting" => "Greeting and welcome messages",
            "goodbye" => "Farewell and goodbye messages",
            "help" => "Help and assistance requests",
            "general_inquiry" => "General questions and inquiries",
            "unknown" => "Unclear or unrecognized intent",
            "fallback" => "Default response when unsure",
            _ => "Unknown intent",
        }
    }
}

impl Default for IntentVocabulary {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_all_domains() {
        let vocabulary = IntentVocabulary::builtin();
        let all = vocabulary.all_intents();

        assert_eq!(all.len(), 26);
        assert!(vocabulary.contains("room_booking"));
        assert!(vocabulary.contains("appointment_booking"));
        assert!(vocabulary.contains("general_inquiry"));
        assert!(vocabulary.contains("fallback"));
        assert!(!vocabulary.contains("order_pizza"));
    }

    #[test]
    fn prompt_list_preserves_group_order() {
        let list = IntentVocabulary::builtin().prompt_list();

        let hotel = list.find("room_booking").unwrap();
        let hospital = list.find("appointment_booking").unwrap();
        let general = list.find("greeting").unwrap();
        assert!(hotel < hospital);
        assert!(hospital < general);
    }

    #[test]
    fn describe_known_and_unknown() {
        assert_eq!(
            IntentVocabulary::describe("room_booking"),
            "Book hotel rooms and check availability"
        );
        assert_eq!(IntentVocabulary::describe("xyz123"), "Unknown intent");
    }
}
