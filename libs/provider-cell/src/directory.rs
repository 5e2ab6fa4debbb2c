// libs/provider-cell/src/directory.rs
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

use shared_models::{AppointmentType, AppointmentTypeSpec, Provider};

const NEPHROLOGY: &str = "Nephrology";

/// Static provider roster and the appointment-type duration table.
///
/// Built once at startup and shared read-only between the slot generator
/// and the booking engine, so both sides agree on every duration.
pub struct ProviderDirectory {
    providers: Vec<Provider>,
    type_specs: HashMap<AppointmentType, AppointmentTypeSpec>,
}

impl ProviderDirectory {
    /// Reference roster: three providers, one nephrology-capable.
    pub fn new() -> Self {
        let providers = vec![
            Provider {
                id: Uuid::new_v4(),
                display_name: "Dr. Amara Diallo".to_string(),
                specialty: NEPHROLOGY.to_string(),
            },
            Provider {
                id: Uuid::new_v4(),
                display_name: "Dr. Lucas Ferreira".to_string(),
                specialty: "Internal Medicine".to_string(),
            },
            Provider {
                id: Uuid::new_v4(),
                display_name: "Dr. Ines Moreau".to_string(),
                specialty: "General Practice".to_string(),
            },
        ];

        Self::with_providers(providers)
    }

    pub fn with_providers(providers: Vec<Provider>) -> Self {
        debug!("Provider directory loaded with {} providers", providers.len());
        Self {
            providers,
            type_specs: reference_type_specs(),
        }
    }

    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    pub fn find(&self, provider_id: Uuid) -> Option<&Provider> {
        self.providers.iter().find(|p| p.id == provider_id)
    }

    pub fn spec(&self, kind: AppointmentType) -> &AppointmentTypeSpec {
        // the table covers the closed AppointmentType enum exhaustively
        &self.type_specs[&kind]
    }

    pub fn duration_minutes(&self, kind: AppointmentType) -> i32 {
        self.spec(kind).duration_minutes
    }

    /// Hemodialysis is restricted to the nephrology-capable provider.
    pub fn offers_hemodialysis(&self, provider_id: Uuid) -> bool {
        self.find(provider_id)
            .map(|p| p.specialty == NEPHROLOGY)
            .unwrap_or(false)
    }
}

impl Default for ProviderDirectory {
    fn default() -> Self {
        Self::new()
    }
}

fn reference_type_specs() -> HashMap<AppointmentType, AppointmentTypeSpec> {
    HashMap::from([
        (
            AppointmentType::Consultation,
            AppointmentTypeSpec {
                label: "Consultation".to_string(),
                duration_minutes: 30,
                description: "General consultation visit".to_string(),
            },
        ),
        (
            AppointmentType::Hemodialysis,
            AppointmentTypeSpec {
                label: "Hemodialysis".to_string(),
                duration_minutes: 240,
                description: "Hemodialysis session, nephrology unit".to_string(),
            },
        ),
        (
            AppointmentType::FollowUp,
            AppointmentTypeSpec {
                label: "Follow-up".to_string(),
                duration_minutes: 45,
                description: "Review of treatment and test results".to_string(),
            },
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_durations_match_policy() {
        let directory = ProviderDirectory::new();
        assert_eq!(directory.duration_minutes(AppointmentType::Consultation), 30);
        assert_eq!(directory.duration_minutes(AppointmentType::Hemodialysis), 240);
        assert_eq!(directory.duration_minutes(AppointmentType::FollowUp), 45);
    }

    #[test]
    fn exactly_one_provider_offers_hemodialysis() {
        let directory = ProviderDirectory::new();
        let capable = directory
            .providers()
            .iter()
            .filter(|p| directory.offers_hemodialysis(p.id))
            .count();
        assert_eq!(capable, 1);
    }

    #[test]
    fn unknown_provider_is_not_found() {
        let directory = ProviderDirectory::new();
        assert!(directory.find(Uuid::new_v4()).is_none());
        assert!(!directory.offers_hemodialysis(Uuid::new_v4()));
    }
}
