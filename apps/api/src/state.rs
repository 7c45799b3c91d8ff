use agentguard_application::PolicyEnforcementService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub policy_service: PolicyEnforcementService,
}
