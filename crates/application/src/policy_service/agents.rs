use super::*;

impl PolicyEnforcementService {
    /// Sets both logging toggles of one agent to `policy`.
    ///
    /// The update mask is restricted to `advanced_settings`, so no other
    /// agent configuration is written.
    pub async fn enforce_agent_logging(
        &self,
        agent_name: &str,
        policy: LoggingPolicy,
        endpoint: &ApiEndpoint,
    ) -> AppResult<Agent> {
        let mut agent = self.agent_api.get_agent(endpoint, agent_name).await?;
        agent.apply_logging_policy(policy);

        let updated = self
            .agent_api
            .update_agent(endpoint, agent, &FieldMask::advanced_settings())
            .await?;

        info!(
            resource_name = %updated.name,
            policy = %policy,
            "updated agent logging policy"
        );
        Ok(updated)
    }

    /// Sets the logging flag of a legacy project agent to `policy`.
    ///
    /// The legacy API only has one logging flag; interaction logging cannot
    /// be controlled through it.
    pub async fn enforce_legacy_agent_logging(
        &self,
        agent_name: &str,
        policy: LoggingPolicy,
        endpoint: &ApiEndpoint,
    ) -> AppResult<LegacyAgent> {
        let parent = legacy_agent_parent(agent_name)?;
        let updated = self
            .legacy_agent_api
            .set_agent(
                endpoint,
                LegacyAgent::logging_update(parent.as_str(), policy),
                &FieldMask::legacy_logging(),
            )
            .await?;

        info!(
            parent = %parent,
            policy = %policy,
            "updated legacy agent logging policy"
        );
        Ok(updated)
    }

    /// Enforces the logging policy on every agent under `parent`.
    pub async fn enforce_logging_for_all_agents(
        &self,
        parent: &str,
        policy: LoggingPolicy,
        endpoint: &ApiEndpoint,
    ) -> AppResult<Vec<Agent>> {
        let agents = self.agent_api.list_agents(endpoint, parent).await?;

        let mut outcomes = Vec::with_capacity(agents.len());
        for agent in agents {
            let outcome = self
                .enforce_agent_logging(agent.name.as_str(), policy, endpoint)
                .await;
            outcomes.push((agent.name, outcome));
        }

        collect_fan_out("enforce_logging_for_all_agents", parent, outcomes)
    }
}

/// Derives the owning parent from a legacy agent resource name.
///
/// `projects/p/agent` and `projects/p/locations/l/agent` resolve to the path
/// before the `agent` segment; other names fall back to `projects/<p>`.
fn legacy_agent_parent(agent_name: &str) -> AppResult<String> {
    let segments = agent_name
        .trim_matches('/')
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>();

    if segments.len() < 2 || segments[0] != "projects" {
        return Err(AppError::MalformedEvent(format!(
            "legacy agent resource name '{agent_name}' does not start with projects/<id>"
        )));
    }

    let parent_segments = match segments.iter().position(|segment| *segment == "agent") {
        Some(index) if index >= 2 => &segments[..index],
        _ => &segments[..2],
    };

    Ok(parent_segments.join("/"))
}

#[cfg(test)]
mod parent_tests {
    use super::legacy_agent_parent;

    #[test]
    fn legacy_parent_strips_agent_segment() {
        assert_eq!(
            legacy_agent_parent("projects/p/agent").ok().as_deref(),
            Some("projects/p")
        );
        assert_eq!(
            legacy_agent_parent("projects/p/locations/europe-west2/agent")
                .ok()
                .as_deref(),
            Some("projects/p/locations/europe-west2")
        );
        assert_eq!(
            legacy_agent_parent("projects/p/agent/intents/i").ok().as_deref(),
            Some("projects/p")
        );
    }

    #[test]
    fn legacy_parent_falls_back_to_project() {
        assert_eq!(
            legacy_agent_parent("projects/p").ok().as_deref(),
            Some("projects/p")
        );
        assert!(legacy_agent_parent("agents/a").is_err());
        assert!(legacy_agent_parent("projects").is_err());
    }
}
