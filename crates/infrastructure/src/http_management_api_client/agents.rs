use super::*;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListAgentsPage {
    #[serde(default)]
    agents: Vec<Agent>,
    #[serde(default)]
    next_page_token: String,
}

#[async_trait]
impl AgentApi for HttpManagementApiClient {
    async fn get_agent(&self, endpoint: &ApiEndpoint, name: &str) -> AppResult<Agent> {
        let url = Self::resource_url(endpoint, CX_API_VERSION, name)?;
        self.get_json("get_agent", url).await
    }

    async fn list_agents(&self, endpoint: &ApiEndpoint, parent: &str) -> AppResult<Vec<Agent>> {
        let url = Self::resource_url(endpoint, CX_API_VERSION, &format!("{parent}/agents"))?;
        self.list_all("list_agents", url, |page: ListAgentsPage| {
            (page.agents, page.next_page_token)
        })
        .await
    }

    async fn update_agent(
        &self,
        endpoint: &ApiEndpoint,
        agent: Agent,
        update_mask: &FieldMask,
    ) -> AppResult<Agent> {
        let url = Self::with_update_mask(
            Self::resource_url(endpoint, CX_API_VERSION, agent.name.as_str())?,
            update_mask,
        );
        self.send_json("update_agent", Method::PATCH, url, &agent)
            .await
    }
}

#[async_trait]
impl LegacyAgentApi for HttpManagementApiClient {
    async fn set_agent(
        &self,
        endpoint: &ApiEndpoint,
        agent: LegacyAgent,
        update_mask: &FieldMask,
    ) -> AppResult<LegacyAgent> {
        let url = Self::with_update_mask(
            Self::resource_url(
                endpoint,
                LEGACY_API_VERSION,
                &format!("{}/agent", agent.parent),
            )?,
            update_mask,
        );
        self.send_json("set_agent", Method::POST, url, &agent).await
    }
}
