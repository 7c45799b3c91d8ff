use super::*;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListWebhooksPage {
    #[serde(default)]
    webhooks: Vec<Webhook>,
    #[serde(default)]
    next_page_token: String,
}

#[async_trait]
impl WebhookApi for HttpManagementApiClient {
    async fn get_webhook(&self, endpoint: &ApiEndpoint, name: &str) -> AppResult<Webhook> {
        let url = Self::resource_url(endpoint, CX_API_VERSION, name)?;
        self.get_json("get_webhook", url).await
    }

    async fn list_webhooks(
        &self,
        endpoint: &ApiEndpoint,
        parent: &str,
    ) -> AppResult<Vec<Webhook>> {
        let url = Self::resource_url(endpoint, CX_API_VERSION, &format!("{parent}/webhooks"))?;
        self.list_all("list_webhooks", url, |page: ListWebhooksPage| {
            (page.webhooks, page.next_page_token)
        })
        .await
    }

    async fn update_webhook(
        &self,
        endpoint: &ApiEndpoint,
        webhook: Webhook,
        update_mask: &FieldMask,
    ) -> AppResult<Webhook> {
        let url = Self::with_update_mask(
            Self::resource_url(endpoint, CX_API_VERSION, webhook.name.as_str())?,
            update_mask,
        );
        self.send_json("update_webhook", Method::PATCH, url, &webhook)
            .await
    }
}
