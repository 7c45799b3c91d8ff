use super::*;

#[async_trait]
impl FulfillmentApi for HttpManagementApiClient {
    async fn update_fulfillment(
        &self,
        endpoint: &ApiEndpoint,
        fulfillment: Fulfillment,
        update_mask: &FieldMask,
    ) -> AppResult<Fulfillment> {
        let url = Self::with_update_mask(
            Self::resource_url(endpoint, LEGACY_API_VERSION, fulfillment.name.as_str())?,
            update_mask,
        );
        self.send_json("update_fulfillment", Method::PATCH, url, &fulfillment)
            .await
    }
}
