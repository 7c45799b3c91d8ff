use super::*;

impl PolicyEnforcementService {
    /// Clears the static username and password of a fulfillment.
    pub async fn delete_fulfillment_credentials(
        &self,
        fulfillment_name: &str,
        endpoint: &ApiEndpoint,
    ) -> AppResult<Fulfillment> {
        let updated = self
            .fulfillment_api
            .update_fulfillment(
                endpoint,
                Fulfillment::without_credentials(fulfillment_name),
                &FieldMask::web_service_credentials(),
            )
            .await?;

        info!(
            resource_name = %fulfillment_name,
            "deleted static credentials on fulfillment"
        );
        Ok(updated)
    }
}
