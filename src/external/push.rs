use async_trait::async_trait;
use std::env;

use crate::error::{invalid_input_error, upstream_error, Error};
use crate::notify::{Notification, Notifier};

/// Remote push-notification channel. Delivery is fire-and-forget from the
/// coordinator's point of view; a failed POST is reported as an error to be
/// logged, never retried.
#[derive(Debug, Default)]
pub struct PushGateway;

#[async_trait]
impl Notifier for PushGateway {
    #[tracing::instrument(skip(self))]
    async fn notify(&self, notification: Notification) -> Result<(), Error> {
        let api_base = env::var("PUSH_API_BASE")?;
        let url = format!("https://{}/notifications", api_base);

        let res = reqwest::Client::new()
            .post(url)
            .json(&notification)
            .send()
            .await?;

        let status_code = res.status().as_u16();

        if status_code >= 400 && status_code < 500 {
            return Err(invalid_input_error());
        } else if status_code >= 300 {
            return Err(upstream_error());
        }

        Ok(())
    }
}
