// Notification channel endpoint.

use tracing::debug;

use crate::client::ApiClient;
use crate::envelope::ApiResult;
use crate::error::Error;
use crate::models::TelegramMessage;

impl ApiClient {
    /// Push a message to the configured Telegram channel.
    ///
    /// `POST /api/telegram/send`
    pub async fn send_notification(&self, message: &TelegramMessage) -> Result<ApiResult<()>, Error> {
        debug!(len = message.text.len(), "sending telegram notification");
        self.post("telegram/send", message).await
    }
}
