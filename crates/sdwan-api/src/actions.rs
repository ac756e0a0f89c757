// Asynchronous action status
//
// Mutating template calls return an action id; progress is read from
// `dataservice/device/action/status/{id}` until the summary says `done`.

use tracing::debug;

use crate::client::Client;
use crate::error::Error;
use crate::models::ActionStatusResponse;
use crate::session::Session;
use crate::templates::encode_segment;

impl Client {
    /// Fetch the status of an in-flight action.
    ///
    /// `GET dataservice/device/action/status/{id}`
    pub async fn action_status(
        &self,
        session: &Session,
        action_id: &str,
    ) -> Result<ActionStatusResponse, Error> {
        debug!(action_id, "fetching action status");
        let path = format!(
            "dataservice/device/action/status/{}",
            encode_segment(action_id)
        );
        self.get_json(session, &path).await
    }
}
