// Device inventory endpoints
//
// `dataservice/device` lists every device known to the controller:
// edges, controllers, and the management nodes themselves.

use tracing::debug;

use crate::client::Client;
use crate::error::Error;
use crate::models::DeviceRecord;
use crate::session::Session;

impl Client {
    /// List all devices in the fabric.
    ///
    /// `GET dataservice/device`
    pub async fn list_devices(&self, session: &Session) -> Result<Vec<DeviceRecord>, Error> {
        debug!("listing devices");
        self.get_data(session, "dataservice/device").await
    }
}
