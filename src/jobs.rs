use std::sync::Arc;

use auth_transport::{ApiRequest, AuthTransport, TransportError};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use log_stream::{JobApi, JobRecord};

/// Minimal jobs resource client.
///
/// The log stream's historical fast path reads single job records through the
/// authenticated transport; the rest of the jobs surface belongs to the UI
/// layer and is not modelled here.
pub struct JobsClient {
    transport: Arc<AuthTransport>,
}

impl JobsClient {
    #[must_use]
    pub fn new(transport: Arc<AuthTransport>) -> Self {
        Self { transport }
    }

    pub async fn fetch(&self, job_id: &str) -> Result<JobRecord, TransportError> {
        let response = self
            .transport
            .execute(ApiRequest::get(format!("/api/jobs/{job_id}")))
            .await?;
        response.json::<JobRecord>()
    }
}

impl JobApi for JobsClient {
    fn fetch_job(&self, job_id: &str) -> BoxFuture<'static, Result<JobRecord, String>> {
        let transport = Arc::clone(&self.transport);
        let job_id = job_id.to_owned();

        async move {
            let response = transport
                .execute(ApiRequest::get(format!("/api/jobs/{job_id}")))
                .await
                .map_err(|error| error.to_string())?;
            response
                .json::<JobRecord>()
                .map_err(|error| error.to_string())
        }
        .boxed()
    }
}
