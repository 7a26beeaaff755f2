// VibraWatch — Inference Client
//
// Ships one batch to the anomaly service and folds the reply into a
// Verdict. Policy lives here, transport does not: any 2xx answer counts,
// an unparseable 2xx body degrades to the default verdict, and everything
// else comes back as an error for the loop to skip on.

use crate::traits::{HttpReply, TransportError, VerdictTransport};
use crate::types::{Batch, Verdict};

pub struct InferenceClient<T> {
    transport: T,
    endpoint: String,
}

impl<T: VerdictTransport> InferenceClient<T> {
    pub fn new(transport: T, endpoint: impl Into<String>) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// One request, no retries. Retrying is the next cycle's job.
    pub fn send(&mut self, batch: &Batch) -> Result<Verdict, TransportError> {
        let payload =
            serde_json::to_vec(batch).map_err(|e| TransportError::Request(e.into()))?;
        let reply = self.transport.post_json(&self.endpoint, &payload)?;
        if !(200..300).contains(&reply.status) {
            return Err(TransportError::Status(reply.status));
        }
        Ok(parse_verdict(&reply))
    }
}

/// A malformed or empty success body is not an error: the service answered,
/// so the verdict falls back to its documented field defaults.
fn parse_verdict(reply: &HttpReply) -> Verdict {
    match serde_json::from_slice(&reply.body) {
        Ok(verdict) => verdict,
        Err(e) => {
            log::warn!("unparseable verdict body ({e}); using defaults");
            Verdict::default()
        }
    }
}
