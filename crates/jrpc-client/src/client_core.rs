//! Steps shared by the blocking and async clients.
//!
//! Everything here is synchronous and free of I/O; the clients only add the
//! call to their transport between `outgoing` and the `finish_*` step.

use jrpc_core::request::batch_to_canonical_string;
use jrpc_core::{response, trim, Args, Error, Request, RequestId, Response, ResponseBody, Result};
use serde_json::Value;

use crate::log::LogExtra;
use crate::options::ClientOptions;
use crate::transport::{Reply, SendOptions};

#[derive(Debug, Clone, Default)]
pub(crate) struct ClientCore {
    pub(crate) options: ClientOptions,
}

impl ClientCore {
    pub(crate) fn new(options: ClientOptions) -> Self {
        Self { options }
    }

    pub(crate) fn build(&self, method: &str, args: Args, expect_response: bool) -> Result<Request> {
        Request::build(
            method,
            args,
            expect_response,
            self.options.id_generator.as_ref(),
        )
    }

    pub(crate) fn send_options(&self, expect_response: bool) -> SendOptions<'_> {
        SendOptions {
            expect_response,
            headers: &self.options.headers,
        }
    }

    /// Serialize and log one request.
    pub(crate) fn outgoing(&self, request: &Request) -> Result<String> {
        let message = request.to_canonical_string()?;
        self.log_request(&message);
        Ok(message)
    }

    /// Serialize and log a batch.
    pub(crate) fn outgoing_batch(&self, requests: &[Request]) -> Result<String> {
        if requests.is_empty() {
            return Err(Error::InvalidArguments("Batch cannot be empty".to_string()));
        }
        let message = batch_to_canonical_string(requests)?;
        self.log_request(&message);
        Ok(message)
    }

    /// Handle the reply to a request expecting a response.
    pub(crate) fn finish_request(&self, request: &Request, reply: Option<Reply>) -> Result<Value> {
        let text = self.accept_reply(reply)?.ok_or_else(|| {
            Error::InvalidResponse("Transport returned no response".to_string())
        })?;

        match response::parse(&text)? {
            ResponseBody::Single(response) => {
                if let Some(expected) = &request.id {
                    warn_on_id_mismatch(expected, &response.id);
                }
                response.into_result()
            }
            ResponseBody::Batch(_) => Err(Error::InvalidResponse(
                "Expected a single response, received a batch".to_string(),
            )),
        }
    }

    /// Handle whatever came back for a notification: logged, then dropped.
    pub(crate) fn finish_notification(&self, reply: Option<Reply>) -> Result<()> {
        self.accept_reply(reply)?;
        Ok(())
    }

    /// Handle the reply to a batch. A batch of only notifications yields no responses.
    pub(crate) fn finish_batch(
        &self,
        requests: &[Request],
        reply: Option<Reply>,
    ) -> Result<Vec<Response>> {
        let text = self.accept_reply(reply)?;
        if requests.iter().all(Request::is_notification) {
            return Ok(Vec::new());
        }

        let text = text.ok_or_else(|| {
            Error::InvalidResponse("Transport returned no response".to_string())
        })?;
        Ok(response::parse(&text)?.into_vec())
    }

    /// Log the reply and reject non-2xx statuses before anything is parsed.
    fn accept_reply(&self, reply: Option<Reply>) -> Result<Option<String>> {
        let Some(reply) = reply else {
            return Ok(None);
        };

        self.log_response(&reply.text, &reply.log_extra());

        if let Some(status) = &reply.status {
            if !status.is_success() {
                return Err(Error::ReceivedNon2xxResponse {
                    status: status.code,
                    reason: status.reason.clone(),
                });
            }
        }
        Ok(Some(reply.text))
    }

    fn log_request(&self, message: &str) {
        if let Some(sink) = &self.options.log_sink {
            sink.request_log(&self.for_log(message), &LogExtra::new());
        }
    }

    fn log_response(&self, message: &str, extra: &LogExtra) {
        if let Some(sink) = &self.options.log_sink {
            sink.response_log(&self.for_log(message), extra);
        }
    }

    fn for_log(&self, message: &str) -> String {
        if self.options.trim_log_values {
            trim::trim_message(message)
        } else {
            message.to_string()
        }
    }
}

fn warn_on_id_mismatch(expected: &RequestId, received: &RequestId) {
    if !received.is_null() && received != expected {
        tracing::warn!(
            expected = %expected,
            received = %received,
            "response id does not match request id"
        );
    }
}
