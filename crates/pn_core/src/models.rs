use async_trait::async_trait;
use std::fmt;

use crate::types::{CompletionRequest, RawCompletion};
use crate::Result;

#[async_trait]
pub trait InferenceModel: Send + Sync + fmt::Debug {
    /// Short backend name used in logs.
    fn name(&self) -> &str;

    /// Send one chat completion and return the backend reply verbatim.
    async fn chat(&self, request: &CompletionRequest) -> Result<RawCompletion>;

    /// Send one chat completion and return the generated text.
    ///
    /// Non-success statuses become `Error::Upstream`.
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let raw = self.chat(request).await?;
        if !raw.is_success() {
            return Err(crate::Error::Upstream {
                status: raw.status,
                details: raw.body,
            });
        }
        raw.content()
            .map(str::to_string)
            .ok_or_else(|| crate::Error::Inference("Completion carried no message content".to_string()))
    }
}
