//! The invocation facade.
//!
//! [`Encoder`] drives one invocation through
//! `Validating -> Staging -> Composing -> Executing -> Interpreting` and
//! delivers a single [`InvocationResult`]. Any stage may stop the run; the
//! error is recorded in the result and later stages are skipped.

use std::sync::Arc;

use lamekit_core::{
    EncoderConfig, InputDescriptor, InvocationResult, OutputDescriptor, Result, Stage,
};
use lamekit_exec::{args, record_outcome, resolve_output_path, Stager, ToolCommand};
use tokio::task::JoinHandle;

use crate::request::InvocationRequest;

/// Runs the staged encoder against caller-supplied files.
///
/// Cloning is cheap; clones share the same [`Stager`], so the encoder is
/// staged at most once across all of them.
#[derive(Debug, Clone)]
pub struct Encoder {
    config: Arc<EncoderConfig>,
    stager: Arc<Stager>,
}

impl Encoder {
    /// Create an encoder with its own stager built from `config`.
    pub fn new(config: EncoderConfig) -> Result<Self> {
        let stager = Arc::new(Stager::from_config(&config)?);
        Ok(Self::with_stager(config, stager))
    }

    /// Create an encoder that shares an existing stager.
    pub fn with_stager(config: EncoderConfig, stager: Arc<Stager>) -> Self {
        Self {
            config: Arc::new(config),
            stager,
        }
    }

    /// The configuration this encoder runs with.
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// The stager guarding the encoder copy.
    pub fn stager(&self) -> &Arc<Stager> {
        &self.stager
    }

    /// Run one invocation on the tokio runtime and hand its result to
    /// `handler`.
    ///
    /// `handler` is called exactly once, on success and on every failure
    /// path. The returned handle completes after `handler` has returned.
    pub fn lame<F>(
        &self,
        input: InputDescriptor,
        output: OutputDescriptor,
        handler: F,
    ) -> JoinHandle<()>
    where
        F: FnOnce(InvocationResult) + Send + 'static,
    {
        let encoder = self.clone();
        tokio::spawn(async move {
            let result = encoder.invoke(input, output).await;
            handler(result);
        })
    }

    /// Run one invocation and return its result.
    pub async fn invoke(&self, input: InputDescriptor, output: OutputDescriptor) -> InvocationResult {
        let mut result = InvocationResult::default();

        if let Err(e) = self.run(&input, &output, &mut result).await {
            result.fail(e);
        }

        match result.error {
            None => tracing::info!(
                "Encoded {} -> {} ({} bytes)",
                input.path.display(),
                result.output_path.display(),
                result.output_size
            ),
            Some(ref e) => tracing::warn!("Invocation failed while {}: {e}", result.stage),
        }

        result
    }

    /// Run the invocation described by a decoded request.
    pub async fn invoke_request(&self, request: InvocationRequest) -> InvocationResult {
        self.invoke(request.input, request.output).await
    }

    /// Run the invocation described by a JSON request document.
    ///
    /// A malformed document yields a validation failure result.
    pub async fn invoke_json(&self, json: &str) -> InvocationResult {
        match InvocationRequest::from_json(json) {
            Ok(request) => self.invoke_request(request).await,
            Err(e) => {
                tracing::warn!("Rejected invocation request: {e}");
                let mut result = InvocationResult::default();
                result.fail(e);
                result
            }
        }
    }

    async fn run(
        &self,
        input: &InputDescriptor,
        output: &OutputDescriptor,
        result: &mut InvocationResult,
    ) -> Result<()> {
        result.stage = Stage::Validating;
        input.validate()?;
        output.validate()?;
        result.output_path = resolve_output_path(output, &self.config.output_dir())?;

        result.stage = Stage::Staging;
        let program = self.stager.ensure_ready().await?;

        result.stage = Stage::Composing;
        let mut cmd = ToolCommand::new(program);
        cmd.args(args::compose(input, &output.parameters, &result.output_path))
            .timeout(self.config.timeout);
        result.command = cmd.render();
        tracing::debug!("Running {}", result.command);

        result.stage = Stage::Executing;
        let run = cmd.execute().await?;

        result.stage = Stage::Interpreting;
        record_outcome(result, run).await;
        Ok(())
    }
}
