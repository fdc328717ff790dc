use std::time::Duration;

use little_react_core::conversation::Transcript;
use little_react_core::tool::{Tool, ToolCatalog};
use little_react_core::{
    AgentBuilder, DEFAULT_MAX_ITERATIONS, Error, LoopEvent, LoopOutcome,
    ReactLoop,
};
use little_react_model::ModelProvider;

use crate::tools::*;

const SYSTEM_PROMPT_TEMPLATE: &str = include_str!("./system_prompt.md");

/// A session builder.
///
/// See [`Session`].
pub struct SessionBuilder {
    agent_builder: AgentBuilder,
    max_iterations: usize,
    on_event: Option<Box<dyn Fn(&LoopEvent) + Send + Sync>>,
}

impl SessionBuilder {
    /// Creates a session builder with a specified model provider.
    pub fn with_model_provider<M: ModelProvider + 'static>(
        provider: M,
    ) -> Self {
        let agent_builder = AgentBuilder::with_model_provider(provider);
        Self {
            agent_builder,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            on_event: None,
        }
    }

    /// Sets the maximum number of model calls per question.
    #[inline]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Bounds the time of each model request.
    #[inline]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.agent_builder = self.agent_builder.with_request_timeout(timeout);
        self
    }

    /// Sets how many times a retryable model error is retried.
    #[inline]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.agent_builder = self.agent_builder.with_max_retries(max_retries);
        self
    }

    /// Attaches a callback to be invoked on every loop event.
    #[inline]
    pub fn on_event(
        mut self,
        on_event: impl Fn(&LoopEvent) + Send + Sync + 'static,
    ) -> Self {
        self.on_event = Some(Box::new(on_event));
        self
    }

    /// Builds a new session.
    pub fn build(self) -> Session {
        let tools: Vec<Box<dyn Tool>> =
            vec![Box::new(CalculateTool), Box::new(PlanetMassTool)];
        let catalog = ToolCatalog::with_tools(tools);
        let agent = self
            .agent_builder
            .with_system_prompt(render_system_prompt(&catalog))
            .build();

        let mut react_loop = ReactLoop::new(agent, catalog)
            .with_max_iterations(self.max_iterations);
        if let Some(on_event) = self.on_event {
            react_loop = react_loop.on_event(on_event);
        }
        Session { react_loop }
    }
}

/// A question-answering session over the built-in tools.
///
/// The session holds a fully configured loop, and it is basically a wrapper
/// around [`ReactLoop`]. Questions asked in the same session share one
/// transcript.
pub struct Session {
    react_loop: ReactLoop,
}

impl Session {
    /// Asks a question and runs the loop until it is answered or the
    /// iteration budget runs out.
    #[inline]
    pub async fn ask(&mut self, query: &str) -> Result<LoopOutcome, Error> {
        self.react_loop.run(query).await
    }

    /// Returns the transcript accumulated so far.
    #[inline]
    pub fn transcript(&self) -> &Transcript {
        self.react_loop.agent().transcript()
    }
}

fn render_system_prompt(catalog: &ToolCatalog) -> String {
    SYSTEM_PROMPT_TEMPLATE.replace("{{ACTIONS}}", &catalog.describe())
}
