//! The Thought / Action / Observation control loop.

use serde::Serialize;

use crate::protocol::{self, ActionDirective, Step};
use crate::tool::ToolCatalog;
use crate::{Agent, Error};

/// Default bound on model calls per run.
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

const TOOL_NOT_FOUND: &str = "Tool not found";
const CLARIFICATION: &str = "Your reply contained neither an action nor an \
    answer. Reply with `Action: <tool>: <argument>` followed by PAUSE, or \
    with `Answer: <your answer>`.";

/// Progress notifications emitted while a loop runs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LoopEvent {
    /// A model call is about to start.
    Thinking {
        /// One-based iteration number.
        iteration: usize,
    },
    /// The model replied.
    Response {
        /// One-based iteration number.
        iteration: usize,
        /// The raw reply.
        text: String,
    },
    /// An observation was synthesized and will be the next prompt.
    Observation {
        /// One-based iteration number.
        iteration: usize,
        /// The full observation, including its prefix.
        text: String,
    },
}

/// How a run ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoopOutcome {
    /// The model gave its final answer.
    Answered {
        /// The answer text.
        answer: String,
        /// The raw reply that carried the answer.
        response: String,
        /// Model calls made.
        iterations: usize,
    },
    /// The iteration budget ran out before an answer.
    Exhausted {
        /// Model calls made.
        iterations: usize,
    },
}

impl LoopOutcome {
    /// Returns the answer, if there is one.
    #[inline]
    pub fn answer(&self) -> Option<&str> {
        match self {
            LoopOutcome::Answered { answer, .. } => Some(answer),
            LoopOutcome::Exhausted { .. } => None,
        }
    }

    /// Returns the number of model calls made.
    #[inline]
    pub fn iterations(&self) -> usize {
        match self {
            LoopOutcome::Answered { iterations, .. }
            | LoopOutcome::Exhausted { iterations } => *iterations,
        }
    }
}

/// Drives an [`Agent`] through the action protocol until it answers or the
/// iteration budget runs out.
///
/// Tool failures, unknown tools and unparsable replies are fed back to the
/// model as observations. Only model invocation errors stop the loop early.
pub struct ReactLoop {
    agent: Agent,
    catalog: ToolCatalog,
    max_iterations: usize,
    on_event: Option<Box<dyn Fn(&LoopEvent) + Send + Sync>>,
}

impl ReactLoop {
    /// Creates a loop over the given agent and tools.
    #[inline]
    pub fn new(agent: Agent, catalog: ToolCatalog) -> Self {
        Self {
            agent,
            catalog,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            on_event: None,
        }
    }

    /// Sets the maximum number of model calls per run.
    #[inline]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Attaches a callback to be invoked on every [`LoopEvent`].
    #[inline]
    pub fn on_event(
        mut self,
        on_event: impl Fn(&LoopEvent) + Send + Sync + 'static,
    ) -> Self {
        self.on_event = Some(Box::new(on_event));
        self
    }

    /// Returns the underlying agent.
    #[inline]
    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Returns the tools available to the model.
    #[inline]
    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    /// Runs the loop, starting with `query` as the first prompt.
    ///
    /// The transcript is kept across runs, so a later run continues the
    /// same conversation.
    pub async fn run(&mut self, query: &str) -> Result<LoopOutcome, Error> {
        let mut next_prompt = query.to_owned();
        for iteration in 1..=self.max_iterations {
            self.emit(LoopEvent::Thinking { iteration });
            let response = self.agent.invoke(&next_prompt).await?;
            trace!("iteration {iteration} got: {response:?}");
            self.emit(LoopEvent::Response {
                iteration,
                text: response.clone(),
            });

            next_prompt = match protocol::classify(&response) {
                Step::Answer(answer) => {
                    debug!("answer found after {iteration} iterations");
                    return Ok(LoopOutcome::Answered {
                        answer,
                        response,
                        iterations: iteration,
                    });
                }
                Step::Action(directive) => self.dispatch(&directive),
                Step::MalformedAction => {
                    warn!("no parsable action line in a tool-call step");
                    protocol::observation(TOOL_NOT_FOUND)
                }
                Step::Unrecognized => {
                    warn!("reply has neither action nor answer markers");
                    protocol::observation(CLARIFICATION)
                }
            };
            self.emit(LoopEvent::Observation {
                iteration,
                text: next_prompt.clone(),
            });
        }

        debug!("no answer within {} iterations", self.max_iterations);
        Ok(LoopOutcome::Exhausted {
            iterations: self.max_iterations,
        })
    }

    fn dispatch(&self, directive: &ActionDirective) -> String {
        let Some(tool) = self.catalog.get(&directive.tool) else {
            warn!("unknown tool: {}", directive.tool);
            return protocol::observation(TOOL_NOT_FOUND);
        };

        debug!("running {} with {:?}", tool.name(), directive.argument);
        match tool.execute(&directive.argument) {
            Ok(output) => protocol::observation(output),
            Err(err) => {
                debug!("tool {} failed: {err}", tool.name());
                protocol::observation(format!("Error: {}", err.reason()))
            }
        }
    }

    #[inline]
    fn emit(&self, event: LoopEvent) {
        trace!("loop event: {event:?}");
        if let Some(on_event) = &self.on_event {
            on_event(&event);
        }
    }
}
