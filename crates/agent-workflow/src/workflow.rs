//! Workflow definition and execution

use agent_core::context::keys;
use agent_core::{Agent, Context, Error, Result};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// A step in a workflow: one fixed instruction sent to one agent
#[derive(Clone)]
pub struct WorkflowStep {
    /// Short label used in logs and step outputs
    pub label: String,
    pub agent: Arc<dyn Agent>,
    pub instruction: String,
}

impl WorkflowStep {
    pub fn new(
        label: impl Into<String>,
        agent: Arc<dyn Agent>,
        instruction: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            agent,
            instruction: instruction.into(),
        }
    }
}

/// What one step produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutput {
    pub label: String,
    pub agent: String,
    pub instruction: String,
    pub reply: String,
    /// Final run status the agent recorded in the context, if any
    pub run_status: Option<String>,
}

/// A workflow that coordinates multiple agents on one shared context
///
/// Steps run strictly in order. Every step receives its own instruction
/// rather than the previous reply; agents that share a conversation thread
/// through the context see earlier steps' messages there. Execution stops at
/// the first failing step.
///
/// # Example
///
/// ```no_run
/// use agent_core::{Agent, Context};
/// use agent_workflow::Workflow;
/// use std::sync::Arc;
///
/// # async fn example(collector: Arc<dyn Agent>, presenter: Arc<dyn Agent>) -> agent_core::Result<()> {
/// let workflow = Workflow::builder()
///     .step("collect", collector, "Query full finance data from the Neon database.")
///     .step("present", presenter, "Summarize the collected financial data into a clean report.")
///     .build()?;
///
/// let mut context = Context::new().with_thread_id("thread_1");
/// let outputs = workflow.execute(&mut context).await?;
/// # Ok(())
/// # }
/// ```
pub struct Workflow {
    steps: Vec<WorkflowStep>,
}

impl Workflow {
    /// Create a new workflow builder
    pub fn builder() -> WorkflowBuilder {
        WorkflowBuilder::new()
    }

    /// Steps in execution order
    pub fn steps(&self) -> &[WorkflowStep] {
        &self.steps
    }

    /// Execute every step in order, stopping at the first error
    pub async fn execute(&self, context: &mut Context) -> Result<Vec<StepOutput>> {
        let mut outputs = Vec::with_capacity(self.steps.len());

        for (index, step) in self.steps.iter().enumerate() {
            let start_time = Instant::now();
            info!(
                step = index + 1,
                total = self.steps.len(),
                label = %step.label,
                agent = %step.agent.name(),
                "Workflow step started"
            );

            context.remove(keys::LAST_RUN_STATUS);
            let reply = match step.agent.process(step.instruction.clone(), context).await {
                Ok(reply) => reply,
                Err(e) => {
                    warn!(label = %step.label, error = %e, "Workflow step failed");
                    return Err(e);
                }
            };

            info!(
                label = %step.label,
                duration_ms = start_time.elapsed().as_millis() as u64,
                reply_length = reply.len(),
                "Workflow step finished"
            );

            outputs.push(StepOutput {
                label: step.label.clone(),
                agent: step.agent.name().to_string(),
                instruction: step.instruction.clone(),
                reply,
                run_status: context.last_run_status().map(str::to_string),
            });
        }

        Ok(outputs)
    }
}

/// Builder for constructing workflows
#[derive(Default)]
pub struct WorkflowBuilder {
    steps: Vec<WorkflowStep>,
}

impl WorkflowBuilder {
    /// Create a new workflow builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step
    pub fn step(
        self,
        label: impl Into<String>,
        agent: Arc<dyn Agent>,
        instruction: impl Into<String>,
    ) -> Self {
        self.add_step(WorkflowStep::new(label, agent, instruction))
    }

    /// Append a prepared step
    pub fn add_step(mut self, step: WorkflowStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Build the workflow; a workflow needs at least one step
    pub fn build(self) -> Result<Workflow> {
        if self.steps.is_empty() {
            return Err(Error::InitializationFailed(
                "Workflow has no steps".to_string(),
            ));
        }

        Ok(Workflow { steps: self.steps })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Agent that appends what it was told to a shared log
    struct LoggingAgent {
        name: String,
        log: Arc<Mutex<Vec<String>>>,
        fail_on: Option<String>,
    }

    impl LoggingAgent {
        fn new(name: &str, log: &Arc<Mutex<Vec<String>>>) -> Arc<dyn Agent> {
            Arc::new(Self {
                name: name.to_string(),
                log: Arc::clone(log),
                fail_on: None,
            })
        }

        fn failing(name: &str, log: &Arc<Mutex<Vec<String>>>, on: &str) -> Arc<dyn Agent> {
            Arc::new(Self {
                name: name.to_string(),
                log: Arc::clone(log),
                fail_on: Some(on.to_string()),
            })
        }
    }

    #[async_trait]
    impl Agent for LoggingAgent {
        async fn process(&self, input: String, context: &mut Context) -> Result<String> {
            if self.fail_on.as_deref() == Some(input.as_str()) {
                return Err(Error::ProcessingFailed(format!("{} gave up", self.name)));
            }
            self.log.lock().unwrap().push(format!("{}: {input}", self.name));
            context.set_last_run_id(format!("run_{}", self.name));
            if self.name == "collector" {
                context.set_last_run_status("completed");
            }
            Ok(format!("{} done", self.name))
        }

        fn name(&self) -> &str {
            &self.name
        }
    }

    #[test]
    fn test_empty_workflow_is_rejected() {
        assert!(Workflow::builder().build().is_err());
    }

    #[tokio::test]
    async fn test_steps_run_in_order_with_own_instructions() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let workflow = Workflow::builder()
            .step("search", LoggingAgent::new("collector", &log), "Search the web.")
            .step("query", LoggingAgent::new("collector", &log), "Query the database.")
            .step("present", LoggingAgent::new("presenter", &log), "Summarize.")
            .build()
            .unwrap();

        let mut context = Context::new().with_thread_id("thread_1");
        let outputs = workflow.execute(&mut context).await.unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "collector: Search the web.".to_string(),
                "collector: Query the database.".to_string(),
                "presenter: Summarize.".to_string(),
            ]
        );
        assert_eq!(outputs.len(), 3);
        assert_eq!(outputs[2].label, "present");
        assert_eq!(outputs[2].reply, "presenter done");
        assert_eq!(outputs[0].run_status.as_deref(), Some("completed"));
        // Not carried over from the collector's step
        assert_eq!(outputs[2].run_status, None);
        assert_eq!(context.last_run_id(), Some("run_presenter"));
    }

    #[tokio::test]
    async fn test_failure_stops_later_steps() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let workflow = Workflow::builder()
            .step("query", LoggingAgent::failing("collector", &log, "Query."), "Query.")
            .step("present", LoggingAgent::new("presenter", &log), "Summarize.")
            .build()
            .unwrap();

        let mut context = Context::new();
        let err = workflow.execute(&mut context).await.unwrap_err();

        assert!(err.to_string().contains("collector gave up"));
        assert!(log.lock().unwrap().is_empty());
    }
}
