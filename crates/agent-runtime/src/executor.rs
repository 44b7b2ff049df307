//! Run executor for hosted agents
//!
//! The RunExecutor drives one run of a hosted agent to completion:
//! 1. Start the run on the thread
//! 2. Poll its status
//! 3. If the run requires action, execute the requested tools locally and
//!    submit their outputs, then keep polling
//! 4. Return the run once it reaches a terminal status

use crate::error::{Result, ServiceError};
use crate::service::AgentService;
use crate::types::{Run, RunStatus, ToolCall, ToolOutput};
use agent_tools::ToolRegistry;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Configuration for run execution
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Delay between status polls
    pub poll_interval: Duration,

    /// Maximum number of polls before the run is cancelled
    pub max_polls: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            max_polls: 300,
        }
    }
}

/// Executes a run: start → poll → tool calls → submit → poll ...
pub struct RunExecutor {
    service: Arc<dyn AgentService>,
    tool_registry: Arc<ToolRegistry>,
    config: ExecutorConfig,
}

impl RunExecutor {
    /// Create a new run executor
    pub fn new(
        service: Arc<dyn AgentService>,
        tool_registry: Arc<ToolRegistry>,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            service,
            tool_registry,
            config,
        }
    }

    /// Tools this executor answers tool calls from
    pub fn tools(&self) -> &Arc<ToolRegistry> {
        &self.tool_registry
    }

    /// Start a run of `agent_id` on `thread_id` and process it to completion
    pub async fn create_and_process_run(&self, thread_id: &str, agent_id: &str) -> Result<Run> {
        let run = self.service.create_run(thread_id, agent_id).await?;
        info!(run_id = %run.id, thread_id, agent_id, "Run started");
        self.process_run(run).await
    }

    /// Poll an existing run until it is terminal, answering tool calls
    pub async fn process_run(&self, mut run: Run) -> Result<Run> {
        let mut polls = 0;

        loop {
            if run.status.is_terminal() {
                info!(run_id = %run.id, status = %run.status, polls, "Run finished");
                return Ok(run);
            }

            polls += 1;
            if polls > self.config.max_polls {
                warn!(run_id = %run.id, max_polls = self.config.max_polls, "Run did not finish, cancelling");
                if let Err(e) = self.service.cancel_run(&run.thread_id, &run.id).await {
                    warn!(run_id = %run.id, error = %e, "Failed to cancel run");
                }
                return Err(ServiceError::RunTimedOut {
                    run_id: run.id,
                    polls: self.config.max_polls,
                });
            }

            if run.status == RunStatus::RequiresAction {
                let calls = run.pending_tool_calls();
                if calls.is_empty() {
                    warn!(run_id = %run.id, "Run requires action but requested no tool calls");
                } else {
                    info!(run_id = %run.id, tool_count = calls.len(), "Run requested tool calls");
                    let outputs = self.execute_tool_calls(calls).await;
                    run = self
                        .service
                        .submit_tool_outputs(&run.thread_id, &run.id, &outputs)
                        .await?;
                    continue;
                }
            }

            tokio::time::sleep(self.config.poll_interval).await;
            run = self.service.get_run(&run.thread_id, &run.id).await?;
            debug!(run_id = %run.id, status = %run.status, polls, "Polled run");
        }
    }

    /// Execute each tool call, turning failures into error outputs
    async fn execute_tool_calls(&self, calls: &[ToolCall]) -> Vec<ToolOutput> {
        let mut outputs = Vec::with_capacity(calls.len());

        for call in calls {
            let name = call.function.name.as_str();
            let start_time = Instant::now();

            let result = match parse_arguments(&call.function.arguments) {
                Ok(params) => self.tool_registry.execute(name, params).await,
                Err(e) => Err(agent_core::Error::invalid_parameters(name, e)),
            };
            let duration_ms = start_time.elapsed().as_millis() as u64;

            let output = match result {
                Ok(value) => {
                    let output = value.to_string();
                    info!(
                        tool_name = %name,
                        tool_call_id = %call.id,
                        duration_ms,
                        result_length = output.len(),
                        "Tool execution succeeded"
                    );
                    output
                }
                Err(e) => {
                    warn!(
                        tool_name = %name,
                        tool_call_id = %call.id,
                        duration_ms,
                        error = %e,
                        "Tool execution failed"
                    );
                    json!({ "error": e.to_string() }).to_string()
                }
            };

            outputs.push(ToolOutput {
                tool_call_id: call.id.clone(),
                output,
            });
        }

        outputs
    }
}

/// Decode the JSON-encoded arguments of a tool call; empty means no arguments
fn parse_arguments(raw: &str) -> std::result::Result<Value, serde_json::Error> {
    if raw.trim().is_empty() {
        return Ok(json!({}));
    }
    serde_json::from_str(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        AgentSpec, FunctionCall, HostedAgentInfo, MessageRole, RequiredAction, SubmitToolOutputs,
        Thread, ThreadMessage,
    };
    use agent_tools::Tool;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Service that replays scripted run states and records submissions
    #[derive(Default)]
    struct ScriptedService {
        states: Mutex<VecDeque<Run>>,
        submitted: Mutex<Vec<Vec<ToolOutput>>>,
        cancelled: Mutex<Vec<String>>,
    }

    impl ScriptedService {
        fn with_states(states: Vec<Run>) -> Self {
            Self {
                states: Mutex::new(states.into()),
                ..Default::default()
            }
        }

        fn next_state(&self) -> Run {
            let mut states = self.states.lock().unwrap();
            if states.len() > 1 {
                states.pop_front().unwrap()
            } else {
                states.front().cloned().unwrap()
            }
        }
    }

    #[async_trait]
    impl AgentService for ScriptedService {
        async fn create_agent(&self, _spec: &AgentSpec) -> Result<HostedAgentInfo> {
            unreachable!()
        }
        async fn delete_agent(&self, _agent_id: &str) -> Result<()> {
            unreachable!()
        }
        async fn create_thread(&self) -> Result<Thread> {
            unreachable!()
        }
        async fn create_message(
            &self,
            _thread_id: &str,
            _role: MessageRole,
            _content: &str,
        ) -> Result<ThreadMessage> {
            unreachable!()
        }
        async fn create_run(&self, _thread_id: &str, _agent_id: &str) -> Result<Run> {
            Ok(self.next_state())
        }
        async fn get_run(&self, _thread_id: &str, _run_id: &str) -> Result<Run> {
            Ok(self.next_state())
        }
        async fn submit_tool_outputs(
            &self,
            _thread_id: &str,
            _run_id: &str,
            outputs: &[ToolOutput],
        ) -> Result<Run> {
            self.submitted.lock().unwrap().push(outputs.to_vec());
            Ok(self.next_state())
        }
        async fn cancel_run(&self, _thread_id: &str, run_id: &str) -> Result<Run> {
            self.cancelled.lock().unwrap().push(run_id.to_string());
            let mut run = self.next_state();
            run.status = RunStatus::Cancelling;
            Ok(run)
        }
        async fn list_messages(&self, _thread_id: &str) -> Result<Vec<ThreadMessage>> {
            unreachable!()
        }
    }

    struct RowCountTool;

    #[async_trait]
    impl Tool for RowCountTool {
        async fn execute(&self, params: Value) -> agent_core::Result<Value> {
            Ok(json!({ "count": 10, "params": params }))
        }
        fn name(&self) -> &str {
            "query_finance_data"
        }
        fn description(&self) -> &str {
            "Count rows"
        }
        fn input_schema(&self) -> Value {
            agent_tools::schema::empty()
        }
    }

    fn run(status: RunStatus) -> Run {
        Run {
            id: "run_1".to_string(),
            thread_id: "thread_1".to_string(),
            assistant_id: Some("asst_1".to_string()),
            status,
            required_action: None,
            last_error: None,
        }
    }

    fn requires(calls: &[(&str, &str, &str)]) -> Run {
        let mut run = run(RunStatus::RequiresAction);
        run.required_action = Some(RequiredAction {
            kind: "submit_tool_outputs".to_string(),
            submit_tool_outputs: Some(SubmitToolOutputs {
                tool_calls: calls
                    .iter()
                    .map(|(id, name, arguments)| ToolCall {
                        id: (*id).to_string(),
                        kind: "function".to_string(),
                        function: FunctionCall {
                            name: (*name).to_string(),
                            arguments: (*arguments).to_string(),
                        },
                    })
                    .collect(),
            }),
        });
        run
    }

    fn executor(service: Arc<ScriptedService>, max_polls: usize) -> RunExecutor {
        let registry = Arc::new(ToolRegistry::new());
        registry.register(Arc::new(RowCountTool));
        RunExecutor::new(
            service,
            registry,
            ExecutorConfig {
                poll_interval: Duration::ZERO,
                max_polls,
            },
        )
    }

    #[tokio::test]
    async fn test_tool_calls_are_answered() {
        let service = Arc::new(ScriptedService::with_states(vec![
            run(RunStatus::Queued),
            requires(&[
                ("call_1", "query_finance_data", "{\"company\":\"IBM\"}"),
                ("call_2", "fetch_stock_quote", ""),
                ("call_3", "query_finance_data", "not json"),
            ]),
            run(RunStatus::InProgress),
            run(RunStatus::Completed),
        ]));

        let finished = executor(Arc::clone(&service), 10)
            .create_and_process_run("thread_1", "asst_1")
            .await
            .unwrap();
        assert_eq!(finished.status, RunStatus::Completed);

        let submitted = service.submitted.lock().unwrap();
        assert_eq!(submitted.len(), 1);
        let outputs = &submitted[0];
        assert_eq!(outputs.len(), 3);

        let first: Value = serde_json::from_str(&outputs[0].output).unwrap();
        assert_eq!(outputs[0].tool_call_id, "call_1");
        assert_eq!(first["count"], 10);
        assert_eq!(first["params"]["company"], "IBM");

        let second: Value = serde_json::from_str(&outputs[1].output).unwrap();
        assert!(second["error"].as_str().unwrap().contains("Tool not found"));

        let third: Value = serde_json::from_str(&outputs[2].output).unwrap();
        assert!(third["error"].as_str().unwrap().contains("Invalid tool parameters"));
    }

    #[tokio::test]
    async fn test_failed_run_is_returned() {
        let service = Arc::new(ScriptedService::with_states(vec![
            run(RunStatus::InProgress),
            run(RunStatus::Failed),
        ]));

        let finished = executor(Arc::clone(&service), 10)
            .create_and_process_run("thread_1", "asst_1")
            .await
            .unwrap();
        assert_eq!(finished.status, RunStatus::Failed);
        assert!(service.submitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stuck_run_is_cancelled() {
        let service = Arc::new(ScriptedService::with_states(vec![run(RunStatus::InProgress)]));

        let err = executor(Arc::clone(&service), 3)
            .create_and_process_run("thread_1", "asst_1")
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::RunTimedOut { polls: 3, .. }));
        assert_eq!(*service.cancelled.lock().unwrap(), vec!["run_1".to_string()]);
    }

    #[test]
    fn test_parse_arguments() {
        assert_eq!(parse_arguments("").unwrap(), json!({}));
        assert_eq!(parse_arguments(" {\"limit\": 3} ").unwrap()["limit"], 3);
        assert!(parse_arguments("{").is_err());
    }
}
