//! Agent execution loop.

use std::time::Instant;

use futures::FutureExt;
use futures::future::{BoxFuture, join_all};
use tracing::{debug, info, instrument, warn};

use super::handoff::{HANDOFF_TOOL_NAME, HandoffOutcome};
use super::{Agent, AgentResult};
use crate::types::{Message, ToolResultBlock, ToolUseBlock, Usage};
use crate::{Error, Result};

impl Agent {
    /// Drive the conversation until the model answers without tools.
    ///
    /// `messages` is copied; the caller's history is never modified. The
    /// future is boxed because a run may hand off to peers that hand back.
    pub fn run<'a>(&'a self, messages: &'a [Message]) -> BoxFuture<'a, Result<AgentResult>> {
        self.run_inner(messages).boxed()
    }

    /// Run on a single user prompt.
    pub async fn execute(&self, prompt: impl Into<String>) -> Result<AgentResult> {
        let messages = [Message::user(prompt)];
        self.run(&messages).await
    }

    #[instrument(
        name = "agent_run",
        skip_all,
        fields(agent = %self.config.name, run_id = %uuid::Uuid::new_v4())
    )]
    async fn run_inner(&self, messages: &[Message]) -> Result<AgentResult> {
        let mut conversation = messages.to_vec();
        let mut usage = Usage::default();
        let mut turns = 0;

        info!(messages = conversation.len(), "Starting agent run");

        while turns < self.config.max_turns {
            turns += 1;
            debug!(turn = turns, "Starting turn");

            let api_start = Instant::now();
            let response = self.client.send(self.build_request(&conversation)).await?;
            debug!(
                api_time_ms = api_start.elapsed().as_millis() as u64,
                stop_reason = ?response.stop_reason,
                "LLM call completed"
            );
            usage.add(&response.usage);

            let wants_tool_use = response.wants_tool_use();
            let text = response.text();
            let invocations: Vec<ToolUseBlock> =
                response.tool_uses().into_iter().cloned().collect();
            conversation.push(Message::assistant_with_content(response.content));

            if !wants_tool_use {
                info!(turns, total_tokens = usage.total(), "Agent run completed");
                return Ok(AgentResult {
                    agent: self.config.name.clone(),
                    text,
                    messages: conversation,
                    turns,
                    usage,
                });
            }

            if invocations.is_empty() {
                warn!("Model requested tool use without tool_use blocks");
                return Err(Error::MalformedToolUse {
                    agent: self.config.name.clone(),
                });
            }

            let mut results: Vec<Option<ToolResultBlock>> = vec![None; invocations.len()];

            for (slot, invocation) in invocations.iter().enumerate() {
                if invocation.name != HANDOFF_TOOL_NAME {
                    continue;
                }
                match self.call_handoff(invocation, &conversation).await {
                    HandoffOutcome::Delegated(result) => {
                        info!(to = %result.agent, turns, "Run delegated");
                        return Ok(result);
                    }
                    HandoffOutcome::Rejected(block) => results[slot] = Some(block),
                }
            }

            let tool_futures = invocations
                .iter()
                .enumerate()
                .filter(|(_, invocation)| invocation.name != HANDOFF_TOOL_NAME)
                .map(|(slot, invocation)| async move {
                    (slot, self.tools.dispatch(invocation).await)
                });

            for (slot, block) in join_all(tool_futures).await {
                results[slot] = Some(block);
            }

            conversation.push(Message::tool_results(results.into_iter().flatten().collect()));
        }

        warn!(max_turns = self.config.max_turns, "Max turns reached");
        Err(Error::MaxTurnsExceeded {
            agent: self.config.name.clone(),
            max_turns: self.config.max_turns,
        })
    }
}
