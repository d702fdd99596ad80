//! Agent loop tests against a scripted model.

mod helpers;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde_json::json;

use self::helpers::{
    BarrierTool, CountingTool, LoopingClient, ScriptedClient, SlowTool, handoff_response,
    text_response, tool_use_response, usage,
};
use super::{Agent, AgentDirectory, AgentResult, AgentTool, HandoffOutcome};
use crate::Error;
use crate::prompts::BASE_SYSTEM_PROMPT;
use crate::tools::{ToolArgs, ToolRegistry, math, tool_fn};
use crate::types::{
    ApiResponse, ContentBlock, Message, StopReason, ThinkingBlock, ToolDefinition, ToolError,
    ToolResultBlock, ToolUseBlock,
};

fn results_of(message: &Message) -> Vec<ToolResultBlock> {
    message.tool_results_iter().cloned().collect()
}

fn calculator(client: Arc<ScriptedClient>) -> Arc<Agent> {
    Arc::new(
        Agent::builder("calculator_assistant")
            .system_prompt("You are a calculator assistant.")
            .tools(&math::registry())
            .tool_schemas(&math::definitions())
            .client(client)
            .build()
            .unwrap(),
    )
}

// ============================================================================
// Construction
// ============================================================================

mod construction_tests {
    use super::*;

    #[test]
    fn test_build_validates() {
        let client = ScriptedClient::new(vec![]);
        let zero = Agent::builder("a").max_turns(0).client(client.clone()).build();
        assert!(matches!(zero, Err(Error::Config(_))));

        let unnamed = Agent::builder("").client(client.clone()).build();
        assert!(matches!(unnamed, Err(Error::Config(_))));

        let peer = calculator(ScriptedClient::new(vec![]));
        let duplicate = Agent::builder("a")
            .handoffs(&[peer.clone(), peer])
            .client(client)
            .build();
        assert!(matches!(duplicate, Err(Error::Config(msg)) if msg.contains("duplicate")));
    }

    #[test]
    fn test_system_prompt_has_preamble() {
        let agent = Agent::builder("writer")
            .system_prompt("Write haiku.")
            .client(ScriptedClient::new(vec![]))
            .build()
            .unwrap();
        assert_eq!(agent.system_prompt(), format!("{BASE_SYSTEM_PROMPT}Write haiku."));

        let default = Agent::builder("plain")
            .client(ScriptedClient::new(vec![]))
            .build()
            .unwrap();
        assert!(default.system_prompt().ends_with("You are a helpful assistant."));
    }

    #[test]
    fn test_caller_collections_are_copied() {
        let mut registry = math::registry();
        let mut schemas = math::definitions();
        let agent = Agent::builder("calc")
            .tools(&registry)
            .tool_schemas(&schemas)
            .client(ScriptedClient::new(vec![]))
            .build()
            .unwrap();

        registry.unregister("sum_numbers");
        registry.register("extra", Arc::new(CountingTool::default()));
        schemas.clear();

        assert!(agent.tools().contains("sum_numbers"));
        assert!(!agent.tools().contains("extra"));
        assert_eq!(agent.tool_schemas().len(), 6);
    }

    #[test]
    fn test_request_without_tools_omits_field() {
        let agent = Agent::builder("plain")
            .model("claude-haiku-4-5")
            .max_tokens(512)
            .client(ScriptedClient::new(vec![]))
            .build()
            .unwrap();
        let request = agent.build_request(&[Message::user("Hi")]);
        assert!(request.tools.is_none());
        assert_eq!(request.model, "claude-haiku-4-5");
        assert_eq!(request.max_tokens, 512);

        let body = serde_json::to_value(&request).unwrap();
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn test_request_lists_schemas_then_handoff() {
        let peer = calculator(ScriptedClient::new(vec![]));
        let agent = Agent::builder("helpful_assistant")
            .tool_schema(ToolDefinition::new("lookup", "Look up", json!({"type": "object"})))
            .handoff(peer)
            .client(ScriptedClient::new(vec![]))
            .build()
            .unwrap();

        let tools = agent.build_request(&[Message::user("Hi")]).tools.unwrap();
        let names: Vec<_> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["lookup", "handoff"]);
        assert!(
            tools[1].input_schema["properties"]["name"]["description"]
                .as_str()
                .unwrap()
                .ends_with(r#"["calculator_assistant"]"#)
        );
    }

    #[test]
    fn test_handoff_only_agent_sends_descriptor() {
        let peer = calculator(ScriptedClient::new(vec![]));
        let agent = Agent::builder("router")
            .handoff(peer)
            .client(ScriptedClient::new(vec![]))
            .build()
            .unwrap();
        let tools = agent.tool_definitions();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "handoff");
    }
}

// ============================================================================
// Control loop
// ============================================================================

mod loop_tests {
    use super::*;

    #[tokio::test]
    async fn test_plain_answer() {
        let client = ScriptedClient::new(vec![ApiResponse::new(
            vec![ContentBlock::text("Paris"), ContentBlock::text(" is the capital.")],
            StopReason::EndTurn,
        )]);
        let agent = Agent::builder("geo").client(client.clone()).build().unwrap();

        let history = vec![Message::user("What is the capital of France?")];
        let result = agent.run(&history).await.unwrap();

        assert_eq!(result.text(), "Paris is the capital.");
        assert_eq!(result.agent, "geo");
        assert_eq!(result.turns, 1);
        assert_eq!(result.messages.len(), 2);
        assert!(result.messages.last().unwrap().is_assistant());
        assert_eq!(history.len(), 1);
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_tool_round_trip() {
        let client = ScriptedClient::new(vec![
            tool_use_response(&[("toolu_1", "sum_numbers", json!({"a": 15, "b": 27}))]),
            text_response("15 + 27 = 42"),
        ]);
        let agent = calculator(client.clone());

        let result = agent.execute("What is 15 + 27?").await.unwrap();
        assert_eq!(result.text(), "15 + 27 = 42");
        assert_eq!(result.turns, 2);

        let requests = client.requests();
        assert_eq!(requests.len(), 2);
        let second = &requests[1].messages;
        assert_eq!(second.len(), 3);
        assert!(second[1].is_assistant());
        let results = results_of(&second[2]);
        assert_eq!(results, vec![ToolResultBlock::success("toolu_1", "42")]);
    }

    #[tokio::test]
    async fn test_unknown_tool_continues() {
        let client = ScriptedClient::new(vec![
            tool_use_response(&[("toolu_1", "lookup", json!({"q": "x"}))]),
            text_response("I could not look that up."),
        ]);
        let agent = calculator(client.clone());

        let result = agent.execute("Look it up").await.unwrap();
        assert_eq!(result.text(), "I could not look that up.");

        let results = results_of(&client.requests()[1].messages[2]);
        assert_eq!(results[0].content, "Error: Tool lookup not found");
        assert!(results[0].is_error());
    }

    #[tokio::test]
    async fn test_failing_tool_message_reaches_model() {
        let client = ScriptedClient::new(vec![
            tool_use_response(&[("toolu_1", "divide_numbers", json!({"a": 10, "b": 0}))]),
            text_response("Division by zero is undefined."),
        ]);
        let agent = calculator(client.clone());

        agent.execute("10 / 0?").await.unwrap();

        let results = results_of(&client.requests()[1].messages[2]);
        assert!(results[0].content.contains("Cannot divide by zero"));
        assert!(results[0].is_error());
    }

    #[tokio::test]
    async fn test_every_invocation_gets_one_result_in_order() {
        let client = ScriptedClient::new(vec![
            tool_use_response(&[
                ("toolu_a", "multiply_numbers", json!({"a": 6, "b": 7})),
                ("toolu_b", "nope", json!({})),
                ("toolu_c", "power", json!({"base": 2, "exponent": 3})),
            ]),
            text_response("done"),
        ]);
        let agent = calculator(client.clone());

        agent.execute("go").await.unwrap();

        let results = results_of(&client.requests()[1].messages[2]);
        let ids: Vec<_> = results.iter().map(|r| r.tool_use_id.as_str()).collect();
        assert_eq!(ids, vec!["toolu_a", "toolu_b", "toolu_c"]);
        assert_eq!(results[0].content, "42");
        assert!(results[1].is_error());
        assert_eq!(results[2].content, "8");
    }

    #[tokio::test]
    async fn test_tools_run_concurrently() {
        let barrier = Arc::new(tokio::sync::Barrier::new(2));
        let client = ScriptedClient::new(vec![
            tool_use_response(&[
                ("toolu_1", "wait", json!({})),
                ("toolu_2", "wait", json!({})),
            ]),
            text_response("both released"),
        ]);
        let agent = Agent::builder("waiter")
            .tool("wait", BarrierTool { barrier })
            .client(client)
            .build()
            .unwrap();

        let result = tokio::time::timeout(Duration::from_secs(5), agent.execute("go"))
            .await
            .expect("tools were not run concurrently")
            .unwrap();
        assert_eq!(result.text(), "both released");
    }

    #[tokio::test]
    async fn test_results_keep_request_order_despite_timing() {
        let client = ScriptedClient::new(vec![
            tool_use_response(&[
                ("toolu_slow", "slow", json!({})),
                ("toolu_fast", "fast", json!({})),
            ]),
            text_response("ok"),
        ]);
        let agent = Agent::builder("timer")
            .tool(
                "slow",
                SlowTool {
                    label: "slow",
                    delay: Duration::from_millis(50),
                },
            )
            .tool(
                "fast",
                SlowTool {
                    label: "fast",
                    delay: Duration::ZERO,
                },
            )
            .client(client.clone())
            .build()
            .unwrap();

        agent.execute("go").await.unwrap();

        let results = results_of(&client.requests()[1].messages[2]);
        assert_eq!(results[0].tool_use_id, "toolu_slow");
        assert_eq!(results[0].content, "slow");
        assert_eq!(results[1].tool_use_id, "toolu_fast");
    }

    #[tokio::test]
    async fn test_max_turns_exceeded() {
        let client = LoopingClient::new(tool_use_response(&[(
            "toolu_1",
            "sum_numbers",
            json!({"a": 1, "b": 1}),
        )]));
        let agent = Agent::builder("stubborn")
            .tools(&math::registry())
            .max_turns(3)
            .client(client.clone())
            .build()
            .unwrap();

        let err = agent.execute("loop forever").await.unwrap_err();
        assert!(err.is_max_turns());
        assert!(matches!(
            err,
            Error::MaxTurnsExceeded { ref agent, max_turns: 3 } if agent == "stubborn"
        ));
        assert_eq!(client.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_tool_use_without_blocks_is_malformed() {
        let client = ScriptedClient::new(vec![ApiResponse::new(
            vec![ContentBlock::text("Let me use a tool")],
            StopReason::ToolUse,
        )]);
        let agent = Agent::builder("confused").client(client).build().unwrap();

        let err = agent.execute("hi").await.unwrap_err();
        assert!(matches!(err, Error::MalformedToolUse { ref agent } if agent == "confused"));
    }

    #[tokio::test]
    async fn test_llm_failure_propagates() {
        let agent = Agent::builder("offline")
            .client(ScriptedClient::new(vec![]))
            .build()
            .unwrap();
        let err = agent.execute("hi").await.unwrap_err();
        assert!(matches!(err, Error::Api { status: Some(500), .. }));
    }

    #[tokio::test]
    async fn test_thinking_blocks_pass_through() {
        let thinking = ContentBlock::Thinking(ThinkingBlock {
            thinking: "The user wants a greeting.".into(),
            signature: "sig_1".into(),
        });
        let client = ScriptedClient::new(vec![ApiResponse::new(
            vec![thinking.clone(), ContentBlock::text("Hello!")],
            StopReason::EndTurn,
        )]);
        let agent = Agent::builder("greeter").client(client).build().unwrap();

        let result = agent.execute("Say hi").await.unwrap();
        assert_eq!(result.text(), "Hello!");
        assert_eq!(result.messages[1].blocks()[0], thinking);
    }

    #[tokio::test]
    async fn test_usage_is_summed() {
        let client = ScriptedClient::new(vec![
            tool_use_response(&[("toolu_1", "sum_numbers", json!({"a": 1, "b": 2}))])
                .with_usage(usage(100, 20)),
            text_response("3").with_usage(usage(150, 5)),
        ]);
        let agent = calculator(client);

        let result = agent.execute("1 + 2").await.unwrap();
        assert_eq!(result.usage, usage(250, 25));
        assert_eq!(result.total_tokens(), 275);
    }

    #[tokio::test]
    async fn test_continuing_a_conversation() {
        let client = ScriptedClient::new(vec![text_response("42"), text_response("Yes, 42 is correct.")]);
        let agent = Agent::builder("checker").client(client.clone()).build().unwrap();

        let first = agent.execute("What is 6 * 7?").await.unwrap();
        let (mut messages, _) = first.into_parts();
        messages.push(Message::user("Double-check that."));
        let second = agent.run(&messages).await.unwrap();

        assert_eq!(second.text(), "Yes, 42 is correct.");
        assert_eq!(client.requests()[1].messages.len(), 3);
        assert_eq!(second.messages.len(), 4);
    }

    #[tokio::test]
    async fn test_shared_agent_concurrent_runs() {
        let client = LoopingClient::new(text_response("ok"));
        let agent = Arc::new(Agent::builder("shared").client(client.clone()).build().unwrap());

        let runs = (0..4).map(|i| {
            let agent = Arc::clone(&agent);
            tokio::spawn(async move { agent.execute(format!("task {i}")).await })
        });
        for run in futures::future::join_all(runs).await {
            assert_eq!(run.unwrap().unwrap().text(), "ok");
        }
        assert_eq!(client.calls.load(Ordering::SeqCst), 4);
    }
}

// ============================================================================
// Handoff
// ============================================================================

mod handoff_tests {
    use super::*;

    #[tokio::test]
    async fn test_successful_handoff_returns_peer_result() {
        let peer_client = ScriptedClient::new(vec![text_response("x = 2 or x = 3")]);
        let peer = calculator(peer_client.clone());

        let client = ScriptedClient::new(vec![handoff_response(
            "toolu_h",
            "calculator_assistant",
            "math question",
        )]);
        let agent = Agent::builder("helpful_assistant")
            .handoff(peer)
            .client(client.clone())
            .build()
            .unwrap();

        let result = agent.execute("Solve x² - 5x + 6 = 0").await.unwrap();
        assert_eq!(result.agent, "calculator_assistant");
        assert_eq!(result.text(), "x = 2 or x = 3");
        assert_eq!(client.calls(), 1);

        // The assistant turn holding the handoff request is pruned.
        let peer_messages = &peer_client.requests()[0].messages;
        assert_eq!(peer_messages.len(), 1);
        assert_eq!(peer_messages[0].text(), "Solve x² - 5x + 6 = 0");
    }

    #[tokio::test]
    async fn test_unknown_peer_is_reported() {
        let peer = calculator(ScriptedClient::new(vec![]));
        let client = ScriptedClient::new(vec![
            handoff_response("toolu_h", "poet", "needs a poem"),
            text_response("I will answer myself."),
        ]);
        let agent = Agent::builder("helpful_assistant")
            .handoff(peer)
            .client(client.clone())
            .build()
            .unwrap();

        let result = agent.execute("Write a poem").await.unwrap();
        assert_eq!(result.agent, "helpful_assistant");
        assert_eq!(result.text(), "I will answer myself.");

        let results = results_of(&client.requests()[1].messages[2]);
        assert_eq!(
            results[0].content,
            r#"Handoff failed: Agent 'poet' not found. Available agents: ["calculator_assistant"]"#
        );
        assert!(results[0].is_error());
        assert_eq!(results[0].tool_use_id, "toolu_h");
    }

    #[tokio::test]
    async fn test_handoff_without_peers() {
        let client = ScriptedClient::new(vec![
            handoff_response("toolu_h", "anyone", "help"),
            text_response("fine"),
        ]);
        let agent = Agent::builder("alone").client(client.clone()).build().unwrap();

        agent.execute("hi").await.unwrap();
        let results = results_of(&client.requests()[1].messages[2]);
        assert_eq!(
            results[0].content,
            "Handoff failed: Agent 'anyone' not found. Available agents: []"
        );
    }

    #[tokio::test]
    async fn test_peer_failure_is_absorbed() {
        let broken_peer = calculator(ScriptedClient::new(vec![]));
        let client = ScriptedClient::new(vec![
            handoff_response("toolu_h", "calculator_assistant", "math"),
            text_response("The calculator is unavailable."),
        ]);
        let agent = Agent::builder("helpful_assistant")
            .handoff(broken_peer)
            .client(client.clone())
            .build()
            .unwrap();

        let result = agent.execute("2 + 2?").await.unwrap();
        assert_eq!(result.text(), "The calculator is unavailable.");

        let results = results_of(&client.requests()[1].messages[2]);
        assert!(results[0].content.starts_with("Handoff failed: API error"));
        assert!(results[0].content.contains("script exhausted"));
        assert!(results[0].is_error());
    }

    #[tokio::test]
    async fn test_successful_handoff_skips_regular_tools() {
        let calls = Arc::new(AtomicUsize::new(0));
        let peer = calculator(ScriptedClient::new(vec![text_response("4")]));
        let client = ScriptedClient::new(vec![tool_use_response(&[
            ("toolu_t", "echo", json!({"text": "hi"})),
            (
                "toolu_h",
                "handoff",
                json!({"name": "calculator_assistant", "reason": "math"}),
            ),
        ])]);
        let agent = Agent::builder("helpful_assistant")
            .tool(
                "echo",
                CountingTool {
                    calls: Arc::clone(&calls),
                },
            )
            .handoff(peer)
            .client(client)
            .build()
            .unwrap();

        let result = agent.execute("2 + 2?").await.unwrap();
        assert_eq!(result.text(), "4");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_handoff_does_not_short_circuit_batch() {
        let calls = Arc::new(AtomicUsize::new(0));
        let client = ScriptedClient::new(vec![
            tool_use_response(&[
                ("toolu_h", "handoff", json!({"name": "ghost"})),
                ("toolu_t", "echo", json!({"text": "still here"})),
            ]),
            text_response("done"),
        ]);
        let agent = Agent::builder("solo")
            .tool(
                "echo",
                CountingTool {
                    calls: Arc::clone(&calls),
                },
            )
            .client(client.clone())
            .build()
            .unwrap();

        agent.execute("go").await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let results = results_of(&client.requests()[1].messages[2]);
        assert_eq!(results[0].tool_use_id, "toolu_h");
        assert!(results[0].is_error());
        assert_eq!(results[1], ToolResultBlock::success("toolu_t", "still here"));
    }

    #[tokio::test]
    async fn test_directory_allows_cycles() {
        let directory = AgentDirectory::new();
        let a_client = ScriptedClient::new(vec![handoff_response("toolu_1", "b", "your turn")]);
        let b_client = ScriptedClient::new(vec![text_response("answered by b")]);

        let a = Arc::new(
            Agent::builder("a")
                .handoff_via("b", &directory)
                .client(a_client)
                .build()
                .unwrap(),
        );
        let b = Arc::new(
            Agent::builder("b")
                .handoff_via("a", &directory)
                .client(b_client.clone())
                .build()
                .unwrap(),
        );
        directory.register(Arc::clone(&a));
        directory.register(Arc::clone(&b));

        let result = a.execute("hello").await.unwrap();
        assert_eq!(result.agent, "b");
        assert_eq!(result.text(), "answered by b");

        let b_tools = b_client.requests()[0].tools.clone().unwrap();
        assert_eq!(b_tools[0].name, "handoff");

        directory.clear();
    }

    #[tokio::test]
    async fn test_directory_target_missing_at_handoff_time() {
        let directory = AgentDirectory::new();
        let agent = Agent::builder("a")
            .handoff_via("later", &directory)
            .client(ScriptedClient::new(vec![]))
            .build()
            .unwrap();

        let invocation = ToolUseBlock::new("toolu_1", "handoff", json!({"name": "later"}));
        let outcome = agent
            .call_handoff(&invocation, &[Message::user("hi")])
            .await;
        match outcome {
            HandoffOutcome::Rejected(block) => {
                assert_eq!(
                    block.content,
                    r#"Handoff failed: Agent 'later' not found. Available agents: ["later"]"#
                );
            }
            HandoffOutcome::Delegated(_) => panic!("handoff should have been rejected"),
        }
    }

    #[tokio::test]
    async fn test_prune_keeps_unrelated_last_message() {
        let peer_client = ScriptedClient::new(vec![text_response("ok")]);
        let peer = calculator(peer_client.clone());
        let agent = Agent::builder("router")
            .handoff(peer)
            .client(ScriptedClient::new(vec![]))
            .build()
            .unwrap();

        let conversation = vec![
            Message::user("first"),
            Message::assistant_with_content(vec![ContentBlock::tool_use(
                "toolu_other",
                "handoff",
                json!({}),
            )]),
        ];
        let invocation = ToolUseBlock::new(
            "toolu_1",
            "handoff",
            json!({"name": "calculator_assistant", "reason": "r"}),
        );
        let outcome = agent.call_handoff(&invocation, &conversation).await;
        assert!(matches!(outcome, HandoffOutcome::Delegated(AgentResult { .. })));
        assert_eq!(peer_client.requests()[0].messages.len(), 2);
    }
}

// ============================================================================
// Agents as tools
// ============================================================================

mod agent_tool_tests {
    use super::*;

    #[tokio::test]
    async fn test_agent_tool_returns_inner_answer() {
        let inner_client = ScriptedClient::new(vec![text_response("inner answer")]);
        let inner = Arc::new(
            Agent::builder("researcher")
                .client(inner_client.clone())
                .build()
                .unwrap(),
        );

        let outer_client = ScriptedClient::new(vec![
            tool_use_response(&[("toolu_1", "researcher_agent", json!({"message": "dig"}))]),
            text_response("summary"),
        ]);
        let outer = Agent::builder("lead")
            .agent_tool(inner, "Research assistant")
            .client(outer_client.clone())
            .build()
            .unwrap();

        let result = outer.execute("Investigate").await.unwrap();
        assert_eq!(result.agent, "lead");
        assert_eq!(result.text(), "summary");

        let inner_messages = &inner_client.requests()[0].messages;
        assert_eq!(inner_messages, &vec![Message::user("dig")]);

        let requests = outer_client.requests();
        let advertised = requests[0].tools.clone().unwrap();
        assert_eq!(advertised[0].name, "researcher_agent");
        assert_eq!(advertised[0].required(), vec!["message"]);
        let results = results_of(&requests[1].messages[2]);
        assert_eq!(results[0].content, "inner answer");
    }

    #[tokio::test]
    async fn test_agent_tool_missing_message() {
        let inner = Arc::new(
            Agent::builder("researcher")
                .client(ScriptedClient::new(vec![]))
                .build()
                .unwrap(),
        );
        let tool = AgentTool::new(inner, "Research");
        let err = crate::tools::Tool::call(&tool, ToolArgs::new(json!({})))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn test_closure_tools_in_registry() {
        let registry = ToolRegistry::new().with_tool(
            "shout",
            tool_fn(|args: ToolArgs| args.get::<String>("text").map(|t| t.to_uppercase())),
        );
        let client = ScriptedClient::new(vec![
            tool_use_response(&[("toolu_1", "shout", json!({"text": "hey"}))]),
            text_response("done"),
        ]);
        let agent = Agent::builder("loud")
            .tools(&registry)
            .client(client.clone())
            .build()
            .unwrap();

        agent.execute("shout hey").await.unwrap();
        let results = results_of(&client.requests()[1].messages[2]);
        assert_eq!(results[0].content, "HEY");
    }
}
