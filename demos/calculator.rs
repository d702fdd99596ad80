//! Calculator Handoff Demo
//!
//! A general assistant that hands math questions to a calculator assistant,
//! plus an orchestrator that calls the calculator as a tool instead.
//!
//! Requires ANTHROPIC_API_KEY.
//!
//! Run: cargo run --example calculator

use std::sync::Arc;

use claude_handoff::tools::math;
use claude_handoff::{Agent, AnthropicClient, LlmClient, Message};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "claude_handoff=info".into()),
        )
        .init();

    let client: Arc<dyn LlmClient> = Arc::new(AnthropicClient::from_env()?);

    let calculator = Arc::new(
        Agent::builder("calculator_assistant")
            .system_prompt(
                "You are a calculator assistant. You specialize in mathematical calculations and solving equations.",
            )
            .tools(&math::registry())
            .tool_schemas(&math::definitions())
            .client(Arc::clone(&client))
            .build()?,
    );

    let assistant = Agent::builder("helpful_assistant")
        .system_prompt(
            "You are a helpful assistant. You can assist with various tasks and handoff to the calculator assistant for math problems.",
        )
        .handoff(Arc::clone(&calculator))
        .client(Arc::clone(&client))
        .build()?;

    println!("\n=== Handoff ===\n");
    for question in [
        "What is the capital of France?",
        "What is the solution to the equation x² - 5x + 6 = 0?",
    ] {
        let result = assistant.execute(question).await?;
        println!("[{}] {}\n", result.agent, result.text());
    }

    let orchestrator = Agent::builder("orchestrator")
        .system_prompt("Break problems down and use the calculator agent for every computation.")
        .agent_tool(calculator, "Solves arithmetic. Send it one calculation at a time.")
        .client(client)
        .build()?;

    println!("=== Agent as tool ===\n");
    let first = orchestrator
        .execute("A room is 4.5m by 3.2m. What is its area, and its diagonal?")
        .await?;
    println!("{}\n", first.text());

    let (mut messages, _) = first.into_parts();
    messages.push(Message::user("Now give the area in square feet."));
    let follow_up = orchestrator.run(&messages).await?;
    println!("{}", follow_up.text());

    Ok(())
}
