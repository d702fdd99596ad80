//! Calculator toolset.
//!
//! Six arithmetic tools with derived input schemas, ready to hand to an agent:
//!
//! ```
//! use claude_handoff::{Agent, tools::math};
//!
//! let builder = Agent::builder("calculator")
//!     .tools(&math::registry())
//!     .tool_schemas(&math::definitions());
//! # let _ = builder;
//! ```

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

use super::{SchemaTool, ToolRegistry};
use crate::types::{ToolDefinition, ToolError};

/// Two operands.
#[derive(Debug, Clone, Copy, Deserialize, JsonSchema)]
pub struct BinaryInput {
    /// First operand
    pub a: f64,
    /// Second operand
    pub b: f64,
}

#[derive(Debug, Clone, Copy, Deserialize, JsonSchema)]
pub struct PowerInput {
    /// The base number
    pub base: f64,
    /// The exponent
    pub exponent: f64,
}

#[derive(Debug, Clone, Copy, Deserialize, JsonSchema)]
pub struct SquareRootInput {
    /// The number to find the square root of
    pub number: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SumNumbers;

#[async_trait]
impl SchemaTool for SumNumbers {
    type Input = BinaryInput;
    const NAME: &'static str = "sum_numbers";
    const DESCRIPTION: &'static str = "Sum two numbers and return the result.";

    async fn handle(&self, input: BinaryInput) -> Result<String, ToolError> {
        Ok((input.a + input.b).to_string())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MultiplyNumbers;

#[async_trait]
impl SchemaTool for MultiplyNumbers {
    type Input = BinaryInput;
    const NAME: &'static str = "multiply_numbers";
    const DESCRIPTION: &'static str = "Multiply two numbers and return the result.";

    async fn handle(&self, input: BinaryInput) -> Result<String, ToolError> {
        Ok((input.a * input.b).to_string())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SubtractNumbers;

#[async_trait]
impl SchemaTool for SubtractNumbers {
    type Input = BinaryInput;
    const NAME: &'static str = "subtract_numbers";
    const DESCRIPTION: &'static str =
        "Subtract the second number (b) from the first (a) and return the result.";

    async fn handle(&self, input: BinaryInput) -> Result<String, ToolError> {
        Ok((input.a - input.b).to_string())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DivideNumbers;

#[async_trait]
impl SchemaTool for DivideNumbers {
    type Input = BinaryInput;
    const NAME: &'static str = "divide_numbers";
    const DESCRIPTION: &'static str =
        "Divide the first number (a) by the second (b) and return the result.";

    async fn handle(&self, input: BinaryInput) -> Result<String, ToolError> {
        if input.b == 0.0 {
            return Err(ToolError::execution_failed("Cannot divide by zero"));
        }
        Ok((input.a / input.b).to_string())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Power;

#[async_trait]
impl SchemaTool for Power {
    type Input = PowerInput;
    const NAME: &'static str = "power";
    const DESCRIPTION: &'static str = "Raise the base to the power of the exponent.";

    async fn handle(&self, input: PowerInput) -> Result<String, ToolError> {
        Ok(input.base.powf(input.exponent).to_string())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SquareRoot;

#[async_trait]
impl SchemaTool for SquareRoot {
    type Input = SquareRootInput;
    const NAME: &'static str = "square_root";
    const DESCRIPTION: &'static str = "Calculate the square root of a number.";

    async fn handle(&self, input: SquareRootInput) -> Result<String, ToolError> {
        if input.number < 0.0 {
            return Err(ToolError::execution_failed(
                "Cannot calculate square root of negative number",
            ));
        }
        Ok(input.number.sqrt().to_string())
    }
}

/// Registry holding all six calculator tools.
pub fn registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register_schema_tool(SumNumbers);
    registry.register_schema_tool(MultiplyNumbers);
    registry.register_schema_tool(SubtractNumbers);
    registry.register_schema_tool(DivideNumbers);
    registry.register_schema_tool(Power);
    registry.register_schema_tool(SquareRoot);
    registry
}

/// Schemas matching [`registry`], in a stable order.
pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        SumNumbers::definition(),
        MultiplyNumbers::definition(),
        SubtractNumbers::definition(),
        DivideNumbers::definition(),
        Power::definition(),
        SquareRoot::definition(),
    ]
}
