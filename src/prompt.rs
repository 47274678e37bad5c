// src/prompt.rs
//! Instruction/response prompt templates for the three completions per unit.
//!
//! Each answer is seeded with the Markdown it should continue, so the model only
//! has to fill in table rows / the returns body.

pub const PARAMS_BASE: &str = "
#### Parameters

| Name | Type | Description |
| --- | --- | --- |
";

pub const RETURNS_BASE: &str = "
#### Returns
";

/// Marker that opens every prompt; also the default stop sequence.
pub const INSTRUCTION: &str = "### Instruction:";
pub const RESPONSE: &str = "### Response:";

pub fn parameters(definition: &str) -> String {
    format!(
        "\n{INSTRUCTION}\nSummarise the parameter types for the following definition:\n\n{definition}\n\n\
Use 'void' if no parameters exist and describe the purpose of the parameter if it does.\n\n\
{RESPONSE}{PARAMS_BASE}"
    )
}

pub fn returns(definition: &str) -> String {
    format!(
        "\n{INSTRUCTION}\nSummarise the return types for the following definition:\n\n{definition}\n\n\
{RESPONSE}{RETURNS_BASE}"
    )
}

/// `params_md` / `returns_md` are the rendered sections (base + model output).
pub fn description(params_md: &str, returns_md: &str, definition: &str) -> String {
    format!(
        "\n{INSTRUCTION}\nGiven:\n\n{params_md}\n\n{returns_md}\n\n\
Create a brief explanation of the purpose of the function for the following:\n\n{definition}\n\n\
{RESPONSE}\n"
    )
}

/* ---------------------------------- tests ---------------------------------- */
