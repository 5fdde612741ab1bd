//! The two production prompts and their typed inputs.

use crate::template::{PromptTemplate, TemplateError};
use pitch_macros::PromptInputs;

/// Prompt that asks for a pitch title.
pub const TITLE_TEMPLATE: &str = "Write me a sales pitch title about {topic}";

/// Prompt that asks for the promotional email.
pub const SCRIPT_TEMPLATE: &str = "Write me a sales pitch promotional email about this title: {title} while leveraging the following research: {wikipedia_research}";

/// Field recorded in the title chain's memory.
pub const TITLE_MEMORY_KEY: &str = "topic";

/// Field recorded in the script chain's memory.
pub const SCRIPT_MEMORY_KEY: &str = "title";

/// Inputs for [`TITLE_TEMPLATE`].
#[derive(Debug, Clone, PartialEq, Eq, PromptInputs)]
pub struct TitleInputs {
    pub topic: String,
}

/// Inputs for [`SCRIPT_TEMPLATE`].
#[derive(Debug, Clone, PartialEq, Eq, PromptInputs)]
pub struct ScriptInputs {
    pub title: String,
    pub wikipedia_research: String,
}

/// Parse the title prompt.
pub fn title_template() -> Result<PromptTemplate<TitleInputs>, TemplateError> {
    PromptTemplate::new(TITLE_TEMPLATE)
}

/// Parse the script prompt.
pub fn script_template() -> Result<PromptTemplate<ScriptInputs>, TemplateError> {
    PromptTemplate::new(SCRIPT_TEMPLATE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_prompt() {
        let template = title_template().unwrap();
        let prompt = template.render(&TitleInputs {
            topic: "coffee".to_string(),
        });
        assert_eq!(prompt, "Write me a sales pitch title about coffee");
    }

    #[test]
    fn test_script_prompt() {
        let template = script_template().unwrap();
        let prompt = template.render(&ScriptInputs {
            title: "Brew Better".to_string(),
            wikipedia_research: "Page: Coffee\nSummary: A drink.".to_string(),
        });
        assert_eq!(
            prompt,
            "Write me a sales pitch promotional email about this title: Brew Better \
             while leveraging the following research: Page: Coffee\nSummary: A drink."
        );
    }

    #[test]
    fn test_memory_keys_are_declared_inputs() {
        use crate::template::PromptInputs as _;
        assert!(TitleInputs::NAMES.contains(&TITLE_MEMORY_KEY));
        assert!(ScriptInputs::NAMES.contains(&SCRIPT_MEMORY_KEY));
    }
}
