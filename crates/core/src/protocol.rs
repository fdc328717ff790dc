//! The textual Thought / Action / PAUSE / Observation / Answer protocol.
//!
//! The model is instructed to either request an action:
//!
//! ```text
//! Thought: I need to find the mass of Earth
//! Action: get_planet_mass: Earth
//! PAUSE
//! ```
//!
//! or to give the final answer:
//!
//! ```text
//! Answer: The mass of Earth times 2 is 1.1944e25 kg.
//! ```

use std::sync::OnceLock;

use regex::Regex;

/// Marker that, together with [`ACTION_MARKER`], denotes a tool-call step.
pub const PAUSE_MARKER: &str = "PAUSE";

/// Marker that, together with [`PAUSE_MARKER`], denotes a tool-call step.
pub const ACTION_MARKER: &str = "Action";

/// Marker that denotes the final step.
pub const ANSWER_MARKER: &str = "Answer";

/// Prefix of every text fed back to the model after a step.
pub const OBSERVATION_PREFIX: &str = "Observation: ";

/// A tool invocation requested by the model.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ActionDirective {
    /// Tool name as written by the model (case is preserved).
    pub tool: String,
    /// The raw remainder of the action line.
    pub argument: String,
}

/// Classification of one model output.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Step {
    /// The model requested a tool.
    Action(ActionDirective),
    /// The output has the tool-call markers but no parsable action line.
    MalformedAction,
    /// The model produced its final answer.
    Answer(String),
    /// The output contains neither marker set.
    Unrecognized,
}

fn action_regex() -> &'static Regex {
    static ACTION_REGEX: OnceLock<Regex> = OnceLock::new();
    ACTION_REGEX.get_or_init(|| {
        Regex::new(r"(?i)Action: ([a-z_]+): (.+)")
            .expect("action pattern is valid")
    })
}

/// Extracts the first `Action: <tool>: <argument>` line, if any.
pub fn parse_action(text: &str) -> Option<ActionDirective> {
    let captures = action_regex().captures(text)?;
    Some(ActionDirective {
        tool: captures[1].to_owned(),
        argument: captures[2].to_owned(),
    })
}

/// Extracts the answer text: everything after the first `Answer:` label,
/// or the whole output when the label is missing.
pub fn parse_answer(text: &str) -> String {
    let label = format!("{ANSWER_MARKER}:");
    match text.find(&label) {
        Some(pos) => text[pos + label.len()..].trim().to_owned(),
        None => text.trim().to_owned(),
    }
}

/// Decides what a model output asks for.
///
/// Tool-call markers take precedence over the answer marker.
pub fn classify(text: &str) -> Step {
    if text.contains(PAUSE_MARKER) && text.contains(ACTION_MARKER) {
        return match parse_action(text) {
            Some(directive) => Step::Action(directive),
            None => Step::MalformedAction,
        };
    }
    if text.contains(ANSWER_MARKER) {
        return Step::Answer(parse_answer(text));
    }
    Step::Unrecognized
}

/// Formats the text fed back to the model.
#[inline]
pub fn observation<S: AsRef<str>>(body: S) -> String {
    format!("{OBSERVATION_PREFIX}{}", body.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directive(tool: &str, argument: &str) -> Step {
        Step::Action(ActionDirective {
            tool: tool.to_owned(),
            argument: argument.to_owned(),
        })
    }

    #[test]
    fn test_classify_action() {
        let text = "Thought: I need to find the mass of Earth\n\
                    Action: get_planet_mass: Earth\n\
                    PAUSE";
        assert_eq!(classify(text), directive("get_planet_mass", "Earth"));
    }

    #[test]
    fn test_first_action_wins() {
        let text = "Action: calculate: 1 + 1\n\
                    Action: get_planet_mass: Mars\n\
                    PAUSE";
        assert_eq!(classify(text), directive("calculate", "1 + 1"));
    }

    #[test]
    fn test_action_is_case_insensitive() {
        let text = "action: Get_Planet_Mass: Saturn\nPAUSE\nAction";
        assert_eq!(classify(text), directive("Get_Planet_Mass", "Saturn"));
    }

    #[test]
    fn test_argument_is_rest_of_line() {
        let text = "Action: calculate: (5.972e24 + 5.683e26) * 2\nPAUSE";
        assert_eq!(
            classify(text),
            directive("calculate", "(5.972e24 + 5.683e26) * 2")
        );
    }

    #[test]
    fn test_malformed_action() {
        let text = "Thought: Let me compute.\nAction: calculate 2+2\nPAUSE";
        assert_eq!(classify(text), Step::MalformedAction);

        // Digits are not part of a tool name.
        let text = "Action: tool2: x\nPAUSE";
        assert_eq!(classify(text), Step::MalformedAction);
    }

    #[test]
    fn test_markers_are_case_sensitive() {
        // Lowercase `pause` doesn't make a tool-call step.
        let text = "Action: calculate: 2+2\npause";
        assert_eq!(classify(text), Step::Unrecognized);
    }

    #[test]
    fn test_pause_without_action_marker() {
        assert_eq!(classify("Thought: hmm\nPAUSE"), Step::Unrecognized);
    }

    #[test]
    fn test_classify_answer() {
        let text = "Thought: I have everything.\n\
                    Answer: The total is 1.1494e27 kg.";
        assert_eq!(
            classify(text),
            Step::Answer("The total is 1.1494e27 kg.".to_owned())
        );
    }

    #[test]
    fn test_answer_without_label() {
        let text = "  The Answer is 42.  ";
        assert_eq!(classify(text), Step::Answer("The Answer is 42.".to_owned()));
    }

    #[test]
    fn test_action_takes_precedence_over_answer() {
        let text = "Answer: not yet\nAction: calculate: 2*3\nPAUSE";
        assert_eq!(classify(text), directive("calculate", "2*3"));
    }

    #[test]
    fn test_unrecognized() {
        assert_eq!(classify("I am thinking about it."), Step::Unrecognized);
        assert_eq!(classify(""), Step::Unrecognized);
    }

    #[test]
    fn test_observation() {
        assert_eq!(observation("5.972e24"), "Observation: 5.972e24");
        assert_eq!(observation(String::from("4")), "Observation: 4");
    }
}
