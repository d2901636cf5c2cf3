//! Text appended to a transcript by the survey flow.

/// Transcript content of a freshly signed-in identity.
pub const TRANSCRIPT_SEED: &str = "Input: ";

/// Phrase that opens the survey (compared case-insensitively).
pub const START_PHRASE: &str = "start survey";

/// Asked once the start phrase has been accepted.
pub const NAME_PROMPT: &str =
    "Output:\n  Starting the survey\n  type: text\n  value: What is your name?\nInput:";

pub const GENDER_PROMPT: &str =
    "Output:\n  type: radio\n  value: what is your gender?\n  options: [Male, Female]\nInput:";

pub const HOBBIES_PROMPT: &str = "Output:\n  type: checkbox\n  value: what are your hobbies?\n  options: [Fishing, Cooking, Swimming]\nInput:";

/// Shown when the first input is not the start phrase.
pub const START_REPROMPT: &str = "Please enter \"start survey\" to start the survey.\nInput:";

/// Prefix of the re-prompt for a rejected multiple-choice answer.
pub const CHOICE_REPROMPT: &str = "Please enter from one of the choices.\n";

/// Final line of a completed survey.
pub fn summary(gender: &str, name: &str, hobbies: &str) -> String {
    format!("Output:\nA {} {} who likes {}.", gender, name, hobbies)
}

/// Formats one transcript entry: the echoed input followed by the reply.
pub fn entry(input: &str, reply: &str) -> String {
    format!("\n{}\n{}", input, reply)
}
