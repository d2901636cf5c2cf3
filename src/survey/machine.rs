//! Survey state machine.
//!
//! # Flow
//! ```text
//! AwaitingStart ──"start survey"──▶ AwaitingName ──any──▶ AwaitingGender
//!       ▲   │                                              │   ▲
//!       └───┘ rollback                          male/female│   │ rollback
//!                                                          ▼   │
//!                     Finished ◀──valid hobbies── AwaitingHobbies
//!                                                      ▲   │
//!                                                      └───┘ rollback
//! ```
//!
//! A transition is computed from the current step and one decoded input and
//! never touches the identity directly; applying it is the caller's job.
//! Rollback re-asks the question that led to the current step, so a rejected
//! gender shows the gender prompt again, prefixed by the choice re-prompt.

use std::fmt;

use crate::survey::prompts::{
    self, CHOICE_REPROMPT, GENDER_PROMPT, HOBBIES_PROMPT, NAME_PROMPT, START_PHRASE,
    START_REPROMPT,
};

/// Position in the survey, derived from the identity's step counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurveyStep {
    /// Step 1: waiting for the start phrase.
    AwaitingStart,
    /// Step 2: waiting for a name.
    AwaitingName,
    /// Step 3: waiting for a gender.
    AwaitingGender,
    /// Step 4: waiting for a comma-separated hobby list.
    AwaitingHobbies,
    /// Step 5 and above: the survey is over and input is ignored.
    Finished,
}

impl SurveyStep {
    /// Map a step counter onto a survey position.
    pub fn from_counter(step: u32) -> Self {
        match step {
            0 | 1 => SurveyStep::AwaitingStart,
            2 => SurveyStep::AwaitingName,
            3 => SurveyStep::AwaitingGender,
            4 => SurveyStep::AwaitingHobbies,
            _ => SurveyStep::Finished,
        }
    }

    /// The question shown to the user while at this step.
    pub fn prompt(self) -> Option<&'static str> {
        match self {
            SurveyStep::AwaitingName => Some(NAME_PROMPT),
            SurveyStep::AwaitingGender => Some(GENDER_PROMPT),
            SurveyStep::AwaitingHobbies => Some(HOBBIES_PROMPT),
            SurveyStep::AwaitingStart | SurveyStep::Finished => None,
        }
    }

    fn next(self) -> Self {
        match self {
            SurveyStep::AwaitingStart => SurveyStep::AwaitingName,
            SurveyStep::AwaitingName => SurveyStep::AwaitingGender,
            SurveyStep::AwaitingGender => SurveyStep::AwaitingHobbies,
            SurveyStep::AwaitingHobbies | SurveyStep::Finished => SurveyStep::Finished,
        }
    }
}

/// Accepted gender answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Case-insensitive match, no trimming.
    pub fn parse(input: &str) -> Option<Self> {
        match input.to_lowercase().as_str() {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            _ => None,
        }
    }
}

/// Accepted hobby answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hobby {
    Fishing,
    Cooking,
    Swimming,
}

impl Hobby {
    /// Case-insensitive match on a trimmed entry.
    pub fn parse(entry: &str) -> Option<Self> {
        match entry.trim().to_lowercase().as_str() {
            "fishing" => Some(Hobby::Fishing),
            "cooking" => Some(Hobby::Cooking),
            "swimming" => Some(Hobby::Swimming),
            _ => None,
        }
    }

    /// Parse a comma-separated list. Every entry must be a known hobby.
    pub fn parse_list(input: &str) -> Option<Vec<Self>> {
        input.split(',').map(Hobby::parse).collect()
    }
}

/// What a transition does to the step counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Input accepted; the counter moves forward by one.
    Advanced,
    /// Input rejected; the counter stays and the question is asked again.
    RolledBack,
    /// Survey already finished; nothing is recorded but the counter still moves.
    Ignored,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Advanced => "advanced",
            Outcome::RolledBack => "rolled_back",
            Outcome::Ignored => "ignored",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An answer to store on the identity, kept exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Name(String),
    Gender(String),
    Hobbies(String),
}

/// Result of feeding one input to the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub outcome: Outcome,
    pub answer: Option<Answer>,
    /// Text to append to the transcript, if any.
    pub transcript: Option<String>,
}

impl Transition {
    fn advance(input: &str, reply: &str, answer: Option<Answer>) -> Self {
        Self {
            outcome: Outcome::Advanced,
            answer,
            transcript: Some(prompts::entry(input, reply)),
        }
    }

    fn rollback(input: &str, reply: String) -> Self {
        Self {
            outcome: Outcome::RolledBack,
            answer: None,
            transcript: Some(prompts::entry(input, &reply)),
        }
    }

    fn ignored() -> Self {
        Self {
            outcome: Outcome::Ignored,
            answer: None,
            transcript: None,
        }
    }
}

/// Compute the transition for `input` at `step`.
///
/// `name` and `gender` are the answers recorded so far; they feed the
/// summary line once the hobbies are accepted.
pub fn transition(step: SurveyStep, input: &str, name: &str, gender: &str) -> Transition {
    let next_prompt = step.next().prompt().unwrap_or_default();

    match step {
        SurveyStep::AwaitingStart => {
            if input.to_lowercase() == START_PHRASE {
                Transition::advance(input, next_prompt, None)
            } else {
                Transition::rollback(input, START_REPROMPT.to_string())
            }
        }
        SurveyStep::AwaitingName => {
            Transition::advance(input, next_prompt, Some(Answer::Name(input.to_string())))
        }
        SurveyStep::AwaitingGender => match Gender::parse(input) {
            Some(_) => Transition::advance(input, next_prompt, Some(Answer::Gender(input.to_string()))),
            None => Transition::rollback(input, reprompt(step)),
        },
        SurveyStep::AwaitingHobbies => match Hobby::parse_list(input) {
            Some(_) => Transition::advance(
                input,
                &prompts::summary(gender, name, input),
                Some(Answer::Hobbies(input.to_string())),
            ),
            None => Transition::rollback(input, reprompt(step)),
        },
        SurveyStep::Finished => Transition::ignored(),
    }
}

fn reprompt(step: SurveyStep) -> String {
    format!("{}{}", CHOICE_REPROMPT, step.prompt().unwrap_or_default())
}
