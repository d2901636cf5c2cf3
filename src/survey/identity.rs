//! Per-username survey record.

use crate::survey::machine::{transition, Answer, Outcome, SurveyStep};
use crate::survey::prompts::TRANSCRIPT_SEED;

/// Survey progress for one username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Step counter, starting at 1. Climbs past 4 once the survey is finished.
    pub step: u32,
    /// Append-only log of inputs and replies, rendered verbatim.
    pub transcript: String,
    pub name: String,
    pub gender: String,
    pub hobbies: String,
}

impl Identity {
    /// A fresh identity at step 1 with the seeded transcript.
    pub fn new() -> Self {
        Self {
            step: 1,
            transcript: TRANSCRIPT_SEED.to_string(),
            name: String::new(),
            gender: String::new(),
            hobbies: String::new(),
        }
    }

    /// Current survey position.
    pub fn survey_step(&self) -> SurveyStep {
        SurveyStep::from_counter(self.step)
    }

    /// Feed one decoded input through the survey and apply the result.
    pub fn submit(&mut self, input: &str) -> Outcome {
        let result = transition(self.survey_step(), input, &self.name, &self.gender);

        if let Some(text) = &result.transcript {
            self.transcript.push_str(text);
        }

        match result.answer {
            Some(Answer::Name(name)) => self.name = name,
            Some(Answer::Gender(gender)) => self.gender = gender,
            Some(Answer::Hobbies(hobbies)) => self.hobbies = hobbies,
            None => {}
        }

        match result.outcome {
            Outcome::Advanced | Outcome::Ignored => self.step = self.step.saturating_add(1),
            Outcome::RolledBack => {}
        }

        result.outcome
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::new()
    }
}
