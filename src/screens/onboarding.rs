// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Welcome screen and onboarding quiz.

use super::{Notice, Outcome};
use crate::navigation::Route;

/// Landing screen with "get started" and "log in" buttons.
pub struct WelcomeScreen;

impl WelcomeScreen {
    pub fn get_started() -> Outcome {
        Outcome::navigate(Route::QuizQuestion1)
    }

    pub fn log_in() -> Outcome {
        Outcome::navigate(Route::Login)
    }
}

/// A single-choice quiz question.
#[derive(Debug, Clone, Copy)]
pub struct QuizQuestion {
    pub prompt: &'static str,
    pub options: &'static [&'static str],
}

pub const QUESTION_1: QuizQuestion = QuizQuestion {
    prompt: "What brings you here today?",
    options: &[
        "Sleep better",
        "Reduce stress",
        "Understand my dreams",
        "Build a journaling habit",
    ],
};

/// Answer state for quiz question 1.
#[derive(Debug, Clone, Default)]
pub struct QuizForm {
    pub selected: Option<usize>,
}

impl QuizForm {
    pub fn question(&self) -> &'static QuizQuestion {
        &QUESTION_1
    }

    pub fn select(&mut self, option: usize) {
        if option < QUESTION_1.options.len() {
            self.selected = Some(option);
        }
    }

    /// The chosen answer's label, if any.
    pub fn answer(&self) -> Option<&'static str> {
        self.selected.and_then(|i| QUESTION_1.options.get(i).copied())
    }

    pub fn submit(&self) -> Outcome {
        match self.answer() {
            Some(_) => Outcome::navigate(Route::Login),
            None => Outcome::Stay(Notice::new(
                "Choose an answer",
                "Please select an option to continue.",
            )),
        }
    }
}
