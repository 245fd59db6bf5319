//! Terminal front end for a practice session.

use std::io::{self, BufRead, Write};

use services::{PracticeError, PracticeService, QuestionView, SessionResults};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Practice(#[from] PracticeError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Choice(usize),
    Next,
    Shuffle,
    Quit,
    Unknown,
}

fn parse_input(line: &str, option_count: usize) -> Input {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "" | "next" => return Input::Next,
        "shuffle" => return Input::Shuffle,
        "quit" => return Input::Quit,
        _ => {}
    }

    let mut chars = line.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => {
            let index = usize::from(c.to_ascii_uppercase() as u8 - b'A');
            if index < option_count {
                Input::Choice(index)
            } else {
                Input::Unknown
            }
        }
        _ => Input::Unknown,
    }
}

fn render_question(view: &QuestionView, out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "[{}/{}] {}", view.position, view.total, view.prompt)?;
    for option in &view.options {
        let mark = match option.correct {
            Some(true) => "  ✓",
            Some(false) if option.chosen => "  ✗",
            _ => "",
        };
        writeln!(out, "  {}) {}{mark}", option.letter, option.text)?;
    }

    if let Some(feedback) = &view.feedback {
        if feedback.is_correct {
            writeln!(out, "Correct!")?;
        } else {
            writeln!(out, "Wrong. Correct answer: {}", feedback.correct_text)?;
        }
        if let Some(explanation) = &feedback.explanation {
            writeln!(out, "  {explanation}")?;
        }
    }
    writeln!(
        out,
        "Correct so far: {}   Time: {}",
        view.correct_so_far, view.elapsed
    )
}

fn render_results(results: &SessionResults, out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "Score: {}% ({}/{} correct, {} answered)",
        results.percent,
        results.score.correct(),
        results.score.total(),
        results.score.answered()
    )?;
    writeln!(out, "Time: {}", results.elapsed)
}

fn prompt_line(view: &QuestionView) -> String {
    let last = view.options.last().map_or('A', |o| o.letter);
    let next = if view.is_last { "" } else { ", enter = next" };
    format!("answer [A-{last}]{next}, shuffle, quit > ")
}

/// Drive the active session from `input` until it completes or the user quits.
///
/// End of input counts as quitting. The session is finished either way and its
/// results are returned.
///
/// # Errors
///
/// Returns `PromptError` for terminal I/O failures or session errors.
pub fn run_session(
    practice: &mut PracticeService,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<SessionResults, PromptError> {
    let mut view = practice.view()?;
    render_question(&view, out)?;

    while !view.is_complete {
        write!(out, "{}", prompt_line(&view))?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        match parse_input(&line, view.options.len()) {
            Input::Choice(index) => {
                view = practice.answer(index)?;
            }
            Input::Next if view.is_last => {
                writeln!(out, "This is the last question.")?;
                continue;
            }
            Input::Next => {
                view = practice.advance()?;
            }
            Input::Shuffle => {
                view = practice.reshuffle_options()?;
            }
            Input::Quit => break,
            Input::Unknown => {
                writeln!(out, "Unrecognized input.")?;
                continue;
            }
        }
        render_question(&view, out)?;
    }

    let results = practice.finish()?;
    render_results(&results, out)?;
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::bank::Bank;
    use quiz_core::model::{Question, QuestionDraft, QuizSet, SetId};
    use quiz_core::random::ScriptedRandom;
    use quiz_core::session::SessionError;
    use quiz_core::time::fixed_now;
    use services::Clock;

    fn started_service(prompts: &[&str]) -> PracticeService {
        let mut bank = Bank::new();
        let set_id =
            bank.add_set(QuizSet::new(SetId::generate(), "Set", None, fixed_now()).unwrap());
        for prompt in prompts {
            let question = Question::create(
                QuestionDraft::new(*prompt, ["uno", "due", "tre"], 1),
                fixed_now(),
            )
            .unwrap();
            bank.add_question(set_id, question).unwrap();
        }

        let mut practice = PracticeService::new(Clock::fixed(fixed_now()))
            .with_random(ScriptedRandom::identity());
        practice.start(&bank).unwrap();
        practice
    }

    fn run(practice: &mut PracticeService, input: &str) -> (SessionResults, String) {
        let mut out = Vec::new();
        let results = run_session(practice, &mut input.as_bytes(), &mut out).unwrap();
        (results, String::from_utf8(out).unwrap())
    }

    #[test]
    fn parses_letters_and_commands() {
        assert_eq!(parse_input("b\n", 3), Input::Choice(1));
        assert_eq!(parse_input("C", 3), Input::Choice(2));
        assert_eq!(parse_input("d", 3), Input::Unknown);
        assert_eq!(parse_input("\n", 3), Input::Next);
        assert_eq!(parse_input("Shuffle", 3), Input::Shuffle);
        assert_eq!(parse_input("quit", 3), Input::Quit);
        assert_eq!(parse_input("7", 3), Input::Unknown);
    }

    #[test]
    fn answers_every_question_and_scores() {
        let mut practice = started_service(&["Q1", "Q2"]);
        let (results, output) = run(&mut practice, "b\n\na\n");

        assert_eq!(results.score.correct(), 1);
        assert_eq!(results.percent, 50);
        assert!(output.contains("[1/2] Q1"));
        assert!(output.contains("[2/2] Q2"));
        assert!(output.contains("Wrong. Correct answer: due"));
        assert!(output.contains("Score: 50% (1/2 correct, 2 answered)"));
    }

    #[test]
    fn end_of_input_finishes_early() {
        let mut practice = started_service(&["Q1", "Q2", "Q3"]);
        let (results, _) = run(&mut practice, "b\n");
        assert_eq!(results.score.answered(), 1);
        assert_eq!(results.percent, 33);
    }

    #[test]
    fn shuffle_redisplays_options() {
        let mut practice = started_service(&["Q1"]);
        let (results, output) = run(&mut practice, "shuffle\nquit\n");
        assert_eq!(results.score.answered(), 0);
        assert_eq!(output.matches("[1/1] Q1").count(), 2);
    }

    #[test]
    fn missing_session_surfaces_the_practice_error() {
        let mut practice = PracticeService::new(Clock::fixed(fixed_now()));
        let err = run_session(&mut practice, &mut "".as_bytes(), &mut Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            PromptError::Practice(PracticeError::Session(SessionError::NoActiveSession))
        ));
        assert_eq!(
            err.to_string(),
            PracticeError::from(SessionError::NoActiveSession).to_string()
        );
    }
}
