//! Subcommand handlers. Each one writes its user-facing output to `out`.

use std::error::Error;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use quiz_core::bank::Bank;
use quiz_core::model::{QuestionDraft, SetId, TagName, canonical_set_name};
use quiz_core::random::SeededRandom;
use quiz_core::reconcile::ReconcileReport;
use services::{AppServices, Clock, PracticeService};
use tracing::info;

use crate::ArgsError;
use crate::practice::run_session;

pub type CommandResult = Result<(), Box<dyn Error>>;

const DEMO_BANK: &str = include_str!("../seed/demo_bank.json");

/// Look a set up by id, then by its exact name, then by its canonical name.
///
/// Imported sets keep their names as written, so the exact match comes first.
pub fn resolve_set(bank: &Bank, raw: &str) -> Result<SetId, ArgsError> {
    let by_id = raw
        .trim()
        .parse::<SetId>()
        .ok()
        .and_then(|id| bank.set(id));
    by_id
        .or_else(|| bank.set_by_name(raw.trim()))
        .or_else(|| bank.set_by_name(&canonical_set_name(raw)))
        .map(|set| set.id())
        .ok_or_else(|| ArgsError::UnknownSet {
            raw: raw.to_string(),
        })
}

pub fn list_sets(bank: &Bank, out: &mut impl Write) -> CommandResult {
    if bank.is_empty() {
        writeln!(out, "No sets yet. Try `quiz seed` or `quiz add-set <name>`.")?;
        return Ok(());
    }
    for set in bank.sets() {
        writeln!(
            out,
            "{}  ({} questions)  {}",
            set.name(),
            set.question_count(),
            set.id()
        )?;
        if let Some(description) = set.description() {
            writeln!(out, "    {description}")?;
        }
    }
    Ok(())
}

pub fn list_tags(bank: &Bank, out: &mut impl Write) -> CommandResult {
    let catalog = bank.tag_catalog();
    if catalog.is_empty() {
        writeln!(out, "No tags.")?;
    }
    for tag in catalog {
        writeln!(out, "{tag}")?;
    }
    Ok(())
}

pub async fn add_set(
    services: &mut AppServices,
    name: &str,
    description: Option<String>,
    out: &mut impl Write,
) -> CommandResult {
    let set_id = services.bank_mut().create_set(name, description).await?;
    if let Some(set) = services.bank().bank().set(set_id) {
        writeln!(out, "Created set {} ({set_id})", set.name())?;
    }
    Ok(())
}

pub struct NewQuestion {
    pub set: String,
    pub prompt: String,
    pub options: Vec<String>,
    /// 1-based.
    pub correct: usize,
    pub explanation: Option<String>,
    pub tags: String,
}

pub async fn add_question(
    services: &mut AppServices,
    question: NewQuestion,
    out: &mut impl Write,
) -> CommandResult {
    let set_id = resolve_set(services.bank().bank(), &question.set)?;
    let correct_index = question
        .correct
        .checked_sub(1)
        .ok_or(ArgsError::InvalidCorrect {
            raw: question.correct,
        })?;

    let mut draft = QuestionDraft::new(question.prompt, question.options, correct_index)
        .with_tags(question.tags);
    if let Some(explanation) = question.explanation {
        draft = draft.with_explanation(explanation);
    }

    let question_id = services.bank_mut().add_question(set_id, draft).await?;
    writeln!(out, "Added question {question_id}")?;
    Ok(())
}

pub async fn remove_set(services: &mut AppServices, raw: &str, out: &mut impl Write) -> CommandResult {
    let set_id = resolve_set(services.bank().bank(), raw)?;
    services.bank_mut().remove_set(set_id).await?;
    writeln!(out, "Removed set {set_id}")?;
    Ok(())
}

pub fn export(services: &AppServices, path: Option<PathBuf>, out: &mut impl Write) -> CommandResult {
    let document = services.bank().export_document()?;
    let path = path.unwrap_or_else(|| PathBuf::from(&document.file_name));
    std::fs::write(&path, document.contents)?;
    info!(path = %path.display(), "exported bank");
    writeln!(out, "Exported bank to {}", path.display())?;
    Ok(())
}

pub async fn import(services: &mut AppServices, path: &Path, out: &mut impl Write) -> CommandResult {
    let text = std::fs::read_to_string(path)?;
    let report = services.bank_mut().import_document(&text).await?;
    write_report(&report, out)
}

/// Merge the bundled demo sets. Running it twice adds nothing the second time.
pub async fn seed(services: &mut AppServices, out: &mut impl Write) -> CommandResult {
    let report = services.bank_mut().import_document(DEMO_BANK).await?;
    write_report(&report, out)
}

pub async fn reset(services: &mut AppServices, yes: bool, out: &mut impl Write) -> CommandResult {
    if !yes {
        return Err(ArgsError::ResetNotConfirmed.into());
    }
    services.bank_mut().reset().await?;
    writeln!(out, "Bank cleared.")?;
    Ok(())
}

pub struct PracticeOptions {
    pub sets: Vec<String>,
    pub tags: Vec<String>,
    pub count: usize,
    pub seed: Option<u64>,
}

pub fn practice(
    services: &mut AppServices,
    clock: Clock,
    options: PracticeOptions,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> CommandResult {
    let mut practice = PracticeService::new(clock);
    if let Some(seed) = options.seed {
        practice = practice.with_random(SeededRandom::new(seed));
    }
    *services.practice_mut() = practice;

    let (bank_service, practice) = services.split_mut();
    let bank = bank_service.bank();

    if !options.sets.is_empty() {
        let ids = options
            .sets
            .iter()
            .map(|raw| resolve_set(bank, raw))
            .collect::<Result<Vec<_>, _>>()?;
        practice.select_sets(ids);
    }
    for raw in &options.tags {
        practice.toggle_tag(TagName::new(raw.as_str())?);
    }
    practice.set_requested_count(options.count)?;

    writeln!(
        out,
        "{} questions available, drawing up to {}.",
        practice.available_count(bank),
        practice.requested_count()
    )?;
    practice.start(bank)?;
    run_session(practice, input, out)?;
    Ok(())
}

fn write_report(report: &ReconcileReport, out: &mut impl Write) -> CommandResult {
    if report.is_noop() {
        writeln!(out, "Nothing new to import.")?;
        return Ok(());
    }
    writeln!(
        out,
        "Imported: {} sets added, {} merged, {} questions added, {} duplicates skipped.",
        report.sets_added, report.sets_merged, report.questions_added, report.duplicates_skipped
    )?;
    Ok(())
}
