//! Command implementations for the Survey Studio CLI.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing::{info, info_span};

use survey_compare::compare_surveys;
use survey_export::{build_export, save_export};
use survey_ingest::{
    extract_date_from_filename, extract_short_name, list_export_files, load_export, source_label,
};
use survey_master::{extract_master, load_master, master_to_questions, merge_masters, save_master};
use survey_model::{ComparisonResult, Question};
use survey_sections::{SectionNormalizer, load_section_aliases};

use crate::cli::{CompareArgs, MasterArgs, ReportArgs};

/// Label under which the master baseline appears as a comparison source.
pub const MASTER_SOURCE: &str = "master";

#[derive(Debug)]
pub struct MasterOutcome {
    pub output: PathBuf,
    pub export_count: usize,
    pub question_count: usize,
}

#[derive(Debug)]
pub struct ReportOutcome {
    pub data_path: PathBuf,
    pub results: Vec<ComparisonResult>,
}

/// Parse every export in the directory, oldest first.
fn parse_exports(exports_dir: &std::path::Path) -> Result<Vec<(String, Vec<Question>)>> {
    let files = list_export_files(exports_dir).context("list exports")?;
    if files.is_empty() {
        bail!("no JSON exports found in {}", exports_dir.display());
    }
    let mut parsed = Vec::with_capacity(files.len());
    for file in &files {
        let label = source_label(file);
        let questions =
            load_export(file).with_context(|| format!("parse export {}", file.display()))?;
        let date = file
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(extract_date_from_filename);
        info!(
            export = %label,
            date = ?date,
            questions = questions.len(),
            "parsed export"
        );
        parsed.push((label, questions));
    }
    Ok(parsed)
}

/// Merge all exports into the master file. Exports are applied oldest to
/// newest so the newest version of every question wins.
pub fn run_master(args: &MasterArgs) -> Result<MasterOutcome> {
    let span = info_span!("master", exports_dir = %args.exports_dir.display());
    let _guard = span.enter();
    let start = Instant::now();

    let parsed = parse_exports(&args.exports_dir)?;
    let export_count = parsed.len();
    let masters = parsed
        .iter()
        .map(|(_, questions)| extract_master(questions))
        .collect();
    let merged = merge_masters(masters);
    save_master(&merged, &args.output).context("save master")?;

    info!(
        question_count = merged.len(),
        export_count,
        duration_ms = start.elapsed().as_millis(),
        "master generated"
    );
    Ok(MasterOutcome {
        output: args.output.clone(),
        export_count,
        question_count: merged.len(),
    })
}

/// Compare every export against the master and write the report data
/// document.
pub fn run_report(args: &ReportArgs) -> Result<ReportOutcome> {
    let span = info_span!("report", exports_dir = %args.exports_dir.display());
    let _guard = span.enter();
    let start = Instant::now();

    let master = load_master(&args.master).with_context(|| {
        format!(
            "load master {} (run `survey-studio master` first)",
            args.master.display()
        )
    })?;
    let master_questions = master_to_questions(&master);
    info!(questions = master_questions.len(), "loaded master");

    let aliases = match &args.aliases {
        Some(path) => load_section_aliases(path).context("load section aliases")?,
        None => BTreeMap::new(),
    };

    let parsed = parse_exports(&args.exports_dir)?;

    let mut results = Vec::with_capacity(parsed.len());
    for (label, questions) in &parsed {
        let result = compare_surveys(
            &master_questions,
            questions,
            MASTER_SOURCE,
            label,
            args.threshold,
        );
        info!(
            export = %label,
            matched = result.matched().count(),
            added = result.added().count(),
            removed = result.removed().count(),
            "compared against master"
        );
        results.push(result);
    }

    let mut all_sources = Vec::with_capacity(parsed.len() + 1);
    all_sources.push((MASTER_SOURCE.to_string(), master_questions));
    all_sources.extend(parsed);

    let normalizer = SectionNormalizer::build(&all_sources, MASTER_SOURCE, &aliases);
    let sections = normalizer.ordered_sections(&all_sources);
    let short_names: BTreeMap<String, String> = all_sources
        .iter()
        .map(|(label, _)| (label.clone(), extract_short_name(label)))
        .collect();

    let document = build_export(&results, &all_sources, short_names, sections, MASTER_SOURCE);
    let data_path = args.output_dir.join("data.json");
    save_export(&document, &data_path).context("write report data")?;

    info!(
        data_path = %data_path.display(),
        comparisons = results.len(),
        duration_ms = start.elapsed().as_millis(),
        "report generated"
    );
    Ok(ReportOutcome { data_path, results })
}

/// Diff two exports directly.
pub fn run_compare(args: &CompareArgs) -> Result<ComparisonResult> {
    let questions_a = load_export(&args.export_a)
        .with_context(|| format!("parse export {}", args.export_a.display()))?;
    let questions_b = load_export(&args.export_b)
        .with_context(|| format!("parse export {}", args.export_b.display()))?;

    Ok(compare_surveys(
        &questions_a,
        &questions_b,
        &source_label(&args.export_a),
        &source_label(&args.export_b),
        args.threshold,
    ))
}
