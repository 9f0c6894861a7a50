use std::fs;
use std::path::Path;
use std::time::Instant;

use chrono::NaiveDate;
use rayon::prelude::*;

use lf_compiler::{loader, GeneratorError, LogFacade, Pipeline, RunLog, RunSummary, TargetFailure};

use crate::config::GeneratorConfig;

/// One full run: load once, fan out over enabled targets, then the domain list.
///
/// Returns `Err` only for run-level failures (configuration, source, validation).
/// Per-target write failures land in the summary.
pub fn run(config: &GeneratorConfig, date: NaiveDate) -> Result<RunSummary, GeneratorError> {
    config.validate()?;
    let targets = config.targets()?;
    let header = config.header();

    let loader_log = LogFacade::new("listforge::loader");
    let rules = loader::load(&config.source_file, &loader_log)?;

    let outcomes: Vec<_> = targets
        .par_iter()
        .map(|(name, profile)| {
            let log = LogFacade::new(format!("listforge::{name}"));
            log.info(&format!("Generating {} list...", profile.extension_name));
            let pipeline = Pipeline::new(&header, &log);
            let outcome = pipeline.generate_list(&rules, profile, &config.output_path(name), date);
            if let Err(e) = &outcome {
                log.error(&e.to_string());
            }
            (name.as_str(), outcome)
        })
        .collect();

    let mut summary = RunSummary::default();
    for (name, outcome) in outcomes {
        match outcome {
            Err(e) if e.aborts_run() => return Err(e),
            outcome => summary.record(name, outcome),
        }
    }

    if config.generate_domain_list {
        let log = LogFacade::new("listforge::domains");
        let pipeline = Pipeline::new(&header, &log);
        let outcome = pipeline.generate_domain_list(&rules, &config.domain_list_path(), date);
        if let Err(e) = &outcome {
            log.error(&e.to_string());
        }
        summary.record("domains", outcome);
    }

    Ok(summary)
}

pub fn cmd_generate(
    config: &GeneratorConfig,
    date: NaiveDate,
    summary_json: Option<&Path>,
) -> Result<(), String> {
    let start = Instant::now();

    let summary = match run(config, date) {
        Ok(summary) => summary,
        Err(e) => {
            let mut summary = RunSummary::default();
            summary.failures.push(TargetFailure::new("run", &e));
            print!("{}", summary.render());
            return Err(format!("{} ({})", e, e.code()));
        }
    };
    print!("{}", summary.render());
    println!("Time: {:.1}ms", start.elapsed().as_secs_f64() * 1000.0);

    if let Some(path) = summary_json {
        let json = serde_json::to_string_pretty(&summary)
            .map_err(|e| format!("Failed to serialize summary: {}", e))?;
        fs::write(path, json)
            .map_err(|e| format!("Failed to write '{}': {}", path.display(), e))?;
    }

    if summary.has_fatal() {
        return Err(format!("{} output(s) failed", summary.failures.len()));
    }
    Ok(())
}
