//! ListForge CLI
//!
//! Generates per-blocker filter lists and a domain list from one rule source.

mod config;
mod generate;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use lf_compiler::loader;
use lf_compiler::presets::builtin_profiles;
use lf_core::modifiers::{has_rule_modifier, modifier_usage};
use lf_core::{classify, extract_domains, DomainOptions, RuleStatistics};

use crate::config::{GeneratorConfig, DEFAULT_CONFIG_FILE};

#[derive(Parser)]
#[command(name = "listforge")]
#[command(about = "Multi-target adblock filter list generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate every enabled list and the domain list
    Generate {
        /// JSON configuration file (listforge.json is used when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Rule source, overriding the configuration
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Output directory, overriding the configuration
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Homepage for generated headers, overriding the configuration
        #[arg(long)]
        homepage: Option<String>,

        /// Only generate these targets (repeatable)
        #[arg(long)]
        only: Vec<String>,

        /// Skip the domain list
        #[arg(long)]
        no_domains: bool,

        /// Also write the run summary as JSON
        #[arg(long)]
        summary_json: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Check a rule file without generating anything
    Validate {
        /// Rule file to validate (`-` for stdin)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Count rules per category and option usage
    Classify {
        /// Rule file to inspect (`-` for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Also print every rule with its category
        #[arg(long)]
        rules: bool,
    },

    /// Print the domains a rule file blocks
    Domains {
        /// Rule file to scan (`-` for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Keep wildcard entries
        #[arg(long)]
        include_wildcards: bool,

        /// Skip `@@` exception rules
        #[arg(long)]
        exclude_exceptions: bool,

        /// Print a JSON array instead of one domain per line
        #[arg(long)]
        json: bool,
    },

    /// Print the built-in target profiles as JSON
    Profiles,
}

fn main() {
    let cli = Cli::parse();

    let verbose = matches!(cli.command, Commands::Generate { verbose: true, .. });
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if verbose { "debug" } else { "info" }),
    )
    .init();

    let result = match cli.command {
        Commands::Generate {
            config,
            source,
            output_dir,
            homepage,
            only,
            no_domains,
            summary_json,
            verbose: _,
        } => {
            let overrides = Overrides {
                source,
                output_dir,
                homepage,
                only,
                no_domains,
            };
            cmd_generate(config.as_deref(), overrides, summary_json.as_deref())
        }
        Commands::Validate { input } => cmd_validate(&input),
        Commands::Classify { input, rules } => cmd_classify(&input, rules),
        Commands::Domains {
            input,
            include_wildcards,
            exclude_exceptions,
            json,
        } => cmd_domains(&input, include_wildcards, exclude_exceptions, json),
        Commands::Profiles => cmd_profiles(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// `generate` flags that override the configuration file.
struct Overrides {
    source: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    homepage: Option<String>,
    only: Vec<String>,
    no_domains: bool,
}

impl Overrides {
    fn apply(self, config: &mut GeneratorConfig) {
        if let Some(source) = self.source {
            config.source_file = source;
        }
        if let Some(output_dir) = self.output_dir {
            config.output_dir = output_dir;
        }
        if let Some(homepage) = self.homepage {
            config.homepage = homepage;
        }
        if self.no_domains {
            config.generate_domain_list = false;
        }
        config.restrict_to(&self.only);
    }
}

/// An explicit `--config` must exist; the default file may be absent.
fn load_config(path: Option<&Path>) -> Result<GeneratorConfig, String> {
    let loaded = match path {
        Some(path) => GeneratorConfig::load(path),
        None => GeneratorConfig::load_or_default(Path::new(DEFAULT_CONFIG_FILE)),
    };
    loaded.map_err(|e| e.to_string())
}

fn cmd_generate(
    config_path: Option<&Path>,
    overrides: Overrides,
    summary_json: Option<&Path>,
) -> Result<(), String> {
    let mut config = load_config(config_path)?;
    overrides.apply(&mut config);

    let today = chrono::Local::now().date_naive();
    generate::cmd_generate(&config, today, summary_json)
}

fn read_rules(input: &Path) -> Result<loader::ValidationResult, String> {
    if input == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| format!("Failed to read stdin: {}", e))?;
        return Ok(loader::load_text(&text));
    }
    let bytes = fs::read(input)
        .map_err(|e| format!("Failed to read '{}': {}", input.display(), e))?;
    Ok(loader::load_bytes(&bytes))
}

fn cmd_validate(input: &Path) -> Result<(), String> {
    let result = read_rules(input)?;

    println!("Rules:    {}", result.valid_rules.len());
    println!("Warnings: {}", result.warnings.len());
    for warning in &result.warnings {
        println!("  {warning}");
    }
    println!("Errors:   {}", result.errors.len());
    for error in &result.errors {
        println!("  {error}");
    }

    if !result.is_ok() {
        return Err(format!("'{}' failed validation", input.display()));
    }
    println!("'{}' is valid", input.display());
    Ok(())
}

fn cmd_classify(input: &Path, list_rules: bool) -> Result<(), String> {
    let result = read_rules(input)?;
    let stats = RuleStatistics::from_rules(&result.valid_rules);

    if list_rules {
        for rule in &result.valid_rules {
            println!("{:<15} {}", classify(rule).as_str(), rule);
        }
        println!();
    }

    println!("Rule file: {}", input.display());
    println!("  Total:           {}", stats.total);
    println!("  Comments:        {}", stats.comments);
    println!("  Network filters: {}", stats.network_filters);
    println!("  Exceptions:      {}", stats.exceptions);
    println!("  Element hiding:  {}", stats.element_hiding);
    println!("  Other:           {}", stats.other);

    let badfilters = result
        .valid_rules
        .iter()
        .filter(|rule| has_rule_modifier(rule, "badfilter"))
        .count();
    println!("  Badfilter:       {}", badfilters);

    let usage = modifier_usage(&result.valid_rules);
    if !usage.options.is_empty() {
        println!();
        println!("Options:");
        for (name, counts) in &usage.options {
            println!(
                "  {:<20} {:>6} (negated {}, with value {})",
                name, counts.count, counts.negated, counts.with_value
            );
        }
    }
    if usage.malformed > 0 {
        println!("  Malformed option lists: {}", usage.malformed);
    }
    Ok(())
}

fn cmd_domains(
    input: &Path,
    include_wildcards: bool,
    exclude_exceptions: bool,
    json: bool,
) -> Result<(), String> {
    let result = read_rules(input)?;
    let options = DomainOptions {
        exclude_wildcards: !include_wildcards,
        exclude_exceptions,
    };
    let domains = extract_domains(&result.valid_rules, &options);

    if json {
        let out = serde_json::to_string_pretty(&domains)
            .map_err(|e| format!("Failed to serialize JSON: {}", e))?;
        println!("{out}");
    } else {
        for domain in &domains {
            println!("{domain}");
        }
    }
    Ok(())
}

fn cmd_profiles() -> Result<(), String> {
    let out = serde_json::to_string_pretty(&builtin_profiles())
        .map_err(|e| format!("Failed to serialize JSON: {}", e))?;
    println!("{out}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn generate_flags_parse() {
        let cli = Cli::try_parse_from([
            "listforge",
            "generate",
            "--only",
            "adguard",
            "--only",
            "ublock_origin",
            "--no-domains",
            "--homepage",
            "https://example.com",
            "-v",
        ])
        .expect("parse");
        match cli.command {
            Commands::Generate {
                config,
                homepage,
                only,
                no_domains,
                verbose,
                ..
            } => {
                assert_eq!(config, None);
                assert_eq!(homepage.as_deref(), Some("https://example.com"));
                assert_eq!(only, ["adguard", "ublock_origin"]);
                assert!(no_domains);
                assert!(verbose);
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn domains_command_reads_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("rules.txt");
        std::fs::write(&input, "||ads.example.com^\n||*.cdn.example^\n").expect("write");
        cmd_domains(&input, false, false, true).expect("domains");
        cmd_validate(&input).expect("valid");
        cmd_classify(&input, true).expect("classify");
    }

    #[test]
    fn explicit_config_must_exist() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load_config(Some(&dir.path().join("typo.json"))).expect_err("missing");
        assert!(err.contains("not found"), "{err}");
    }

    #[test]
    fn overrides_make_defaults_usable() {
        let mut config = GeneratorConfig::default();
        assert!(config.validate().is_err());

        Overrides {
            source: Some(PathBuf::from("rules.txt")),
            output_dir: Some(PathBuf::from("out")),
            homepage: Some("https://example.com".to_string()),
            only: vec!["adguard".to_string()],
            no_domains: true,
        }
        .apply(&mut config);

        config.validate().expect("valid after overrides");
        assert_eq!(config.source_file, PathBuf::from("rules.txt"));
        assert!(!config.generate_domain_list);
        assert_eq!(config.targets().expect("targets").len(), 1);
    }
}
