use std::path::Path;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use owo_colors::OwoColorize;

use remend::cli::{Cli, Commands, ConfigFormat, OutputFormat};
use remend::config::{self, ResolvedConfig};
use remend::pipeline::{FixOutcome, Pipeline, PipelineReport, PipelineState};
use remend::report::{self, CleanupReport};
use remend::scanner::usage::ScanOptions;
use remend::validate::ServeValidator;
use remend::vcs;
use remend::watch::{watch, WatchConfig};
use remend::{analyzer, organize, AnalysisResult, DependencyStatus};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "error:".red().bold(), e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run(cli: Cli) -> Result<()> {
    if let Some(command) = &cli.command {
        return handle_command(command);
    }

    let path = cli.path.canonicalize().unwrap_or_else(|_| cli.path.clone());

    if !path.exists() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    if cli.watch {
        if cli.fix {
            anyhow::bail!("--fix cannot be combined with --watch");
        }
        return run_watch_mode(&cli, &path);
    }

    run_once(&cli, &path)
}

fn load_resolved(cli: &Cli, path: &Path) -> Result<ResolvedConfig> {
    let mut resolved = config::load_config(path, cli.config.as_deref())?;

    if let Some(ref command) = cli.serve_command {
        resolved.config.serve_command = command.clone();
    }
    if let Some(grace) = cli.grace_secs {
        resolved.config.grace_secs = grace;
    }
    if let Some(ref prefix) = cli.branch_prefix {
        resolved.config.branch_prefix = prefix.clone();
    }

    Ok(resolved)
}

fn run_once(cli: &Cli, path: &Path) -> Result<()> {
    let start = Instant::now();

    if matches!(cli.format, OutputFormat::Pretty) && !cli.watch {
        println!(
            "{} {} - Analyzing project...\n",
            "Remend".green().bold(),
            format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
        );
    }

    let resolved = load_resolved(cli, path)?;

    let options = ScanOptions {
        progress: matches!(cli.format, OutputFormat::Pretty) && !cli.watch,
    };
    let analysis = analyzer::analyze_dependencies(&resolved, options)?;

    let pipeline_report = if cli.fix && !analysis.unused.is_empty() {
        Some(run_fix_pipeline(&resolved, &analysis)?)
    } else {
        None
    };

    if !cli.no_report && !analysis.is_skipped() {
        let cleanup = CleanupReport::from_analysis(&resolved, &analysis);
        report::write_report(&resolved.root, &resolved.config.report_file, &cleanup)?;
    }

    let duration = start.elapsed();

    match cli.format {
        OutputFormat::Pretty => print_pretty(&analysis, pipeline_report.as_ref(), duration, cli),
        OutputFormat::Json => print_json(&analysis, pipeline_report.as_ref(), duration)?,
        OutputFormat::Compact => print_compact(&analysis, pipeline_report.as_ref()),
    }

    if cli.no_exit_code || cli.watch {
        return Ok(());
    }

    if !analysis.unused.is_empty() && !cli.fix {
        std::process::exit(1);
    }

    Ok(())
}

fn run_fix_pipeline(
    resolved: &ResolvedConfig,
    analysis: &AnalysisResult,
) -> Result<PipelineReport> {
    let base = resolved.config.base_branch();
    vcs::ensure_base(&resolved.root, &base)?;

    let validator = ServeValidator::from_config(&resolved.config);
    let pipeline = Pipeline::new(&resolved.root, &resolved.config.branch_prefix, &validator);

    pipeline.run(&analysis.fix_queue(), PipelineState::new(&base))
}

fn run_watch_mode(cli: &Cli, path: &Path) -> Result<()> {
    println!(
        "{} {} - Watch mode enabled\n",
        "Remend".green().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("{} Watching for changes...\n", "👀".cyan());

    let resolved = load_resolved(cli, path)?;
    let watch_config = WatchConfig::with_extensions(&resolved.config.source_extensions);

    let cli_clone = cli.clone();
    let path_clone = path.to_path_buf();

    watch(path, watch_config, move |changed_files| {
        if !changed_files.is_empty() {
            println!("\n{} Files changed:", "🔄".yellow());
            for file in changed_files.iter().take(5) {
                println!("   {}", file.display().dimmed());
            }
            if changed_files.len() > 5 {
                println!("   ... and {} more", changed_files.len() - 5);
            }
            println!();
        }

        print!("\x1B[2J\x1B[1;1H");

        println!(
            "{} {} - Watch mode\n",
            "Remend".green().bold(),
            format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
        );

        if let Err(e) = run_once(&cli_clone, &path_clone) {
            eprintln!("{} {}", "error:".red().bold(), e);
        }

        println!("\n{} Watching for changes...", "👀".cyan());

        Ok(())
    })?;

    Ok(())
}

fn handle_command(command: &Commands) -> Result<()> {
    match command {
        Commands::Init { format } => {
            let filename = match format {
                ConfigFormat::Json => "remend.json",
                ConfigFormat::Jsonc => "remend.jsonc",
            };

            let path = Path::new(filename);
            if path.exists() {
                anyhow::bail!("Config file already exists: {}", filename);
            }

            println!("Generating default configuration...");

            let config = config::generate_default_config();
            let content = serde_json::to_string_pretty(&config)?;

            std::fs::write(path, content)?;
            println!("{} Created {}", "✓".green(), filename.green());
            Ok(())
        }
        Commands::Organize { path } => {
            let resolved = config::load_config(path, None)?;
            let result = organize::organize_files(&resolved.root, &resolved.config)?;

            for (file, category) in &result.moved {
                let name = file
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| file.display().to_string());
                println!("Moved {} to {}/", name, category.green());
            }
            for file in &result.failed {
                eprintln!("{} could not move {}", "warn:".yellow(), file.display());
            }

            println!(
                "{} {} files organized",
                "✓".green(),
                result.moved.len().to_string().green()
            );
            Ok(())
        }
    }
}

fn print_pretty(
    analysis: &AnalysisResult,
    pipeline: Option<&PipelineReport>,
    duration: Duration,
    cli: &Cli,
) {
    if analysis.is_skipped() {
        println!(
            "{}",
            "No package.json found. Skipping dependency analysis.".yellow()
        );
        return;
    }

    if !analysis.unused.is_empty() {
        println!(
            "Unused dependencies ({})",
            analysis.unused.len().to_string().yellow()
        );
        for name in &analysis.unused {
            println!("   {}", name.red());
        }
        println!();
    }

    if let Some(result) = pipeline {
        println!("{}", "Fix attempts".bold());
        for outcome in &result.outcomes {
            match &outcome.outcome {
                FixOutcome::Committed { branch } => println!(
                    "   {} {} ({})",
                    "committed".green(),
                    outcome.message,
                    branch.dimmed()
                ),
                FixOutcome::Reverted => {
                    println!("   {}  {}", "reverted".yellow(), outcome.message)
                }
            }
        }
        println!("   Last working branch: {}", result.final_branch.cyan());
        println!();
    }

    if !analysis.skipped_files.is_empty() {
        println!(
            "Skipped unreadable files ({})",
            analysis.skipped_files.len().to_string().yellow()
        );
        for path in &analysis.skipped_files {
            println!("   {}", path.display().dimmed());
        }
        println!();
    }

    println!("{}", "Summary".bold());
    println!(
        "   Used:   {} dependencies",
        analysis.used.len().to_string().green()
    );
    println!(
        "   Unused: {} dependencies",
        analysis.unused.len().to_string().yellow()
    );
    if let Some(result) = pipeline {
        println!(
            "   Fixes:  {} committed, {} reverted",
            result.committed().to_string().green(),
            result.reverted().to_string().yellow()
        );
    }
    println!();

    println!(
        "Completed in {} (scanned {} files)",
        format!("{}ms", duration.as_millis()).green(),
        analysis.stats.files_scanned
    );

    if !analysis.unused.is_empty() && pipeline.is_none() && !cli.watch {
        println!();
        println!(
            "Run {} to trial-remove {} dependencies",
            "remend --fix".cyan(),
            analysis.unused.len()
        );
    }
}

fn print_json(
    analysis: &AnalysisResult,
    pipeline: Option<&PipelineReport>,
    duration: Duration,
) -> Result<()> {
    use serde_json::json;

    let mut used: Vec<&String> = analysis.used.iter().collect();
    used.sort();

    let output = json!({
        "version": env!("CARGO_PKG_VERSION"),
        "status": match analysis.status {
            DependencyStatus::Analyzed => "analyzed",
            DependencyStatus::SkippedNoManifest => "skipped",
        },
        "usedDependencies": used,
        "unusedDependencies": analysis.unused,
        "skippedFiles": analysis.skipped_files.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
        "fixes": pipeline.map(|result| result.outcomes.iter().map(|o| json!({
            "message": o.message,
            "outcome": match &o.outcome {
                FixOutcome::Committed { branch } => json!({"committed": branch}),
                FixOutcome::Reverted => json!("reverted"),
            },
        })).collect::<Vec<_>>()),
        "stats": {
            "filesScanned": analysis.stats.files_scanned,
            "durationMs": duration.as_millis() as u64
        }
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_compact(analysis: &AnalysisResult, pipeline: Option<&PipelineReport>) {
    for name in &analysis.unused {
        println!("{}: unused dependency", name);
    }
    for path in &analysis.skipped_files {
        println!("{}: skipped (unreadable)", path.display());
    }
    if let Some(result) = pipeline {
        for outcome in &result.outcomes {
            match &outcome.outcome {
                FixOutcome::Committed { branch } => {
                    println!("{}: committed on {}", outcome.message, branch)
                }
                FixOutcome::Reverted => println!("{}: reverted", outcome.message),
            }
        }
    }
}
