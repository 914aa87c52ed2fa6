// CLI commands for running code through the judge
use anyhow::{bail, Context, Result};
use codepad_common::config::JudgeConfig;
use codepad_common::types::{ExecutionOptions, ExecutionRequest, ExecutionResult, Language};
use codepad_judge::Orchestrator;
use std::fs;
use std::path::Path;

use crate::samples::{sample_for, Sample, SAMPLES};

fn orchestrator() -> Result<Orchestrator> {
    let config = JudgeConfig::from_env();
    if !config.has_credential() {
        eprintln!("⚠ JUDGE0_API_KEY is not set; the judge will not be contacted");
    }
    Orchestrator::from_config(&config).context("Failed to build judge client")
}

fn build_request(
    language: &str,
    code: String,
    stdin: String,
    time_limit: Option<f64>,
    memory_limit: Option<u64>,
) -> ExecutionRequest {
    ExecutionRequest::new(code, language, stdin).with_options(ExecutionOptions {
        time_limit_secs: time_limit,
        memory_limit_kb: memory_limit,
        ..Default::default()
    })
}

/// Execute one source file. Returns whether the run succeeded.
pub async fn run_file(
    language: &str,
    file: &Path,
    stdin: Option<&Path>,
    time_limit: Option<f64>,
    memory_limit: Option<u64>,
    json: bool,
) -> Result<bool> {
    let code = fs::read_to_string(file)
        .with_context(|| format!("Failed to read source file {}", file.display()))?;
    let input = match stdin {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read stdin file {}", path.display()))?,
        None => String::new(),
    };

    let request = build_request(language, code, input, time_limit, memory_limit);
    let result = orchestrator()?.execute(&request).await;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("Failed to serialize result")?
        );
    } else {
        print_result(&result);
    }

    Ok(result.is_success())
}

fn print_result(result: &ExecutionResult) {
    println!("{}", result.output);

    let mut meta = Vec::new();
    if let Some(status) = &result.judge_status {
        meta.push(status.clone());
    }
    if let Some(time) = result.execution_time {
        meta.push(format!("{:.3}s", time));
    }
    if let Some(memory) = result.memory_used {
        meta.push(format!("{} KB", memory));
    }
    if !meta.is_empty() {
        eprintln!("── {}", meta.join(" · "));
    }

    if let Some(failure) = &result.error {
        eprintln!("✗ {} ({})", failure.message, failure.kind);
    }
}

pub fn list_languages() {
    println!("{:<12} {}", "LANGUAGE", "JUDGE ID");
    for language in Language::ALL {
        println!("{:<12} {}", language.as_str(), language.judge_id());
    }
}

/// A sample passes when the run succeeded and printed its marker line first
fn smoke_passed(sample: &Sample, result: &ExecutionResult) -> bool {
    result.is_success() && result.output.lines().next() == Some(sample.expected_first_line)
}

/// Run the sample programs. Returns whether every selected sample passed.
pub async fn smoke(language: Option<&str>) -> Result<bool> {
    let selected: Vec<&Sample> = match language {
        Some(name) => {
            let Some(lang) = Language::from_str(name) else {
                bail!("Unknown language '{}'", name);
            };
            match sample_for(lang) {
                Some(sample) => vec![sample],
                None => bail!("No sample program for '{}'", lang),
            }
        }
        None => SAMPLES.iter().collect(),
    };

    let orchestrator = orchestrator()?;
    let mut failures = 0;

    println!("🚀 Running {} sample program(s)", selected.len());
    for sample in selected {
        let request = ExecutionRequest::new(sample.code, sample.language.as_str(), "");
        let result = orchestrator.execute(&request).await;

        if smoke_passed(sample, &result) {
            println!("  ✓ {}", sample.language);
        } else {
            failures += 1;
            println!("  ✗ {}", sample.language);
            for line in result.output.lines().take(5) {
                println!("      {}", line);
            }
        }
    }

    if failures == 0 {
        println!("✅ All samples passed");
    } else {
        println!("❌ {} sample(s) failed", failures);
    }
    Ok(failures == 0)
}
