//! `promptpack assemble`: Build a prompt from a request file.

use std::path::Path;

use promptpack_config::PackConfig;
use promptpack_engine::PromptOrchestrator;
use serde_json::json;

use crate::request::RequestFile;

pub fn run(
    request_path: &Path,
    config_path: Option<&Path>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = match config_path {
        Some(path) => {
            let mut config = PackConfig::load_from(path)?;
            config.apply_env_overrides(|key| std::env::var(key).ok())?;
            config
        }
        None => PackConfig::load().map_err(|e| format!("Failed to load config: {e}"))?,
    };

    let request = RequestFile::read(request_path)?.into_assembly(&config);
    let orchestrator = PromptOrchestrator::from_config(&config);
    let assembled = orchestrator.assemble(request)?;
    let report = assembled.report();

    if json {
        let out = json!({
            "prompt": assembled.prompt,
            "context_truncated": assembled.context_truncated,
            "used_items": assembled
                .pools
                .iter()
                .map(|p| json!({ "category": p.category, "items": p.used_items }))
                .collect::<Vec<_>>(),
            "report": report,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{}", assembled.prompt);

    eprintln!();
    eprintln!(
        "  {} chars (~{} tokens){}",
        report.total_chars,
        report.estimated_tokens,
        if report.context_truncated { ", context truncated" } else { "" }
    );
    for pool in &report.pools {
        eprintln!(
            "  {:<9} {:>6}/{:<6} verbatim {} excerpt {} summary {} omitted {} dropped {}",
            pool.category.as_str(),
            pool.chars_used,
            pool.budget,
            pool.items_verbatim,
            pool.items_excerpted,
            pool.items_summarized,
            pool.items_omitted,
            pool.items_dropped,
        );
    }

    Ok(())
}
