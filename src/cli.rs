//! # CLI Execution Functions
//!
//! Extracted from `main.rs` to keep the entry point slim. Contains config
//! layering, rayon setup, and the execution logic for each subcommand.
//! Results go to stdout as JSON; logs go to stderr.

use anyhow::{anyhow, bail, Result};
use echoprime::contract::format_for_contract;
use echoprime::export::export_traces;
use echoprime::progress::Progress;
use echoprime::{
    batch_verify_par, create_trace, estimate_nth_safe_prime, exact_digits, find_safe_prime_near,
    get_candidate_from_index, projector_index, verify_safe_prime, OracleConfig, OracleError,
    PrimalityOracle, Trace, VerificationResult,
};
use rayon::prelude::*;
use rug::Integer;
use serde::Serialize;
use std::path::Path;
use std::sync::atomic::Ordering;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use super::Cli;

// ── Setup ───────────────────────────────────────────────────────

/// Layer the config file (if any) under the flag/env overrides.
pub fn load_config(cli: &Cli) -> Result<OracleConfig> {
    let mut config = match &cli.config {
        Some(path) => OracleConfig::from_toml_file(path)?,
        None => OracleConfig::default(),
    };
    if let Some(window) = cli.window {
        config.window = window;
    }
    if let Some(threshold) = cli.threshold {
        config.threshold = threshold;
    }
    if let Some(rounds) = cli.mr_rounds {
        config.mr_rounds = rounds;
    }
    config.validate()?;
    Ok(config)
}

pub fn configure_rayon(threads: Option<usize>) {
    let num_threads = threads.unwrap_or(0);
    if num_threads > 0 {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
        {
            warn!(error = %e, "Could not configure rayon thread pool");
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ── Pipeline ────────────────────────────────────────────────────

/// index → estimate → search → verify → trace.
fn pipeline(
    index: i64,
    config: &OracleConfig,
    oracle: &dyn PrimalityOracle,
) -> Result<(VerificationResult, Trace), OracleError> {
    let pair = find_safe_prime_near(index, config, oracle)?;
    let result = verify_safe_prime(&pair.p, config.window, config.threshold, oracle);
    // find_safe_prime_near rejects index < 1, so the cast is lossless
    let trace = create_trace(
        index as u64,
        &pair.p,
        &pair.q,
        result.score_p,
        result.score_q,
        result.verified,
    );
    Ok((result, trace))
}

// ── Single-Index Commands ───────────────────────────────────────

pub fn run_estimate(config: &OracleConfig, index: i64) -> Result<()> {
    let estimate = estimate_nth_safe_prime(index, config.a)?;
    println!("{}", estimate);
    Ok(())
}

pub fn run_find(config: &OracleConfig, index: i64) -> Result<()> {
    let oracle = config.oracle();
    let estimate = estimate_nth_safe_prime(index, config.a)?;
    let pair = find_safe_prime_near(index, config, &oracle)?;
    info!(index, digits = exact_digits(&pair.p), "safe prime located");
    print_json(&serde_json::json!({
        "index": index,
        "estimate": estimate.to_string(),
        "p": pair.p.to_string(),
        "q": pair.q.to_string(),
    }))
}

pub fn run_candidate(config: &OracleConfig, index: i64) -> Result<()> {
    let oracle = config.oracle();
    let p = get_candidate_from_index(index, config.a, &oracle)?;
    println!("{}", p);
    Ok(())
}

pub fn run_project(config: &OracleConfig, epoch: u64, offset: i64) -> Result<()> {
    println!("{}", projector_index(epoch, offset, config.a));
    Ok(())
}

pub fn run_verify(config: &OracleConfig, candidates: &[String]) -> Result<()> {
    let parsed = candidates
        .iter()
        .map(|c| {
            Integer::from_str_radix(c.trim(), 10)
                .map_err(|e| anyhow!("invalid candidate {:?}: {}", c, e))
        })
        .collect::<Result<Vec<_>>>()?;
    let oracle = config.oracle();
    let results = batch_verify_par(&parsed, config.window, config.threshold, &oracle);
    let passed = results.iter().filter(|r| r.verified).count();
    info!(passed, total = results.len(), "verification complete");
    print_json(&results)
}

pub fn run_trace(config: &OracleConfig, index: i64, contract: bool) -> Result<()> {
    let oracle = config.oracle();
    let (result, trace) = pipeline(index, config, &oracle)?;
    info!(
        index,
        verified = result.verified,
        hash = %&trace.hash[..16],
        "trace created"
    );
    if contract {
        print_json(&format_for_contract(&trace)?)
    } else {
        print_json(&trace)
    }
}

// ── Range Commands ──────────────────────────────────────────────

pub fn run_batch(config: &OracleConfig, start: i64, end: i64, export: Option<&Path>) -> Result<()> {
    if start < 1 || end < start {
        bail!("invalid range [{}, {}]: need 1 <= start <= end", start, end);
    }
    let oracle = config.oracle();
    let progress = Progress::new();
    let reporter = progress.start_reporter(Duration::from_secs(10));

    let outcomes: Vec<(i64, Result<(VerificationResult, Trace), OracleError>)> = (start..=end)
        .into_par_iter()
        .map(|index| {
            if let Ok(mut current) = progress.current.lock() {
                *current = format!("index {}", index);
            }
            let outcome = pipeline(index, config, &oracle);
            progress.processed.fetch_add(1, Ordering::Relaxed);
            match &outcome {
                Ok((r, _)) if r.verified => progress.verified.fetch_add(1, Ordering::Relaxed),
                _ => progress.failed.fetch_add(1, Ordering::Relaxed),
            };
            (index, outcome)
        })
        .collect();

    progress.stop();
    let _ = reporter.join();

    let mut traces = Vec::with_capacity(outcomes.len());
    for (index, outcome) in outcomes {
        match outcome {
            Ok((_, trace)) => traces.push(trace),
            Err(e) => warn!(index, error = %e, "pipeline failed"),
        }
    }

    let snap = progress.snapshot();
    info!(
        processed = snap.processed,
        verified = snap.verified,
        failed = snap.failed,
        "batch complete"
    );

    if let Some(path) = export {
        export_traces(&traces, path)?;
        info!(count = traces.len(), path = %path.display(), "traces exported");
    }

    print_json(&serde_json::json!({
        "start": start,
        "end": end,
        "verified": snap.verified,
        "failed": snap.failed,
        "all_verified": snap.failed == 0,
    }))?;

    if snap.failed > 0 {
        bail!("{} of {} indices failed", snap.failed, snap.processed);
    }
    Ok(())
}

/// Estimate every index in `1..=count`; run the full pipeline on every
/// `1/sample_rate`-th index and on the first ten.
pub fn run_bench(config: &OracleConfig, count: u64, sample_rate: f64, report_secs: u64) -> Result<()> {
    if !(sample_rate > 0.0 && sample_rate <= 1.0) {
        bail!("sample rate must be within (0, 1] (got {})", sample_rate);
    }
    let count = i64::try_from(count).map_err(|_| anyhow!("count {} too large", count))?;
    let sample_every = ((1.0 / sample_rate) as i64).max(1);
    info!(
        count,
        sample_rate,
        sampled = count / sample_every,
        a = config.a,
        "benchmark starting"
    );

    let oracle = config.oracle();
    let progress = Progress::new();
    let reporter = progress.start_reporter(Duration::from_secs(report_secs.max(1)));
    let errors: Mutex<Vec<(i64, String)>> = Mutex::new(Vec::new());
    let found = std::sync::atomic::AtomicU64::new(0);
    let started = Instant::now();

    (1..=count).into_par_iter().for_each(|n| {
        let outcome = estimate_nth_safe_prime(n, config.a).map_err(|e| e.to_string());
        let outcome = outcome.and_then(|_| {
            if n % sample_every != 0 && n > 10 {
                return Ok(None);
            }
            let pair = find_safe_prime_near(n, config, &oracle).map_err(|e| e.to_string())?;
            found.fetch_add(1, Ordering::Relaxed);
            let result = verify_safe_prime(&pair.p, config.window, config.threshold, &oracle);
            if result.verified {
                Ok(Some(()))
            } else {
                Err(format!("p={} failed verification", pair.p))
            }
        });
        match outcome {
            Ok(Some(())) => {
                progress.verified.fetch_add(1, Ordering::Relaxed);
            }
            Ok(None) => {}
            Err(msg) => {
                progress.failed.fetch_add(1, Ordering::Relaxed);
                if let Ok(mut errs) = errors.lock() {
                    errs.push((n, msg));
                }
            }
        }
        progress.processed.fetch_add(1, Ordering::Relaxed);
    });

    progress.stop();
    let _ = reporter.join();

    let elapsed = started.elapsed().as_secs_f64();
    let snap = progress.snapshot();
    let found = found.load(Ordering::Relaxed);
    info!(
        candidates = count,
        found,
        verified = snap.verified,
        failed = snap.failed,
        pass_rate = format_args!("{:.2}%", snap.pass_rate()),
        elapsed = format_args!("{:.2}s", elapsed),
        estimate_rate = format_args!("{:.0}/s", count as f64 / elapsed.max(f64::EPSILON)),
        verify_rate = format_args!("{:.1}/s", found as f64 / elapsed.max(f64::EPSILON)),
        "benchmark complete"
    );

    let mut errors = errors.into_inner().unwrap_or_default();
    errors.sort_by_key(|(n, _)| *n);
    for (n, msg) in errors.iter().take(10) {
        warn!(index = n, error = %msg, "benchmark failure");
    }

    print_json(&serde_json::json!({
        "candidates": count,
        "found": found,
        "verified": snap.verified,
        "failed": snap.failed,
        "elapsed_secs": elapsed,
    }))?;

    if snap.failed > 0 {
        bail!("{} sampled indices failed", snap.failed);
    }
    Ok(())
}
