//! Runs registered cases against the relay and prints a per-category report

use colored::Colorize;
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::time::Instant;

use crate::types::{SharedBackendState, TestResult};

const RULE: &str = "═══════════════════════════════════════════════════";

pub type TestFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>>;

/// A named case; the name prefix before '/' is its category
pub struct TestCase {
    pub name: &'static str,
    pub description: &'static str,
    pub run: Box<dyn Fn(TestContext) -> TestFuture + Send + Sync>,
}

impl TestCase {
    fn category(&self) -> &'static str {
        self.name.split_once('/').map(|(c, _)| c).unwrap_or(self.name)
    }
}

/// Relay address, mock inference service state and a client, cloned into each case
#[derive(Clone)]
pub struct TestContext {
    pub proxy_addr: String,
    pub backend_state: SharedBackendState,
    pub http_client: reqwest::Client,
}

/// Run the cases matching `filter`, one at a time against a fresh mock service
pub async fn run_tests(cases: Vec<TestCase>, ctx: TestContext, filter: Option<&str>) -> Vec<TestResult> {
    let selected: Vec<&TestCase> = cases
        .iter()
        .filter(|c| filter.map_or(true, |f| c.name.contains(f)))
        .collect();

    println!("\n{}", RULE.bright_blue());
    println!("{}", "  symptom-relay End-to-End Tests".bright_white().bold());
    println!("{}", RULE.bright_blue());
    println!("  Relay:   {}", ctx.proxy_addr.bright_cyan());
    println!("  Running: {} of {} case(s)\n", selected.len().to_string().bright_cyan(), cases.len());

    let mut results = Vec::with_capacity(selected.len());
    let mut by_category: BTreeMap<&str, (usize, usize)> = BTreeMap::new();

    for case in selected {
        reset_backend(&ctx.backend_state);

        print!("  {} {} ... ", "▶".bright_blue(), case.name.bright_white());
        let start = Instant::now();
        let outcome = (case.run)(ctx.clone()).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        let tally = by_category.entry(case.category()).or_default();
        let error = match outcome {
            Ok(()) => {
                println!("{} ({duration_ms}ms)", "PASS".bright_green().bold());
                tally.0 += 1;
                None
            }
            Err(e) => {
                println!("{} ({duration_ms}ms)", "FAIL".bright_red().bold());
                println!("    {} {}", "Error:".bright_red(), e);
                for cause in e.chain().skip(1) {
                    println!("    {} {}", "Caused by:".yellow(), cause);
                }
                tally.1 += 1;
                Some(e.to_string())
            }
        };

        results.push(TestResult {
            name: case.name.to_string(),
            passed: error.is_none(),
            error,
            duration_ms,
        });
    }

    print_report(&by_category, &results);
    results
}

/// Drop queued responses and recorded requests left by the previous case
fn reset_backend(state: &SharedBackendState) {
    let mut state = state.lock().unwrap();
    state.response_queues.clear();
    state.received_requests.clear();
}

fn print_report(by_category: &BTreeMap<&str, (usize, usize)>, results: &[TestResult]) {
    println!("\n{}", "───────────────────────────────────────────────────".bright_blue());
    for (category, (passed, failed)) in by_category {
        let line = format!("  {:<10} {} passed, {} failed", category, passed, failed);
        if *failed == 0 {
            println!("{}", line.green());
        } else {
            println!("{}", line.red());
        }
    }

    let failed: Vec<&TestResult> = results.iter().filter(|r| !r.passed).collect();
    let total_ms: u64 = results.iter().map(|r| r.duration_ms).sum();
    let summary = format!(
        "  Total: {} passed, {} failed in {}ms",
        results.len() - failed.len(),
        failed.len(),
        total_ms
    );

    if failed.is_empty() {
        println!("{}", summary.bright_green().bold());
    } else {
        println!("{}", summary.bright_red().bold());
        for result in failed {
            println!("    {} {}", "✗".bright_red(), result.name);
        }
    }
    println!("{}\n", RULE.bright_blue());
}

/// Print registered cases grouped by category
pub fn list_tests(cases: &[TestCase]) {
    println!("\n{}", "Available tests:".bright_white().bold());
    let mut current = "";
    for case in cases {
        if case.category() != current {
            current = case.category();
            println!("\n  {}", current.bright_white().bold());
        }
        println!("    {} - {}", case.name.bright_cyan(), case.description);
    }
    println!();
}
