// src/report.rs
// =============================================================================
// Summarizes a run for the user and picks the process exit code.
//
// Exit codes:
//   0   every chunk accepted
//   1   at least one chunk rejected by the service
//   2   at least one transport failure
//   3   at least one validation failure
//   4   fatal error before or while reading input
//   130 interrupted with Ctrl-C
// When several apply, the highest in this order wins:
//   cancelled > validation > transport > rejected
// =============================================================================

use anyhow::Result;
use serde::Serialize;

use crate::push::{Outcome, SubmissionResult};

pub const EXIT_OK: i32 = 0;
pub const EXIT_REJECTED: i32 = 1;
pub const EXIT_TRANSPORT: i32 = 2;
pub const EXIT_VALIDATION: i32 = 3;
pub const EXIT_FATAL: i32 = 4;
pub const EXIT_CANCELLED: i32 = 130;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub chunks: usize,
    pub urls: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub invalid: usize,
    pub transport_failed: usize,
    pub cancelled: usize,
    /// URLs the service confirmed, when it told us
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed_urls: Option<u64>,
    /// Smallest remaining quota reported by any answer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_quota: Option<u64>,
}

impl Summary {
    pub fn from_results(results: &[SubmissionResult]) -> Self {
        let mut summary = Summary {
            chunks: results.len(),
            ..Default::default()
        };

        for result in results {
            summary.urls += result.url_count;
            match &result.outcome {
                Outcome::Accepted { receipt, .. } => {
                    summary.accepted += 1;
                    if let Some(receipt) = receipt {
                        if let Some(n) = receipt.accepted() {
                            *summary.confirmed_urls.get_or_insert(0) += n;
                        }
                        if let Some(left) = receipt.remaining() {
                            summary.remaining_quota =
                                Some(summary.remaining_quota.map_or(left, |q| q.min(left)));
                        }
                    }
                }
                Outcome::Rejected { .. } => summary.rejected += 1,
                Outcome::Invalid { .. } => summary.invalid += 1,
                Outcome::TransportFailed { .. } => summary.transport_failed += 1,
                Outcome::Cancelled => summary.cancelled += 1,
            }
        }

        summary
    }

    pub fn exit_code(&self) -> i32 {
        if self.cancelled > 0 {
            EXIT_CANCELLED
        } else if self.invalid > 0 {
            EXIT_VALIDATION
        } else if self.transport_failed > 0 {
            EXIT_TRANSPORT
        } else if self.rejected > 0 {
            EXIT_REJECTED
        } else {
            EXIT_OK
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: &'a Summary,
    results: &'a [SubmissionResult],
}

/// Prints results (sorted by chunk index) as a table or JSON.
pub fn print_results(results: &mut [SubmissionResult], summary: &Summary, json: bool) -> Result<()> {
    results.sort_by_key(|r| r.index);

    if json {
        let report = JsonReport {
            summary,
            results: &*results,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_table(results, summary);
    }
    Ok(())
}

fn print_table(results: &[SubmissionResult], summary: &Summary) {
    println!("{:<7} {:<12} {:<6} {:<14} {:<50}", "CHUNK", "MODE", "URLS", "STATUS", "MESSAGE");
    println!("{}", "=".repeat(92));

    for result in results {
        let (status, message) = describe(&result.outcome);
        println!(
            "{:<7} {:<12} {:<6} {:<14} {:<50}",
            result.index,
            result.mode.as_str(),
            result.url_count,
            status,
            truncate(&message, 50)
        );
    }

    println!();
    println!("📊 Summary:");
    println!("   ✅ Accepted: {}", summary.accepted);
    println!("   ❌ Rejected: {}", summary.rejected);
    println!("   ⚠️  Invalid: {}", summary.invalid);
    println!("   🌐 Transport errors: {}", summary.transport_failed);
    if summary.cancelled > 0 {
        println!("   ⏹️  Cancelled: {}", summary.cancelled);
    }
    println!("   📋 Chunks: {} ({} URLs)", summary.chunks, summary.urls);
    if let Some(n) = summary.confirmed_urls {
        println!("   📬 Confirmed by service: {}", n);
    }
    if let Some(left) = summary.remaining_quota {
        println!("   🔋 Remaining quota: {}", left);
    }
}

fn describe(outcome: &Outcome) -> (String, String) {
    match outcome {
        Outcome::Accepted { status, body, .. } => (format!("✅ {}", status), one_line(body)),
        Outcome::Rejected { status, body, receipt } => {
            let message = receipt
                .as_ref()
                .and_then(|r| r.message.clone())
                .unwrap_or_else(|| one_line(body));
            (format!("❌ {}", status), message)
        }
        Outcome::Invalid { reason } => ("⚠️  INVALID".to_string(), reason.clone()),
        Outcome::TransportFailed { reason } => ("🌐 NETWORK".to_string(), reason.clone()),
        Outcome::Cancelled => ("⏹️  CANCELLED".to_string(), String::new()),
    }
}

fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max - 3).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::push::{Mode, Receipt};

    fn result(index: usize, outcome: Outcome) -> SubmissionResult {
        SubmissionResult {
            index,
            mode: Mode::Realtime,
            url_count: 2,
            endpoint: None,
            outcome,
        }
    }

    fn accepted(success: u64, remain: u64) -> Outcome {
        Outcome::Accepted {
            status: 200,
            body: String::new(),
            receipt: Some(Receipt {
                success: Some(success),
                remain: Some(remain),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn test_all_accepted() {
        let results = vec![result(0, accepted(2, 100)), result(1, accepted(2, 98))];
        let summary = Summary::from_results(&results);
        assert_eq!(summary.accepted, 2);
        assert_eq!(summary.urls, 4);
        assert_eq!(summary.confirmed_urls, Some(4));
        assert_eq!(summary.remaining_quota, Some(98));
        assert_eq!(summary.exit_code(), EXIT_OK);
    }

    #[test]
    fn test_empty_run_is_ok() {
        assert_eq!(Summary::from_results(&[]).exit_code(), EXIT_OK);
    }

    #[test]
    fn test_exit_code_precedence() {
        let rejected = Outcome::Rejected { status: 400, body: String::new(), receipt: None };
        let transport = Outcome::TransportFailed { reason: "timeout".into() };
        let invalid = Outcome::Invalid { reason: "too many".into() };

        let mut results = vec![result(0, accepted(1, 1)), result(1, rejected)];
        assert_eq!(Summary::from_results(&results).exit_code(), EXIT_REJECTED);

        results.push(result(2, transport));
        assert_eq!(Summary::from_results(&results).exit_code(), EXIT_TRANSPORT);

        results.push(result(3, invalid));
        assert_eq!(Summary::from_results(&results).exit_code(), EXIT_VALIDATION);

        results.push(result(4, Outcome::Cancelled));
        assert_eq!(Summary::from_results(&results).exit_code(), EXIT_CANCELLED);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
    }
}
