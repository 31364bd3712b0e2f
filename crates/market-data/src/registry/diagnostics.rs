//! Per-attempt diagnostics for chain runs.

use std::time::Duration;

use crate::errors::RetryClass;

/// Record of a single provider attempt.
#[derive(Clone, Debug)]
pub struct ProviderAttempt {
    pub provider_id: String,
    pub error: Option<String>,
    pub retry_class: Option<RetryClass>,
    pub elapsed: Duration,
    pub success: bool,
}

/// Everything that happened during one chain run.
#[derive(Clone, Debug, Default)]
pub struct FetchDiagnostics {
    pub attempts: Vec<ProviderAttempt>,
}

impl FetchDiagnostics {
    pub fn new() -> Self {
        Self {
            attempts: Vec::new(),
        }
    }

    pub fn record_error(
        &mut self,
        provider_id: impl Into<String>,
        error: String,
        retry_class: RetryClass,
        elapsed: Duration,
    ) {
        self.attempts.push(ProviderAttempt {
            provider_id: provider_id.into(),
            error: Some(error),
            retry_class: Some(retry_class),
            elapsed,
            success: false,
        });
    }

    pub fn record_success(&mut self, provider_id: impl Into<String>, elapsed: Duration) {
        self.attempts.push(ProviderAttempt {
            provider_id: provider_id.into(),
            error: None,
            retry_class: None,
            elapsed,
            success: true,
        });
    }

    /// Summary for logging/debugging.
    pub fn summary(&self) -> String {
        self.attempts
            .iter()
            .map(|a| {
                if a.success {
                    format!("{}: SUCCESS ({}ms)", a.provider_id, a.elapsed.as_millis())
                } else if let Some(err) = &a.error {
                    format!("{}: ERROR ({})", a.provider_id, err)
                } else {
                    format!("{}: UNKNOWN", a.provider_id)
                }
            })
            .collect::<Vec<_>>()
            .join(" -> ")
    }

    /// Check if any provider succeeded.
    pub fn has_success(&self) -> bool {
        self.attempts.iter().any(|a| a.success)
    }

    pub fn attempted(&self) -> usize {
        self.attempts.len()
    }

    pub fn succeeded(&self) -> usize {
        self.attempts.iter().filter(|a| a.success).count()
    }

    /// Get all errors.
    pub fn errors(&self) -> Vec<(&str, &str)> {
        self.attempts
            .iter()
            .filter_map(|a| a.error.as_deref().map(|e| (a.provider_id.as_str(), e)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostics_summary() {
        let mut diag = FetchDiagnostics::new();
        diag.record_error(
            "YAHOO",
            "Timeout: YAHOO".to_string(),
            RetryClass::Transient,
            Duration::from_millis(8000),
        );
        diag.record_success("FMP", Duration::from_millis(120));

        assert_eq!(
            diag.summary(),
            "YAHOO: ERROR (Timeout: YAHOO) -> FMP: SUCCESS (120ms)"
        );
    }

    #[test]
    fn test_counts() {
        let mut diag = FetchDiagnostics::new();
        assert!(!diag.has_success());
        diag.record_error("A", "boom".into(), RetryClass::NextProvider, Duration::ZERO);
        diag.record_success("B", Duration::ZERO);
        assert!(diag.has_success());
        assert_eq!(diag.attempted(), 2);
        assert_eq!(diag.succeeded(), 1);
        assert_eq!(diag.errors(), vec![("A", "boom")]);
    }
}
