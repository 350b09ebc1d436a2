//! Startup self-checks
//!
//! Run once before the listener is bound. A failed critical check aborts
//! startup; anything else is logged as a warning.

use serde::Serialize;
use std::path::Path;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::DbPool;

/// Tables every content endpoint relies on
const ESSENTIAL_TABLES: &[&str] = &[
    "contact_messages",
    "services",
    "testimonials",
    "hero_images",
    "page_images",
    "blog_posts",
    "updates",
    "about_sections",
    "contact_information",
    "gallery_items",
    "users",
    "sessions",
];

#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    /// Failure should abort startup
    pub critical: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl CheckResult {
    pub fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            critical: false,
            message: message.into(),
            details: None,
        }
    }

    pub fn fail(name: impl Into<String>, message: impl Into<String>, critical: bool) -> Self {
        Self {
            name: name.into(),
            passed: false,
            critical,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StartupCheckReport {
    pub checks: Vec<CheckResult>,
    pub all_critical_passed: bool,
    pub all_passed: bool,
    pub summary: String,
}

impl StartupCheckReport {
    pub fn new(checks: Vec<CheckResult>) -> Self {
        let all_critical_passed = checks.iter().filter(|c| c.critical).all(|c| c.passed);
        let all_passed = checks.iter().all(|c| c.passed);
        let total = checks.len();
        let passed = checks.iter().filter(|c| c.passed).count();
        let failed_critical = checks.iter().filter(|c| c.critical && !c.passed).count();

        let summary = if all_passed {
            format!("All {} startup checks passed", total)
        } else if all_critical_passed {
            format!(
                "{}/{} checks passed ({} warnings)",
                passed,
                total,
                total - passed
            )
        } else {
            format!(
                "{}/{} checks passed ({} critical failures)",
                passed, total, failed_critical
            )
        };

        Self {
            checks,
            all_critical_passed,
            all_passed,
            summary,
        }
    }

    /// Names of the critical checks that failed
    pub fn critical_failures(&self) -> Vec<&str> {
        self.checks
            .iter()
            .filter(|c| c.critical && !c.passed)
            .map(|c| c.name.as_str())
            .collect()
    }
}

pub async fn run_startup_checks(config: &Config, db: &DbPool) -> StartupCheckReport {
    info!("Running startup self-checks...");

    let checks = vec![
        check_database_connectivity(db).await,
        check_database_schema(db).await,
        check_directory_writable("data_directory", &config.server.data_dir, true),
        // Content still serves without uploads, so a read-only media dir only warns
        check_directory_writable("media_directory", &config.uploads.media_dir, false),
    ];

    let report = StartupCheckReport::new(checks);

    for check in &report.checks {
        if check.passed {
            info!(check = %check.name, message = %check.message, "Startup check PASSED");
        } else if check.critical {
            error!(
                check = %check.name,
                message = %check.message,
                details = ?check.details,
                "Startup check FAILED (CRITICAL)"
            );
        } else {
            warn!(
                check = %check.name,
                message = %check.message,
                details = ?check.details,
                "Startup check FAILED (non-critical)"
            );
        }
    }

    info!(
        summary = %report.summary,
        all_passed = report.all_passed,
        "Startup checks completed"
    );

    report
}

async fn check_database_connectivity(db: &DbPool) -> CheckResult {
    match sqlx::query("SELECT 1").fetch_one(db).await {
        Ok(_) => CheckResult::pass("database_connectivity", "Database connection successful"),
        Err(e) => CheckResult::fail(
            "database_connectivity",
            "Failed to connect to database",
            true,
        )
        .with_details(e.to_string()),
    }
}

async fn check_database_schema(db: &DbPool) -> CheckResult {
    let tables: Result<Vec<(String,)>, _> = sqlx::query_as(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
    )
    .fetch_all(db)
    .await;

    match tables {
        Ok(tables) => {
            let missing: Vec<&str> = ESSENTIAL_TABLES
                .iter()
                .filter(|t| !tables.iter().any(|(name,)| name == *t))
                .copied()
                .collect();

            if missing.is_empty() {
                CheckResult::pass(
                    "database_schema",
                    format!("Database schema valid ({} tables)", tables.len()),
                )
            } else {
                CheckResult::fail("database_schema", "Missing content tables", true)
                    .with_details(format!("Missing: {}", missing.join(", ")))
            }
        }
        Err(e) => CheckResult::fail("database_schema", "Failed to query database schema", true)
            .with_details(e.to_string()),
    }
}

fn check_directory_writable(name: &str, dir: &Path, critical: bool) -> CheckResult {
    if !dir.is_dir() {
        return CheckResult::fail(name, "Directory does not exist", critical)
            .with_details(dir.display().to_string());
    }

    let test_file = dir.join(".susu_write_test");
    match std::fs::write(&test_file, "test") {
        Ok(()) => {
            let _ = std::fs::remove_file(&test_file);
            CheckResult::pass(name, "Directory is writable")
                .with_details(format!("Path: {}", dir.display()))
        }
        Err(e) => CheckResult::fail(name, "Directory is not writable", critical)
            .with_details(format!("{}: {}", dir.display(), e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_in_memory;

    #[test]
    fn test_report_summary() {
        let report = StartupCheckReport::new(vec![
            CheckResult::pass("a", "ok"),
            CheckResult::fail("b", "meh", false),
        ]);
        assert!(report.all_critical_passed);
        assert!(!report.all_passed);
        assert_eq!(report.summary, "1/2 checks passed (1 warnings)");

        let report = StartupCheckReport::new(vec![CheckResult::fail("db", "down", true)]);
        assert!(!report.all_critical_passed);
        assert_eq!(report.critical_failures(), vec!["db"]);
    }

    #[tokio::test]
    async fn test_checks_pass_on_fresh_install() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.server.data_dir = dir.path().to_path_buf();
        config.uploads.media_dir = dir.path().join("media");
        std::fs::create_dir_all(&config.uploads.media_dir).unwrap();

        let db = init_in_memory().await.unwrap();
        let report = run_startup_checks(&config, &db).await;
        assert!(report.all_passed, "{:?}", report.checks);
    }

    #[tokio::test]
    async fn test_missing_media_dir_is_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.server.data_dir = dir.path().to_path_buf();
        config.uploads.media_dir = dir.path().join("does-not-exist");

        let db = init_in_memory().await.unwrap();
        let report = run_startup_checks(&config, &db).await;
        assert!(report.all_critical_passed);
        assert!(!report.all_passed);
    }
}
