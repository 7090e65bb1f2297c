use haggle_core::catalog::Catalog;
use haggle_core::config::{AppConfig, LoadOptions};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> String {
    let report = build_report();

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_catalog(&config));
            checks.push(check_sender_credentials(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(DoctorCheck {
                name: "catalog_readiness",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
            checks.push(DoctorCheck {
                name: "sender_credentials",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
        }
    }

    let any_fail = checks.iter().any(|check| check.status == CheckStatus::Fail);
    let overall_status = if any_fail { CheckStatus::Fail } else { CheckStatus::Pass };
    let summary = if any_fail {
        "doctor: one or more readiness checks failed".to_string()
    } else {
        "doctor: all readiness checks passed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_catalog(config: &AppConfig) -> DoctorCheck {
    if !config.catalog.path.exists() {
        return DoctorCheck {
            name: "catalog_readiness",
            status: CheckStatus::Fail,
            details: format!(
                "catalog file `{}` not found, the server would start with an empty catalog",
                config.catalog.path.display()
            ),
        };
    }

    let catalog = Catalog::load(&config.catalog.path);
    if catalog.is_empty() {
        DoctorCheck {
            name: "catalog_readiness",
            status: CheckStatus::Fail,
            details: format!(
                "catalog file `{}` yielded no products",
                config.catalog.path.display()
            ),
        }
    } else {
        DoctorCheck {
            name: "catalog_readiness",
            status: CheckStatus::Pass,
            details: format!("loaded {} products from `{}`", catalog.len(), config.catalog.path.display()),
        }
    }
}

fn check_sender_credentials(config: &AppConfig) -> DoctorCheck {
    if config.whatsapp.send_enabled() {
        DoctorCheck {
            name: "sender_credentials",
            status: CheckStatus::Pass,
            details: "provider credentials configured, outbound sends enabled".to_string(),
        }
    } else {
        DoctorCheck {
            name: "sender_credentials",
            status: CheckStatus::Skipped,
            details: "no provider credentials, replies travel in the webhook response only"
                .to_string(),
        }
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
