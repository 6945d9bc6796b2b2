//! Doctor command for provider diagnostics
//!
//! Checks that API keys are present and each hosted service answers.

use colored::Colorize;
use std::path::Path;

use crate::config::{Config, LlmProvider, VectorProvider};
use crate::llm::OllamaGenerate;

/// Health check result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Pass,
    Warn(String),
    Fail(String),
}

/// Individual health check
#[derive(Debug)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
}

impl HealthCheck {
    fn new(name: &str, status: HealthStatus) -> Self {
        Self {
            name: name.to_string(),
            status,
        }
    }
}

/// Doctor diagnostics system
pub struct Doctor {
    config: Config,
}

impl Doctor {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run all health checks
    pub async fn run_diagnostics(&self) -> Vec<HealthCheck> {
        let mut checks = vec![
            self.check_key("Embedding API key", &self.config.embeddings.api_key_env),
        ];

        if self.config.vector.provider == VectorProvider::Pinecone {
            checks.push(self.check_key("Vector index API key", &self.config.vector.api_key_env));
        }
        if self.config.llm.provider == LlmProvider::OpenAi {
            checks.push(self.check_key("LLM API key", &self.config.llm.api_key_env));
        }

        checks.push(self.check_vector_index().await);
        checks.push(self.check_llm().await);
        checks.push(check_state_dir(&self.config.state_dir()));

        checks
    }

    fn check_key(&self, name: &str, env_var: &str) -> HealthCheck {
        match Config::api_key(env_var) {
            Ok(_) => HealthCheck::new(name, HealthStatus::Pass),
            Err(_) => HealthCheck::new(name, HealthStatus::Fail(format!("{} is not set", env_var))),
        }
    }

    async fn check_vector_index(&self) -> HealthCheck {
        let name = "Vector Index";
        let index = match crate::vector::connect(&self.config.vector) {
            Ok(index) => index,
            Err(e) => return HealthCheck::new(name, HealthStatus::Fail(e.to_string())),
        };

        match index.list_indexes().await {
            Ok(indexes) if indexes.is_empty() => {
                HealthCheck::new(name, HealthStatus::Warn("No indexes found".to_string()))
            }
            Ok(_) => HealthCheck::new(name, HealthStatus::Pass),
            Err(e) => HealthCheck::new(name, HealthStatus::Fail(e.to_string())),
        }
    }

    async fn check_llm(&self) -> HealthCheck {
        let name = "Language Model";
        match self.config.llm.provider {
            LlmProvider::Ollama => match OllamaGenerate::from_config(&self.config.llm) {
                Ok(client) => match client.health_check().await {
                    Ok(true) => HealthCheck::new(name, HealthStatus::Pass),
                    _ => HealthCheck::new(
                        name,
                        HealthStatus::Fail("Ollama not running or not reachable".to_string()),
                    ),
                },
                Err(e) => HealthCheck::new(name, HealthStatus::Fail(e.to_string())),
            },
            // Hosted models are only exercised by a real request
            LlmProvider::OpenAi => HealthCheck::new(
                name,
                HealthStatus::Warn(format!(
                    "{} not checked; run `ask` to verify",
                    self.config.llm.model
                )),
            ),
        }
    }

    /// Display diagnostics results
    pub fn display_results(checks: &[HealthCheck]) {
        println!("\nOpen Canvas Diagnostics\n");
        println!("{:<24} Status", "Check");
        println!("{}", "=".repeat(50));

        for check in checks {
            let status = match &check.status {
                HealthStatus::Pass => "PASS".green().to_string(),
                HealthStatus::Warn(msg) => format!("WARN: {}", msg).yellow().to_string(),
                HealthStatus::Fail(msg) => format!("FAIL: {}", msg).red().to_string(),
            };
            println!("{:<24} {}", check.name, status);
        }
        println!();
    }

    /// True when no check failed
    pub fn all_passed(checks: &[HealthCheck]) -> bool {
        !checks
            .iter()
            .any(|c| matches!(c.status, HealthStatus::Fail(_)))
    }
}

fn check_state_dir(dir: &Path) -> HealthCheck {
    let name = "State Directory";
    if let Err(e) = std::fs::create_dir_all(dir) {
        return HealthCheck::new(name, HealthStatus::Fail(format!("Cannot create {}: {}", dir.display(), e)));
    }

    let test_file = dir.join(".opencanvas_test");
    match std::fs::write(&test_file, "test") {
        Ok(_) => {
            let _ = std::fs::remove_file(&test_file);
            HealthCheck::new(name, HealthStatus::Pass)
        }
        Err(_) => HealthCheck::new(
            name,
            HealthStatus::Fail(format!("No write permission in {}", dir.display())),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_state_dir_writable() {
        let temp = TempDir::new().unwrap();
        let check = check_state_dir(&temp.path().join("state"));
        assert_eq!(check.status, HealthStatus::Pass);
    }

    #[test]
    fn test_missing_key_fails() {
        let mut config = Config::default();
        config.embeddings.api_key_env = "OPENCANVAS_DOCTOR_UNSET_KEY".to_string();
        let doctor = Doctor::new(config);

        let check = doctor.check_key("Embedding API key", "OPENCANVAS_DOCTOR_UNSET_KEY");
        assert!(matches!(check.status, HealthStatus::Fail(ref m) if m.contains("OPENCANVAS_DOCTOR_UNSET_KEY")));
    }

    #[test]
    fn test_all_passed() {
        let checks = vec![
            HealthCheck::new("a", HealthStatus::Pass),
            HealthCheck::new("b", HealthStatus::Warn("meh".to_string())),
        ];
        assert!(Doctor::all_passed(&checks));

        let failing = vec![HealthCheck::new("c", HealthStatus::Fail("no".to_string()))];
        assert!(!Doctor::all_passed(&failing));
    }
}
