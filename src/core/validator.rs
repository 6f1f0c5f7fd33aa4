//! Configuration validation
//!
//! A single pass over a loaded [`Configuration`] that records every violated
//! invariant instead of stopping at the first one. Checks run in document
//! order: project, credentials, docker, agents (sorted by name), pipeline.

use crate::core::error::{ConfigError, ValidationErrors, Violation};
use crate::core::schema::{AgentSpec, Backend, Configuration, StepSpec, WorkspaceMode};
use std::collections::HashSet;
use tracing::debug;

/// Validate a configuration, returning every violation as one composite error
pub fn validate(config: &Configuration) -> Result<(), ConfigError> {
    let violations = collect_violations(config);
    debug!(violations = violations.len(), "validated configuration");
    violations.into_result()
}

/// Run every check and return what failed, in check order
pub fn collect_violations(config: &Configuration) -> ValidationErrors {
    let mut v = Validator::default();

    v.check(!config.project.name.is_empty(), "project.name", "required");
    v.check(
        !config.project.repository.is_empty(),
        "project.repository",
        "required",
    );

    if config.credentials.backend_kind().is_none() {
        let allowed: Vec<String> = Backend::ALL.iter().map(Backend::to_string).collect();
        v.fail(
            "credentials.backend",
            format!(
                "must be one of: {} (got {:?})",
                allowed.join(", "),
                config.credentials.backend
            ),
        );
    }

    v.check(
        !config.docker.base_image.is_empty(),
        "docker.base_image",
        "required",
    );

    v.check(
        !config.agents.is_empty(),
        "agents",
        "at least one agent must be defined",
    );
    for (name, agent) in &config.agents {
        v.check_agent(name, agent);
    }

    v.check(
        !config.pipeline.is_empty(),
        "pipeline",
        "at least one step required",
    );
    let mut seen: HashSet<&str> = HashSet::new();
    for (i, step) in config.pipeline.iter().enumerate() {
        v.check_step(config, i, step, &seen);
        // Registered only after the step's own dependencies are resolved, so
        // self and forward references never match.
        seen.insert(step.name.as_str());
    }

    v.errors
}

#[derive(Default)]
struct Validator {
    errors: ValidationErrors,
}

impl Validator {
    fn check(&mut self, ok: bool, path: &str, reason: &str) {
        if !ok {
            self.fail(path, reason);
        }
    }

    fn fail(&mut self, path: impl Into<String>, reason: impl Into<String>) {
        self.errors.push(Violation::new(path, reason));
    }

    fn check_agent(&mut self, name: &str, agent: &AgentSpec) {
        let prefix = format!("agents.{}", name);

        if agent.prompt.system.is_empty() {
            self.fail(format!("{}.prompt.system", prefix), "required");
        }
        if agent.prompt.task.is_empty() {
            self.fail(format!("{}.prompt.task", prefix), "required");
        }
        if agent.workspace_mode().is_none() {
            self.fail(
                format!("{}.workspace", prefix),
                format!(
                    "must be {} or {} (got {:?})",
                    WorkspaceMode::ReadWrite,
                    WorkspaceMode::ReadOnly,
                    agent.workspace
                ),
            );
        }
    }

    fn check_step(
        &mut self,
        config: &Configuration,
        index: usize,
        step: &StepSpec,
        earlier: &HashSet<&str>,
    ) {
        let prefix = format!("pipeline[{}]", index);

        if step.name.is_empty() {
            self.fail(format!("{}.name", prefix), "required");
        }

        if !step.agent.is_empty() && config.agent(&step.agent).is_none() {
            self.fail(
                format!("{}.agent", prefix),
                format!("references undefined agent {:?}", step.agent),
            );
        }

        for dep in &step.depends_on {
            if !earlier.contains(dep.as_str()) {
                self.fail(
                    format!("{}.depends_on", prefix),
                    format!("unknown step {:?}", dep),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::{BuildSpec, CredentialSpec, ProjectRef, PromptSpec};
    use std::collections::BTreeMap;

    fn valid_config() -> Configuration {
        let mut agents = BTreeMap::new();
        agents.insert(
            "worker".to_string(),
            AgentSpec {
                prompt: PromptSpec {
                    system: "system.md".to_string(),
                    task: "do the thing".to_string(),
                },
                workspace: "rw".to_string(),
                ..Default::default()
            },
        );

        Configuration {
            project: ProjectRef {
                name: "test-project".to_string(),
                repository: "https://github.com/test/repo.git".to_string(),
            },
            credentials: CredentialSpec {
                backend: "env".to_string(),
                secrets: BTreeMap::new(),
            },
            docker: BuildSpec {
                base_image: "debian:bookworm-slim".to_string(),
                ..Default::default()
            },
            agents,
            pipeline: vec![step("build", "worker", &[])],
        }
    }

    fn step(name: &str, agent: &str, deps: &[&str]) -> StepSpec {
        StepSpec {
            name: name.to_string(),
            agent: agent.to_string(),
            depends_on: deps.iter().map(|d| d.to_string()).collect(),
            condition: String::new(),
        }
    }

    fn error_text(config: &Configuration) -> String {
        validate(config)
            .expect_err("validation should fail")
            .to_string()
    }

    #[test]
    fn test_valid_config_passes() {
        validate(&valid_config()).expect("valid config should pass");
    }

    fn assert_violation(mutate: impl FnOnce(&mut Configuration), want: &str) {
        let mut config = valid_config();
        mutate(&mut config);
        let msg = error_text(&config);
        assert!(msg.contains(want), "error {:?} should contain {:?}", msg, want);
    }

    #[test]
    fn test_required_fields() {
        assert_violation(|c| c.project.name.clear(), "project.name: required");
        assert_violation(|c| c.project.repository.clear(), "project.repository: required");
        assert_violation(|c| c.docker.base_image.clear(), "docker.base_image: required");
        assert_violation(|c| c.agents.clear(), "agents: at least one agent must be defined");
        assert_violation(|c| c.pipeline.clear(), "pipeline: at least one step required");
        assert_violation(
            |c| c.pipeline = vec![step("", "worker", &[])],
            "pipeline[0].name: required",
        );
        assert_violation(
            |c| c.agents.get_mut("worker").unwrap().prompt.system.clear(),
            "agents.worker.prompt.system: required",
        );
        assert_violation(
            |c| c.agents.get_mut("worker").unwrap().prompt.task.clear(),
            "agents.worker.prompt.task: required",
        );
    }

    #[test]
    fn test_step_without_agent_is_allowed() {
        let mut config = valid_config();
        config.pipeline = vec![step("build", "", &[])];
        validate(&config).expect("a step without an agent is accepted");
    }

    #[test]
    fn test_valid_backends() {
        for backend in ["rbw", "env", "file"] {
            let mut config = valid_config();
            config.credentials.backend = backend.to_string();
            assert!(validate(&config).is_ok(), "backend {} should be valid", backend);
        }
    }

    #[test]
    fn test_invalid_backend() {
        let mut config = valid_config();
        config.credentials.backend = "vault".to_string();
        let msg = error_text(&config);
        assert!(msg.contains(r#"credentials.backend: must be one of: rbw, env, file (got "vault")"#));
    }

    #[test]
    fn test_undefined_agent_reference() {
        let mut config = valid_config();
        config.pipeline = vec![step("build", "worker", &[]), step("lint", "nonexistent", &[])];
        let msg = error_text(&config);
        assert!(msg.contains(r#"pipeline[1].agent: references undefined agent "nonexistent""#));
    }

    #[test]
    fn test_undefined_dependency() {
        let mut config = valid_config();
        config.pipeline = vec![step("build", "worker", &["phantom"])];
        let msg = error_text(&config);
        assert!(msg.contains(r#"pipeline[0].depends_on: unknown step "phantom""#));
    }

    #[test]
    fn test_self_and_forward_dependencies_rejected() {
        let mut config = valid_config();
        config.pipeline = vec![
            step("build", "worker", &["build"]),
            step("test", "worker", &["deploy"]),
            step("deploy", "worker", &["test"]),
        ];

        let errs = collect_violations(&config);
        let paths: Vec<&str> = errs.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, vec!["pipeline[0].depends_on", "pipeline[1].depends_on"]);
        assert!(errs.to_string().contains(r#"unknown step "build""#));
        assert!(errs.to_string().contains(r#"unknown step "deploy""#));
    }

    #[test]
    fn test_valid_dependency_chain() {
        let mut config = valid_config();
        config.pipeline = vec![
            step("implement", "worker", &[]),
            step("review", "worker", &["implement"]),
            step("fix", "worker", &["review", "implement"]),
        ];
        validate(&config).expect("backward dependencies resolve");
    }

    #[test]
    fn test_duplicate_step_names_are_not_rejected() {
        let mut config = valid_config();
        config.pipeline = vec![
            step("build", "worker", &[]),
            step("build", "worker", &[]),
            step("test", "worker", &["build"]),
        ];
        validate(&config).expect("duplicates only matter to callers that warn");
    }

    #[test]
    fn test_invalid_workspace() {
        let mut config = valid_config();
        config.agents.get_mut("worker").unwrap().workspace = "readwrite".to_string();
        let msg = error_text(&config);
        assert!(msg.contains(r#"agents.worker.workspace: must be rw or ro (got "readwrite")"#));
    }

    #[test]
    fn test_empty_config_reports_everything() {
        let msg = error_text(&Configuration::default());
        for want in [
            "project.name: required",
            "project.repository: required",
            r#"credentials.backend: must be one of: rbw, env, file (got "")"#,
            "docker.base_image: required",
            "agents: at least one agent must be defined",
            "pipeline: at least one step required",
        ] {
            assert!(msg.contains(want), "error {:?} should contain {:?}", msg, want);
        }
        assert_eq!(msg.lines().count(), 6);
    }

    #[test]
    fn test_agents_checked_in_name_order() {
        let mut config = valid_config();
        for name in ["zeta", "alpha", "mid"] {
            config.agents.insert(name.to_string(), AgentSpec::default());
        }

        let errs = collect_violations(&config);
        let agents: Vec<&str> = errs
            .iter()
            .filter(|v| v.path.ends_with(".prompt.system"))
            .map(|v| v.path.as_str())
            .collect();
        assert_eq!(
            agents,
            vec![
                "agents.alpha.prompt.system",
                "agents.mid.prompt.system",
                "agents.zeta.prompt.system",
            ]
        );
    }

    #[test]
    fn test_all_checks_run_after_failures() {
        let mut config = valid_config();
        config.project.name.clear();
        config.credentials.backend = "vault".to_string();
        config.pipeline = vec![step("", "ghost", &["nowhere"])];

        let errs = collect_violations(&config);
        assert_eq!(errs.len(), 5);
        let text = errs.to_string();
        let order: Vec<usize> = [
            "project.name",
            "credentials.backend",
            "pipeline[0].name",
            "pipeline[0].agent",
            "pipeline[0].depends_on",
        ]
        .iter()
        .map(|p| text.find(p).expect("path present"))
        .collect();
        assert!(order.windows(2).all(|w| w[0] < w[1]), "checks out of order: {}", text);
    }
}
