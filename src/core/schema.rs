//! Orchestrator configuration schema
//!
//! Plain value types mirroring `orchestrator.yaml`. The serde field names are
//! the document's key names and must not change.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Top-level configuration loaded from `orchestrator.yaml`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Configuration {
    /// Target project
    #[serde(default)]
    pub project: ProjectRef,

    /// Secret backend and its entries
    #[serde(default)]
    pub credentials: CredentialSpec,

    /// Container build settings
    #[serde(default)]
    pub docker: BuildSpec,

    /// Agent definitions keyed by agent name
    #[serde(default)]
    pub agents: BTreeMap<String, AgentSpec>,

    /// Pipeline steps, in declaration order
    #[serde(default)]
    pub pipeline: Vec<StepSpec>,
}

/// Identifies the target repository
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectRef {
    #[serde(default)]
    pub name: String,

    /// Repository URL (not checked for URL syntax)
    #[serde(default)]
    pub repository: String,
}

/// Secret backend configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CredentialSpec {
    /// One of `rbw`, `env`, `file`; kept verbatim so bad values reach the validator
    #[serde(default)]
    pub backend: String,

    #[serde(default)]
    pub secrets: BTreeMap<String, SecretRef>,
}

/// Maps a backend-specific key to an environment variable
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SecretRef {
    /// Backend-specific lookup key
    #[serde(default)]
    pub name: String,

    /// Environment variable exposed to the agent container
    #[serde(default)]
    pub env: String,
}

/// Container build configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BuildSpec {
    #[serde(default)]
    pub base_image: String,

    /// Dockerfile path; empty means the builder's default
    #[serde(default)]
    pub dockerfile: String,

    #[serde(default)]
    pub build_args: BTreeMap<String, String>,
}

/// A single agent's prompt, workspace mode, and capabilities
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AgentSpec {
    #[serde(default)]
    pub prompt: PromptSpec,

    /// `rw` or `ro`, kept verbatim
    #[serde(default)]
    pub workspace: String,

    /// Expected shape of the agent's structured output
    #[serde(default)]
    pub output_schema: BTreeMap<String, Value>,

    /// Tools the agent may invoke
    #[serde(default)]
    pub tools: Vec<String>,
}

/// System and task prompts for an agent
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PromptSpec {
    /// File path or inline text
    #[serde(default)]
    pub system: String,

    /// Task template with `{{.Field}}` placeholders
    #[serde(default)]
    pub task: String,
}

/// A single pipeline step
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StepSpec {
    #[serde(default)]
    pub name: String,

    /// Agent to invoke (key into `Configuration::agents`)
    #[serde(default)]
    pub agent: String,

    /// Names of earlier steps this step waits for
    #[serde(default)]
    pub depends_on: Vec<String>,

    /// Skip condition expression; empty means always run
    #[serde(default)]
    pub condition: String,
}

/// Secret resolution backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Bitwarden via the `rbw` CLI
    Rbw,
    /// Host environment variables
    Env,
    /// Plain files on disk
    File,
}

impl Backend {
    pub const ALL: [Backend; 3] = [Backend::Rbw, Backend::Env, Backend::File];

    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Rbw => "rbw",
            Backend::Env => "env",
            Backend::File => "file",
        }
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Backend::ALL
            .into_iter()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| format!("unknown credentials backend: {}", s))
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filesystem access granted to an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkspaceMode {
    ReadWrite,
    ReadOnly,
}

impl WorkspaceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkspaceMode::ReadWrite => "rw",
            WorkspaceMode::ReadOnly => "ro",
        }
    }
}

impl FromStr for WorkspaceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rw" => Ok(WorkspaceMode::ReadWrite),
            "ro" => Ok(WorkspaceMode::ReadOnly),
            other => Err(format!("unknown workspace mode: {}", other)),
        }
    }
}

impl fmt::Display for WorkspaceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CredentialSpec {
    /// Parsed backend, or `None` if the document holds an unknown value
    pub fn backend_kind(&self) -> Option<Backend> {
        self.backend.parse().ok()
    }
}

impl AgentSpec {
    /// Parsed workspace mode, or `None` if the document holds an unknown value
    pub fn workspace_mode(&self) -> Option<WorkspaceMode> {
        self.workspace.parse().ok()
    }
}

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\{\{-?\s*\.([A-Za-z_][A-Za-z0-9_]*)\s*-?\}\}")
            .expect("placeholder pattern is valid")
    })
}

impl PromptSpec {
    /// Field names referenced by `{{.Field}}` placeholders in the task
    /// template, deduplicated, in order of first appearance.
    ///
    /// Nothing is resolved here; the executor fills these in at run time.
    pub fn placeholders(&self) -> Vec<String> {
        let mut fields: Vec<String> = Vec::new();
        for caps in placeholder_regex().captures_iter(&self.task) {
            let field = &caps[1];
            if !fields.iter().any(|f| f == field) {
                fields.push(field.to_string());
            }
        }
        fields
    }
}

impl Configuration {
    /// Look up an agent by name
    pub fn agent(&self, name: &str) -> Option<&AgentSpec> {
        self.agents.get(name)
    }

    /// Step names declared more than once, in order of first appearance.
    ///
    /// Duplicates are accepted by validation; callers may warn about them.
    pub fn duplicate_step_names(&self) -> Vec<String> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for step in &self.pipeline {
            *counts.entry(step.name.as_str()).or_default() += 1;
        }

        let mut duplicates: Vec<String> = Vec::new();
        for step in &self.pipeline {
            if counts[step.name.as_str()] > 1 && !duplicates.contains(&step.name) {
                duplicates.push(step.name.clone());
            }
        }
        duplicates
    }
}
