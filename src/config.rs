//! Configuration of a complete run, loaded from TOML.
//!
//! ```
//! use swils::{config::RunConfig, heuristics::Heuristic};
//!
//! let config = RunConfig::from_toml_str(r#"
//!     n = 5
//!     signed = true
//!     heuristics = ["LR", "nb+smp"]
//!
//!     [database]
//!     path = "swils-5.db"
//!     format = "text"
//! "#).unwrap();
//!
//! assert_eq!(config.selection(), [Heuristic::Lr, Heuristic::NbSmp]);
//! assert!(config.validate().is_ok());
//! ```
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    heuristics::Heuristic,
    perm::Permutation,
    problem::{Problem, ProblemKind},
};

fn default_problem() -> u16 {
    ProblemKind::SwiLs.id()
}

/// Settings of a run of the exact search, the heuristic evaluation and the statistics.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RunConfig {
    /// Permutation size.
    pub n: usize,

    /// Whether permutations are signed.
    #[serde(default)]
    pub signed: bool,

    /// Problem identifier.
    #[serde(default = "default_problem")]
    pub problem: u16,

    /// Heuristics included in the statistics, all of them when empty.
    #[serde(default)]
    pub heuristics: Vec<Heuristic>,

    /// Where to store the heuristic results.
    #[serde(default)]
    pub evaluation: Option<PathBuf>,

    /// Number of threads evaluating heuristics, rayon's default when unset.
    #[serde(default)]
    pub threads: Option<usize>,

    /// Single permutation to sort with each selected heuristic instead of running the exact search
    /// and the evaluation, e.g. `"3,-1,2"`.
    #[serde(default)]
    pub permutation: Option<String>,

    /// Where to store the exact distances.
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
}

/// Location and format of a database file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// Output file.
    pub path: PathBuf,

    /// File format.
    #[serde(default)]
    pub format: DatabaseFormat,
}

/// Encoding of a database file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseFormat {
    /// Pairs of native endian integers.
    #[default]
    Binary,

    /// One line per permutation.
    Text,
}

impl RunConfig {
    /// Creates a configuration for the SWI-LS problem evaluating all heuristics without writing
    /// any files.
    pub fn new(n: usize, signed: bool) -> Self {
        RunConfig {
            n,
            signed,
            problem: default_problem(),
            heuristics: vec![],
            evaluation: None,
            threads: None,
            permutation: None,
            database: None,
        }
    }

    /// Loads and validates configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let config = Self::from_toml_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Checks that the configuration describes a supported run.
    pub fn validate(&self) -> Result<()> {
        self.problem()?;
        if self.threads == Some(0) {
            return Err(Error::Config("threads must be positive".to_owned()));
        }
        self.parse_permutation()?;
        Ok(())
    }

    /// Parses the permutation to inspect, if one is configured.
    ///
    /// Fails if it cannot be parsed or its size differs from `n`.
    pub fn parse_permutation(&self) -> Result<Option<Permutation>> {
        let Some(permutation) = &self.permutation else {
            return Ok(None);
        };
        let pi = Permutation::parse(permutation, self.signed)?;
        if pi.len() != self.n {
            return Err(Error::Config(format!(
                "permutation {pi} has {} entries, expected {}",
                pi.len(),
                self.n
            )));
        }
        Ok(Some(pi))
    }

    /// Builds the configured problem.
    pub fn problem(&self) -> Result<Problem> {
        Problem::new(self.problem, self.n, self.signed)
    }

    /// Selected heuristics, all of them if none are configured.
    pub fn selection(&self) -> Vec<Heuristic> {
        if self.heuristics.is_empty() {
            Heuristic::ALL.to_vec()
        } else {
            self.heuristics.clone()
        }
    }

    /// Sets the selected heuristics.
    pub fn with_heuristics(mut self, heuristics: impl IntoIterator<Item = Heuristic>) -> Self {
        self.heuristics = heuristics.into_iter().collect();
        self
    }

    /// Sets the database output.
    pub fn with_database(mut self, path: impl Into<PathBuf>, format: DatabaseFormat) -> Self {
        self.database = Some(DatabaseConfig {
            path: path.into(),
            format,
        });
        self
    }

    /// Sets the evaluation output.
    pub fn with_evaluation(mut self, path: impl Into<PathBuf>) -> Self {
        self.evaluation = Some(path.into());
        self
    }

    /// Sets the permutation to inspect.
    pub fn with_permutation(mut self, permutation: impl Into<String>) -> Self {
        self.permutation = Some(permutation.into());
        self
    }

    /// Sets the number of evaluation threads.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }
}
