//! Libraries installed on a task's cluster.

use dbx_schema::{Describe, Schema};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PythonPyPiLibrary {
    pub package: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
}

impl Describe for PythonPyPiLibrary {
    fn schema() -> Schema {
        Schema::record("PythonPyPiLibrary")
            .required("package", Schema::string())
            .optional("repo", Schema::string())
            .build()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MavenLibrary {
    pub coordinates: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusions: Option<Vec<String>>,
}

impl Describe for MavenLibrary {
    fn schema() -> Schema {
        Schema::record("MavenLibrary")
            .required("coordinates", Schema::string())
            .optional("repo", Schema::string())
            .optional("exclusions", Vec::<String>::schema())
            .build()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RCranLibrary {
    pub package: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
}

impl Describe for RCranLibrary {
    fn schema() -> Schema {
        Schema::record("RCranLibrary")
            .required("package", Schema::string())
            .optional("repo", Schema::string())
            .build()
    }
}

/// A library source; one field is set per entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Library {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub egg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pypi: Option<PythonPyPiLibrary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maven: Option<MavenLibrary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cran: Option<RCranLibrary>,
}

impl Library {
    pub fn jar(uri: impl Into<String>) -> Self {
        Self {
            jar: Some(uri.into()),
            ..Default::default()
        }
    }
}

impl Describe for Library {
    fn schema() -> Schema {
        Schema::record("Library")
            .optional("jar", Schema::string())
            .optional("egg", Schema::string())
            .optional("whl", Schema::string())
            .optional("pypi", PythonPyPiLibrary::schema())
            .optional("maven", MavenLibrary::schema())
            .optional("cran", RCranLibrary::schema())
            .build()
    }
}
