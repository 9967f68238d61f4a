use crate::ComposeError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Network memberships, accepted either as a single name or a list of names.
///
/// Topology files may write `networks = "frontend"` as shorthand for
/// `networks = ["frontend"]`; both construct the same unit. Any other shape
/// is rejected at parse time.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Networks {
    One(String),
    Many(Vec<String>),
}

impl Networks {
    /// Normalize into the list form stored on a unit.
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(name) => vec![name],
            Self::Many(names) => names,
        }
    }
}

impl Default for Networks {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl From<&str> for Networks {
    fn from(name: &str) -> Self {
        Self::One(name.to_owned())
    }
}

impl From<String> for Networks {
    fn from(name: String) -> Self {
        Self::One(name)
    }
}

impl From<Vec<String>> for Networks {
    fn from(names: Vec<String>) -> Self {
        Self::Many(names)
    }
}

impl From<Vec<&str>> for Networks {
    fn from(names: Vec<&str>) -> Self {
        Self::Many(names.into_iter().map(str::to_owned).collect())
    }
}

/// A single deployable service: its template lines, placeholder bindings,
/// network memberships, and source repository coordinates.
///
/// The repository link is a template URL carrying the literal `$TOKEN`
/// placeholder; the credential replaces it only when a clone command is
/// spawned and never appears in rendered output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceUnit {
    name: String,
    template_lines: Vec<String>,
    variables: IndexMap<String, String>,
    networks: Vec<String>,
    repo_link: String,
    credential: String,
}

impl ServiceUnit {
    pub fn new(
        name: impl Into<String>,
        template_lines: Vec<String>,
        repo_link: impl Into<String>,
        credential: impl Into<String>,
        networks: impl Into<Networks>,
    ) -> Result<Self, ComposeError> {
        let name = name.into();
        validate_service_name(&name)?;

        let networks = networks.into().into_vec();
        if networks.iter().any(|net| net.trim().is_empty()) {
            return Err(ComposeError::EmptyNetwork { service: name });
        }

        Ok(Self {
            name,
            template_lines,
            variables: IndexMap::new(),
            networks,
            repo_link: repo_link.into(),
            credential: credential.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn template_lines(&self) -> &[String] {
        &self.template_lines
    }

    pub fn variables(&self) -> &IndexMap<String, String> {
        &self.variables
    }

    /// Networks as declared; duplicates across units are the manifest's
    /// concern and are not collapsed here.
    pub fn networks(&self) -> &[String] {
        &self.networks
    }

    pub fn repo_link(&self) -> &str {
        &self.repo_link
    }

    pub(crate) fn credential(&self) -> &str {
        &self.credential
    }

    /// Bind a placeholder token to a value, stringified at binding time.
    /// Rebinding a token overwrites its value but keeps its original
    /// position in the substitution order.
    pub fn set_var(&mut self, token: impl Into<String>, value: impl ToString) -> &mut Self {
        self.variables.insert(token.into(), value.to_string());
        self
    }

    /// Render this unit's block of the services section.
    ///
    /// Each bound token is replaced wherever its exact text occurs, across
    /// all bindings in insertion order. Substitution is literal: a bound
    /// value that itself contains a later binding's token gets that token
    /// substituted too. Template indentation is emitted verbatim; the block
    /// is the `  <name>:` header, the substituted lines, and one trailing
    /// empty line.
    pub fn render_block(&self) -> Vec<String> {
        let mut block = Vec::with_capacity(self.template_lines.len() + 2);
        block.push(format!("  {}:", self.name));
        for template in &self.template_lines {
            let mut line = template.clone();
            for (token, value) in &self.variables {
                line = line.replace(token.as_str(), value);
            }
            block.push(line);
        }
        block.push(String::new());
        block
    }
}

fn validate_service_name(name: &str) -> Result<(), ComposeError> {
    if name.is_empty() || name.len() > 64 {
        return Err(ComposeError::InvalidServiceName(name.to_owned()));
    }
    if !name
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b == b'.')
    {
        return Err(ComposeError::InvalidServiceName(name.to_owned()));
    }
    Ok(())
}
