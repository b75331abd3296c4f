use crate::params::{join_list, serialize_list, Params};

const ALL: &str = "all";

/// Addressing for bulk torrent commands: one hash, an explicit list, or all.
///
/// Every bulk command takes `impl Into<Target>`, so `"abc"`, `&["a", "b"]`,
/// `vec![..]` and `Target::All` all reach the same request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    One(String),
    Many(Vec<String>),
    All,
}

impl Target {
    pub fn one(hash: impl Into<String>) -> Self {
        Target::One(hash.into())
    }

    pub fn many(hashes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Target::Many(hashes.into_iter().map(Into::into).collect())
    }

    /// Wire value of the `hashes` parameter
    pub fn to_param(&self) -> String {
        match self {
            Target::One(hash) => hash.clone(),
            Target::Many(hashes) => join_list(hashes),
            Target::All => ALL.to_string(),
        }
    }

    /// One-entry parameter map addressing this target under `key`
    pub fn into_params(self, key: &str) -> Params {
        match self {
            Target::Many(hashes) => serialize_list(key, &hashes),
            other => Params::new().with(key, other.to_param()),
        }
    }
}

impl From<&str> for Target {
    fn from(hash: &str) -> Self {
        Target::One(hash.to_string())
    }
}

impl From<String> for Target {
    fn from(hash: String) -> Self {
        Target::One(hash)
    }
}

impl From<&String> for Target {
    fn from(hash: &String) -> Self {
        Target::One(hash.clone())
    }
}

impl From<Vec<String>> for Target {
    fn from(hashes: Vec<String>) -> Self {
        Target::Many(hashes)
    }
}

impl From<Vec<&str>> for Target {
    fn from(hashes: Vec<&str>) -> Self {
        Target::many(hashes)
    }
}

impl From<&[&str]> for Target {
    fn from(hashes: &[&str]) -> Self {
        Target::many(hashes.iter().copied())
    }
}

impl From<&[String]> for Target {
    fn from(hashes: &[String]) -> Self {
        Target::Many(hashes.to_vec())
    }
}

impl<const N: usize> From<&[&str; N]> for Target {
    fn from(hashes: &[&str; N]) -> Self {
        Target::many(hashes.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for Target {
    fn from(hashes: [&str; N]) -> Self {
        Target::many(hashes)
    }
}
