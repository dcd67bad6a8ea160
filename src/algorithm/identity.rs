use serde::Serialize;
use std::fmt;

/// Content address of a source tree plus build configuration
///
/// MD5 over the concatenated MD5 digests of the repository URL, the branch
/// and each compile flag, in that order. Equal identities share one checkout
/// and one build.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn compute<S: AsRef<str>>(git_url: &str, branch: &str, compile_flags: &[S]) -> Self {
        let mut digests = Vec::with_capacity(16 * (2 + compile_flags.len()));
        for part in [git_url, branch]
            .into_iter()
            .chain(compile_flags.iter().map(|flag| flag.as_ref()))
        {
            digests.extend_from_slice(&md5::compute(part.as_bytes()).0);
        }
        Self(format!("{:x}", md5::compute(&digests)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_hex_digest() {
        let id = Identity::compute::<&str>("https://example.com/r.git", "main", &[]);
        assert_eq!(id.as_str().len(), 32);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_identity_matches_nested_digest() {
        let url = md5::compute(b"u").0;
        let branch = md5::compute(b"b").0;
        let flag = md5::compute(b"-DX=On").0;
        let expected = format!("{:x}", md5::compute([url, branch, flag].concat()));

        assert_eq!(Identity::compute("u", "b", &["-DX=On"]).as_str(), expected);
    }

    #[test]
    fn test_flag_order_matters() {
        let a = Identity::compute("u", "main", &["-DA=On", "-DB=On"]);
        let b = Identity::compute("u", "main", &["-DB=On", "-DA=On"]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_boundaries_between_parts_matter() {
        let a = Identity::compute::<&str>("ab", "c", &[]);
        let b = Identity::compute::<&str>("a", "bc", &[]);
        assert_ne!(a, b);
    }
}
