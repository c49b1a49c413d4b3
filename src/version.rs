// src/version.rs

//! Version numbers pulled out of free-form `--version` banners.
//!
//! `redis-server --version` prints something like
//! `Redis server v=7.2.4 sha=00000000:0 malloc=jemalloc-5.3.0 bits=64`;
//! older releases print `Redis server version 2.4.14 (00000000:0)`. We only
//! care about the first dotted numeral in the text.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9]+(?:\.[0-9]+)+").expect("version regex is valid")
});

/// Ordered tuple of numeric version components.
///
/// Ordering is a plain per-component comparison with no zero padding, so
/// `2.6 < 2.6.0` and the two are not equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    parts: Cow<'static, [u64]>,
}

impl Version {
    pub const fn from_static(parts: &'static [u64]) -> Self {
        Self {
            parts: Cow::Borrowed(parts),
        }
    }

    pub fn new(parts: Vec<u64>) -> Self {
        Self {
            parts: Cow::Owned(parts),
        }
    }

    /// Find the first version-looking substring (at least `N.N`, ASCII
    /// digits) in `text`. `None` also when that substring overflows `u64`.
    pub fn find(text: &str) -> Option<Self> {
        let matched = VERSION_RE.find(text)?;
        matched.as_str().parse().ok()
    }

    pub fn parts(&self) -> &[u64] {
        &self.parts
    }

    pub fn major(&self) -> u64 {
        self.parts.first().copied().unwrap_or(0)
    }
}

/// Extract the version from text that is known to contain one.
///
/// # Panics
///
/// Panics when `text` has no dotted numeral, or when the first one has a
/// component that does not fit in a `u64`. Callers are expected to have
/// checked that the executable produced a version banner at all.
pub fn extract_version(text: &str) -> Version {
    let Some(matched) = VERSION_RE.find(text) else {
        panic!("no version number found in {text:?}");
    };
    match matched.as_str().parse() {
        Ok(version) => version,
        Err(e) => panic!("unparseable version number in {text:?}: {e}"),
    }
}

impl FromStr for Version {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .trim()
            .split('.')
            .map(|part| {
                part.parse::<u64>()
                    .map_err(|e| format!("invalid version component {part:?} in {s:?}: {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Version::new(parts))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, part) in self.parts.iter().enumerate() {
            if idx > 0 {
                f.write_str(".")?;
            }
            write!(f, "{part}")?;
        }
        Ok(())
    }
}
