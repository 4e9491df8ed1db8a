//! Paths address locations inside a state tree.
//!
//! A path is a sequence of segments, each either an object key or a sequence
//! index. Drafts use paths to record where a write landed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of a [`Path`]: a record key or a sequence index.
///
/// Drafts key their overlay nodes by segment, so `Seg` is `Ord` to sit in a
/// `BTreeMap`. The `path!` macro converts string and integer literals into
/// segments through the `From` impls below.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Seg {
    /// Field of a record.
    Key(String),
    /// Element of a sequence.
    Index(usize),
}

impl Seg {
    /// Key segment.
    #[inline]
    pub fn key(k: impl Into<String>) -> Self {
        Seg::Key(k.into())
    }

    /// Index segment.
    #[inline]
    pub fn index(i: usize) -> Self {
        Seg::Index(i)
    }
}

// Renders as the segment appears inside a displayed path: `.key` or `[idx]`.
impl fmt::Display for Seg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seg::Key(k) => write!(f, ".{}", k),
            Seg::Index(i) => write!(f, "[{}]", i),
        }
    }
}

impl From<&str> for Seg {
    fn from(s: &str) -> Self {
        Seg::Key(s.to_owned())
    }
}

impl From<String> for Seg {
    fn from(s: String) -> Self {
        Seg::Key(s)
    }
}

impl From<usize> for Seg {
    fn from(i: usize) -> Self {
        Seg::Index(i)
    }
}

/// A location in a state tree, built from segments.
///
/// # Examples
///
/// ```
/// use duxide::{path, Path};
///
/// let p = Path::root().key("player").key("hp");
/// assert_eq!(p.to_string(), "$.player.hp");
/// assert_eq!(p, path!("player", "hp"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Path(Vec<Seg>);

impl Path {
    /// The empty path (the whole state).
    #[inline]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Append a key segment (builder style).
    #[inline]
    pub fn key(mut self, k: impl Into<String>) -> Self {
        self.0.push(Seg::Key(k.into()));
        self
    }

    /// Append an index segment (builder style).
    #[inline]
    pub fn index(mut self, i: usize) -> Self {
        self.0.push(Seg::Index(i));
        self
    }

    /// Push a segment in place.
    #[inline]
    pub fn push(&mut self, seg: Seg) {
        self.0.push(seg);
    }

    /// Concatenate with another path.
    ///
    /// # Examples
    ///
    /// ```
    /// use duxide::path;
    ///
    /// let slice = path!("player");
    /// assert_eq!(slice.join(&path!("hp")), path!("player", "hp"));
    /// assert_eq!(slice.join(&path!()), slice);
    /// ```
    #[inline]
    pub fn join(&self, other: &Path) -> Path {
        let mut joined = self.clone();
        joined.0.extend(other.0.iter().cloned());
        joined
    }

    /// The path without its last segment, or `None` at the root.
    ///
    /// # Examples
    ///
    /// ```
    /// use duxide::{path, Path};
    ///
    /// assert_eq!(path!("logs", 0).parent(), Some(path!("logs")));
    /// assert_eq!(Path::root().parent(), None);
    /// ```
    #[inline]
    pub fn parent(&self) -> Option<Path> {
        match self.0.split_last() {
            Some((_, rest)) => Some(Path(rest.to_vec())),
            None => None,
        }
    }

    /// The segments making up this path.
    #[inline]
    pub fn segments(&self) -> &[Seg] {
        &self.0
    }

    /// True for the root path.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of segments.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for seg in &self.0 {
            write!(f, "{}", seg)?;
        }
        Ok(())
    }
}

/// Construct a [`Path`] from a sequence of segments.
///
/// String literals become key segments, integers become index segments.
///
/// # Examples
///
/// ```
/// use duxide::path;
///
/// let p = path!("logs", 0);
/// assert_eq!(p.to_string(), "$.logs[0]");
/// ```
#[macro_export]
macro_rules! path {
    () => {
        $crate::Path::root()
    };
    ($($seg:expr),+ $(,)?) => {{
        let mut p = $crate::Path::root();
        $(
            p.push($crate::Seg::from($seg));
        )+
        p
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_from_segments() {
        let p = Path::root().key("enemies").index(2).key("hp");
        assert_eq!(p.len(), 3);
        assert_eq!(p.segments()[0], Seg::key("enemies"));
        assert_eq!(p.segments()[1], Seg::index(2));
    }

    #[test]
    fn displays_like_a_json_path() {
        assert_eq!(Path::root().to_string(), "$");
        assert_eq!(path!("a", 0, "b").to_string(), "$.a[0].b");
    }

    #[test]
    fn macro_matches_builder() {
        assert_eq!(path!("game", "turn"), Path::root().key("game").key("turn"));
        assert_eq!(path!(), Path::root());
    }

    #[test]
    fn join_concatenates_segments() {
        let slice = path!("enemies", 0);
        assert_eq!(slice.join(&path!("hp")), path!("enemies", 0, "hp"));
        assert_eq!(slice.join(&path!()), slice);
        assert_eq!(path!().join(&slice), slice);
    }

    #[test]
    fn parent_drops_the_last_segment() {
        let p = path!("game", "turn");
        assert_eq!(p.parent(), Some(path!("game")));
        assert_eq!(path!("game").parent(), Some(Path::root()));
        assert_eq!(Path::root().parent(), None);
    }

    #[test]
    fn serde_round_trip() {
        let p = path!("logs", 3);
        let json = serde_json::to_string(&p).unwrap();
        let parsed: Path = serde_json::from_str(&json).unwrap();
        assert_eq!(p, parsed);
    }
}
