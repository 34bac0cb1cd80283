//! Glob matching for artifact definitions.
//!
//! Paths are matched segment by segment on their `/`-separated relative form.
//! `*` and `?` never cross a segment boundary; a `**` segment matches any
//! number of segments, including none.

use buildpipe_task::ArtifactDefinition;

use crate::error::ArtifactError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
  AnyDepth,
  Glob(Vec<char>),
}

/// A single compiled glob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
  raw: String,
  segments: Vec<Segment>,
}

impl Pattern {
  /// Compile a relative glob. Returns the reason on rejection.
  pub fn parse(raw: &str) -> Result<Self, &'static str> {
    if raw.is_empty() {
      return Err("pattern is empty");
    }
    if raw.starts_with('/') {
      return Err("pattern must be relative");
    }

    let mut segments = Vec::new();
    for part in raw.split('/') {
      match part {
        "" | "." => continue,
        ".." => return Err("pattern must not leave the component directory"),
        "**" => {
          // consecutive `**` segments are equivalent to one
          if segments.last() != Some(&Segment::AnyDepth) {
            segments.push(Segment::AnyDepth);
          }
        }
        glob => segments.push(Segment::Glob(glob.chars().collect())),
      }
    }
    if segments.is_empty() {
      return Err("pattern matches no path");
    }

    Ok(Self {
      raw: raw.to_string(),
      segments,
    })
  }

  pub fn as_str(&self) -> &str {
    &self.raw
  }

  /// Match a `/`-separated relative path.
  pub fn is_match(&self, path: &str) -> bool {
    let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
    match_segments(&self.segments, &parts)
  }
}

// Both matchers only ever backtrack to the most recent wildcard.
fn match_segments(segments: &[Segment], parts: &[&str]) -> bool {
  let (mut s, mut p) = (0, 0);
  // segment after the last `**` and the part it is currently resumed from
  let mut resume: Option<(usize, usize)> = None;

  while p < parts.len() {
    match segments.get(s) {
      Some(Segment::AnyDepth) => {
        resume = Some((s + 1, p));
        s += 1;
      }
      Some(Segment::Glob(glob)) if match_glob(glob, parts[p]) => {
        s += 1;
        p += 1;
      }
      _ => match resume {
        Some((next, from)) => {
          resume = Some((next, from + 1));
          s = next;
          p = from + 1;
        }
        None => return false,
      },
    }
  }

  segments[s..].iter().all(|segment| *segment == Segment::AnyDepth)
}

fn match_glob(glob: &[char], part: &str) -> bool {
  let text: Vec<char> = part.chars().collect();
  let (mut g, mut t) = (0, 0);
  let mut resume: Option<(usize, usize)> = None;

  while t < text.len() {
    match glob.get(g).copied() {
      Some('*') => {
        resume = Some((g + 1, t));
        g += 1;
      }
      Some('?') => {
        g += 1;
        t += 1;
      }
      Some(c) if c == text[t] => {
        g += 1;
        t += 1;
      }
      _ => match resume {
        Some((next, from)) => {
          resume = Some((next, from + 1));
          g = next;
          t = from + 1;
        }
        None => return false,
      },
    }
  }

  glob[g..].iter().all(|c| *c == '*')
}

/// Include/exclude pattern set compiled from one [`ArtifactDefinition`].
#[derive(Debug, Clone)]
pub struct ArtifactMatcher {
  includes: Vec<Pattern>,
  excludes: Vec<Pattern>,
}

impl ArtifactMatcher {
  pub fn from_definition(definition: &ArtifactDefinition) -> Result<Self, ArtifactError> {
    let mut includes = Vec::new();
    let mut excludes = Vec::new();

    for raw in &definition.patterns {
      let (target, glob) = match raw.strip_prefix('!') {
        Some(glob) => (&mut excludes, glob),
        None => (&mut includes, raw.as_str()),
      };
      let pattern = Pattern::parse(glob).map_err(|reason| ArtifactError::InvalidPattern {
        artifact: definition.name.clone(),
        pattern: raw.clone(),
        reason: reason.to_string(),
      })?;
      target.push(pattern);
    }

    Ok(Self { includes, excludes })
  }

  /// A path is selected when an include matches and no exclude does.
  pub fn is_match(&self, path: &str) -> bool {
    self.includes.iter().any(|p| p.is_match(path)) && !self.excludes.iter().any(|p| p.is_match(path))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn pattern(raw: &str) -> Pattern {
    Pattern::parse(raw).unwrap()
  }

  #[test]
  fn test_star_stays_within_segment() {
    let p = pattern("dist/*.js");
    assert!(p.is_match("dist/index.js"));
    assert!(!p.is_match("dist/esm/index.js"));
    assert!(!p.is_match("index.js"));
  }

  #[test]
  fn test_double_star_matches_any_depth() {
    let p = pattern("dist/**/*.d.ts");
    assert!(p.is_match("dist/index.d.ts"));
    assert!(p.is_match("dist/types/button/index.d.ts"));
    assert!(!p.is_match("src/index.d.ts"));

    let all = pattern("**");
    assert!(all.is_match("a"));
    assert!(all.is_match("a/b/c"));
  }

  #[test]
  fn test_star_backtracks_to_later_occurrence() {
    assert!(pattern("*.min.js").is_match("app.min.min.js"));
    assert!(pattern("a*b*c").is_match("abxbc"));
    assert!(!pattern("a*b*c").is_match("abxbd"));
    assert!(pattern("dist/**/types/*.d.ts").is_match("dist/types/x/types/index.d.ts"));
    assert!(!pattern("dist/**/types/*.d.ts").is_match("dist/types/x/index.d.ts"));
    assert!(pattern("**/dist").is_match("dist"));
    assert!(!pattern("**/dist").is_match("dist/index.js"));
  }

  #[test]
  fn test_many_wildcards_match_in_bounded_time() {
    let started = std::time::Instant::now();

    let name = "a".repeat(40);
    assert!(!pattern("*a*a*a*a*a*a*a*a*a*b").is_match(&name));
    assert!(pattern("*a*a*a*a*a*a*a*a*a*a").is_match(&name));

    let deep = vec!["a"; 40].join("/");
    assert!(!pattern("**/a/**/a/**/a/**/a/**/a/**/a/**/b").is_match(&deep));
    assert!(pattern("**/a/**/a/**/a/**/a/**/a/**/a/**/a").is_match(&deep));

    assert!(started.elapsed() < std::time::Duration::from_secs(1));
  }

  #[test]
  fn test_pattern_keeps_raw_text() {
    assert_eq!(pattern("./dist//*.js").as_str(), "./dist//*.js");
  }

  #[test]
  fn test_question_mark_matches_single_char() {
    let p = pattern("file?.txt");
    assert!(p.is_match("file1.txt"));
    assert!(!p.is_match("file10.txt"));
    assert!(!p.is_match("file.txt"));
  }

  #[test]
  fn test_parse_rejects_invalid_patterns() {
    assert!(Pattern::parse("").is_err());
    assert!(Pattern::parse("/abs/*.js").is_err());
    assert!(Pattern::parse("../outside/*").is_err());
    assert!(Pattern::parse("./").is_err());
  }

  #[test]
  fn test_dot_segments_are_ignored() {
    let p = pattern("./dist//*.js");
    assert!(p.is_match("dist/index.js"));
  }

  #[test]
  fn test_matcher_applies_excludes() {
    let definition = ArtifactDefinition::new("dist", ["dist/**", "!dist/**/*.map"]);
    let matcher = ArtifactMatcher::from_definition(&definition).unwrap();

    assert!(matcher.is_match("dist/index.js"));
    assert!(!matcher.is_match("dist/index.js.map"));
    assert!(!matcher.is_match("src/index.ts"));
  }

  #[test]
  fn test_matcher_with_only_excludes_selects_nothing() {
    let definition = ArtifactDefinition::new("none", ["!*.map"]);
    let matcher = ArtifactMatcher::from_definition(&definition).unwrap();
    assert!(!matcher.is_match("index.js"));
  }

  #[test]
  fn test_matcher_reports_bad_pattern() {
    let definition = ArtifactDefinition::new("bad", ["!../x"]);
    let err = ArtifactMatcher::from_definition(&definition).unwrap_err();
    assert!(matches!(
      err,
      ArtifactError::InvalidPattern { ref artifact, ref pattern, .. }
        if artifact == "bad" && pattern == "!../x"
    ));
  }
}
