//! Path-based access rules consulted by the access gate.
//!
//! Rules are checked in order; the first matching pattern decides. Paths no rule matches
//! require an authenticated session.

use crate::services::auth::{Authorities, AuthenticatedSession};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// `*`: exactly one segment
    Any,
    /// `**`: zero or more trailing segments
    Rest,
}

/// `/actuator/**`-style path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    segments: Vec<Segment>,
}

fn split(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

impl PathPattern {
    /// `**` is only allowed as the last segment.
    pub fn parse(pattern: &str) -> Result<Self, String> {
        let parts: Vec<&str> = split(pattern).collect();
        let mut segments = Vec::with_capacity(parts.len());

        for (i, part) in parts.iter().enumerate() {
            let segment = match *part {
                "**" if i + 1 == parts.len() => Segment::Rest,
                "**" => return Err(format!("'**' must be the last segment: {pattern}")),
                "*" => Segment::Any,
                literal => Segment::Literal(literal.to_string()),
            };
            segments.push(segment);
        }

        Ok(Self { segments })
    }

    /// Every segment of `path` taken literally.
    pub fn exact(path: &str) -> Self {
        Self {
            segments: split(path)
                .map(|part| Segment::Literal(part.to_string()))
                .collect(),
        }
    }

    /// `prefix` itself and everything below it, i.e. `<prefix>/**`.
    pub fn subtree(prefix: &str) -> Self {
        let mut pattern = Self::exact(prefix);
        pattern.segments.push(Segment::Rest);
        pattern
    }

    pub fn matches(&self, path: &str) -> bool {
        let mut parts = split(path);

        for segment in &self.segments {
            match segment {
                Segment::Rest => return true,
                Segment::Any => {
                    if parts.next().is_none() {
                        return false;
                    }
                }
                Segment::Literal(expected) => match parts.next() {
                    Some(part) if part == expected => {}
                    _ => return false,
                },
            }
        }

        parts.next().is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    PermitAll,
    Authenticated,
    HasAnyAuthority(Authorities),
}

impl Access {
    pub fn requires_authentication(&self) -> bool {
        !matches!(self, Access::PermitAll)
    }

    /// Only meaningful for protected rules.
    pub fn is_granted(&self, session: &AuthenticatedSession) -> bool {
        match self {
            Access::PermitAll | Access::Authenticated => true,
            Access::HasAnyAuthority(required) => session.has_any_authority(required),
        }
    }
}

static FALLBACK: Access = Access::Authenticated;

#[derive(Debug, Clone)]
pub struct AccessPolicy {
    rules: Vec<(PathPattern, Access)>,
}

impl Default for AccessPolicy {
    /// `/error` and `/actuator/**` are public, everything else needs a session.
    fn default() -> Self {
        Self::empty()
            .rule(PathPattern::exact("/error"), Access::PermitAll)
            .rule(PathPattern::subtree("/actuator"), Access::PermitAll)
    }
}

impl AccessPolicy {
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Appended after the existing rules.
    pub fn rule(mut self, pattern: PathPattern, access: Access) -> Self {
        self.rules.push((pattern, access));
        self
    }

    /// Parses `pattern`; an invalid pattern is returned as an error.
    pub fn has_any_authority(
        self,
        pattern: &str,
        authorities: Authorities,
    ) -> Result<Self, String> {
        let pattern = PathPattern::parse(pattern)?;
        Ok(self.rule(pattern, Access::HasAnyAuthority(authorities)))
    }

    pub fn access_for(&self, path: &str) -> &Access {
        self.rules
            .iter()
            .find(|(pattern, _)| pattern.matches(path))
            .map(|(_, access)| access)
            .unwrap_or(&FALLBACK)
    }
}
