// src/watch/tokens.rs

use std::fmt;
use std::path::PathBuf;

type Resolver = Box<dyn Fn() -> String + Send + Sync>;

/// Logical path tokens (e.g. `{project}`) and how to resolve them.
///
/// Resolvers are evaluated on every [`resolve`](Self::resolve) call, so a
/// token can follow state that changes while the host is running. Tokens are
/// substituted in insertion order.
#[derive(Default)]
pub struct PathTokens {
    resolvers: Vec<(String, Resolver)>,
}

impl fmt::Debug for PathTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.resolvers.iter().map(|(token, _)| token))
            .finish()
    }
}

impl PathTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the resolver for `token`.
    pub fn insert<F>(&mut self, token: impl Into<String>, resolver: F)
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        let token = token.into();
        let resolver: Resolver = Box::new(resolver);
        match self.resolvers.iter_mut().find(|(t, _)| *t == token) {
            Some(slot) => slot.1 = resolver,
            None => self.resolvers.push((token, resolver)),
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with<F>(mut self, token: impl Into<String>, resolver: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.insert(token, resolver);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    /// Replace every occurrence of every token in `raw`.
    pub fn resolve(&self, raw: &str) -> PathBuf {
        let mut resolved = raw.to_string();
        for (token, resolver) in &self.resolvers {
            if resolved.contains(token.as_str()) {
                resolved = resolved.replace(token.as_str(), &resolver());
            }
        }
        PathBuf::from(resolved)
    }
}
