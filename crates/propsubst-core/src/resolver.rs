//! The placeholder resolver
//!
//! A [`Resolver`] owns a flat store of raw entries and expands `${key}`
//! placeholders on lookup. A referenced value may itself contain
//! placeholders; nesting is tracked on an explicit heap stack of frames, so
//! arbitrarily long reference chains never grow the call stack. The keys on
//! that stack form the resolution path, and reaching one of them again is a
//! circular reference.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::interpolation::{self, PlaceholderScanner, Segment};
use crate::options::{MissingKeyPolicy, ResolverOptions};
use crate::source::PropertySource;

/// Resolves `${key}` placeholders against a store of raw entries
///
/// The store can only change through `&mut self`, so it is fixed for the
/// duration of any lookup. Lookups keep no state between calls.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    /// Raw (unresolved) entries in insertion order
    raw: IndexMap<String, String>,
    /// Resolution options
    options: ResolverOptions,
}

/// A raw value being expanded: where the scan stands and what it produced
struct Frame<'a> {
    key: &'a str,
    scanner: PlaceholderScanner<'a>,
    out: String,
}

impl<'a> Frame<'a> {
    fn new(key: &'a str, raw: &'a str) -> Self {
        Self {
            key,
            scanner: PlaceholderScanner::new(raw),
            out: String::with_capacity(raw.len()),
        }
    }
}

/// Keys currently being expanded in one top-level lookup, outermost first
#[derive(Default)]
struct ResolutionPath<'a> {
    frames: Vec<Frame<'a>>,
    in_flight: HashSet<&'a str>,
}

impl<'a> ResolutionPath<'a> {
    fn contains(&self, key: &str) -> bool {
        self.in_flight.contains(key)
    }

    fn push(&mut self, frame: Frame<'a>) {
        self.in_flight.insert(frame.key);
        self.frames.push(frame);
    }

    fn pop(&mut self) -> Option<Frame<'a>> {
        let frame = self.frames.pop()?;
        self.in_flight.remove(frame.key);
        Some(frame)
    }

    fn current(&mut self) -> Option<&mut Frame<'a>> {
        self.frames.last_mut()
    }

    /// The path followed by `key`, for error reporting
    fn chain_to(&self, key: &str) -> Vec<String> {
        self.frames
            .iter()
            .map(|f| f.key.to_string())
            .chain(std::iter::once(key.to_string()))
            .collect()
    }
}

impl Resolver {
    /// Create an empty resolver with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty resolver with custom options
    pub fn with_options(options: ResolverOptions) -> Self {
        Self {
            raw: IndexMap::new(),
            options,
        }
    }

    /// Create a resolver holding a copy of every entry in `source`
    pub fn from_source<S: PropertySource + ?Sized>(source: &S) -> Self {
        Self::from_source_with_options(source, ResolverOptions::default())
    }

    /// Create a resolver from a source with custom options
    pub fn from_source_with_options<S: PropertySource + ?Sized>(
        source: &S,
        options: ResolverOptions,
    ) -> Self {
        let mut resolver = Self::with_options(options);
        for name in source.property_names() {
            if let Some(value) = source.raw_property(&name) {
                resolver.raw.insert(name, value);
            }
        }
        log::debug!("Loaded {} raw entries into resolver", resolver.raw.len());
        resolver
    }

    /// Add or replace a raw entry, returning the previous raw value
    pub fn insert(&mut self, key: impl Into<String>, raw: impl Into<String>) -> Option<String> {
        self.raw.insert(key.into(), raw.into())
    }

    /// The active options
    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Get the raw (unresolved) value of a key
    pub fn get_raw(&self, key: &str) -> Option<&str> {
        self.raw.get(key).map(String::as_str)
    }

    /// Check whether the store defines `key`
    pub fn contains_key(&self, key: &str) -> bool {
        self.raw.contains_key(key)
    }

    /// All keys, in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.raw.keys().map(String::as_str)
    }

    /// Number of raw entries
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Get the fully resolved value of a key
    ///
    /// Returns `Ok(None)` when the key is not defined. Fails when the value
    /// (directly or through other keys) refers back to a key that is still
    /// being resolved.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let Some(raw) = self.raw.get(key) else {
            return Ok(None);
        };

        if !interpolation::contains_placeholder(raw) {
            return Ok(Some(raw.clone()));
        }

        let mut path = ResolutionPath::default();
        path.push(Frame::new(key, raw));
        self.expand(&mut path).map(Some)
    }

    /// Get the fully resolved value of a key, or `default` when it is not defined
    ///
    /// A circular reference is still an error; the default only covers absence.
    pub fn get_or_default(&self, key: &str, default: &str) -> Result<String> {
        Ok(self.get(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// Resolve every entry, in insertion order
    ///
    /// The first failing key aborts the whole operation.
    pub fn resolve_all(&self) -> Result<IndexMap<String, String>> {
        log::debug!("Resolving all {} entries", self.raw.len());
        let mut resolved = IndexMap::with_capacity(self.raw.len());
        for key in self.raw.keys() {
            let value = self.get(key)?.unwrap_or_default();
            resolved.insert(key.clone(), value);
        }
        Ok(resolved)
    }

    /// Run the frames on `path` to completion and return the outermost output
    fn expand<'a>(&'a self, path: &mut ResolutionPath<'a>) -> Result<String> {
        let mut resolved = String::new();

        while let Some(frame) = path.current() {
            match frame.scanner.next() {
                Some(Segment::Literal(text)) => frame.out.push_str(text),
                Some(Segment::Placeholder { key, token }) => {
                    self.enter_placeholder(key, token, path)?;
                }
                None => {
                    if let Some(done) = path.pop() {
                        match path.current() {
                            Some(parent) => parent.out.push_str(&done.out),
                            None => resolved = done.out,
                        }
                    }
                }
            }
        }

        Ok(resolved)
    }

    /// Handle a placeholder found in the innermost frame
    ///
    /// Plain and missing values are written straight into that frame; a value
    /// with placeholders of its own becomes a new frame.
    fn enter_placeholder<'a>(
        &'a self,
        key: &'a str,
        token: &'a str,
        path: &mut ResolutionPath<'a>,
    ) -> Result<()> {
        if path.contains(key) {
            return Err(Error::circular_reference(key, path.chain_to(key)));
        }

        let raw = self.raw.get(key);
        if let Some(raw) = raw.filter(|r| interpolation::contains_placeholder(r)) {
            path.push(Frame::new(key, raw));
            return Ok(());
        }

        let Some(frame) = path.current() else {
            return Ok(());
        };
        log::trace!("Resolving '{}' referenced from '{}'", key, frame.key);
        match raw {
            Some(value) => {
                frame.out.push_str(value);
                Ok(())
            }
            None => self.substitute_missing(key, token, frame.key, &mut frame.out),
        }
    }

    /// Apply the missing-key policy for a placeholder whose key is undefined
    fn substitute_missing(
        &self,
        key: &str,
        token: &str,
        referenced_from: &str,
        result: &mut String,
    ) -> Result<()> {
        match self.options.missing_key {
            MissingKeyPolicy::Empty => {
                log::warn!(
                    "Key '{}' referenced from '{}' is not defined; substituting an empty string",
                    key,
                    referenced_from
                );
                Ok(())
            }
            MissingKeyPolicy::Keep => {
                log::warn!(
                    "Key '{}' referenced from '{}' is not defined; keeping '{}'",
                    key,
                    referenced_from,
                    token
                );
                result.push_str(token);
                Ok(())
            }
            MissingKeyPolicy::Error => Err(Error::key_not_found(
                key,
                Some(referenced_from.to_string()),
            )),
        }
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Resolver {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, raw) in iter {
            self.insert(key, raw);
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Resolver {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut resolver = Self::new();
        resolver.extend(iter);
        resolver
    }
}
