//! Named predicate and projection registry for config-driven match construction.
//!
//! Closures cannot be written in JSON/YAML. Instead, each custom check or
//! view is registered once under a name, and config refers to it by that
//! name. At registration time the concrete matcher or projection type is
//! erased behind an `Arc<dyn ...>`, the same object the runtime
//! [`Pattern::Predicate`] / [`Pattern::Transform`] nodes hold, so a loaded
//! pattern costs exactly what a hand-built one does.
//!
//! # Two Extension Seams
//!
//! | Seam | Trait | Builder Method | Config node |
//! |------|-------|----------------|-------------|
//! | Predicates | [`ValueMatcher`] | `builder.predicate(name, m)` | `{ type: predicate, name }` |
//! | Projections | [`Projection`] | `builder.projection(name, p)` | `{ type: transform, projection, pattern }` |
//!
//! # Example
//!
//! ```
//! use pmatch::{register_core, MatchConfig, RegistryBuilder, Value};
//!
//! let registry = register_core(RegistryBuilder::new()).build();
//!
//! let config: MatchConfig<String> = serde_json::from_value(serde_json::json!({
//!     "arms": [
//!         { "pattern": { "type": "predicate", "name": "even" }, "action": "even" },
//!         { "pattern": { "type": "wildcard" }, "action": "odd" }
//!     ]
//! })).unwrap();
//!
//! let m = registry.load_match(config).unwrap();
//! assert_eq!(m.evaluate(&Value::from(4)).unwrap(), "even");
//! assert_eq!(m.evaluate(&Value::from(3)).unwrap(), "odd");
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    config::{ArmConfig, GuardConfig, MatchConfig, OperandConfig, PatternConfig},
    Capture, CaptureMode, CompareMatcher, FnMatcher, IsPresent, Len, Match, MatchError, MapFn,
    Pattern, Projection, Unwrap, Value, ValueMatcher, MAX_ARMS, MAX_DEPTH,
    MAX_PATTERNS_PER_COMPOUND,
};

// ═══════════════════════════════════════════════════════════════════════════════
// Builder
// ═══════════════════════════════════════════════════════════════════════════════

/// Builder for constructing a [`Registry`].
///
/// Register predicates and projections by name, then call
/// [`build()`](Self::build) to produce an immutable `Registry`.
///
/// # Immutability after build
///
/// No registration is possible once built; a `Registry` can be shared
/// freely between threads loading configs.
#[derive(Default)]
pub struct RegistryBuilder {
    predicates: HashMap<String, Arc<dyn ValueMatcher>>,
    projections: HashMap<String, Arc<dyn Projection>>,
}

impl RegistryBuilder {
    /// Create a new empty registry builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a [`ValueMatcher`] under `name`.
    ///
    /// A later registration under the same name replaces the earlier one.
    #[must_use]
    pub fn predicate(mut self, name: &str, matcher: impl ValueMatcher + 'static) -> Self {
        self.predicates.insert(name.to_owned(), Arc::new(matcher));
        self
    }

    /// Register a closure predicate under `name`.
    #[must_use]
    pub fn predicate_fn<F>(self, name: &str, f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.predicate(name, FnMatcher::new(name, f))
    }

    /// Register a [`Projection`] under `name`.
    #[must_use]
    pub fn projection(mut self, name: &str, projection: impl Projection + 'static) -> Self {
        self.projections
            .insert(name.to_owned(), Arc::new(projection));
        self
    }

    /// Register a closure projection under `name`.
    #[must_use]
    pub fn projection_fn<F>(self, name: &str, f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.projection(name, MapFn::new(name, f))
    }

    /// Freeze the registry. No further registration is possible.
    #[must_use]
    pub fn build(self) -> Registry {
        Registry {
            predicates: self.predicates,
            projections: self.projections,
        }
    }
}

/// Register the built-in predicates and projections.
///
/// | Name | Kind | Meaning |
/// |------|------|---------|
/// | `even` / `odd` | predicate | integer parity |
/// | `len` | projection | tuple arity, string chars, byte count |
/// | `is_present` | projection | `Bool`: nullable holds a value |
/// | `unwrap` | projection | content of a present nullable |
///
/// # Example
///
/// ```
/// use pmatch::{register_core, RegistryBuilder};
///
/// let registry = register_core(RegistryBuilder::new())
///     .predicate_fn("positive", |v| v.as_int().is_some_and(|i| i > 0))
///     .build();
/// assert!(registry.contains_predicate("positive"));
/// assert!(registry.contains_projection("len"));
/// ```
#[must_use]
pub fn register_core(builder: RegistryBuilder) -> RegistryBuilder {
    builder
        .predicate_fn("even", |v| v.as_int().is_some_and(|i| i % 2 == 0))
        .predicate_fn("odd", |v| v.as_int().is_some_and(|i| i % 2 != 0))
        .projection("len", Len)
        .projection("is_present", IsPresent)
        .projection("unwrap", Unwrap)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Registry
// ═══════════════════════════════════════════════════════════════════════════════

/// Immutable registry of named predicates and projections.
///
/// Constructed via [`RegistryBuilder`]. Use [`load_match()`](Self::load_match)
/// to compile config into a runtime [`Match`].
pub struct Registry {
    predicates: HashMap<String, Arc<dyn ValueMatcher>>,
    projections: HashMap<String, Arc<dyn Projection>>,
}

/// Capture names of one arm, resolved to one [`Capture`] each.
type Scope = HashMap<String, Capture>;

impl Registry {
    /// Load a [`Match`] from configuration.
    ///
    /// Every arm returns a clone of its configured action. Captures are
    /// scoped per arm. The result has passed [`Match::validate_limits`].
    ///
    /// # Errors
    ///
    /// - [`MatchError::TooManyArms`] / [`MatchError::TooManyPatterns`] / [`MatchError::DepthExceeded`]
    /// - [`MatchError::UnknownName`] — predicate or projection not registered
    /// - [`MatchError::InvalidConfig`] — a literal or guard cannot be built
    /// - [`MatchError::InvalidPattern`] — a regex is invalid or too long
    pub fn load_match<A>(&self, config: MatchConfig<A>) -> Result<Match<'static, A>, MatchError>
    where
        A: Clone + Send + Sync + 'static,
    {
        if config.arms.len() > MAX_ARMS {
            return Err(MatchError::TooManyArms {
                count: config.arms.len(),
                max: MAX_ARMS,
            });
        }
        let m = config
            .arms
            .into_iter()
            .try_fold(Match::new(), |m, arm| self.load_arm(m, arm))?;
        m.validate_limits()?;
        tracing::debug!(arms = m.len(), depth = m.depth(), "match loaded");
        Ok(m)
    }

    /// Load a single [`Pattern`] with a fresh capture scope.
    ///
    /// # Errors
    ///
    /// Same as [`load_match()`](Self::load_match), minus the arm count.
    pub fn load_pattern(&self, config: PatternConfig) -> Result<Pattern, MatchError> {
        let pattern = self.load_node(config, &mut Scope::new(), 1)?;
        pattern.validate_limits()?;
        Ok(pattern)
    }

    /// Returns the number of registered predicates.
    #[must_use]
    pub fn predicate_count(&self) -> usize {
        self.predicates.len()
    }

    /// Returns the number of registered projections.
    #[must_use]
    pub fn projection_count(&self) -> usize {
        self.projections.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty() && self.projections.is_empty()
    }

    /// Returns `true` if a predicate is registered under `name`.
    #[must_use]
    pub fn contains_predicate(&self, name: &str) -> bool {
        self.predicates.contains_key(name)
    }

    /// Returns `true` if a projection is registered under `name`.
    #[must_use]
    pub fn contains_projection(&self, name: &str) -> bool {
        self.projections.contains_key(name)
    }

    /// Returns all registered predicate names (sorted).
    #[must_use]
    pub fn predicate_names(&self) -> Vec<&str> {
        sorted_names(&self.predicates)
    }

    /// Returns all registered projection names (sorted).
    #[must_use]
    pub fn projection_names(&self) -> Vec<&str> {
        sorted_names(&self.projections)
    }

    fn load_arm<A>(&self, m: Match<'static, A>, config: ArmConfig<A>) -> Result<Match<'static, A>, MatchError>
    where
        A: Clone + Send + Sync + 'static,
    {
        let pattern = self.load_node(config.pattern, &mut Scope::new(), 1)?;
        let action = config.action;
        Ok(m.arm(pattern, move |_| action.clone()))
    }

    /// Recursively build one node. `depth` is the node's own depth, checked
    /// here so hostile configs fail before they are fully built.
    fn load_node(
        &self,
        config: PatternConfig,
        scope: &mut Scope,
        depth: usize,
    ) -> Result<Pattern, MatchError> {
        if depth > MAX_DEPTH {
            return Err(MatchError::DepthExceeded {
                depth,
                max: MAX_DEPTH,
            });
        }
        let pattern = match config {
            PatternConfig::Wildcard => Pattern::Wildcard,
            PatternConfig::Literal { value } => Pattern::Literal(value.to_value()?),
            PatternConfig::Capture { name, borrowed } => {
                let mode = if borrowed {
                    CaptureMode::Borrowed
                } else {
                    CaptureMode::Owning
                };
                let capture = scope
                    .entry(name)
                    .or_insert_with_key(|name| Capture::with_mode(name, mode));
                if capture.mode() != mode {
                    return Err(MatchError::InvalidConfig {
                        reason: format!(
                            "capture \"{}\" is declared both borrowed and owned in one arm; \
                             use the same `borrowed` flag on every occurrence",
                            capture.name()
                        ),
                    });
                }
                Pattern::capture(capture)
            }
            PatternConfig::Or { patterns } => Pattern::Or(self.load_all(patterns, scope, depth)?),
            PatternConfig::And { patterns } => Pattern::And(self.load_all(patterns, scope, depth)?),
            PatternConfig::Not { pattern } => {
                Pattern::not(self.load_node(*pattern, scope, depth + 1)?)
            }
            PatternConfig::Destructure { patterns } => {
                Pattern::destructure(self.load_all(patterns, scope, depth)?)
            }
            PatternConfig::Segment { pattern } => {
                Pattern::segment(self.load_node(*pattern, scope, depth + 1)?)
            }
            PatternConfig::Field { index, pattern } => {
                Pattern::field(index, self.load_node(*pattern, scope, depth + 1)?)
            }
            PatternConfig::Some { pattern } => {
                Pattern::some(self.load_node(*pattern, scope, depth + 1)?)
            }
            PatternConfig::None => Pattern::none(),
            PatternConfig::String(spec) => Pattern::matcher(spec.to_matcher()?),
            PatternConfig::Compare { op, value } => {
                Pattern::matcher(CompareMatcher::new(op, value.to_value()?))
            }
            PatternConfig::Predicate { name } => {
                Pattern::Predicate(Arc::clone(self.predicate(&name)?))
            }
            PatternConfig::Transform {
                projection,
                pattern,
            } => Pattern::Transform {
                projection: Arc::clone(self.projection(&projection)?),
                pattern: Box::new(self.load_node(*pattern, scope, depth + 1)?),
            },
            PatternConfig::Guard { pattern, condition } => {
                let inner = self.load_node(*pattern, scope, depth + 1)?;
                let check = load_guard(&condition, scope)?;
                Pattern::guard(inner, check)
            }
        };
        Ok(pattern)
    }

    fn load_all(
        &self,
        patterns: Vec<PatternConfig>,
        scope: &mut Scope,
        depth: usize,
    ) -> Result<Vec<Pattern>, MatchError> {
        if patterns.len() > MAX_PATTERNS_PER_COMPOUND {
            return Err(MatchError::TooManyPatterns {
                count: patterns.len(),
                max: MAX_PATTERNS_PER_COMPOUND,
            });
        }
        patterns
            .into_iter()
            .map(|p| self.load_node(p, scope, depth + 1))
            .collect()
    }

    fn predicate(&self, name: &str) -> Result<&Arc<dyn ValueMatcher>, MatchError> {
        self.predicates
            .get(name)
            .ok_or_else(|| MatchError::UnknownName {
                name: name.to_owned(),
                registry: "predicate",
                available: self.predicate_names().into_iter().map(str::to_owned).collect(),
            })
    }

    fn projection(&self, name: &str) -> Result<&Arc<dyn Projection>, MatchError> {
        self.projections
            .get(name)
            .ok_or_else(|| MatchError::UnknownName {
                name: name.to_owned(),
                registry: "projection",
                available: self.projection_names().into_iter().map(str::to_owned).collect(),
            })
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("predicates", &self.predicate_names())
            .field("projections", &self.projection_names())
            .finish()
    }
}

fn sorted_names<T: ?Sized>(map: &HashMap<String, Arc<T>>) -> Vec<&str> {
    let mut names: Vec<&str> = map.keys().map(String::as_str).collect();
    names.sort_unstable();
    names
}

/// Resolve a guard's capture names against the scope of the pattern it guards.
fn load_guard(
    config: &GuardConfig,
    scope: &Scope,
) -> Result<impl Fn(&crate::Bindings<'_>) -> bool + Send + Sync + 'static, MatchError> {
    let bound = |name: &str| {
        scope
            .get(name)
            .cloned()
            .ok_or_else(|| MatchError::InvalidConfig {
                reason: format!("guard refers to capture \"{name}\", which its pattern never binds"),
            })
    };

    enum Operand {
        Capture(Capture),
        Value(Value),
    }

    let lhs = bound(&config.capture)?;
    let rhs = match &config.operand {
        OperandConfig::Capture(name) => Operand::Capture(bound(name)?),
        OperandConfig::Value(value) => Operand::Value(value.to_value()?),
    };
    let op = config.op;

    Ok(move |bindings: &crate::Bindings<'_>| {
        let Some(left) = bindings.get(&lhs) else {
            return false;
        };
        match &rhs {
            Operand::Capture(capture) => bindings
                .get(capture)
                .is_some_and(|right| op.apply(left, right)),
            Operand::Value(right) => op.apply(left, right),
        }
    })
}
