//! Checker registry: maps instruction names to checker factories.
//!
//! Entries are only ever inserted or overwritten, never removed. The
//! process-wide registry is created on first use with the built-in checkers.

use crate::checkers::{
    Checker, EmailChecker, FloatChecker, IntChecker, PostalCodeChecker, StringChecker,
    TimeChecker, UintChecker, UuidChecker,
};
use crate::error::FieldError;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

/// Produces a fresh, unconfigured checker.
pub type CheckerFactory = Arc<dyn Fn() -> Box<dyn Checker> + Send + Sync>;

/// Names registered by [`Registry::with_builtins`].
pub const BUILTIN_CHECKERS: &[&str] = &[
    "string",
    "int",
    "uint",
    "float",
    "email",
    "postalcode",
    "uuid",
    "time",
];

fn factory_of<C: Checker + 'static>(make: fn() -> C) -> CheckerFactory {
    Arc::new(move || Box::new(make()) as Box<dyn Checker>)
}

fn builtin_factory(name: &str) -> Option<CheckerFactory> {
    let factory = match name {
        "string" => factory_of(StringChecker::new),
        "int" => factory_of(IntChecker::new),
        "uint" => factory_of(UintChecker::new),
        "float" => factory_of(FloatChecker::new),
        "email" => factory_of(EmailChecker::new),
        "postalcode" => factory_of(PostalCodeChecker::new),
        "uuid" => factory_of(UuidChecker::new),
        "time" => factory_of(TimeChecker::new),
        _ => return None,
    };
    Some(factory)
}

/// A guarded name → factory map.
///
/// Lookups hold the read lock only long enough to clone the factory handle;
/// factories and checkers always run with the lock released.
#[derive(Default)]
pub struct Registry {
    factories: RwLock<HashMap<String, CheckerFactory>>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every name in [`BUILTIN_CHECKERS`].
    pub fn with_builtins() -> Self {
        let registry = Registry::new();
        {
            let mut factories = registry.factories.write();
            for name in BUILTIN_CHECKERS {
                if let Some(factory) = builtin_factory(name) {
                    factories.insert((*name).to_string(), factory);
                }
            }
        }
        registry
    }

    /// Inserts or overwrites `name`.
    pub fn register<F>(&self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Checker> + Send + Sync + 'static,
    {
        let name = name.into();
        tracing::debug!(checker = %name, "registering checker");
        self.factories.write().insert(name, Arc::new(factory));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.read().contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn factory(&self, name: &str) -> Option<CheckerFactory> {
        self.factories.read().get(name).cloned()
    }

    /// A fresh, unconfigured checker for `name`.
    pub fn create(&self, name: &str) -> Result<Box<dyn Checker>, FieldError> {
        let factory = self
            .factory(name)
            .ok_or_else(|| FieldError::not_registered(name))?;
        Ok(factory())
    }

    /// A checker for `name`, configured from `options`.
    pub fn build(&self, name: &str, options: &[&str]) -> Result<Box<dyn Checker>, FieldError> {
        let mut checker = self.create(name)?;
        checker.configure(options)?;
        Ok(checker)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("names", &self.names())
            .finish()
    }
}

static GLOBAL: LazyLock<Registry> = LazyLock::new(Registry::with_builtins);

/// The process-wide registry used by the crate-root entry points.
pub fn global() -> &'static Registry {
    &GLOBAL
}

/// Registers a checker in the process-wide registry.
pub fn register_checker<F>(name: impl Into<String>, factory: F)
where
    F: Fn() -> Box<dyn Checker> + Send + Sync + 'static,
{
    global().register(name, factory);
}
