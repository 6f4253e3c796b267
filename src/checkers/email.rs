//! Email syntax checking with an optional MX-record lookup for the domain.

use super::{Checker, options};
use crate::enums::Kind;
use crate::error::{FieldError, MxLookupError};
use crate::types::{Scalar, Shape, Validatable};
use regex::Regex;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .unwrap()
});

// ─── MX lookup ──────────────────────────────────────────────────────────────

/// Extension point for resolving a domain's MX records.
pub trait MxResolver: Send + Sync {
    /// Returns the mail exchanger host names for `domain`.
    fn lookup_mx(&self, domain: &str) -> Result<Vec<String>, MxLookupError>;
}

/// Bounds for a DNS MX lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MxLookupConfig {
    /// Per-attempt timeout.
    pub timeout: Duration,
    pub attempts: usize,
}

impl Default for MxLookupConfig {
    fn default() -> Self {
        MxLookupConfig {
            timeout: Duration::from_secs(5),
            attempts: 2,
        }
    }
}

/// MX resolver backed by the system DNS configuration.
///
/// hickory's synchronous resolver drives a runtime of its own, which may not
/// start, block or be dropped on a thread that already drives one. Each lookup
/// therefore builds and runs its resolver on a scoped worker thread, so the
/// checker is safe to call from inside an async host.
#[cfg(feature = "mx-lookup")]
#[derive(Clone, Debug)]
pub struct DnsMxResolver {
    config: hickory_resolver::config::ResolverConfig,
    opts: hickory_resolver::config::ResolverOpts,
}

#[cfg(feature = "mx-lookup")]
impl DnsMxResolver {
    /// Reads the system configuration (falling back to the library defaults
    /// when it cannot be read) and bounds it by `config`.
    pub fn new(config: &MxLookupConfig) -> Self {
        use hickory_resolver::config::{ResolverConfig, ResolverOpts};

        let (resolver_config, mut opts) = hickory_resolver::system_conf::read_system_conf()
            .unwrap_or_else(|e| {
                tracing::debug!(error = %e, "system resolver config unavailable, using defaults");
                (ResolverConfig::default(), ResolverOpts::default())
            });
        opts.timeout = config.timeout;
        opts.attempts = config.attempts;
        DnsMxResolver {
            config: resolver_config,
            opts,
        }
    }

    fn lookup_blocking(&self, domain: &str) -> Result<Vec<String>, MxLookupError> {
        let resolver = hickory_resolver::Resolver::new(self.config.clone(), self.opts.clone())
            .map_err(|e| MxLookupError::new(format!("failed to build resolver: {}", e)))?;
        let lookup = resolver
            .mx_lookup(domain)
            .map_err(|e| MxLookupError::new(e.to_string()))?;
        Ok(lookup.iter().map(|mx| mx.exchange().to_utf8()).collect())
    }
}

#[cfg(feature = "mx-lookup")]
impl MxResolver for DnsMxResolver {
    fn lookup_mx(&self, domain: &str) -> Result<Vec<String>, MxLookupError> {
        std::thread::scope(|scope| {
            scope
                .spawn(|| self.lookup_blocking(domain))
                .join()
                .unwrap_or_else(|_| Err(MxLookupError::new("MX lookup worker panicked")))
        })
    }
}

/// Stand-in used when the `mx-lookup` feature is disabled.
#[cfg(not(feature = "mx-lookup"))]
struct UnavailableMxResolver;

#[cfg(not(feature = "mx-lookup"))]
impl MxResolver for UnavailableMxResolver {
    fn lookup_mx(&self, _domain: &str) -> Result<Vec<String>, MxLookupError> {
        Err(MxLookupError::new(
            "MX lookup support is not enabled (feature `mx-lookup`)",
        ))
    }
}

static DEFAULT_RESOLVER: LazyLock<Arc<dyn MxResolver>> = LazyLock::new(build_default_resolver);

#[cfg(feature = "mx-lookup")]
fn build_default_resolver() -> Arc<dyn MxResolver> {
    Arc::new(DnsMxResolver::new(&MxLookupConfig::default()))
}

#[cfg(not(feature = "mx-lookup"))]
fn build_default_resolver() -> Arc<dyn MxResolver> {
    Arc::new(UnavailableMxResolver)
}

/// The process-wide resolver used by email checkers without their own.
pub fn default_mx_resolver() -> Arc<dyn MxResolver> {
    Arc::clone(&DEFAULT_RESOLVER)
}

// ─── Checker ────────────────────────────────────────────────────────────────

/// Email syntax, plus the MX lookup when `checkdomainmx` is set.
#[derive(Clone, Default)]
pub struct EmailChecker {
    pub required: bool,
    pub check_domain_mx: bool,
    resolver: Option<Arc<dyn MxResolver>>,
}

impl EmailChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// A checker whose MX lookups go through `resolver`.
    pub fn with_resolver(resolver: Arc<dyn MxResolver>) -> Self {
        EmailChecker {
            resolver: Some(resolver),
            ..Self::default()
        }
    }

    fn check_domain(&self, domain: &str, field_name: &str) -> Result<(), FieldError> {
        let resolver = self.resolver.clone().unwrap_or_else(default_mx_resolver);
        match resolver.lookup_mx(domain) {
            Ok(records) if records.is_empty() => {
                tracing::debug!(field = field_name, domain, "no MX records");
                Err(FieldError::invalid(format!(
                    "the field {} had no MX records found for domain {}",
                    field_name, domain
                )))
            }
            Ok(records) => {
                tracing::debug!(field = field_name, domain, count = records.len(), "MX records found");
                Ok(())
            }
            Err(e) => {
                tracing::debug!(field = field_name, domain, error = %e, "MX lookup failed");
                Err(FieldError::invalid(format!(
                    "the field {} encountered an error while validating the MX record for domain {}: {}",
                    field_name, domain, e
                )))
            }
        }
    }
}

impl std::fmt::Debug for EmailChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailChecker")
            .field("required", &self.required)
            .field("check_domain_mx", &self.check_domain_mx)
            .field("custom_resolver", &self.resolver.is_some())
            .finish()
    }
}

impl Checker for EmailChecker {
    fn check(
        &self,
        value: &dyn Validatable,
        field_name: &str,
        _kind: Kind,
    ) -> Result<(), FieldError> {
        let Shape::Leaf(Scalar::Str(email)) = value.shape() else {
            return Err(FieldError::unsupported_type(field_name, value.type_name()));
        };

        if email.is_empty() {
            if self.required {
                return Err(FieldError::required(format!(
                    "the field {} is required",
                    field_name
                )));
            }
            return Ok(());
        }

        if !EMAIL_RE.is_match(email) {
            return Err(FieldError::invalid(format!(
                "the field {} does not contain a valid email. '{}' was provided",
                field_name, email
            )));
        }

        if self.check_domain_mx
            && let Some((_, domain)) = email.rsplit_once('@')
        {
            return self.check_domain(domain, field_name);
        }
        Ok(())
    }

    fn configure(&mut self, items: &[&str]) -> Result<(), FieldError> {
        for option in options(items) {
            match option.key {
                "required" => self.required = true,
                "checkdomainmx" => self.check_domain_mx = true,
                _ => {}
            }
        }
        Ok(())
    }
}
