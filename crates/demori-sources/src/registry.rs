//! Source adapter registry with enabled-set selection.

use crate::adapters::{
    CompanyWebsiteSource, DirectorySource, EmailVerificationSource, PhoneValidationSource,
    SocialPlatformsSource,
};
use crate::error::{Result, SourceError};
use crate::source::ContactSource;
use demori_core::settings::{EngineSettings, SourceToggles};
use demori_core::SourceId;
use std::sync::Arc;
use tracing::debug;

/// Registry of source adapters in declaration order.
///
/// Declaration order matters: during aggregation, the first declared
/// source wins ties for duplicate candidates. Selection by the enabled
/// set happens at call time, so flipping a settings flag takes effect on
/// the next search without re-registering anything.
#[derive(Clone, Default)]
pub struct SourceRegistry {
    sources: Vec<Arc<dyn ContactSource>>,
}

impl SourceRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Create a registry with the five standard adapters, configured from
    /// settings.
    #[must_use]
    pub fn standard(settings: &EngineSettings) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(CompanyWebsiteSource::new(
            settings.search.search_depth,
        )));
        registry.register(Arc::new(DirectorySource::new()));
        registry.register(Arc::new(SocialPlatformsSource::new()));
        registry.register(Arc::new(EmailVerificationSource::new(
            settings.search.email_verification,
        )));
        registry.register(Arc::new(PhoneValidationSource::new(
            settings.search.phone_validation,
        )));

        debug!(count = registry.len(), "registered standard sources");
        registry
    }

    /// Append a source. Later registrations lose dedup ties to earlier
    /// ones.
    pub fn register(&mut self, source: Arc<dyn ContactSource>) {
        self.sources.push(source);
    }

    /// Get a source by ID.
    ///
    /// # Errors
    /// Returns error if the source is not registered.
    pub fn get(&self, source_id: &SourceId) -> Result<Arc<dyn ContactSource>> {
        self.sources
            .iter()
            .find(|s| s.id() == source_id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound {
                source_id: source_id.to_string(),
            })
    }

    /// Sources enabled by the given toggles, in declaration order.
    #[must_use]
    pub fn enabled(&self, toggles: &SourceToggles) -> Vec<Arc<dyn ContactSource>> {
        self.sources
            .iter()
            .filter(|s| toggles.is_enabled(s.id()))
            .cloned()
            .collect()
    }

    /// All registered source IDs, in declaration order.
    #[must_use]
    pub fn ids(&self) -> Vec<SourceId> {
        self.sources.iter().map(|s| s.id().clone()).collect()
    }

    /// Number of registered sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry_order() {
        let registry = SourceRegistry::standard(&EngineSettings::default());
        let ids: Vec<String> = registry.ids().iter().map(ToString::to_string).collect();

        assert_eq!(
            ids,
            vec![
                "company-website",
                "professional-directory",
                "social-platforms",
                "email-verification",
                "phone-validation",
            ]
        );
    }

    #[test]
    fn test_enabled_set_selection() {
        let registry = SourceRegistry::standard(&EngineSettings::default());

        let toggles = SourceToggles {
            professional_directories: false,
            phone_validation: false,
            ..SourceToggles::default()
        };

        let enabled = registry.enabled(&toggles);
        let ids: Vec<String> = enabled.iter().map(|s| s.id().to_string()).collect();
        assert_eq!(
            ids,
            vec!["company-website", "social-platforms", "email-verification"]
        );
    }

    #[test]
    fn test_all_disabled_selects_nothing() {
        let registry = SourceRegistry::standard(&EngineSettings::default());
        assert!(registry.enabled(&SourceToggles::none()).is_empty());
    }

    #[test]
    fn test_get_unknown_source() {
        let registry = SourceRegistry::new();
        let id = SourceId::new("company-website").expect("valid id");
        assert!(matches!(
            registry.get(&id),
            Err(SourceError::NotFound { .. })
        ));
    }
}
