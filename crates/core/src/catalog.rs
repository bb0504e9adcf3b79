use nasta_tag_transit::models::TransitError;
use nasta_tag_transit::network::SiteSource;
use nasta_tag_transit::provider::SiteCatalog;
use tracing::info;

/// Fetch the full site list and index it.
///
/// An empty upstream list is returned as an empty catalog; the caller decides
/// whether that counts as loaded.
pub async fn load_catalog(source: &dyn SiteSource) -> Result<SiteCatalog, TransitError> {
    let sites = source.fetch_sites().await?;
    let catalog = SiteCatalog::from_sites(sites);
    info!(sites = catalog.len(), "site catalog fetched");
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeSites, site};

    #[tokio::test]
    async fn test_load_catalog() {
        let source = FakeSites::new(vec![site(1, 59.33, 18.06), site(2, 59.34, 18.07)]);
        let catalog = load_catalog(&source).await.unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.get(2).is_some());
    }

    #[tokio::test]
    async fn test_failure_is_returned() {
        let source = FakeSites::failing_first(vec![site(1, 59.33, 18.06)], 1);
        assert!(load_catalog(&source).await.is_err());
        assert_eq!(load_catalog(&source).await.unwrap().len(), 1);
    }
}
