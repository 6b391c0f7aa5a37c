// # NS1 Provider
//
// Resources and data sources managing NS1 objects through `ns1-client`.
//
// ## Layout
//
// - `resources`: one module per managed object type
// - `data_sources`: read-only lookups
// - `meta`, `config_values`, `permissions`: attribute-side encodings shared
//   by several resources
//
// Attribute values that are strings in configuration (meta fields, job and
// filter config) are converted to typed API values here and nowhere else.

pub mod config_values;
pub mod data_sources;
pub mod meta;
pub mod permissions;
pub mod resources;

use std::sync::Arc;

use ns1_client::Ns1Client;
use ns1_core::config::DEFAULT_ENDPOINT;
use ns1_core::{Provider, ProviderConfig, ResourceRegistry, Result};
use tracing::debug;

use data_sources::billing_usage::BillingUsageDataSource;
use data_sources::monitoring_regions::MonitoringRegionsDataSource;
use data_sources::networks::NetworksDataSource;
use data_sources::record::RecordDataSource;
use data_sources::zone::ZoneDataSource;
use resources::account_whitelist::AccountWhitelistResource;
use resources::alert::AlertResource;
use resources::apikey::ApiKeyResource;
use resources::application::ApplicationResource;
use resources::datafeed::DataFeedResource;
use resources::dataset::DatasetResource;
use resources::datasource::DataSourceResource;
use resources::dnsview::DnsViewResource;
use resources::monitoring_job::MonitoringJobResource;
use resources::notifylist::NotifyListResource;
use resources::pulsar_job::PulsarJobResource;
use resources::record::RecordResource;
use resources::redirect::RedirectResource;
use resources::redirect_certificate::RedirectCertificateResource;
use resources::subnet::SubnetResource;
use resources::team::TeamResource;
use resources::tsigkey::TsigKeyResource;
use resources::user::UserResource;
use resources::zone::ZoneResource;

/// Register every NS1 resource and data source
pub fn register(registry: &mut ResourceRegistry, client: Arc<Ns1Client>) {
    registry.register_resource(Arc::new(ZoneResource::new(client.clone())));
    registry.register_resource(Arc::new(RecordResource::new(client.clone())));
    registry.register_resource(Arc::new(DnsViewResource::new(client.clone())));
    registry.register_resource(Arc::new(TsigKeyResource::new(client.clone())));

    registry.register_resource(Arc::new(TeamResource::new(client.clone())));
    registry.register_resource(Arc::new(UserResource::new(client.clone())));
    registry.register_resource(Arc::new(ApiKeyResource::new(client.clone())));
    registry.register_resource(Arc::new(AccountWhitelistResource::new(client.clone())));

    registry.register_resource(Arc::new(MonitoringJobResource::new(client.clone())));
    registry.register_resource(Arc::new(NotifyListResource::new(client.clone())));
    registry.register_resource(Arc::new(DataSourceResource::new(client.clone())));
    registry.register_resource(Arc::new(DataFeedResource::new(client.clone())));

    registry.register_resource(Arc::new(DatasetResource::new(client.clone())));
    registry.register_resource(Arc::new(RedirectResource::new(client.clone())));
    registry.register_resource(Arc::new(RedirectCertificateResource::new(client.clone())));
    registry.register_resource(Arc::new(ApplicationResource::new(client.clone())));
    registry.register_resource(Arc::new(PulsarJobResource::new(client.clone())));
    registry.register_resource(Arc::new(AlertResource::new(client.clone())));
    registry.register_resource(Arc::new(SubnetResource::new(client.clone())));

    registry.register_data_source(Arc::new(ZoneDataSource::new(client.clone())));
    registry.register_data_source(Arc::new(RecordDataSource::new(client.clone())));
    registry.register_data_source(Arc::new(NetworksDataSource::new(client.clone())));
    registry.register_data_source(Arc::new(MonitoringRegionsDataSource::new(client.clone())));
    registry.register_data_source(Arc::new(BillingUsageDataSource::new(client)));
}

/// Build a provider with every NS1 resource registered
pub fn new_provider(config: &ProviderConfig) -> Result<Provider> {
    let client = Arc::new(Ns1Client::from_config(config)?);

    let mut registry = ResourceRegistry::new();
    register(&mut registry, client);
    debug!(
        "registered {} resources and {} data sources",
        registry.list_resources().len(),
        registry.list_data_sources().len()
    );

    Ok(Provider::new(registry))
}

/// Registry of every NS1 type, built without credentials
///
/// For listing type names. The client behind the registered resources sends
/// no API key.
pub fn type_registry() -> ResourceRegistry {
    let client = Arc::new(Ns1Client::unauthenticated(DEFAULT_ENDPOINT));
    let mut registry = ResourceRegistry::new();
    register(&mut registry, client);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_type_is_registered() {
        let provider = new_provider(&ProviderConfig::new("key")).unwrap();
        let registry = provider.registry();

        assert_eq!(registry.list_resources().len(), 19);
        for name in [
            "ns1_zone",
            "ns1_record",
            "ns1_user",
            "ns1_account_whitelist",
            "ns1_redirect_certificate",
            "ns1_subnet",
        ] {
            assert!(registry.has_resource(name), "missing {}", name);
        }
        assert_eq!(
            registry.list_data_sources(),
            vec![
                "ns1_billing_usage",
                "ns1_monitoring_regions",
                "ns1_networks",
                "ns1_record",
                "ns1_zone",
            ]
        );
    }

    #[test]
    fn test_type_registry_needs_no_key() {
        let registry = type_registry();
        let provider = new_provider(&ProviderConfig::new("key")).unwrap();

        assert_eq!(registry.list_resources(), provider.registry().list_resources());
        assert_eq!(registry.list_data_sources(), provider.registry().list_data_sources());
    }

    #[test]
    fn test_empty_key_is_rejected() {
        assert!(new_provider(&ProviderConfig::new("")).is_err());
    }
}
