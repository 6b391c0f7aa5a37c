//! Typed NS1 API models
//!
//! Models mirror the JSON bodies of the NS1 REST API. Optional fields are
//! skipped when unset so partially populated models can be sent for create
//! and update, and server-computed fields come back on the response.

pub mod account;
pub mod alert;
pub mod billing;
pub mod data;
pub mod dataset;
pub mod dns;
pub mod ipam;
pub mod monitor;
pub mod pulsar;
pub mod redirect;

pub use account::{
    ApiKey, IpWhitelist, NotificationSettings, Permissions, RecordPermission, Team, User,
};
pub use alert::Alert;
pub use billing::{NetworkQueryUsage, QueryUsage, TotalUsage, UsageLimits};
pub use data::{DataFeed, DataSource, FeedPtr, Meta, MetaValue};
pub use dataset::{Dataset, Datatype, Repeat, Report, Timeframe};
pub use dns::{
    Answer, Filter, Record, Region, TsigKey, View, Zone, ZonePrimary, ZoneSecondary,
    ZoneSecondaryServer, ZoneTsig,
};
pub use ipam::{Network, Subnet};
pub use monitor::{Job, MonitorRegion, Notifier, NotifyList, Rule};
pub use pulsar::{Application, BlendMetricWeights, DefaultConfig, JobConfig, PulsarJob, Weight};
pub use redirect::{RedirectCertificate, RedirectConfiguration};
