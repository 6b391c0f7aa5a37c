// NS1 API endpoints
//
// Each module adds inherent methods to `Ns1Client` for one API domain.
// Create is `PUT`, update is `POST` (`PATCH` for alerts), read is `GET`.

mod account;
mod alerts;
mod billing;
mod data;
mod datasets;
mod dns;
mod ipam;
mod monitoring;
mod pulsar;
mod redirects;
