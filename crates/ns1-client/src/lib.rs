// # NS1 API Client
//
// Typed models and a thin async REST client for the NS1 API.
//
// ## Scope
//
// - One HTTP request per call, no retries, backoff or rate limiting
// - `X-NSONE-Key` authentication, marked sensitive so it never reaches logs
// - HTTP 404 is reported as `Error::NotFound` on every endpoint
// - Other failures carry status, method, URL and the API's `message`
// - Request and response bodies are logged at debug level only when
//   `enable_debug` is set in the provider configuration
//
// ## API Reference
//
// - Create: `PUT /{collection}` (or `PUT /{collection}/{natural key}`)
// - Update: `POST /{collection}/{id}`, alerts use `PATCH`
// - Alerts: `/alerting/v1/` next to the main `/v1/` endpoint

mod api;
pub mod client;
pub mod model;

pub use client::{API_KEY_HEADER, Ns1Client};
