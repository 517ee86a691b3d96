// Module layout (Clean Architecture style)
// - bootstrap: configuration, logging and router assembly
// - infrastructure: Postgres adapters (plus an in-memory store for tests)
// - presentation: HTTP handlers, extractors and middleware
// - application: ports, use cases and validation
// - domain: core models and the feed ranking model

pub mod application;
pub mod bootstrap;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
