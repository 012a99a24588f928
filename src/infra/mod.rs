//! Network collaborators.

pub mod kpi_client;
