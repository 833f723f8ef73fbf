// Library for tests to access modules

pub mod config;
pub mod device_repo;
pub mod models;
pub mod poller;
pub mod rate;
pub mod routes;
pub mod snmp;
