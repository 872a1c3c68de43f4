//! Domain services (business logic)

pub mod broker_service;
pub mod dispatcher;

pub use broker_service::BrokerService;
pub use dispatcher::{
    DeliveryOutcome, DeliveryReport, DispatchReport, Dispatcher, DispatcherConfig,
};
