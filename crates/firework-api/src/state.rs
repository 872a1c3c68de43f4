use std::sync::Arc;

use firework_core::BrokerService;
use firework_infrastructure::{InMemoryTopicRepository, StaticKeyRepository};

pub type Broker = BrokerService<InMemoryTopicRepository, StaticKeyRepository>;

#[derive(Clone)]
pub struct AppState {
    pub broker: Arc<Broker>,
}

impl AppState {
    pub fn new(broker: Arc<Broker>) -> Self {
        Self { broker }
    }
}
