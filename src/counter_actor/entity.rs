//! [`ActorEntity`] implementation for [`Counter`].
//!
//! The counter has no updates or actions: after seeding, it is only ever written with
//! [`compare_and_set`](realtime_store::ResourceClient::compare_and_set), which is what keeps
//! allocation correct under concurrent callers.

use super::error::CounterError;
use crate::model::{Counter, CounterCreate, CounterKey};
use async_trait::async_trait;
use realtime_store::ActorEntity;
use std::convert::Infallible;

#[async_trait]
impl ActorEntity for Counter {
    type Id = CounterKey;
    type Create = CounterCreate;
    type Update = Infallible;
    type Action = Infallible;
    type ActionResult = ();
    type Context = ();
    type Error = CounterError;

    fn from_create_params(_id: CounterKey, params: CounterCreate) -> Result<Self, CounterError> {
        Ok(Self {
            value: params.start,
        })
    }

    async fn on_update(&mut self, update: Infallible, _ctx: &()) -> Result<(), CounterError> {
        match update {}
    }

    async fn handle_action(&mut self, action: Infallible, _ctx: &()) -> Result<(), CounterError> {
        match action {}
    }
}
