//! # ActorClient Trait
//!
//! Common read operations for domain-specific client wrappers, built on a generic
//! [`ResourceClient`] and mapped into the wrapper's own error type.
use crate::{ActorEntity, FrameworkError, ResourceClient, Snapshot, Subscription};
use async_trait::async_trait;

/// Trait for domain-specific clients to inherit the standard operations.
///
/// # Example
///
/// ```rust
/// use realtime_store::{ActorClient, ActorEntity, FrameworkError, ResourceClient};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)] struct Table { id: u32 }
/// #[derive(Debug)] enum TableAction {}
/// #[derive(Debug, thiserror::Error)] #[error("{0}")] struct TableError(String);
/// impl From<String> for TableError { fn from(s: String) -> Self { TableError(s) } }
///
/// #[async_trait]
/// impl ActorEntity for Table {
///     type Id = u32; type Create = (); type Update = (); type Action = TableAction;
///     type ActionResult = (); type Context = (); type Error = TableError;
///     fn from_create_params(id: u32, _: ()) -> Result<Self, Self::Error> { Ok(Self { id }) }
///     async fn on_update(&mut self, _: (), _: &()) -> Result<(), Self::Error> { Ok(()) }
///     async fn handle_action(&mut self, a: TableAction, _: &()) -> Result<(), Self::Error> { match a {} }
/// }
///
/// struct TableClient { inner: ResourceClient<Table> }
///
/// #[async_trait]
/// impl ActorClient<Table> for TableClient {
///     type Error = TableError;
///     fn inner(&self) -> &ResourceClient<Table> { &self.inner }
///     fn map_error(e: FrameworkError) -> Self::Error { TableError(e.to_string()) }
/// }
///
/// async fn usage(client: TableClient) {
///     // get(), list(), delete() and observe() come for free.
///     let _ = client.get(1).await;
///     let _ = client.list().await;
/// }
/// ```
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    /// The domain-specific error type.
    type Error: From<String> + Send + Sync;

    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T>;

    /// Map store errors to the domain-specific error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Fetch a record by key.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    /// Fetch every record once.
    #[tracing::instrument(skip(self))]
    async fn list(&self) -> Result<Vec<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().list().await.map_err(Self::map_error)
    }

    /// Delete a record by key.
    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: T::Id) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.inner().delete(id).await.map_err(Self::map_error)
    }

    /// Observe the collection; see [`ResourceClient::observe`].
    async fn observe<F>(&self, callback: F) -> Result<Subscription, Self::Error>
    where
        F: FnMut(&Snapshot<T>) + Send + 'static,
    {
        self.inner().observe(callback).await.map_err(Self::map_error)
    }
}
