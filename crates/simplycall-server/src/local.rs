//! In-process transport.
//!
//! Sends calls straight into a [`Router`] without leaving the process. The
//! context in each envelope reaches parsers and handlers as-is.

use async_trait::async_trait;
use simplycall_common::protocol::error::{Result, SimplycallError};
use simplycall_common::{Envelope, Transport, Value};
use std::sync::Arc;

use crate::router::Router;

/// [`Transport`] that dispatches into a local [`Router`].
///
/// Failures are raised as [`SimplycallError::Remote`], exactly as the HTTP
/// transport reports them.
pub struct LocalTransport<C> {
    router: Arc<Router<C>>,
}

impl<C> LocalTransport<C> {
    pub fn new(router: Arc<Router<C>>) -> Self {
        Self { router }
    }

    pub fn router(&self) -> &Arc<Router<C>> {
        &self.router
    }
}

impl<C> Clone for LocalTransport<C> {
    fn clone(&self) -> Self {
        Self {
            router: Arc::clone(&self.router),
        }
    }
}

#[async_trait]
impl<C: Send + 'static> Transport<C> for LocalTransport<C> {
    async fn send(&self, call: Envelope<C>) -> Result<Value> {
        self.router.dispatch(call).await.map_err(SimplycallError::Remote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::Parser;
    use serde_json::json;
    use simplycall_common::Failure;

    #[tokio::test]
    async fn test_local_round_trip() {
        let mut router: Router<u8> = Router::new();
        router
            .register("n", "ctx", Parser::AssumeTypesafe, |ctx: u8, _args| async move {
                Ok(Value::json(ctx))
            })
            .unwrap();
        let transport = LocalTransport::new(Arc::new(router));

        let value = transport.send(Envelope::new(9, "n ctx", vec![])).await.unwrap();
        assert_eq!(value, Value::json(json!(9)));
    }

    #[tokio::test]
    async fn test_failure_is_raised_as_remote() {
        let transport: LocalTransport<()> = LocalTransport::new(Arc::new(Router::new()));

        let err = transport.send(Envelope::new((), "n missing", vec![])).await.unwrap_err();
        match err {
            SimplycallError::Remote(failure) => assert_eq!(
                failure,
                Failure::NonExistentRoute("Route [n missing] does not exist!".into())
            ),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
