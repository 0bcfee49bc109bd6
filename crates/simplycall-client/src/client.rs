//! Call proxy.
//!
//! A [`Client`] wraps a [`Transport`]; a [`Scope`] binds a scope name and a
//! context to it so that calling `route` sends an [`Envelope`] addressed to
//! `<scope> <route>`. Nothing is cached or pooled here: every call is one
//! `send` on the transport.

use simplycall_common::protocol::error::Result;
use simplycall_common::{Envelope, RouteId, Transport, Value};
use std::sync::Arc;

/// Entry point for making calls through a transport.
///
/// # Example
///
/// ```
/// use simplycall_client::Client;
/// use simplycall_server::{LocalTransport, Parser, Router};
/// use simplycall_common::Value;
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() -> simplycall_common::Result<()> {
/// let mut router: Router<()> = Router::new();
/// router.register("math", "zero", Parser::AssumeTypesafe, |_ctx, _args| async {
///     Ok(Value::json(0))
/// })?;
///
/// let client = Client::new(LocalTransport::new(Arc::new(router)));
/// let value = client.scope("math").call("zero", vec![]).await?;
/// assert_eq!(value, Value::json(0));
/// # Ok(())
/// # }
/// ```
pub struct Client<C> {
    transport: Arc<dyn Transport<C>>,
}

impl<C: Send + 'static> Client<C> {
    pub fn new(transport: impl Transport<C>) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    pub fn from_arc(transport: Arc<dyn Transport<C>>) -> Self {
        Self { transport }
    }

    /// Binds `scope` and the context every call through it will carry.
    pub fn scope_with(&self, scope: impl Into<String>, ctx: C) -> Scope<C> {
        Scope {
            transport: Arc::clone(&self.transport),
            scope: scope.into(),
            ctx,
        }
    }

    /// Sends a single call without building a [`Scope`].
    pub async fn call(&self, ctx: C, id: impl Into<RouteId>, args: Vec<Value>) -> Result<Value> {
        self.transport.send(Envelope::new(ctx, id, args)).await
    }

    pub fn transport(&self) -> &Arc<dyn Transport<C>> {
        &self.transport
    }
}

impl<C: Default + Send + 'static> Client<C> {
    /// Binds `scope` with the default context.
    ///
    /// Only available when the context type has a default; otherwise use
    /// [`scope_with`](Self::scope_with).
    pub fn scope(&self, scope: impl Into<String>) -> Scope<C> {
        self.scope_with(scope, C::default())
    }
}

impl<C> Clone for Client<C> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

/// A scope name and a context bound to a transport.
pub struct Scope<C> {
    transport: Arc<dyn Transport<C>>,
    scope: String,
    ctx: C,
}

impl<C: Clone + Send + Sync + 'static> Scope<C> {
    /// Calls `<scope> <route>` with `args`.
    ///
    /// Returns whatever the transport returns, unchanged.
    pub async fn call(&self, route: &str, args: Vec<Value>) -> Result<Value> {
        let call = Envelope::new(self.ctx.clone(), RouteId::new(&self.scope, route), args);
        tracing::debug!(route = %call.id, args = call.args.len(), "Sending call");
        self.transport.send(call).await
    }
}

impl<C> Scope<C> {
    pub fn name(&self) -> &str {
        &self.scope
    }

    pub fn context(&self) -> &C {
        &self.ctx
    }
}

impl<C: Clone> Clone for Scope<C> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            scope: self.scope.clone(),
            ctx: self.ctx.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use simplycall_common::{Failure, SimplycallError};
    use std::sync::Mutex;

    /// Records every envelope and answers with a fixed result.
    struct RecordingTransport {
        calls: Mutex<Vec<(String, RouteId, Vec<Value>)>>,
        answer: std::result::Result<Value, Failure>,
    }

    impl RecordingTransport {
        fn answering(answer: std::result::Result<Value, Failure>) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                answer,
            })
        }
    }

    #[async_trait]
    impl Transport<String> for RecordingTransport {
        async fn send(&self, call: Envelope<String>) -> Result<Value> {
            self.calls.lock().unwrap().push((call.ctx, call.id, call.args));
            self.answer.clone().map_err(SimplycallError::Remote)
        }
    }

    #[tokio::test]
    async fn test_scope_builds_envelope() {
        let transport = RecordingTransport::answering(Ok(Value::json(json!(1))));
        let client: Client<String> = Client::from_arc(transport.clone());

        let scope = client.scope_with("math", "token".to_string());
        let value = scope.call("add", vec![Value::json(1), Value::json(2)]).await.unwrap();
        assert_eq!(value, Value::json(1));

        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (ctx, id, args) = &calls[0];
        assert_eq!(ctx, "token");
        assert_eq!(id.as_str(), "math add");
        assert_eq!(args, &vec![Value::json(1), Value::json(2)]);
    }

    #[tokio::test]
    async fn test_default_scope_uses_default_context() {
        let transport = RecordingTransport::answering(Ok(Value::json(json!(null))));
        let client: Client<String> = Client::from_arc(transport.clone());

        client.scope("s").call("r", vec![]).await.unwrap();

        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls[0].0, "");
    }

    #[tokio::test]
    async fn test_transport_failure_is_returned_unchanged() {
        let failure = Failure::HandlerErrored(json!({"reason": "nope"}));
        let transport = RecordingTransport::answering(Err(failure.clone()));
        let client: Client<String> = Client::from_arc(transport);

        let err = client.scope("s").call("r", vec![]).await.unwrap_err();
        match err {
            SimplycallError::Remote(remote) => assert_eq!(remote, failure),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_every_call_reaches_transport() {
        let transport = RecordingTransport::answering(Ok(Value::json(json!(0))));
        let client: Client<String> = Client::from_arc(transport.clone());
        let scope = client.scope("s");

        for _ in 0..3 {
            scope.call("r", vec![]).await.unwrap();
        }
        client.call("direct".to_string(), "s other", vec![]).await.unwrap();

        let calls = transport.calls.lock().unwrap();
        let ids: Vec<&str> = calls.iter().map(|(_, id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["s r", "s r", "s r", "s other"]);
        assert_eq!(calls[3].0, "direct");
    }

    #[test]
    fn test_scope_accessors() {
        let transport = RecordingTransport::answering(Ok(Value::json(json!(0))));
        let client: Client<String> = Client::from_arc(transport);
        let scope = client.scope_with("files", "ctx".to_string());

        assert_eq!(scope.name(), "files");
        assert_eq!(scope.context(), "ctx");
        assert_eq!(scope.clone().name(), "files");
    }
}
