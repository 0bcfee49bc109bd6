//! Dispatcher
//!
//! Routes one [`Envelope`] to its handler and normalizes every outcome into a
//! [`CallResult`].
//!
//! # Dispatch Steps
//!
//! 1. Look up the identifier; unknown routes fail with
//!    [`Failure::NonExistentRoute`]
//! 2. Run the parser with the call's context; a rejection fails with
//!    [`Failure::ArgumentParsingFailed`] and the handler never runs
//! 3. Run the handler with the context and the parsed arguments
//! 4. A handler error fails with [`Failure::HandlerErrored`]; a value is
//!    returned as success
//!
//! Error values from parsers and handlers are carried through unmodified.
//! A panic in either is caught and reported as the same failure kind, with
//! the panic message as payload. Nothing is retried, timed out or cancelled
//! here.

use futures_util::FutureExt;
use serde_json::Value as JsonValue;
use simplycall_common::{CallResult, Envelope, Failure, Fault};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::router::Router;

fn panic_fault(payload: Box<dyn Any + Send>) -> Fault {
    let message = if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with a non-string payload".to_string()
    };
    JsonValue::String(message)
}

impl<C: Send + 'static> Router<C> {
    /// Dispatches one call.
    ///
    /// Never fails outward: every failure path resolves to an `Err(Failure)`.
    ///
    /// # Example
    ///
    /// ```
    /// use simplycall_server::{Parser, Router};
    /// use simplycall_common::{Envelope, Failure, Value};
    /// use serde_json::json;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> simplycall_common::Result<()> {
    /// let mut router: Router<()> = Router::new();
    /// router.register("s", "r", Parser::AssumeTypesafe, |_ctx, _args| async {
    ///     Ok(Value::json(42))
    /// })?;
    ///
    /// let ok = router.dispatch(Envelope::new((), "s r", vec![])).await;
    /// assert_eq!(ok, Ok(Value::json(json!(42))));
    ///
    /// let missing = router.dispatch(Envelope::new((), "s missing", vec![])).await;
    /// assert_eq!(
    ///     missing,
    ///     Err(Failure::NonExistentRoute("Route [s missing] does not exist!".into()))
    /// );
    /// # Ok(())
    /// # }
    /// ```
    pub async fn dispatch(&self, call: Envelope<C>) -> CallResult {
        let Envelope { ctx, id, args } = call;

        let Some(route) = self.lookup(id.as_str()) else {
            tracing::debug!("Call to unknown route [{}]", id);
            return Err(Failure::non_existent_route(&id));
        };

        tracing::debug!(route = %id, args = args.len(), "Dispatching call");

        let parsed = panic::catch_unwind(AssertUnwindSafe(|| route.parser.parse(&ctx, args)))
            .unwrap_or_else(|payload| Err(panic_fault(payload)));

        let args = match parsed {
            Ok(args) => args,
            Err(fault) => {
                tracing::debug!(route = %id, "Argument parsing failed: {}", fault);
                return Err(Failure::ArgumentParsingFailed(fault));
            }
        };

        let handler = &route.handler;
        let outcome = match panic::catch_unwind(AssertUnwindSafe(|| handler(ctx, args))) {
            Ok(future) => AssertUnwindSafe(future)
                .catch_unwind()
                .await
                .unwrap_or_else(|payload| Err(panic_fault(payload))),
            Err(payload) => Err(panic_fault(payload)),
        };

        match outcome {
            Ok(value) => Ok(value),
            Err(fault) => {
                tracing::debug!(route = %id, "Handler errored: {}", fault);
                Err(Failure::HandlerErrored(fault))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::Parser;
    use futures_util::future::join_all;
    use serde_json::json;
    use simplycall_common::{RouteId, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn scenario_router() -> Router<()> {
        let mut router = Router::new();
        router
            .register("s", "r", Parser::AssumeTypesafe, |_ctx, _args| async {
                Ok(Value::json(json!(42)))
            })
            .unwrap();
        router
    }

    #[tokio::test]
    async fn test_scenario_success() {
        let router = scenario_router();
        let result = router.dispatch(Envelope::new((), "s r", vec![])).await;
        assert_eq!(result, Ok(Value::Json(json!(42))));
    }

    #[tokio::test]
    async fn test_scenario_missing_route() {
        let router = scenario_router();
        let result = router.dispatch(Envelope::new((), "s missing", vec![])).await;

        let failure = result.unwrap_err();
        assert_eq!(
            serde_json::to_value(&failure).unwrap(),
            json!({"non existent route": "Route [s missing] does not exist!"})
        );
    }

    #[tokio::test]
    async fn test_unknown_route_names_identifier() {
        let router: Router<()> = Router::new();
        for id in ["a b", "x", "", "scope with spaces route"] {
            let result = router.dispatch(Envelope::new((), RouteId::from(id), vec![])).await;
            assert_eq!(
                result,
                Err(Failure::NonExistentRoute(format!("Route [{}] does not exist!", id)))
            );
        }
    }

    #[tokio::test]
    async fn test_parser_failure_skips_handler() {
        let invoked = Arc::new(AtomicUsize::new(0));
        let counter = invoked.clone();

        let mut router: Router<()> = Router::new();
        router
            .register(
                "s",
                "strict",
                Parser::custom(|_ctx, _args| Err(json!({"code": 400, "why": ["bad", "args"]}))),
                move |_ctx, _args| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    async { Ok(Value::json(json!(null))) }
                },
            )
            .unwrap();

        let result = router
            .dispatch(Envelope::new((), "s strict", vec![Value::json(json!(1))]))
            .await;

        assert_eq!(
            result,
            Err(Failure::ArgumentParsingFailed(json!({"code": 400, "why": ["bad", "args"]})))
        );
        assert_eq!(invoked.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_parser_output_reaches_handler() {
        let mut router: Router<()> = Router::new();
        router
            .register(
                "math",
                "double",
                Parser::custom(|_ctx, args| {
                    let n = args
                        .first()
                        .and_then(Value::as_json)
                        .and_then(JsonValue::as_i64)
                        .ok_or_else(|| json!("expected a number"))?;
                    Ok(vec![Value::json(n * 2)])
                }),
                |_ctx, args: Vec<Value>| async move { Ok(args.into_iter().next().unwrap()) },
            )
            .unwrap();

        let result = router
            .dispatch(Envelope::new((), "math double", vec![Value::json(21)]))
            .await;
        assert_eq!(result, Ok(Value::json(42)));
    }

    #[tokio::test]
    async fn test_handler_error_is_carried_unmodified() {
        let mut router: Router<()> = Router::new();
        router
            .register("s", "fails", Parser::AssumeTypesafe, |_ctx, _args| async {
                Err(json!({"reason": "quota exceeded", "retry": false}))
            })
            .unwrap();

        let result = router.dispatch(Envelope::new((), "s fails", vec![])).await;
        assert_eq!(
            result,
            Err(Failure::HandlerErrored(json!({"reason": "quota exceeded", "retry": false})))
        );
    }

    #[tokio::test]
    async fn test_handler_resolves_binary_value() {
        let mut router: Router<()> = Router::new();
        router
            .register("s", "blob", Parser::AssumeTypesafe, |_ctx, _args| async {
                Ok(Value::from(vec![0u8, 159, 146, 150]))
            })
            .unwrap();

        let result = router.dispatch(Envelope::new((), "s blob", vec![])).await;
        assert_eq!(result, Ok(Value::from(vec![0u8, 159, 146, 150])));
    }

    #[tokio::test]
    async fn test_handler_panic_becomes_handler_errored() {
        let mut router: Router<()> = Router::new();
        router
            .register("s", "panics", Parser::AssumeTypesafe, |_ctx, _args| async {
                if true {
                    panic!("handler exploded");
                }
                Ok(Value::json(json!(null)))
            })
            .unwrap();

        let result = router.dispatch(Envelope::new((), "s panics", vec![])).await;
        assert_eq!(result, Err(Failure::HandlerErrored(json!("handler exploded"))));
    }

    #[tokio::test]
    async fn test_parser_panic_becomes_parsing_failure() {
        let mut router: Router<()> = Router::new();
        router
            .register(
                "s",
                "parser_panics",
                Parser::custom(|_ctx, _args| panic!("parser exploded")),
                |_ctx, _args| async { Ok(Value::json(json!(null))) },
            )
            .unwrap();

        let result = router.dispatch(Envelope::new((), "s parser_panics", vec![])).await;
        assert_eq!(result, Err(Failure::ArgumentParsingFailed(json!("parser exploded"))));
    }

    #[tokio::test]
    async fn test_context_reaches_parser_and_handler() {
        let mut router: Router<String> = Router::new();
        router
            .register(
                "auth",
                "whoami",
                Parser::custom(|ctx: &String, args| {
                    if ctx.is_empty() {
                        Err(json!("unauthenticated"))
                    } else {
                        Ok(args)
                    }
                }),
                |ctx: String, _args| async move { Ok(Value::json(ctx)) },
            )
            .unwrap();

        let ok = router
            .dispatch(Envelope::new("alice".to_string(), "auth whoami", vec![]))
            .await;
        assert_eq!(ok, Ok(Value::json("alice")));

        let rejected = router.dispatch(Envelope::new(String::new(), "auth whoami", vec![])).await;
        assert_eq!(rejected, Err(Failure::ArgumentParsingFailed(json!("unauthenticated"))));
    }

    #[tokio::test]
    async fn test_concurrent_calls_keep_their_own_context() {
        let mut router: Router<u64> = Router::new();
        router
            .register(
                "ctx",
                "echo",
                Parser::custom(|ctx: &u64, args| {
                    // the argument was built from the same number as the context
                    match args.first().and_then(Value::as_json).and_then(JsonValue::as_u64) {
                        Some(n) if n == *ctx => Ok(args),
                        other => Err(json!({"context": *ctx, "argument": other})),
                    }
                }),
                |ctx: u64, _args| async move {
                    // finish in reverse order so calls overlap
                    tokio::time::sleep(Duration::from_millis(50 - ctx)).await;
                    Ok(Value::json(ctx))
                },
            )
            .unwrap();
        let router = Arc::new(router);

        let calls = (0..50u64).map(|n| {
            let router = router.clone();
            async move {
                router
                    .dispatch(Envelope::new(n, "ctx echo", vec![Value::json(n)]))
                    .await
            }
        });
        let results = join_all(calls).await;

        for (n, result) in results.into_iter().enumerate() {
            assert_eq!(result, Ok(Value::json(n as u64)));
        }
    }

    #[tokio::test]
    async fn test_dispatch_from_spawned_tasks() {
        let router = Arc::new(scenario_router());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let router = router.clone();
                tokio::spawn(async move { router.dispatch(Envelope::new((), "s r", vec![])).await })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap(), Ok(Value::json(42)));
        }
    }
}
