//! Route Registry
//!
//! The [`Router`] owns every registered [`Route`], keyed by its
//! [`RouteId`]. Entries are written once and never replaced or removed.
//!
//! # Registration Model
//!
//! Registration takes `&mut Router`, serving takes `&Router` (usually behind an
//! `Arc`). Routes are therefore all declared before the first call is
//! dispatched; registering while serving is not expressible.
//!
//! # Example
//!
//! ```
//! use simplycall_server::{Parser, Router};
//! use simplycall_common::Value;
//!
//! # fn main() -> simplycall_common::Result<()> {
//! let mut router: Router<()> = Router::new();
//! router
//!     .scope("math")
//!     .route("zero", Parser::AssumeTypesafe, |_ctx, _args| async { Ok(Value::json(0)) })?
//!     .route("one", Parser::AssumeTypesafe, |_ctx, _args| async { Ok(Value::json(1)) })?;
//!
//! assert!(router.contains("math zero"));
//! assert_eq!(router.len(), 2);
//! # Ok(())
//! # }
//! ```

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use simplycall_common::protocol::error::{Result, SimplycallError};
use simplycall_common::{Fault, RouteId, Value};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

/// Validation function: context and raw arguments in, checked arguments out.
pub type ParseFn<C> = Arc<dyn Fn(&C, Vec<Value>) -> std::result::Result<Vec<Value>, Fault> + Send + Sync>;

/// Type-erased asynchronous handler.
pub type Handler<C> = Arc<dyn Fn(C, Vec<Value>) -> BoxFuture<'static, std::result::Result<Value, Fault>> + Send + Sync>;

/// How a route checks its arguments before the handler runs.
pub enum Parser<C> {
    /// Accept the arguments unchanged; the caller's type system already
    /// guarantees their shape.
    AssumeTypesafe,
    /// Run a validation function that may reject or rewrite the arguments.
    Custom(ParseFn<C>),
}

impl<C> Parser<C> {
    /// Wraps a validation function.
    ///
    /// # Example
    ///
    /// ```
    /// use simplycall_server::Parser;
    /// use serde_json::json;
    ///
    /// let parser: Parser<()> = Parser::custom(|_ctx, args| {
    ///     if args.len() == 2 { Ok(args) } else { Err(json!("expected two arguments")) }
    /// });
    /// assert!(!parser.is_assume_typesafe());
    /// ```
    pub fn custom<F>(parse: F) -> Self
    where
        F: Fn(&C, Vec<Value>) -> std::result::Result<Vec<Value>, Fault> + Send + Sync + 'static,
    {
        Parser::Custom(Arc::new(parse))
    }

    pub fn is_assume_typesafe(&self) -> bool {
        matches!(self, Parser::AssumeTypesafe)
    }

    /// Applies the parser to `args`.
    pub fn parse(&self, ctx: &C, args: Vec<Value>) -> std::result::Result<Vec<Value>, Fault> {
        match self {
            Parser::AssumeTypesafe => Ok(args),
            Parser::Custom(parse) => parse(ctx, args),
        }
    }
}

impl<C> Clone for Parser<C> {
    fn clone(&self) -> Self {
        match self {
            Parser::AssumeTypesafe => Parser::AssumeTypesafe,
            Parser::Custom(parse) => Parser::Custom(Arc::clone(parse)),
        }
    }
}

/// A registered (parser, handler) pair.
pub struct Route<C> {
    pub(crate) parser: Parser<C>,
    pub(crate) handler: Handler<C>,
}

impl<C> Route<C> {
    pub fn parser(&self) -> &Parser<C> {
        &self.parser
    }

    pub fn handler(&self) -> &Handler<C> {
        &self.handler
    }
}

/// Registry of routes, generic over the per-call context type `C`.
pub struct Router<C> {
    routes: HashMap<RouteId, Route<C>>,
}

impl<C: Send + 'static> Router<C> {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    /// Registers `handler` under `scope + " " + name`.
    ///
    /// # Errors
    ///
    /// Returns [`SimplycallError::DuplicateRoute`] naming the identifier if it
    /// is already taken. The existing entry is left untouched.
    pub fn register<H, Fut>(&mut self, scope: &str, name: &str, parser: Parser<C>, handler: H) -> Result<()>
    where
        H: Fn(C, Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<Value, Fault>> + Send + 'static,
    {
        let id = RouteId::new(scope, name);

        match self.routes.entry(id) {
            Entry::Occupied(entry) => {
                tracing::error!("Route [{}] registered twice", entry.key());
                Err(SimplycallError::DuplicateRoute(entry.key().to_string()))
            }
            Entry::Vacant(entry) => {
                tracing::debug!(
                    route = %entry.key(),
                    validated = !parser.is_assume_typesafe(),
                    "Registered route"
                );
                let handler: Handler<C> = Arc::new(move |ctx: C, args: Vec<Value>| handler(ctx, args).boxed());
                entry.insert(Route { parser, handler });
                Ok(())
            }
        }
    }

    /// Starts a batch of registrations under one scope.
    pub fn scope(&mut self, scope: impl Into<String>) -> ScopeBuilder<'_, C> {
        ScopeBuilder {
            router: self,
            scope: scope.into(),
        }
    }
}

impl<C> Router<C> {
    /// Looks up the route registered under `id`.
    pub fn lookup(&self, id: &str) -> Option<&Route<C>> {
        self.routes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.routes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// All registered identifiers, sorted.
    pub fn ids(&self) -> Vec<&RouteId> {
        let mut ids: Vec<_> = self.routes.keys().collect();
        ids.sort();
        ids
    }
}

impl<C: Send + 'static> Default for Router<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Registers several routes under one scope.
///
/// The first duplicate stops the batch with an error; routes registered before
/// it stay registered.
pub struct ScopeBuilder<'r, C> {
    router: &'r mut Router<C>,
    scope: String,
}

impl<'r, C: Send + 'static> ScopeBuilder<'r, C> {
    pub fn route<H, Fut>(&mut self, name: &str, parser: Parser<C>, handler: H) -> Result<&mut Self>
    where
        H: Fn(C, Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<Value, Fault>> + Send + 'static,
    {
        self.router.register(&self.scope, name, parser, handler)?;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.scope
    }
}
