//! Typed route interfaces.

/// Declares a typed interface for the routes of one scope.
///
/// Each `fn` line becomes an async method that converts its arguments with
/// [`IntoValue`](crate::IntoValue), calls `<scope> <route>` through a
/// [`Scope`](crate::Scope) and converts the result with
/// [`FromValue`](crate::FromValue). The generated struct is generic over the
/// context type, which defaults to `()`.
///
/// Method names `new`, `scope` and `SCOPE` are taken by the generated struct.
///
/// # Example
///
/// ```
/// use simplycall_client::{routes, Client};
/// use simplycall_server::{LocalTransport, Parser, Router};
/// use simplycall_common::Value;
/// use std::sync::Arc;
///
/// routes! {
///     /// Arithmetic routes.
///     pub struct MathApi = "math" {
///         fn add(a: i64, b: i64) -> i64;
///         fn describe(n: i64) -> String;
///     }
/// }
///
/// # #[tokio::main]
/// # async fn main() -> simplycall_common::Result<()> {
/// let mut router: Router<()> = Router::new();
/// router
///     .scope("math")
///     .route("add", Parser::AssumeTypesafe, |_ctx, args: Vec<Value>| async move {
///         let sum: i64 = args.iter().filter_map(|a| a.as_json()?.as_i64()).sum();
///         Ok(Value::json(sum))
///     })?
///     .route("describe", Parser::AssumeTypesafe, |_ctx, args: Vec<Value>| async move {
///         Ok(Value::json(format!("number {}", args[0].as_json().unwrap())))
///     })?;
///
/// let client = Client::new(LocalTransport::new(Arc::new(router)));
/// let math = MathApi::new(&client, ());
/// assert_eq!(math.add(2, 3).await?, 5);
/// assert_eq!(math.describe(7).await?, "number 7");
/// # Ok(())
/// # }
/// ```
#[macro_export]
macro_rules! routes {
    ($(
        $(#[$meta:meta])*
        $vis:vis struct $name:ident = $scope:literal {
            $(
                $(#[$route_meta:meta])*
                fn $route:ident($($arg:ident : $arg_ty:ty),* $(,)?) -> $ret:ty;
            )*
        }
    )*) => {$(
        $(#[$meta])*
        $vis struct $name<C = ()> {
            scope: $crate::Scope<C>,
        }

        impl<C: ::std::clone::Clone + ::std::marker::Send + ::std::marker::Sync + 'static> $name<C> {
            /// Scope every route of this interface lives in.
            pub const SCOPE: &'static str = $scope;

            /// Binds the interface to `client` with the context `ctx`.
            pub fn new(client: &$crate::Client<C>, ctx: C) -> Self {
                Self {
                    scope: client.scope_with(Self::SCOPE, ctx),
                }
            }

            pub fn scope(&self) -> &$crate::Scope<C> {
                &self.scope
            }

            $(
                $(#[$route_meta])*
                pub async fn $route(&self, $($arg: $arg_ty),*) -> $crate::Result<$ret> {
                    let args: ::std::vec::Vec<$crate::Value> = ::std::vec![
                        $($crate::IntoValue::into_value($arg)?),*
                    ];
                    let value = self.scope.call(::std::stringify!($route), args).await?;
                    <$ret as $crate::FromValue>::from_value(value)
                }
            )*
        }

        impl<C: ::std::clone::Clone> ::std::clone::Clone for $name<C> {
            fn clone(&self) -> Self {
                Self {
                    scope: ::std::clone::Clone::clone(&self.scope),
                }
            }
        }
    )*};
}
