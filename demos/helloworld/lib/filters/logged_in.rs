//! Requires an `x-user` header and records who is making the request.

use minos::prelude::*;

/// Name taken from the `x-user` header.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub String);

/// Rejects requests without a user.
pub struct LoggedIn;

impl Filter for LoggedIn {
    fn process<'a>(
        &'a self,
        request: &'a mut Request,
        _response: &'a mut Response,
    ) -> BoxFuture<'a, MinosResult<()>> {
        Box::pin(async move {
            let user = request
                .header("x-user")
                .filter(|u| !u.is_empty())
                .map(str::to_string)
                .ok_or_else(|| MinosError::action("login required"))?;

            request.extensions_mut().insert(CurrentUser(user));
            Ok(())
        })
    }
}
