// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Acting-user extraction at the server boundary.
//!
//! There is no authentication. The caller may name itself in the
//! `x-actor-id` header; anything else acts as the system placeholder.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use pizzeria_audit::Actor;
use tracing::debug;

/// Header carrying the acting user's id.
pub const ACTOR_HEADER: &str = "x-actor-id";

/// Extractor for the acting user of a request.
///
/// Never rejects: a missing, blank or non-UTF-8 header yields
/// [`Actor::system`].
pub struct RequestActor(pub Actor);

impl<S: Send + Sync> FromRequestParts<S> for RequestActor {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let actor: Actor = parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|value| value.to_str().ok())
            .map_or_else(Actor::system, Actor::new);

        debug!(actor = %actor, "Resolved request actor");
        Ok(Self(actor))
    }
}
