//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations such as persisting or retrieving the
//! authenticated member's id.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::member::MemberId;
use crate::domain::Error;

pub(crate) const MEMBER_ID_KEY: &str = "member_id";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated member's id in the session cookie.
    pub fn persist_member(&self, member_id: MemberId) -> Result<(), Error> {
        self.0
            .insert(MEMBER_ID_KEY, member_id.to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current member id from the session, if present.
    ///
    /// A cookie whose id fails to parse is treated as absent rather than an
    /// error, so a tampered session reads as logged out.
    pub fn member_id(&self) -> Result<Option<MemberId>, Error> {
        let id = self
            .0
            .get::<String>(MEMBER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        match id {
            Some(raw) => match raw.parse::<MemberId>() {
                Ok(id) => Ok(Some(id)),
                Err(error) => {
                    tracing::warn!("invalid member id in session cookie: {error}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Require an authenticated member id or return `401 Unauthorized`.
    pub fn require_member_id(&self) -> Result<MemberId, Error> {
        self.member_id()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Drop the session entirely, expiring the cookie.
    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
