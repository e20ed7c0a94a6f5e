//! Party-link capability tokens. Resolution fails closed: expired and
//! unknown tokens produce the same generic error so outside callers cannot
//! enumerate links.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::workflows::reporting::domain::{PartyId, PartyLink};
use crate::workflows::reporting::error::ReportingError;

pub(crate) fn mint_token() -> String {
    format!("pl_{}", Uuid::new_v4().simple())
}

pub(crate) fn issue(party_id: PartyId, now: DateTime<Utc>, ttl_days: i64) -> PartyLink {
    PartyLink {
        token: mint_token(),
        party_id,
        issued_at: now,
        expires_at: now + Duration::days(ttl_days),
    }
}

pub(crate) fn resolve<'a>(
    links: &'a [PartyLink],
    token: &str,
    now: DateTime<Utc>,
) -> Result<&'a PartyLink, ReportingError> {
    links
        .iter()
        .find(|link| link.token == token)
        .filter(|link| !link.is_expired(now))
        .ok_or(ReportingError::TokenInvalid)
}
