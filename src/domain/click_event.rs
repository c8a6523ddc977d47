//! Click event model for asynchronous click tracking.

use chrono::{DateTime, Utc};

use crate::domain::entities::NewClick;

/// An in-memory click event passed from the redirect handler to the
/// background worker via a bounded channel.
///
/// The handler has already resolved the tracking code, so the event carries
/// the link id directly; the worker never performs lookups. The timestamp is
/// captured at request time, not at persistence time, since persistence may
/// be retried with backoff.
#[derive(Debug, Clone)]
pub struct ClickEvent {
    pub link_id: i64,
    /// Resolved actor identity, when the caller was authenticated.
    pub actor_id: Option<i64>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl ClickEvent {
    pub fn new(
        link_id: i64,
        actor_id: Option<i64>,
        ip: Option<String>,
        user_agent: Option<&str>,
        referer: Option<&str>,
    ) -> Self {
        Self {
            link_id,
            actor_id,
            ip,
            user_agent: user_agent.map(|s| s.to_string()),
            referer: referer.map(|s| s.to_string()),
            occurred_at: Utc::now(),
        }
    }
}

impl From<ClickEvent> for NewClick {
    fn from(ev: ClickEvent) -> Self {
        NewClick {
            link_id: ev.link_id,
            actor_id: ev.actor_id,
            ip: ev.ip,
            user_agent: ev.user_agent,
            referer: ev.referer,
            clicked_at: ev.occurred_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_event_anonymous() {
        let event = ClickEvent::new(
            42,
            None,
            Some("203.0.113.9".to_string()),
            Some("Mozilla/5.0"),
            Some("https://social.example.com/post/21"),
        );

        assert_eq!(event.link_id, 42);
        assert!(event.actor_id.is_none());
        assert_eq!(event.user_agent.as_deref(), Some("Mozilla/5.0"));
    }

    #[test]
    fn test_click_event_minimal() {
        let event = ClickEvent::new(7, Some(3), None, None, None);

        assert_eq!(event.link_id, 7);
        assert_eq!(event.actor_id, Some(3));
        assert!(event.ip.is_none());
        assert!(event.user_agent.is_none());
        assert!(event.referer.is_none());
    }

    #[test]
    fn test_conversion_to_new_click() {
        let event = ClickEvent::new(
            11,
            Some(5),
            Some("10.0.0.1".to_string()),
            Some("Safari"),
            None,
        );

        let new_click: NewClick = event.clone().into();

        assert_eq!(new_click.link_id, 11);
        assert_eq!(new_click.actor_id, Some(5));
        assert_eq!(new_click.ip, event.ip);
        assert_eq!(new_click.user_agent, event.user_agent);
        assert_eq!(new_click.clicked_at, event.occurred_at);
        assert!(new_click.referer.is_none());
    }
}
