use std::time::{Duration, Instant};

use crate::util::Sequence;

/// Identifies one arming of the idle timer.  Expiries carrying anything but
/// the current token are stale.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct TimerToken(u64);

#[derive(Copy, Clone, Debug)]
struct Pending {
    token: TimerToken,
    deadline: Instant,
}

/// Single-shot inactivity timer.  Arming it again replaces the outstanding
/// expiry, so at most one is ever pending.
#[derive(Debug)]
pub struct IdleTimer {
    sequence: Sequence<u64>,
    pending: Option<Pending>,
}

impl IdleTimer {
    pub fn new() -> Self {
        Self {
            sequence: Sequence::new(0),
            pending: None,
        }
    }

    pub fn reset(&mut self, now: Instant, timeout: Duration) -> TimerToken {
        let token = TimerToken(self.sequence.advance());
        self.pending = Some(Pending {
            token,
            deadline: now + timeout,
        });
        token
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_active(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|pending| pending.deadline)
    }

    pub fn token(&self) -> Option<TimerToken> {
        self.pending.map(|pending| pending.token)
    }

    /// Consume the pending expiry if `token` is the current one.
    pub fn expire(&mut self, token: TimerToken) -> bool {
        match self.pending {
            Some(pending) if pending.token == token => {
                self.pending = None;
                true
            }
            _ => {
                log::debug!("ignoring stale timer token {:?}", token);
                false
            }
        }
    }

    /// Take the pending expiry if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<TimerToken> {
        match self.pending {
            Some(pending) if pending.deadline <= now => {
                self.pending = None;
                Some(pending.token)
            }
            _ => None,
        }
    }
}

impl Default for IdleTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(10);

    #[test]
    fn second_reset_replaces_the_first() {
        let start = Instant::now();
        let mut timer = IdleTimer::new();
        let first = timer.reset(start, TIMEOUT);
        let second = timer.reset(start + Duration::from_secs(4), TIMEOUT);
        assert_ne!(first, second);

        assert_eq!(timer.poll(start + TIMEOUT), None);
        assert!(!timer.expire(first));
        assert!(timer.is_active());

        assert_eq!(timer.poll(start + Duration::from_secs(14)), Some(second));
        assert!(!timer.is_active());
        assert_eq!(timer.poll(start + Duration::from_secs(100)), None);
    }

    #[test]
    fn expire_consumes_the_current_token_once() {
        let start = Instant::now();
        let mut timer = IdleTimer::new();
        let token = timer.reset(start, TIMEOUT);
        assert_eq!(timer.token(), Some(token));
        assert!(timer.expire(token));
        assert!(!timer.expire(token));
    }

    #[test]
    fn cancel_clears_the_deadline() {
        let start = Instant::now();
        let mut timer = IdleTimer::new();
        timer.reset(start, TIMEOUT);
        assert_eq!(timer.deadline(), Some(start + TIMEOUT));
        timer.cancel();
        assert_eq!(timer.deadline(), None);
        assert_eq!(timer.poll(start + TIMEOUT), None);
    }
}
