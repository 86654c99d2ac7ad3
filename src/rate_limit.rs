//! Per-IP request throttling for the `/api` scope.

use std::{
    net::{IpAddr, Ipv4Addr},
    num::NonZeroU32,
    time::{Duration, Instant},
};

use actix_web::{
    body::{EitherBody, MessageBody},
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    web, Error, ResponseError,
};
use dashmap::DashMap;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};

use crate::{config::RateLimitConfig, error::ApiError};

struct Tracked {
    limiter: DefaultDirectRateLimiter,
    last_seen: Instant,
}

/// `max_requests` per `window` for each client address, refilled evenly.
pub struct IpRateLimiter {
    limiters: DashMap<IpAddr, Tracked>,
    quota: Quota,
    window: Duration,
}

impl IpRateLimiter {
    pub fn new(config: &RateLimitConfig) -> anyhow::Result<Self> {
        let burst = NonZeroU32::new(config.max_requests)
            .ok_or_else(|| anyhow::anyhow!("RATE_LIMIT_MAX_REQUESTS must be positive"))?;
        let quota = Quota::with_period(config.window / burst.get())
            .ok_or_else(|| anyhow::anyhow!("RATE_LIMIT_WINDOW_MS must be positive"))?
            .allow_burst(burst);

        Ok(Self {
            limiters: DashMap::new(),
            quota,
            window: config.window,
        })
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn check(&self, ip: IpAddr) -> bool {
        let mut entry = self.limiters.entry(ip).or_insert_with(|| Tracked {
            limiter: RateLimiter::direct(self.quota),
            last_seen: Instant::now(),
        });
        entry.last_seen = Instant::now();

        let allowed = entry.limiter.check().is_ok();
        if !allowed {
            tracing::debug!(%ip, "rate limit exceeded");
        }
        allowed
    }

    /// Drops addresses idle for a full window. Their buckets are full again,
    /// so a fresh limiter behaves the same.
    pub fn cleanup(&self) -> usize {
        self.cleanup_at(Instant::now())
    }

    fn cleanup_at(&self, now: Instant) -> usize {
        let before = self.limiters.len();
        self.limiters
            .retain(|_, tracked| now.saturating_duration_since(tracked.last_seen) < self.window);
        let evicted = before.saturating_sub(self.limiters.len());
        if evicted > 0 {
            tracing::debug!(evicted, remaining = self.limiters.len(), "evicted idle rate limiters");
        }
        evicted
    }

    #[cfg(test)]
    pub fn tracked(&self) -> usize {
        self.limiters.len()
    }
}

/// Runs [`IpRateLimiter::cleanup`] once per window for the life of the server.
pub fn spawn_cleanup(limiter: web::Data<IpRateLimiter>) {
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(limiter.window());
        loop {
            interval.tick().await;
            limiter.cleanup();
        }
    });
}

pub async fn limit_by_ip<B: MessageBody>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<EitherBody<B>>, Error> {
    let ip = req
        .peer_addr()
        .map(|addr| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    let allowed = match req.app_data::<web::Data<IpRateLimiter>>() {
        Some(limiter) => limiter.check(ip),
        None => true,
    };
    if !allowed {
        let resp = ApiError::TooManyRequests.error_response();
        return Ok(req.into_response(resp).map_into_right_body());
    }

    next.call(req).await.map(ServiceResponse::map_into_left_body)
}
