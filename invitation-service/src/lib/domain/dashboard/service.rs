use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::dashboard::errors::DashboardError;
use crate::domain::dashboard::models::DashboardSummary;
use crate::domain::dashboard::ports::DashboardServicePort;
use crate::domain::event::models::EventId;
use crate::domain::event::ports::EventRepository;
use crate::domain::guest::ports::GuestRepository;
use crate::domain::user::models::UserId;

/// Read-side aggregation over events and guests. Nothing is cached.
pub struct DashboardService<ER, GR>
where
    ER: EventRepository,
    GR: GuestRepository,
{
    events: Arc<ER>,
    guests: Arc<GR>,
}

impl<ER, GR> DashboardService<ER, GR>
where
    ER: EventRepository,
    GR: GuestRepository,
{
    pub fn new(events: Arc<ER>, guests: Arc<GR>) -> Self {
        Self { events, guests }
    }
}

#[async_trait]
impl<ER, GR> DashboardServicePort for DashboardService<ER, GR>
where
    ER: EventRepository,
    GR: GuestRepository,
{
    async fn summarize(&self, owner: &UserId) -> Result<DashboardSummary, DashboardError> {
        let events = self.events.find_by_owner(owner).await?;
        if events.is_empty() {
            return Ok(DashboardSummary::default());
        }

        let event_ids: Vec<EventId> = events.iter().map(|e| e.id).collect();
        let guests = self.guests.find_by_events(&event_ids).await?;

        Ok(DashboardSummary::build(&events, &guests))
    }
}
