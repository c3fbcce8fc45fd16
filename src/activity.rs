//! Activity aggregation: classify, sort, group and resolve order events
//!
//! The stages are plain functions. [`ActivityFeed`] strings them together
//! and decides which stage has to run again when an input changes; the
//! network side lives in `app::activity_table`.

use crate::api::MarketApi;
use crate::constants::ACTIVITY_GROUP_SIZE;
use crate::error::ApiError;
use crate::types::*;
use std::collections::HashSet;
use tracing::debug;

// ============================================================================
// STAGES
// ============================================================================

/// Map raw order records into order events of the given kind
pub fn map_activity(orders: &[RawOrder], kind: EventKind) -> Vec<OrderEvent> {
    orders
        .iter()
        .map(|order| OrderEvent {
            order_id: order.order_id.clone(),
            dominant_token: order.dominant_token.clone(),
            swap_token: order.swap_token.clone(),
            price: order.price.clone(),
            quantity: order.quantity.clone(),
            sender: order.sender.clone().filter(|s| !s.is_empty()),
            receiver: order.receiver.clone().filter(|r| !r.is_empty()),
            timestamp: order.timestamp,
            kind,
        })
        .collect()
}

/// Listed orders followed by executed orders
pub fn classify_activity(response: &ActivityResponse) -> Vec<OrderEvent> {
    let mut activity = Vec::new();
    if let Some(listed) = &response.listed_orders {
        activity.extend(map_activity(listed, EventKind::Listed));
    }
    if let Some(executed) = &response.executed_orders {
        activity.extend(map_activity(executed, EventKind::Sold));
    }
    activity
}

pub fn sort_activity(activity: &mut [OrderEvent], sort: SortOption) {
    match sort {
        SortOption::NewToOld => activity.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
        SortOption::OldToNew => activity.sort_by(|a, b| a.timestamp.cmp(&b.timestamp)),
    }
}

/// Split into sequential windows of `size`; the last may be shorter
pub fn group_activity(activity: &[OrderEvent], size: usize) -> Vec<Vec<OrderEvent>> {
    activity.chunks(size.max(1)).map(|c| c.to_vec()).collect()
}

/// Distinct sender and receiver addresses of a group, senders first
pub fn collect_addresses(group: &[OrderEvent]) -> Vec<String> {
    let mut seen = HashSet::new();
    group
        .iter()
        .filter_map(|e| e.sender.as_ref())
        .chain(group.iter().filter_map(|e| e.receiver.as_ref()))
        .filter(|a| seen.insert(*a))
        .cloned()
        .collect()
}

/// Attach matching profiles to each event by address equality
pub fn merge_profiles(group: &[OrderEvent], profiles: Option<&[Profile]>) -> Vec<ResolvedOrder> {
    let find = |address: &Option<String>| -> Option<Profile> {
        let address = address.as_deref()?;
        profiles?.iter().find(|p| p.id == address).cloned()
    };

    group
        .iter()
        .map(|event| ResolvedOrder {
            sender_profile: find(&event.sender),
            receiver_profile: find(&event.receiver),
            event: event.clone(),
        })
        .collect()
}

/// Fetch activity for `query` and classify it
pub async fn fetch_activity(
    api: &dyn MarketApi,
    query: &ActivityQuery,
) -> Result<Vec<OrderEvent>, ApiError> {
    let response = api.get_activity(query).await?;
    let activity = classify_activity(&response);
    debug!(count = activity.len(), "Activity fetched");
    Ok(activity)
}

// ============================================================================
// FEED STATE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedPhase {
    Idle,
    Fetching,
    Grouping,
    Resolving,
    Ready,
}

/// Profile lookup the caller has to run for the visible group
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveRequest {
    pub generation: u64,
    pub addresses: Vec<String>,
}

/// What the table should draw
#[derive(Debug, PartialEq)]
pub enum FeedView<'a> {
    Loading,
    Empty,
    Ready(&'a [ResolvedOrder]),
}

/// Sort/group/resolve state for one activity table
#[derive(Debug)]
pub struct ActivityFeed {
    phase: FeedPhase,
    activity: Option<Vec<OrderEvent>>,
    groups: Option<Vec<Vec<OrderEvent>>>,
    group: Option<Vec<ResolvedOrder>>,
    cursor: usize,
    sort: SortOption,
    updating: bool,
    generation: u64,
    group_size: usize,
}

impl Default for ActivityFeed {
    fn default() -> Self {
        Self::new(SortOption::default())
    }
}

impl ActivityFeed {
    pub fn new(sort: SortOption) -> Self {
        Self::with_group_size(sort, ACTIVITY_GROUP_SIZE)
    }

    pub fn with_group_size(sort: SortOption, group_size: usize) -> Self {
        Self {
            phase: FeedPhase::Idle,
            activity: None,
            groups: None,
            group: None,
            cursor: 0,
            sort,
            updating: false,
            generation: 0,
            group_size: group_size.max(1),
        }
    }

    /// Drop everything derived from the previous query
    pub fn begin_fetch(&mut self) {
        self.phase = FeedPhase::Fetching;
        self.activity = None;
        self.groups = None;
        self.group = None;
        self.cursor = 0;
        self.updating = false;
        self.generation += 1;
    }

    pub fn set_activity(&mut self, activity: Vec<OrderEvent>) -> Option<ResolveRequest> {
        self.activity = Some(activity);
        self.regroup()
    }

    pub fn set_sort(&mut self, sort: SortOption) -> Option<ResolveRequest> {
        if sort == self.sort {
            return None;
        }
        self.sort = sort;
        self.group = None;
        self.groups = None;
        if self.activity.is_some() {
            self.regroup()
        } else {
            None
        }
    }

    pub fn next(&mut self) -> Option<ResolveRequest> {
        if !self.can_next() {
            return None;
        }
        self.updating = true;
        self.cursor += 1;
        self.request_resolution()
    }

    pub fn previous(&mut self) -> Option<ResolveRequest> {
        if !self.can_previous() {
            return None;
        }
        self.updating = true;
        self.cursor -= 1;
        self.request_resolution()
    }

    /// Merge a profile lookup into the visible group.
    /// Returns false when the response belongs to a superseded request.
    pub fn apply_profiles(&mut self, generation: u64, profiles: Option<&[Profile]>) -> bool {
        if generation != self.generation {
            debug!(generation, current = self.generation, "Discarding stale profile lookup");
            return false;
        }
        let Some(current) = self.groups.as_ref().and_then(|g| g.get(self.cursor)) else {
            return false;
        };
        self.group = Some(merge_profiles(current, profiles));
        self.phase = FeedPhase::Ready;
        self.updating = false;
        true
    }

    fn regroup(&mut self) -> Option<ResolveRequest> {
        self.phase = FeedPhase::Grouping;
        self.cursor = 0;
        let activity = self.activity.as_mut()?;
        sort_activity(activity, self.sort);
        self.groups = Some(group_activity(activity, self.group_size));
        self.request_resolution()
    }

    fn request_resolution(&mut self) -> Option<ResolveRequest> {
        self.generation += 1;
        let groups = self.groups.as_ref()?;
        match groups.get(self.cursor) {
            Some(current) => {
                self.phase = FeedPhase::Resolving;
                Some(ResolveRequest {
                    generation: self.generation,
                    addresses: collect_addresses(current),
                })
            }
            None => {
                self.group = Some(Vec::new());
                self.phase = FeedPhase::Ready;
                self.updating = false;
                None
            }
        }
    }

    pub fn view(&self) -> FeedView<'_> {
        match &self.group {
            None => FeedView::Loading,
            Some(group) if group.is_empty() => FeedView::Empty,
            Some(group) => FeedView::Ready(group),
        }
    }

    pub fn phase(&self) -> FeedPhase {
        self.phase
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn sort(&self) -> SortOption {
        self.sort
    }

    pub fn is_updating(&self) -> bool {
        self.updating
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn total(&self) -> usize {
        self.activity.as_ref().map_or(0, |a| a.len())
    }

    pub fn group_count(&self) -> usize {
        self.groups.as_ref().map_or(0, |g| g.len())
    }

    pub fn can_previous(&self) -> bool {
        self.groups.is_some() && self.cursor > 0
    }

    pub fn can_next(&self) -> bool {
        self.groups.is_some() && self.cursor + 1 < self.group_count()
    }

    /// 1-based inclusive range of the visible window
    pub fn range(&self) -> (usize, usize) {
        let start = self.cursor * self.group_size + 1;
        let end = ((self.cursor + 1) * self.group_size).min(self.total());
        (start, end)
    }
}
