//! Ranking dispatcher.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use super::{
    keep_successor, ArrayListDispatcher, CandidateList, CompositeSort, Cursor, KeepSuccessor,
    KeyAndActivity, RankingCursor, ReadyActivitiesDispatcher,
};
use crate::dispatching::{Candidate, DispatcherDefinition, SchedulingContext};
use crate::error::DispatchResult;
use crate::models::ScenarioView;

/// Ranks candidates every cycle with a [`DispatcherDefinition`].
///
/// Storage, readiness and association are delegated to an
/// [`ArrayListDispatcher`]; on top of it each `begin_dispatch` builds a
/// [`CompositeSort`]:
///
/// - candidates are visited in storage order;
/// - with keep-successors enforced, `Skip` candidates sit the cycle out and an
///   `Exclusive` candidate replaces everything ranked so far (the last
///   `Exclusive` in storage order wins, later `Normal` candidates are ignored);
/// - each kept candidate is keyed by the definition with its insertion index;
///   candidates the definition refuses to key are dropped;
/// - the ranking is stably sorted by the definition's comparator, ties
///   falling back to insertion index.
///
/// The ranking is deterministic for a fixed candidate set, definition and
/// scenario state.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use u_dispatch::dispatcher::{ReadyActivitiesDispatcher, SortedListDispatcher};
/// use u_dispatch::dispatching::{rules, RuleDefinition, RuleEngine};
/// use u_dispatch::models::{Activity, Operation, Resource, Scenario};
///
/// let scenario = Scenario::new()
///     .with_resource(Resource::single_tasking("M1"))
///     .with_operation(Operation::new("OP1", "J1"))
///     .with_operation(Operation::new("OP2", "J2"))
///     .with_activity(Activity::new("long", "OP1").with_process_time(5000))
///     .with_activity(Activity::new("short", "OP2").with_process_time(1000));
///
/// let definition = Arc::new(RuleDefinition::new("SPT", RuleEngine::new().with_rule(rules::Spt)));
/// let mut dispatcher = SortedListDispatcher::with_resource(definition, "M1");
/// dispatcher.add("long", 0).unwrap();
/// dispatcher.add("short", 0).unwrap();
///
/// dispatcher.begin_dispatch(&scenario, 0, true, true).unwrap();
/// assert_eq!(dispatcher.next_activity().as_deref(), Some("short"));
/// assert_eq!(dispatcher.next_activity().as_deref(), Some("long"));
/// assert_eq!(dispatcher.next_activity(), None);
/// dispatcher.end_dispatch();
/// ```
#[derive(Debug, Clone)]
pub struct SortedListDispatcher {
    base: ArrayListDispatcher,
    definition: Arc<dyn DispatcherDefinition>,
    composite: CompositeSort,
}

impl SortedListDispatcher {
    /// Creates a dispatcher not yet associated with a resource.
    pub fn new(definition: Arc<dyn DispatcherDefinition>) -> Self {
        Self {
            base: ArrayListDispatcher::new(),
            definition,
            composite: CompositeSort::new(),
        }
    }

    /// Creates a dispatcher serving `resource_id`.
    pub fn with_resource(
        definition: Arc<dyn DispatcherDefinition>,
        resource_id: impl Into<String>,
    ) -> Self {
        Self {
            base: ArrayListDispatcher::with_resource(resource_id),
            definition,
            composite: CompositeSort::new(),
        }
    }

    /// The ranking definition.
    pub fn definition(&self) -> &Arc<dyn DispatcherDefinition> {
        &self.definition
    }

    /// Ranking of the current cycle.
    pub fn composite_sort(&self) -> &CompositeSort {
        &self.composite
    }

    /// A fresh cursor over the ranking of the current cycle.
    pub fn ranking_cursor(&self) -> RankingCursor {
        Cursor::new(&self.composite)
    }

    fn push_keyed(&mut self, candidate: &Candidate<'_>, context: &SchedulingContext) {
        let insertion_index = self.composite.len();
        match self.definition.create_key(candidate, insertion_index, context) {
            Some(key) => self.composite.push(KeyAndActivity::new(key, candidate.id())),
            None => trace!(activity = candidate.id(), "no key, left out of cycle"),
        }
    }
}

impl ReadyActivitiesDispatcher for SortedListDispatcher {
    fn resource_id(&self) -> DispatchResult<&str> {
        self.base.resource_id()
    }

    fn associate(&mut self, resource_id: &str) -> DispatchResult<()> {
        self.base.associate(resource_id)
    }

    fn clear(&mut self) {
        self.base.clear();
        self.composite.clear();
    }

    fn add(&mut self, activity_id: &str, sequence_head_end_ms: i64) -> DispatchResult<()> {
        self.base.add(activity_id, sequence_head_end_ms)
    }

    fn remove(&mut self, activity_id: &str) -> bool {
        let removed = self.base.remove(activity_id);
        self.composite.remove(activity_id);
        removed
    }

    fn contains(&self, activity_id: &str) -> bool {
        self.base.contains(activity_id)
    }

    fn count(&self) -> usize {
        self.base.count()
    }

    fn has_ready_activity(&self) -> bool {
        self.base.has_ready_activity()
    }

    fn begin_dispatch(
        &mut self,
        scenario: &dyn ScenarioView,
        time_ms: i64,
        optimize: bool,
        enforce_keep_successors: bool,
    ) -> DispatchResult<()> {
        let resource_id = if enforce_keep_successors {
            Some(self.base.resource_id()?.to_owned())
        } else {
            self.base.association().as_option().map(str::to_owned)
        };

        self.base
            .begin_dispatch(scenario, time_ms, optimize, enforce_keep_successors)?;
        self.composite.clear();

        if !self.base.has_ready_activity() {
            debug!(resource = ?resource_id, time_ms, "nothing ready, ranking skipped");
            return Ok(());
        }

        let resolved: Vec<Candidate<'_>> = self
            .base
            .candidates()
            .iter()
            .filter_map(|id| {
                let candidate = Candidate::resolve(scenario, id);
                if candidate.is_none() {
                    warn!(activity = id, "candidate missing from scenario, left out of cycle");
                }
                candidate
            })
            .collect();

        let mut context = SchedulingContext::at_time(time_ms);
        if let Some(resource) = &resource_id {
            context = context.with_resource(resource.clone());
        }
        if !resolved.is_empty() {
            let total = resolved
                .iter()
                .map(Candidate::processing_ms)
                .fold(0i64, i64::saturating_add);
            context = context.with_average_processing_time(total as f64 / resolved.len() as f64);
        }
        // Storage order is arrival order.
        for (sequence, id) in self.base.candidates().iter().enumerate() {
            context = context.with_arrival_time(id, sequence as i64);
        }

        let mut exclusive: Option<&str> = None;
        for candidate in &resolved {
            let verdict = match (&resource_id, enforce_keep_successors) {
                (Some(resource), true) => {
                    keep_successor(scenario, resource, time_ms, candidate.activity)
                }
                _ => KeepSuccessor::Normal,
            };
            match verdict {
                KeepSuccessor::Normal if exclusive.is_some() => {}
                KeepSuccessor::Normal => self.push_keyed(candidate, &context),
                KeepSuccessor::Skip => {
                    trace!(activity = candidate.id(), "kept with another resource, skipped");
                }
                KeepSuccessor::Exclusive => {
                    if let Some(previous) = exclusive {
                        trace!(activity = candidate.id(), previous, "exclusive replaces exclusive");
                    }
                    exclusive = Some(candidate.id());
                    self.composite.clear();
                    self.push_keyed(candidate, &context);
                }
            }
        }

        if !self.composite.is_empty() {
            self.composite.sort_by(self.definition.as_ref());
        }

        debug!(
            resource = ?resource_id,
            time_ms,
            candidates = self.base.count(),
            ranked = self.composite.len(),
            exclusive = ?exclusive,
            definition = self.definition.name(),
            "dispatch cycle ranked"
        );
        Ok(())
    }

    fn next_activity(&mut self) -> Option<String> {
        self.composite
            .advance()
            .map(|entry| entry.activity_id().to_owned())
    }

    fn peek_next_activity(&self) -> Option<&str> {
        self.composite.peek().map(KeyAndActivity::activity_id)
    }

    fn next_key_and_activity(&mut self) -> Option<KeyAndActivity> {
        self.composite.advance().cloned()
    }

    fn peek_next_key_and_activity(&self) -> Option<KeyAndActivity> {
        self.composite.peek().cloned()
    }

    fn candidates(&self) -> &CandidateList {
        self.base.candidates()
    }
}

impl fmt::Display for SortedListDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SortedListDispatcher[{}] {}: {} candidates, {} ranked, position {}",
            self.base.association().as_option().unwrap_or("-"),
            self.definition.name(),
            self.base.count(),
            self.composite.len(),
            self.composite.position()
        )
    }
}
