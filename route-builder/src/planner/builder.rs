//! The route builder: answers journey queries over a repository.

use std::sync::{Arc, PoisonError};

use chrono::{Duration, Utc};
use tracing::{debug, error, info};

use crate::availability::DependencyGraph;
use crate::cache::RequestCache;
use crate::domain::{InstantInterval, Point, PointId, Run, Stop, StopLight, Timestamp};
use crate::schedule::{SchedulePage, Timeline, index_runs};
use crate::store::Repository;

use super::config::{ConfigError, RouteBuilderConfig};
use super::handler::{ResponseHandler, RouteFilter};
use super::query::{QueryError, RouteQuery};
use super::search::{Algorithm, SearchError};
use super::transfers::{ScheduleTransfers, fetch_pages};

/// How far ahead an open arrival window reaches.
const SEARCH_HORIZON_DAYS: i64 = 45;

type Clock = Box<dyn Fn() -> Timestamp + Send + Sync>;

/// A search over the builder's repository.
pub type RouteSearch<R> = Algorithm<ScheduleTransfers<R>>;

/// Answers [`RouteQuery`]s over the runs of a [`Repository`].
///
/// Searches started with a non-zero request id are kept for a while, so a
/// later query with the same id continues the enumeration instead of
/// searching again.
pub struct RouteBuilder<R: Repository + 'static> {
    repository: Arc<R>,
    dependencies: Arc<DependencyGraph>,
    config: RouteBuilderConfig,
    requests: RequestCache<RouteSearch<R>>,
    clock: Clock,
}

impl<R: Repository + 'static> RouteBuilder<R> {
    /// Fails when `config` describes an unusable transfer window.
    pub fn new(repository: Arc<R>, config: RouteBuilderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            repository,
            dependencies: Arc::new(DependencyGraph::rail()),
            requests: RequestCache::new(&config.cache_config()),
            config,
            clock: Box::new(Utc::now),
        })
    }

    /// Replaces the source of "now" used to resolve open windows.
    pub fn with_clock(mut self, clock: impl Fn() -> Timestamp + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_dependencies(mut self, dependencies: Arc<DependencyGraph>) -> Self {
        self.dependencies = dependencies;
        self
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    pub fn config(&self) -> &RouteBuilderConfig {
        &self.config
    }

    pub fn dependencies(&self) -> &DependencyGraph {
        &self.dependencies
    }

    /// Number of searches kept for paging.
    pub fn cached_searches(&self) -> u64 {
        self.requests.entry_count()
    }

    pub fn add_points(&self, points: impl IntoIterator<Item = Point>) {
        let mut count = 0;
        for point in points {
            self.repository.save_point(point);
            count += 1;
        }
        info!(points = count, "Added points");
    }

    /// Stores runs and indexes them in schedule pages.
    pub fn add_runs(&self, runs: impl IntoIterator<Item = Run>) {
        let pages = index_runs(self.repository.as_ref(), runs);
        info!(pages, "Added runs");
    }

    /// Finds paths for `query`, shaped by `handler`.
    ///
    /// Malformed result counts and inconsistent filters are rejected. A
    /// query that cannot match anything (unknown or equal points, empty
    /// windows) gets an empty response, as does a search that fails
    /// internally.
    pub fn find_routes<H: ResponseHandler>(
        &self,
        query: &RouteQuery<H::Filter>,
        handler: &H,
    ) -> Result<H::Response, QueryError> {
        let requested = query.presentation.number_of_results;
        if requested < 0 {
            return Err(QueryError::NegativeResultCount(requested));
        }
        let count = usize::try_from(requested).unwrap_or(usize::MAX);
        if count > self.config.max_results && query.filter.max_transfers() > 0 {
            return Err(QueryError::TooManyResults {
                requested,
                max: self.config.max_results,
            });
        }
        if !handler.availability_filter(&query.filter).is_consistent(&self.dependencies) {
            return Err(QueryError::InconsistentFilter);
        }
        if count == 0 {
            return Ok(handler.default_response(Vec::new(), query.request_id));
        }

        if let Some(search) = self.requests.get(query.request_id) {
            debug!(request_id = query.request_id, "Continuing cached search");
            let mut algorithm = search.lock().unwrap_or_else(PoisonError::into_inner);
            let filter = self.response_filter(query, handler, &mut *algorithm).unwrap_or_else(|err| {
                error!(error = %err, request_id = query.request_id, "Could not restore the response filter");
                query.filter.clone()
            });
            let offers = take_offers(&mut *algorithm, handler, count);
            return Ok(handler.build_response(offers, filter, query.request_id));
        }

        Ok(self.run_query(query, handler, count))
    }

    fn run_query<H: ResponseHandler>(&self, query: &RouteQuery<H::Filter>, handler: &H, count: usize) -> H::Response {
        let from = &query.departure.point;
        let to = &query.arrival.point;
        let nothing = || handler.build_response(Vec::new(), query.filter.clone(), query.request_id);

        if self.repository.point(from).is_none() || self.repository.point(to).is_none() {
            debug!(%from, %to, "Unknown point");
            return nothing();
        }
        if from == to {
            debug!(point = %from, "Departure equals arrival");
            return nothing();
        }

        let (departure, arrival) = self.resolve_windows(&query.departure.interval, &query.arrival.interval);
        let sources = self.boundary_stops(from, departure, |page| &page.departures);
        let targets = self.boundary_stops(to, arrival, |page| &page.arrivals);
        if sources.is_empty() || targets.is_empty() {
            debug!(
                sources = sources.len(),
                targets = targets.len(),
                "No schedule entries in the requested windows"
            );
            return nothing();
        }

        match self.search(query, handler, count, sources, targets) {
            Ok(response) => response,
            Err(err) => {
                error!(error = %err, %from, %to, "Search failed");
                handler.default_response(Vec::new(), query.request_id)
            }
        }
    }

    fn search<H: ResponseHandler>(
        &self,
        query: &RouteQuery<H::Filter>,
        handler: &H,
        count: usize,
        sources: Vec<Stop>,
        targets: Vec<Stop>,
    ) -> Result<H::Response, SearchError> {
        let max_transfers = query.filter.max_transfers().min(self.config.max_transfers);
        let transfers = ScheduleTransfers::new(
            Arc::clone(&self.repository),
            Arc::clone(&self.dependencies),
            handler.availability_filter(&query.filter),
            &self.config,
        );
        let presentation = &query.presentation;
        let mut algorithm = Algorithm::new(
            transfers,
            max_transfers,
            presentation.sort_order,
            presentation.sort_direction,
        );
        for source in sources {
            algorithm.add_source(source)?;
        }
        for target in targets {
            algorithm.add_target(target)?;
        }
        algorithm.execute()?;

        let filter = self.response_filter(query, handler, &mut algorithm)?;
        let offers = take_offers(&mut algorithm, handler, count);
        debug!(offers = offers.len(), requested = count, "Collected offers");
        if self.requests.insert(query.request_id, algorithm).is_some() {
            debug!(request_id = query.request_id, "Kept search for paging");
        }
        Ok(handler.build_response(offers, filter, query.request_id))
    }

    /// The filter echoed to the caller: theirs, or for an open filter one
    /// derived from the availability of every path found. Continued
    /// searches derive it again from the kept aggregate.
    fn response_filter<H: ResponseHandler>(
        &self,
        query: &RouteQuery<H::Filter>,
        handler: &H,
        algorithm: &mut RouteSearch<R>,
    ) -> Result<H::Filter, SearchError> {
        if !handler.is_empty(&query.filter) {
            return Ok(query.filter.clone());
        }
        let max_transfers = algorithm.max_transfers();
        let properties = algorithm.build_properties()?;
        Ok(handler.filter_from_properties(
            properties,
            &self.dependencies,
            max_transfers,
            query.filter.required_quantity(),
        ))
    }

    /// Fills the open bounds of the query windows.
    ///
    /// Departures never start before now; an open arrival window ends
    /// [`SEARCH_HORIZON_DAYS`] from now; an open departure end falls back to
    /// the arrival end and an open arrival start to the departure start.
    fn resolve_windows(
        &self,
        departure: &InstantInterval,
        arrival: &InstantInterval,
    ) -> (InstantInterval, InstantInterval) {
        let now = (self.clock)();
        let departure_since = departure.since.filter(|&since| since >= now).unwrap_or(now);
        let arrival_till = arrival.till.unwrap_or_else(|| {
            now.checked_add_signed(Duration::days(SEARCH_HORIZON_DAYS))
                .unwrap_or(Timestamp::MAX_UTC)
        });
        let departure = departure
            .with_since(departure_since)
            .with_till(departure.till.unwrap_or(arrival_till));
        let arrival = arrival
            .with_since(arrival.since.unwrap_or(departure_since))
            .with_till(arrival_till);
        (departure, arrival)
    }

    /// Stops of `point` inside a resolved `window`.
    fn boundary_stops(
        &self,
        point: &PointId,
        window: InstantInterval,
        timeline: impl Fn(&SchedulePage) -> &Timeline<StopLight>,
    ) -> Vec<Stop> {
        let Some((from, to)) = window.bounds().filter(|(from, to)| from <= to) else {
            return Vec::new();
        };
        fetch_pages(self.repository.as_ref(), point, from, to)
            .iter()
            .flat_map(|page| {
                timeline(page)
                    .tail_map(from, true)
                    .take_while(|(instant, _)| window.contains(*instant))
                    .map(|(instant, light)| Stop::from_light(light, point.clone(), instant))
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

fn take_offers<T, H>(algorithm: &mut Algorithm<T>, handler: &H, count: usize) -> Vec<H::Offer>
where
    H: ResponseHandler,
{
    algorithm
        .by_ref()
        .map(|path| handler.map_path(path))
        .filter(|offer| handler.is_valid(offer))
        .take(count)
        .collect()
}
