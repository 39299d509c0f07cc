use crate::client::{ClientError, ProductSource};
use crate::cruise_catalog::CRUISE_OPTIONS;
use crate::query::{
    build_inventory_params, build_related_term_params, build_search_params, filter_by_exact_keyword,
    SearchParams,
};
use crate::related_terms::compute_related_search_terms;
use actix::prelude::*;
use mall_types::catalog::CruiseOption;
use mall_types::product::Product;
use mall_types::search::{FilterState, RawSearchTerms, RelatedSearchTerm};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SearchState {
    Idle,
    Querying { generation: u64 },
    Loaded { products: Vec<Product> },
    Failed { message: String },
}

impl SearchState {
    pub fn products(&self) -> &[Product] {
        match self {
            Self::Loaded { products } => products,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSnapshot {
    pub filter: FilterState,
    pub raw: RawSearchTerms,
    pub state: SearchState,
    pub related_terms: Vec<RelatedSearchTerm>,
}

#[derive(Message)]
#[rtype(result = "SearchState")]
pub struct SelectRegion(pub String);

#[derive(Message)]
#[rtype(result = "SearchState")]
pub struct SelectCruise(pub String);

/// Text typed into the dropdowns. `None` leaves a box unchanged.
#[derive(Message, Default)]
#[rtype(result = "()")]
pub struct SetRawSearch {
    pub cruise: Option<String>,
    pub region: Option<String>,
}

#[derive(Message)]
#[rtype(result = "SearchState")]
pub struct SelectRelatedTerm(pub RelatedSearchTerm);

#[derive(Message)]
#[rtype(result = "Vec<RelatedSearchTerm>")]
pub struct LoadInventory;

#[derive(Message)]
#[rtype(result = "SearchSnapshot")]
pub struct GetSnapshot;

/// Search block session: owns the filter state and the latest results.
///
/// Every query gets a new generation; a response that comes back after a
/// newer query was started is dropped instead of overwriting the results.
pub struct CatalogSearch {
    source: Arc<dyn ProductSource>,
    cruise_options: Arc<Vec<CruiseOption>>,
    debounce: Duration,
    inventory_limit: usize,
    filter: FilterState,
    raw: RawSearchTerms,
    state: SearchState,
    generation: u64,
    pending: Option<SpawnHandle>,
    related_terms: Vec<RelatedSearchTerm>,
}

impl CatalogSearch {
    pub fn new(source: Arc<dyn ProductSource>) -> Self {
        Self {
            source,
            cruise_options: Arc::new(CRUISE_OPTIONS.clone()),
            debounce: crate::search_debounce(),
            inventory_limit: crate::inventory_limit(),
            filter: FilterState::default(),
            raw: RawSearchTerms::default(),
            state: SearchState::Idle,
            generation: 0,
            pending: None,
            related_terms: vec![],
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_inventory_limit(mut self, limit: usize) -> Self {
        self.inventory_limit = limit;
        self
    }

    fn cancel_pending(&mut self, ctx: &mut Context<Self>) {
        if let Some(handle) = self.pending.take() {
            ctx.cancel_future(handle);
        }
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    fn query(
        &mut self,
        params: SearchParams,
        keyword: Option<String>,
    ) -> ResponseActFuture<Self, SearchState> {
        let generation = self.next_generation();
        log::debug!("Query {generation}: {}", params.to_query_string());
        self.state = SearchState::Querying { generation };
        let source = self.source.clone();
        Box::pin(
            async move {
                let res = source.search_products(&params).await?;
                Ok::<_, ClientError>(match keyword {
                    Some(keyword) => filter_by_exact_keyword(res.products, &keyword),
                    None => res.products,
                })
            }
            .into_actor(self)
            .map(move |res, act, _| {
                if generation != act.generation {
                    log::debug!("Dropping stale response of query {generation}");
                    return act.state.clone();
                }
                act.state = match res {
                    Ok(products) => SearchState::Loaded { products },
                    Err(err) => {
                        log::error!("Product search failed: {err}");
                        SearchState::Failed {
                            message: err.to_string(),
                        }
                    }
                };
                act.state.clone()
            }),
        )
    }

    /// Re-runs the search for the current filter and typed text, or goes
    /// idle when neither restricts anything.
    fn refresh(&mut self) -> ResponseActFuture<Self, SearchState> {
        if self.filter.is_unfiltered() && self.raw.is_blank() {
            self.next_generation();
            self.state = SearchState::Idle;
            return Box::pin(fut::ready(SearchState::Idle));
        }
        let params = build_search_params(&self.filter, &self.raw);
        self.query(params, None)
    }
}

impl Actor for CatalogSearch {
    type Context = Context<Self>;

    fn started(&mut self, _: &mut Self::Context) {
        log::debug!("Catalog search session started");
    }
}

impl Handler<SelectRegion> for CatalogSearch {
    type Result = ResponseActFuture<Self, SearchState>;

    fn handle(&mut self, SelectRegion(region): SelectRegion, ctx: &mut Self::Context) -> Self::Result {
        self.cancel_pending(ctx);
        self.filter.region = region;
        self.refresh()
    }
}

impl Handler<SelectCruise> for CatalogSearch {
    type Result = ResponseActFuture<Self, SearchState>;

    fn handle(&mut self, SelectCruise(cruise): SelectCruise, ctx: &mut Self::Context) -> Self::Result {
        self.cancel_pending(ctx);
        self.filter.cruise_line = cruise;
        self.refresh()
    }
}

impl Handler<SetRawSearch> for CatalogSearch {
    type Result = ();

    fn handle(&mut self, msg: SetRawSearch, ctx: &mut Self::Context) -> Self::Result {
        if let Some(cruise) = msg.cruise {
            self.raw.cruise = cruise;
        }
        if let Some(region) = msg.region {
            self.raw.region = region;
        }
        self.cancel_pending(ctx);
        let handle = ctx.run_later(self.debounce, |act, ctx| {
            act.pending = None;
            let refresh = act.refresh();
            ctx.spawn(refresh.map(|_, _, _| ()));
        });
        self.pending = Some(handle);
    }
}

impl Handler<SelectRelatedTerm> for CatalogSearch {
    type Result = ResponseActFuture<Self, SearchState>;

    fn handle(
        &mut self,
        SelectRelatedTerm(term): SelectRelatedTerm,
        ctx: &mut Self::Context,
    ) -> Self::Result {
        self.cancel_pending(ctx);
        let params = build_related_term_params(&term);
        self.filter.region = term.region;
        self.filter.cruise_line = term.cruise_line;
        self.query(params, term.keyword.filter(|k| !k.is_empty()))
    }
}

impl Handler<LoadInventory> for CatalogSearch {
    type Result = ResponseActFuture<Self, Vec<RelatedSearchTerm>>;

    fn handle(&mut self, _: LoadInventory, _: &mut Self::Context) -> Self::Result {
        let source = self.source.clone();
        let options = self.cruise_options.clone();
        let params = build_inventory_params(self.inventory_limit);
        Box::pin(
            async move {
                match source.search_products(&params).await {
                    Ok(res) => compute_related_search_terms(&res.products, &options),
                    Err(err) => {
                        log::error!("Unable to load inventory for related terms: {err}");
                        vec![]
                    }
                }
            }
            .into_actor(self)
            .map(|terms, act, _| {
                log::debug!("Derived {} related search terms", terms.len());
                act.related_terms = terms.clone();
                terms
            }),
        )
    }
}

impl Handler<GetSnapshot> for CatalogSearch {
    type Result = MessageResult<GetSnapshot>;

    fn handle(&mut self, _: GetSnapshot, _: &mut Self::Context) -> Self::Result {
        MessageResult(SearchSnapshot {
            filter: self.filter.clone(),
            raw: self.raw.clone(),
            state: self.state.clone(),
            related_terms: self.related_terms.clone(),
        })
    }
}
