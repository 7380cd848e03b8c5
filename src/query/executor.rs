//! Query executor for running parsed queries against a context

use crate::models::SearchResult;
use crate::query::ast::QueryNode;
use crate::query::context::QueryContext;
use crate::query::types::QueryStats;
use crate::Result;
use roaring::RoaringBitmap;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Instant;

/// Query execution result
#[derive(Debug)]
pub struct QueryResult {
    /// Matching documents with scores, best first
    pub hits: Vec<SearchResult>,
    /// Total number of matching documents
    pub total_hits: u64,
    /// Execution statistics
    pub stats: QueryStats,
}

/// Query executor for running queries
pub struct QueryExecutor;

impl QueryExecutor {
    /// Execute a query and return the `top_k` best hits
    pub fn execute(query: &dyn QueryNode, ctx: &QueryContext, top_k: usize) -> Result<QueryResult> {
        let start = Instant::now();

        let matches = query.execute(ctx)?;
        let total_hits = matches.len();

        let hits = if query.is_scoring() {
            Self::collect_top_k_scored(query, ctx, &matches, top_k)
        } else {
            Self::collect_top_k_unscored(ctx, &matches, top_k)
        };

        let stats = QueryStats {
            docs_matched: total_hits,
            execution_time_us: start.elapsed().as_micros() as u64,
        };

        Ok(QueryResult {
            hits,
            total_hits,
            stats,
        })
    }

    /// Collect top-k results with scoring
    fn collect_top_k_scored(
        query: &dyn QueryNode,
        ctx: &QueryContext,
        matches: &RoaringBitmap,
        top_k: usize,
    ) -> Vec<SearchResult> {
        if matches.is_empty() || top_k == 0 {
            return Vec::new();
        }

        // Min-heap on (score, Reverse(docno)): the weakest hit sits on top,
        // and among equal scores the higher docno is evicted first
        let mut heap: BinaryHeap<Reverse<(OrderedFloat, Reverse<u32>)>> =
            BinaryHeap::with_capacity(top_k + 1);

        for docno in matches.iter() {
            let score = query.score(ctx, docno).unwrap_or(0.0);
            heap.push(Reverse((OrderedFloat(score), Reverse(docno))));
            if heap.len() > top_k {
                heap.pop();
            }
        }

        let mut ranked: Vec<(f32, u32)> = heap
            .into_iter()
            .map(|Reverse((OrderedFloat(score), Reverse(docno)))| (score, docno))
            .collect();
        ranked.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.1.cmp(&b.1))
        });

        ranked
            .into_iter()
            .map(|(score, docno)| {
                let doc_id = ctx.docno_to_doc_id(docno).unwrap_or(docno as u64);
                SearchResult::new(doc_id, score)
            })
            .collect()
    }

    /// Collect top-k results without scoring (e.g., filter-only queries)
    fn collect_top_k_unscored(
        ctx: &QueryContext,
        matches: &RoaringBitmap,
        top_k: usize,
    ) -> Vec<SearchResult> {
        matches
            .iter()
            .take(top_k)
            .map(|docno| {
                let doc_id = ctx.docno_to_doc_id(docno).unwrap_or(docno as u64);
                SearchResult::new(doc_id, 1.0)
            })
            .collect()
    }
}

/// Wrapper for f32 that implements Ord for use in BinaryHeap
#[derive(Clone, Copy, Debug, PartialEq)]
struct OrderedFloat(f32);

impl Eq for OrderedFloat {}

impl PartialOrd for OrderedFloat {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedFloat {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.partial_cmp(&other.0).unwrap_or(std::cmp::Ordering::Equal)
    }
}
