//! Property tests for in-memory vector store search ordering.

use std::collections::HashMap;

use proptest::prelude::*;
use sales_rag::document::IndexRecord;
use sales_rag::inmemory::InMemoryVectorStore;
use sales_rag::vectorstore::VectorStore;

/// Generate a non-zero L2-normalized embedding of the given dimension.
fn arb_normalized_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim).prop_filter_map(
        "non-zero embedding",
        |mut v| {
            let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm < 1e-8 {
                return None;
            }
            for val in &mut v {
                *val /= norm;
            }
            Some(v)
        },
    )
}

fn arb_record(dim: usize) -> impl Strategy<Value = IndexRecord> {
    ("row-[0-9]{1,4}", "[a-z ]{5,30}", arb_normalized_embedding(dim)).prop_map(
        |(id, text, embedding)| IndexRecord { id, text, embedding, metadata: HashMap::new() },
    )
}

/// Search returns at most `top_k` results, never more than are stored, in
/// descending cosine similarity.
mod prop_inmemory_search_ordering {
    use super::*;

    const DIM: usize = 16;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn results_ordered_descending_and_bounded_by_top_k(
            records in proptest::collection::vec(arb_record(DIM), 1..20),
            query in arb_normalized_embedding(DIM),
            top_k in 1usize..25,
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let (results, stored) = rt.block_on(async {
                let store = InMemoryVectorStore::new(DIM);
                store.upsert(&records).await.unwrap();
                let results = store.search(&query, top_k).await.unwrap();
                (results, store.len().await)
            });

            prop_assert!(results.len() <= top_k);
            prop_assert_eq!(results.len(), top_k.min(stored));

            for window in results.windows(2) {
                prop_assert!(
                    window[0].score >= window[1].score,
                    "results not in descending order: {} < {}",
                    window[0].score,
                    window[1].score,
                );
            }
        }
    }
}
