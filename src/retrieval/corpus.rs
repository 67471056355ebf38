use serde::Serialize;

/// A corpus entry. `id` is the document's position at load time and is the
/// deterministic tie-breaker during ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub id: usize,
    pub text: String,
}

/// The built-in knowledge base. Loaded once at startup and never mutated.
pub fn builtin_corpus() -> Vec<Document> {
    [
        "The capital of France is Paris. Paris is known for the Eiffel Tower.",
        "The largest ocean is the Pacific Ocean.",
        "A dog is a common pet animal known for its loyalty.",
        "Cats are independent pets often found sleeping.",
        "Mount Everest is the highest mountain in the world, located in the Himalayas.",
    ]
    .into_iter()
    .enumerate()
    .map(|(id, text)| Document {
        id,
        text: text.to_string(),
    })
    .collect()
}
